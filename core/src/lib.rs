#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilegarden engine.
//!
//! This crate defines the message surface that connects the host adapter,
//! the authoritative world, and the pure systems. The host submits
//! [`Command`] values describing desired mutations, the world executes them
//! via its `apply` entry point, and then broadcasts [`Event`] values for the
//! host and systems to react to deterministically. It also owns the packed
//! [`TileStore`] that backs the grid simulation and the [`GameSnapshot`]
//! wire type that persistence and history operate on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes stored per grid cell: sun, water, plant kind, growth.
pub const TILE_STRIDE: usize = 4;

/// Maximum growth level a plant can reach; level 3 plants are reapable.
pub const MAX_GROWTH: u8 = 3;

/// Smallest legal grid edge; the outer border row and column are never
/// simulated, so anything below three leaves no interior.
pub const MIN_GRID_EDGE: u32 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's tile grid using the provided dimensions.
    ConfigureGrid {
        /// Number of tile rows laid out in the grid.
        rows: u32,
        /// Number of tile columns laid out in the grid.
        cols: u32,
        /// Length of each square tile edge measured in pixels.
        tile_length: f32,
    },
    /// Writes a single tile record, used by generation and flower spawning.
    PlantTile {
        /// Cell receiving the record.
        cell: CellCoord,
        /// Record to store at the cell.
        record: TileRecord,
    },
    /// Requests that the player start moving one tile in a direction.
    BeginMove {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Commits a move once the host's transition animation has elapsed.
    CompleteMove,
    /// Reaps the plant under the player if it has reached full growth.
    Reap,
    /// Replaces the entire mutable game state with a snapshot.
    RestoreSnapshot {
        /// Snapshot previously captured from a compatible grid.
        snapshot: GameSnapshot,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the grid was allocated with the given dimensions.
    GridConfigured {
        /// Number of rows in the configured grid.
        rows: u32,
        /// Number of columns in the configured grid.
        cols: u32,
    },
    /// Announces that a cell's visual representation must change.
    TileChanged {
        /// Cell whose appearance changed.
        cell: CellCoord,
        /// Tileset id the presentation layer should place at the cell.
        render_id: u16,
    },
    /// Confirms that a player move began and a transition is in flight.
    MoveStarted {
        /// Tile the player occupied when the move began.
        from: CellCoord,
        /// Tile the player will occupy once the move commits.
        to: CellCoord,
    },
    /// Confirms that a player move committed at transition completion.
    MoveCompleted {
        /// Tile the player occupies after the move.
        cell: CellCoord,
    },
    /// Signals the five-step milestone; a new flower should be spawned.
    FlowerSpawnDue,
    /// Signals that the autosave checkpoint cadence elapsed.
    AutosaveDue,
    /// Confirms that a fully grown plant was reaped.
    FlowerReaped {
        /// Cell that was cleared back to dirt.
        cell: CellCoord,
        /// Total number of flowers reaped so far.
        reaped_total: u32,
    },
    /// Fired exactly once when the win condition is first met.
    GameWon,
    /// Confirms that a snapshot replaced the live game state.
    SnapshotRestored {
        /// Whether the restored state had already won the game.
        won: bool,
    },
    /// Reports that a snapshot restore was rejected.
    SnapshotRejected {
        /// Grid byte length the configured dimensions require.
        expected: usize,
        /// Grid byte length the snapshot actually carried.
        actual: usize,
    },
}

/// Species a grid cell can hold; `Dirt` marks the absence of a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlantKind {
    /// First flower species.
    Rose,
    /// Second flower species.
    Tulip,
    /// Third flower species.
    Daisy,
    /// Bare soil without a plant.
    Dirt,
}

impl PlantKind {
    /// All plantable species, excluding dirt.
    pub const SPECIES: [PlantKind; 3] = [PlantKind::Rose, PlantKind::Tulip, PlantKind::Daisy];

    /// Byte stored in the packed grid for this kind.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Rose => 0,
            Self::Tulip => 1,
            Self::Daisy => 2,
            Self::Dirt => 3,
        }
    }

    /// Decodes a packed grid byte back into a plant kind.
    pub fn try_from_byte(byte: u8) -> Result<Self, PlantKindError> {
        match byte {
            0 => Ok(Self::Rose),
            1 => Ok(Self::Tulip),
            2 => Ok(Self::Daisy),
            3 => Ok(Self::Dirt),
            other => Err(PlantKindError::UnknownByte(other)),
        }
    }

    /// Parses a species name as used by host configuration.
    pub fn from_name(name: &str) -> Result<Self, PlantKindError> {
        match name {
            "rose" => Ok(Self::Rose),
            "tulip" => Ok(Self::Tulip),
            "daisy" => Ok(Self::Daisy),
            "dirt" => Ok(Self::Dirt),
            other => Err(PlantKindError::UnknownName(other.to_owned())),
        }
    }

    /// Reports whether this kind is bare soil.
    #[must_use]
    pub const fn is_dirt(self) -> bool {
        matches!(self, Self::Dirt)
    }
}

/// Validation failure raised when a plant kind cannot be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlantKindError {
    /// The packed byte does not name a known plant kind.
    #[error("byte {0} does not encode a plant kind")]
    UnknownByte(u8),
    /// The species name does not match any known plant kind.
    #[error("'{0}' is not a known plant kind")]
    UnknownName(String),
}

/// Logical view of the four packed bytes describing one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRecord {
    /// Sunlight level in `[0, 255]`.
    pub sun: u8,
    /// Water level in `[0, 255]`.
    pub water: u8,
    /// Species occupying the cell.
    pub kind: PlantKind,
    /// Growth level in `[0, 3]`; always 0 when the kind is dirt.
    pub growth: u8,
}

impl TileRecord {
    /// Creates a record describing bare soil with the given resources.
    #[must_use]
    pub const fn dirt(sun: u8, water: u8) -> Self {
        Self {
            sun,
            water,
            kind: PlantKind::Dirt,
            growth: 0,
        }
    }

    /// Reports whether the cell holds a living plant.
    #[must_use]
    pub const fn is_living(&self) -> bool {
        !self.kind.is_dirt()
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Neighbor visit order used by the growth rules: up, down, left, right.
    ///
    /// The order is never used for tie-breaking but must stay stable so
    /// replays remain reproducible.
    pub const SWEEP_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta applied by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies a direction offset, yielding `None` when it would leave
    /// the `rows x cols` grid.
    #[must_use]
    pub fn stepped(self, direction: Direction, rows: u32, cols: u32) -> Option<CellCoord> {
        let (d_row, d_col) = direction.offset();
        let row = self.row.checked_add_signed(d_row)?;
        let column = self.column.checked_add_signed(d_col)?;
        (row < rows && column < cols).then_some(CellCoord::new(column, row))
    }
}

/// Packed fixed-width record array holding per-cell simulation state.
///
/// Each cell occupies [`TILE_STRIDE`] bytes laid out as
/// `[sun, water, kind, growth]`, matching the persisted `gridState` layout
/// byte for byte. Accessors perform no allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileStore {
    rows: u32,
    cols: u32,
    bytes: Vec<u8>,
}

impl TileStore {
    /// Allocates a store of bare dirt cells for a `rows x cols` grid.
    ///
    /// # Panics
    ///
    /// Panics when either dimension is below [`MIN_GRID_EDGE`]; a grid
    /// without an interior is a configuration programming error.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        assert!(
            rows >= MIN_GRID_EDGE && cols >= MIN_GRID_EDGE,
            "grid must be at least {MIN_GRID_EDGE}x{MIN_GRID_EDGE}, got {rows}x{cols}"
        );
        let cell_count = rows as usize * cols as usize;
        let mut bytes = vec![0; cell_count * TILE_STRIDE];
        // Kind byte 0 encodes a rose; a fresh grid must read back as dirt.
        for cell in 0..cell_count {
            bytes[cell * TILE_STRIDE + 2] = PlantKind::Dirt.as_byte();
        }
        Self { rows, cols, bytes }
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Total length of the packed byte array.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Read-only view of the packed bytes, used for snapshot capture.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the packed bytes wholesale, used for snapshot restore.
    ///
    /// # Panics
    ///
    /// Panics when `bytes` does not match [`TileStore::byte_len`]; callers
    /// must validate the length before restoring.
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) {
        assert_eq!(
            bytes.len(),
            self.bytes.len(),
            "snapshot grid length does not match the configured grid"
        );
        self.bytes.copy_from_slice(bytes);
    }

    /// Byte offset of the record stored for `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range coordinates; grid access outside the
    /// configured dimensions is a programming error, not a recoverable
    /// condition.
    #[must_use]
    pub fn index(&self, row: u32, col: u32) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.rows,
            self.cols
        );
        (row as usize * self.cols as usize + col as usize) * TILE_STRIDE
    }

    /// Decodes the record stored for `(row, col)`.
    ///
    /// A dirt cell always reads back growth 0 regardless of the stored
    /// growth byte.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range coordinates or a corrupt kind byte.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> TileRecord {
        let index = self.index(row, col);
        let kind = match PlantKind::try_from_byte(self.bytes[index + 2]) {
            Ok(kind) => kind,
            Err(error) => panic!("corrupt tile at ({row}, {col}): {error}"),
        };
        TileRecord {
            sun: self.bytes[index],
            water: self.bytes[index + 1],
            kind,
            growth: if kind.is_dirt() {
                0
            } else {
                self.bytes[index + 3]
            },
        }
    }

    /// Writes the record stored for `(row, col)`.
    ///
    /// Sun and water are written verbatim and must already be clamped by
    /// the caller. Growth is stored clamped to [`MAX_GROWTH`]. Passing
    /// `None` for the kind clears the cell: it stores dirt with growth 0,
    /// deliberately discarding the passed growth value.
    ///
    /// # Panics
    ///
    /// Panics on out-of-range coordinates.
    pub fn set(
        &mut self,
        row: u32,
        col: u32,
        sun: u8,
        water: u8,
        kind: Option<PlantKind>,
        growth: u8,
    ) {
        let index = self.index(row, col);
        self.bytes[index] = sun;
        self.bytes[index + 1] = water;
        match kind {
            Some(kind) => {
                self.bytes[index + 2] = kind.as_byte();
                self.bytes[index + 3] = growth.min(MAX_GROWTH);
            }
            None => {
                self.bytes[index + 2] = PlantKind::Dirt.as_byte();
                self.bytes[index + 3] = 0;
            }
        }
    }

    /// Writes a whole record at `(row, col)`.
    pub fn set_record(&mut self, row: u32, col: u32, record: TileRecord) {
        self.set(
            row,
            col,
            record.sun,
            record.water,
            Some(record.kind),
            record.growth,
        );
    }

    /// Reports whether `(row, col)` lies strictly inside the border.
    ///
    /// Only interior cells are ever generated or simulated; the border
    /// stays at its zero-initialized default.
    #[must_use]
    pub const fn is_interior(&self, row: u32, col: u32) -> bool {
        row >= 1 && row < self.rows - 1 && col >= 1 && col < self.cols - 1
    }

    /// Iterates the interior cells in row-major order.
    pub fn interior_cells(&self) -> impl Iterator<Item = CellCoord> {
        let rows = self.rows;
        let cols = self.cols;
        (1..rows.saturating_sub(1)).flat_map(move |row| {
            (1..cols.saturating_sub(1)).map(move |col| CellCoord::new(col, row))
        })
    }
}

/// Player position in pixel coordinates, part of the snapshot wire format.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

/// Complete, serializable copy of all mutable game state at one instant.
///
/// Field names follow the persisted wire format exactly so saves round-trip
/// byte-compatibly between [`GameSnapshot`] and the key-value store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Flattened `rows * cols * 4` packed grid bytes.
    pub grid_state: Vec<u8>,
    /// Player position in pixel coordinates.
    pub player_position: PlayerPosition,
    /// Steps taken since the last five-step milestone.
    pub steps_taken: u32,
    /// Accumulated global water counter.
    pub water_level: u32,
    /// Number of fully grown plants reaped so far.
    pub reaped_flowers: u32,
    /// Whether the win condition has been met.
    pub won: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_record_round_trips_through_store() {
        let mut store = TileStore::new(4, 4);
        let record = TileRecord {
            sun: 7,
            water: 9,
            kind: PlantKind::Tulip,
            growth: 2,
        };
        store.set_record(2, 1, record);
        assert_eq!(store.get(2, 1), record);
    }

    #[test]
    fn fresh_store_reads_back_as_bare_dirt() {
        let store = TileStore::new(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(store.get(row, col), TileRecord::dirt(0, 0));
            }
        }
    }

    #[test]
    fn growth_above_cap_is_stored_clamped() {
        let mut store = TileStore::new(3, 3);
        store.set(1, 1, 4, 4, Some(PlantKind::Rose), 9);
        assert_eq!(store.get(1, 1).growth, MAX_GROWTH);
    }

    #[test]
    fn clearing_a_tile_discards_the_passed_growth() {
        let mut store = TileStore::new(3, 3);
        store.set(1, 1, 5, 6, None, 3);
        let record = store.get(1, 1);
        assert_eq!(record.kind, PlantKind::Dirt);
        assert_eq!(record.growth, 0);
        assert_eq!(record.sun, 5);
        assert_eq!(record.water, 6);
    }

    #[test]
    fn dirt_reads_zero_growth_regardless_of_stored_byte() {
        let mut store = TileStore::new(3, 3);
        store.set(1, 1, 0, 0, Some(PlantKind::Dirt), 2);
        assert_eq!(store.get(1, 1).growth, 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_access_fails_fast() {
        let store = TileStore::new(3, 3);
        let _ = store.get(3, 0);
    }

    #[test]
    #[should_panic(expected = "grid must be at least")]
    fn grid_without_interior_is_rejected() {
        let _ = TileStore::new(2, 8);
    }

    #[test]
    fn interior_iteration_skips_the_border() {
        let store = TileStore::new(4, 5);
        let cells: Vec<CellCoord> = store.interior_cells().collect();
        assert_eq!(cells.len(), 2 * 3);
        assert!(cells
            .iter()
            .all(|cell| store.is_interior(cell.row(), cell.column())));
    }

    #[test]
    fn unknown_plant_byte_is_rejected() {
        assert_eq!(
            PlantKind::try_from_byte(7),
            Err(PlantKindError::UnknownByte(7))
        );
    }

    #[test]
    fn plant_names_resolve_to_kinds() {
        assert_eq!(PlantKind::from_name("tulip"), Ok(PlantKind::Tulip));
        assert!(PlantKind::from_name("bamboo").is_err());
    }

    #[test]
    fn stepping_off_the_grid_yields_none() {
        let cell = CellCoord::new(0, 0);
        assert_eq!(cell.stepped(Direction::Up, 10, 10), None);
        assert_eq!(cell.stepped(Direction::Left, 10, 10), None);
        assert_eq!(
            cell.stepped(Direction::Down, 10, 10),
            Some(CellCoord::new(0, 1))
        );
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let snapshot = GameSnapshot {
            grid_state: vec![0; 16],
            player_position: PlayerPosition { x: 32.0, y: 96.0 },
            steps_taken: 3,
            water_level: 12,
            reaped_flowers: 2,
            won: false,
        };
        let json = serde_json::to_string(&snapshot).expect("snapshot serializes");
        for field in [
            "gridState",
            "playerPosition",
            "stepsTaken",
            "waterLevel",
            "reapedFlowers",
            "won",
        ] {
            assert!(json.contains(field), "missing wire field {field}");
        }
        let restored: GameSnapshot = serde_json::from_str(&json).expect("snapshot parses");
        assert_eq!(restored, snapshot);
    }
}
