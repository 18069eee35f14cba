#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilegarden.
//!
//! The world owns every piece of mutable game state: the packed tile grid,
//! the player position, the step and resource counters and the win flag.
//! Hosts drive it exclusively through [`apply`], which commits each command
//! atomically and broadcasts [`Event`] values; the [`query`] module exposes
//! read-only views, including full [`GameSnapshot`] capture for history and
//! persistence.

use tilegarden_core::{
    CellCoord, Command, Event, GameSnapshot, PlayerPosition, TileStore, MAX_GROWTH,
};
use tilegarden_system_growth as growth;

const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_GRID_COLS: u32 = 10;
const DEFAULT_TILE_LENGTH: f32 = 64.0;

/// Number of committed steps that make up one growth milestone.
pub const MILESTONE_STEPS: u32 = 5;
/// Water counter bonus granted at every milestone.
pub const MILESTONE_WATER_BONUS: u32 = 2;
/// Autosave checkpoint cadence measured in committed steps.
pub const AUTOSAVE_CADENCE: u32 = 4;
/// Number of reaped flowers required to win the game.
pub const WIN_REAP_TARGET: u32 = 5;

/// Describes the discrete tile layout of the garden.
#[derive(Clone, Debug)]
pub struct TileGrid {
    rows: u32,
    cols: u32,
    tile_length: f32,
}

impl TileGrid {
    const fn new(rows: u32, cols: u32, tile_length: f32) -> Self {
        Self {
            rows,
            cols,
            tile_length,
        }
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

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Pixel coordinates of the center of the given tile.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> PlayerPosition {
        PlayerPosition {
            x: cell.column() as f32 * self.tile_length + self.tile_length / 2.0,
            y: cell.row() as f32 * self.tile_length + self.tile_length / 2.0,
        }
    }

    /// Tile containing the given pixel position.
    #[must_use]
    pub fn tile_at(&self, position: PlayerPosition) -> CellCoord {
        let col = (position.x / self.tile_length).floor() as u32;
        let row = (position.y / self.tile_length).floor() as u32;
        CellCoord::new(col.min(self.cols - 1), row.min(self.rows - 1))
    }
}

/// Explicit lifecycle phase the world is currently in.
///
/// Mutation always commits synchronously inside [`apply`]; the phases exist
/// so a move transition can stay in flight on the host side without any
/// core logic running per frame, and so reentrant move input is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The grid has not been configured yet.
    Setup,
    /// Waiting for the next player action.
    InputWait,
    /// A move transition is in flight; only `CompleteMove` may commit.
    TransitionInFlight,
}

/// Represents the authoritative Tilegarden world state.
#[derive(Debug)]
pub struct World {
    tile_grid: TileGrid,
    store: TileStore,
    player: PlayerPosition,
    pending_move: Option<CellCoord>,
    phase: Phase,
    steps_taken: u32,
    water_level: u32,
    reaped_flowers: u32,
    won: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new world awaiting grid configuration.
    #[must_use]
    pub fn new() -> Self {
        let tile_grid = TileGrid::new(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLS, DEFAULT_TILE_LENGTH);
        let store = TileStore::new(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLS);
        let player = tile_grid.tile_center(start_cell(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLS));
        Self {
            tile_grid,
            store,
            player,
            pending_move: None,
            phase: Phase::Setup,
            steps_taken: 0,
            water_level: 0,
            reaped_flowers: 0,
            won: false,
        }
    }

    fn player_cell(&self) -> CellCoord {
        self.tile_grid.tile_at(self.player)
    }

    /// Milestone bump: every living plant below full growth gains a level.
    fn mature_interior(&mut self, out_events: &mut Vec<Event>) {
        for cell in self.store.interior_cells() {
            let tile = self.store.get(cell.row(), cell.column());
            if let Some(new_growth) = growth::mature(tile) {
                self.store.set(
                    cell.row(),
                    cell.column(),
                    tile.sun,
                    tile.water,
                    Some(tile.kind),
                    new_growth,
                );
                out_events.push(Event::TileChanged {
                    cell,
                    render_id: growth::render_tile_id(tile.kind, new_growth),
                });
            }
        }
    }

    /// Per-move sweep: the neighbor-gated rule, applied in place in
    /// row-major order so later cells observe earlier updates.
    fn sweep_interior(&mut self, out_events: &mut Vec<Event>) {
        for cell in self.store.interior_cells() {
            let tile = self.store.get(cell.row(), cell.column());
            let neighbors = growth::neighbors(&self.store, cell.row(), cell.column());
            if let Some(new_growth) = growth::step(tile, &neighbors) {
                if new_growth == tile.growth {
                    continue;
                }
                self.store.set(
                    cell.row(),
                    cell.column(),
                    tile.sun,
                    tile.water,
                    Some(tile.kind),
                    new_growth,
                );
                out_events.push(Event::TileChanged {
                    cell,
                    render_id: growth::render_tile_id(tile.kind, new_growth),
                });
            }
        }
    }

    /// Replays a tile placement event for every interior cell so the host
    /// can rebuild its tilemap after a restore.
    fn replay_interior(&self, out_events: &mut Vec<Event>) {
        for cell in self.store.interior_cells() {
            let tile = self.store.get(cell.row(), cell.column());
            out_events.push(Event::TileChanged {
                cell,
                render_id: growth::render_tile_id(tile.kind, tile.growth),
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            rows,
            cols,
            tile_length,
        } => {
            assert!(
                tile_length.is_finite() && tile_length > 0.0,
                "tile length must be finite and positive, got {tile_length}"
            );
            world.store = TileStore::new(rows, cols);
            world.tile_grid = TileGrid::new(rows, cols, tile_length);
            world.player = world.tile_grid.tile_center(start_cell(rows, cols));
            world.pending_move = None;
            world.phase = Phase::InputWait;
            world.steps_taken = 0;
            world.water_level = 0;
            world.reaped_flowers = 0;
            world.won = false;
            out_events.push(Event::GridConfigured { rows, cols });
        }
        Command::PlantTile { cell, record } => {
            world.store.set_record(cell.row(), cell.column(), record);
            out_events.push(Event::TileChanged {
                cell,
                render_id: growth::render_tile_id(record.kind, record.growth),
            });
        }
        Command::BeginMove { direction } => {
            if world.phase != Phase::InputWait {
                return;
            }
            let from = world.player_cell();
            let Some(to) =
                from.stepped(direction, world.tile_grid.rows(), world.tile_grid.cols())
            else {
                return;
            };
            world.pending_move = Some(to);
            world.phase = Phase::TransitionInFlight;
            out_events.push(Event::MoveStarted { from, to });
        }
        Command::CompleteMove => {
            if world.phase != Phase::TransitionInFlight {
                return;
            }
            let Some(destination) = world.pending_move.take() else {
                return;
            };
            world.player = world.tile_grid.tile_center(destination);
            world.phase = Phase::InputWait;
            world.steps_taken += 1;

            if world.steps_taken >= MILESTONE_STEPS {
                world.mature_interior(out_events);
                out_events.push(Event::FlowerSpawnDue);
                world.steps_taken = 0;
                world.water_level += MILESTONE_WATER_BONUS;
            }

            world.sweep_interior(out_events);

            if world.steps_taken % AUTOSAVE_CADENCE == 0 {
                out_events.push(Event::AutosaveDue);
            }

            out_events.push(Event::MoveCompleted { cell: destination });
        }
        Command::Reap => {
            let cell = world.player_cell();
            let tile = world.store.get(cell.row(), cell.column());
            if tile.growth != MAX_GROWTH {
                return;
            }
            world.water_level += u32::from(tile.water);
            world
                .store
                .set(cell.row(), cell.column(), tile.sun, tile.water, None, 0);
            world.reaped_flowers += 1;
            out_events.push(Event::TileChanged {
                cell,
                render_id: growth::DIRT_TILE_ID,
            });
            out_events.push(Event::FlowerReaped {
                cell,
                reaped_total: world.reaped_flowers,
            });
            if world.reaped_flowers >= WIN_REAP_TARGET && !world.won {
                world.won = true;
                out_events.push(Event::GameWon);
            }
        }
        Command::RestoreSnapshot { snapshot } => {
            let expected = world.store.byte_len();
            if snapshot.grid_state.len() != expected {
                out_events.push(Event::SnapshotRejected {
                    expected,
                    actual: snapshot.grid_state.len(),
                });
                return;
            }
            world.store.copy_from_bytes(&snapshot.grid_state);
            world.player = snapshot.player_position;
            world.steps_taken = snapshot.steps_taken;
            world.water_level = snapshot.water_level;
            world.reaped_flowers = snapshot.reaped_flowers;
            world.won = snapshot.won;
            world.pending_move = None;
            world.phase = Phase::InputWait;
            world.replay_interior(out_events);
            out_events.push(Event::SnapshotRestored { won: world.won });
        }
    }
}

fn start_cell(rows: u32, cols: u32) -> CellCoord {
    CellCoord::new(cols / 2, rows / 2)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Phase, TileGrid, World};
    use tilegarden_core::{CellCoord, GameSnapshot, PlayerPosition, TileRecord, TileStore};

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Reports the lifecycle phase the world is currently in.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Decodes the record stored at the given cell.
    #[must_use]
    pub fn tile(world: &World, cell: CellCoord) -> TileRecord {
        world.store.get(cell.row(), cell.column())
    }

    /// Provides read-only access to the packed tile store.
    #[must_use]
    pub fn tile_store(world: &World) -> &TileStore {
        &world.store
    }

    /// Tile currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player_cell()
    }

    /// Player position in pixel coordinates.
    #[must_use]
    pub fn player_position(world: &World) -> PlayerPosition {
        world.player
    }

    /// Aggregated game counters exposed for presentation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Counters {
        /// Steps committed since the last milestone reset.
        pub steps_taken: u32,
        /// Accumulated global water counter.
        pub water_level: u32,
        /// Number of fully grown plants reaped so far.
        pub reaped_flowers: u32,
        /// Whether the win condition has been met.
        pub won: bool,
    }

    /// Captures the current counter values.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        Counters {
            steps_taken: world.steps_taken,
            water_level: world.water_level,
            reaped_flowers: world.reaped_flowers,
            won: world.won,
        }
    }

    /// Captures a complete snapshot of the mutable game state.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            grid_state: world.store.as_bytes().to_vec(),
            player_position: world.player,
            steps_taken: world.steps_taken,
            water_level: world.water_level,
            reaped_flowers: world.reaped_flowers,
            won: world.won,
        }
    }
}
