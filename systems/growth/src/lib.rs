#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure growth rules for the tile grid.
//!
//! Two distinct growth policies coexist and stay separately callable: the
//! neighbor-gated [`step`] rule applied on every committed move, and the
//! unconditional [`mature`] bump applied on the five-step milestone. The
//! world triggers them; this crate never mutates state itself.

use tilegarden_core::{CellCoord, Direction, PlantKind, TileRecord, TileStore, MAX_GROWTH};

/// Sun level a plant must exceed before the neighbor-gated rule applies.
pub const SUN_THRESHOLD: u8 = 5;

/// Water level a plant must exceed before the neighbor-gated rule applies.
pub const WATER_THRESHOLD: u8 = 5;

/// Minimum count of living neighbors required for gated growth.
pub const COMMUNITY_MINIMUM: usize = 2;

/// Tileset id used for bare soil and for anything unrecognized.
pub const DIRT_TILE_ID: u16 = 26;

/// Collects the von-Neumann neighbors of `(row, col)`.
///
/// Directions are visited in the fixed order up, down, left, right with
/// out-of-bounds directions omitted, so border-adjacent cells yield fewer
/// than four records. The order is not used for tie-breaking but must stay
/// stable for reproducibility.
#[must_use]
pub fn neighbors(store: &TileStore, row: u32, col: u32) -> Vec<TileRecord> {
    let cell = CellCoord::new(col, row);
    Direction::SWEEP_ORDER
        .iter()
        .filter_map(|direction| cell.stepped(*direction, store.rows(), store.cols()))
        .map(|neighbor| store.get(neighbor.row(), neighbor.column()))
        .collect()
}

/// Counts neighbors holding a living plant.
#[must_use]
pub fn living_neighbors(neighbors: &[TileRecord]) -> usize {
    neighbors.iter().filter(|tile| tile.is_living()).count()
}

/// Applies the neighbor-gated growth rule to a single tile.
///
/// Growth requires both adequate resources and community: sun and water
/// above their thresholds plus at least [`COMMUNITY_MINIMUM`] living
/// neighbors. Returns the incremented growth level, capped at
/// [`MAX_GROWTH`], or `None` when the tile is dirt or the conditions are
/// not met. Growth never decreases.
#[must_use]
pub fn step(tile: TileRecord, neighbors: &[TileRecord]) -> Option<u8> {
    if !tile.is_living() {
        return None;
    }
    let gated = tile.sun > SUN_THRESHOLD
        && tile.water > WATER_THRESHOLD
        && living_neighbors(neighbors) >= COMMUNITY_MINIMUM;
    gated.then(|| (tile.growth + 1).min(MAX_GROWTH))
}

/// Applies the unconditional milestone bump to a single tile.
///
/// Any living plant below full growth gains one level; dirt and fully
/// grown plants are left untouched.
#[must_use]
pub fn mature(tile: TileRecord) -> Option<u8> {
    (tile.is_living() && tile.growth < MAX_GROWTH).then(|| tile.growth + 1)
}

/// Maps a plant kind and growth level to the tileset id presenting it.
///
/// Fixed lookup table, treated as configuration data: roses show bare soil
/// until they reach their first growth level, the other species always show
/// their sprite, and dirt shows the soil tile.
#[must_use]
pub const fn render_tile_id(kind: PlantKind, growth: u8) -> u16 {
    match kind {
        PlantKind::Rose => {
            if growth > 0 {
                3
            } else {
                DIRT_TILE_ID
            }
        }
        PlantKind::Tulip => 4,
        PlantKind::Daisy => 5,
        PlantKind::Dirt => DIRT_TILE_ID,
    }
}
