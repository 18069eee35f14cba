#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded generation system for initial grid population and flower spawns.
//!
//! The system never mutates the world directly: it reads the packed tile
//! store and responds with `Command::PlantTile` batches for the world to
//! apply, which in turn broadcasts the tile placement events the host's
//! render sink consumes. All randomness flows through one ChaCha stream so
//! a fixed seed reproduces the same garden.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tilegarden_core::{CellCoord, Command, Event, PlantKind, TileRecord, TileStore};

/// Probability that an interior cell starts with a flower.
pub const DEFAULT_FLOWER_PROBABILITY: f64 = 0.3;

const RESOURCE_MAX: u8 = 10;

/// Raised when a flower spawn finds no vacant interior cell.
///
/// The grid can fill up completely during long games; reporting this
/// explicitly replaces an unbounded rejection-sampling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no vacant interior cell is available for a new flower")]
pub struct NoVacantCell;

/// Configuration parameters required to construct the generation system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    flower_probability: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided density and seed.
    #[must_use]
    pub const fn new(flower_probability: f64, rng_seed: u64) -> Self {
        Self {
            flower_probability,
            rng_seed,
        }
    }

    /// Default flower density with the provided seed.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(DEFAULT_FLOWER_PROBABILITY, rng_seed)
    }
}

/// Procedural generator for the initial garden and milestone flower spawns.
#[derive(Debug)]
pub struct Generation {
    rng: ChaCha8Rng,
    flower_probability: f64,
}

impl Generation {
    /// Creates a new generation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            flower_probability: config.flower_probability,
        }
    }

    /// Emits one placement command per interior cell.
    ///
    /// Each cell draws a single Bernoulli trial: success plants a uniformly
    /// random species with sun and water in `[0, 10]` and growth in
    /// `[1, 3]`; failure leaves dirt with random resources and growth 0.
    /// Border cells are never written. Called once at setup; reissuing the
    /// batch is safe since every command overwrites its cell.
    pub fn populate(&mut self, store: &TileStore, out: &mut Vec<Command>) {
        for cell in store.interior_cells() {
            let record = if self.rng.gen_bool(self.flower_probability) {
                self.random_flower()
            } else {
                TileRecord::dirt(self.random_resource(), self.random_resource())
            };
            out.push(Command::PlantTile { cell, record });
        }
    }

    /// Plants a fresh random flower on a uniformly random vacant interior
    /// cell, or reports [`NoVacantCell`] when the garden is full.
    pub fn spawn_flower(&mut self, store: &TileStore) -> Result<Command, NoVacantCell> {
        let vacant: Vec<CellCoord> = store
            .interior_cells()
            .filter(|cell| !store.get(cell.row(), cell.column()).is_living())
            .collect();
        let cell = *vacant.choose(&mut self.rng).ok_or(NoVacantCell)?;
        Ok(Command::PlantTile {
            cell,
            record: self.random_flower(),
        })
    }

    /// Consumes world events and responds with spawn commands.
    ///
    /// A `FlowerSpawnDue` milestone produces one spawn command; a full
    /// garden is reported and skipped rather than retried.
    pub fn handle(&mut self, events: &[Event], store: &TileStore, out: &mut Vec<Command>) {
        for event in events {
            if matches!(event, Event::FlowerSpawnDue) {
                match self.spawn_flower(store) {
                    Ok(command) => out.push(command),
                    Err(error) => log::warn!("flower spawn skipped: {error}"),
                }
            }
        }
    }

    fn random_flower(&mut self) -> TileRecord {
        let kind = *PlantKind::SPECIES
            .choose(&mut self.rng)
            .expect("species table is never empty");
        TileRecord {
            sun: self.random_resource(),
            water: self.random_resource(),
            kind,
            growth: self.rng.gen_range(1..=3),
        }
    }

    fn random_resource(&mut self) -> u8 {
        self.rng.gen_range(0..=RESOURCE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_covers_exactly_the_interior() {
        let store = TileStore::new(6, 7);
        let mut generation = Generation::new(Config::with_seed(11));
        let mut commands = Vec::new();
        generation.populate(&store, &mut commands);

        assert_eq!(commands.len(), 4 * 5);
        for command in &commands {
            match command {
                Command::PlantTile { cell, .. } => {
                    assert!(store.is_interior(cell.row(), cell.column()));
                }
                other => panic!("unexpected command emitted: {other:?}"),
            }
        }
    }

    #[test]
    fn populate_is_deterministic_for_the_same_seed() {
        let store = TileStore::new(10, 10);
        let mut first = Vec::new();
        let mut second = Vec::new();
        Generation::new(Config::with_seed(42)).populate(&store, &mut first);
        Generation::new(Config::with_seed(42)).populate(&store, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn generated_records_stay_within_their_ranges() {
        let store = TileStore::new(10, 10);
        let mut commands = Vec::new();
        Generation::new(Config::with_seed(7)).populate(&store, &mut commands);
        for command in &commands {
            let Command::PlantTile { record, .. } = command else {
                panic!("unexpected command");
            };
            assert!(record.sun <= RESOURCE_MAX);
            assert!(record.water <= RESOURCE_MAX);
            if record.is_living() {
                assert!((1..=3).contains(&record.growth));
            } else {
                assert_eq!(record.growth, 0);
            }
        }
    }

    #[test]
    fn full_probability_fills_every_interior_cell_with_flowers() {
        let store = TileStore::new(5, 5);
        let mut commands = Vec::new();
        Generation::new(Config::new(1.0, 3)).populate(&store, &mut commands);
        assert!(commands.iter().all(|command| matches!(
            command,
            Command::PlantTile { record, .. } if record.is_living()
        )));
    }

    #[test]
    fn spawn_targets_a_vacant_interior_cell() {
        let mut store = TileStore::new(5, 5);
        for cell in store.interior_cells().collect::<Vec<_>>() {
            store.set(
                cell.row(),
                cell.column(),
                0,
                0,
                Some(PlantKind::Tulip),
                1,
            );
        }
        store.set(2, 3, 0, 0, None, 0);

        let mut generation = Generation::new(Config::with_seed(5));
        let command = generation.spawn_flower(&store).expect("one cell is vacant");
        let Command::PlantTile { cell, record } = command else {
            panic!("unexpected command");
        };
        assert_eq!(cell, CellCoord::new(3, 2));
        assert!(record.is_living());
    }

    #[test]
    fn spawn_reports_a_full_garden() {
        let mut store = TileStore::new(4, 4);
        for cell in store.interior_cells().collect::<Vec<_>>() {
            store.set(cell.row(), cell.column(), 0, 0, Some(PlantKind::Rose), 2);
        }
        let mut generation = Generation::new(Config::with_seed(9));
        assert_eq!(generation.spawn_flower(&store), Err(NoVacantCell));
    }

    #[test]
    fn handle_reacts_only_to_spawn_milestones() {
        let store = TileStore::new(5, 5);
        let mut generation = Generation::new(Config::with_seed(21));
        let mut commands = Vec::new();
        generation.handle(
            &[Event::AutosaveDue, Event::FlowerSpawnDue],
            &store,
            &mut commands,
        );
        assert_eq!(commands.len(), 1);
    }
}
