#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal host that drives the Tilegarden core.
//!
//! Owns everything the core treats as a collaborator: input handling, the
//! move-transition busy flag, the tile renderer, and the on-disk snapshot
//! store standing in for browser localStorage.

mod session;
mod store;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tilegarden_core::Command;
use tilegarden_system_generation::{Config, Generation};
use tilegarden_system_history::History;
use tilegarden_world::{self as world, World};

use session::Session;
use store::FileStore;

#[derive(Debug, Parser)]
#[command(name = "tilegarden", about = "A tiny terminal farming game")]
struct Args {
    /// Number of grid rows, border included.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(3..))]
    rows: u32,

    /// Number of grid columns, border included.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(3..))]
    cols: u32,

    /// Seed for the garden generator; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// File backing the save slots and the autosave.
    #[arg(long, default_value = "tilegarden-saves.json")]
    save_file: PathBuf,

    /// Maximum number of undo snapshots retained.
    #[arg(long, default_value_t = tilegarden_system_history::DEFAULT_DEPTH)]
    history_depth: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut game_world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut game_world,
        Command::ConfigureGrid {
            rows: args.rows,
            cols: args.cols,
            tile_length: 64.0,
        },
        &mut events,
    );

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("garden seed {seed}");

    let generation = Generation::new(Config::with_seed(seed));
    let history = History::with_depth(args.history_depth);
    let store = FileStore::open(args.save_file)?;

    Session::new(game_world, generation, history, store).run()
}
