use tilegarden_core::{CellCoord, Command, Event};
use tilegarden_system_generation::{Config, Generation};
use tilegarden_world::{self as world, query, World};

fn configured_world(rows: u32, cols: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            rows,
            cols,
            tile_length: 64.0,
        },
        &mut events,
    );
    world
}

#[test]
fn populate_places_tiles_and_leaves_the_border_untouched() {
    let mut world = configured_world(10, 10);
    let mut generation = Generation::new(Config::with_seed(0x5eed));

    let mut commands = Vec::new();
    generation.populate(query::tile_store(&world), &mut commands);
    assert_eq!(commands.len(), 8 * 8);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let placements = events
        .iter()
        .filter(|event| matches!(event, Event::TileChanged { .. }))
        .count();
    assert_eq!(placements, 8 * 8, "one placement event per written cell");

    let store = query::tile_store(&world);
    for index in 0..10u32 {
        for (row, col) in [(0, index), (9, index), (index, 0), (index, 9)] {
            let tile = store.get(row, col);
            assert!(tile.kind.is_dirt(), "border cell ({row}, {col}) was written");
            assert_eq!(tile.growth, 0);
        }
    }
}

#[test]
fn milestone_event_produces_one_spawned_flower() {
    let mut world = configured_world(6, 6);
    let mut generation = Generation::new(Config::with_seed(77));

    let mut commands = Vec::new();
    generation.handle(
        &[Event::FlowerSpawnDue],
        query::tile_store(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);

    let Command::PlantTile { cell, record } = commands[0].clone() else {
        panic!("unexpected command emitted");
    };
    let mut events = Vec::new();
    world::apply(&mut world, commands[0].clone(), &mut events);

    let planted = query::tile(&world, CellCoord::new(cell.column(), cell.row()));
    assert_eq!(planted, record);
    assert!(planted.is_living());
    assert!((1..=3).contains(&planted.growth));
}

#[test]
fn identical_seeds_replay_identical_gardens() {
    let mut first = configured_world(10, 10);
    let mut second = configured_world(10, 10);

    for world in [&mut first, &mut second] {
        let mut generation = Generation::new(Config::with_seed(0xabcd));
        let mut commands = Vec::new();
        generation.populate(query::tile_store(world), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }

    assert_eq!(
        query::snapshot(&first),
        query::snapshot(&second),
        "generation diverged between identically seeded runs"
    );
}
