use std::{
    collections::VecDeque,
    io::{self, Write},
};

use anyhow::Result;
use tilegarden_core::{Command, Direction, Event, GameSnapshot};
use tilegarden_rendering::{self as rendering, RenderSink};
use tilegarden_system_generation::Generation;
use tilegarden_system_growth::DIRT_TILE_ID;
use tilegarden_system_history::History;
use tilegarden_system_persistence as persistence;
use tilegarden_world::{self as world, query, World};

use crate::store::FileStore;

const HELP: &str = "w/a/s/d move, r reap, 1/2 save slot, l load, z undo, y redo, q quit";

/// Terminal tilemap standing in for the engine's tile layer.
#[derive(Debug)]
pub(crate) struct TerminalRenderer {
    rows: u32,
    cols: u32,
    glyphs: Vec<char>,
}

impl TerminalRenderer {
    pub(crate) fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            glyphs: vec!['.'; rows as usize * cols as usize],
        }
    }

    fn glyph_at(&self, row: u32, col: u32) -> char {
        self.glyphs[(row * self.cols + col) as usize]
    }
}

impl RenderSink for TerminalRenderer {
    fn place_tile(&mut self, render_id: u16, column: u32, row: u32) {
        if row >= self.rows || column >= self.cols {
            return;
        }
        let glyph = match render_id {
            3 => 'R',
            4 => 'T',
            5 => 'D',
            DIRT_TILE_ID => '.',
            _ => '?',
        };
        self.glyphs[(row * self.cols + column) as usize] = glyph;
    }
}

/// Interactive game session owning the world and its collaborators.
pub(crate) struct Session {
    world: World,
    generation: Generation,
    history: History,
    store: FileStore,
    renderer: TerminalRenderer,
    busy: bool,
    won_announced: bool,
}

impl Session {
    pub(crate) fn new(
        world: World,
        generation: Generation,
        history: History,
        store: FileStore,
    ) -> Self {
        let grid = query::tile_grid(&world);
        let renderer = TerminalRenderer::new(grid.rows(), grid.cols());
        Self {
            world,
            generation,
            history,
            store,
            renderer,
            busy: false,
            won_announced: false,
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        self.start()?;
        println!("{HELP}");
        loop {
            self.draw();
            let line = prompt("> ")?;
            let Some(key) = line.trim().chars().next() else {
                continue;
            };
            match key {
                'w' => self.step(Direction::Up),
                's' => self.step(Direction::Down),
                'a' => self.step(Direction::Left),
                'd' => self.step(Direction::Right),
                'r' => self.run_command(Command::Reap),
                '1' => self.save_slot(persistence::SLOT_ONE),
                '2' => self.save_slot(persistence::SLOT_TWO),
                'l' => self.load_prompt()?,
                'z' => self.undo(),
                'y' => self.redo(),
                'q' => break,
                _ => println!("{HELP}"),
            }
        }
        Ok(())
    }

    /// Either resumes the autosave checkpoint or generates a fresh garden.
    fn start(&mut self) -> Result<()> {
        let resumed = persistence::startup_resume(&self.store, || {
            prompt("Continue where you left off? [y/N] ")
                .map(|answer| answer.trim().eq_ignore_ascii_case("y"))
                .unwrap_or(false)
        });
        match resumed {
            Some(snapshot) => self.restore_or_populate(snapshot),
            None => self.populate_garden(),
        }
        Ok(())
    }

    /// Restores the checkpoint, falling back to a fresh garden when the
    /// snapshot does not fit the configured grid. Without the fallback a
    /// rejected checkpoint would leave the session on an empty garden.
    fn restore_or_populate(&mut self, snapshot: GameSnapshot) {
        let events = self.dispatch(Command::RestoreSnapshot { snapshot });
        if events
            .iter()
            .any(|event| matches!(event, Event::SnapshotRejected { .. }))
        {
            self.populate_garden();
        }
    }

    fn populate_garden(&mut self) {
        let mut commands = Vec::new();
        self.generation
            .populate(query::tile_store(&self.world), &mut commands);
        for command in commands {
            self.run_command(command);
        }
    }

    /// One player step: the pre-move state is recorded, the transition
    /// begins, and the mutation commits when the transition elapses. The
    /// busy flag rejects move input while a transition is in flight.
    fn step(&mut self, direction: Direction) {
        if self.busy {
            return;
        }
        self.history.record(query::snapshot(&self.world));
        self.busy = true;
        self.run_command(Command::BeginMove { direction });
        // The terminal has no animation timer; the transition elapses
        // immediately and the move commits atomically.
        self.run_command(Command::CompleteMove);
        self.busy = false;
    }

    fn save_slot(&mut self, slot: &str) {
        let snapshot = query::snapshot(&self.world);
        persistence::save(&mut self.store, &mut self.history, slot, &snapshot);
        println!("Game saved to {slot}.");
    }

    fn load_prompt(&mut self) -> Result<()> {
        let answer = prompt("Load which slot? [1/2] ")?;
        let slot = if answer.trim() == "2" {
            persistence::SLOT_TWO
        } else {
            persistence::SLOT_ONE
        };
        match persistence::load(&self.store, slot) {
            Ok(snapshot) => {
                self.history.record(query::snapshot(&self.world));
                self.run_command(Command::RestoreSnapshot { snapshot });
                println!("Game loaded from {slot}.");
            }
            Err(error) => log::warn!("{error}"),
        }
        Ok(())
    }

    fn undo(&mut self) {
        match self.history.undo(query::snapshot(&self.world)) {
            Ok(snapshot) => self.run_command(Command::RestoreSnapshot { snapshot }),
            Err(error) => log::info!("{error}"),
        }
    }

    fn redo(&mut self) {
        match self.history.redo(query::snapshot(&self.world)) {
            Ok(snapshot) => self.run_command(Command::RestoreSnapshot { snapshot }),
            Err(error) => log::info!("{error}"),
        }
    }

    fn run_command(&mut self, command: Command) {
        let _ = self.dispatch(command);
    }

    /// Applies a command, presents its events and runs follow-up work,
    /// returning the full event batch.
    ///
    /// Spawn requests queue further commands so the autosave that may be
    /// due in the same batch captures the spawned flower as well.
    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut queue = VecDeque::from([command]);
        let mut batch = Vec::new();
        let mut autosave_due = false;

        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            rendering::present(&events, &mut self.renderer);

            for event in &events {
                match event {
                    Event::FlowerSpawnDue => {
                        let mut spawned = Vec::new();
                        self.generation.handle(
                            std::slice::from_ref(event),
                            query::tile_store(&self.world),
                            &mut spawned,
                        );
                        queue.extend(spawned);
                    }
                    Event::AutosaveDue => autosave_due = true,
                    Event::GameWon => self.announce_win(),
                    Event::SnapshotRestored { won: true } => self.announce_win(),
                    Event::SnapshotRejected { expected, actual } => {
                        log::warn!(
                            "snapshot rejected: expected {expected} grid bytes, got {actual}"
                        );
                    }
                    _ => {}
                }
            }
            batch.extend(events);
        }

        if autosave_due {
            let snapshot = query::snapshot(&self.world);
            persistence::autosave(&mut self.store, &mut self.history, &snapshot);
        }
        batch
    }

    fn announce_win(&mut self) {
        if !self.won_announced {
            self.won_announced = true;
            println!("You Win!");
        }
    }

    fn draw(&self) {
        let player = query::player_cell(&self.world);
        for row in 0..self.renderer.rows {
            let mut line = String::with_capacity(self.renderer.cols as usize);
            for col in 0..self.renderer.cols {
                if player.row() == row && player.column() == col {
                    line.push('@');
                } else {
                    line.push(self.renderer.glyph_at(row, col));
                }
            }
            println!("{line}");
        }
        let counters = query::counters(&self.world);
        println!(
            "steps {}  water {}  reaped {}{}",
            counters.steps_taken,
            counters.water_level,
            counters.reaped_flowers,
            if counters.won { "  (won)" } else { "" }
        );
    }
}

fn prompt(text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line)?;
    Ok(line)
}
