#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Wander **
//! Text adventure runner

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use wander_engine::repl::{InputManager, command_terms};
use wander_engine::store::{MemoryStore, RonSnapshotStore, WorldStore, load_snapshot};
use wander_engine::style::Palette;
use wander_engine::view::{ConsoleOutput, title_banner};
use wander_engine::{GameSession, Terminal, load_world, load_world_from, run_repl};

/// Play a Wander text adventure.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// World file (RON) to play; defaults to the bundled data/world.ron.
    #[arg(long, value_name = "PATH")]
    world: Option<PathBuf>,

    /// Continue from a snapshot written by an earlier --save.
    #[arg(long, value_name = "PATH", conflicts_with = "world")]
    resume: Option<PathBuf>,

    /// Write a snapshot of the world to this file after every command.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Start: loading Wander world...");
    let world = match (&args.resume, &args.world) {
        (Some(snapshot), _) => load_snapshot(snapshot).context("while resuming from snapshot")?,
        (None, Some(path)) => load_world_from(path).context("while loading World")?,
        (None, None) => load_world().context("while loading World")?,
    };
    info!("World loaded successfully.");

    let store: Box<dyn WorldStore> = match args.save {
        Some(path) => {
            info!("saving snapshots to {}", path.display());
            Box::new(RonSnapshotStore::new(path))
        },
        None => Box::new(MemoryStore::new()),
    };

    let palette = Palette::new(world.game.colors);
    let terms = command_terms(&world);
    let banner = title_banner(&world.game.title, &world.game.author);
    let mut session = GameSession::with_store(world, store);
    let mut terminal = Terminal::new(Box::new(InputManager::new(terms)), Box::new(ConsoleOutput::new(palette)));

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;
    info!("Starting the game!");
    println!("{banner}\n");

    run_repl(&mut session, &mut terminal)
}
