//! The bundled world must load and be playable.

use std::path::Path;

use wander_engine::repl::ScriptedInput;
use wander_engine::view::MemoryOutput;
use wander_engine::{GameSession, Terminal, load_world_from, run_repl};

fn bundled_world() -> wander_engine::World {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/world.ron");
    load_world_from(&path).expect("bundled world loads")
}

#[test]
fn bundled_world_loads() {
    let world = bundled_world();
    assert!(!world.game.title.is_empty());
    assert!(world.player_location().is_ok());
}

#[test]
fn bundled_world_answers_help() {
    let mut session = GameSession::new(bundled_world());
    let output = MemoryOutput::new();
    let mut terminal = Terminal::new(Box::new(ScriptedInput::new(["help"])), Box::new(output.clone()));
    run_repl(&mut session, &mut terminal).unwrap();
    assert!(output.contains(&session.world.game.texts.help_header));
}

#[test]
fn bundled_world_serializes_to_json() {
    let world = bundled_world();
    let json = serde_json::to_string(&world).expect("world serializes");
    let back: wander_engine::World = serde_json::from_str(&json).expect("world deserializes");
    assert_eq!(back.actions.len(), world.actions.len());
}
