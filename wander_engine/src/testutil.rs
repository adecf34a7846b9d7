//! Shared fixtures for unit tests.

use uuid::Uuid;
use wander_data::WorldDef;

use crate::idgen::{NAMESPACE_ACTION, uuid_from_token};
use crate::loader::build_world;
use crate::session::GameSession;
use crate::trigger::{Action, ActionKind};
use crate::world::World;

const CELLAR_RON: &str = include_str!("../tests/fixtures/cellar.ron");

pub fn cellar_def() -> WorldDef {
    ron::from_str(CELLAR_RON).expect("cellar fixture parses")
}

pub fn cellar_world() -> World {
    build_world(&cellar_def()).expect("cellar fixture builds")
}

pub fn cellar_session() -> GameSession {
    GameSession::new(cellar_world())
}

pub fn id(namespace: &Uuid, token: &str) -> Uuid {
    uuid_from_token(namespace, token)
}

/// Insert (or replace) a shared action and return its id.
pub fn add_action(world: &mut World, symbol: &str, enabled: bool, kind: ActionKind) -> Uuid {
    let id = uuid_from_token(&NAMESPACE_ACTION, symbol);
    world.actions.insert(
        id,
        Action {
            id,
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            enabled,
            forbidden_text: None,
            owner: None,
            kind,
        },
    );
    id
}
