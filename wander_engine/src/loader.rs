//! Loader utilities for building a `World` from serialized data.
//!
//! World content comes from a single `WorldDef` RON file. Loading runs three
//! gates before the world is handed to a session: reference validation in
//! `wander_data`, an authoring check of every command template and identifier,
//! and a cycle check over the action graph.

pub mod worlddef;

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use wander_data::{ActionKindDef, WorldDef};

use crate::command::DISPATCH_ORDER;
use crate::data_paths::data_path;
use crate::entity_search::identifier_regex;
use crate::error::EngineError;
use crate::loader::worlddef::{build_world_from_def, load_worlddef};
use crate::parser::validate_template;
use crate::trigger::{check_action_graph, propagate_disabled_multis};
use crate::world::{World, WorldObject};

/// Load the bundled `world.ron` from the data directory.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or authoring defects.
pub fn load_world() -> Result<World> {
    load_world_from(&data_path("world.ron"))
}

/// Load and build a world from a specific RON file.
///
/// # Errors
/// See [`load_world`].
pub fn load_world_from(path: &Path) -> Result<World> {
    let worlddef = load_worlddef(path).context("while loading worlddef from file")?;
    build_world(&worlddef)
}

/// Validate a `WorldDef` and build the runtime world from it.
///
/// # Errors
/// - missing or duplicate references
/// - malformed command templates or identifiers
/// - cycles in the action graph
pub fn build_world(def: &WorldDef) -> Result<World> {
    validate_worlddef(def)?;
    let mut world = build_world_from_def(def).context("while building world from worlddef")?;
    check_authoring(&world, def)?;
    check_action_graph(&world).context("while checking action graph")?;
    propagate_disabled_multis(&mut world).context("while propagating disabled actions")?;

    info!("{} locations added to World", world.locations.len());
    info!("{} ways added to World", world.ways.len());
    info!("{} items added to World", world.items.len());
    info!("{} inventory items added to World", world.inventory_items.len());
    info!("{} persons added to World", world.persons.len());
    info!("{} conversations added to World", world.conversations.len());
    info!("{} actions added to World", world.actions.len());
    info!(
        "player \"{}\" starts in '{}'",
        world.player.name,
        world.player_location()?.symbol
    );
    Ok(world)
}

/// Validate the WorldDef and return a single aggregated error.
fn validate_worlddef(def: &WorldDef) -> Result<()> {
    let errors = wander_data::validate_world(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("worlddef validation failed:\n{details}");
}

/// Check everything the engine would otherwise only discover mid-game.
fn check_authoring(world: &World, def: &WorldDef) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    for kind in DISPATCH_ORDER {
        for template in kind.builtin_templates(&world.game.commands) {
            if let Err(source) = validate_template(template, kind.arity()) {
                errors.push(
                    EngineError::Template {
                        kind,
                        template: template.clone(),
                        source,
                    }
                    .to_string(),
                );
            }
        }
        for (owner, templates) in world.custom_command_sources(kind) {
            for template in templates {
                if let Err(source) = validate_template(template, kind.arity()) {
                    let err = EngineError::Template {
                        kind,
                        template: template.clone(),
                        source,
                    };
                    errors.push(format!("{err} (on '{}')", world.object_name(owner)));
                }
            }
        }
    }

    let objects: Vec<&dyn WorldObject> = world
        .items
        .values()
        .map(|i| i as &dyn WorldObject)
        .chain(world.inventory_items.values().map(|i| i as &dyn WorldObject))
        .chain(world.persons.values().map(|p| p as &dyn WorldObject))
        .chain(world.ways.values().map(|w| w as &dyn WorldObject))
        .collect();
    for object in objects {
        if let Err(err) = identifier_regex(object.identifiers()) {
            errors.push(format!("{err} (on '{}')", object.symbol()));
        }
    }

    for action in &def.actions {
        if let ActionKindDef::ChangeInteraction { item, partner, .. } = &action.kind {
            let declared = def
                .inventory_items
                .iter()
                .find(|i| &i.id == item)
                .is_some_and(|i| i.interactions.iter().any(|x| &x.partner == partner));
            if !declared {
                errors.push(format!(
                    "action '{}' changes an interaction of '{item}' with '{}' that is not declared",
                    action.id,
                    partner.id()
                ));
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }
    errors.sort();
    let details = errors.iter().map(|e| format!("- {e}")).collect::<Vec<_>>().join("\n");
    bail!("world authoring check failed:\n{details}");
}
