use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a WorldDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    ForeignLayer { option: String, layer: String, conversation: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::ForeignLayer {
                option,
                layer,
                conversation,
            } => {
                write!(
                    f,
                    "option '{option}' targets layer '{layer}' outside of conversation '{conversation}'"
                )
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

struct IdSets<'a> {
    locations: &'a HashSet<&'a str>,
    ways: &'a HashSet<&'a str>,
    items: &'a HashSet<&'a str>,
    inventory_items: &'a HashSet<&'a str>,
    persons: &'a HashSet<&'a str>,
    conversations: &'a HashSet<&'a str>,
    options: &'a HashSet<&'a str>,
    actions: &'a HashSet<&'a str>,
    /// layer id -> owning conversation id
    layers: &'a HashMap<&'a str, &'a str>,
    /// option id -> owning conversation id
    option_owners: &'a HashMap<&'a str, &'a str>,
}

/// Validate cross-references and basic invariants in a WorldDef.
///
/// ```
/// use wander_data::{LocationDef, PlayerDef, WorldDef, validate_world};
///
/// let world = WorldDef {
///     player: PlayerDef {
///         name: "Explorer".into(),
///         start_location: "hall".into(),
///         inventory: Vec::new(),
///     },
///     locations: vec![LocationDef {
///         id: "hall".into(),
///         name: "Hall".into(),
///         description: "A draughty hall.".into(),
///     }],
///     ..WorldDef::default()
/// };
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut locations = HashSet::new();
    let mut ways = HashSet::new();
    let mut items = HashSet::new();
    let mut inventory_items = HashSet::new();
    let mut persons = HashSet::new();
    let mut conversations = HashSet::new();
    let mut layer_ids = HashSet::new();
    let mut options = HashSet::new();
    let mut actions = HashSet::new();

    track_ids(
        "location",
        world.locations.iter().map(|l| l.id.as_str()),
        &mut locations,
        &mut errors,
    );
    track_ids("way", world.ways.iter().map(|w| w.id.as_str()), &mut ways, &mut errors);
    track_ids("item", world.items.iter().map(|i| i.id.as_str()), &mut items, &mut errors);
    track_ids(
        "inventory item",
        world.inventory_items.iter().map(|i| i.id.as_str()),
        &mut inventory_items,
        &mut errors,
    );
    track_ids(
        "person",
        world.persons.iter().map(|p| p.id.as_str()),
        &mut persons,
        &mut errors,
    );
    track_ids(
        "conversation",
        world.conversations.iter().map(|c| c.id.as_str()),
        &mut conversations,
        &mut errors,
    );
    track_ids(
        "conversation layer",
        world.conversations.iter().flat_map(|c| c.layers.iter().map(|l| l.id.as_str())),
        &mut layer_ids,
        &mut errors,
    );
    track_ids(
        "conversation option",
        world
            .conversations
            .iter()
            .flat_map(|c| c.layers.iter())
            .flat_map(|l| l.options.iter().map(|o| o.id.as_str())),
        &mut options,
        &mut errors,
    );
    track_ids(
        "action",
        world.actions.iter().map(|a| a.id.as_str()),
        &mut actions,
        &mut errors,
    );

    let layers: HashMap<&str, &str> = world
        .conversations
        .iter()
        .flat_map(|c| c.layers.iter().map(move |l| (l.id.as_str(), c.id.as_str())))
        .collect();
    let option_owners: HashMap<&str, &str> = world
        .conversations
        .iter()
        .flat_map(|c| {
            c.layers
                .iter()
                .flat_map(|l| l.options.iter())
                .map(move |o| (o.id.as_str(), c.id.as_str()))
        })
        .collect();

    let ids = IdSets {
        locations: &locations,
        ways: &ways,
        items: &items,
        inventory_items: &inventory_items,
        persons: &persons,
        conversations: &conversations,
        options: &options,
        actions: &actions,
        layers: &layers,
        option_owners: &option_owners,
    };

    if world.player.start_location.trim().is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "player start location missing".to_string(),
        });
    } else {
        check_ref(
            "location",
            &world.player.start_location,
            ids.locations,
            "player start location".to_string(),
            &mut errors,
        );
    }
    for inv in &world.player.inventory {
        check_ref(
            "inventory item",
            inv,
            ids.inventory_items,
            "player inventory".to_string(),
            &mut errors,
        );
    }

    for way in &world.ways {
        let context = format!("way '{}'", way.id);
        check_ref("location", &way.from, ids.locations, context.clone(), &mut errors);
        check_ref("location", &way.to, ids.locations, context.clone(), &mut errors);
        check_actions(&way.moving.actions, &ids, &context, &mut errors);
        check_actions(&way.inspect.actions, &ids, &context, &mut errors);
    }

    for item in &world.items {
        let context = format!("item '{}'", item.id);
        if let Some(location) = &item.location {
            check_ref("location", location, ids.locations, context.clone(), &mut errors);
        }
        for granted in &item.take.add_inventory_items {
            check_ref(
                "inventory item",
                granted,
                ids.inventory_items,
                context.clone(),
                &mut errors,
            );
        }
        check_actions(&item.take.actions, &ids, &context, &mut errors);
        check_actions(&item.usage.actions, &ids, &context, &mut errors);
        check_actions(&item.inspect.actions, &ids, &context, &mut errors);
    }

    for inv in &world.inventory_items {
        let context = format!("inventory item '{}'", inv.id);
        check_actions(&inv.usage.actions, &ids, &context, &mut errors);
        check_actions(&inv.inspect.actions, &ids, &context, &mut errors);
        let mut partners = HashSet::new();
        for interaction in &inv.interactions {
            check_partner(&interaction.partner, &ids, &context, &mut errors);
            if !partners.insert(&interaction.partner) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} lists partner '{}' twice", interaction.partner.id()),
                });
            }
            if interaction.partner == PartnerDef::InventoryItem(inv.id.clone()) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} cannot be combined with itself"),
                });
            }
            check_actions(&interaction.actions, &ids, &context, &mut errors);
        }
    }

    for person in &world.persons {
        let context = format!("person '{}'", person.id);
        if let Some(location) = &person.location {
            check_ref("location", location, ids.locations, context.clone(), &mut errors);
        }
        if let Some(conversation) = &person.talk.conversation {
            check_ref(
                "conversation",
                conversation,
                ids.conversations,
                context.clone(),
                &mut errors,
            );
        }
        check_actions(&person.talk.actions, &ids, &context, &mut errors);
        check_actions(&person.inspect.actions, &ids, &context, &mut errors);
    }

    for conversation in &world.conversations {
        validate_conversation(conversation, &ids, &mut errors);
    }

    for action in &world.actions {
        validate_action(action, &ids, &mut errors);
    }

    errors
}

fn validate_conversation(conversation: &ConversationDef, ids: &IdSets, errors: &mut Vec<ValidationError>) {
    let context = format!("conversation '{}'", conversation.id);
    if let Some(start) = &conversation.start_layer {
        check_layer_owner(start, &conversation.id, &context, ids, errors);
    }
    for layer in &conversation.layers {
        for option in &layer.options {
            if let Some(target) = &option.target {
                let context = format!("option '{}'", option.id);
                check_option_target(&option.id, target, &conversation.id, &context, ids, errors);
            }
            check_actions(&option.actions, ids, &format!("option '{}'", option.id), errors);
        }
    }
}

fn validate_action(action: &ActionDef, ids: &IdSets, errors: &mut Vec<ValidationError>) {
    let context = format!("action '{}'", action.id);
    match &action.kind {
        ActionKindDef::AddInventoryItems { items } => {
            for item in items {
                check_ref("inventory item", item, ids.inventory_items, context.clone(), errors);
            }
        },
        ActionKindDef::RemoveInventoryItem { item } | ActionKindDef::ChangeInventoryItem { item, .. } => {
            check_ref("inventory item", item, ids.inventory_items, context, errors);
        },
        ActionKindDef::RemoveItem { item } => check_ref("item", item, ids.items, context, errors),
        ActionKindDef::Move { way } => check_ref("way", way, ids.ways, context, errors),
        ActionKindDef::Take {
            item,
            add_inventory_items,
            ..
        } => {
            check_ref("item", item, ids.items, context.clone(), errors);
            for granted in add_inventory_items {
                check_ref("inventory item", granted, ids.inventory_items, context.clone(), errors);
            }
        },
        ActionKindDef::Multi { actions } => {
            check_actions(actions, ids, &context, errors);
            if actions.iter().any(|child| child == &action.id) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} contains itself"),
                });
            }
        },
        ActionKindDef::ChangeAction { action: target, .. } => {
            check_ref("action", target, ids.actions, context, errors);
        },
        ActionKindDef::ChangeItem { item, patch } => {
            check_ref("item", item, ids.items, context.clone(), errors);
            if let Some(RelocationDef::To(location)) = &patch.relocation {
                check_ref("location", location, ids.locations, context, errors);
            }
        },
        ActionKindDef::ChangePerson { person, patch } => {
            check_ref("person", person, ids.persons, context.clone(), errors);
            if let Some(RelocationDef::To(location)) = &patch.relocation {
                check_ref("location", location, ids.locations, context.clone(), errors);
            }
            if let Some(conversation) = &patch.conversation {
                check_ref("conversation", conversation, ids.conversations, context, errors);
            }
        },
        ActionKindDef::ChangeLocation { location, .. } => {
            check_ref("location", location, ids.locations, context, errors);
        },
        ActionKindDef::ChangeWay { way, .. } => check_ref("way", way, ids.ways, context, errors),
        ActionKindDef::ChangeConversation { conversation, patch } => {
            check_ref("conversation", conversation, ids.conversations, context.clone(), errors);
            if let Some(start) = &patch.start_layer {
                check_layer_owner(start, conversation, &context, ids, errors);
            }
        },
        ActionKindDef::ChangeConversationOption { option, patch } => {
            check_ref("conversation option", option, ids.options, context.clone(), errors);
            if let Some(target) = &patch.target {
                match ids.option_owners.get(option.as_str()) {
                    Some(conversation) => check_option_target(option, target, conversation, &context, ids, errors),
                    None if !ids.layers.contains_key(target.as_str()) => {
                        errors.push(ValidationError::MissingReference {
                            kind: "conversation layer",
                            id: target.clone(),
                            context,
                        });
                    },
                    None => {},
                }
            }
        },
        ActionKindDef::ChangeInteraction { item, partner, .. } => {
            check_ref("inventory item", item, ids.inventory_items, context.clone(), errors);
            check_partner(partner, ids, &context, errors);
        },
        ActionKindDef::EndGame { .. } => {},
    }
}

fn check_layer_owner(layer: &str, conversation: &str, context: &str, ids: &IdSets, errors: &mut Vec<ValidationError>) {
    match ids.layers.get(layer) {
        None => errors.push(ValidationError::MissingReference {
            kind: "conversation layer",
            id: layer.to_string(),
            context: context.to_string(),
        }),
        Some(owner) if *owner != conversation => errors.push(ValidationError::InvalidValue {
            context: format!("{context}: start layer '{layer}' belongs to conversation '{owner}'"),
        }),
        Some(_) => {},
    }
}

/// An option may only lead to a layer of its own conversation.
fn check_option_target(
    option: &str,
    target: &str,
    conversation: &str,
    context: &str,
    ids: &IdSets,
    errors: &mut Vec<ValidationError>,
) {
    match ids.layers.get(target) {
        None => errors.push(ValidationError::MissingReference {
            kind: "conversation layer",
            id: target.to_string(),
            context: context.to_string(),
        }),
        Some(owner) if *owner != conversation => errors.push(ValidationError::ForeignLayer {
            option: option.to_string(),
            layer: target.to_string(),
            conversation: conversation.to_string(),
        }),
        Some(_) => {},
    }
}

fn check_partner(partner: &PartnerDef, ids: &IdSets, context: &str, errors: &mut Vec<ValidationError>) {
    let (kind, set) = match partner {
        PartnerDef::InventoryItem(_) => ("inventory item", ids.inventory_items),
        PartnerDef::Item(_) => ("item", ids.items),
        PartnerDef::Person(_) => ("person", ids.persons),
    };
    check_ref(kind, partner.id(), set, context.to_string(), errors);
}

fn check_actions(actions: &[Id], ids: &IdSets, context: &str, errors: &mut Vec<ValidationError>) {
    for action in actions {
        check_ref("action", action, ids.actions, context.to_string(), errors);
    }
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<&str>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_world() -> WorldDef {
        WorldDef {
            player: PlayerDef {
                name: "Tester".into(),
                start_location: "hall".into(),
                inventory: Vec::new(),
            },
            locations: vec![
                LocationDef {
                    id: "hall".into(),
                    name: "Hall".into(),
                    description: String::new(),
                },
                LocationDef {
                    id: "cellar".into(),
                    name: "Cellar".into(),
                    description: String::new(),
                },
            ],
            ..WorldDef::default()
        }
    }

    fn option(id: &str, target: Option<&str>) -> OptionDef {
        OptionDef {
            id: id.into(),
            text: "Hello".into(),
            answer: "Hi".into(),
            enabled: true,
            disable_after_chosen: false,
            target: target.map(str::to_string),
            actions: Vec::new(),
        }
    }

    #[test]
    fn valid_world_has_no_errors() {
        assert!(validate_world(&base_world()).is_empty());
    }

    #[test]
    fn missing_start_location_is_reported() {
        let mut world = base_world();
        world.player.start_location = "attic".into();
        let errors = validate_world(&world);
        assert_eq!(
            errors,
            vec![ValidationError::MissingReference {
                kind: "location",
                id: "attic".into(),
                context: "player start location".into(),
            }]
        );
    }

    #[test]
    fn duplicate_location_ids_are_reported() {
        let mut world = base_world();
        world.locations.push(world.locations[0].clone());
        let errors = validate_world(&world);
        assert!(errors.contains(&ValidationError::DuplicateId {
            kind: "location",
            id: "hall".into(),
        }));
    }

    #[test]
    fn option_targeting_other_conversation_is_rejected() {
        let mut world = base_world();
        world.conversations = vec![
            ConversationDef {
                id: "first".into(),
                greeting: None,
                farewell: None,
                start_layer: Some("first_root".into()),
                layers: vec![LayerDef {
                    id: "first_root".into(),
                    options: vec![option("jump", Some("second_root"))],
                }],
            },
            ConversationDef {
                id: "second".into(),
                greeting: None,
                farewell: None,
                start_layer: Some("second_root".into()),
                layers: vec![LayerDef {
                    id: "second_root".into(),
                    options: vec![option("bye", None)],
                }],
            },
        ];
        let errors = validate_world(&world);
        assert_eq!(
            errors,
            vec![ValidationError::ForeignLayer {
                option: "jump".into(),
                layer: "second_root".into(),
                conversation: "first".into(),
            }]
        );
    }

    #[test]
    fn option_patch_targeting_other_conversation_is_rejected() {
        let mut world = base_world();
        world.conversations = vec![
            ConversationDef {
                id: "first".into(),
                greeting: None,
                farewell: None,
                start_layer: Some("first_root".into()),
                layers: vec![LayerDef {
                    id: "first_root".into(),
                    options: vec![option("stay", Some("first_root"))],
                }],
            },
            ConversationDef {
                id: "second".into(),
                greeting: None,
                farewell: None,
                start_layer: Some("second_root".into()),
                layers: vec![LayerDef {
                    id: "second_root".into(),
                    options: vec![option("bye", None)],
                }],
            },
        ];
        world.actions.push(ActionDef {
            id: "redirect".into(),
            name: String::new(),
            enabled: true,
            forbidden_text: None,
            kind: ActionKindDef::ChangeConversationOption {
                option: "stay".into(),
                patch: OptionPatchDef {
                    target: Some("second_root".into()),
                    ..OptionPatchDef::default()
                },
            },
        });
        let errors = validate_world(&world);
        assert_eq!(
            errors,
            vec![ValidationError::ForeignLayer {
                option: "stay".into(),
                layer: "second_root".into(),
                conversation: "first".into(),
            }]
        );
    }

    #[test]
    fn self_containing_multi_action_is_rejected() {
        let mut world = base_world();
        world.actions.push(ActionDef {
            id: "loop".into(),
            name: String::new(),
            enabled: true,
            forbidden_text: None,
            kind: ActionKindDef::Multi {
                actions: vec!["loop".into()],
            },
        });
        let errors = validate_world(&world);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn unknown_action_reference_names_context() {
        let mut world = base_world();
        world.items.push(ItemDef {
            id: "lamp".into(),
            name: "Lamp".into(),
            description: String::new(),
            location: Some("hall".into()),
            identifiers: vec!["lamp".into()],
            take: TakeDef {
                actions: vec!["ghost".into()],
                ..TakeDef::default()
            },
            usage: UsageDef::default(),
            inspect: InspectDef::default(),
        });
        let errors = validate_world(&world);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "missing action 'ghost' (item 'lamp')");
    }
}
