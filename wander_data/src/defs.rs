use serde::{Deserialize, Serialize};

/// Stable identifier used across WorldDef references.
pub type Id = String;

fn default_true() -> bool {
    true
}

/// Top-level authored world data loaded by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    #[serde(default)]
    pub game: GameDef,
    pub player: PlayerDef,
    #[serde(default)]
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub ways: Vec<WayDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub inventory_items: Vec<InventoryItemDef>,
    #[serde(default)]
    pub persons: Vec<PersonDef>,
    #[serde(default)]
    pub conversations: Vec<ConversationDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

/// Game-level metadata, command phrasings, default texts and colors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameDef {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub start_text: String,
    #[serde(default)]
    pub end_text: Option<String>,
    #[serde(default)]
    pub commands: CommandsDef,
    #[serde(default)]
    pub texts: TextsDef,
    #[serde(default)]
    pub colors: ColorsDef,
}

/// Built-in command templates, one list per command kind.
///
/// Templates use lowercase words, optional `[bracketed ]` literals and the
/// parameter markers `<A>` and `<B>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsDef {
    pub exit: Vec<String>,
    pub help: Vec<String>,
    pub look_around: Vec<String>,
    pub inventory: Vec<String>,
    pub inspect: Vec<String>,
    pub take: Vec<String>,
    pub talk_to: Vec<String>,
    pub move_to: Vec<String>,
    pub use_item: Vec<String>,
    pub use_with_combine: Vec<String>,
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for CommandsDef {
    fn default() -> Self {
        Self {
            exit: strings(&["exit", "quit"]),
            help: strings(&["help", "commands"]),
            look_around: strings(&["look around", "look"]),
            inventory: strings(&["inventory", "inv"]),
            inspect: strings(&["inspect [the ]<A>", "look at [the ]<A>", "examine [the ]<A>"]),
            take: strings(&["take [the ]<A>", "pick up [the ]<A>", "get [the ]<A>"]),
            talk_to: strings(&["talk to <A>", "talk with <A>", "speak with <A>"]),
            move_to: strings(&["go to [the ]<A>", "go through [the ]<A>", "enter [the ]<A>", "go <A>"]),
            use_item: strings(&["use [the ]<A>"]),
            use_with_combine: strings(&[
                "use [the ]<A> with [the ]<B>",
                "use [the ]<A> on [the ]<B>",
                "combine [the ]<A> with [the ]<B>",
                "combine [the ]<A> and [the ]<B>",
            ]),
        }
    }
}

/// Game-wide default messages.
///
/// Messages may contain `<identifier>`, `<name>` (first object) and
/// `<identifier2>`, `<name2>` (second object) placeholders, each also in a
/// capitalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextsDef {
    pub no_valid_command: String,
    pub invalid_command: String,
    pub no_such_item: String,
    pub no_such_inventory_item: String,
    pub no_such_person: String,
    pub no_such_way: String,
    pub no_such_inspectable: String,
    pub no_such_usable: String,
    pub no_such_partner: String,
    pub not_takeable: String,
    pub taken: String,
    pub not_usable: String,
    pub used: String,
    pub not_travelable: String,
    pub moved: String,
    pub inspection: String,
    pub not_talking: String,
    pub no_conversation: String,
    pub not_usable_with: String,
    pub used_with: String,
    pub inventory_header: String,
    pub inventory_empty: String,
    pub help_header: String,
    pub exit: String,
    pub game_over: String,
    pub items_here: String,
    pub persons_here: String,
    pub ways_out: String,
    pub choose_option: String,
    pub invalid_choice: String,
}

impl Default for TextsDef {
    fn default() -> Self {
        Self {
            no_valid_command: "I don't understand what you want to do.".into(),
            invalid_command: "You can't do that with the <name>.".into(),
            no_such_item: "There is no <identifier> here.".into(),
            no_such_inventory_item: "You don't carry any <identifier>.".into(),
            no_such_person: "There is nobody called <identifier> here.".into(),
            no_such_way: "You can't go to <identifier> from here.".into(),
            no_such_inspectable: "There is no <identifier> to look at.".into(),
            no_such_usable: "There is no <identifier> you could use.".into(),
            no_such_partner: "There is no <identifier2> here.".into(),
            not_takeable: "You can't take the <name>.".into(),
            taken: "You take the <name>.".into(),
            not_usable: "You can't use the <name>.".into(),
            used: "You use the <name>. Nothing happens.".into(),
            not_travelable: "You can't go through the <name> right now.".into(),
            moved: "You go through the <name>.".into(),
            inspection: "There is nothing special about the <name>.".into(),
            not_talking: "<Name> does not want to talk to you.".into(),
            no_conversation: "<Name> has nothing to say.".into(),
            not_usable_with: "You can't use the <name> with the <name2>.".into(),
            used_with: "You use the <name> with the <name2>. Nothing happens.".into(),
            inventory_header: "You are carrying:".into(),
            inventory_empty: "You are not carrying anything.".into(),
            help_header: "You can use the following commands:".into(),
            exit: "Goodbye!".into(),
            game_over: "The game is over.".into(),
            items_here: "You see:".into(),
            persons_here: "People here:".into(),
            ways_out: "Ways out:".into(),
            choose_option: "Choose an option by its number.".into(),
            invalid_choice: "That is not one of the options.".into(),
        }
    }
}

/// Terminal colors available for message categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalColor {
    #[default]
    Plain,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Foreground / background pair for one message category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPairDef {
    #[serde(default)]
    pub foreground: TerminalColor,
    #[serde(default)]
    pub background: TerminalColor,
}

/// Colors for successful, neutral and failed outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsDef {
    pub success: ColorPairDef,
    pub neutral: ColorPairDef,
    pub failure: ColorPairDef,
}

impl Default for ColorsDef {
    fn default() -> Self {
        Self {
            success: ColorPairDef {
                foreground: TerminalColor::BrightGreen,
                background: TerminalColor::Plain,
            },
            neutral: ColorPairDef::default(),
            failure: ColorPairDef {
                foreground: TerminalColor::BrightRed,
                background: TerminalColor::Plain,
            },
        }
    }
}

/// Player definition: starting point and starting inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerDef {
    #[serde(default)]
    pub name: String,
    pub start_location: Id,
    #[serde(default)]
    pub inventory: Vec<Id>,
}

/// A place the player can be in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Inspection behaviour shared by every inspectable object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectDef {
    pub text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Id>,
}

/// A one-directional connection between two locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WayDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub from: Id,
    pub to: Id,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub moving: MoveDef,
    #[serde(default)]
    pub inspect: InspectDef,
}

/// Move behaviour of a way. `enabled` and `forbidden_text` belong to the
/// way's own move action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveDef {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Id>,
}

impl Default for MoveDef {
    fn default() -> Self {
        Self {
            enabled: true,
            forbidden_text: None,
            successful_text: None,
            custom_commands: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// An object lying around in a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Id>,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub take: TakeDef,
    #[serde(default)]
    pub usage: UsageDef,
    #[serde(default)]
    pub inspect: InspectDef,
}

/// Take behaviour of an item. `enabled` and `forbidden_text` belong to the
/// item's own take action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeDef {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
    pub remove_item: bool,
    pub add_inventory_items: Vec<Id>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Id>,
}

impl Default for TakeDef {
    fn default() -> Self {
        Self {
            enabled: false,
            forbidden_text: None,
            successful_text: None,
            remove_item: true,
            add_inventory_items: Vec::new(),
            custom_commands: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// Use behaviour of items and inventory items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageDef {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Id>,
}

/// An object the player carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub usage: UsageDef,
    #[serde(default)]
    pub inspect: InspectDef,
    #[serde(default)]
    pub interactions: Vec<InteractionDef>,
}

/// The second object of a use-with or combine command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerDef {
    InventoryItem(Id),
    Item(Id),
    Person(Id),
}

impl PartnerDef {
    pub fn id(&self) -> &str {
        match self {
            PartnerDef::InventoryItem(id) | PartnerDef::Item(id) | PartnerDef::Person(id) => id,
        }
    }
}

/// Use-with (partner is an item or person) or combine (partner is an
/// inventory item) information attached to an inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionDef {
    pub partner: PartnerDef,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub forbidden_text: Option<String>,
    #[serde(default)]
    pub successful_text: Option<String>,
    #[serde(default)]
    pub custom_commands: Vec<String>,
    #[serde(default)]
    pub actions: Vec<Id>,
}

/// A character the player may talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Id>,
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub talk: TalkDef,
    #[serde(default)]
    pub inspect: InspectDef,
}

/// Talk-to behaviour of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkDef {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub conversation: Option<Id>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Id>,
}

impl Default for TalkDef {
    fn default() -> Self {
        Self {
            enabled: true,
            forbidden_text: None,
            conversation: None,
            custom_commands: Vec::new(),
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDef {
    pub id: Id,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub farewell: Option<String>,
    #[serde(default)]
    pub start_layer: Option<Id>,
    #[serde(default)]
    pub layers: Vec<LayerDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    pub id: Id,
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

/// One line the player can say. `target: None` ends the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDef {
    pub id: Id,
    pub text: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub disable_after_chosen: bool,
    #[serde(default)]
    pub target: Option<Id>,
    #[serde(default)]
    pub actions: Vec<Id>,
}

/// Three-state instruction used by change actions to flip a boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Enabling {
    #[default]
    DoNotChange,
    Enable,
    Disable,
}

/// A shared action that can be referenced from any action list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub forbidden_text: Option<String>,
    pub kind: ActionKindDef,
}

/// Every kind of action an author can define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKindDef {
    AddInventoryItems {
        items: Vec<Id>,
    },
    RemoveInventoryItem {
        item: Id,
    },
    RemoveItem {
        item: Id,
    },
    Move {
        way: Id,
    },
    Take {
        item: Id,
        #[serde(default = "default_true")]
        remove_item: bool,
        #[serde(default)]
        add_inventory_items: Vec<Id>,
    },
    Multi {
        actions: Vec<Id>,
    },
    ChangeAction {
        action: Id,
        enabling: Enabling,
    },
    ChangeItem {
        item: Id,
        patch: ItemPatchDef,
    },
    ChangeInventoryItem {
        item: Id,
        patch: InventoryItemPatchDef,
    },
    ChangePerson {
        person: Id,
        patch: PersonPatchDef,
    },
    ChangeLocation {
        location: Id,
        patch: LocationPatchDef,
    },
    ChangeWay {
        way: Id,
        patch: WayPatchDef,
    },
    ChangeConversation {
        conversation: Id,
        patch: ConversationPatchDef,
    },
    ChangeConversationOption {
        option: Id,
        patch: OptionPatchDef,
    },
    ChangeInteraction {
        item: Id,
        partner: PartnerDef,
        patch: InteractionPatchDef,
    },
    EndGame {
        #[serde(default)]
        text: Option<String>,
    },
}

/// Where a change action puts an item or person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelocationDef {
    To(Id),
    Remove,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatchDef {
    pub name: Option<String>,
    pub description: Option<String>,
    pub taking: Enabling,
    pub take_forbidden_text: Option<String>,
    pub take_successful_text: Option<String>,
    pub using: Enabling,
    pub use_forbidden_text: Option<String>,
    pub use_successful_text: Option<String>,
    pub inspection_text: Option<String>,
    pub relocation: Option<RelocationDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItemPatchDef {
    pub name: Option<String>,
    pub description: Option<String>,
    pub using: Enabling,
    pub use_forbidden_text: Option<String>,
    pub use_successful_text: Option<String>,
    pub inspection_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonPatchDef {
    pub name: Option<String>,
    pub description: Option<String>,
    pub talking: Enabling,
    pub talk_forbidden_text: Option<String>,
    pub conversation: Option<Id>,
    pub relocation: Option<RelocationDef>,
    pub inspection_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationPatchDef {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WayPatchDef {
    pub name: Option<String>,
    pub description: Option<String>,
    pub moving: Enabling,
    pub move_forbidden_text: Option<String>,
    pub move_successful_text: Option<String>,
    pub inspection_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationPatchDef {
    pub greeting: Option<String>,
    pub farewell: Option<String>,
    pub start_layer: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionPatchDef {
    pub enabling: Enabling,
    pub disable_after_chosen: Enabling,
    pub text: Option<String>,
    pub answer: Option<String>,
    pub target: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionPatchDef {
    pub enabling: Enabling,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_world_parses_with_defaults() {
        let text = r#"(
            player: (start_location: "hall"),
            locations: [(id: "hall", name: "Hall")],
            items: [(id: "lamp", name: "Lamp", location: Some("hall"), identifiers: ["lamp"])],
        )"#;
        let world: WorldDef = ron::from_str(text).expect("minimal world parses");
        assert_eq!(world.player.start_location, "hall");
        assert_eq!(world.game.commands, CommandsDef::default());
        assert!(world.items[0].take.remove_item);
        assert!(!world.items[0].take.enabled);
        assert!(world.ways.is_empty());
    }

    #[test]
    fn action_kinds_parse_from_ron() {
        let text = r#"(
            id: "open_gate",
            kind: ChangeWay(way: "gate", patch: (moving: Enable, move_forbidden_text: Some("Still shut."))),
        )"#;
        let action: ActionDef = ron::from_str(text).expect("action parses");
        assert!(action.enabled);
        match action.kind {
            ActionKindDef::ChangeWay { way, patch } => {
                assert_eq!(way, "gate");
                assert_eq!(patch.moving, Enabling::Enable);
                assert_eq!(patch.move_forbidden_text.as_deref(), Some("Still shut."));
                assert!(patch.name.is_none());
            },
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn partner_id_is_shared_across_variants() {
        assert_eq!(PartnerDef::Item("door".into()).id(), "door");
        assert_eq!(PartnerDef::Person("guard".into()).id(), "guard");
        assert_eq!(PartnerDef::InventoryItem("rope".into()).id(), "rope");
    }
}
