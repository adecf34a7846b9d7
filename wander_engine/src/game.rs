//! Game-wide settings: title, command templates, default texts and colors.

use serde::{Deserialize, Serialize};
use wander_data::{ColorsDef, CommandsDef, TextsDef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Game {
    pub title: String,
    pub author: String,
    pub start_text: String,
    pub end_text: Option<String>,
    pub commands: CommandsDef,
    pub texts: TextsDef,
    pub colors: ColorsDef,
}
