// Genre Type Definitions
// Styles offered to the prompt panel

use serde::{Deserialize, Serialize};

/// A beat style the generator can be asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Stable id sent with prompts (e.g., "lofi")
    pub id: String,

    /// Display name
    pub name: String,

    /// Emoji shown next to the name
    pub emoji: String,

    /// One-line character of the style
    pub description: String,
}

impl Genre {
    pub fn new(id: &str, name: &str, emoji: &str, description: &str) -> Self {
        Genre {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            description: description.to_string(),
        }
    }
}
