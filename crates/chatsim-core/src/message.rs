//! Sanitized message records.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};

/// Side of the conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Left,
    Right,
}

impl Origin {
    pub fn opposite(self) -> Self {
        match self {
            Origin::Left => Origin::Right,
            Origin::Right => Origin::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Left => "left",
            Origin::Right => "right",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown next to a chat bubble, resolved against the content directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconImage {
    pub path: PathBuf,
}

/// One authored message, ready to be sequenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub origin: Origin,
    pub user_name: Option<String>,
    pub background_color: Rgb,
    pub text_color: Rgb,
    pub icon_image: Option<IconImage>,
}

impl Message {
    /// Message with neutral colors and no author, mostly useful in tests.
    pub fn plain(text: impl Into<String>, origin: Origin) -> Self {
        let background_color = color::FALLBACK_COLOR;
        Self {
            text: text.into(),
            origin,
            user_name: None,
            background_color,
            text_color: color::default_contrast_color(background_color),
            icon_image: None,
        }
    }
}
