//! Localized strings.
//!
//! Keys are dotted paths into two tables: `l10n.*` for visible labels and
//! `a11y.*` for assistive-technology text. Authored content overrides the
//! built-in English defaults key by key.

use std::collections::BTreeMap;

use crate::message::Message;

/// Placeholder replaced by the author name in `a11y.newMessageFrom`.
pub const USERNAME_PLACEHOLDER: &str = "@username";

const DEFAULTS: &[(&str, &str)] = &[
    ("l10n.noMessages", "No messages were set."),
    ("l10n.emptyMessage", "(empty message)"),
    ("l10n.ended", "End of conversation"),
    ("a11y.newMessage", "New message"),
    ("a11y.newMessageFrom", "New message from @username"),
    ("a11y.navigationBar", "Navigation"),
    ("a11y.step", "Show next message"),
    ("a11y.play", "Play conversation"),
    ("a11y.pause", "Pause conversation"),
    ("a11y.restart", "Restart conversation"),
];

#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Creates a dictionary holding only the built-in defaults.
    pub fn new() -> Self {
        let entries = DEFAULTS
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Self { entries }
    }

    /// Overlays a table of strings under `prefix` (e.g. `l10n`).
    ///
    /// Blank values are ignored so a half-translated content file keeps the
    /// defaults for the strings it left empty.
    pub fn fill<'a, I>(&mut self, prefix: &str, table: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in table {
            if value.trim().is_empty() {
                continue;
            }
            self.entries
                .insert(format!("{prefix}.{key}"), value.clone());
        }
    }

    /// Looks up a key; unknown keys come back verbatim.
    pub fn get(&self, key: &str) -> String {
        if let Some(value) = self.entries.get(key) {
            return value.clone();
        }
        tracing::warn!(key, "missing dictionary entry");
        key.to_string()
    }

    /// Announcement read out when a message is revealed.
    pub fn announcement_for(&self, message: &Message) -> String {
        let intro = match message.user_name.as_deref() {
            Some(name) if !name.is_empty() => self
                .get("a11y.newMessageFrom")
                .replace(USERNAME_PLACEHOLDER, name),
            _ => self.get("a11y.newMessage"),
        };
        format!("{intro}: {}", message.text)
    }
}
