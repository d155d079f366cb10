//! Authored content parameters and their sanitizer.
//!
//! Content files use the camelCase layout of the host's `content.json`
//! (`messages`, `visuals`, `behaviour`, `l10n`, `a11y`) and may be written
//! as JSON or TOML. Loading is strict about the file being parseable and
//! lenient about individual messages: broken entries are dropped or patched
//! up instead of failing the whole presentation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{self, Rgb};
use crate::core::sequencer::StartBehavior;
use crate::dictionary::Dictionary;
use crate::host::ContentId;
use crate::message::{IconImage, Message, Origin};

/// Origin of the first message when it is left on `auto`.
pub const DEFAULT_START_ORIGIN: Origin = Origin::Right;

const DEFAULT_LEFT_BACKGROUND: Rgb = Rgb::new(0xe5, 0xe7, 0xeb);
const DEFAULT_RIGHT_BACKGROUND: Rgb = Rgb::new(0x1d, 0x4e, 0xd8);

/// How the chat area is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// Grow with the conversation (optionally capped by `maxHeight`).
    #[default]
    Grow,
    /// Always use `fixedHeight`.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Behaviour {
    pub start_behavior: Option<StartBehavior>,
    pub show_navigation_bar: bool,
    pub sizing: Sizing,
    /// Maximum height in rows (grow sizing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u16>,
    /// Height in rows (fixed sizing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_height: Option<u16>,
}

impl Behaviour {
    /// Rows the chat area may use when `available` rows are free.
    pub fn chat_rows(&self, available: u16) -> u16 {
        match (self.sizing, self.fixed_height, self.max_height) {
            (Sizing::Fixed, Some(fixed), _) => fixed.min(available),
            (Sizing::Grow, _, Some(max)) => max.min(available),
            _ => available,
        }
    }
}

/// Per-side defaults applied to messages that do not override them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SideVisuals {
    pub color_background_default: Option<Rgb>,
    pub user_name: Option<String>,
    pub icon_image: Option<IconImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Visuals {
    pub left: SideVisuals,
    pub right: SideVisuals,
}

/// Content parameters exactly as authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentParams {
    /// Raw entries; anything that is not an object is dropped on sanitize.
    pub messages: Vec<Value>,
    pub visuals: Visuals,
    pub behaviour: Behaviour,
    pub l10n: BTreeMap<String, String>,
    pub a11y: BTreeMap<String, String>,
}

/// Fallbacks for what the content leaves unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackDefaults {
    pub start_behavior: StartBehavior,
    /// Show the navigation bar even when the content hides it.
    pub force_navigation_bar: bool,
    /// Start behavior that wins over the content's own setting.
    pub start_override: Option<StartBehavior>,
}

/// Resolved side colors after contrast computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSide {
    pub background: Rgb,
    pub text: Rgb,
    pub user_name: Option<String>,
    pub icon_image: Option<IconImage>,
}

/// Sanitized, ready-to-play content.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub content_id: ContentId,
    /// Directory relative asset paths are resolved against.
    pub base_dir: PathBuf,
    pub messages: Vec<Message>,
    pub behaviour: Behaviour,
    pub start_behavior: StartBehavior,
    pub dictionary: Dictionary,
}

impl Presentation {
    pub fn show_navigation_bar(&self) -> bool {
        self.behaviour.show_navigation_bar
    }

    /// Resolves an icon against the content directory.
    pub fn icon_path(&self, icon: &IconImage) -> PathBuf {
        if icon.path.is_absolute() {
            icon.path.clone()
        } else {
            self.base_dir.join(&icon.path)
        }
    }
}

impl ContentParams {
    /// Loads content from a `.json` or `.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content from {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parsed = match extension.as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            Some(other) => bail!("Unsupported content format '.{other}' (expected .json or .toml)"),
            None => bail!("Content file {} has no extension", path.display()),
        };
        parsed.with_context(|| format!("Failed to parse content from {}", path.display()))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid JSON content")
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid TOML content")
    }

    /// Applies defaults, fixes up messages and resolves colors and origins.
    pub fn sanitize(
        self,
        content_id: ContentId,
        base_dir: PathBuf,
        defaults: PlaybackDefaults,
    ) -> Presentation {
        let mut dictionary = Dictionary::new();
        dictionary.fill("l10n", &self.l10n);
        dictionary.fill("a11y", &self.a11y);

        let behaviour = sanitize_behaviour(self.behaviour, defaults);
        let start_behavior = behaviour
            .start_behavior
            .unwrap_or(defaults.start_behavior);

        let left = resolve_side(&self.visuals.left, DEFAULT_LEFT_BACKGROUND);
        let right = resolve_side(&self.visuals.right, DEFAULT_RIGHT_BACKGROUND);

        let empty_text = dictionary.get("l10n.emptyMessage");
        let authored: Vec<AuthoredMessage> = self
            .messages
            .iter()
            .filter_map(|value| AuthoredMessage::from_value(value, &empty_text))
            .collect();
        let dropped = self.messages.len() - authored.len();
        if dropped > 0 {
            tracing::warn!(dropped, "dropped malformed message entries");
        }

        let origins = rearrange_origins(&authored);
        let messages = authored
            .into_iter()
            .zip(origins)
            .map(|(message, origin)| {
                let side = match origin {
                    Origin::Left => &left,
                    Origin::Right => &right,
                };
                message.resolve(origin, side)
            })
            .collect();

        Presentation {
            content_id,
            base_dir,
            messages,
            behaviour,
            start_behavior,
            dictionary,
        }
    }
}

/// Loads and sanitizes a content file in one go.
///
/// The content id is the file stem; relative assets resolve against the
/// file's directory.
pub fn load_presentation(path: &Path, defaults: PlaybackDefaults) -> Result<Presentation> {
    let params = ContentParams::load(path)?;
    let content_id = ContentId(
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(params.sanitize(content_id, base_dir, defaults))
}

fn sanitize_behaviour(mut behaviour: Behaviour, defaults: PlaybackDefaults) -> Behaviour {
    if let Some(start) = defaults.start_override {
        behaviour.start_behavior = Some(start);
    }
    match behaviour.sizing {
        Sizing::Grow => behaviour.fixed_height = None,
        Sizing::Fixed => behaviour.max_height = None,
    }
    if behaviour.max_height == Some(0) {
        behaviour.max_height = None;
    }
    if behaviour.fixed_height == Some(0) {
        behaviour.fixed_height = None;
    }

    let start = behaviour.start_behavior.unwrap_or(defaults.start_behavior);
    if start == StartBehavior::Manually || defaults.force_navigation_bar {
        behaviour.show_navigation_bar = true;
    }
    behaviour
}

fn resolve_side(side: &SideVisuals, default_background: Rgb) -> ResolvedSide {
    let background = side.color_background_default.unwrap_or(default_background);
    ResolvedSide {
        background,
        text: color::default_contrast_color(background),
        user_name: side.user_name.clone().filter(|name| !name.trim().is_empty()),
        icon_image: side.icon_image.clone(),
    }
}

/// Origin override as authored; `Auto` alternates sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OriginOverride {
    Auto,
    Fixed(Origin),
}

#[derive(Debug, Clone)]
struct AuthoredMessage {
    text: String,
    origin: OriginOverride,
    author_name: Option<String>,
    background_color: Option<Rgb>,
    text_color: Option<Rgb>,
    icon_image: Option<IconImage>,
}

impl AuthoredMessage {
    fn from_value(value: &Value, empty_text: &str) -> Option<Self> {
        let object = value.as_object()?;

        let text = object
            .get("text")
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map_or_else(|| empty_text.to_string(), str::to_string);

        let origin = match object
            .get("overrides")
            .and_then(|overrides| overrides.get("origin"))
            .and_then(Value::as_str)
        {
            Some("left") => OriginOverride::Fixed(Origin::Left),
            Some("right") => OriginOverride::Fixed(Origin::Right),
            _ => OriginOverride::Auto,
        };

        let string_field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let icon_image = object
            .get("iconImage")
            .and_then(|icon| icon.get("path"))
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
            .map(|path| IconImage { path: path.into() });

        Some(Self {
            text,
            origin,
            author_name: string_field("authorName").map(str::to_string),
            background_color: string_field("backgroundColor").map(Rgb::parse_or_fallback),
            text_color: string_field("textColor").map(Rgb::parse_or_fallback),
            icon_image,
        })
    }

    fn resolve(self, origin: Origin, side: &ResolvedSide) -> Message {
        Message {
            text: self.text,
            origin,
            user_name: self.author_name.or_else(|| side.user_name.clone()),
            background_color: self.background_color.unwrap_or(side.background),
            text_color: self.text_color.unwrap_or(side.text),
            icon_image: self.icon_image.or_else(|| side.icon_image.clone()),
        }
    }
}

/// First `auto` message goes right; later ones take the side opposite to
/// their predecessor.
fn rearrange_origins(messages: &[AuthoredMessage]) -> Vec<Origin> {
    let mut origins: Vec<Origin> = Vec::with_capacity(messages.len());
    for message in messages {
        let origin = match message.origin {
            OriginOverride::Fixed(origin) => origin,
            OriginOverride::Auto => origins
                .last()
                .map_or(DEFAULT_START_ORIGIN, |previous| previous.opposite()),
        };
        origins.push(origin);
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize_json(json: &str) -> Presentation {
        ContentParams::from_json_str(json)
            .unwrap()
            .sanitize(
                ContentId("t".into()),
                PathBuf::from("/content"),
                PlaybackDefaults::default(),
            )
    }

    #[test]
    fn test_auto_origins_alternate_from_right() {
        let p = sanitize_json(
            r#"{"messages": [{"text": "a"}, {"text": "b"}, {"text": "c"}]}"#,
        );
        let origins: Vec<Origin> = p.messages.iter().map(|m| m.origin).collect();
        assert_eq!(origins, vec![Origin::Right, Origin::Left, Origin::Right]);
    }

    #[test]
    fn test_auto_origin_follows_fixed_predecessor() {
        let p = sanitize_json(
            r#"{"messages": [
                {"text": "a", "overrides": {"origin": "left"}},
                {"text": "b"},
                {"text": "c", "overrides": {"origin": "right"}},
                {"text": "d", "overrides": {"origin": "sideways"}}
            ]}"#,
        );
        let origins: Vec<Origin> = p.messages.iter().map(|m| m.origin).collect();
        assert_eq!(
            origins,
            vec![Origin::Left, Origin::Right, Origin::Right, Origin::Left]
        );
    }

    #[test]
    fn test_non_objects_are_dropped() {
        let p = sanitize_json(r#"{"messages": [null, 3, "x", {"text": "kept"}]}"#);
        assert_eq!(p.messages.len(), 1);
        assert_eq!(p.messages[0].text, "kept");
    }

    #[test]
    fn test_blank_text_uses_localized_placeholder() {
        let p = sanitize_json(
            r#"{"messages": [{"text": "  "}, {}, {"text": 42}],
                "l10n": {"emptyMessage": "(vide)"}}"#,
        );
        assert!(p.messages.iter().all(|m| m.text == "(vide)"));
    }

    #[test]
    fn test_side_visuals_apply_as_fallbacks() {
        let p = sanitize_json(
            r##"{
                "visuals": {
                    "left": {"colorBackgroundDefault": "#000000", "userName": "Bot"},
                    "right": {"colorBackgroundDefault": "#ffffff", "userName": "You"}
                },
                "messages": [
                    {"text": "hi", "overrides": {"origin": "left"}},
                    {"text": "yo", "overrides": {"origin": "right"}, "authorName": "Sam",
                     "backgroundColor": "#336699"}
                ]
            }"##,
        );
        let bot = &p.messages[0];
        assert_eq!(bot.user_name.as_deref(), Some("Bot"));
        assert_eq!(bot.background_color, Rgb::new(0, 0, 0));
        assert_eq!(bot.text_color, color::CONTRAST_COLOR_LIGHT);

        let sam = &p.messages[1];
        assert_eq!(sam.user_name.as_deref(), Some("Sam"));
        assert_eq!(sam.background_color, Rgb::new(0x33, 0x66, 0x99));
        // Text color comes from the side, not from the message background.
        assert_eq!(sam.text_color, color::CONTRAST_COLOR_DARK);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let p = sanitize_json(r#"{"messages": [{"text": "x", "backgroundColor": "nope"}]}"#);
        assert_eq!(p.messages[0].background_color, color::FALLBACK_COLOR);
    }

    #[test]
    fn test_manual_start_forces_navigation_bar() {
        let p = sanitize_json(r#"{"behaviour": {"startBehavior": "manually"}}"#);
        assert_eq!(p.start_behavior, StartBehavior::Manually);
        assert!(p.show_navigation_bar());
    }

    #[test]
    fn test_defaults_fill_missing_start_behavior() {
        let params = ContentParams::from_json_str("{}").unwrap();
        let p = params.sanitize(
            ContentId::default(),
            PathBuf::new(),
            PlaybackDefaults {
                start_behavior: StartBehavior::Manually,
                force_navigation_bar: false,
                start_override: None,
            },
        );
        assert_eq!(p.start_behavior, StartBehavior::Manually);
        assert!(p.show_navigation_bar());
        assert!(p.messages.is_empty());
    }

    #[test]
    fn test_start_override_beats_content() {
        let params =
            ContentParams::from_json_str(r#"{"behaviour": {"startBehavior": "auto"}}"#).unwrap();
        let p = params.sanitize(
            ContentId::default(),
            PathBuf::new(),
            PlaybackDefaults {
                start_override: Some(StartBehavior::Manually),
                ..PlaybackDefaults::default()
            },
        );
        assert_eq!(p.start_behavior, StartBehavior::Manually);
        assert!(p.show_navigation_bar());
    }

    #[test]
    fn test_sizing_rules() {
        let grow = sanitize_json(
            r#"{"behaviour": {"sizing": "grow", "maxHeight": 12, "fixedHeight": 5}}"#,
        );
        assert_eq!(grow.behaviour.fixed_height, None);
        assert_eq!(grow.behaviour.chat_rows(40), 12);
        assert_eq!(grow.behaviour.chat_rows(8), 8);

        let fixed = sanitize_json(
            r#"{"behaviour": {"sizing": "fixed", "maxHeight": 12, "fixedHeight": 5}}"#,
        );
        assert_eq!(fixed.behaviour.max_height, None);
        assert_eq!(fixed.behaviour.chat_rows(40), 5);

        let zero = sanitize_json(r#"{"behaviour": {"maxHeight": 0}}"#);
        assert_eq!(zero.behaviour.max_height, None);
        assert_eq!(zero.behaviour.chat_rows(40), 40);
    }

    #[test]
    fn test_toml_content() {
        let params = ContentParams::from_toml_str(
            r#"
            [behaviour]
            startBehavior = "auto"

            [visuals.left]
            userName = "Helpdesk"

            [[messages]]
            text = "Hello"

            [[messages]]
            text = "Hi!"
            overrides = { origin = "left" }
            "#,
        )
        .unwrap();
        let p = params.sanitize(ContentId::default(), PathBuf::new(), PlaybackDefaults::default());
        assert_eq!(p.messages.len(), 2);
        assert_eq!(p.messages[0].origin, Origin::Right);
        assert_eq!(p.messages[1].user_name.as_deref(), Some("Helpdesk"));
    }

    #[test]
    fn test_icon_paths_resolve_against_base_dir() {
        let p = sanitize_json(
            r#"{"messages": [{"text": "x", "iconImage": {"path": "images/bot.png"}}]}"#,
        );
        let icon = p.messages[0].icon_image.as_ref().unwrap();
        assert_eq!(p.icon_path(icon), PathBuf::from("/content/images/bot.png"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.yaml");
        fs::write(&path, "messages: []").unwrap();
        let err = ContentParams::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported content format"));
    }

    #[test]
    fn test_load_presentation_uses_file_stem_as_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("support-chat.json");
        fs::write(&path, r#"{"messages": [{"text": "hi"}]}"#).unwrap();

        let p = load_presentation(&path, PlaybackDefaults::default()).unwrap();
        assert_eq!(p.content_id, ContentId("support-chat".into()));
        assert_eq!(p.base_dir, dir.path());
        assert_eq!(p.messages.len(), 1);
    }
}
