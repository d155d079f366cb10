//! `chatsim run`: plays a content file.

use std::path::Path;

use anyhow::{Context, Result};
use chatsim_core::config::Config;
use chatsim_core::content::load_presentation;
use chatsim_core::core::sequencer::StartBehavior;

use crate::modes;
use crate::modes::plain::PlainOptions;

pub struct RunOptions<'a> {
    pub file: &'a Path,
    pub plain: bool,
    pub instant: bool,
    pub speed: f64,
    pub start: Option<StartBehavior>,
}

pub async fn run(options: RunOptions<'_>, config: &Config) -> Result<()> {
    let mut defaults = config.playback_defaults();
    defaults.start_override = options.start;

    let presentation = load_presentation(options.file, defaults)
        .with_context(|| format!("load {}", options.file.display()))?;
    tracing::info!(
        content = %presentation.content_id,
        messages = presentation.messages.len(),
        plain = options.plain,
        "loaded presentation"
    );

    if options.plain {
        return modes::plain::run(
            presentation,
            PlainOptions {
                instant: options.instant,
                speed: options.speed,
            },
        )
        .await;
    }

    modes::run_presentation(
        presentation,
        modes::TuiOptions {
            announce_file: config.announce_file.clone(),
        },
    )
}
