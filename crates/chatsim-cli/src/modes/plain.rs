//! Plain presenter: prints each message once it is revealed.
//!
//! Playback always autoplays. The sequencer's virtual clock is driven from
//! one timer deadline to the next, sleeping the (scaled) gap in between
//! unless `instant` is set.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chatsim_core::content::Presentation;
use chatsim_core::core::interrupt::{self, InterruptedError};
use chatsim_core::core::reveal::RevealUnit;
use chatsim_core::core::sequencer::{SequenceHandler, Sequencer};
use chatsim_core::host::HostContext;

#[derive(Debug, Clone, Copy)]
pub struct PlainOptions {
    /// Skip real waiting between reveals.
    pub instant: bool,
    /// Playback speed multiplier (2.0 plays twice as fast).
    pub speed: f64,
}

impl Default for PlainOptions {
    fn default() -> Self {
        Self {
            instant: false,
            speed: 1.0,
        }
    }
}

/// Collects sequencer notifications until the loop prints them.
#[derive(Debug, Default)]
struct TranscriptHandler {
    revealed: Vec<usize>,
    ended: bool,
}

impl SequenceHandler for TranscriptHandler {
    fn on_showing_process_done(&mut self, index: usize) {
        self.revealed.push(index);
    }

    fn on_ended(&mut self) {
        self.ended = true;
    }
}

/// Plays the presentation to stdout.
pub async fn run(presentation: Presentation, options: PlainOptions) -> Result<()> {
    let mut out = std::io::stdout();
    play(presentation, options, &mut out).await?;
    out.flush().context("flush stdout")
}

/// Plays the presentation into `out` until the last message is revealed.
pub async fn play<W: Write>(
    presentation: Presentation,
    options: PlainOptions,
    out: &mut W,
) -> Result<()> {
    let Presentation {
        content_id,
        messages,
        start_behavior,
        dictionary,
        ..
    } = presentation;

    if messages.is_empty() {
        writeln!(out, "{}", dictionary.get("l10n.noMessages")).context("write output")?;
        return Ok(());
    }

    let host = HostContext::new(
        content_id,
        || {},
        |text| tracing::debug!(announcement = text, "read aloud"),
    );
    let mut playback = Sequencer::new(
        messages,
        start_behavior,
        host,
        dictionary,
        TranscriptHandler::default(),
    );
    playback.attach();
    if !playback.is_waiting_for_visibility() {
        playback.start();
    }
    playback.set_visible(true);

    loop {
        write_revealed(&mut playback, out)?;
        if playback.handler().ended {
            break;
        }
        if interrupt::is_interrupted() {
            return Err(InterruptedError.into());
        }

        let Some(deadline) = playback.next_deadline() else {
            anyhow::bail!("Playback stalled before the last message");
        };
        if !options.instant {
            let wait = scaled(deadline.saturating_sub(playback.now()), options.speed);
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                () = interrupt::wait_for_interrupt() => return Err(InterruptedError.into()),
            }
        }
        playback.advance_to(deadline);
    }

    tracing::info!(messages = playback.len(), "plain playback finished");
    Ok(())
}

fn write_revealed<W: Write>(
    playback: &mut Sequencer<TranscriptHandler>,
    out: &mut W,
) -> Result<()> {
    let revealed = std::mem::take(&mut playback.handler_mut().revealed);
    for index in revealed {
        if let Some(unit) = playback.unit(index) {
            writeln!(out, "{}", transcript_line(unit)).context("write output")?;
        }
    }
    Ok(())
}

/// `[right] Alice: Hello`, or `[left] Hello` without an author.
fn transcript_line(unit: &RevealUnit) -> String {
    let message = unit.message();
    match message.user_name.as_deref() {
        Some(name) => format!("[{}] {name}: {}", message.origin, unit.shown_text()),
        None => format!("[{}] {}", message.origin, unit.shown_text()),
    }
}

/// Divides `delay` by `speed`, saturating instead of overflowing.
fn scaled(delay: Duration, speed: f64) -> Duration {
    if !(speed.is_finite() && speed > 0.0) {
        return delay;
    }
    Duration::try_from_secs_f64(delay.as_secs_f64() / speed).unwrap_or(Duration::MAX)
}
