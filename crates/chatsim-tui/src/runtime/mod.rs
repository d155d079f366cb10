//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! The sequencer runs inside the reducer and reports back through host
//! callbacks. Those callbacks only post `UiEvent`s to `inbox_tx`; the runtime
//! drains `inbox_rx` each loop, so a notification is never handled while the
//! sequencer is still mid-operation.
//!
//! ## Clock
//!
//! Every `Tick` carries the wall time since the previous one and advances the
//! sequencer's virtual clock by that much. The poll timeout shrinks to the
//! next pending playback timer so reveals land on time.

pub mod inbox;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chatsim_core::content::Presentation;
use chatsim_core::core::interrupt;
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame cadence while something animates (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle (no typing indicator, no recent input).
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Options the CLI passes through from configuration.
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    /// File announcements are appended to, one per line.
    pub announce_file: Option<PathBuf>,
}

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop, on panic, and on a second Ctrl+C.
pub struct TuiRuntime {
    terminal: terminal::PlayerTerminal,
    pub state: AppState,
    /// Kept so the inbox never disconnects while the runtime lives.
    _inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    options: TuiOptions,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    pub fn new(presentation: Presentation, options: TuiOptions) -> Result<Self> {
        // Panic hook goes in before the alternate screen.
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let state = AppState::new(presentation, &inbox_tx);

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            _inbox_tx: inbox_tx,
            inbox_rx,
            options,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let result = self.event_loop();

        let _ = terminal::disable_input_features();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            if interrupt::is_interrupted() {
                self.state.should_quit = true;
                break;
            }

            let mut events = self.collect_events()?;

            // Layout and visibility first, so ticks see the current size.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only ticks trigger a redraw; input is batched until then.
                if matches!(&event, UiEvent::Tick { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let mut tick_interval = if self.state.is_animating() || recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        if let Some(until_timer) = self.state.time_until_next_timer() {
            tick_interval = tick_interval.min(until_timer);
        }

        self.collect_inbox_events(&mut events);

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        let elapsed = self.last_tick.elapsed();
        if elapsed >= tick_interval {
            events.push(UiEvent::Tick { elapsed });
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::AppendAnnouncement { text } => {
                if let Some(path) = &self.options.announce_file
                    && let Err(error) = append_line(path, &text)
                {
                    tracing::warn!(path = %path.display(), "failed to write announcement: {error:#}");
                }
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

/// Appends one line to a file, creating it if needed.
pub fn append_line(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{text}").with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
