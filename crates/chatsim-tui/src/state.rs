//! Application state composition.
//!
//! ```text
//! AppState
//! ├── playback: Sequencer<InboxHandler>  (reveal units, timers, trigger)
//! ├── chat: ChatState                   (scroll, cached layout)
//! ├── navigation: NavigationState       (step button, autoplay toggle)
//! ├── status: StatusLine                (latest announcement)
//! └── behaviour: Behaviour              (sizing, navigation bar flag)
//! ```

use std::time::Duration;

use chatsim_core::content::{Behaviour, Presentation};
use chatsim_core::core::sequencer::{Sequencer, StartBehavior};

use crate::features::chat::ChatState;
use crate::features::navigation::{ButtonId, NavigationState};
use crate::features::statusline::StatusLine;
use crate::runtime::inbox::{InboxHandler, UiEventSender, inbox_host};

pub struct AppState {
    pub playback: Sequencer<InboxHandler>,
    pub chat: ChatState,
    pub navigation: NavigationState,
    pub status: StatusLine,
    pub behaviour: Behaviour,
    /// Whether the terminal window has focus.
    pub terminal_focused: bool,
    /// Rows given to the chat area by the last layout pass.
    pub chat_rows: u16,
    pub should_quit: bool,
}

impl AppState {
    /// Builds the state and arms playback per the start behavior.
    ///
    /// Nothing is revealed until the first frame reports the chat visible.
    pub fn new(presentation: Presentation, inbox: &UiEventSender) -> Self {
        let Presentation {
            content_id,
            messages,
            behaviour,
            start_behavior,
            dictionary,
            ..
        } = presentation;

        let navigation = NavigationState::new(
            behaviour.show_navigation_bar && !messages.is_empty(),
            start_behavior == StartBehavior::Auto,
        );
        let host = inbox_host(content_id, inbox);
        let mut playback = Sequencer::new(
            messages,
            start_behavior,
            host,
            dictionary,
            InboxHandler::new(inbox.clone()),
        );
        playback.attach();

        let mut state = Self {
            playback,
            chat: ChatState::new(),
            navigation,
            status: StatusLine::default(),
            behaviour,
            terminal_focused: true,
            chat_rows: 0,
            should_quit: false,
        };
        state.sync_navigation();
        state
    }

    /// Pushes the current visibility (focus and a non-empty chat area) to the
    /// sequencer when it changed.
    pub fn update_visibility(&mut self) {
        let visible = self.terminal_focused && self.chat_rows > 0;
        if self.playback.is_visible() != visible {
            tracing::debug!(visible, "chat visibility changed");
            self.playback.set_visible(visible);
        }
    }

    /// Mirrors playback state onto the navigation bar without pressing
    /// anything.
    pub fn sync_navigation(&mut self) {
        let ended = self.playback.has_ended();
        let armed = self.playback.is_autoplaying() || self.playback.is_waiting_for_visibility();
        self.navigation.set_enabled(ButtonId::Step, !ended);
        self.navigation
            .set_active(ButtonId::Autoplay, armed && !ended);
    }

    /// Number of messages currently revealed.
    pub fn revealed_count(&self) -> usize {
        self.playback
            .units()
            .iter()
            .filter(|unit| unit.is_revealed())
            .count()
    }

    /// Whether a typing indicator is animating.
    pub fn is_animating(&self) -> bool {
        self.playback.units().iter().any(|unit| unit.is_typing())
    }

    /// Virtual time until the next playback timer fires.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.playback
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.playback.now()))
    }
}
