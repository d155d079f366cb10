//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::chat;
use crate::features::navigation::{self, ButtonId, ButtonPress};
use crate::render;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let effects = match event {
        UiEvent::Tick { elapsed } => {
            app.playback.advance(elapsed);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(app, width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::HostResized => {
            app.chat.layout_dirty = true;
            vec![]
        }
        UiEvent::Announced(text) => {
            app.status.announce(text.clone());
            vec![UiEffect::AppendAnnouncement { text }]
        }
        UiEvent::MessageRevealed(index) => {
            tracing::trace!(index, "message revealed");
            vec![]
        }
        UiEvent::ScrollToBottom => {
            app.chat.scroll.scroll_to_bottom();
            vec![]
        }
        UiEvent::PlaybackEnded => {
            let text = app.playback.dictionary().get("l10n.ended");
            app.status.announce(text.clone());
            vec![UiEffect::AppendAnnouncement { text }]
        }
    };
    app.sync_navigation();
    effects
}

// ============================================================================
// Frame Handler
// ============================================================================

/// Recomputes layout, then reports visibility to the sequencer.
fn handle_frame(app: &mut AppState, width: u16, height: u16) {
    let areas = render::layout(
        Rect::new(0, 0, width, height),
        &app.behaviour,
        app.navigation.is_visible(),
    );
    let content_width = chat::content_width(areas.chat.width);

    if app.chat.layout_dirty || app.chat.content_width != content_width {
        app.chat.scroll.line_count =
            chat::chat_lines(app.playback.units(), app.playback.now(), content_width).len();
        app.chat.content_width = content_width;
        app.chat.layout_dirty = false;
    }
    app.chat.viewport_height = areas.chat.height as usize;
    app.chat_rows = areas.chat.height;
    app.update_visibility();
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            chat::handle_mouse(&mut app.chat, mouse);
            vec![]
        }
        Event::FocusGained => {
            app.terminal_focused = true;
            app.update_visibility();
            vec![]
        }
        Event::FocusLost => {
            app.terminal_focused = false;
            app.update_visibility();
            vec![]
        }
        Event::Resize(_, _) => {
            app.chat.layout_dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    let (handled, press) = navigation::handle_key(&mut app.navigation, key);
    if let Some(press) = press {
        apply_press(app, press);
    }
    if handled {
        return vec![];
    }

    if chat::handle_scroll_key(&mut app.chat, key) {
        return vec![];
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return vec![UiEffect::Quit],
        KeyCode::Char('n') => press_button(app, ButtonId::Step),
        KeyCode::Char('p') => press_button(app, ButtonId::Autoplay),
        KeyCode::Char('r') => restart(app),
        KeyCode::Char('f') => app.playback.fast_forward(),
        _ => {}
    }
    vec![]
}

fn press_button(app: &mut AppState, id: ButtonId) {
    if let Some(press) = app.navigation.press(id) {
        apply_press(app, press);
    }
}

fn apply_press(app: &mut AppState, press: ButtonPress) {
    match (press.id, press.active) {
        (ButtonId::Step, _) => app.playback.step(),
        (ButtonId::Autoplay, Some(true)) => app.playback.start(),
        (ButtonId::Autoplay, _) => app.playback.stop(),
    }
}

fn restart(app: &mut AppState) {
    app.playback.reset();
    app.navigation.reset();
    app.status.reset();
    app.chat.scroll.reset();
    app.chat.layout_dirty = true;
}
