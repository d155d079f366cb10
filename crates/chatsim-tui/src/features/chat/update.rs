//! Scroll input for the chat area.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use super::state::ChatState;

/// Lines moved per mouse wheel notch.
pub const MOUSE_SCROLL_LINES: usize = 3;

pub fn handle_mouse(chat: &mut ChatState, mouse: MouseEvent) {
    let viewport = chat.viewport_height;
    match mouse.kind {
        MouseEventKind::ScrollUp => chat.scroll.scroll_up(MOUSE_SCROLL_LINES, viewport),
        MouseEventKind::ScrollDown => chat.scroll.scroll_down(MOUSE_SCROLL_LINES, viewport),
        _ => {}
    }
}

/// Handles PageUp/PageDown. Returns false for other keys.
pub fn handle_scroll_key(chat: &mut ChatState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::PageUp => {
            chat.scroll.page_up(chat.viewport_height);
            true
        }
        KeyCode::PageDown => {
            chat.scroll.page_down(chat.viewport_height);
            true
        }
        _ => false,
    }
}
