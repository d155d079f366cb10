//! Keyboard handling for the navigation bar.

use crossterm::event::{KeyCode, KeyEvent};

use super::state::{ButtonPress, NavigationState};

/// Routes a key to the navigation bar.
///
/// Returns `(handled, press)`: `handled` is false for keys the bar does not
/// use (or when it is hidden), so the caller can try other bindings.
pub fn handle_key(nav: &mut NavigationState, key: KeyEvent) -> (bool, Option<ButtonPress>) {
    if !nav.is_visible() {
        return (false, None);
    }
    match key.code {
        KeyCode::Left | KeyCode::Up => {
            nav.focus_previous();
            (true, None)
        }
        KeyCode::Right | KeyCode::Down => {
            nav.focus_next();
            (true, None)
        }
        KeyCode::Home => {
            nav.focus_first();
            (true, None)
        }
        KeyCode::End => {
            nav.focus_last();
            (true, None)
        }
        KeyCode::Enter | KeyCode::Char(' ') => (true, nav.press_focused()),
        _ => (false, None),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::features::navigation::ButtonId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys_move_focus() {
        let mut nav = NavigationState::new(true, false);
        assert_eq!(handle_key(&mut nav, key(KeyCode::Right)), (true, None));
        assert_eq!(nav.focused_index(), 1);
        handle_key(&mut nav, key(KeyCode::Down));
        assert_eq!(nav.focused_index(), 1);
        handle_key(&mut nav, key(KeyCode::Up));
        assert_eq!(nav.focused_index(), 0);
        handle_key(&mut nav, key(KeyCode::End));
        assert_eq!(nav.focused_index(), 1);
        handle_key(&mut nav, key(KeyCode::Home));
        assert_eq!(nav.focused_index(), 0);
    }

    #[test]
    fn test_space_presses_focused_button() {
        let mut nav = NavigationState::new(true, false);
        nav.focus_last();
        let (handled, press) = handle_key(&mut nav, key(KeyCode::Char(' ')));
        assert!(handled);
        assert_eq!(press.map(|p| p.id), Some(ButtonId::Autoplay));
    }

    #[test]
    fn test_hidden_bar_ignores_keys() {
        let mut nav = NavigationState::new(false, false);
        assert_eq!(handle_key(&mut nav, key(KeyCode::Enter)), (false, None));
    }

    #[test]
    fn test_other_keys_fall_through() {
        let mut nav = NavigationState::new(true, false);
        assert_eq!(handle_key(&mut nav, key(KeyCode::Char('x'))), (false, None));
    }
}
