//! Navigation bar state: buttons with roving focus.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Step,
    Autoplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Push,
    /// Two-state button; `initial` is restored by `reset()`.
    Toggle { active: bool, initial: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub id: ButtonId,
    pub kind: ButtonKind,
    pub enabled: bool,
}

impl Button {
    pub fn push(id: ButtonId) -> Self {
        Self {
            id,
            kind: ButtonKind::Push,
            enabled: true,
        }
    }

    pub fn toggle(id: ButtonId, active: bool) -> Self {
        Self {
            id,
            kind: ButtonKind::Toggle {
                active,
                initial: active,
            },
            enabled: true,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.kind, ButtonKind::Toggle { active: true, .. })
    }
}

/// What a button press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
    pub id: ButtonId,
    /// New state of a toggle button; `None` for push buttons.
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    buttons: Vec<Button>,
    focused: usize,
    visible: bool,
}

impl NavigationState {
    /// Step button followed by the autoplay toggle.
    pub fn new(visible: bool, autoplay_active: bool) -> Self {
        Self::with_buttons(
            vec![
                Button::push(ButtonId::Step),
                Button::toggle(ButtonId::Autoplay, autoplay_active),
            ],
            visible,
        )
    }

    pub fn with_buttons(buttons: Vec<Button>, visible: bool) -> Self {
        Self {
            buttons,
            focused: 0,
            visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible && !self.buttons.is_empty()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused(&self) -> Option<&Button> {
        self.buttons.get(self.focused)
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.iter().find(|button| button.id == id)
    }

    fn button_mut(&mut self, id: ButtonId) -> Option<&mut Button> {
        self.buttons.iter_mut().find(|button| button.id == id)
    }

    // ========================================================================
    // Focus (no wrap-around)
    // ========================================================================

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    pub fn focus_next(&mut self) {
        if self.focused + 1 < self.buttons.len() {
            self.focused += 1;
        }
    }

    pub fn focus_first(&mut self) {
        self.focused = 0;
    }

    pub fn focus_last(&mut self) {
        self.focused = self.buttons.len().saturating_sub(1);
    }

    // ========================================================================
    // Pressing
    // ========================================================================

    /// Presses the focused button.
    pub fn press_focused(&mut self) -> Option<ButtonPress> {
        let id = self.focused()?.id;
        self.press(id)
    }

    /// Presses a button by id; disabled buttons ignore the press.
    pub fn press(&mut self, id: ButtonId) -> Option<ButtonPress> {
        let button = self.button_mut(id)?;
        if !button.enabled {
            return None;
        }
        let active = match &mut button.kind {
            ButtonKind::Push => None,
            ButtonKind::Toggle { active, .. } => {
                *active = !*active;
                Some(*active)
            }
        };
        Some(ButtonPress { id, active })
    }

    // ========================================================================
    // Programmatic state (never reported as a press)
    // ========================================================================

    pub fn set_enabled(&mut self, id: ButtonId, enabled: bool) {
        if let Some(button) = self.button_mut(id) {
            button.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, id: ButtonId) -> bool {
        self.button(id).is_some_and(|button| button.enabled)
    }

    /// Forces a toggle button's state.
    pub fn set_active(&mut self, id: ButtonId, value: bool) {
        if let Some(Button {
            kind: ButtonKind::Toggle { active, .. },
            ..
        }) = self.button_mut(id)
        {
            *active = value;
        }
    }

    pub fn is_active(&self, id: ButtonId) -> bool {
        self.button(id).is_some_and(Button::is_active)
    }

    /// Re-enables every button and restores toggles to their initial state.
    pub fn reset(&mut self) {
        for button in &mut self.buttons {
            button.enabled = true;
            if let ButtonKind::Toggle { active, initial } = &mut button.kind {
                *active = *initial;
            }
        }
    }
}
