use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    ClearFocus,
    Refresh,
    TogglePause,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Keyboard focus between panels
        (KeyCode::Tab, KeyModifiers::NONE) => Action::FocusNext,
        (KeyCode::BackTab, _) => Action::FocusPrev,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::FocusNext,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::FocusPrev,
        (KeyCode::Right, KeyModifiers::NONE) => Action::FocusNext,
        (KeyCode::Left, KeyModifiers::NONE) => Action::FocusPrev,
        (KeyCode::Esc, _) => Action::ClearFocus,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::TogglePause,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::TogglePause,

        _ => Action::None,
    }
}
