use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    NewGenericWindow,
    OpenWindowList,
    EditFocused,
    CloseFocused,
    ToggleMinimize,
    ToggleDebugLog,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "quit",
            Action::FocusNext => "next",
            Action::FocusPrev => "prev",
            Action::NewGenericWindow => "new",
            Action::OpenWindowList => "list",
            Action::EditFocused => "edit",
            Action::CloseFocused => "close",
            Action::ToggleMinimize => "min",
            Action::ToggleDebugLog => "log",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CONTROL) {
            f.write_str("^")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::BackTab => f.write_str("S-Tab"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Host-level bindings, checked before the focused window sees a key.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    entries: Vec<(Action, KeyCombo)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(FocusNext, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(FocusPrev, KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE));
        kb.add(NewGenericWindow, KeyCombo::ctrl('n'));
        kb.add(OpenWindowList, KeyCombo::ctrl('l'));
        kb.add(EditFocused, KeyCombo::ctrl('e'));
        kb.add(CloseFocused, KeyCombo::ctrl('w'));
        kb.add(ToggleMinimize, KeyCombo::ctrl('t'));
        kb.add(ToggleDebugLog, KeyCombo::ctrl('d'));
        kb
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.entries.push((action, combo));
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.entries
            .iter()
            .find(|(_, combo)| combo.matches(key))
            .map(|(action, _)| *action)
    }

    /// `^N new ^L list ...`, in registration order.
    pub fn help_line(&self) -> String {
        self.entries
            .iter()
            .filter(|(action, _)| !matches!(action, Action::FocusNext | Action::FocusPrev))
            .map(|(action, combo)| format!("{combo} {action}"))
            .collect::<Vec<_>>()
            .join("  ")
    }
}
