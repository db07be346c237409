use serde::{Deserialize, Serialize};

pub const ENTER_KEY: &str = "Enter";

/// One key-down as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    #[serde(default)]
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
        }
    }

    pub fn enter() -> Self {
        Self::new(ENTER_KEY)
    }

    pub fn shift_enter() -> Self {
        Self::enter().with_shift()
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn is_enter(&self) -> bool {
        self.key == ENTER_KEY
    }
}

/// What the host must do with a key-down after the pipeline saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Let the native default happen (e.g. Shift+Enter inserts a newline).
    Default,
    /// Prevent the native default and do nothing else.
    Suppress,
    /// Prevent the native default, then hand the buffer to submission.
    Submit,
}

impl KeyAction {
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Default)
    }
}

pub fn classify_key(key: &KeyPress, allow_newline: bool) -> KeyAction {
    if !key.is_enter() {
        return KeyAction::Default;
    }
    match (key.shift, allow_newline) {
        (false, _) => KeyAction::Submit,
        (true, true) => KeyAction::Default,
        (true, false) => KeyAction::Suppress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_enter_submits() {
        for allow_newline in [true, false] {
            let action = classify_key(&KeyPress::enter(), allow_newline);
            assert_eq!(action, KeyAction::Submit);
            assert!(action.prevents_default());
        }
    }

    #[test]
    fn shift_enter_depends_on_newline_policy() {
        assert_eq!(classify_key(&KeyPress::shift_enter(), true), KeyAction::Default);
        assert_eq!(classify_key(&KeyPress::shift_enter(), false), KeyAction::Suppress);
    }

    #[test]
    fn other_keys_pass_through() {
        let action = classify_key(&KeyPress::new("a").with_shift(), false);
        assert_eq!(action, KeyAction::Default);
        assert!(!action.prevents_default());
    }
}
