use crate::input::keys::{KeyAction, KeyPress, classify_key};
use crate::input::normalize::{effective_character_limit, normalize_input};
use crate::settings::{ChatInputSettings, Settings};

/// Input flags owned by the bot-state collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotStates {
    pub text_area_disabled: bool,
    pub text_area_sensitive_mode: bool,
}

impl BotStates {
    /// Disabled wins over sensitive.
    pub fn mode(&self) -> InputMode {
        if self.text_area_disabled {
            InputMode::Disabled
        } else if self.text_area_sensitive_mode {
            InputMode::Sensitive
        } else {
            InputMode::Enabled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Enabled,
    Disabled,
    /// Masked rendering; value handling matches `Enabled`.
    Sensitive,
}

/// Which host control renders the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSurface {
    TextArea,
    Masked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStyle {
    Idle,
    Focused,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCounter {
    pub length: usize,
    pub limit: usize,
    pub reached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Input is disabled; the buffer was forced empty.
    Rejected,
    Applied { truncated: bool },
}

/// Live text value and its length in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    value: String,
    length: usize,
}

impl InputBuffer {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn set(&mut self, value: String) {
        self.length = value.chars().count();
        self.value = value;
    }

    fn clear(&mut self) {
        self.value.clear();
        self.length = 0;
    }
}

/// Turns raw key-downs and value changes into a policy-compliant buffer.
#[derive(Debug, Clone, Default)]
pub struct InputPipeline {
    buffer: InputBuffer,
    focused: bool,
}

impl InputPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn handle_change(
        &mut self,
        raw: &str,
        mode: InputMode,
        settings: &ChatInputSettings,
    ) -> ChangeOutcome {
        if mode == InputMode::Disabled {
            self.buffer.clear();
            self.focused = false;
            return ChangeOutcome::Rejected;
        }

        let normalized = normalize_input(raw, settings);
        self.buffer.set(normalized.value);
        ChangeOutcome::Applied {
            truncated: normalized.truncated,
        }
    }

    pub fn handle_key_down(&self, key: &KeyPress, settings: &ChatInputSettings) -> KeyAction {
        classify_key(key, settings.allow_newline)
    }

    /// Returns whether focus was accepted.
    pub fn handle_focus(&mut self, mode: InputMode) -> bool {
        if mode == InputMode::Disabled {
            return false;
        }
        self.focused = true;
        true
    }

    pub fn handle_blur(&mut self) {
        self.focused = false;
    }

    /// Trimmed buffer content, or `None` when there is nothing to send.
    pub fn pending_text(&self) -> Option<String> {
        let trimmed = self.buffer.value().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn placeholder<'a>(&self, mode: InputMode, settings: &'a ChatInputSettings) -> &'a str {
        if mode == InputMode::Disabled {
            &settings.disabled_placeholder_text
        } else {
            &settings.enabled_placeholder_text
        }
    }

    pub fn surface(&self, states: BotStates, settings: &Settings) -> InputSurface {
        if states.text_area_sensitive_mode && settings.sensitive_input.mask_in_text_area {
            InputSurface::Masked
        } else {
            InputSurface::TextArea
        }
    }

    pub fn style(&self, mode: InputMode) -> InputStyle {
        match mode {
            InputMode::Disabled => InputStyle::Disabled,
            InputMode::Enabled | InputMode::Sensitive if self.focused => InputStyle::Focused,
            InputMode::Enabled | InputMode::Sensitive => InputStyle::Idle,
        }
    }

    /// Outline color for the focused, enabled input.
    pub fn focus_ring_color<'a>(&self, mode: InputMode, settings: &'a Settings) -> Option<&'a str> {
        match self.style(mode) {
            InputStyle::Focused => Some(&settings.general.primary_color),
            InputStyle::Idle | InputStyle::Disabled => None,
        }
    }

    pub fn character_counter(&self, settings: &ChatInputSettings) -> Option<CharacterCounter> {
        if !settings.show_character_count {
            return None;
        }
        let limit = effective_character_limit(settings.character_limit).filter(|limit| *limit > 0)?;
        Some(CharacterCounter {
            length: self.buffer.len(),
            limit,
            reached: self.buffer.len() >= limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_input(allow_newline: bool, character_limit: Option<i64>) -> ChatInputSettings {
        ChatInputSettings {
            allow_newline,
            character_limit,
            ..ChatInputSettings::default()
        }
    }

    #[test]
    fn disabled_change_forces_empty_buffer() {
        let mut pipeline = InputPipeline::new();
        let settings = chat_input(true, None);
        pipeline.handle_change("draft", InputMode::Enabled, &settings);

        let outcome = pipeline.handle_change("more text", InputMode::Disabled, &settings);

        assert_eq!(outcome, ChangeOutcome::Rejected);
        assert_eq!(pipeline.buffer().len(), 0);
        assert_eq!(pipeline.buffer().value(), "");
    }

    #[test]
    fn change_is_limited_and_tracks_length() {
        let mut pipeline = InputPipeline::new();
        let outcome = pipeline.handle_change("hello world", InputMode::Sensitive, &chat_input(false, Some(5)));

        assert_eq!(outcome, ChangeOutcome::Applied { truncated: true });
        assert_eq!(pipeline.buffer().value(), "hello");
        assert_eq!(pipeline.buffer().len(), 5);
    }

    #[test]
    fn shift_enter_newline_arrives_as_a_change() {
        let mut pipeline = InputPipeline::new();
        let settings = chat_input(true, None);
        pipeline.handle_change("first", InputMode::Enabled, &settings);

        let action = pipeline.handle_key_down(&KeyPress::shift_enter(), &settings);
        assert_eq!(action, KeyAction::Default);

        // The host applies its native newline and reports the new value.
        pipeline.handle_change("first\n", InputMode::Enabled, &settings);
        assert_eq!(pipeline.buffer().value(), "first\n");
    }

    #[test]
    fn disabled_input_refuses_focus() {
        let mut pipeline = InputPipeline::new();
        assert!(!pipeline.handle_focus(InputMode::Disabled));
        assert_eq!(pipeline.style(InputMode::Disabled), InputStyle::Disabled);

        assert!(pipeline.handle_focus(InputMode::Sensitive));
        assert_eq!(pipeline.style(InputMode::Sensitive), InputStyle::Focused);

        pipeline.handle_blur();
        assert_eq!(pipeline.style(InputMode::Enabled), InputStyle::Idle);
    }

    #[test]
    fn disabled_change_drops_focus() {
        let mut pipeline = InputPipeline::new();
        let settings = chat_input(true, None);
        assert!(pipeline.handle_focus(InputMode::Enabled));

        pipeline.handle_change("late keystroke", InputMode::Disabled, &settings);

        assert!(!pipeline.is_focused());
        assert_eq!(pipeline.style(InputMode::Enabled), InputStyle::Idle);
    }

    #[test]
    fn focus_ring_uses_primary_color_only_while_focused() {
        let mut pipeline = InputPipeline::new();
        let mut settings = Settings::default();
        settings.general.primary_color = "#ff8800".to_string();

        assert_eq!(pipeline.focus_ring_color(InputMode::Enabled, &settings), None);
        pipeline.handle_focus(InputMode::Enabled);
        assert_eq!(pipeline.focus_ring_color(InputMode::Enabled, &settings), Some("#ff8800"));
        assert_eq!(pipeline.focus_ring_color(InputMode::Disabled, &settings), None);
    }

    #[test]
    fn pending_text_is_trimmed_and_skips_blank_input() {
        let mut pipeline = InputPipeline::new();
        let settings = chat_input(true, None);
        pipeline.handle_change("   \n ", InputMode::Enabled, &settings);
        assert_eq!(pipeline.pending_text(), None);

        pipeline.handle_change("  hi there ", InputMode::Enabled, &settings);
        assert_eq!(pipeline.pending_text().as_deref(), Some("hi there"));
    }

    #[test]
    fn character_counter_needs_flag_and_positive_limit() {
        let mut pipeline = InputPipeline::new();
        let mut settings = chat_input(true, Some(4));
        assert_eq!(pipeline.character_counter(&settings), None);

        settings.show_character_count = true;
        pipeline.handle_change("abc", InputMode::Enabled, &settings);
        assert_eq!(
            pipeline.character_counter(&settings),
            Some(CharacterCounter {
                length: 3,
                limit: 4,
                reached: false
            })
        );

        pipeline.handle_change("abcdef", InputMode::Enabled, &settings);
        assert_eq!(pipeline.character_counter(&settings).map(|counter| counter.reached), Some(true));

        settings.character_limit = Some(0);
        assert_eq!(pipeline.character_counter(&settings), None);
    }

    #[test]
    fn masked_surface_requires_sensitive_mode_and_setting() {
        let pipeline = InputPipeline::new();
        let mut settings = Settings::default();
        let sensitive = BotStates {
            text_area_sensitive_mode: true,
            ..BotStates::default()
        };

        assert_eq!(pipeline.surface(sensitive, &settings), InputSurface::Masked);
        assert_eq!(pipeline.surface(BotStates::default(), &settings), InputSurface::TextArea);

        settings.sensitive_input.mask_in_text_area = false;
        assert_eq!(pipeline.surface(sensitive, &settings), InputSurface::TextArea);
    }

    #[test]
    fn placeholder_follows_mode() {
        let pipeline = InputPipeline::new();
        let settings = ChatInputSettings {
            disabled_placeholder_text: "Please wait".to_string(),
            ..ChatInputSettings::default()
        };
        assert_eq!(pipeline.placeholder(InputMode::Disabled, &settings), "Please wait");
        assert_eq!(
            pipeline.placeholder(InputMode::Enabled, &settings),
            settings.enabled_placeholder_text
        );
    }

    #[test]
    fn disabled_takes_precedence_over_sensitive() {
        let states = BotStates {
            text_area_disabled: true,
            text_area_sensitive_mode: true,
        };
        assert_eq!(states.mode(), InputMode::Disabled);
    }
}
