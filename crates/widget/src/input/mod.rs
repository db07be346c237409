/// Enter/Shift+Enter classification.
pub mod keys;
/// Pure newline and character-limit policy.
pub mod normalize;
pub mod pipeline;

pub use keys::{KeyAction, KeyPress, classify_key};
pub use normalize::{Normalized, effective_character_limit, normalize_input};
pub use pipeline::{
    BotStates, ChangeOutcome, CharacterCounter, InputBuffer, InputMode, InputPipeline,
    InputStyle, InputSurface,
};
