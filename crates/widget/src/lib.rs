#![deny(unsafe_code)]

/// Interaction core of an embeddable chat widget.
///
/// State transitions are announced as cancelable notifications carrying a
/// snapshot of settings, styles, messages and paths. A one-shot gate decides
/// when the conversation flow may begin, and the input pipeline turns key
/// presses and value changes into a policy-compliant buffer and submissions.
pub mod error;
/// Notification registry, bus, emitter and host adapter.
pub mod events;
/// One-shot flow start gate.
pub mod gate;
/// Text input normalization and submission triggers.
pub mod input;
pub mod settings;
/// Shared read-only views captured by notifications.
pub mod snapshot;
/// Per-instance context wiring everything together.
pub mod widget;

pub use error::{WidgetError, WidgetResult};
pub use events::{Notification, NotificationKind};
pub use gate::{FlowStartTrigger, FlowTransition, InteractionGate, InteractionState};
pub use settings::{Settings, SettingsStore};
pub use widget::{FlowEngine, KeyDownOutcome, PointerOutcome, SubmitOutcome, WidgetContext};
