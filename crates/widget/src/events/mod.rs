/// Per-instance publish/subscribe registry.
pub mod bus;
pub mod emitter;
/// Adapter onto the host page's native event mechanism.
pub mod host;
/// Closed set of notification kinds and their cancel policy.
pub mod kind;
pub mod notification;

pub use bus::{ListenerId, ListenerResult, NotificationBus};
pub use emitter::NotificationEmitter;
pub use host::{HostBridge, HostEvent, HostVerdict, RecordingBridge};
pub use kind::{NotificationKind, is_cancelable, is_cancelable_by_name};
pub use notification::{EventDetail, Notification, SubmitTextData};
