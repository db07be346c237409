use std::cell::Cell;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::kind::NotificationKind;
use crate::settings::Settings;
use crate::snapshot::{Message, Snapshot, Styles};

/// Flow position at the moment a notification was raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub curr_path: Option<String>,
    pub prev_path: Option<String>,
}

impl EventDetail {
    /// Derives current and previous path from the top of the paths stack.
    pub fn from_paths(paths: &[String]) -> Self {
        let mut recent = paths.iter().rev();
        Self {
            curr_path: recent.next().cloned(),
            prev_path: recent.next().cloned(),
        }
    }
}

/// Payload attached to `UserSubmitText`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTextData {
    pub input_text: String,
    pub send_in_chat: bool,
}

/// One announced state transition together with the state it was raised in.
///
/// Snapshot fields are shared references to the versions current at dispatch.
/// The veto flag is the only mutable part and only listeners touch it.
#[derive(Debug)]
pub struct Notification {
    kind: NotificationKind,
    detail: EventDetail,
    data: Value,
    snapshot: Snapshot,
    cancelable: bool,
    vetoed: Cell<bool>,
}

impl Notification {
    pub fn new(kind: NotificationKind, detail: EventDetail, data: Value, snapshot: Snapshot) -> Self {
        Self {
            kind,
            detail,
            data,
            snapshot,
            cancelable: kind.is_cancelable(),
            vetoed: Cell::new(false),
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.snapshot.settings
    }

    pub fn styles(&self) -> &Arc<Styles> {
        &self.snapshot.styles
    }

    pub fn messages(&self) -> &Arc<Vec<Message>> {
        &self.snapshot.messages
    }

    pub fn paths(&self) -> &Arc<Vec<String>> {
        &self.snapshot.paths
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Requests that the caller skip its default action.
    ///
    /// Returns whether the request took effect; it never does for
    /// non-cancelable kinds.
    pub fn prevent_default(&self) -> bool {
        if !self.cancelable {
            tracing::debug!("ignoring veto on non-cancelable notification '{}'", self.kind);
            return false;
        }
        self.vetoed.set(true);
        true
    }

    pub fn is_vetoed(&self) -> bool {
        self.vetoed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|path| path.to_string()).collect()
    }

    #[test]
    fn detail_reads_top_of_paths_stack() {
        let detail = EventDetail::from_paths(&paths(&["start", "ask_name", "greet"]));
        assert_eq!(detail.curr_path.as_deref(), Some("greet"));
        assert_eq!(detail.prev_path.as_deref(), Some("ask_name"));

        let detail = EventDetail::from_paths(&paths(&["start"]));
        assert_eq!(detail.curr_path.as_deref(), Some("start"));
        assert_eq!(detail.prev_path, None);

        assert_eq!(EventDetail::from_paths(&[]), EventDetail::default());
    }

    #[test]
    fn veto_sticks_on_cancelable_kinds() {
        let notification = Notification::new(
            NotificationKind::UserSubmitText,
            EventDetail::default(),
            Value::Null,
            Snapshot::default(),
        );
        assert!(notification.is_cancelable());
        assert!(!notification.is_vetoed());

        assert!(notification.prevent_default());
        assert!(notification.prevent_default());
        assert!(notification.is_vetoed());
    }

    #[test]
    fn veto_is_ignored_on_non_cancelable_kinds() {
        let notification = Notification::new(
            NotificationKind::PostInjectMessage,
            EventDetail::default(),
            Value::Null,
            Snapshot::default(),
        );
        assert!(!notification.prevent_default());
        assert!(!notification.is_vetoed());
    }

    #[test]
    fn submit_payload_uses_host_field_names() {
        let data = serde_json::to_value(SubmitTextData {
            input_text: "hello".to_string(),
            send_in_chat: true,
        })
        .unwrap();
        assert_eq!(data, serde_json::json!({ "inputText": "hello", "sendInChat": true }));
    }
}
