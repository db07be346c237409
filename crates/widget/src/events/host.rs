use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;

use crate::error::{EncodeHostEventSnafu, WidgetResult};
use crate::events::kind::NotificationKind;
use crate::events::notification::{EventDetail, Notification};
use crate::settings::Settings;
use crate::snapshot::{Message, Styles};

/// Host listener answer for one forwarded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostVerdict {
    #[default]
    Proceed,
    PreventDefault,
}

/// Wire shape handed to the host page's native event mechanism.
#[derive(Debug, Clone, Serialize)]
pub struct HostEvent<'a> {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub cancelable: bool,
    pub detail: &'a EventDetail,
    pub data: &'a Value,
    pub settings: &'a Settings,
    pub styles: &'a Styles,
    pub messages: &'a [Message],
    pub paths: &'a [String],
}

impl<'a> HostEvent<'a> {
    pub fn from_notification(notification: &'a Notification) -> Self {
        Self {
            kind: notification.kind(),
            cancelable: notification.is_cancelable(),
            detail: notification.detail(),
            data: notification.data(),
            settings: notification.settings(),
            styles: notification.styles(),
            messages: notification.messages(),
            paths: notification.paths(),
        }
    }

    pub fn to_json(&self) -> WidgetResult<Value> {
        serde_json::to_value(self).context(EncodeHostEventSnafu {
            stage: "encode-host-event",
            kind: self.kind.name(),
        })
    }
}

/// Forwards notifications onto the host environment.
///
/// Implementations wrap whatever the host exposes, for example a DOM
/// `CustomEvent` dispatch, and report whether a host listener vetoed it.
pub trait HostBridge {
    fn forward(&mut self, event: &HostEvent<'_>) -> HostVerdict;
}

/// Bridge that records every encoded event and vetoes a configured set of kinds.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    recorded: Vec<Value>,
    veto: Vec<NotificationKind>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vetoing(kinds: impl IntoIterator<Item = NotificationKind>) -> Self {
        Self {
            recorded: Vec::new(),
            veto: kinds.into_iter().collect(),
        }
    }

    pub fn recorded(&self) -> &[Value] {
        &self.recorded
    }
}

impl HostBridge for RecordingBridge {
    fn forward(&mut self, event: &HostEvent<'_>) -> HostVerdict {
        match event.to_json() {
            Ok(encoded) => self.recorded.push(encoded),
            Err(error) => tracing::warn!("{}", error),
        }

        if self.veto.contains(&event.kind) {
            HostVerdict::PreventDefault
        } else {
            HostVerdict::Proceed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::snapshot::{Sender, Snapshot};

    #[test]
    fn encodes_every_snapshot_field() {
        let snapshot = Snapshot {
            messages: Arc::new(vec![Message::new("m1", Sender::Bot, "Hello!", "t0")]),
            paths: Arc::new(vec!["start".to_string()]),
            ..Snapshot::default()
        };
        let notification = Notification::new(
            NotificationKind::ShowToast,
            EventDetail::from_paths(&snapshot.paths),
            json!({ "content": "saved" }),
            snapshot,
        );

        let encoded = HostEvent::from_notification(&notification).to_json().unwrap();

        assert_eq!(encoded["type"], "show-toast");
        assert_eq!(encoded["cancelable"], true);
        assert_eq!(encoded["detail"]["currPath"], "start");
        assert_eq!(encoded["data"]["content"], "saved");
        assert_eq!(encoded["messages"][0]["sender"], "BOT");
        assert_eq!(encoded["paths"], json!(["start"]));
        assert_eq!(encoded["settings"]["general"]["flowStartTrigger"], "ON_LOAD");
    }

    #[test]
    fn recording_bridge_vetoes_configured_kinds() {
        let mut bridge = RecordingBridge::vetoing([NotificationKind::ToggleAudio]);
        let audio = Notification::new(
            NotificationKind::ToggleAudio,
            EventDetail::default(),
            Value::Null,
            Snapshot::default(),
        );
        let voice = Notification::new(
            NotificationKind::ToggleVoice,
            EventDetail::default(),
            Value::Null,
            Snapshot::default(),
        );

        assert_eq!(
            bridge.forward(&HostEvent::from_notification(&audio)),
            HostVerdict::PreventDefault
        );
        assert_eq!(
            bridge.forward(&HostEvent::from_notification(&voice)),
            HostVerdict::Proceed
        );
        assert_eq!(bridge.recorded().len(), 2);
    }
}
