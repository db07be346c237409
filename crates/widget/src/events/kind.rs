use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::OptionExt;

use crate::error::{UnknownNotificationKindSnafu, WidgetError, WidgetResult};

/// Every state transition the widget announces to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotificationKind {
    ToggleAudio,
    ToggleVoice,
    ToggleNotifications,
    ToggleChatWindow,
    PreInjectMessage,
    PostInjectMessage,
    StartStreamMessage,
    ChunkStreamMessage,
    StopStreamMessage,
    LoadChatHistory,
    ChangePath,
    ShowToast,
    DismissToast,
    UserSubmitText,
    UserUploadFile,
}

impl NotificationKind {
    pub const ALL: [Self; 15] = [
        Self::ToggleAudio,
        Self::ToggleVoice,
        Self::ToggleNotifications,
        Self::ToggleChatWindow,
        Self::PreInjectMessage,
        Self::PostInjectMessage,
        Self::StartStreamMessage,
        Self::ChunkStreamMessage,
        Self::StopStreamMessage,
        Self::LoadChatHistory,
        Self::ChangePath,
        Self::ShowToast,
        Self::DismissToast,
        Self::UserSubmitText,
        Self::UserUploadFile,
    ];

    /// Returns whether listeners may veto the default action of this kind.
    ///
    /// The match is exhaustive, so a new kind cannot be added without a policy entry.
    pub const fn is_cancelable(self) -> bool {
        match self {
            Self::PostInjectMessage => false,
            Self::ToggleAudio
            | Self::ToggleVoice
            | Self::ToggleNotifications
            | Self::ToggleChatWindow
            | Self::PreInjectMessage
            | Self::StartStreamMessage
            | Self::ChunkStreamMessage
            | Self::StopStreamMessage
            | Self::LoadChatHistory
            | Self::ChangePath
            | Self::ShowToast
            | Self::DismissToast
            | Self::UserSubmitText
            | Self::UserUploadFile => true,
        }
    }

    /// Stable name used on the host side of the bus.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ToggleAudio => "toggle-audio",
            Self::ToggleVoice => "toggle-voice",
            Self::ToggleNotifications => "toggle-notifications",
            Self::ToggleChatWindow => "toggle-chat-window",
            Self::PreInjectMessage => "pre-inject-message",
            Self::PostInjectMessage => "post-inject-message",
            Self::StartStreamMessage => "start-stream-message",
            Self::ChunkStreamMessage => "chunk-stream-message",
            Self::StopStreamMessage => "stop-stream-message",
            Self::LoadChatHistory => "load-chat-history",
            Self::ChangePath => "change-path",
            Self::ShowToast => "show-toast",
            Self::DismissToast => "dismiss-toast",
            Self::UserSubmitText => "user-submit-text",
            Self::UserUploadFile => "user-upload-file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Free-standing registry lookup.
pub const fn is_cancelable(kind: NotificationKind) -> bool {
    kind.is_cancelable()
}

/// Resolves cancelability for a host-supplied kind name.
///
/// Unregistered names are a wiring defect on the host side and are reported as
/// errors instead of being treated as non-cancelable.
pub fn is_cancelable_by_name(name: &str) -> WidgetResult<bool> {
    let kind = name.parse::<NotificationKind>().inspect_err(|error| {
        tracing::error!("cancel policy lookup failed: {}", error);
    })?;
    Ok(kind.is_cancelable())
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for NotificationKind {
    type Err = WidgetError;

    fn from_str(raw: &str) -> WidgetResult<Self> {
        Self::from_name(raw).context(UnknownNotificationKindSnafu {
            stage: "parse-notification-kind",
            name: raw.to_string(),
        })
    }
}

impl Serialize for NotificationKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
