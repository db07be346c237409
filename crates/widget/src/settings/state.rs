use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{LoadSettingsSnafu, ParseSettingsSnafu, WidgetResult};
use crate::gate::FlowStartTrigger;

pub const DEFAULT_PRIMARY_COLOR: &str = "#42b0c5";
pub const DEFAULT_ENABLED_PLACEHOLDER: &str = "Type your message...";

/// Widget-wide behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub primary_color: String,
    pub flow_start_trigger: FlowStartTrigger,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            flow_start_trigger: FlowStartTrigger::default(),
        }
    }
}

/// Text input policy consumed by the input pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatInputSettings {
    pub allow_newline: bool,
    /// `None` or any negative value means unlimited.
    pub character_limit: Option<i64>,
    pub show_character_count: bool,
    pub enabled_placeholder_text: String,
    pub disabled_placeholder_text: String,
    /// Disables the text area while an accepted submission is being handled.
    pub block_spam: bool,
}

impl Default for ChatInputSettings {
    fn default() -> Self {
        Self {
            allow_newline: false,
            character_limit: None,
            show_character_count: false,
            enabled_placeholder_text: DEFAULT_ENABLED_PLACEHOLDER.to_string(),
            disabled_placeholder_text: String::new(),
            block_spam: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensitiveInputSettings {
    pub mask_in_text_area: bool,
    pub hide_in_user_bubble: bool,
}

impl Default for SensitiveInputSettings {
    fn default() -> Self {
        Self {
            mask_in_text_area: true,
            hide_in_user_bubble: false,
        }
    }
}

/// Typed snapshot of the host-owned settings tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chat_input: ChatInputSettings,
    pub sensitive_input: SensitiveInputSettings,
}

impl Settings {
    /// Parses a (possibly partial) JSON settings document over the defaults.
    pub fn from_json_str(raw: &str) -> WidgetResult<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::string(raw))
            .extract()
            .context(ParseSettingsSnafu {
                stage: "parse-settings-json",
            })
    }

    pub fn from_json_file(path: &Path) -> WidgetResult<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .extract()
            .context(LoadSettingsSnafu {
                stage: "load-settings-file",
                path: path.to_path_buf(),
            })
    }
}

/// Holds the current settings behind a swappable shared pointer.
///
/// Notifications capture `Arc<Settings>` so a later update never changes what an
/// already dispatched notification observed.
pub struct SettingsStore {
    settings: ArcSwap<Settings>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Loads settings from disk, falling back to defaults when missing or malformed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            Settings::default()
        } else {
            match Settings::from_json_file(&path) {
                Ok(settings) => settings,
                Err(error) => {
                    tracing::warn!("{}. using defaults", error);
                    Settings::default()
                }
            }
        };

        Self::new(settings)
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    pub fn update(&self, settings: Settings) {
        self.settings.store(Arc::new(settings));
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
