pub mod state;

pub use state::{
    ChatInputSettings, GeneralSettings, SensitiveInputSettings, Settings, SettingsStore,
};
