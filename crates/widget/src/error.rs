use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WidgetError {
    #[snafu(display("notification kind '{name}' is not registered"))]
    UnknownNotificationKind { stage: &'static str, name: String },
    #[snafu(display("failed to parse settings on `{stage}`: {source}"))]
    ParseSettings {
        stage: &'static str,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
    #[snafu(display("failed to load settings from {path:?} on `{stage}`: {source}"))]
    LoadSettings {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
    #[snafu(display("failed to encode notification '{kind}' for the host: {source}"))]
    EncodeHostEvent {
        stage: &'static str,
        kind: &'static str,
        source: serde_json::Error,
    },
}

pub type WidgetResult<T> = Result<T, WidgetError>;
