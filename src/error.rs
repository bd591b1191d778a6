use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {format} content: {message}")]
    Decode { format: &'static str, message: String },

    #[error("cannot start {app}: {message}")]
    Launch { app: String, message: String },

    #[error("window system error: {0}")]
    Platform(String),

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PreviewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(format: &'static str, message: impl Display) -> Self {
        Self::Decode {
            format,
            message: message.to_string(),
        }
    }

    pub fn launch(app: impl Into<String>, message: impl Display) -> Self {
        Self::Launch {
            app: app.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
