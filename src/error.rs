//! Error types.
//!
//! Only construction surfaces (config loading, rig assembly) can fail. The
//! per-frame path never returns an error: every problem there degrades to a
//! no-op for that frame.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::DeviceRole;

#[derive(Debug, Error)]
pub enum XrError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binding name `{0}` is used more than once")]
    DuplicateBinding(String),

    #[error("binding `{name}` cannot use role {role}")]
    InvalidRole { name: String, role: DeviceRole },

    #[error("no binding named `{0}`")]
    UnknownBinding(String),
}

pub type Result<T> = std::result::Result<T, XrError>;
