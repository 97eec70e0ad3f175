//! Rig configuration.
//!
//! Everything a host would otherwise set through an inspector lives here as
//! plain data: which controllers exist, which hand each one follows, and
//! whether to log their controls. Configs load from TOML or JSON.
//!
//! ```toml
//! name = "vive"
//! head = true
//!
//! [[controllers]]
//! name = "left"
//! role = "LeftHand"
//! log_controls = true
//!
//! [[controllers]]
//! name = "right"
//! role = "RightHand"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, XrError};
use crate::event::DeviceRole;

/// One controller binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    /// Defaults to [`DeviceRole::Unset`]; the binding stays idle until set.
    #[serde(default)]
    pub role: DeviceRole,
    /// Attach a [`Logger`](crate::logger::Logger) to every control channel.
    #[serde(default)]
    pub log_controls: bool,
}

impl BindingConfig {
    pub fn new(name: &str, role: DeviceRole) -> Self {
        Self {
            name: name.to_string(),
            role,
            log_controls: false,
        }
    }
}

/// A full rig: optional head binding plus any number of controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub name: String,
    /// Create a head binding that follows the HMD.
    pub head: bool,
    /// Log every registry connect/disconnect.
    pub log_devices: bool,
    pub controllers: Vec<BindingConfig>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            name: "rig".to_string(),
            head: true,
            log_devices: false,
            controllers: vec![
                BindingConfig::new("left", DeviceRole::LeftHand),
                BindingConfig::new("right", DeviceRole::RightHand),
            ],
        }
    }
}

impl RigConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file; `.json` files parse as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| XrError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Rejects duplicate controller names and controllers that could never bind.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.controllers {
            if !seen.insert(c.name.as_str()) {
                return Err(XrError::DuplicateBinding(c.name.clone()));
            }
            if c.role == DeviceRole::Unknown {
                return Err(XrError::InvalidRole {
                    name: c.name.clone(),
                    role: c.role,
                });
            }
        }
        Ok(())
    }
}
