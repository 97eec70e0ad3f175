//! Per-frame snapshot of a rig.
//!
//! [`RigSnapshot`] is an **owned**, read-only view of every binding at a
//! point in time (typically "after this frame's tick"). It is produced by
//! [`XrRig::snapshot`](crate::rig::XrRig::snapshot) and serializes to JSON for
//! debug overlays and logs.
//!
//! # Semantics
//! - `device` is the id of the bound device, or `None` while unbound.
//! - `controls` is `None` for the head binding, which tracks no controls.
//! - A snapshot does **not** poll devices; it reflects last-known state.

use serde::{Deserialize, Serialize};

use crate::binding::Transform;
use crate::controller::ControlState;
use crate::error::Result;
use crate::event::DeviceRole;
use crate::metadata::DeviceMeta;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingSnapshot {
    pub name: String,
    pub role: DeviceRole,
    pub device: Option<String>,
    pub transform: Transform,
    pub controls: Option<ControlState>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigSnapshot {
    pub name: String,
    /// Devices the registry currently considers connected. Empty when the
    /// scene has no registry.
    pub devices: Vec<DeviceMeta>,
    pub head: Option<BindingSnapshot>,
    pub controllers: Vec<BindingSnapshot>,
}

impl RigSnapshot {
    /// Look up a controller by binding name.
    pub fn controller(&self, name: &str) -> Option<&BindingSnapshot> {
        self.controllers.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
