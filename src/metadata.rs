//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of a device suitable
//! for UI display, logging, and persistence. It is built from a live handle
//! and does not keep the device alive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::device::PhysicalDevice;
use crate::event::{DeviceRole, HostDeviceClass};
use crate::manager::classify;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Host-provided identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Category as the host reported it.
    pub class: HostDeviceClass,
    /// Role the registry classifies it as.
    pub role: DeviceRole,
}

impl DeviceMeta {
    pub fn describe(device: &dyn PhysicalDevice) -> Self {
        Self {
            id: device.id().to_string(),
            name: device.name().to_string(),
            class: device.class(),
            role: classify(device.class()).role(),
        }
    }
}

impl fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] as {}", self.name, self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualDevice;

    #[test]
    fn describes_role_from_class() {
        let dev = VirtualDevice::new("v:1", "Tracker", HostDeviceClass::HardwareTracker);
        let meta = DeviceMeta::describe(&dev);
        assert_eq!(meta.role, DeviceRole::Unknown);
        assert_eq!(meta.to_string(), "Tracker [v:1] as unknown");
    }
}
