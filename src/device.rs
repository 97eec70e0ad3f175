//! Physical device and host seams.
//!
//! The host engine owns every physical device. ByteXR only ever sees a shared
//! [`DeviceHandle`] and queries it feature by feature. A query that the host
//! cannot answer this frame yields `None`; that is expected (the device is
//! momentarily not tracking, or lacks the feature) and never an error.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::{Feature, HostDeviceClass, Quat, Vec2, Vec3};

/// Opaque device supplied by the host XR input layer.
pub trait PhysicalDevice {
    /// Stable identifier for logs and snapshots.
    fn id(&self) -> &str;
    /// Human-readable name (best-effort).
    fn name(&self) -> &str;
    /// Host category used for role classification.
    fn class(&self) -> HostDeviceClass;

    fn read_bool(&self, feature: Feature) -> Option<bool>;
    fn read_f32(&self, feature: Feature) -> Option<f32>;
    fn read_vec2(&self, feature: Feature) -> Option<Vec2>;
    fn read_vec3(&self, feature: Feature) -> Option<Vec3>;
    fn read_quat(&self, feature: Feature) -> Option<Quat>;
}

/// Shared handle to a host-owned device.
pub type DeviceHandle = Rc<dyn PhysicalDevice>;

/// A binding's view of its device: either nothing, or a non-owning reference.
///
/// A bound device that the host has since dropped reads as unbound.
#[derive(Clone, Default)]
pub enum DeviceSlot {
    #[default]
    Unbound,
    Bound(Weak<dyn PhysicalDevice>),
}

impl DeviceSlot {
    pub fn bind(device: &DeviceHandle) -> Self {
        Self::Bound(Rc::downgrade(device))
    }

    /// Upgrade to a usable handle, if the device is still alive.
    pub fn get(&self) -> Option<DeviceHandle> {
        match self {
            Self::Unbound => None,
            Self::Bound(weak) => weak.upgrade(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for DeviceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(dev) => write!(f, "Bound({})", dev.id()),
            None => f.write_str("Unbound"),
        }
    }
}

/// Inbound device lifecycle notification pushed by the host.
#[derive(Clone)]
pub enum HostEvent {
    Connected(DeviceHandle),
    Disconnected(DeviceHandle),
}

impl fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected(d) => write!(f, "Connected({})", d.id()),
            Self::Disconnected(d) => write!(f, "Disconnected({})", d.id()),
        }
    }
}

/// The host XR input layer, as seen at startup.
pub trait XrInputHost {
    /// All devices attached right now.
    fn devices(&self) -> Vec<DeviceHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualDevice;

    #[test]
    fn slot_reads_unbound_after_host_drops_device() {
        let dev: DeviceHandle = Rc::new(VirtualDevice::new(
            "vd:0",
            "Left",
            HostDeviceClass::LeftHanded,
        ));
        let slot = DeviceSlot::bind(&dev);
        assert!(slot.is_bound());

        drop(dev);
        assert!(!slot.is_bound());
        assert!(slot.get().is_none());
    }

    #[test]
    fn default_slot_is_unbound() {
        assert!(!DeviceSlot::default().is_bound());
    }
}
