//! Roles, features, and notification payloads.
//!
//! ByteXR talks about devices in two vocabularies:
//! - the **host's** category for a device ([`HostDeviceClass`]), as reported by the
//!   engine's XR input layer, and
//! - the **domain** role a binding cares about ([`DeviceRole`]).
//!
//! The registry maps the first onto the second (see
//! [`classify`](crate::manager::classify)). Everything downstream only sees roles.
//!
//! ## Value conventions
//! - **Trigger:** scalar as reported by the host, typically `[0.0, 1.0]`.
//! - **Touchpad axis:** 2D vector as reported by the host, typically `[-1.0, 1.0]` per component.
//! - **Buttons:** plain `bool` state, not edges. A change of state is the event.
//! - **Pose:** engine-space position (`Vec3`) and orientation (`Quat`), unfiltered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::device::DeviceHandle;

/// 2D vector used for touchpad axes.
pub type Vec2 = nalgebra::Vector2<f32>;
/// 3D vector used for device positions.
pub type Vec3 = nalgebra::Vector3<f32>;
/// Unit quaternion used for device orientations.
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Logical category a physical device is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceRole {
    /// Unsupported device. Never bound to anything.
    Unknown,
    /// A binding that has not been assigned a concrete role yet.
    #[default]
    Unset,
    /// Head-mounted display.
    Head,
    /// Left hand controller.
    LeftHand,
    /// Right hand controller.
    RightHand,
}

impl DeviceRole {
    /// Whether a device of this role can ever be bound.
    pub fn is_bindable(self) -> bool {
        matches!(self, Self::Head | Self::LeftHand | Self::RightHand)
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Unset => "unset",
            Self::Head => "head",
            Self::LeftHand => "left-hand",
            Self::RightHand => "right-hand",
        };
        f.write_str(s)
    }
}

/// Device category as reported by the host XR input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostDeviceClass {
    Unknown,
    /// Generic device; for XR runtimes this is the HMD / camera.
    Generic,
    LeftHanded,
    RightHanded,
    GameController,
    /// Base stations, lighthouses.
    TrackingReference,
    /// Standalone trackers and controllers not yet assigned a hand.
    HardwareTracker,
    LegacyController,
}

impl fmt::Display for HostDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A named, queryable input channel on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Trigger,
    Primary2DAxis,
    Primary2DAxisTouch,
    Primary2DAxisClick,
    PrimaryButton,
    GripButton,
    DevicePosition,
    DeviceRotation,
}

impl Feature {
    /// Stable name used in logs and by hosts that key features by string.
    pub fn name(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Primary2DAxis => "primary2DAxis",
            Self::Primary2DAxisTouch => "primary2DAxisTouch",
            Self::Primary2DAxisClick => "primary2DAxisClick",
            Self::PrimaryButton => "primaryButton",
            Self::GripButton => "gripButton",
            Self::DevicePosition => "devicePosition",
            Self::DeviceRotation => "deviceRotation",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single control-state transition surfaced by a controller binding.
///
/// The carried value is the **new** state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlChange {
    Trigger(f32),
    TouchpadTouch(bool),
    TouchpadClick(bool),
    /// Only emitted while the touchpad is touched.
    TouchpadAxis(Vec2),
    Menu(bool),
    Grip(bool),
}

/// Payload delivered to registry connect-listeners.
#[derive(Clone)]
pub struct DeviceConnected {
    pub role: DeviceRole,
    pub device: DeviceHandle,
}

impl fmt::Debug for DeviceConnected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConnected")
            .field("role", &self.role)
            .field("device", &self.device.id())
            .finish()
    }
}

/// Payload delivered to registry disconnect-listeners.
///
/// No handle is carried; listeners already hold it from the earlier connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDisconnected {
    pub role: DeviceRole,
}
