//! ByteXR — XR head/controller detection and control-state broadcasting.
//!
//! Reads head-mounted display and hand-controller input through a host's XR
//! input layer and rebroadcasts what changed:
//! - a [`DeviceRegistry`] classifies devices by role and announces connects
//!   and disconnects,
//! - a [`DeviceBinding`] follows one role and copies its pose onto a transform,
//! - a [`ControllerBinding`] additionally diffs trigger, touchpad, menu, and
//!   grip state each frame and notifies only on change.
//!
//! Everything runs synchronously inside the host's frame loop; [`XrRig`] is
//! the adapter a host drives.

pub mod backends;
pub mod binding;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod rig;
pub mod snapshot;

pub use binding::*;
pub use config::*;
pub use controller::*;
pub use device::*;
pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use manager::*;
pub use rig::*;
