//! Device backends for `bytexr`.
//!
//! Implementations of [`PhysicalDevice`](crate::device::PhysicalDevice) and
//! [`XrInputHost`](crate::device::XrInputHost).
//!
//! Engine integrations provide their own implementations over the engine's
//! XR input API; the only backend shipped here is the in-memory
//! [`virtual_input`] one, used for tests, demos, and headless runs.

pub mod virtual_input;
