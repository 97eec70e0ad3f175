//! Device bindings.
//!
//! A [`DeviceBinding`] bridges one physical device of a given [`DeviceRole`]
//! to one scene object's transform. It learns about devices only through the
//! [`DeviceRegistry`]: on attach it subscribes to connect/disconnect, and the
//! subscribed handlers filter on the binding's *current* role, so reassigning
//! the role at runtime takes effect on the next registry event.
//!
//! Host lifecycle is explicit:
//! - [`DeviceBinding::on_attach`] when the scene object comes alive,
//! - [`DeviceBinding::on_frame_tick`] once per frame,
//! - [`DeviceBinding::on_detach`] when it goes away.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::BindingConfig;
use crate::device::{DeviceHandle, DeviceSlot};
use crate::event::{DeviceRole, Feature, Quat, Vec3};
use crate::eventbus::{ListenerId, RoleFilter};
use crate::manager::DeviceRegistry;

/// The host's scene-graph transform, as far as a binding needs it.
pub trait SceneTransform {
    fn set_local_position(&mut self, position: Vec3);
    fn set_local_rotation(&mut self, rotation: Quat);
}

/// Plain local transform. Starts at the origin with identity rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub local_position: Vec3,
    pub local_rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::zeros(),
            local_rotation: Quat::identity(),
        }
    }
}

impl SceneTransform for Transform {
    fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    fn set_local_rotation(&mut self, rotation: Quat) {
        self.local_rotation = rotation;
    }
}

#[derive(Debug, Default)]
struct BindingState {
    role: DeviceRole,
    slot: DeviceSlot,
}

#[derive(Debug, Clone, Copy)]
struct Subscription {
    connected: ListenerId,
    disconnected: ListenerId,
}

/// Binds one device of a role to one scene transform.
#[derive(Debug)]
pub struct DeviceBinding {
    state: Rc<RefCell<BindingState>>,
    subscription: Option<Subscription>,
}

impl Default for DeviceBinding {
    fn default() -> Self {
        Self::new(DeviceRole::Unset)
    }
}

impl DeviceBinding {
    /// A binding for the given role. Use [`DeviceRole::Unset`] for a
    /// controller whose hand is chosen later.
    pub fn new(role: DeviceRole) -> Self {
        Self {
            state: Rc::new(RefCell::new(BindingState {
                role,
                slot: DeviceSlot::Unbound,
            })),
            subscription: None,
        }
    }

    /// The head-mounted display binding.
    pub fn head() -> Self {
        Self::new(DeviceRole::Head)
    }

    pub fn from_config(config: &BindingConfig) -> Self {
        Self::new(config.role)
    }

    pub fn role(&self) -> DeviceRole {
        self.state.borrow().role
    }

    /// Reassigns the role. Any currently bound device is released, since it
    /// was bound under the old role.
    pub fn set_role(&mut self, role: DeviceRole) {
        let mut state = self.state.borrow_mut();
        if state.role != role {
            state.role = role;
            state.slot = DeviceSlot::Unbound;
        }
    }

    /// The bound device, if any and still alive.
    pub fn device(&self) -> Option<DeviceHandle> {
        self.state.borrow().slot.get()
    }

    pub fn is_bound(&self) -> bool {
        self.device().is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes to `registry`. With no registry in the scene this logs an
    /// error and the binding simply never binds; returns whether it attached.
    pub fn on_attach(&mut self, registry: Option<&mut DeviceRegistry>) -> bool {
        let Some(registry) = registry else {
            error!(
                "missing device registry in the scene; {} binding will never receive a device",
                self.role()
            );
            return false;
        };
        if self.subscription.is_some() {
            return true;
        }

        // A binding dropped without `on_detach` leaves its listeners behind;
        // they report dead on the next dispatch and the registry drops them.
        let weak = Rc::downgrade(&self.state);
        let connected = registry.on_connected_while(RoleFilter::Any, move |ev| {
            let Some(state) = weak.upgrade() else {
                return false;
            };
            let mut state = state.borrow_mut();
            if ev.role == state.role {
                info!("{} binding bound to {} ({})", ev.role, ev.device.id(), ev.device.name());
                state.slot = DeviceSlot::bind(&ev.device);
            }
            true
        });

        let weak = Rc::downgrade(&self.state);
        let disconnected = registry.on_disconnected_while(RoleFilter::Any, move |ev| {
            let Some(state) = weak.upgrade() else {
                return false;
            };
            let mut state = state.borrow_mut();
            if ev.role == state.role {
                info!("{} binding unbound", ev.role);
                state.slot = DeviceSlot::Unbound;
            }
            true
        });

        self.subscription = Some(Subscription {
            connected,
            disconnected,
        });
        true
    }

    /// Unsubscribes from `registry` and drops the device reference.
    ///
    /// Skipping this before dropping the binding is safe but lazy: its
    /// listeners linger until the next connect and disconnect prune them.
    pub fn on_detach(&mut self, registry: &mut DeviceRegistry) {
        if let Some(sub) = self.subscription.take() {
            registry.unsubscribe_connected(sub.connected);
            registry.unsubscribe_disconnected(sub.disconnected);
        }
        self.state.borrow_mut().slot = DeviceSlot::Unbound;
    }

    /// Copies the bound device's pose onto `target`.
    ///
    /// A feature the host cannot supply this frame leaves the matching part
    /// of `target` untouched. Returns the device so specializations can keep
    /// polling it; `None` means nothing happened.
    pub fn on_frame_tick(&mut self, target: &mut dyn SceneTransform) -> Option<DeviceHandle> {
        let device = self.device()?;

        if let Some(position) = device.read_vec3(Feature::DevicePosition) {
            target.set_local_position(position);
        }
        if let Some(rotation) = device.read_quat(Feature::DeviceRotation) {
            target.set_local_rotation(rotation);
        }

        Some(device)
    }
}
