//! Device registry.
//!
//! [`DeviceRegistry`] is the single source of truth mapping host-reported
//! devices to [`DeviceRole`]s, and the distributor of connect/disconnect
//! notifications to bindings.
//!
//! # Flow
//! 1. [`DeviceRegistry::start`] enumerates what is already attached and treats
//!    each device as if it had just connected.
//! 2. The host forwards hot-plug events through [`DeviceRegistry::handle`].
//! 3. Each event is classified; filtered and unsupported devices produce no
//!    notification at all.
//!
//! Notifications are synchronous: by the time `handle` returns, every
//! listener has run. A connect delivered before a listener subscribed is
//! **not** replayed to it later.

use log::{debug, warn};
use std::fmt;
use std::rc::Rc;

use crate::device::{DeviceHandle, HostEvent, XrInputHost};
use crate::event::{DeviceConnected, DeviceDisconnected, DeviceRole, HostDeviceClass};
use crate::eventbus::{ListenerId, Observers, RoleFilter};

/// Outcome of mapping a host device class onto a domain role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Tracking references and hardware trackers. Dropped without a trace.
    Filtered,
    /// A category ByteXR has no role for. Logged, then treated as unknown.
    Unsupported(HostDeviceClass),
    Role(DeviceRole),
}

impl Classification {
    /// The domain role; anything not mapped is [`DeviceRole::Unknown`].
    pub fn role(self) -> DeviceRole {
        match self {
            Self::Role(role) => role,
            Self::Filtered | Self::Unsupported(_) => DeviceRole::Unknown,
        }
    }
}

/// Maps a host device class to a [`Classification`]. Pure; does not log.
pub fn classify(class: HostDeviceClass) -> Classification {
    match class {
        HostDeviceClass::TrackingReference | HostDeviceClass::HardwareTracker => {
            Classification::Filtered
        }
        // Generic is what XR runtimes report for the HMD.
        HostDeviceClass::Generic => Classification::Role(DeviceRole::Head),
        HostDeviceClass::LeftHanded => Classification::Role(DeviceRole::LeftHand),
        HostDeviceClass::RightHanded => Classification::Role(DeviceRole::RightHand),
        other => Classification::Unsupported(other),
    }
}

/// Registry of connected XR devices and their listeners.
#[derive(Default)]
pub struct DeviceRegistry {
    connected_listeners: Observers<DeviceConnected>,
    disconnected_listeners: Observers<DeviceDisconnected>,
    connected: Vec<(DeviceRole, DeviceHandle)>,
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = self.connected.iter().map(|(r, d)| (*r, d.id())).collect();
        f.debug_struct("DeviceRegistry")
            .field("connected", &ids)
            .field("connected_listeners", &self.connected_listeners)
            .field("disconnected_listeners", &self.disconnected_listeners)
            .finish()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates the host's attached devices and connects each in turn.
    pub fn start(&mut self, host: &dyn XrInputHost) {
        let devices = host.devices();
        debug!("registry start: {} attached device(s)", devices.len());
        for device in devices {
            self.device_connected(device);
        }
    }

    /// Forwards a host lifecycle event.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Connected(device) => self.device_connected(device),
            HostEvent::Disconnected(device) => self.device_disconnected(&device),
        }
    }

    /// Classifies `device` and notifies connect-listeners for its role.
    pub fn device_connected(&mut self, device: DeviceHandle) {
        let role = self.resolve(&device);
        if role == DeviceRole::Unknown {
            return;
        }

        debug!("device {} connected as {}", device.id(), role);
        self.connected.retain(|(_, d)| d.id() != device.id());
        self.connected.push((role, Rc::clone(&device)));
        self.connected_listeners
            .notify(&DeviceConnected { role, device });
    }

    /// Classifies `device` and notifies disconnect-listeners for its role.
    pub fn device_disconnected(&mut self, device: &DeviceHandle) {
        let role = self.resolve(device);
        if role == DeviceRole::Unknown {
            return;
        }

        debug!("device {} disconnected ({})", device.id(), role);
        self.connected.retain(|(_, d)| d.id() != device.id());
        self.disconnected_listeners
            .notify(&DeviceDisconnected { role });
    }

    /// Subscribes to connects whose role passes `filter`.
    pub fn on_connected(
        &mut self,
        filter: RoleFilter,
        mut callback: impl FnMut(&DeviceConnected) + 'static,
    ) -> ListenerId {
        self.connected_listeners.subscribe(move |ev: &DeviceConnected| {
            if filter.matches(ev.role) {
                callback(ev);
            }
        })
    }

    /// Subscribes to disconnects whose role passes `filter`.
    pub fn on_disconnected(
        &mut self,
        filter: RoleFilter,
        mut callback: impl FnMut(&DeviceDisconnected) + 'static,
    ) -> ListenerId {
        self.disconnected_listeners
            .subscribe(move |ev: &DeviceDisconnected| {
                if filter.matches(ev.role) {
                    callback(ev);
                }
            })
    }

    /// Like [`on_connected`](Self::on_connected), but `callback` returns
    /// whether it is still alive; a dead one is dropped on the spot.
    pub fn on_connected_while(
        &mut self,
        filter: RoleFilter,
        mut callback: impl FnMut(&DeviceConnected) -> bool + 'static,
    ) -> ListenerId {
        self.connected_listeners
            .subscribe_while(move |ev: &DeviceConnected| {
                !filter.matches(ev.role) || callback(ev)
            })
    }

    /// Disconnect counterpart of [`on_connected_while`](Self::on_connected_while).
    pub fn on_disconnected_while(
        &mut self,
        filter: RoleFilter,
        mut callback: impl FnMut(&DeviceDisconnected) -> bool + 'static,
    ) -> ListenerId {
        self.disconnected_listeners
            .subscribe_while(move |ev: &DeviceDisconnected| {
                !filter.matches(ev.role) || callback(ev)
            })
    }

    pub fn unsubscribe_connected(&mut self, id: ListenerId) -> bool {
        self.connected_listeners.unsubscribe(id)
    }

    pub fn unsubscribe_disconnected(&mut self, id: ListenerId) -> bool {
        self.disconnected_listeners.unsubscribe(id)
    }

    /// Devices currently connected under a bindable role, in connect order.
    ///
    /// Diagnostic view only; nothing is replayed from it.
    pub fn connected(&self) -> impl Iterator<Item = (DeviceRole, &DeviceHandle)> {
        self.connected.iter().map(|(role, dev)| (*role, dev))
    }

    pub fn listener_count(&self) -> (usize, usize) {
        (
            self.connected_listeners.len(),
            self.disconnected_listeners.len(),
        )
    }

    fn resolve(&self, device: &DeviceHandle) -> DeviceRole {
        let classification = classify(device.class());
        if let Classification::Unsupported(class) = classification {
            warn!(
                "ignoring unhandled input device {} ({}): class {}",
                device.id(),
                device.name(),
                class
            );
        }
        classification.role()
    }
}
