//! Listeners that log what they hear.
//!
//! Handy while wiring a rig up: attach a [`Logger`] to a controller's
//! channels (or to the registry) and every notification shows up in the
//! `log` output at info level.

use log::info;

use crate::controller::ControlChannels;
use crate::eventbus::RoleFilter;
use crate::manager::DeviceRegistry;

pub struct Logger {
    name: String,
}

impl Logger {
    pub fn new(name: &str) -> Self {
        Logger {
            name: name.to_string(),
        }
    }

    /// Subscribes a logging callback to every control channel.
    pub fn attach(&self, channels: &mut ControlChannels) {
        let name = self.name.clone();
        channels
            .trigger
            .subscribe(move |v: &f32| info!("[{name}] trigger = {v}"));

        let name = self.name.clone();
        channels
            .touchpad_touch
            .subscribe(move |v: &bool| info!("[{name}] touchpad touch = {v}"));

        let name = self.name.clone();
        channels
            .touchpad_click
            .subscribe(move |v: &bool| info!("[{name}] touchpad click = {v}"));

        let name = self.name.clone();
        channels
            .touchpad_axis
            .subscribe(move |v| info!("[{name}] touchpad axis = ({}, {})", v.x, v.y));

        let name = self.name.clone();
        channels
            .menu
            .subscribe(move |v: &bool| info!("[{name}] menu = {v}"));

        let name = self.name.clone();
        channels
            .grip
            .subscribe(move |v: &bool| info!("[{name}] grip = {v}"));
    }

    /// Logs every connect and disconnect the registry dispatches.
    pub fn attach_registry(&self, registry: &mut DeviceRegistry) {
        let name = self.name.clone();
        registry.on_connected(RoleFilter::Any, move |ev| {
            info!("[{name}] {} connected: {} ({})", ev.role, ev.device.id(), ev.device.name())
        });

        let name = self.name.clone();
        registry.on_disconnected(RoleFilter::Any, move |ev| {
            info!("[{name}] {} disconnected", ev.role)
        });
    }
}
