//! Host adapter.
//!
//! [`XrRig`] is what an engine integration drives. It owns the registry (if
//! the scene has one), a head binding, and any number of controller
//! bindings, each paired with the transform it moves. The host calls:
//!
//! - [`XrRig::start`] once, after the XR input layer is up,
//! - [`XrRig::handle`] for every device connect/disconnect it observes,
//! - [`XrRig::on_frame_tick`] once per frame, after this frame's `handle` calls.
//!
//! Because registry notifications are synchronous, a disconnect handled
//! earlier in a frame has already cleared the binding when the tick polls.

use log::debug;

use crate::binding::{DeviceBinding, Transform};
use crate::config::RigConfig;
use crate::controller::ControllerBinding;
use crate::device::{HostEvent, XrInputHost};
use crate::error::{Result, XrError};
use crate::logger::Logger;
use crate::manager::DeviceRegistry;
use crate::metadata::DeviceMeta;
use crate::snapshot::{BindingSnapshot, RigSnapshot};

/// A component together with the transform it drives.
#[derive(Debug)]
pub struct SceneObject<C> {
    pub name: String,
    pub transform: Transform,
    pub component: C,
}

impl<C> SceneObject<C> {
    fn new(name: &str, component: C) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            component,
        }
    }
}

#[derive(Debug)]
pub struct XrRig {
    name: String,
    registry: Option<DeviceRegistry>,
    head: Option<SceneObject<DeviceBinding>>,
    controllers: Vec<SceneObject<ControllerBinding>>,
}

impl XrRig {
    /// Builds a rig with its own registry and attaches every binding.
    pub fn from_config(config: RigConfig) -> Result<Self> {
        Self::build(config, Some(DeviceRegistry::new()))
    }

    /// Builds a rig for a scene with no registry. Bindings log an error on
    /// attach and never receive a device.
    pub fn without_registry(config: RigConfig) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: RigConfig, mut registry: Option<DeviceRegistry>) -> Result<Self> {
        config.validate()?;

        if config.log_devices {
            if let Some(registry) = registry.as_mut() {
                Logger::new(&config.name).attach_registry(registry);
            }
        }

        let head = config.head.then(|| {
            let mut obj = SceneObject::new("head", DeviceBinding::head());
            obj.component.on_attach(registry.as_mut());
            obj
        });

        let controllers = config
            .controllers
            .iter()
            .map(|c| {
                let mut obj = SceneObject::new(&c.name, ControllerBinding::from_config(c));
                obj.component.on_attach(registry.as_mut());
                obj
            })
            .collect::<Vec<_>>();

        debug!(
            "rig {} built: head={} controllers={}",
            config.name,
            head.is_some(),
            controllers.len()
        );

        Ok(Self {
            name: config.name,
            registry,
            head,
            controllers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> Option<&DeviceRegistry> {
        self.registry.as_ref()
    }

    pub fn registry_mut(&mut self) -> Option<&mut DeviceRegistry> {
        self.registry.as_mut()
    }

    /// Enumerates already-attached devices. No-op without a registry.
    pub fn start(&mut self, host: &dyn XrInputHost) {
        if let Some(registry) = self.registry.as_mut() {
            registry.start(host);
        }
    }

    pub fn handle(&mut self, event: HostEvent) {
        if let Some(registry) = self.registry.as_mut() {
            registry.handle(event);
        }
    }

    /// Ticks the head, then every controller in config order.
    pub fn on_frame_tick(&mut self) {
        if let Some(head) = self.head.as_mut() {
            head.component.on_frame_tick(&mut head.transform);
        }
        for obj in &mut self.controllers {
            obj.component.on_frame_tick(&mut obj.transform);
        }
    }

    pub fn head(&self) -> Option<&SceneObject<DeviceBinding>> {
        self.head.as_ref()
    }

    pub fn controllers(&self) -> impl Iterator<Item = &SceneObject<ControllerBinding>> {
        self.controllers.iter()
    }

    pub fn controller(&self, name: &str) -> Result<&SceneObject<ControllerBinding>> {
        self.controllers
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| XrError::UnknownBinding(name.to_string()))
    }

    pub fn controller_mut(&mut self, name: &str) -> Result<&mut SceneObject<ControllerBinding>> {
        self.controllers
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| XrError::UnknownBinding(name.to_string()))
    }

    /// Unsubscribes every binding and releases its device.
    pub fn detach_all(&mut self) {
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        if let Some(head) = self.head.as_mut() {
            head.component.on_detach(registry);
        }
        for obj in &mut self.controllers {
            obj.component.on_detach(registry);
        }
    }

    pub fn snapshot(&self) -> RigSnapshot {
        let devices = self
            .registry
            .iter()
            .flat_map(|r| r.connected())
            .map(|(_, dev)| DeviceMeta::describe(dev.as_ref()))
            .collect();

        let head = self.head.as_ref().map(|obj| BindingSnapshot {
            name: obj.name.clone(),
            role: obj.component.role(),
            device: obj.component.device().map(|d| d.id().to_string()),
            transform: obj.transform,
            controls: None,
        });

        let controllers = self
            .controllers
            .iter()
            .map(|obj| BindingSnapshot {
                name: obj.name.clone(),
                role: obj.component.role(),
                device: obj.component.device().map(|d| d.id().to_string()),
                transform: obj.transform,
                controls: Some(*obj.component.state()),
            })
            .collect();

        RigSnapshot {
            name: self.name.clone(),
            devices,
            head,
            controllers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{create_virtual_rig, VirtualHost};
    use crate::device::DeviceHandle;
    use crate::event::{DeviceRole, Feature, Vec3};
    use std::rc::Rc;

    #[test]
    fn start_binds_every_role() {
        let host = VirtualHost::new();
        for dev in create_virtual_rig() {
            host.attach(dev as DeviceHandle);
        }

        let mut rig = XrRig::from_config(RigConfig::default()).unwrap();
        rig.start(&host);

        assert!(rig.head().unwrap().component.is_bound());
        assert!(rig.controller("left").unwrap().component.is_bound());
        assert!(rig.controller("right").unwrap().component.is_bound());
        assert_eq!(rig.snapshot().devices.len(), 3);
    }

    #[test]
    fn rig_without_registry_stays_idle() {
        let host = VirtualHost::new();
        for dev in create_virtual_rig() {
            host.attach(dev as DeviceHandle);
        }

        let mut rig = XrRig::without_registry(RigConfig::default()).unwrap();
        rig.start(&host);
        rig.on_frame_tick();

        let snap = rig.snapshot();
        assert!(snap.devices.is_empty());
        assert!(snap.controllers.iter().all(|c| c.device.is_none()));
    }

    #[test]
    fn tick_moves_head_transform() {
        let rig_devices = create_virtual_rig();
        let hmd = Rc::clone(&rig_devices[0]);
        hmd.set_position(Vec3::new(0.0, 1.6, 0.2));

        let mut rig = XrRig::from_config(RigConfig::default()).unwrap();
        rig.handle(HostEvent::Connected(hmd));
        rig.on_frame_tick();

        let head = rig.head().unwrap();
        assert_eq!(head.transform.local_position, Vec3::new(0.0, 1.6, 0.2));
    }

    #[test]
    fn unknown_controller_name_is_an_error() {
        let rig = XrRig::from_config(RigConfig::default()).unwrap();
        assert!(matches!(
            rig.controller("tail"),
            Err(XrError::UnknownBinding(name)) if name == "tail"
        ));
    }

    #[test]
    fn snapshot_reports_control_state() {
        let rig_devices = create_virtual_rig();
        let right = Rc::clone(&rig_devices[2]);
        right.set_bool(Feature::PrimaryButton, true);

        let mut rig = XrRig::from_config(RigConfig::default()).unwrap();
        rig.handle(HostEvent::Connected(right));
        rig.on_frame_tick();

        let snap = rig.snapshot();
        let right = snap.controller("right").unwrap();
        assert_eq!(right.role, DeviceRole::RightHand);
        assert_eq!(right.device.as_deref(), Some("virtual:right"));
        assert!(right.controls.unwrap().menu);

        let back = RigSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn repeated_connect_lists_device_once() {
        let hmd = Rc::clone(&create_virtual_rig()[0]);
        let mut rig = XrRig::from_config(RigConfig::default()).unwrap();
        rig.handle(HostEvent::Connected(Rc::clone(&hmd) as DeviceHandle));
        rig.handle(HostEvent::Connected(hmd));

        let snap = rig.snapshot();
        assert_eq!(snap.devices.len(), 1);
        assert_eq!(snap.head.unwrap().device.as_deref(), Some("virtual:hmd"));
    }

    #[test]
    fn detach_all_releases_devices() {
        let host = VirtualHost::new();
        for dev in create_virtual_rig() {
            host.attach(dev as DeviceHandle);
        }
        let mut rig = XrRig::from_config(RigConfig::default()).unwrap();
        rig.start(&host);
        rig.detach_all();

        assert!(!rig.head().unwrap().component.is_bound());
        assert_eq!(rig.registry().unwrap().listener_count(), (0, 0));
    }
}
