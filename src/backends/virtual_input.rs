//! Scriptable in-memory devices.
//!
//! [`VirtualDevice`] answers feature queries from a table you fill in; a
//! feature that was never set (or was cleared) reads as "no value", exactly
//! like a real device that is momentarily not tracking. [`VirtualHost`]
//! plays the host XR input layer for startup enumeration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::device::{DeviceHandle, PhysicalDevice, XrInputHost};
use crate::event::{Feature, HostDeviceClass, Quat, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
enum FeatureValue {
    Bool(bool),
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
}

#[derive(Debug)]
pub struct VirtualDevice {
    id: String,
    name: String,
    class: HostDeviceClass,
    features: RefCell<HashMap<Feature, FeatureValue>>,
}

impl VirtualDevice {
    pub fn new(id: &str, name: &str, class: HostDeviceClass) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class,
            features: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_bool(&self, feature: Feature, value: bool) {
        self.put(feature, FeatureValue::Bool(value));
    }

    pub fn set_f32(&self, feature: Feature, value: f32) {
        self.put(feature, FeatureValue::F32(value));
    }

    pub fn set_vec2(&self, feature: Feature, value: Vec2) {
        self.put(feature, FeatureValue::Vec2(value));
    }

    /// Convenience for [`Feature::DevicePosition`].
    pub fn set_position(&self, value: Vec3) {
        self.put(Feature::DevicePosition, FeatureValue::Vec3(value));
    }

    /// Convenience for [`Feature::DeviceRotation`].
    pub fn set_rotation(&self, value: Quat) {
        self.put(Feature::DeviceRotation, FeatureValue::Quat(value));
    }

    /// Makes `feature` report "no value" until set again.
    pub fn clear(&self, feature: Feature) {
        self.features.borrow_mut().remove(&feature);
    }

    fn put(&self, feature: Feature, value: FeatureValue) {
        self.features.borrow_mut().insert(feature, value);
    }

    fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.features.borrow().get(&feature).copied()
    }
}

impl PhysicalDevice for VirtualDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> HostDeviceClass {
        self.class
    }

    fn read_bool(&self, feature: Feature) -> Option<bool> {
        match self.get(feature)? {
            FeatureValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn read_f32(&self, feature: Feature) -> Option<f32> {
        match self.get(feature)? {
            FeatureValue::F32(v) => Some(v),
            _ => None,
        }
    }

    fn read_vec2(&self, feature: Feature) -> Option<Vec2> {
        match self.get(feature)? {
            FeatureValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    fn read_vec3(&self, feature: Feature) -> Option<Vec3> {
        match self.get(feature)? {
            FeatureValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    fn read_quat(&self, feature: Feature) -> Option<Quat> {
        match self.get(feature)? {
            FeatureValue::Quat(v) => Some(v),
            _ => None,
        }
    }
}

/// In-memory stand-in for the host's device list.
#[derive(Default)]
pub struct VirtualHost {
    devices: RefCell<Vec<DeviceHandle>>,
}

impl VirtualHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, device: DeviceHandle) {
        self.devices.borrow_mut().push(device);
    }

    /// Removes the device with `id`, handing it back so the caller can
    /// forward a disconnect.
    pub fn detach(&self, id: &str) -> Option<DeviceHandle> {
        let mut devices = self.devices.borrow_mut();
        let idx = devices.iter().position(|d| d.id() == id)?;
        Some(devices.remove(idx))
    }
}

impl XrInputHost for VirtualHost {
    fn devices(&self) -> Vec<DeviceHandle> {
        self.devices.borrow().clone()
    }
}

/// A headset plus both hand controllers, plus a base station that the
/// registry is expected to filter out.
pub fn create_virtual_rig() -> Vec<Rc<VirtualDevice>> {
    vec![
        Rc::new(VirtualDevice::new("virtual:hmd", "Virtual HMD", HostDeviceClass::Generic)),
        Rc::new(VirtualDevice::new(
            "virtual:left",
            "Virtual Controller (Left)",
            HostDeviceClass::LeftHanded,
        )),
        Rc::new(VirtualDevice::new(
            "virtual:right",
            "Virtual Controller (Right)",
            HostDeviceClass::RightHanded,
        )),
        Rc::new(VirtualDevice::new(
            "virtual:lighthouse",
            "Virtual Base Station",
            HostDeviceClass::TrackingReference,
        )),
    ]
}
