//! Controller bindings and the control-state differ.
//!
//! [`ControlStateDiffer`] polls a fixed set of controller features once per
//! frame and reports a [`ControlChange`] only when a value differs from the
//! last one it saw. [`ControllerBinding`] layers that on top of a
//! [`DeviceBinding`] and fans each change out to typed [`ControlChannels`].
//!
//! # Per-frame algorithm
//! Features are evaluated in this order: trigger, touchpad touch, touchpad
//! click, touchpad axis, menu, grip. For each:
//! 1. Read it. If the host has no value this frame, skip it (keep last-known).
//! 2. Compare bit-for-bit against last-known. Equal means nothing happens.
//! 3. Otherwise store the new value, then notify.
//!
//! The touchpad axis is only read when this frame's touch read reports touched.
//!
//! Delivery is synchronous: listeners for trigger have returned before the
//! touchpad is even read.

#[cfg(feature = "debug-log")]
use log::trace;
use serde::{Deserialize, Serialize};

use crate::binding::{DeviceBinding, SceneTransform};
use crate::config::BindingConfig;
use crate::device::{DeviceHandle, PhysicalDevice};
use crate::event::{ControlChange, DeviceRole, Feature, Vec2};
use crate::eventbus::Observers;
use crate::logger::Logger;
use crate::manager::DeviceRegistry;

/// Exact comparison; floats compare by bit pattern.
trait ExactEq: Copy {
    fn exact_eq(&self, other: &Self) -> bool;
}

impl ExactEq for bool {
    fn exact_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl ExactEq for f32 {
    fn exact_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl ExactEq for Vec2 {
    fn exact_eq(&self, other: &Self) -> bool {
        self.x.exact_eq(&other.x) && self.y.exact_eq(&other.y)
    }
}

/// Stores `fresh` into `last` if it differs; returns the new value on change.
fn track<T: ExactEq>(last: &mut T, fresh: Option<T>) -> Option<T> {
    let fresh = fresh?;
    if last.exact_eq(&fresh) {
        return None;
    }
    *last = fresh;
    Some(fresh)
}

/// Last-known controller values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub trigger: f32,
    pub touchpad_touch: bool,
    pub touchpad_click: bool,
    pub touchpad_axis: Vec2,
    pub menu: bool,
    pub grip: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            trigger: 0.0,
            touchpad_touch: false,
            touchpad_click: false,
            touchpad_axis: Vec2::zeros(),
            menu: false,
            grip: false,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ControlStateDiffer {
    state: ControlState,
}

impl ControlStateDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Runs one frame against `device`, calling `emit` for every change in
    /// evaluation order.
    pub fn poll(&mut self, device: &dyn PhysicalDevice, mut emit: impl FnMut(ControlChange)) {
        let s = &mut self.state;

        if let Some(v) = track(&mut s.trigger, device.read_f32(Feature::Trigger)) {
            emit(ControlChange::Trigger(v));
        }

        let touch = device.read_bool(Feature::Primary2DAxisTouch);
        if let Some(v) = track(&mut s.touchpad_touch, touch) {
            emit(ControlChange::TouchpadTouch(v));
        }
        if let Some(v) = track(
            &mut s.touchpad_click,
            device.read_bool(Feature::Primary2DAxisClick),
        ) {
            emit(ControlChange::TouchpadClick(v));
        }
        // Gated on this frame's read: a failed touch read counts as untouched.
        if touch == Some(true) {
            if let Some(v) = track(&mut s.touchpad_axis, device.read_vec2(Feature::Primary2DAxis)) {
                emit(ControlChange::TouchpadAxis(v));
            }
        }

        if let Some(v) = track(&mut s.menu, device.read_bool(Feature::PrimaryButton)) {
            emit(ControlChange::Menu(v));
        }
        if let Some(v) = track(&mut s.grip, device.read_bool(Feature::GripButton)) {
            emit(ControlChange::Grip(v));
        }
    }
}

/// Outbound notification channels, one per tracked control.
#[derive(Debug, Default)]
pub struct ControlChannels {
    pub trigger: Observers<f32>,
    pub touchpad_touch: Observers<bool>,
    pub touchpad_click: Observers<bool>,
    pub touchpad_axis: Observers<Vec2>,
    pub menu: Observers<bool>,
    pub grip: Observers<bool>,
}

impl ControlChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a change to its channel.
    pub fn dispatch(&mut self, change: ControlChange) {
        match change {
            ControlChange::Trigger(v) => self.trigger.notify(&v),
            ControlChange::TouchpadTouch(v) => self.touchpad_touch.notify(&v),
            ControlChange::TouchpadClick(v) => self.touchpad_click.notify(&v),
            ControlChange::TouchpadAxis(v) => self.touchpad_axis.notify(&v),
            ControlChange::Menu(v) => self.menu.notify(&v),
            ControlChange::Grip(v) => self.grip.notify(&v),
        }
    }
}

/// A hand controller: pose binding plus control-state notifications.
///
/// Defaults to [`DeviceRole::Unset`] until a hand is chosen.
#[derive(Debug, Default)]
pub struct ControllerBinding {
    binding: DeviceBinding,
    differ: ControlStateDiffer,
    channels: ControlChannels,
}

impl ControllerBinding {
    pub fn new(role: DeviceRole) -> Self {
        Self {
            binding: DeviceBinding::new(role),
            differ: ControlStateDiffer::new(),
            channels: ControlChannels::new(),
        }
    }

    /// Builds a controller from config, wiring a [`Logger`] onto every
    /// channel when `log_controls` is set.
    pub fn from_config(config: &BindingConfig) -> Self {
        let mut controller = Self::new(config.role);
        if config.log_controls {
            Logger::new(&config.name).attach(&mut controller.channels);
        }
        controller
    }

    pub fn role(&self) -> DeviceRole {
        self.binding.role()
    }

    pub fn set_role(&mut self, role: DeviceRole) {
        self.binding.set_role(role);
    }

    pub fn device(&self) -> Option<DeviceHandle> {
        self.binding.device()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    pub fn state(&self) -> &ControlState {
        self.differ.state()
    }

    pub fn channels(&self) -> &ControlChannels {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut ControlChannels {
        &mut self.channels
    }

    pub fn on_attach(&mut self, registry: Option<&mut DeviceRegistry>) -> bool {
        self.binding.on_attach(registry)
    }

    pub fn on_detach(&mut self, registry: &mut DeviceRegistry) {
        self.binding.on_detach(registry);
    }

    /// Updates the pose, then polls controls and notifies on change.
    /// Does nothing while unbound.
    pub fn on_frame_tick(&mut self, target: &mut dyn SceneTransform) {
        let Some(device) = self.binding.on_frame_tick(target) else {
            return;
        };

        let channels = &mut self.channels;
        self.differ.poll(device.as_ref(), |change| {
            #[cfg(feature = "debug-log")]
            trace!("{}: {:?}", device.id(), change);
            channels.dispatch(change);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualDevice;
    use crate::event::HostDeviceClass;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn left() -> VirtualDevice {
        VirtualDevice::new("l", "Left", HostDeviceClass::LeftHanded)
    }

    fn changes(differ: &mut ControlStateDiffer, dev: &VirtualDevice) -> Vec<ControlChange> {
        let mut out = Vec::new();
        differ.poll(dev, |c| out.push(c));
        out
    }

    #[test]
    fn absent_features_emit_nothing() {
        let mut differ = ControlStateDiffer::new();
        assert!(changes(&mut differ, &left()).is_empty());
        assert_eq!(*differ.state(), ControlState::default());
    }

    #[test]
    fn initial_defaults_do_not_fire() {
        let dev = left();
        dev.set_f32(Feature::Trigger, 0.0);
        dev.set_bool(Feature::GripButton, false);
        let mut differ = ControlStateDiffer::new();
        assert!(changes(&mut differ, &dev).is_empty());
    }

    #[test]
    fn emits_in_evaluation_order() {
        let dev = left();
        dev.set_bool(Feature::GripButton, true);
        dev.set_bool(Feature::PrimaryButton, true);
        dev.set_bool(Feature::Primary2DAxisClick, true);
        dev.set_f32(Feature::Trigger, 1.0);

        let mut differ = ControlStateDiffer::new();
        assert_eq!(
            changes(&mut differ, &dev),
            vec![
                ControlChange::Trigger(1.0),
                ControlChange::TouchpadClick(true),
                ControlChange::Menu(true),
                ControlChange::Grip(true),
            ]
        );
    }

    #[test]
    fn negative_zero_counts_as_change() {
        let dev = left();
        dev.set_f32(Feature::Trigger, -0.0);
        let mut differ = ControlStateDiffer::new();
        assert_eq!(changes(&mut differ, &dev), vec![ControlChange::Trigger(-0.0)]);
        assert!(changes(&mut differ, &dev).is_empty());
    }

    #[test]
    fn nan_fires_once() {
        let dev = left();
        dev.set_f32(Feature::Trigger, f32::NAN);
        let mut differ = ControlStateDiffer::new();
        assert_eq!(changes(&mut differ, &dev).len(), 1);
        assert!(changes(&mut differ, &dev).is_empty());
    }

    #[test]
    fn axis_ignored_while_untouched() {
        let dev = left();
        dev.set_vec2(Feature::Primary2DAxis, Vec2::new(0.5, 0.5));
        dev.set_bool(Feature::Primary2DAxisTouch, false);

        let mut differ = ControlStateDiffer::new();
        assert!(changes(&mut differ, &dev).is_empty());
        assert_eq!(differ.state().touchpad_axis, Vec2::zeros());
    }

    #[test]
    fn missed_touch_read_closes_axis_gate() {
        let dev = left();
        dev.set_bool(Feature::Primary2DAxisTouch, true);
        dev.set_vec2(Feature::Primary2DAxis, Vec2::new(0.1, 0.0));
        let mut differ = ControlStateDiffer::new();
        changes(&mut differ, &dev);

        dev.clear(Feature::Primary2DAxisTouch);
        dev.set_vec2(Feature::Primary2DAxis, Vec2::new(0.2, 0.0));
        assert!(changes(&mut differ, &dev).is_empty());
        // Stored touch is untouched by the failed read; only the gate closes.
        assert!(differ.state().touchpad_touch);
        assert_eq!(differ.state().touchpad_axis, Vec2::new(0.1, 0.0));

        dev.set_bool(Feature::Primary2DAxisTouch, true);
        assert_eq!(
            changes(&mut differ, &dev),
            vec![ControlChange::TouchpadAxis(Vec2::new(0.2, 0.0))]
        );
    }

    #[test]
    fn controller_dispatches_to_channels() {
        let mut registry = DeviceRegistry::new();
        let mut ctrl = ControllerBinding::new(DeviceRole::LeftHand);
        ctrl.on_attach(Some(&mut registry));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctrl.channels_mut()
            .grip
            .subscribe(move |v: &bool| sink.borrow_mut().push(*v));

        let dev = Rc::new(left());
        registry.device_connected(dev.clone());

        let mut transform = crate::binding::Transform::default();
        dev.set_bool(Feature::GripButton, true);
        ctrl.on_frame_tick(&mut transform);
        ctrl.on_frame_tick(&mut transform);
        dev.set_bool(Feature::GripButton, false);
        ctrl.on_frame_tick(&mut transform);

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!ctrl.state().grip);
    }

    #[test]
    fn controller_defaults_to_unset() {
        assert_eq!(ControllerBinding::default().role(), DeviceRole::Unset);
    }
}
