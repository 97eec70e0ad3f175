//! Loading rig configs from disk and building rigs from them.

use std::io::Write;
use std::rc::Rc;

use bytexr::backends::virtual_input::VirtualDevice;
use bytexr::{DeviceRole, Feature, HostDeviceClass, HostEvent, RigConfig, XrError, XrRig};

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(body.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
        name = "vive"
        head = false
        log_devices = true

        [[controllers]]
        name = "main"
        role = "RightHand"
        log_controls = true
        "#,
    );

    let config = RigConfig::load(file.path()).expect("load toml");
    assert_eq!(config.name, "vive");
    assert!(!config.head);
    assert_eq!(config.controllers.len(), 1);
    assert_eq!(config.controllers[0].role, DeviceRole::RightHand);
}

#[test]
fn loads_json_file() {
    let file = write_temp(
        ".json",
        r#"{ "name": "quest", "controllers": [ { "name": "l", "role": "LeftHand" } ] }"#,
    );
    let config = RigConfig::load(file.path()).expect("load json");
    assert_eq!(config.name, "quest");
    assert!(config.head);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nope.toml");
    let err = RigConfig::load(&path).unwrap_err();
    match err {
        XrError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rig_from_loaded_config_drives_controller() {
    let file = write_temp(
        ".toml",
        r#"
        head = false
        log_devices = true

        [[controllers]]
        name = "main"
        role = "RightHand"
        log_controls = true
        "#,
    );
    let mut rig = XrRig::from_config(RigConfig::load(file.path()).unwrap()).unwrap();
    assert!(rig.head().is_none());

    let right = Rc::new(VirtualDevice::new(
        "r",
        "Right",
        HostDeviceClass::RightHanded,
    ));
    right.set_f32(Feature::Trigger, 0.75);
    rig.handle(HostEvent::Connected(right.clone()));
    rig.on_frame_tick();

    let main = rig.controller("main").unwrap();
    assert_eq!(main.component.state().trigger, 0.75);
    // Logger + nothing else: one listener per channel.
    assert_eq!(main.component.channels().trigger.len(), 1);
}

#[test]
fn controller_role_can_be_assigned_after_build() {
    let config = RigConfig::from_toml_str(
        r#"
        [[controllers]]
        name = "spare"
        "#,
    )
    .unwrap();
    let mut rig = XrRig::from_config(config).unwrap();

    let left = Rc::new(VirtualDevice::new("l", "Left", HostDeviceClass::LeftHanded));
    rig.handle(HostEvent::Connected(left.clone()));
    assert!(!rig.controller("spare").unwrap().component.is_bound());

    rig.controller_mut("spare")
        .unwrap()
        .component
        .set_role(DeviceRole::LeftHand);
    rig.handle(HostEvent::Disconnected(left.clone()));
    rig.handle(HostEvent::Connected(left));
    assert!(rig.controller("spare").unwrap().component.is_bound());
}
