use std::rc::Rc;

use bytexr::backends::virtual_input::{create_virtual_rig, VirtualHost};
use bytexr::{DeviceHandle, Feature, HostEvent, RigConfig, Vec2, Vec3, XrRig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = RigConfig::default();
    config.log_devices = true;
    for c in &mut config.controllers {
        c.log_controls = true;
    }
    let mut rig = XrRig::from_config(config).expect("default config is valid");

    // HMD, both hands, and a base station the registry filters out.
    let devices = create_virtual_rig();
    let host = VirtualHost::new();
    for dev in &devices {
        host.attach(Rc::clone(dev) as DeviceHandle);
    }
    rig.start(&host);

    let (hmd, left) = (&devices[0], &devices[1]);
    for frame in 0..5u8 {
        let t = f32::from(frame) * 0.25;
        hmd.set_position(Vec3::new(0.0, 1.7, -t));
        left.set_f32(Feature::Trigger, t.min(0.5));
        left.set_bool(Feature::Primary2DAxisTouch, frame >= 2);
        left.set_vec2(Feature::Primary2DAxis, Vec2::new(t, -t));
        rig.on_frame_tick();
    }

    if let Some(gone) = host.detach("virtual:left") {
        rig.handle(HostEvent::Disconnected(gone));
    }
    rig.on_frame_tick();

    match rig.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("snapshot failed: {e}"),
    }
}
