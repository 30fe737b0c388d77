//! Profile tests driven through the full pipeline
//!
//! Events are fed the way the daemon reads them from the controller, with
//! hid-steam's default layout. Output lands in a `Vec<OutputEvent>` and
//! haptic requests in a `Vec<HapticPulse>`, so no uinput access is needed.

use padmap::config::{ConfigError, DaemonConfig, ProfileKind};
use padmap::Pipeline;
use padmap_core::codes::*;
use padmap_core::{
    Actuator, EventId, EventType, HapticPulse, InputEvent, InputState, OutputEvent,
};

struct Rig {
    pipeline: Pipeline,
    out: Vec<OutputEvent>,
    pulses: Vec<HapticPulse>,
}

impl Rig {
    fn new(kind: ProfileKind, config: &DaemonConfig) -> Self {
        Self {
            pipeline: Pipeline::new(kind, config).unwrap(),
            out: Vec::new(),
            pulses: Vec::new(),
        }
    }

    fn from_toml(kind: ProfileKind, text: &str) -> Self {
        Self::new(kind, &DaemonConfig::parse(text).unwrap())
    }

    fn key(&mut self, code: u16, value: i32) {
        self.feed(EventType::KEY, code, value);
    }

    fn abs(&mut self, code: u16, value: i32) {
        self.feed(EventType::ABS, code, value);
    }

    fn feed(&mut self, event_type: EventType, code: u16, value: i32) {
        let ev = InputEvent::new(event_type, code, value);
        self.pipeline.process(&ev, &mut self.out, &mut self.pulses);
    }

    /// End the frame and return everything emitted since the last call
    fn sync(&mut self) -> Vec<OutputEvent> {
        self.feed(EventType::SYN, SYN_REPORT, 0);
        self.take()
    }

    fn take(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.out)
    }
}

fn key(code: u16, value: i32) -> OutputEvent {
    OutputEvent::new(EventId::key(code), value)
}

fn abs(code: u16, value: i32) -> OutputEvent {
    OutputEvent::new(EventId::abs(code), value)
}

fn rel_total(events: &[OutputEvent], code: u16) -> i32 {
    events
        .iter()
        .filter(|e| e.id() == EventId::rel(code))
        .map(|e| e.value)
        .sum()
}

// ── gamepad ──

#[test]
fn gamepad_buttons_and_sticks() {
    let mut rig = Rig::new(ProfileKind::Gamepad, &DaemonConfig::default());
    rig.key(BTN_SOUTH, 1);
    rig.abs(ABS_X, 1200);
    rig.abs(ABS_RY, -3000);
    let frame = rig.sync();
    assert_eq!(
        frame,
        vec![
            key(BTN_SOUTH, 1),
            abs(ABS_X, 1200),
            abs(ABS_RY, -3000),
            OutputEvent::report(),
        ]
    );
}

#[test]
fn gamepad_pad_click_is_hat_dpad() {
    let mut rig = Rig::new(ProfileKind::Gamepad, &DaemonConfig::default());
    rig.key(BTN_THUMB, 1);
    rig.abs(ABS_HAT0X, 0);
    // hid-steam reports up as negative
    rig.abs(ABS_HAT0Y, -20000);
    rig.key(BTN_THUMBL, 1);
    let frame = rig.sync();
    assert!(frame.contains(&abs(ABS_HAT0Y, -1)));
    assert!(!frame.contains(&key(BTN_THUMBL, 1)));
    assert_eq!(rig.pulses.len(), 1);
    assert_eq!(rig.pulses[0].actuator, Actuator::Left);

    rig.key(BTN_THUMBL, 0);
    let frame = rig.sync();
    assert!(frame.contains(&abs(ABS_HAT0Y, 0)));
}

#[test]
fn gamepad_click_without_touch_is_thumb_button() {
    let mut rig = Rig::new(ProfileKind::Gamepad, &DaemonConfig::default());
    rig.key(BTN_THUMBL, 1);
    let frame = rig.sync();
    assert_eq!(frame, vec![key(BTN_THUMBL, 1), OutputEvent::report()]);
}

#[test]
fn gamepad_trigger_travel_drives_z_axes() {
    let mut rig = Rig::new(ProfileKind::Gamepad, &DaemonConfig::default());
    rig.abs(ABS_HAT2Y, 200);
    rig.abs(ABS_HAT2X, 30);
    let frame = rig.sync();
    assert!(frame.contains(&abs(ABS_Z, 200)));
    assert!(frame.contains(&abs(ABS_RZ, 30)));
}

#[test]
fn gamepad_declares_hat_and_triggers() {
    let pipeline = Pipeline::new(ProfileKind::Gamepad, &DaemonConfig::default()).unwrap();
    let spec = pipeline.device_spec();
    assert_eq!(spec.name, "padmap Gamepad");
    assert!(spec.declares(EventId::abs(ABS_HAT0X)));
    assert!(spec.declares(EventId::abs(ABS_RZ)));
    assert!(spec.declares(EventId::key(BTN_MODE)));
    assert!(!spec.declares(EventId::rel(REL_X)));
}

// ── desktop ──

#[test]
fn desktop_buttons_become_keys() {
    let mut rig = Rig::new(ProfileKind::Desktop, &DaemonConfig::default());
    rig.key(BTN_SOUTH, 1);
    rig.key(BTN_TR2, 1);
    let frame = rig.sync();
    assert_eq!(
        frame,
        vec![key(KEY_ENTER, 1), key(BTN_LEFT, 1), OutputEvent::report()]
    );
}

#[test]
fn desktop_stick_presses_arrows() {
    let mut rig = Rig::new(ProfileKind::Desktop, &DaemonConfig::default());
    rig.abs(ABS_X, 30000);
    let frame = rig.sync();
    assert_eq!(frame, vec![key(KEY_RIGHT, 1), OutputEvent::report()]);

    rig.abs(ABS_X, 0);
    let frame = rig.sync();
    assert_eq!(frame, vec![key(KEY_RIGHT, 0), OutputEvent::report()]);
}

#[test]
fn desktop_circling_left_pad_scrolls() {
    let mut rig = Rig::new(ProfileKind::Desktop, &DaemonConfig::default());
    rig.key(BTN_THUMB, 1);
    rig.sync();

    let mut scrolled = Vec::new();
    for deg in (0..=100).step_by(10) {
        let rad = f64::from(deg).to_radians();
        rig.abs(ABS_HAT0X, (20000.0 * rad.cos()) as i32);
        rig.abs(ABS_HAT0Y, (-20000.0 * rad.sin()) as i32);
        scrolled.extend(rig.sync());
    }
    assert_eq!(rel_total(&scrolled, REL_WHEEL), 3);
    assert!(rig.pulses.iter().all(|p| p.actuator == Actuator::Left));

    // lifting the finger forgets the angle
    rig.key(BTN_THUMB, 0);
    rig.sync();
    rig.key(BTN_THUMB, 1);
    rig.abs(ABS_HAT0X, -20000);
    rig.abs(ABS_HAT0Y, 0);
    assert_eq!(rel_total(&rig.sync(), REL_WHEEL), 0);
}

// ── gyro mouse ──

const GYRO_TOML: &str = r#"
[gyro]
qw = "ABS_TILT_X"
qx = "ABS_TILT_Y"
qy = "ABS_MISC"
qz = "ABS_RUDDER"
"#;

#[test]
fn gyro_requires_quaternion_codes() {
    let err = Pipeline::new(ProfileKind::GyroMouse, &DaemonConfig::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ConfigError::MissingCode {
            profile: "gyro-mouse",
            field: "gyro.qw"
        }
    ));
}

#[test]
fn gyro_turn_moves_pointer() {
    let mut rig = Rig::from_toml(ProfileKind::GyroMouse, GYRO_TOML);
    rig.abs(ABS_TILT_X, 10000);
    assert_eq!(rig.sync(), vec![OutputEvent::report()]);

    // one degree counter-clockwise about the vertical axis
    let half = 0.5f64.to_radians();
    rig.abs(ABS_TILT_X, (10000.0 * half.cos()).round() as i32);
    rig.abs(ABS_RUDDER, (10000.0 * half.sin()).round() as i32);
    let frame = rig.sync();
    assert!(rel_total(&frame, REL_X) < 0);
    assert_eq!(rel_total(&frame, REL_Y), 0);
    assert_eq!(frame.last(), Some(&OutputEvent::report()));
    assert!(!rig.pulses.is_empty());
}

#[test]
fn gyro_triggers_click() {
    let mut rig = Rig::from_toml(ProfileKind::GyroMouse, GYRO_TOML);
    rig.key(BTN_TR2, 1);
    let frame = rig.sync();
    assert_eq!(frame, vec![key(BTN_LEFT, 1), OutputEvent::report()]);
}

// ── tablet ──

#[test]
fn tablet_touch_positions_pointer() {
    let mut rig = Rig::new(ProfileKind::Tablet, &DaemonConfig::default());
    rig.key(BTN_THUMB2, 1);
    rig.abs(ABS_RX, 20000);
    rig.abs(ABS_RY, 20000);
    let frame = rig.sync();
    assert_eq!(
        frame,
        vec![
            key(BTN_TOOL_FINGER, 1),
            abs(ABS_X, 32767),
            abs(ABS_Y, 32767),
            OutputEvent::report(),
        ]
    );

    rig.key(BTN_THUMB2, 0);
    assert_eq!(rig.take(), vec![key(BTN_TOOL_FINGER, 0), OutputEvent::report()]);
    assert!(rig.sync().is_empty());
}

// ── custom ──

const CUSTOM_TOML: &str = r#"
profile = "custom"
output_name = "padmap Test"

[[rules]]
source = "BTN_SOUTH"
target = "KEY_ENTER"

[[rules]]
source = "ABS_HAT2Y"
target = "ABS_X"
transform = { type = "Linear", mult = 255, div = 32767 }

[[regions]]
x = "ABS_RX"
y = "ABS_RY"
while_held = "BTN_THUMB2"
target = "KEY_LEFT"
haptic = "right"
shape = { type = "Rect", max_x = -10000.0 }

[[axes]]
code = "ABS_X"
min = 0
max = 255
"#;

#[test]
fn custom_profile_from_config() {
    let config = DaemonConfig::parse(CUSTOM_TOML).unwrap();
    let pipeline = Pipeline::new(config.profile, &config).unwrap();
    assert_eq!(pipeline.profile_name(), "custom");

    let spec = pipeline.device_spec();
    assert_eq!(spec.name, "padmap Test");
    assert!(spec.declares(EventId::key(KEY_ENTER)));
    assert!(spec.declares(EventId::key(KEY_LEFT)));
    let x = spec.abs.iter().find(|a| a.code == ABS_X).unwrap();
    assert_eq!((x.min, x.max), (0, 255));
}

#[test]
fn custom_rules_and_regions() {
    let mut rig = Rig::from_toml(ProfileKind::Custom, CUSTOM_TOML);
    rig.key(BTN_SOUTH, 1);
    rig.abs(ABS_HAT2Y, 32767);
    let frame = rig.sync();
    assert_eq!(
        frame,
        vec![key(KEY_ENTER, 1), abs(ABS_X, 255), OutputEvent::report()]
    );

    // the region only counts while the pad is touched
    rig.abs(ABS_RX, -20000);
    assert_eq!(rig.sync(), vec![OutputEvent::report()]);
    rig.key(BTN_THUMB2, 1);
    assert_eq!(rig.sync(), vec![key(KEY_LEFT, 1), OutputEvent::report()]);
    assert_eq!(rig.pulses.len(), 1);
    assert_eq!(rig.pulses[0].actuator, Actuator::Right);

    rig.key(BTN_THUMB2, 0);
    assert_eq!(rig.sync(), vec![key(KEY_LEFT, 0), OutputEvent::report()]);
}

#[test]
fn custom_rejects_bad_rule() {
    let config = DaemonConfig::parse(
        r#"
[[rules]]
source = "ABS_X"
target = "ABS_X"
transform = { type = "Linear", mult = 1, div = 0 }
"#,
    )
    .unwrap();
    let err = Pipeline::new(ProfileKind::Custom, &config).err().unwrap();
    assert!(matches!(err, ConfigError::Rule { index: 0, .. }));
}

// ── pipeline ──

#[test]
fn filtered_events_only_update_live_values() {
    let mut rig = Rig::from_toml(
        ProfileKind::Gamepad,
        r#"
[filter]
inverted = true
rules = [{ match = "code", code = "BTN_SOUTH" }]
"#,
    );
    rig.key(BTN_SOUTH, 1);
    assert_eq!(rig.sync(), vec![OutputEvent::report()]);
    assert_eq!(rig.pipeline.live().value(EventId::key(BTN_SOUTH)), 1);

    rig.key(BTN_EAST, 1);
    assert_eq!(rig.sync(), vec![key(BTN_EAST, 1), OutputEvent::report()]);
}

#[test]
fn dropped_and_non_report_syn_are_ignored() {
    let mut rig = Rig::new(ProfileKind::Gamepad, &DaemonConfig::default());
    rig.feed(EventType::SYN, SYN_DROPPED, 0);
    rig.feed(EventType::SYN, SYN_MT_REPORT, 0);
    assert!(rig.take().is_empty());
}

#[test]
fn shutdown_releases_held_outputs() {
    let mut rig = Rig::new(ProfileKind::Desktop, &DaemonConfig::default());
    rig.key(BTN_SOUTH, 1);
    rig.abs(ABS_X, -30000);
    rig.sync();

    rig.pipeline.shutdown(&mut rig.out, &mut rig.pulses);
    let released = rig.take();
    assert!(released.contains(&key(KEY_LEFT, 0)));
    assert!(released.contains(&key(KEY_ENTER, 0)));
    assert_eq!(released.last(), Some(&OutputEvent::report()));
}
