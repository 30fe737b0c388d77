//! Gyro mouse: controller orientation moves the pointer
//!
//! The orientation quaternion is sampled once per frame. Triggers are the
//! mouse buttons (right trigger = left click).

use super::{add_rules, map, Profile};
use crate::config::{ConfigError, DaemonConfig};
use crate::device::{AbsAxis, DeviceSpec};
use padmap_core::codes::*;
use padmap_core::{
    Actuator, EventId, EventSink, EventType, GyroMouse, HapticPulse, Haptics, InputEvent,
    InputState, OutputEvent, Remapper,
};

const DEFAULT_NAME: &str = "padmap Gyro Mouse";

pub struct GyroMouseProfile {
    device_name: String,
    quaternion: [EventId; 4],
    haptic_magnitude: u16,
    remapper: Remapper,
    mouse: GyroMouse,
}

impl GyroMouseProfile {
    pub fn new(config: &DaemonConfig, input: &dyn InputState) -> Result<Self, ConfigError> {
        let quaternion = config
            .gyro
            .quaternion_codes()
            .map_err(|field| ConfigError::MissingCode {
                profile: "gyro-mouse",
                field,
            })?;

        let l = &config.layout;
        let mut remapper = Remapper::new();
        add_rules(
            &mut remapper,
            [
                map(l.trigger_left, EventId::key(BTN_RIGHT)),
                map(l.trigger_right, EventId::key(BTN_LEFT)),
            ],
            input,
        )?;

        Ok(Self {
            device_name: config
                .output_name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            quaternion,
            haptic_magnitude: config.gyro.haptic_magnitude,
            remapper,
            mouse: GyroMouse::new(config.gyro.step),
        })
    }

    fn emit_axis(&self, code: u16, steps: i32, out: &mut dyn EventSink, haptics: &mut dyn Haptics) {
        if steps == 0 {
            return;
        }
        out.emit(OutputEvent::new(EventId::rel(code), steps));
        haptics.pulse(HapticPulse::train(
            Actuator::Right,
            self.haptic_magnitude,
            steps.unsigned_abs().min(u32::from(u16::MAX)) as u16,
        ));
    }
}

impl Profile for GyroMouseProfile {
    fn name(&self) -> &'static str {
        "gyro-mouse"
    }

    fn device_spec(&self) -> DeviceSpec {
        let spec = DeviceSpec::new(&self.device_name).rel(REL_X).rel(REL_Y);
        self.remapper
            .targets()
            .into_iter()
            .fold(spec, |spec, id| spec.channel(id, AbsAxis::stick))
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        match event.event_type {
            EventType::KEY => self.remapper.dispatch(event, input, out),
            EventType::SYN if event.is_report() => {
                let [w, x, y, z] = self.quaternion.map(|id| f64::from(input.value(id)));
                let steps = self.mouse.update(w, x, y, z);
                // heading grows counter-clockwise, the pointer moves right on clockwise turns
                self.emit_axis(REL_X, -steps.horizontal, out, haptics);
                self.emit_axis(REL_Y, steps.vertical, out, haptics);
                out.emit(OutputEvent::report());
            }
            _ => {}
        }
    }

    fn release(
        &mut self,
        _input: &dyn InputState,
        out: &mut dyn EventSink,
        _haptics: &mut dyn Haptics,
    ) {
        self.mouse.release();
        self.remapper.release_all(out);
        out.emit(OutputEvent::report());
    }
}
