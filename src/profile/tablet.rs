//! Right pad as an absolute pointer (virtual tablet)
//!
//! Desktops only treat the device as a tablet when udev tags it so, e.g.:
//!
//! ```text
//! SUBSYSTEM=="input", ATTRS{name}=="padmap Tablet", ENV{ID_INPUT}="1", \
//!   ENV{ID_INPUT_JOYSTICK}="", ENV{ID_INPUT_TABLET}="1", ENV{ID_INPUT_TOUCHPAD}=""
//! ```

use super::{held, Profile};
use crate::config::{ControllerLayout, DaemonConfig};
use crate::device::{AbsAxis, DeviceSpec};
use padmap_core::{
    EventSink, EventType, Haptics, InputEvent, InputState, TouchMapper, ABS_MAX, ABS_MIN,
};

const DEFAULT_NAME: &str = "padmap Tablet";

pub struct TabletProfile {
    device_name: String,
    layout: ControllerLayout,
    mapper: TouchMapper,
}

impl TabletProfile {
    pub fn new(config: &DaemonConfig) -> Self {
        let t = &config.tablet;
        Self {
            device_name: config
                .output_name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            layout: config.layout.clone(),
            mapper: TouchMapper::new(t.screen_size, t.screen_region, t.input_region),
        }
    }
}

impl Profile for TabletProfile {
    fn name(&self) -> &'static str {
        "tablet"
    }

    fn device_spec(&self) -> DeviceSpec {
        TouchMapper::targets()
            .into_iter()
            .fold(DeviceSpec::new(&self.device_name), |spec, id| {
                spec.channel(id, |code| AbsAxis::new(code, ABS_MIN, ABS_MAX))
            })
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        _haptics: &mut dyn Haptics,
    ) {
        let l = &self.layout;
        match event.event_type {
            EventType::KEY if event.id() == l.touch_right && event.value == 0 => {
                self.mapper.release(out);
            }
            EventType::SYN if event.is_report() && held(input, l.touch_right) => {
                // screen coordinates grow downward
                let x = f64::from(input.value(l.right_pad_x));
                let y = f64::from(input.value(l.right_pad_y));
                let y = if l.y_axis_down { y } else { -y };
                self.mapper.update(x, y, out);
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
        self.mapper.release(out);
    }
}
