//! Xbox-style gamepad
//!
//! Face, shoulder and menu buttons map one to one; the stick and right pad
//! become the two analog sticks and the trigger travel becomes `ABS_Z`/`ABS_RZ`.
//! Clicking the left pad while touching it acts as a hat d-pad at the touched
//! position; clicking without touching is a plain thumb button.

use super::{add_rules, dpad, held, map, surface_position, Profile, TouchButton};
use crate::config::{ConfigError, ControllerLayout, DaemonConfig};
use crate::device::{AbsAxis, DeviceSpec};
use padmap_core::codes::*;
use padmap_core::{
    Actuator, EventId, EventSink, EventType, Haptics, InputEvent, InputState, OutputEvent,
    RegionMap, Remapper, Transform,
};

const DEFAULT_NAME: &str = "padmap Gamepad";

pub struct GamepadProfile {
    device_name: String,
    layout: ControllerLayout,
    remapper: Remapper,
    dpad: RegionMap<TouchButton>,
}

impl GamepadProfile {
    pub fn new(config: &DaemonConfig, input: &dyn InputState) -> Result<Self, ConfigError> {
        let l = &config.layout;
        let y = if l.y_axis_down {
            Transform::Identity
        } else {
            Transform::Negate
        };

        let mut remapper = Remapper::new();
        add_rules(
            &mut remapper,
            [
                map(l.btn_a, EventId::key(BTN_SOUTH)),
                map(l.btn_b, EventId::key(BTN_EAST)),
                map(l.btn_x, EventId::key(BTN_NORTH)),
                map(l.btn_y, EventId::key(BTN_WEST)),
                map(l.shoulder_left, EventId::key(BTN_TL)),
                map(l.shoulder_right, EventId::key(BTN_TR)),
                map(l.select, EventId::key(BTN_SELECT)),
                map(l.mode, EventId::key(BTN_MODE)),
                map(l.start, EventId::key(BTN_START)),
                map(l.click_left, EventId::key(BTN_THUMBL)).with_modifier_max(l.touch_left, 0),
                map(l.click_right, EventId::key(BTN_THUMBR)),
                map(l.stick_x, EventId::abs(ABS_X)),
                map(l.stick_y, EventId::abs(ABS_Y)).with_transform(y.clone()),
                map(l.right_pad_x, EventId::abs(ABS_RX)),
                map(l.right_pad_y, EventId::abs(ABS_RY)).with_transform(y),
                map(l.trigger_left_axis, EventId::abs(ABS_Z)),
                map(l.trigger_right_axis, EventId::abs(ABS_RZ)),
            ],
            input,
        )?;

        let haptic = Some((Actuator::Left, config.dpad.haptic_magnitude));
        let hat = |code, value| TouchButton {
            target: EventId::abs(code),
            value,
            haptic,
        };
        let dpad = dpad(
            config.dpad.min_radius,
            [
                hat(ABS_HAT0X, 1),
                hat(ABS_HAT0Y, -1),
                hat(ABS_HAT0X, -1),
                hat(ABS_HAT0Y, 1),
            ],
        );

        Ok(Self {
            device_name: config
                .output_name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            layout: l.clone(),
            remapper,
            dpad,
        })
    }
}

impl Profile for GamepadProfile {
    fn name(&self) -> &'static str {
        "gamepad"
    }

    fn device_spec(&self) -> DeviceSpec {
        DeviceSpec::new(&self.device_name)
            .keys([
                BTN_SOUTH, BTN_EAST, BTN_NORTH, BTN_WEST, BTN_TL, BTN_TR, BTN_SELECT, BTN_START,
                BTN_MODE, BTN_THUMBL, BTN_THUMBR,
            ])
            .abs(AbsAxis::stick(ABS_X))
            .abs(AbsAxis::stick(ABS_Y))
            .abs(AbsAxis::new(ABS_Z, 0, 255))
            .abs(AbsAxis::stick(ABS_RX))
            .abs(AbsAxis::stick(ABS_RY))
            .abs(AbsAxis::new(ABS_RZ, 0, 255))
            .abs(AbsAxis::new(ABS_HAT0X, -1, 1))
            .abs(AbsAxis::new(ABS_HAT0Y, -1, 1))
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        match event.event_type {
            EventType::KEY | EventType::ABS => self.remapper.dispatch(event, input, out),
            EventType::SYN if event.is_report() => {
                let l = &self.layout;
                if held(input, l.touch_left) && held(input, l.click_left) {
                    let (x, y) = surface_position(input, l.left_pad_x, l.left_pad_y, l.y_axis_down);
                    self.dpad
                        .update_position(x, y, |b, pressed| b.fire(pressed, out, haptics));
                } else {
                    self.dpad.release(|b, pressed| b.fire(pressed, out, haptics));
                }
                out.emit(OutputEvent::report());
            }
            _ => {}
        }
    }

    fn release(
        &mut self,
        _input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        self.dpad.release(|b, pressed| b.fire(pressed, out, haptics));
        self.remapper.release_all(out);
        out.emit(OutputEvent::report());
    }
}
