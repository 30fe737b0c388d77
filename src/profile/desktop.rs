//! Keyboard-and-mouse desktop mode
//!
//! Buttons become navigation keys, modifiers and mouse buttons. The stick
//! drives the arrow keys through a region d-pad, and circling a finger on the
//! left pad scrolls.

use super::{add_rules, dpad, held, map, surface_position, Profile, TouchButton};
use crate::config::{ConfigError, ControllerLayout, DaemonConfig};
use crate::device::{AbsAxis, DeviceSpec};
use padmap_core::codes::*;
use padmap_core::{
    Actuator, EventId, EventSink, EventType, HapticPulse, Haptics, InputEvent, InputState,
    OutputEvent, RegionMap, Remapper, ScrollWheel,
};
use tracing::trace;

const DEFAULT_NAME: &str = "padmap Desktop";

const ARROWS: [u16; 4] = [KEY_RIGHT, KEY_UP, KEY_LEFT, KEY_DOWN];

pub struct DesktopProfile {
    device_name: String,
    layout: ControllerLayout,
    haptic_magnitude: u16,
    remapper: Remapper,
    arrows: RegionMap<TouchButton>,
    wheel: ScrollWheel,
}

impl DesktopProfile {
    pub fn new(config: &DaemonConfig, input: &dyn InputState) -> Result<Self, ConfigError> {
        let l = &config.layout;
        let mut remapper = Remapper::new();
        add_rules(
            &mut remapper,
            [
                map(l.btn_a, EventId::key(KEY_ENTER)),
                map(l.btn_b, EventId::key(KEY_SPACE)),
                map(l.btn_x, EventId::key(KEY_PAGEUP)),
                map(l.btn_y, EventId::key(KEY_PAGEDOWN)),
                map(l.shoulder_left, EventId::key(KEY_LEFTCTRL)),
                map(l.shoulder_right, EventId::key(KEY_LEFTALT)),
                map(l.trigger_left, EventId::key(BTN_RIGHT)),
                map(l.trigger_right, EventId::key(BTN_LEFT)),
                map(l.grip_left, EventId::key(BTN_SIDE)),
                map(l.grip_right, EventId::key(BTN_EXTRA)),
                map(l.select, EventId::key(KEY_TAB)),
                map(l.mode, EventId::key(KEY_LEFTMETA)),
                map(l.start, EventId::key(KEY_ESC)),
                map(l.click_left, EventId::key(BTN_MIDDLE)).with_modifier_min(l.touch_left, 1),
                map(l.click_right, EventId::key(KEY_LEFTSHIFT)),
            ],
            input,
        )?;

        let haptic = Some((Actuator::Left, config.dpad.haptic_magnitude));
        let arrows = dpad(
            config.dpad.min_radius,
            ARROWS.map(|code| TouchButton {
                target: EventId::key(code),
                value: 1,
                haptic,
            }),
        );

        Ok(Self {
            device_name: config
                .output_name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            layout: l.clone(),
            haptic_magnitude: config.dpad.haptic_magnitude,
            remapper,
            arrows,
            wheel: ScrollWheel::new(config.dpad.scroll_step),
        })
    }

    fn scroll(&mut self, input: &dyn InputState, out: &mut dyn EventSink, haptics: &mut dyn Haptics) {
        let l = &self.layout;
        if !held(input, l.touch_left) {
            self.wheel.release();
            return;
        }
        let (x, y) = surface_position(input, l.left_pad_x, l.left_pad_y, l.y_axis_down);
        let steps = self.wheel.update_position(x, y);
        if steps != 0 {
            trace!("scroll {}", steps);
            haptics.pulse(HapticPulse::train(
                Actuator::Left,
                self.haptic_magnitude,
                steps.unsigned_abs().min(u32::from(u16::MAX)) as u16,
            ));
            out.emit(OutputEvent::new(EventId::rel(REL_WHEEL), steps));
        }
    }
}

impl Profile for DesktopProfile {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn device_spec(&self) -> DeviceSpec {
        let spec = DeviceSpec::new(&self.device_name).keys(ARROWS).rel(REL_WHEEL);
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
                let l = &self.layout;
                let (x, y) = surface_position(input, l.stick_x, l.stick_y, l.y_axis_down);
                self.arrows
                    .update_position(x, y, |b, pressed| b.fire(pressed, out, haptics));
                self.scroll(input, out, haptics);
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
        self.arrows.release(|b, pressed| b.fire(pressed, out, haptics));
        self.wheel.release();
        self.remapper.release_all(out);
        out.emit(OutputEvent::report());
    }
}
