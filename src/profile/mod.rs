//! Controller profiles
//!
//! A profile owns the mapping components for one controller behaviour and
//! declares the virtual device it drives. Profiles see every filtered input
//! event after the live value table has been updated, plus each `SYN_REPORT`;
//! frame-based work (pad positions, orientation) happens on the report.

mod custom;
mod desktop;
mod gamepad;
mod gyro;
mod tablet;

pub use custom::CustomProfile;
pub use desktop::DesktopProfile;
pub use gamepad::GamepadProfile;
pub use gyro::GyroMouseProfile;
pub use tablet::TabletProfile;

use crate::config::{ConfigError, DaemonConfig, ProfileKind};
use crate::device::DeviceSpec;
use padmap_core::{
    Actuator, EventId, EventSink, HapticPulse, Haptics, InputEvent, InputState, OutputEvent,
    Region, RegionMap, RemapRule, Remapper, Shape,
};
use tracing::info;

/// Controller behaviour driving one virtual device
pub trait Profile {
    fn name(&self) -> &'static str;

    /// Channels the virtual device must declare
    fn device_spec(&self) -> DeviceSpec;

    /// Process one input event; `input` already reflects it
    fn handle(
        &mut self,
        event: &InputEvent,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    );

    /// Return every held output to rest and end the frame
    fn release(
        &mut self,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    );
}

/// Build the profile selected by `kind`
///
/// Rule gates start from `input`, normally an empty table.
pub fn build(
    kind: ProfileKind,
    config: &DaemonConfig,
    input: &dyn InputState,
) -> Result<Box<dyn Profile>, ConfigError> {
    let profile: Box<dyn Profile> = match kind {
        ProfileKind::Gamepad => Box::new(GamepadProfile::new(config, input)?),
        ProfileKind::Desktop => Box::new(DesktopProfile::new(config, input)?),
        ProfileKind::GyroMouse => Box::new(GyroMouseProfile::new(config, input)?),
        ProfileKind::Tablet => Box::new(TabletProfile::new(config)),
        ProfileKind::Custom => Box::new(CustomProfile::new(config, input)?),
    };
    info!("Using profile \"{}\"", profile.name());
    Ok(profile)
}

/// Region payload: an output channel held while the finger is inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchButton {
    pub target: EventId,
    /// Sent on enter; 0 on exit
    pub value: i32,
    pub haptic: Option<(Actuator, u16)>,
}

impl TouchButton {
    pub fn fire(&self, pressed: bool, out: &mut dyn EventSink, haptics: &mut dyn Haptics) {
        if let Some((actuator, magnitude)) = self.haptic {
            haptics.pulse(HapticPulse::click(actuator, magnitude));
        }
        let value = if pressed { self.value } else { 0 };
        out.emit(OutputEvent::new(self.target, value));
    }
}

/// Four overlapping 120° slices outside a dead zone, in the order
/// right, up, left, down. Diagonals press two neighbours.
pub(crate) fn dpad(min_r: f64, buttons: [TouchButton; 4]) -> RegionMap<TouchButton> {
    const SLICES: [(f64, f64); 4] = [(-60.0, 60.0), (30.0, 150.0), (120.0, 240.0), (-150.0, -30.0)];
    SLICES
        .iter()
        .zip(buttons)
        .map(|(&(min, max), button)| Region::new(Shape::sector(min_r, min, max), button))
        .collect()
}

/// Current position of a 2D surface with +y pointing up
pub(crate) fn surface_position(
    input: &dyn InputState,
    x: EventId,
    y: EventId,
    y_axis_down: bool,
) -> (f64, f64) {
    let x = f64::from(input.value(x));
    let y = f64::from(input.value(y));
    (x, if y_axis_down { -y } else { y })
}

pub(crate) fn held(input: &dyn InputState, id: EventId) -> bool {
    input.value(id) != 0
}

/// Register rules in order, reporting the index of the first rejected one
pub(crate) fn add_rules(
    remapper: &mut Remapper,
    rules: impl IntoIterator<Item = RemapRule>,
    input: &dyn InputState,
) -> Result<(), ConfigError> {
    for (index, rule) in rules.into_iter().enumerate() {
        remapper
            .add_rule(rule, input)
            .map_err(|source| ConfigError::Rule { index, source })?;
    }
    Ok(())
}

/// Forward `source` to `target` unchanged
pub(crate) fn map(source: EventId, target: EventId) -> RemapRule {
    RemapRule::new(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use padmap_core::codes::*;
    use padmap_core::LiveValues;

    fn arrow(code: u16) -> TouchButton {
        TouchButton {
            target: EventId::key(code),
            value: 1,
            haptic: None,
        }
    }

    #[test]
    fn test_dpad_diagonal_presses_two() {
        let mut pad = dpad(8192.0, [arrow(KEY_RIGHT), arrow(KEY_UP), arrow(KEY_LEFT), arrow(KEY_DOWN)]);
        let mut pressed = Vec::new();
        pad.update_position(-20000.0, -20000.0, |b, s| pressed.push((b.target.code, s)));
        assert_eq!(pressed, vec![(KEY_LEFT, true), (KEY_DOWN, true)]);
    }

    #[test]
    fn test_surface_position_flips_down_axis() {
        let mut live = LiveValues::new();
        live.set(EventId::abs(ABS_HAT0X), 100);
        live.set(EventId::abs(ABS_HAT0Y), 300);
        let x = EventId::abs(ABS_HAT0X);
        let y = EventId::abs(ABS_HAT0Y);
        assert_eq!(surface_position(&live, x, y, true), (100.0, -300.0));
        assert_eq!(surface_position(&live, x, y, false), (100.0, 300.0));
    }

    #[test]
    fn test_touch_button_fire() {
        let button = TouchButton {
            target: EventId::abs(ABS_HAT0Y),
            value: -1,
            haptic: Some((Actuator::Left, 0x8000)),
        };
        let mut out = Vec::new();
        let mut pulses: Vec<HapticPulse> = Vec::new();
        button.fire(true, &mut out, &mut pulses);
        button.fire(false, &mut out, &mut pulses);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::abs(ABS_HAT0Y), -1),
                OutputEvent::new(EventId::abs(ABS_HAT0Y), 0),
            ]
        );
        assert_eq!(pulses.len(), 2);
    }

    #[test]
    fn test_add_rules_reports_index() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        let err = add_rules(
            &mut remapper,
            [
                map(EventId::key(BTN_SOUTH), EventId::key(KEY_ENTER)),
                map(EventId::abs(ABS_X), EventId::abs(ABS_X))
                    .with_transform(padmap_core::Transform::linear(1, 0, 0)),
            ],
            &live,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Rule { index: 1, .. }));
    }
}
