//! Profile built entirely from `[[rules]]`, `[[regions]]` and `[[axes]]`
//!
//! Every region names its own axes pair and optional hold button. Regions are
//! hit-tested in file order on each frame, so enter/exit events come out in
//! the order the regions were written. Region geometry uses +y up regardless
//! of how the device reports its axes.

use super::{add_rules, held, surface_position, Profile, TouchButton};
use crate::config::{ConfigError, DaemonConfig, RegionConfig};
use crate::device::{AbsAxis, DeviceSpec};
use padmap_core::{
    EventId, EventSink, EventType, Haptics, InputEvent, InputState, ModifierPredicate,
    OutputEvent, Region, RegionMap, RemapRule, Remapper, ABS_MAX, ABS_MIN,
};
use tracing::debug;

const DEFAULT_NAME: &str = "padmap Custom Device";

/// A touch button and the surface it sits on
struct PlacedButton {
    x: EventId,
    y: EventId,
    while_held: Option<EventId>,
    button: TouchButton,
}

pub struct CustomProfile {
    device_name: String,
    y_axis_down: bool,
    axes: Vec<AbsAxis>,
    remapper: Remapper,
    regions: RegionMap<PlacedButton>,
}

impl CustomProfile {
    pub fn new(config: &DaemonConfig, input: &dyn InputState) -> Result<Self, ConfigError> {
        let mut remapper = Remapper::new();
        add_rules(
            &mut remapper,
            config.rules.iter().map(|r| {
                r.modifiers.iter().fold(
                    RemapRule::new(r.source, r.target)
                        .with_transform(r.transform.into())
                        .with_release_value(r.release_value),
                    |rule, m| rule.with_modifier(ModifierPredicate::new(m.code, m.min, m.max)),
                )
            }),
            input,
        )?;

        let regions = place_regions(&config.regions, config.dpad.haptic_magnitude);
        debug!(
            "Custom profile: {} rules, {} regions",
            remapper.len(),
            regions.len()
        );

        Ok(Self {
            device_name: config
                .output_name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            y_axis_down: config.layout.y_axis_down,
            axes: config
                .axes
                .iter()
                .map(|a| AbsAxis::new(a.code.code, a.min, a.max))
                .collect(),
            remapper,
            regions,
        })
    }

    fn abs_axis(&self, code: u16) -> AbsAxis {
        self.axes
            .iter()
            .find(|a| a.code == code)
            .copied()
            .unwrap_or_else(|| AbsAxis::new(code, ABS_MIN, ABS_MAX))
    }
}

fn place_regions(regions: &[RegionConfig], haptic_magnitude: u16) -> RegionMap<PlacedButton> {
    regions
        .iter()
        .map(|r| {
            let button = TouchButton {
                target: r.target,
                value: r.value,
                haptic: r.haptic.map(|a| (a, haptic_magnitude)),
            };
            Region::new(
                r.shape.clone(),
                PlacedButton {
                    x: r.x,
                    y: r.y,
                    while_held: r.while_held,
                    button,
                },
            )
        })
        .collect()
}

impl Profile for CustomProfile {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn device_spec(&self) -> DeviceSpec {
        let targets = self.remapper.targets().into_iter().chain(
            self.regions
                .regions()
                .iter()
                .map(|r| r.action.button.target),
        );
        let spec = DeviceSpec::new(&self.device_name);
        targets.fold(spec, |spec, id| spec.channel(id, |code| self.abs_axis(code)))
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        match event.event_type {
            EventType::SYN if event.is_report() => {
                let y_axis_down = self.y_axis_down;
                self.regions.update_each(
                    |p| {
                        p.while_held
                            .map_or(true, |id| held(input, id))
                            .then(|| surface_position(input, p.x, p.y, y_axis_down))
                    },
                    |p, pressed| p.button.fire(pressed, out, haptics),
                );
                out.emit(OutputEvent::report());
            }
            EventType::SYN => {}
            _ => self.remapper.dispatch(event, input, out),
        }
    }

    fn release(
        &mut self,
        _input: &dyn InputState,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        self.regions
            .release(|p, pressed| p.button.fire(pressed, out, haptics));
        self.remapper.release_all(out);
        out.emit(OutputEvent::report());
    }
}
