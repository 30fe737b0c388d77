//! Touch surface to absolute pointer (virtual tablet) mapping
//!
//! The touch surface's `input_region` is stretched onto `screen_region`, a
//! sub-rectangle of a screen of `screen_size` pixels. Positions are reported in
//! the full `ABS_MIN..=ABS_MAX` range over the whole screen, so the desktop
//! maps them back to pixels.

use crate::codes::{ABS_X, ABS_Y, BTN_TOOL_FINGER};
use crate::event::{EventId, EventSink, OutputEvent};
use serde::{Deserialize, Serialize};

pub const ABS_MIN: i32 = -32768;
pub const ABS_MAX: i32 = 32767;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchMapper {
    /// Screen width and height in pixels
    pub screen_size: [f64; 2],
    /// `[x0, y0, x1, y1]` in screen pixels
    pub screen_region: [f64; 4],
    /// `[x0, y0, x1, y1]` in touch surface units
    pub input_region: [f64; 4],
    #[serde(skip)]
    touching: bool,
}

impl TouchMapper {
    pub fn new(screen_size: [f64; 2], screen_region: [f64; 4], input_region: [f64; 4]) -> Self {
        Self {
            screen_size,
            screen_region,
            input_region,
            touching: false,
        }
    }

    /// Target channels of this mapper, for device declaration
    pub fn targets() -> [EventId; 3] {
        [
            EventId::key(BTN_TOOL_FINGER),
            EventId::abs(ABS_X),
            EventId::abs(ABS_Y),
        ]
    }

    /// Map one touch position and emit a complete frame
    pub fn update<S: EventSink + ?Sized>(&mut self, x: f64, y: f64, sink: &mut S) {
        if !self.touching {
            self.touching = true;
            sink.emit(OutputEvent::new(EventId::key(BTN_TOOL_FINGER), 1));
        }
        sink.emit(OutputEvent::new(EventId::abs(ABS_X), self.map_axis(0, x)));
        sink.emit(OutputEvent::new(EventId::abs(ABS_Y), self.map_axis(1, y)));
        sink.emit(OutputEvent::report());
    }

    /// Lift the finger; no-op when not touching
    pub fn release<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        if self.touching {
            self.touching = false;
            sink.emit(OutputEvent::new(EventId::key(BTN_TOOL_FINGER), 0));
            sink.emit(OutputEvent::report());
        }
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    fn map_axis(&self, i: usize, value: f64) -> i32 {
        let (lo, hi) = (self.input_region[i], self.input_region[2 + i]);
        let span = hi - lo;
        // a flat input region pins the axis to the region start
        let t = if span == 0.0 || !value.is_finite() {
            0.0
        } else {
            (value.clamp(lo.min(hi), lo.max(hi)) - lo) / span
        };
        let screen = self.screen_region[i] * (1.0 - t) + self.screen_region[2 + i] * t;
        let c = if self.screen_size[i] > 0.0 {
            screen / self.screen_size[i]
        } else {
            0.0
        };
        let abs = f64::from(ABS_MIN) * (1.0 - c) + f64::from(ABS_MAX) * c;
        abs.round().clamp(f64::from(ABS_MIN), f64::from(ABS_MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_screen() -> TouchMapper {
        TouchMapper::new(
            [3360.0, 1080.0],
            [1440.0, 0.0, 3360.0, 1080.0],
            [-20000.0, -20000.0, 20000.0, 20000.0],
        )
    }

    #[test]
    fn test_first_update_presses_tool() {
        let mut mapper = right_screen();
        let mut out = Vec::new();
        mapper.update(20000.0, -20000.0, &mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::key(BTN_TOOL_FINGER), 1),
                OutputEvent::new(EventId::abs(ABS_X), ABS_MAX),
                OutputEvent::new(EventId::abs(ABS_Y), ABS_MIN),
                OutputEvent::report(),
            ]
        );
        out.clear();
        mapper.update(20000.0, 20000.0, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], OutputEvent::new(EventId::abs(ABS_Y), ABS_MAX));
    }

    #[test]
    fn test_region_start_and_clamping() {
        let mut mapper = right_screen();
        let mut out = Vec::new();
        // far outside the input region, clamped to its left edge
        mapper.update(-90000.0, 0.0, &mut out);
        // 1440 / 3360 of the way across
        let c: f64 = 1440.0 / 3360.0;
        let expected = (-32768.0 * (1.0 - c) + 32767.0 * c).round() as i32;
        assert_eq!(out[1], OutputEvent::new(EventId::abs(ABS_X), expected));
        // centre of the surface is the middle of the range, -0.5 rounded away from zero
        assert_eq!(out[2], OutputEvent::new(EventId::abs(ABS_Y), -1));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut mapper = right_screen();
        let mut out = Vec::new();
        mapper.release(&mut out);
        assert!(out.is_empty());
        mapper.update(0.0, 0.0, &mut out);
        out.clear();
        mapper.release(&mut out);
        mapper.release(&mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::key(BTN_TOOL_FINGER), 0),
                OutputEvent::report(),
            ]
        );
        assert!(!mapper.is_touching());
    }
}
