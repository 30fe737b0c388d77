//! Controller event mapping core
//!
//! Turns raw controller input (buttons, absolute axes, orientation samples)
//! into synthetic output events for a virtual input device. Everything here is
//! synchronous and single-threaded: one input event is processed completely,
//! including all emitted output, before the next one is accepted.
//!
//! Device I/O is not part of this crate. Hosts implement [`InputState`] for
//! live value queries, [`EventSink`] for output and [`Haptics`] for actuator
//! feedback.

pub mod accumulator;
pub mod codes;
pub mod error;
pub mod event;
pub mod filter;
pub mod gyro;
pub mod haptic;
pub mod math;
pub mod region;
pub mod remapper;
pub mod serde_codes;
pub mod touch;

pub use accumulator::{AngularAccumulator, ScrollWheel, Wrap};
pub use error::{CodeError, RemapError};
pub use event::{EventId, EventSink, EventType, InputEvent, InputState, LiveValues, OutputEvent};
pub use filter::{EventFilter, FilterRule};
pub use gyro::{GyroMouse, GyroSteps};
pub use haptic::{Actuator, HapticPulse, Haptics, PeriodicEnvelope, Rumble};
pub use region::{AngleRange, Region, RegionMap, Shape};
pub use remapper::{ModifierPredicate, RemapRule, Remapper, RuleId, Transform};
pub use touch::{TouchMapper, ABS_MAX, ABS_MIN};
