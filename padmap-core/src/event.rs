//! Input/output event model and the host-facing collaborator traits

use crate::codes;
use std::collections::HashMap;
use std::fmt;

/// Linux input event type (`EV_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(pub u16);

impl EventType {
    pub const SYN: EventType = EventType(0x00);
    pub const KEY: EventType = EventType(0x01);
    pub const REL: EventType = EventType(0x02);
    pub const ABS: EventType = EventType(0x03);

    /// Name prefix used by event code names of this type
    pub fn prefix(self) -> &'static str {
        match self {
            EventType::SYN => "SYN",
            EventType::KEY => "KEY",
            EventType::REL => "REL",
            EventType::ABS => "ABS",
            _ => "EV",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EV_{}", self.prefix())
    }
}

/// A (type, code) pair identifying one input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId {
    pub event_type: EventType,
    pub code: u16,
}

impl EventId {
    pub const fn new(event_type: EventType, code: u16) -> Self {
        Self { event_type, code }
    }

    pub const fn key(code: u16) -> Self {
        Self::new(EventType::KEY, code)
    }

    pub const fn rel(code: u16) -> Self {
        Self::new(EventType::REL, code)
    }

    pub const fn abs(code: u16) -> Self {
        Self::new(EventType::ABS, code)
    }

    pub const fn syn(code: u16) -> Self {
        Self::new(EventType::SYN, code)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match codes::name_of(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}:0x{:03x}", self.event_type.prefix(), self.code),
        }
    }
}

impl std::str::FromStr for EventId {
    type Err = crate::error::CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codes::parse(s)
    }
}

/// One raw event read from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub event_type: EventType,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    pub const fn new(event_type: EventType, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    pub fn id(&self) -> EventId {
        EventId::new(self.event_type, self.code)
    }

    /// True for `SYN_REPORT`, the end of one device frame
    pub fn is_report(&self) -> bool {
        self.event_type == EventType::SYN && self.code == codes::SYN_REPORT
    }
}

/// One synthetic event for the virtual device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    pub event_type: EventType,
    pub code: u16,
    pub value: i32,
}

impl OutputEvent {
    pub const fn new(target: EventId, value: i32) -> Self {
        Self {
            event_type: target.event_type,
            code: target.code,
            value,
        }
    }

    pub fn id(&self) -> EventId {
        EventId::new(self.event_type, self.code)
    }

    /// Frame terminator
    pub const fn report() -> Self {
        Self::new(EventId::syn(codes::SYN_REPORT), 0)
    }
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id(), self.value)
    }
}

/// Live value query exposed by the input source
///
/// Values reflect the latest event seen for each channel, including the event
/// currently being dispatched.
pub trait InputState {
    fn value(&self, id: EventId) -> i32;
}

/// Destination of emitted events. Order of calls is the order on the wire.
pub trait EventSink {
    fn emit(&mut self, event: OutputEvent);
}

impl EventSink for Vec<OutputEvent> {
    fn emit(&mut self, event: OutputEvent) {
        self.push(event);
    }
}

/// Latest value per channel, fed from the raw event stream
#[derive(Debug, Clone, Default)]
pub struct LiveValues {
    values: HashMap<EventId, i32>,
}

impl LiveValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event's value. `SYN` events carry no channel state.
    pub fn apply(&mut self, event: &InputEvent) {
        if event.event_type != EventType::SYN {
            self.values.insert(event.id(), event.value);
        }
    }

    pub fn set(&mut self, id: EventId, value: i32) {
        self.values.insert(id, value);
    }
}

impl InputState for LiveValues {
    fn value(&self, id: EventId) -> i32 {
        self.values.get(&id).copied().unwrap_or(0)
    }
}
