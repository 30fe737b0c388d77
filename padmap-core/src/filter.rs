//! Input event selection
//!
//! A filter decides which raw events reach a profile. An event passes when it
//! matches any rule; `inverted` flips the outcome, so the inverted empty filter
//! passes everything.

use crate::event::{EventId, EventType, InputEvent};
use crate::serde_codes::{deserialize_code, deserialize_type, serialize_code, serialize_type};
use serde::{Deserialize, Serialize};

/// One match condition
///
/// In config files: `{ match = "type", event_type = "ABS" }`,
/// `{ match = "code", code = "BTN_MODE" }` or
/// `{ match = "code_range", min = "BTN_SOUTH", max = "BTN_THUMBR" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum FilterRule {
    /// Every event of one type
    Type {
        #[serde(serialize_with = "serialize_type", deserialize_with = "deserialize_type")]
        event_type: EventType,
    },
    /// One exact channel
    Code {
        #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
        code: EventId,
    },
    /// Inclusive code range; both ends must have the same type
    CodeRange {
        #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
        min: EventId,
        #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
        max: EventId,
    },
}

impl FilterRule {
    pub fn event_type(t: EventType) -> Self {
        FilterRule::Type { event_type: t }
    }

    pub fn code(id: EventId) -> Self {
        FilterRule::Code { code: id }
    }

    pub fn code_range(t: EventType, min: u16, max: u16) -> Self {
        FilterRule::CodeRange {
            min: EventId::new(t, min),
            max: EventId::new(t, max),
        }
    }

    /// A range whose ends differ in type matches nothing
    pub fn matches(&self, event: &InputEvent) -> bool {
        match *self {
            FilterRule::Type { event_type } => event.event_type == event_type,
            FilterRule::Code { code } => event.id() == code,
            FilterRule::CodeRange { min, max } => {
                min.event_type == max.event_type
                    && event.event_type == min.event_type
                    && (min.code..=max.code).contains(&event.code)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub rules: Vec<FilterRule>,
    #[serde(default)]
    pub inverted: bool,
}

impl EventFilter {
    pub fn new(rules: Vec<FilterRule>, inverted: bool) -> Self {
        Self { rules, inverted }
    }

    pub fn pass_all() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn add(&mut self, rule: FilterRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn matches(&self, event: &InputEvent) -> bool {
        self.rules.iter().any(|r| r.matches(event)) != self.inverted
    }
}
