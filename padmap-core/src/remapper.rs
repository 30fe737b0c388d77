//! Declarative event remapping with modifier gating
//!
//! A [`Remapper`] owns an ordered rule table. Each [`RemapRule`] forwards one
//! input channel to one output channel, optionally transforming the value and
//! optionally gated by modifier predicates on other channels.
//!
//! Modifiers are edge-triggered: when a modifier channel changes so that a
//! rule's gate closes, the rule's output is forced to its release value; when
//! the gate opens, the output is re-sent from the source channel's live value.
//! That way a held button follows its modifier without being pressed again.
//!
//! ```text
//! BTN_SOUTH ──► KEY_ENTER
//! BTN_THUMBL ─[BTN_THUMB >= 1]─► BTN_MIDDLE
//! ABS_Y ──(negate)──► ABS_Y
//! ```

use crate::error::RemapError;
use crate::event::{EventId, EventSink, InputEvent, InputState, OutputEvent};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Value transform applied before emission
#[derive(Clone, Default)]
pub enum Transform {
    #[default]
    Identity,
    Negate,
    /// `mult * value / div + offset`, integer division toward zero
    Linear { mult: i32, div: i32, offset: i32 },
    Custom(Arc<dyn Fn(i32) -> i32 + Send + Sync>),
}

impl Transform {
    pub fn linear(mult: i32, div: i32, offset: i32) -> Self {
        Transform::Linear { mult, div, offset }
    }

    pub fn custom(f: impl Fn(i32) -> i32 + Send + Sync + 'static) -> Self {
        Transform::Custom(Arc::new(f))
    }

    pub fn apply(&self, value: i32) -> i32 {
        match self {
            Transform::Identity => value,
            Transform::Negate => value.saturating_neg(),
            Transform::Linear { mult, div, offset } => {
                if *div == 0 {
                    return *offset;
                }
                let v = i64::from(*mult) * i64::from(value) / i64::from(*div) + i64::from(*offset);
                v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
            Transform::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => f.write_str("Identity"),
            Transform::Negate => f.write_str("Negate"),
            Transform::Linear { mult, div, offset } => f
                .debug_struct("Linear")
                .field("mult", mult)
                .field("div", div)
                .field("offset", offset)
                .finish(),
            Transform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Range condition on the live value of another channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierPredicate {
    pub source: EventId,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl ModifierPredicate {
    pub fn new(source: EventId, min: Option<i32>, max: Option<i32>) -> Self {
        Self { source, min, max }
    }

    pub fn at_least(source: EventId, min: i32) -> Self {
        Self::new(source, Some(min), None)
    }

    pub fn at_most(source: EventId, max: i32) -> Self {
        Self::new(source, None, Some(max))
    }

    pub fn holds<I: InputState + ?Sized>(&self, input: &I) -> bool {
        let value = input.value(self.source);
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// One source → target mapping
#[derive(Debug, Clone)]
pub struct RemapRule {
    pub source: EventId,
    pub target: EventId,
    pub transform: Transform,
    /// All must hold for the rule to be active
    pub modifiers: Vec<ModifierPredicate>,
    /// Sent when the modifier gate closes
    pub release_value: i32,
    gate_state: bool,
}

impl RemapRule {
    pub fn new(source: EventId, target: EventId) -> Self {
        Self {
            source,
            target,
            transform: Transform::Identity,
            modifiers: Vec::new(),
            release_value: 0,
            gate_state: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_modifier(mut self, modifier: ModifierPredicate) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_modifier_min(self, source: EventId, min: i32) -> Self {
        self.with_modifier(ModifierPredicate::at_least(source, min))
    }

    pub fn with_modifier_max(self, source: EventId, max: i32) -> Self {
        self.with_modifier(ModifierPredicate::at_most(source, max))
    }

    pub fn with_release_value(mut self, value: i32) -> Self {
        self.release_value = value;
        self
    }

    /// Whether the modifier set held at the last evaluation
    pub fn gate_state(&self) -> bool {
        self.gate_state
    }

    fn modifiers_hold<I: InputState + ?Sized>(&self, input: &I) -> bool {
        self.modifiers.iter().all(|m| m.holds(input))
    }

    fn validate(&self) -> Result<(), RemapError> {
        if let Transform::Linear { div: 0, .. } = self.transform {
            return Err(RemapError::ZeroDivisor);
        }
        for (i, m) in self.modifiers.iter().enumerate() {
            if self.modifiers[..i].iter().any(|o| o.source == m.source) {
                return Err(RemapError::DuplicateModifier(m.source));
            }
        }
        Ok(())
    }
}

/// Handle to a registered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

/// Rule table plus lookup indices by source and by modifier channel
#[derive(Debug, Default)]
pub struct Remapper {
    rules: Vec<RemapRule>,
    by_source: HashMap<EventId, Vec<usize>>,
    by_modifier: HashMap<EventId, Vec<usize>>,
}

impl Remapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule
    ///
    /// The gate state starts from the modifiers evaluated against `input`.
    /// Codes nobody ever sends are accepted; such rules simply never fire.
    pub fn add_rule<I: InputState + ?Sized>(
        &mut self,
        mut rule: RemapRule,
        input: &I,
    ) -> Result<RuleId, RemapError> {
        rule.validate()?;
        rule.gate_state = rule.modifiers_hold(input);

        let idx = self.rules.len();
        self.by_source.entry(rule.source).or_default().push(idx);
        for m in &rule.modifiers {
            self.by_modifier.entry(m.source).or_default().push(idx);
        }
        debug!(
            "Rule #{}: {} -> {} ({} modifiers, {:?})",
            idx,
            rule.source,
            rule.target,
            rule.modifiers.len(),
            rule.transform
        );
        self.rules.push(rule);
        Ok(RuleId(idx))
    }

    /// Process one input event
    ///
    /// `input` must already reflect `event`. Direct mappings of the event's
    /// channel are emitted first, then the gate transitions of rules that use
    /// the channel as a modifier, one rule at a time in registration order.
    /// Rules sharing a target therefore end on the last registered rule's
    /// transition.
    pub fn dispatch<I, S>(&mut self, event: &InputEvent, input: &I, sink: &mut S)
    where
        I: InputState + ?Sized,
        S: EventSink + ?Sized,
    {
        let id = event.id();

        if let Some(indices) = self.by_source.get(&id) {
            for &i in indices {
                let rule = &self.rules[i];
                if rule.modifiers_hold(input) {
                    let out = OutputEvent::new(rule.target, rule.transform.apply(event.value));
                    trace!("{} -> {}", id, out);
                    sink.emit(out);
                }
            }
        }

        let Some(indices) = self.by_modifier.get(&id) else {
            return;
        };
        for &i in indices {
            let rule = &mut self.rules[i];
            let open = rule.modifiers_hold(input);
            if rule.gate_state && !open {
                trace!("{} gate closed, releasing {}", id, rule.target);
                sink.emit(OutputEvent::new(rule.target, rule.release_value));
            } else if !rule.gate_state && open {
                let value = rule.transform.apply(input.value(rule.source));
                trace!("{} gate opened, re-sending {}={}", id, rule.target, value);
                sink.emit(OutputEvent::new(rule.target, value));
            }
            rule.gate_state = open;
        }
    }

    /// Drive every target to its release value, once per target
    ///
    /// Used on shutdown so nothing stays held on the virtual device. When
    /// several rules share a target, the first registered rule's release value
    /// is used.
    pub fn release_all<S: EventSink + ?Sized>(&self, sink: &mut S) {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.target) {
                seen.push(rule.target);
                sink.emit(OutputEvent::new(rule.target, rule.release_value));
            }
        }
    }

    pub fn rule(&self, id: RuleId) -> Option<&RemapRule> {
        self.rules.get(id.0)
    }

    /// Every target channel, in registration order, without duplicates
    pub fn targets(&self) -> Vec<EventId> {
        let mut out = Vec::new();
        for rule in &self.rules {
            if !out.contains(&rule.target) {
                out.push(rule.target);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;
    use crate::event::{EventType, LiveValues};

    const BTN_MOD: u16 = BTN_THUMB;

    fn press(live: &mut LiveValues, code: u16, value: i32) -> InputEvent {
        let ev = InputEvent::new(EventType::KEY, code, value);
        live.apply(&ev);
        ev
    }

    #[test]
    fn test_transform_apply() {
        assert_eq!(Transform::Identity.apply(17), 17);
        assert_eq!(Transform::Negate.apply(17), -17);
        assert_eq!(Transform::Negate.apply(i32::MIN), i32::MAX);
        assert_eq!(Transform::linear(-1, 2, 5).apply(7), 2);
        assert_eq!(Transform::linear(255, 32767, 0).apply(32767), 255);
        assert_eq!(Transform::custom(|v| v * 3).apply(4), 12);
    }

    #[test]
    fn test_passthrough_in_registration_order() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        remapper
            .add_rule(RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_ENTER)), &live)
            .unwrap();
        remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_SPACE)),
                &live,
            )
            .unwrap();

        let mut out = Vec::new();
        remapper.dispatch(&InputEvent::new(EventType::KEY, BTN_SOUTH, 1), &live, &mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::key(KEY_ENTER), 1),
                OutputEvent::new(EventId::key(KEY_SPACE), 1),
            ]
        );
    }

    #[test]
    fn test_unmatched_and_unknown_codes_are_noops() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        remapper
            .add_rule(RemapRule::new(EventId::key(0x2fe), EventId::key(KEY_A)), &live)
            .unwrap();
        let mut out = Vec::new();
        remapper.dispatch(&InputEvent::new(EventType::KEY, BTN_EAST, 1), &live, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_modifier_gating_edges() {
        let mut live = LiveValues::new();
        let mut remapper = Remapper::new();
        let id = remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_X))
                    .with_modifier_min(EventId::key(BTN_MOD), 1),
                &live,
            )
            .unwrap();
        assert!(!remapper.rule(id).unwrap().gate_state());

        let mut out = Vec::new();
        let ev = press(&mut live, BTN_SOUTH, 1);
        remapper.dispatch(&ev, &live, &mut out);
        assert!(out.is_empty());

        let ev = press(&mut live, BTN_MOD, 1);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::key(KEY_X), 1)]);
        assert!(remapper.rule(id).unwrap().gate_state());

        // repeated modifier value: no transition
        out.clear();
        let ev = press(&mut live, BTN_MOD, 1);
        remapper.dispatch(&ev, &live, &mut out);
        assert!(out.is_empty());

        let ev = press(&mut live, BTN_MOD, 0);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::key(KEY_X), 0)]);
        assert!(!remapper.rule(id).unwrap().gate_state());
    }

    #[test]
    fn test_initial_gate_from_live_values() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        let open = remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_THUMBL), EventId::key(BTN_THUMBL))
                    .with_modifier_max(EventId::key(BTN_MOD), 0),
                &live,
            )
            .unwrap();
        assert!(remapper.rule(open).unwrap().gate_state());
    }

    #[test]
    fn test_release_value_and_transform_on_repress() {
        let mut live = LiveValues::new();
        let mut remapper = Remapper::new();
        remapper
            .add_rule(
                RemapRule::new(EventId::abs(ABS_Y), EventId::abs(ABS_Y))
                    .with_transform(Transform::Negate)
                    .with_modifier_max(EventId::key(BTN_MOD), 0)
                    .with_release_value(5),
                &live,
            )
            .unwrap();

        let mut out = Vec::new();
        let y = InputEvent::new(EventType::ABS, ABS_Y, 1000);
        live.apply(&y);
        remapper.dispatch(&y, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::abs(ABS_Y), -1000)]);

        out.clear();
        let ev = press(&mut live, BTN_MOD, 1);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::abs(ABS_Y), 5)]);

        out.clear();
        let ev = press(&mut live, BTN_MOD, 0);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::abs(ABS_Y), -1000)]);
    }

    #[test]
    fn test_gate_transitions_follow_registration_order() {
        let mut live = LiveValues::new();
        let mut remapper = Remapper::new();
        remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_A))
                    .with_modifier_min(EventId::key(BTN_MOD), 1),
                &live,
            )
            .unwrap();
        remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_B))
                    .with_modifier_max(EventId::key(BTN_MOD), 0),
                &live,
            )
            .unwrap();

        let ev = press(&mut live, BTN_SOUTH, 1);
        let mut out = Vec::new();
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(out, vec![OutputEvent::new(EventId::key(KEY_B), 1)]);

        out.clear();
        let ev = press(&mut live, BTN_MOD, 1);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::key(KEY_A), 1),
                OutputEvent::new(EventId::key(KEY_B), 0),
            ]
        );

        out.clear();
        let ev = press(&mut live, BTN_MOD, 0);
        remapper.dispatch(&ev, &live, &mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::key(KEY_A), 0),
                OutputEvent::new(EventId::key(KEY_B), 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_modifier_rejected() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        let err = remapper
            .add_rule(
                RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_A))
                    .with_modifier_min(EventId::key(BTN_MOD), 1)
                    .with_modifier_max(EventId::key(BTN_MOD), 3),
                &live,
            )
            .unwrap_err();
        assert_eq!(err, RemapError::DuplicateModifier(EventId::key(BTN_MOD)));
        assert!(remapper.is_empty());
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        let err = remapper
            .add_rule(
                RemapRule::new(EventId::abs(ABS_X), EventId::abs(ABS_X))
                    .with_transform(Transform::linear(1, 0, 0)),
                &live,
            )
            .unwrap_err();
        assert_eq!(err, RemapError::ZeroDivisor);
    }

    #[test]
    fn test_targets_deduplicated() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        for (src, dst) in [(BTN_SOUTH, KEY_A), (BTN_EAST, KEY_B), (BTN_NORTH, KEY_A)] {
            remapper
                .add_rule(RemapRule::new(EventId::key(src), EventId::key(dst)), &live)
                .unwrap();
        }
        assert_eq!(remapper.targets(), vec![EventId::key(KEY_A), EventId::key(KEY_B)]);
    }

    #[test]
    fn test_release_all_once_per_target() {
        let live = LiveValues::new();
        let mut remapper = Remapper::new();
        remapper
            .add_rule(
                RemapRule::new(EventId::abs(ABS_HAT0X), EventId::abs(ABS_X)).with_release_value(7),
                &live,
            )
            .unwrap();
        remapper
            .add_rule(RemapRule::new(EventId::abs(ABS_X), EventId::abs(ABS_X)), &live)
            .unwrap();
        remapper
            .add_rule(RemapRule::new(EventId::key(BTN_SOUTH), EventId::key(KEY_A)), &live)
            .unwrap();
        let mut out = Vec::new();
        remapper.release_all(&mut out);
        assert_eq!(
            out,
            vec![
                OutputEvent::new(EventId::abs(ABS_X), 7),
                OutputEvent::new(EventId::key(KEY_A), 0),
            ]
        );
    }
}
