//! Haptic feedback: the actuator interface and force-feedback envelope shaping
//!
//! Controllers with two pad actuators take short pulse trains. Periodic
//! force-feedback effects are approximated by sampling their envelope once per
//! period and sending a single pulse of that strength to both actuators.

use serde::{Deserialize, Serialize};

/// Pulse period used for rumble, in microseconds
const RUMBLE_PERIOD: u16 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Left,
    Right,
}

/// One fire-and-forget pulse train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPulse {
    pub actuator: Actuator,
    pub magnitude: u16,
    /// Microseconds between repeats
    pub period: u16,
    pub count: u16,
}

impl HapticPulse {
    /// A single click
    pub fn click(actuator: Actuator, magnitude: u16) -> Self {
        Self {
            actuator,
            magnitude,
            period: 0,
            count: 1,
        }
    }

    /// `count` pulses spaced by the rumble period
    pub fn train(actuator: Actuator, magnitude: u16, count: u16) -> Self {
        Self {
            actuator,
            magnitude,
            period: RUMBLE_PERIOD,
            count,
        }
    }
}

pub trait Haptics {
    fn pulse(&mut self, pulse: HapticPulse);
}

impl Haptics for Vec<HapticPulse> {
    fn pulse(&mut self, pulse: HapticPulse) {
        self.push(pulse);
    }
}

/// Scale a magnitude by a gain clamped to `[0, 1]`
pub fn apply_gain(magnitude: u16, gain: f64) -> u16 {
    let gain = if gain.is_finite() { gain.clamp(0.0, 1.0) } else { 0.0 };
    (f64::from(magnitude) * gain).round() as u16
}

/// Periodic effect envelope; all lengths in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodicEnvelope {
    pub magnitude: u16,
    #[serde(default)]
    pub attack_length: u16,
    #[serde(default)]
    pub attack_level: u16,
    #[serde(default)]
    pub fade_length: u16,
    #[serde(default)]
    pub fade_level: u16,
    pub replay_length: u16,
    pub period: u16,
}

impl PeriodicEnvelope {
    /// Envelope strength at `t` ms into playback
    ///
    /// Ramps linearly from `attack_level` up to `magnitude` during the attack,
    /// holds, then ramps to `fade_level` over the last `fade_length` ms. When
    /// attack and fade overlap, the fade wins.
    pub fn magnitude_at(&self, t: u32) -> u16 {
        let magnitude = f64::from(self.magnitude);
        let replay = u32::from(self.replay_length);
        let mut m = magnitude;
        if t < u32::from(self.attack_length) {
            let c = f64::from(t) / f64::from(self.attack_length);
            m = f64::from(self.attack_level) * (1.0 - c) + magnitude * c;
        }
        if self.fade_length > 0 && t > replay.saturating_sub(u32::from(self.fade_length)) {
            let c = f64::from(replay.saturating_sub(t)) / f64::from(self.fade_length);
            m = magnitude * c + f64::from(self.fade_level) * (1.0 - c);
        }
        m.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    /// Sample times and strengths, one per period through `replay_length`
    ///
    /// A zero period yields the single sample at `t = 0`.
    pub fn schedule(&self) -> Vec<(u32, u16)> {
        let replay = u32::from(self.replay_length);
        if self.period == 0 {
            return vec![(0, self.magnitude_at(0))];
        }
        (0..=replay)
            .step_by(usize::from(self.period))
            .map(|t| (t, self.magnitude_at(t)))
            .collect()
    }

    /// The click pair sent for the sample at `t`
    pub fn pulses_at(&self, t: u32, gain: f64) -> [HapticPulse; 2] {
        let m = apply_gain(self.magnitude_at(t), gain);
        [
            HapticPulse::click(Actuator::Left, m),
            HapticPulse::click(Actuator::Right, m),
        ]
    }
}

/// Dual-motor rumble effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rumble {
    /// Left actuator
    pub strong: u16,
    /// Right actuator
    pub weak: u16,
    pub length_ms: u16,
}

impl Rumble {
    /// One pulse train per actuator covering the effect length
    pub fn pulses(&self, gain: f64) -> [HapticPulse; 2] {
        let count = self.length_ms / 100;
        [
            HapticPulse::train(Actuator::Left, apply_gain(self.strong, gain), count),
            HapticPulse::train(Actuator::Right, apply_gain(self.weak, gain), count),
        ]
    }

    pub fn play<H: Haptics + ?Sized>(&self, gain: f64, haptics: &mut H) {
        for p in self.pulses(gain) {
            haptics.pulse(p);
        }
    }
}
