//! Haptic collaborator for the daemon
//!
//! The evdev node of the controller carries no actuator channel, so pulses are
//! only reported through tracing. Gain is applied here so profiles and the
//! configured effects can always ask for their nominal strength.

use padmap_core::haptic::apply_gain;
use padmap_core::{HapticPulse, Haptics, PeriodicEnvelope};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

pub struct LogHaptics {
    gain: f64,
    sent: u64,
}

impl LogHaptics {
    pub fn new(gain: f64) -> Self {
        Self { gain, sent: 0 }
    }

    /// Pulses accepted so far
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Haptics for LogHaptics {
    fn pulse(&mut self, pulse: HapticPulse) {
        let magnitude = apply_gain(pulse.magnitude, self.gain);
        if magnitude == 0 || pulse.count == 0 {
            return;
        }
        self.sent += 1;
        trace!(
            "haptic {:?}: magnitude {:#06x}, period {}us x{}",
            pulse.actuator,
            magnitude,
            pulse.period,
            pulse.count
        );
    }
}

/// Play an envelope in real time, one click pair per sample
///
/// Returns the number of samples sent.
pub async fn play_effect<H: Haptics + ?Sized>(effect: &PeriodicEnvelope, haptics: &mut H) -> usize {
    let start = Instant::now();
    let schedule = effect.schedule();
    for &(t, _) in &schedule {
        sleep_until(start + Duration::from_millis(u64::from(t))).await;
        for p in effect.pulses_at(t, 1.0) {
            haptics.pulse(p);
        }
    }
    debug!(
        "Played {} samples over {}ms",
        schedule.len(),
        effect.replay_length
    );
    schedule.len()
}
