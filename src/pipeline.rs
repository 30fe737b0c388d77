//! Event pipeline: live value table, input filter and active profile
//!
//! Every input event updates the live table first, so gates and frame-based
//! profiles see the newest controller state even for events the filter
//! withholds from the profile. `SYN_REPORT` always reaches the profile.

use crate::config::{ConfigError, DaemonConfig, ProfileKind};
use crate::device::DeviceSpec;
use crate::profile::{self, Profile};
use padmap_core::codes::SYN_DROPPED;
use padmap_core::{EventFilter, EventSink, EventType, Haptics, InputEvent, LiveValues};
use tracing::{trace, warn};

pub struct Pipeline {
    live: LiveValues,
    filter: EventFilter,
    profile: Box<dyn Profile>,
}

impl Pipeline {
    pub fn new(kind: ProfileKind, config: &DaemonConfig) -> Result<Self, ConfigError> {
        let live = LiveValues::new();
        let profile = profile::build(kind, config, &live)?;
        Ok(Self {
            live,
            filter: config.filter.clone().unwrap_or_else(EventFilter::pass_all),
            profile,
        })
    }

    pub fn device_spec(&self) -> DeviceSpec {
        self.profile.device_spec()
    }

    pub fn process(
        &mut self,
        event: &InputEvent,
        out: &mut dyn EventSink,
        haptics: &mut dyn Haptics,
    ) {
        if event.event_type == EventType::SYN {
            if event.code == SYN_DROPPED {
                // the kernel buffer overflowed; the next report resynchronises
                warn!("Input events dropped by the kernel");
                return;
            }
            if !event.is_report() {
                return;
            }
        } else {
            self.live.apply(event);
            if !self.filter.matches(event) {
                trace!("filtered {:?}", event.id());
                return;
            }
        }
        self.profile.handle(event, &self.live, out, haptics);
    }

    /// Release everything the profile holds
    pub fn shutdown(&mut self, out: &mut dyn EventSink, haptics: &mut dyn Haptics) {
        self.profile.release(&self.live, out, haptics);
    }

    pub fn live(&self) -> &LiveValues {
        &self.live
    }

    pub fn profile_name(&self) -> &'static str {
        self.profile.name()
    }
}
