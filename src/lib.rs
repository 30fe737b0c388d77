//! padmap: remap a touchpad game controller onto virtual input devices
//!
//! Raw evdev events from the controller feed a [`pipeline::Pipeline`] that
//! keeps a live value table, filters events and hands them to the active
//! [`profile::Profile`]. The profile writes to a uinput device shaped to
//! exactly the channels it emits.

pub mod cli;
pub mod config;
pub mod device;
pub mod haptics;
pub mod pipeline;
pub mod profile;

pub use config::DaemonConfig;
pub use pipeline::Pipeline;
