//! Daemon configuration
//!
//! Read from TOML at startup and never written back. Event codes are written
//! as names (`"KEY_ENTER"`, `"ABS_HAT0X"`), as `"TYPE:number"` literals
//! (`"KEY:0x13f"`) or as `{ type = "KEY", code = 319 }` tables.

use padmap_core::codes::*;
use padmap_core::serde_codes::{
    deserialize_code, deserialize_opt_code, serialize_code, serialize_opt_code,
};
use padmap_core::{
    Actuator, EventFilter, EventId, PeriodicEnvelope, RemapError, Rumble, Shape, Transform,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading configuration or building a profile from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Profile \"{profile}\" needs `{field}` to be set")]
    MissingCode {
        profile: &'static str,
        field: &'static str,
    },
    #[error("Rule {index}: {source}")]
    Rule {
        index: usize,
        #[source]
        source: RemapError,
    },
}

/// Which built-in behaviour drives the virtual device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    /// Xbox-style gamepad; left pad click + touch acts as a d-pad
    #[default]
    Gamepad,
    /// Keyboard and mouse buttons, stick arrows, circular scrolling
    Desktop,
    /// Orientation sensor drives the pointer
    GyroMouse,
    /// Right pad as an absolute pointer over a screen region
    Tablet,
    /// Rules and regions from the config file only
    Custom,
}

/// Source codes of each physical control on the input device
///
/// Defaults follow the Linux `hid-steam` driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerLayout {
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub btn_a: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub btn_b: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub btn_x: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub btn_y: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub shoulder_left: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub shoulder_right: EventId,
    /// Trigger full-press buttons
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub trigger_left: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub trigger_right: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub grip_left: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub grip_right: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub select: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub start: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub mode: EventId,
    /// Pad clicks
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub click_left: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub click_right: EventId,
    /// Pad touches
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub touch_left: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub touch_right: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub stick_x: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub stick_y: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub left_pad_x: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub left_pad_y: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub right_pad_x: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub right_pad_y: EventId,
    /// Analog trigger travel
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub trigger_left_axis: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub trigger_right_axis: EventId,
    /// The device reports Y growing downward (joystick convention)
    pub y_axis_down: bool,
}

impl Default for ControllerLayout {
    fn default() -> Self {
        Self {
            btn_a: EventId::key(BTN_A),
            btn_b: EventId::key(BTN_B),
            btn_x: EventId::key(BTN_X),
            btn_y: EventId::key(BTN_Y),
            shoulder_left: EventId::key(BTN_TL),
            shoulder_right: EventId::key(BTN_TR),
            trigger_left: EventId::key(BTN_TL2),
            trigger_right: EventId::key(BTN_TR2),
            grip_left: EventId::key(BTN_GEAR_DOWN),
            grip_right: EventId::key(BTN_GEAR_UP),
            select: EventId::key(BTN_SELECT),
            start: EventId::key(BTN_START),
            mode: EventId::key(BTN_MODE),
            click_left: EventId::key(BTN_THUMBL),
            click_right: EventId::key(BTN_THUMBR),
            touch_left: EventId::key(BTN_THUMB),
            touch_right: EventId::key(BTN_THUMB2),
            stick_x: EventId::abs(ABS_X),
            stick_y: EventId::abs(ABS_Y),
            left_pad_x: EventId::abs(ABS_HAT0X),
            left_pad_y: EventId::abs(ABS_HAT0Y),
            right_pad_x: EventId::abs(ABS_RX),
            right_pad_y: EventId::abs(ABS_RY),
            trigger_left_axis: EventId::abs(ABS_HAT2Y),
            trigger_right_axis: EventId::abs(ABS_HAT2X),
            y_axis_down: true,
        }
    }
}

/// Touch-pad d-pad and scroll settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DpadConfig {
    /// Dead zone radius in axis units
    pub min_radius: f64,
    /// Degrees of finger travel per scroll tick
    pub scroll_step: f64,
    /// Strength of the click felt on d-pad transitions and scroll ticks
    pub haptic_magnitude: u16,
}

impl Default for DpadConfig {
    fn default() -> Self {
        Self {
            min_radius: 8192.0,
            scroll_step: 30.0,
            haptic_magnitude: 0x8000,
        }
    }
}

/// Haptic output strength and the effects the daemon plays itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    /// Scales every pulse, clamped to `[0, 1]`
    pub gain: f64,
    /// Played once when the virtual device comes up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup: Option<Rumble>,
    /// Periodic effect played by `test-haptics`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<PeriodicEnvelope>,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            startup: None,
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GyroConfig {
    /// Degrees of rotation per pointer step
    pub step: f64,
    pub haptic_magnitude: u16,
    /// Orientation quaternion components; required by the gyro-mouse profile
    #[serde(
        serialize_with = "serialize_opt_code",
        deserialize_with = "deserialize_opt_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub qw: Option<EventId>,
    #[serde(
        serialize_with = "serialize_opt_code",
        deserialize_with = "deserialize_opt_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub qx: Option<EventId>,
    #[serde(
        serialize_with = "serialize_opt_code",
        deserialize_with = "deserialize_opt_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub qy: Option<EventId>,
    #[serde(
        serialize_with = "serialize_opt_code",
        deserialize_with = "deserialize_opt_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub qz: Option<EventId>,
}

impl Default for GyroConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            haptic_magnitude: 0x40,
            qw: None,
            qx: None,
            qy: None,
            qz: None,
        }
    }
}

impl GyroConfig {
    /// `[qw, qx, qy, qz]`, or the name of the first missing component
    pub fn quaternion_codes(&self) -> Result<[EventId; 4], &'static str> {
        Ok([
            self.qw.ok_or("gyro.qw")?,
            self.qx.ok_or("gyro.qx")?,
            self.qy.ok_or("gyro.qy")?,
            self.qz.ok_or("gyro.qz")?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabletConfig {
    /// Full desktop size in pixels
    pub screen_size: [f64; 2],
    /// `[x0, y0, x1, y1]` in pixels
    pub screen_region: [f64; 4],
    /// `[x0, y0, x1, y1]` in pad units
    pub input_region: [f64; 4],
}

impl Default for TabletConfig {
    fn default() -> Self {
        Self {
            screen_size: [1920.0, 1080.0],
            screen_region: [0.0, 0.0, 1920.0, 1080.0],
            // the pad is a disk; the full range would leave the corners unreachable
            input_region: [-20000.0, -20000.0, 20000.0, 20000.0],
        }
    }
}

/// Value transform as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformConfig {
    #[default]
    Identity,
    Negate,
    Linear {
        mult: i32,
        div: i32,
        #[serde(default)]
        offset: i32,
    },
}

impl From<TransformConfig> for Transform {
    fn from(t: TransformConfig) -> Self {
        match t {
            TransformConfig::Identity => Transform::Identity,
            TransformConfig::Negate => Transform::Negate,
            TransformConfig::Linear { mult, div, offset } => Transform::linear(mult, div, offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierConfig {
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub code: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

/// One `[[rules]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub source: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub target: EventId,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierConfig>,
    #[serde(default)]
    pub release_value: i32,
}

/// One `[[regions]]` entry: a touch button on a 2D surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Surface axes
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub x: EventId,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub y: EventId,
    /// Only hit-test while this button is held
    #[serde(
        default,
        serialize_with = "serialize_opt_code",
        deserialize_with = "deserialize_opt_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub while_held: Option<EventId>,
    pub shape: Shape,
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub target: EventId,
    /// Value sent on enter; 0 is sent on exit
    #[serde(default = "default_press_value")]
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub haptic: Option<Actuator>,
}

fn default_press_value() -> i32 {
    1
}

/// Range declared for an absolute output axis of the custom profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRangeConfig {
    #[serde(serialize_with = "serialize_code", deserialize_with = "deserialize_code")]
    pub code: EventId,
    pub min: i32,
    pub max: i32,
}

/// Complete daemon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Input device node; auto-detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
    /// Take exclusive access of the input device
    #[serde(default = "default_true")]
    pub grab: bool,
    #[serde(default)]
    pub profile: ProfileKind,
    /// Override for the virtual device name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Which input events reach the profile; everything when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<EventFilter>,
    #[serde(default)]
    pub layout: ControllerLayout,
    #[serde(default)]
    pub dpad: DpadConfig,
    #[serde(default)]
    pub gyro: GyroConfig,
    #[serde(default)]
    pub tablet: TabletConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<AxisRangeConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            device: None,
            grab: true,
            profile: ProfileKind::default(),
            output_name: None,
            filter: None,
            layout: ControllerLayout::default(),
            dpad: DpadConfig::default(),
            gyro: GyroConfig::default(),
            tablet: TabletConfig::default(),
            haptics: HapticsConfig::default(),
            rules: Vec::new(),
            regions: Vec::new(),
            axes: Vec::new(),
        }
    }
}

impl DaemonConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("padmap")
            .join("padmap.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Effective configuration as TOML, for `check-config`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
