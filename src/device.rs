//! evdev input source and uinput output device
//!
//! The source is a controller's `/dev/input/event*` node, optionally grabbed
//! so its raw events do not also reach other clients. The output is a
//! virtual device declaring exactly the channels the active profile emits.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisType, AttributeSet, Device, Key, RelativeAxisType, UinputAbsSetup,
};
use padmap_core::{EventId, EventSink, EventType, InputEvent, OutputEvent};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from input or virtual device operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to grab input device: {0}")]
    Grab(#[source] std::io::Error),
    #[error("Failed to read input events: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
    #[error("No controller found (pass --device)")]
    NoController,
}

/// One absolute output axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsAxis {
    pub code: u16,
    pub min: i32,
    pub max: i32,
    pub fuzz: i32,
    pub flat: i32,
}

impl AbsAxis {
    pub fn new(code: u16, min: i32, max: i32) -> Self {
        Self {
            code,
            min,
            max,
            fuzz: 0,
            flat: 0,
        }
    }

    /// Stick-style axis with noise filtering and a center dead zone
    pub fn stick(code: u16) -> Self {
        Self {
            fuzz: 16,
            flat: 128,
            ..Self::new(code, -32768, 32767)
        }
    }
}

/// Channels a virtual device must declare
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSpec {
    pub name: String,
    pub keys: Vec<u16>,
    pub rel: Vec<u16>,
    pub abs: Vec<AbsAxis>,
}

impl DeviceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn key(mut self, code: u16) -> Self {
        if !self.keys.contains(&code) {
            self.keys.push(code);
        }
        self
    }

    pub fn keys(self, codes: impl IntoIterator<Item = u16>) -> Self {
        codes.into_iter().fold(self, Self::key)
    }

    pub fn rel(mut self, code: u16) -> Self {
        if !self.rel.contains(&code) {
            self.rel.push(code);
        }
        self
    }

    pub fn abs(mut self, axis: AbsAxis) -> Self {
        if !self.abs.iter().any(|a| a.code == axis.code) {
            self.abs.push(axis);
        }
        self
    }

    /// Declare `id` with a default range for absolute axes
    pub fn channel(self, id: EventId, default_abs: impl Fn(u16) -> AbsAxis) -> Self {
        match id.event_type {
            EventType::KEY => self.key(id.code),
            EventType::REL => self.rel(id.code),
            EventType::ABS => self.abs(default_abs(id.code)),
            _ => self,
        }
    }

    pub fn declares(&self, id: EventId) -> bool {
        match id.event_type {
            EventType::KEY => self.keys.contains(&id.code),
            EventType::REL => self.rel.contains(&id.code),
            EventType::ABS => self.abs.iter().any(|a| a.code == id.code),
            _ => false,
        }
    }
}

/// Open the controller node
pub fn open_source(path: &Path, grab: bool) -> Result<Device, DeviceError> {
    let mut device = Device::open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Opened {} ({})",
        path.display(),
        device.name().unwrap_or("unnamed")
    );
    if grab {
        device.grab().map_err(DeviceError::Grab)?;
        debug!("Grabbed {}", path.display());
    }
    Ok(device)
}

/// All readable input devices with their names
pub fn list_devices() -> Vec<(PathBuf, String)> {
    let mut devices: Vec<_> = evdev::enumerate()
        .map(|(path, dev)| (path, dev.name().unwrap_or("unnamed").to_string()))
        .collect();
    devices.sort();
    devices
}

/// First device that looks like a dual-pad controller
///
/// Requires a south face button and a left pad axis, which excludes plain
/// keyboards, mice and the controller's own keyboard/mouse interfaces.
pub fn find_controller() -> Option<PathBuf> {
    let mut candidates: Vec<_> = evdev::enumerate()
        .filter(|(_, dev)| {
            let has_south = dev
                .supported_keys()
                .is_some_and(|keys| keys.contains(Key::BTN_SOUTH));
            let has_pad = dev
                .supported_absolute_axes()
                .is_some_and(|axes| axes.contains(AbsoluteAxisType::ABS_HAT0X));
            has_south && has_pad
        })
        .map(|(path, _)| path)
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Convert a raw evdev event into the core representation
pub fn to_core(event: &evdev::InputEvent) -> InputEvent {
    InputEvent::new(EventType(event.event_type().0), event.code(), event.value())
}

fn to_evdev(event: &OutputEvent) -> evdev::InputEvent {
    evdev::InputEvent::new(evdev::EventType(event.event_type.0), event.code, event.value)
}

/// Virtual output device
///
/// Events are buffered and written as one frame when a `SYN_REPORT` is
/// emitted; empty frames are not written.
pub struct VirtualOutput {
    device: VirtualDevice,
    pending: Vec<evdev::InputEvent>,
}

impl VirtualOutput {
    pub fn create(spec: &DeviceSpec) -> Result<Self, DeviceError> {
        let mut builder = VirtualDeviceBuilder::new()
            .map_err(DeviceError::CreateDevice)?
            .name(&spec.name);

        if !spec.keys.is_empty() {
            let mut keys = AttributeSet::<Key>::new();
            for &code in &spec.keys {
                keys.insert(Key::new(code));
            }
            builder = builder
                .with_keys(&keys)
                .map_err(DeviceError::CreateDevice)?;
        }

        if !spec.rel.is_empty() {
            let mut rel = AttributeSet::<RelativeAxisType>::new();
            for &code in &spec.rel {
                rel.insert(RelativeAxisType(code));
            }
            builder = builder
                .with_relative_axes(&rel)
                .map_err(DeviceError::CreateDevice)?;
        }

        for axis in &spec.abs {
            let setup = UinputAbsSetup::new(
                AbsoluteAxisType(axis.code),
                AbsInfo::new(0, axis.min, axis.max, axis.fuzz, axis.flat, 0),
            );
            builder = builder
                .with_absolute_axis(&setup)
                .map_err(DeviceError::CreateDevice)?;
        }

        let device = builder.build().map_err(DeviceError::CreateDevice)?;
        info!(
            "Created virtual device \"{}\" ({} keys, {} rel, {} abs)",
            spec.name,
            spec.keys.len(),
            spec.rel.len(),
            spec.abs.len()
        );

        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }

    /// Write buffered events as one frame
    pub fn flush(&mut self) -> Result<(), DeviceError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.device.emit(&self.pending);
        self.pending.clear();
        result.map_err(DeviceError::EmitEvent)
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl EventSink for VirtualOutput {
    fn emit(&mut self, event: OutputEvent) {
        if event.event_type == EventType::SYN {
            // `VirtualDevice::emit` terminates each batch with its own report
            if let Err(e) = self.flush() {
                warn!("{}", e);
            }
        } else {
            self.pending.push(to_evdev(&event));
        }
    }
}
