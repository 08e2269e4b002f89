//! Device registry - the collection of connected Razer devices
//!
//! A [`DeviceManager`] wraps one [`DeviceSource`] backend. Listing is cheap
//! and happens once per [`DeviceManager::devices`] call; attributes are read
//! lazily while iterating, so a failing device stops iteration at that point.

pub mod memory;
pub mod sysfs;
pub mod usb;

use crate::config::{Backend, Config};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::translations::Translations;
use std::fmt;
use tracing::debug;

pub use memory::MemoryRegistry;
pub use sysfs::SysfsRegistry;
pub use usb::UsbRegistry;

/// Backend-specific handle of one listed device.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registry backend.
pub trait DeviceSource: Send + Sync {
    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;

    /// Currently connected devices, in registry order.
    fn list(&self) -> Result<Vec<DeviceId>>;

    /// Read every attribute of one listed device.
    fn read(&self, id: &DeviceId) -> Result<Device>;

    /// Replace a device's key translations with a raw driver buffer.
    fn write_translations(&self, _id: &DeviceId, _buf: &[u8]) -> Result<()> {
        Err(Error::Unsupported {
            backend: self.backend(),
            operation: "writing key translations",
        })
    }
}

/// Handle to the device registry.
pub struct DeviceManager {
    source: Box<dyn DeviceSource>,
}

impl DeviceManager {
    /// Connect with the default configuration.
    pub fn new() -> Result<Self> {
        Self::connect(&Config::default())
    }

    /// Connect to the backend selected by `config`.
    ///
    /// Fails with [`Error::Unavailable`] if the backend cannot be reached.
    pub fn connect(config: &Config) -> Result<Self> {
        debug!("Connecting to {} registry", config.backend);
        let source: Box<dyn DeviceSource> = match config.backend {
            Backend::Sysfs => Box::new(SysfsRegistry::open(&config.sysfs_root)?),
            Backend::Usb => Box::new(UsbRegistry::open(config.timing)?),
        };
        Ok(Self { source })
    }

    pub fn with_source(source: impl DeviceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.source.backend()
    }

    /// Snapshot of the connected devices.
    pub fn devices(&self) -> Result<Devices<'_>> {
        let ids = self.source.list()?;
        debug!("{} registry lists {} devices", self.backend(), ids.len());
        Ok(Devices {
            source: self.source.as_ref(),
            ids,
        })
    }

    /// First device whose serial equals `serial`.
    pub fn find_by_serial(&self, serial: &str) -> Result<(DeviceId, Device)> {
        for id in self.source.list()? {
            let device = self.source.read(&id)?;
            if device.serial == serial {
                return Ok((id, device));
            }
        }
        Err(Error::DeviceNotFound(serial.to_string()))
    }

    pub fn set_translations(&self, id: &DeviceId, translations: &Translations) -> Result<()> {
        self.source.write_translations(id, &translations.to_bytes())
    }

    /// Restore the driver's default bindings.
    pub fn clear_translations(&self, id: &DeviceId) -> Result<()> {
        self.source.write_translations(id, &[0])
    }
}

/// Devices listed by one [`DeviceManager::devices`] call.
pub struct Devices<'a> {
    source: &'a dyn DeviceSource,
    ids: Vec<DeviceId>,
}

impl<'a> Devices<'a> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[DeviceId] {
        &self.ids
    }

    /// Read devices one at a time, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Device>> + '_ {
        self.ids.iter().map(move |id| self.source.read(id))
    }
}
