//! Registry backed by the Razer kernel driver's sysfs attributes
//!
//! Each driver (`razerkbd`, `razermouse`, ...) binds devices under
//! `<root>/<driver>/<BUS>:<VID>:<PID>.<N>/` and publishes one file per
//! attribute.

use crate::catalog;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::registry::{DeviceId, DeviceSource};
use crate::translations::Translations;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DRIVER_PREFIX: &str = "razer";

const ATTR_NAME: &str = "device_type";
const ATTR_SERIAL: &str = "device_serial";
const ATTR_FIRMWARE: &str = "firmware_version";
const ATTR_DRIVER_VERSION: &str = "version";
const ATTR_TRANSLATIONS: &str = "button_translations";

/// Bus, vendor and product parsed from a HID device directory name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HidAddress {
    pub bus: u16,
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Parse `0003:1532:0208.0001` style names.
pub fn parse_hid_name(name: &str) -> Option<HidAddress> {
    let (ids, _instance) = name.split_once('.')?;
    let mut parts = ids.split(':');
    let bus = u16::from_str_radix(parts.next()?, 16).ok()?;
    let vendor_id = u16::from_str_radix(parts.next()?, 16).ok()?;
    let product_id = u16::from_str_radix(parts.next()?, 16).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(HidAddress {
        bus,
        vendor_id,
        product_id,
    })
}

pub struct SysfsRegistry {
    root: PathBuf,
}

impl SysfsRegistry {
    /// Open the registry rooted at `root` (normally `/sys/bus/hid/drivers`).
    ///
    /// Unavailable when the root is missing or no Razer driver is loaded.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let registry = Self { root: root.into() };
        let drivers = registry.drivers()?;
        if drivers.is_empty() {
            return Err(Error::Unavailable(format!(
                "no Razer kernel driver loaded under {}",
                registry.root.display()
            )));
        }
        debug!("Razer drivers: {:?}", drivers);
        Ok(registry)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the loaded Razer driver directories, sorted.
    fn drivers(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|err| {
            Error::Unavailable(format!("cannot read {}: {}", self.root.display(), err))
        })?;

        let mut drivers: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(DRIVER_PREFIX))
            .collect();
        drivers.sort();
        Ok(drivers)
    }

    fn device_dir(&self, id: &DeviceId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

/// Split `driver/0003:1532:0208.0001` into driver and address.
fn split_id(id: &DeviceId) -> Option<(&str, HidAddress)> {
    let (driver, name) = id.as_str().split_once('/')?;
    Some((driver, parse_hid_name(name)?))
}

fn read_attr(dir: &Path, attribute: &'static str, id: &DeviceId) -> Result<Option<Vec<u8>>> {
    let path = dir.join(attribute);
    match fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{}: no {}", id, attribute);
            Ok(None)
        }
        Err(source) => Err(Error::Io { path, source }),
    }
}

fn read_text(dir: &Path, attribute: &'static str, id: &DeviceId) -> Result<String> {
    let bytes = read_attr(dir, attribute, id)?.ok_or_else(|| Error::MissingAttribute {
        device: id.to_string(),
        attribute,
    })?;
    let text = String::from_utf8(bytes).map_err(|err| Error::MalformedAttribute {
        device: id.to_string(),
        attribute,
        reason: err.to_string(),
    })?;
    Ok(text
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string())
}

impl DeviceSource for SysfsRegistry {
    fn backend(&self) -> &'static str {
        "sysfs"
    }

    fn list(&self) -> Result<Vec<DeviceId>> {
        let mut ids = Vec::new();
        for driver in self.drivers()? {
            let driver_dir = self.root.join(&driver);
            let entries = fs::read_dir(&driver_dir).map_err(|source| Error::Io {
                path: driver_dir.clone(),
                source,
            })?;

            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let Some(address) = parse_hid_name(&name) else {
                    continue; // bind, unbind, uevent, ...
                };
                if address.vendor_id != catalog::RAZER_VENDOR_ID {
                    warn!("{} bound to {} is not a Razer device", name, driver);
                    continue;
                }
                // Each USB interface is bound separately; attributes live on one
                if !entry.path().join(ATTR_NAME).exists() {
                    debug!("{}/{} publishes no attributes, skipping", driver, name);
                    continue;
                }
                ids.push(DeviceId::new(format!("{driver}/{name}")));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read(&self, id: &DeviceId) -> Result<Device> {
        let (driver, address) =
            split_id(id).ok_or_else(|| Error::DeviceNotFound(id.to_string()))?;
        let dir = self.device_dir(id);
        if !dir.is_dir() {
            return Err(Error::DeviceNotFound(id.to_string()));
        }

        let name = read_text(&dir, ATTR_NAME, id)?;
        let serial = read_text(&dir, ATTR_SERIAL, id)?;
        let firmware_version = read_text(&dir, ATTR_FIRMWARE, id)?;
        let driver_version = read_text(&dir, ATTR_DRIVER_VERSION, id)?;

        // Only devices with programmable keys publish translations
        let translations = match read_attr(&dir, ATTR_TRANSLATIONS, id)? {
            Some(bytes) => Translations::from_bytes(&bytes).map_err(|err| {
                Error::MalformedAttribute {
                    device: id.to_string(),
                    attribute: ATTR_TRANSLATIONS,
                    reason: err.to_string(),
                }
            })?,
            None => Translations::default(),
        };

        let device_type = catalog::category(address.product_id, Some(driver));

        Ok(Device {
            device_type: device_type.map(str::to_string),
            name,
            serial,
            firmware_version,
            driver_version,
            translations,
        })
    }

    fn write_translations(&self, id: &DeviceId, buf: &[u8]) -> Result<()> {
        let path = self.device_dir(id).join(ATTR_TRANSLATIONS);
        if !path.exists() {
            return Err(Error::MissingAttribute {
                device: id.to_string(),
                attribute: ATTR_TRANSLATIONS,
            });
        }
        fs::write(&path, buf).map_err(|source| Error::Io { path, source })?;
        debug!("Wrote {} bytes of translations to {}", buf.len(), id);
        Ok(())
    }
}
