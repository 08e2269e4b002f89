//! In-process registry over a fixed device list

use crate::device::Device;
use crate::error::{Error, Result};
use crate::registry::{DeviceId, DeviceSource};
use crate::translations::TranslationTable;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Registry backed by a fixed list of devices.
///
/// Device ids are list indices. Key translations live in a
/// [`TranslationTable`] seeded from the devices' own bindings, so writes
/// follow the driver's rules.
pub struct MemoryRegistry {
    devices: Vec<Device>,
    translations: Mutex<TranslationTable>,
}

impl MemoryRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        let mut table = TranslationTable::new();
        for (index, device) in (0u16..).zip(&devices) {
            if !device.translations.is_empty() {
                table.insert(index, device.translations.clone());
            }
        }
        Self {
            devices,
            translations: Mutex::new(table),
        }
    }

    fn index(&self, id: &DeviceId) -> Result<u16> {
        id.as_str()
            .parse::<u16>()
            .ok()
            .filter(|&i| (i as usize) < self.devices.len())
            .ok_or_else(|| Error::DeviceNotFound(id.to_string()))
    }

    fn table(&self) -> MutexGuard<'_, TranslationTable> {
        self.translations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceSource for MemoryRegistry {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn list(&self) -> Result<Vec<DeviceId>> {
        Ok((0..self.devices.len())
            .map(|i| DeviceId::new(i.to_string()))
            .collect())
    }

    fn read(&self, id: &DeviceId) -> Result<Device> {
        let index = self.index(id)?;
        let mut device = self.devices[index as usize].clone();
        device.translations = self.table().get(index).cloned().unwrap_or_default();
        Ok(device)
    }

    fn write_translations(&self, id: &DeviceId, buf: &[u8]) -> Result<()> {
        let index = self.index(id)?;
        let outcome = self.table().set(index, buf)?;
        debug!("{}: translations {:?}", id, outcome);
        Ok(())
    }
}
