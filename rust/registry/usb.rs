//! Registry that talks to Razer devices directly over USB
//!
//! Serial and firmware version are queried with Razer feature reports.
//! Claiming an interface detaches the kernel driver from it, so this backend
//! is meant for machines without the Razer kernel driver.

use crate::catalog;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::hid::Result as HidResult;
use crate::hid::{
    enumerate_devices, first_interface_per_device, DeviceInfo, FeatureTransport, HidDevice,
    HidError, RazerReport, ReportTiming, Status,
};
use crate::registry::{DeviceId, DeviceSource};
use crate::translations::Translations;
use nusb::MaybeFuture;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

// Command class 0x00: device information
const CLASS_INFO: u8 = 0x00;
const CMD_GET_FIRMWARE: u8 = 0x81;
const CMD_GET_SERIAL: u8 = 0x82;
const SERIAL_SIZE: u8 = 0x16;

fn query<T: FeatureTransport + ?Sized>(
    device: &T,
    timing: &ReportTiming,
    command_id: u8,
    data_size: u8,
) -> HidResult<Vec<u8>> {
    let report = RazerReport::new(CLASS_INFO, command_id, data_size);
    let response = report.run(device, timing)?;
    if response.status != Status::Ok {
        return Err(HidError::CommandFailed {
            class: CLASS_INFO,
            id: command_id,
            status: response.status,
        });
    }
    Ok(response.data)
}

/// Firmware version as `v{major}.{minor}`.
pub fn query_firmware<T: FeatureTransport + ?Sized>(
    device: &T,
    timing: &ReportTiming,
) -> HidResult<String> {
    let data = query(device, timing, CMD_GET_FIRMWARE, 0x02)?;
    match data.as_slice() {
        [major, minor, ..] => Ok(format!("v{major}.{minor}")),
        _ => Err(HidError::ProtocolError(format!(
            "firmware response too short ({} bytes)",
            data.len()
        ))),
    }
}

/// Serial number, NUL padding removed.
pub fn query_serial<T: FeatureTransport + ?Sized>(
    device: &T,
    timing: &ReportTiming,
) -> HidResult<String> {
    let data = query(device, timing, CMD_GET_SERIAL, SERIAL_SIZE)?;
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    Ok(String::from_utf8_lossy(&data[..end]).trim().to_string())
}

pub struct UsbRegistry {
    timing: ReportTiming,
    listed: Mutex<BTreeMap<DeviceId, DeviceInfo>>,
}

impl UsbRegistry {
    /// Unavailable when USB devices cannot be listed at all.
    pub fn open(timing: ReportTiming) -> Result<Self> {
        nusb::list_devices()
            .wait()
            .map_err(|err| Error::Unavailable(format!("cannot list USB devices: {err}")))?;
        Ok(Self {
            timing,
            listed: Mutex::new(BTreeMap::new()),
        })
    }

    fn info(&self, id: &DeviceId) -> Result<DeviceInfo> {
        let cached = self
            .listed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned();
        match cached {
            Some(info) => Ok(info),
            None => {
                // Not from our last listing; re-enumerate once
                self.list()?;
                self.listed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Error::DeviceNotFound(id.to_string()))
            }
        }
    }
}

impl DeviceSource for UsbRegistry {
    fn backend(&self) -> &'static str {
        "usb"
    }

    fn list(&self) -> Result<Vec<DeviceId>> {
        let interfaces = enumerate_devices(catalog::RAZER_VENDOR_ID, 0)?;
        let devices = first_interface_per_device(interfaces);

        let mut listed = self.listed.lock().unwrap_or_else(PoisonError::into_inner);
        listed.clear();
        let mut ids = Vec::with_capacity(devices.len());
        for info in devices {
            let id = DeviceId::new(info.path());
            listed.insert(id.clone(), info);
            ids.push(id);
        }
        Ok(ids)
    }

    fn read(&self, id: &DeviceId) -> Result<Device> {
        let info = self.info(id)?;
        let product = catalog::lookup(info.product_id);
        let name = match product {
            Some(p) => p.name.to_string(),
            None if !info.product_string.is_empty() => info.product_string.clone(),
            None => format!("Razer {:04x}", info.product_id),
        };

        let device = HidDevice::open(info)?;
        debug!("Querying {} ({})", name, device.info().path());
        let serial = query_serial(&device, &self.timing)?;
        let firmware_version = query_firmware(&device, &self.timing)?;

        Ok(Device {
            device_type: product.map(|p| p.category.to_string()),
            name,
            serial,
            firmware_version,
            driver_version: env!("CARGO_PKG_VERSION").to_string(),
            translations: Translations::default(),
        })
    }
}
