//! HID device handle for feature report communication

use crate::hid::{DeviceInfo, FeatureTransport, HidError, Result};
use nusb::transfer::{ControlIn, ControlOut, ControlType, Recipient};
use nusb::MaybeFuture;
use std::time::Duration;
use tracing::debug;

// HID class requests
const HID_GET_REPORT: u8 = 0x01;
const HID_SET_REPORT: u8 = 0x09;

// Report types (in high byte of wValue)
const HID_REPORT_TYPE_FEATURE: u16 = 0x03;

// Default timeout for USB transfers
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

fn matches_info(dev_info: &nusb::DeviceInfo, info: &DeviceInfo) -> bool {
    #[cfg(target_os = "linux")]
    {
        dev_info.busnum() == info.bus_number && dev_info.device_address() == info.device_address
    }
    #[cfg(not(target_os = "linux"))]
    {
        dev_info.device_address() == info.device_address
            && dev_info.vendor_id() == info.vendor_id
            && dev_info.product_id() == info.product_id
    }
}

/// wValue for a feature report: (report_type << 8) | report_id
fn feature_report_value(report_id: u8) -> u16 {
    (HID_REPORT_TYPE_FEATURE << 8) | (report_id as u16)
}

/// Claimed HID interface of a Razer device.
///
/// The interface is released when the handle is dropped.
pub struct HidDevice {
    interface: nusb::Interface,
    info: DeviceInfo,
}

impl HidDevice {
    /// Open and claim the interface described by `info`.
    pub fn open(info: DeviceInfo) -> Result<Self> {
        let dev_info = nusb::list_devices()
            .wait()?
            .find(|d| matches_info(d, &info))
            .ok_or_else(|| HidError::DeviceNotFound(info.path()))?;

        let device = dev_info.open().wait()?;
        // On Linux, detach kernel driver before claiming (e.g., hid-generic)
        #[cfg(target_os = "linux")]
        let interface = device
            .detach_and_claim_interface(info.interface_number)
            .wait()?;
        #[cfg(not(target_os = "linux"))]
        let interface = device.claim_interface(info.interface_number).wait()?;

        debug!("Claimed interface {}", info.path());
        Ok(Self { interface, info })
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Send a feature report (SET_REPORT, bmRequestType 0x21).
    ///
    /// Returns the number of bytes sent.
    pub fn send_report(&self, data: &[u8], report_id: u8) -> Result<usize> {
        self.interface
            .control_out(
                ControlOut {
                    control_type: ControlType::Class,
                    recipient: Recipient::Interface,
                    request: HID_SET_REPORT,
                    value: feature_report_value(report_id),
                    index: self.interface.interface_number() as u16,
                    data,
                },
                DEFAULT_TIMEOUT,
            )
            .wait()?;

        Ok(data.len())
    }

    /// Read a feature report (GET_REPORT, bmRequestType 0xA1).
    pub fn get_report(&self, report_id: u8, size: usize) -> Result<Vec<u8>> {
        let length = u16::try_from(size)
            .map_err(|_| HidError::ProtocolError(format!("report length {size} too large")))?;

        let data = self
            .interface
            .control_in(
                ControlIn {
                    control_type: ControlType::Class,
                    recipient: Recipient::Interface,
                    request: HID_GET_REPORT,
                    value: feature_report_value(report_id),
                    index: self.interface.interface_number() as u16,
                    length,
                },
                DEFAULT_TIMEOUT,
            )
            .wait()?;

        Ok(data)
    }
}

impl FeatureTransport for HidDevice {
    fn send_report(&self, data: &[u8], report_id: u8) -> Result<usize> {
        HidDevice::send_report(self, data, report_id)
    }

    fn get_report(&self, report_id: u8, size: usize) -> Result<Vec<u8>> {
        HidDevice::get_report(self, report_id, size)
    }
}
