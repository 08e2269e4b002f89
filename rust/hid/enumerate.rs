//! HID device enumeration

use crate::hid::{DeviceInfo, Result};
use nusb::descriptors::ConfigurationDescriptor;
use nusb::MaybeFuture;
use tracing::debug;

/// USB class code for HID interfaces
const USB_CLASS_HID: u8 = 0x03;

/// Enumerate HID interfaces, optionally filtered by vendor/product ID.
///
/// Pass 0 for vendor_id or product_id to match all.
pub fn enumerate_devices(vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
    let mut results = Vec::new();

    for dev_info in nusb::list_devices().wait()? {
        if vendor_id != 0 && dev_info.vendor_id() != vendor_id {
            continue;
        }
        if product_id != 0 && dev_info.product_id() != product_id {
            continue;
        }

        // Open device to get interface info
        let device: nusb::Device = match dev_info.open().wait() {
            Ok(d) => d,
            Err(err) => {
                debug!(
                    "Skipping {:04x}:{:04x}, cannot open: {}",
                    dev_info.vendor_id(),
                    dev_info.product_id(),
                    err
                );
                continue;
            }
        };

        let config: ConfigurationDescriptor = match device.active_configuration() {
            Ok(c) => c,
            Err(_) => continue,
        };

        for iface in config.interfaces() {
            let iface_num = iface.interface_number();

            for alt in iface.alt_settings() {
                if alt.class() == USB_CLASS_HID {
                    results.push(DeviceInfo::from_nusb(&dev_info, iface_num));
                    break; // Only add once per interface
                }
            }
        }
    }

    // Sort by bus:addr:interface for consistent ordering
    results.sort_by(|a, b| {
        (a.bus_number, a.device_address, a.interface_number).cmp(&(
            b.bus_number,
            b.device_address,
            b.interface_number,
        ))
    });

    Ok(results)
}

/// Keep the lowest-numbered HID interface of each physical device.
///
/// Input must already be sorted by bus/address/interface.
pub fn first_interface_per_device(interfaces: Vec<DeviceInfo>) -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = Vec::new();
    for info in interfaces {
        let seen = devices.last().is_some_and(|d| {
            d.bus_number == info.bus_number && d.device_address == info.device_address
        });
        if !seen {
            devices.push(info);
        }
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(bus: u8, addr: u8, num: u8) -> DeviceInfo {
        DeviceInfo {
            vendor_id: 0x1532,
            product_id: 0x0203,
            interface_number: num,
            product_string: String::new(),
            bus_number: bus,
            device_address: addr,
        }
    }

    #[test]
    fn test_first_interface_per_device() {
        let all = vec![
            iface(1, 3, 0),
            iface(1, 3, 1),
            iface(1, 3, 2),
            iface(1, 7, 0),
            iface(2, 3, 1),
        ];
        let picked = first_interface_per_device(all);
        let paths: Vec<String> = picked.iter().map(DeviceInfo::path).collect();
        assert_eq!(paths, ["001:003:00", "001:007:00", "002:003:01"]);
    }

    #[test]
    #[ignore] // requires USB access
    fn test_enumerate_returns_vec() {
        let result = enumerate_devices(0, 0);
        assert!(result.is_ok());
    }

    #[test]
    #[ignore] // requires USB access
    fn test_enumerate_with_invalid_filter() {
        let result = enumerate_devices(0xFFFF, 0xFFFF).unwrap();
        assert!(result.is_empty());
    }
}
