//! HID device information from enumeration

/// One HID interface of a USB device, as found during enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface_number: u8,
    pub product_string: String,

    // Device identifiers for reopening
    pub bus_number: u8,
    pub device_address: u8,
}

impl DeviceInfo {
    /// Unique path identifier for this interface (bus:addr:interface)
    pub fn path(&self) -> String {
        format!(
            "{:03}:{:03}:{:02}",
            self.bus_number, self.device_address, self.interface_number
        )
    }

    #[cfg(target_os = "linux")]
    pub fn from_nusb(dev: &nusb::DeviceInfo, interface: u8) -> Self {
        Self {
            vendor_id: dev.vendor_id(),
            product_id: dev.product_id(),
            interface_number: interface,
            product_string: dev.product_string().unwrap_or_default().to_string(),
            bus_number: dev.busnum(),
            device_address: dev.device_address(),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn from_nusb(dev: &nusb::DeviceInfo, interface: u8) -> Self {
        Self {
            vendor_id: dev.vendor_id(),
            product_id: dev.product_id(),
            interface_number: interface,
            product_string: dev.product_string().unwrap_or_default().to_string(),
            bus_number: 0, // Not available on non-Linux
            device_address: dev.device_address(),
        }
    }
}
