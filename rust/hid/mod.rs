//! Razer HID access via nusb
//!
//! Blocking feature-report transport and the 90-byte Razer report format.

pub mod device;
pub mod device_info;
pub mod enumerate;
pub mod error;
pub mod report;

pub use device::HidDevice;
pub use device_info::DeviceInfo;
pub use enumerate::{enumerate_devices, first_interface_per_device};
pub use error::{HidError, Result};
pub use report::{
    describe_report, FeatureTransport, RazerReport, ReportTiming, Response, Status, REPORT_SIZE,
};
