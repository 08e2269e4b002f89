//! Inventory of connected Razer peripherals
//!
//! - Device registry over the Razer kernel driver (sysfs) or raw USB
//! - Razer HID report protocol and checksum
//! - Key translation tables in the driver's binary format
//! - Optional Python bindings (`python` feature)

pub mod catalog;
pub mod config;
pub mod crc;
pub mod device;
pub mod error;
pub mod hid;
pub mod inventory;
#[cfg(feature = "python")]
mod python;
pub mod registry;
pub mod translations;

pub use config::{Backend, Config};
pub use crc::fast_crc;
pub use device::Device;
pub use error::{Error, Result};
pub use inventory::{write_inventory, Inventory};
pub use registry::{DeviceId, DeviceManager, DeviceSource, Devices};
pub use translations::{KeyTranslation, TranslationTable, Translations};
