//! Device record as reported by a registry

use crate::translations::Translations;

/// Read-only description of one connected peripheral.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    /// Category label (`keyboard`, `keypad`, `mouse`, ...), `None` if unknown
    pub device_type: Option<String>,
    pub name: String,
    pub serial: String,
    pub firmware_version: String,
    pub driver_version: String,
    pub translations: Translations,
}

impl Device {
    pub fn is_category(&self, category: &str) -> bool {
        self.device_type.as_deref() == Some(category)
    }
}
