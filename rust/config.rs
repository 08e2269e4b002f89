//! Runtime configuration

use crate::catalog;
use crate::hid::ReportTiming;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the kernel driver binds HID devices
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/bus/hid/drivers";

/// Category shown in detail by the inventory report
pub const DEFAULT_CATEGORY: &str = catalog::KEYPAD;

/// Registry backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Attributes published by the Razer kernel driver
    #[default]
    Sysfs,
    /// Direct USB feature reports (detaches kernel drivers while querying)
    Usb,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sysfs => "sysfs",
            Backend::Usb => "usb",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sysfs" => Ok(Backend::Sysfs),
            "usb" => Ok(Backend::Usb),
            other => Err(format!("unknown backend `{other}` (expected sysfs or usb)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub sysfs_root: PathBuf,
    pub category: String,
    pub timing: ReportTiming,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            category: DEFAULT_CATEGORY.to_string(),
            timing: ReportTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_keypad_inventory() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Sysfs);
        assert_eq!(config.category, "keypad");
        assert_eq!(config.sysfs_root, PathBuf::from("/sys/bus/hid/drivers"));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("USB".parse::<Backend>(), Ok(Backend::Usb));
        assert_eq!("sysfs".parse::<Backend>(), Ok(Backend::Sysfs));
        assert!("dbus".parse::<Backend>().is_err());
    }
}
