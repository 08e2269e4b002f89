//! Inventory report: device count plus a detail block per matching device

use crate::device::Device;
use crate::error::{Error, Result};
use crate::registry::DeviceManager;
use std::io::Write;
use tracing::debug;

/// Summary of one inventory run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Devices reported by the registry
    pub total: usize,
    /// Devices printed in detail
    pub matched: usize,
}

/// Write the inventory of `manager` to `out`.
///
/// Devices are read in registry order. A device that fails to read aborts
/// the report; blocks already written stay written.
pub fn write_inventory<W: Write + ?Sized>(
    manager: &DeviceManager,
    category: &str,
    out: &mut W,
) -> Result<Inventory> {
    let devices = manager.devices()?;
    let mut inventory = Inventory {
        total: devices.len(),
        matched: 0,
    };

    writeln!(out, "Found {} Razer devices\n", inventory.total).map_err(Error::Output)?;

    for device in devices.iter() {
        let device = device?;
        if !device.is_category(category) {
            debug!("Skipping {} ({:?})", device.name, device.device_type);
            continue;
        }
        write_device(out, &device).map_err(Error::Output)?;
        inventory.matched += 1;
    }

    out.flush().map_err(Error::Output)?;
    Ok(inventory)
}

fn write_device<W: Write + ?Sized>(out: &mut W, device: &Device) -> std::io::Result<()> {
    writeln!(out, "{}:", device.name)?;
    writeln!(out, "   type: {}", device.device_type.as_deref().unwrap_or("None"))?;
    writeln!(out, "   serial: {}", device.serial)?;
    writeln!(out, "   firmware version: {}", device.firmware_version)?;
    writeln!(out, "   driver version: {}", device.driver_version)?;
    writeln!(out, "{}", device.translations)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DeviceId, DeviceSource, MemoryRegistry};
    use crate::translations::{KeyTranslation, Translations};

    fn device(device_type: Option<&str>, name: &str, serial: &str) -> Device {
        Device {
            device_type: device_type.map(str::to_string),
            name: name.into(),
            serial: serial.into(),
            firmware_version: "v1.0".into(),
            driver_version: "2.0".into(),
            translations: Translations::default(),
        }
    }

    fn render(devices: Vec<Device>) -> (String, Inventory) {
        let manager = DeviceManager::with_source(MemoryRegistry::new(devices));
        let mut out = Vec::new();
        let inventory = write_inventory(&manager, "keypad", &mut out).unwrap();
        (String::from_utf8(out).unwrap(), inventory)
    }

    #[test]
    fn test_no_devices() {
        let (out, inventory) = render(vec![]);
        assert_eq!(out, "Found 0 Razer devices\n\n");
        assert_eq!(inventory, Inventory::default());
    }

    #[test]
    fn test_no_matching_devices() {
        let (out, inventory) = render(vec![
            device(Some("mouse"), "DeathAdder", "M1"),
            device(Some("keyboard"), "BlackWidow", "K1"),
            device(Some("headset"), "Kraken", "H1"),
        ]);
        assert_eq!(out, "Found 3 Razer devices\n\n");
        assert_eq!(inventory.total, 3);
        assert_eq!(inventory.matched, 0);
    }

    #[test]
    fn test_single_keypad_block() {
        let mut keypad = device(Some("keypad"), "Razer Tartarus Chroma", "PM1234");
        keypad.firmware_version = "v2.3".into();
        keypad.driver_version = "3.0.1".into();
        keypad.translations = Translations::new(vec![
            KeyTranslation::new(2, 30),
            KeyTranslation::new(3, 48),
        ]);

        let (out, inventory) = render(vec![keypad]);
        assert_eq!(
            out,
            "Found 1 Razer devices\n\n\
             Razer Tartarus Chroma:\n\
             \x20  type: keypad\n\
             \x20  serial: PM1234\n\
             \x20  firmware version: v2.3\n\
             \x20  driver version: 3.0.1\n\
             {2: 30, 3: 48}\n\
             \n"
        );
        assert_eq!(inventory.matched, 1);
    }

    #[test]
    fn test_idempotent() {
        let devices = vec![
            device(Some("keypad"), "Orbweaver", "O1"),
            device(Some("mouse"), "Naga", "N1"),
        ];
        let manager = DeviceManager::with_source(MemoryRegistry::new(devices));

        let mut first = Vec::new();
        let mut second = Vec::new();
        write_inventory(&manager, "keypad", &mut first).unwrap();
        write_inventory(&manager, "keypad", &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_category_never_matches() {
        let (out, inventory) = render(vec![device(None, "Mystery", "Z1")]);
        assert_eq!(out, "Found 1 Razer devices\n\n");
        assert_eq!(inventory.matched, 0);
    }

    #[test]
    fn test_keypad_and_mouse() {
        let (out, inventory) = render(vec![
            device(Some("keypad"), "BlackWidow", "XX001"),
            device(Some("mouse"), "Mamba", "XX002"),
        ]);
        assert!(out.starts_with("Found 2 Razer devices\n\n"));
        assert!(out.contains("BlackWidow:\n   type: keypad\n   serial: XX001\n"));
        assert!(out.contains("   firmware version: v1.0\n   driver version: 2.0\n{}\n\n"));
        assert!(!out.contains("Mamba"));
        assert_eq!(inventory.matched, 1);
    }

    #[test]
    fn test_other_category_filter() {
        let manager = DeviceManager::with_source(MemoryRegistry::new(vec![
            device(Some("keypad"), "Tartarus", "T1"),
            device(Some("mouse"), "Mamba", "M1"),
        ]));
        let mut out = Vec::new();
        write_inventory(&manager, "mouse", &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Mamba:\n"));
        assert!(!out.contains("Tartarus"));
    }

    /// Fails to read the device at `broken`.
    struct Flaky {
        inner: MemoryRegistry,
        broken: usize,
    }

    impl DeviceSource for Flaky {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        fn list(&self) -> Result<Vec<DeviceId>> {
            self.inner.list()
        }

        fn read(&self, id: &DeviceId) -> Result<Device> {
            if id.as_str() == self.broken.to_string() {
                return Err(Error::MissingAttribute {
                    device: id.to_string(),
                    attribute: "device_serial",
                });
            }
            self.inner.read(id)
        }
    }

    #[test]
    fn test_missing_attribute_keeps_partial_output() {
        let manager = DeviceManager::with_source(Flaky {
            inner: MemoryRegistry::new(vec![
                device(Some("keypad"), "First", "A"),
                device(Some("keypad"), "Second", "B"),
                device(Some("keypad"), "Third", "C"),
            ]),
            broken: 1,
        });

        let mut out = Vec::new();
        let err = write_inventory(&manager, "keypad", &mut out).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { .. }));

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Found 3 Razer devices\n\n"));
        assert!(out.contains("First:\n"));
        assert!(!out.contains("Second"));
        assert!(!out.contains("Third"));
    }
}
