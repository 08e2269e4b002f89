//! Python bindings
//!
//! ```python
//! from razer_inventory import DeviceManager
//!
//! for device in DeviceManager().devices:
//!     print(device.name, device.type, device.translations)
//! ```

use crate::config::{Backend, Config};
use crate::device::Device;
use crate::error::Error;
use crate::hid::HidError;
use crate::registry::DeviceManager;
use pyo3::exceptions::{PyConnectionError, PyOSError, PyValueError};
use pyo3::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

impl From<HidError> for PyErr {
    fn from(err: HidError) -> PyErr {
        PyOSError::new_err(err.to_string())
    }
}

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Unavailable(_) => PyConnectionError::new_err(err.to_string()),
            Error::Hid(hid) => hid.into(),
            other => PyOSError::new_err(other.to_string()),
        }
    }
}

/// One connected device.
#[pyclass(name = "Device", module = "razer_inventory", frozen)]
pub struct PyDevice {
    #[pyo3(get, name = "type")]
    device_type: Option<String>,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    serial: String,
    #[pyo3(get)]
    firmware_version: String,
    #[pyo3(get)]
    driver_version: String,
    #[pyo3(get)]
    translations: BTreeMap<u16, u16>,
}

impl From<Device> for PyDevice {
    fn from(device: Device) -> Self {
        Self {
            translations: device.translations.to_map(),
            device_type: device.device_type,
            name: device.name,
            serial: device.serial,
            firmware_version: device.firmware_version,
            driver_version: device.driver_version,
        }
    }
}

#[pymethods]
impl PyDevice {
    fn __repr__(&self) -> String {
        format!(
            "Device(name={:?}, type={:?}, serial={:?})",
            self.name, self.device_type, self.serial
        )
    }
}

/// Handle to the device registry.
#[pyclass(name = "DeviceManager", module = "razer_inventory")]
pub struct PyDeviceManager {
    inner: DeviceManager,
}

#[pymethods]
impl PyDeviceManager {
    #[new]
    #[pyo3(signature = (backend=None, sysfs_root=None))]
    fn new(backend: Option<&str>, sysfs_root: Option<PathBuf>) -> PyResult<Self> {
        let mut config = Config::default();
        if let Some(backend) = backend {
            config.backend = backend.parse::<Backend>().map_err(PyValueError::new_err)?;
        }
        if let Some(root) = sysfs_root {
            config.sysfs_root = root;
        }
        Ok(Self {
            inner: DeviceManager::connect(&config)?,
        })
    }

    /// Connected devices, read fresh on every access.
    #[getter]
    fn devices(&self) -> PyResult<Vec<PyDevice>> {
        let devices = self.inner.devices()?;
        let mut result = Vec::with_capacity(devices.len());
        for device in devices.iter() {
            result.push(PyDevice::from(device?));
        }
        Ok(result)
    }

    #[getter]
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}

#[pymodule(name = "razer_inventory")]
fn _razer_inventory(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDeviceManager>()?;
    m.add_class::<PyDevice>()?;
    m.add("RAZER_VENDOR_ID", crate::catalog::RAZER_VENDOR_ID)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
