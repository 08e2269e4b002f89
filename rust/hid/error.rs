//! Error types for HID operations

use crate::hid::report::Status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("USB error: {0}")]
    UsbError(#[from] nusb::Error),

    #[error("Transfer error: {0}")]
    TransferError(#[from] nusb::transfer::TransferError),

    #[error("Invalid report size: expected {expected}, got {actual}")]
    InvalidReportSize { expected: usize, actual: usize },

    /// The device answered with a status other than Ok
    #[error("Command {class:02x}:{id:02x} answered {status:?}")]
    CommandFailed { class: u8, id: u8, status: Status },

    #[error("Command {class:02x}:{id:02x} still {status:?} after {attempts} attempts")]
    RetriesExhausted {
        class: u8,
        id: u8,
        status: Status,
        attempts: u32,
    },

    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

pub type Result<T> = std::result::Result<T, HidError>;
