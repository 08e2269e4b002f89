//! Crate-level error type

use crate::hid::HidError;
use crate::translations::TranslationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The device communication layer is not available at all.
    #[error("device registry unavailable: {0}")]
    Unavailable(String),

    #[error("device {device}: missing attribute `{attribute}`")]
    MissingAttribute {
        device: String,
        attribute: &'static str,
    },

    #[error("device {device}: malformed attribute `{attribute}`: {reason}")]
    MalformedAttribute {
        device: String,
        attribute: &'static str,
        reason: String,
    },

    #[error("no device with serial {0}")]
    DeviceNotFound(String),

    #[error("{backend} registry does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report: {0}")]
    Output(#[source] io::Error),

    #[error(transparent)]
    Hid(#[from] HidError),

    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Unavailable(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::Unavailable("no driver".into()).exit_code(), 2);
        assert_eq!(Error::DeviceNotFound("XX001".into()).exit_code(), 1);
    }

    #[test]
    fn test_messages() {
        let err = Error::MissingAttribute {
            device: "0003:1532:0208.0001".into(),
            attribute: "device_serial",
        };
        assert_eq!(
            err.to_string(),
            "device 0003:1532:0208.0001: missing attribute `device_serial`"
        );
    }
}
