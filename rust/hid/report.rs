//! Razer HID report protocol implementation
//!
//! The report structure is 90 bytes:
//!   0      - Status (0x00 for requests)
//!   1      - Transaction ID
//!   2-3    - Remaining packets (u16 LE)
//!   4      - Protocol type
//!   5      - Data size
//!   6      - Command class
//!   7      - Command ID
//!   8-87   - Argument data (80 bytes)
//!   88     - CRC (XOR of bytes 2-87)
//!   89     - Reserved (0x00)

use crate::crc::{fast_crc, CRC_OFFSET};
use crate::hid::{HidError, Result};
use std::fmt::Write as _;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const REPORT_SIZE: usize = 90;
const DATA_SIZE: usize = 80;

const DATA_OFFSET: usize = 8;

/// Transaction id used by freshly built reports
pub const DEFAULT_TRANSACTION_ID: u8 = 0xFF;

/// Status codes returned by Razer devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    New = 0x00,
    Busy = 0x01,
    Ok = 0x02,
    Fail = 0x03,
    Timeout = 0x04,
    Unsupported = 0x05,
    Unknown = 0xFF,
}

impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            0x00 => Status::New,
            0x01 => Status::Busy,
            0x02 => Status::Ok,
            0x03 => Status::Fail,
            0x04 => Status::Timeout,
            0x05 => Status::Unsupported,
            _ => Status::Unknown,
        }
    }
}

/// Feature report I/O used by [`RazerReport::run`].
pub trait FeatureTransport {
    fn send_report(&self, data: &[u8], report_id: u8) -> Result<usize>;
    fn get_report(&self, report_id: u8, size: usize) -> Result<Vec<u8>>;
}

/// Delays and retry budget for one report exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportTiming {
    /// Wait before sending and again before reading the response
    pub delay: Duration,
    /// Extra attempts when the device answers busy or timeout
    pub retries: u32,
    /// Wait between attempts
    pub busy_backoff: Duration,
}

impl Default for ReportTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(7),
            retries: 3,
            busy_backoff: Duration::from_millis(100),
        }
    }
}

/// Status and argument bytes of a device response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub data: Vec<u8>,
}

/// Razer HID report for device communication.
///
/// Queries carry no arguments: the declared data size tells the device how
/// many argument bytes to answer with.
#[derive(Clone, Debug)]
pub struct RazerReport {
    buf: [u8; REPORT_SIZE],
}

impl RazerReport {
    pub fn new(command_class: u8, command_id: u8, data_size: u8) -> Self {
        let mut buf = [0u8; REPORT_SIZE];
        buf[1] = DEFAULT_TRANSACTION_ID;
        buf[5] = data_size;
        buf[6] = command_class;
        buf[7] = command_id;
        Self { buf }
    }

    pub fn command_class(&self) -> u8 {
        self.buf[6]
    }

    pub fn command_id(&self) -> u8 {
        self.buf[7]
    }

    /// Wire bytes with the checksum filled in.
    pub fn pack(&self) -> [u8; REPORT_SIZE] {
        let mut buf = self.buf;
        buf[CRC_OFFSET] = fast_crc(&buf);
        buf
    }

    /// Split a response buffer into status and argument data.
    pub fn parse_response(response: &[u8]) -> Result<Response> {
        if response.len() != REPORT_SIZE {
            return Err(HidError::InvalidReportSize {
                expected: REPORT_SIZE,
                actual: response.len(),
            });
        }

        let status = Status::from(response[0]);
        let data_size = (response[5] as usize).min(DATA_SIZE);
        let data = response[DATA_OFFSET..DATA_OFFSET + data_size].to_vec();

        Ok(Response { status, data })
    }

    fn failed(&self, status: Status) -> HidError {
        HidError::CommandFailed {
            class: self.command_class(),
            id: self.command_id(),
            status,
        }
    }

    /// Send the report and read the response (blocking).
    ///
    /// Busy and timeout answers are retried up to `timing.retries` times.
    pub fn run<T: FeatureTransport + ?Sized>(
        &self,
        device: &T,
        timing: &ReportTiming,
    ) -> Result<Response> {
        let data = self.pack();
        let mut attempts = timing.retries;

        loop {
            sleep_if_nonzero(timing.delay);
            device.send_report(&data, 0)?;

            sleep_if_nonzero(timing.delay);
            let raw = device.get_report(0, REPORT_SIZE)?;
            let response = Self::parse_response(&raw)?;

            match response.status {
                Status::Ok | Status::Unsupported => return Ok(response),
                Status::Fail => {
                    warn!("{}", describe_report(&raw, "Command failed"));
                    return Err(self.failed(response.status));
                }
                Status::Busy | Status::Timeout => {
                    if attempts == 0 {
                        warn!("{}", describe_report(&raw, "Retries exhausted"));
                        return Err(HidError::RetriesExhausted {
                            class: self.command_class(),
                            id: self.command_id(),
                            status: response.status,
                            attempts: timing.retries + 1,
                        });
                    }
                    debug!("Device answered {:?}, retrying", response.status);
                    attempts -= 1;
                    sleep_if_nonzero(timing.busy_backoff);
                }
                status => {
                    warn!("{}", describe_report(&raw, "Unexpected status"));
                    return Err(self.failed(status));
                }
            }
        }
    }
}

fn sleep_if_nonzero(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// One-line dump of a raw report, in the kernel driver's log format.
pub fn describe_report(raw: &[u8], message: &str) -> String {
    let byte = |i: usize| raw.get(i).copied().unwrap_or(0);

    let mut params = String::with_capacity(32);
    for i in DATA_OFFSET..DATA_OFFSET + 16 {
        let _ = write!(params, "{:02x}", byte(i));
    }

    format!(
        "{message}. Start Marker: {:02x} id: {:02x} Num Params: {:02x} Reserved: {:02x} \
         Command: {:02x} Params: {params} .",
        byte(0),
        byte(1),
        byte(5),
        byte(6),
        byte(7),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records what was sent.
    struct Scripted {
        responses: RefCell<VecDeque<Vec<u8>>>,
        sent: RefCell<Vec<Vec<u8>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Vec<u8>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl FeatureTransport for Scripted {
        fn send_report(&self, data: &[u8], _report_id: u8) -> Result<usize> {
            self.sent.borrow_mut().push(data.to_vec());
            Ok(data.len())
        }

        fn get_report(&self, _report_id: u8, _size: usize) -> Result<Vec<u8>> {
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| HidError::ProtocolError("no response scripted".into()))
        }
    }

    fn response(status: Status, args: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; REPORT_SIZE];
        buf[0] = status as u8;
        buf[5] = args.len() as u8;
        buf[DATA_OFFSET..DATA_OFFSET + args.len()].copy_from_slice(args);
        buf
    }

    fn instant() -> ReportTiming {
        ReportTiming {
            delay: Duration::ZERO,
            retries: 2,
            busy_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_report_creation() {
        let report = RazerReport::new(0x00, 0x81, 2);
        assert_eq!(report.command_class(), 0x00);
        assert_eq!(report.command_id(), 0x81);
    }

    #[test]
    fn test_report_pack() {
        let data = RazerReport::new(0x00, 0x82, 0x16).pack();
        assert_eq!(data.len(), 90);
        assert_eq!(data[0], 0x00);
        assert_eq!(data[1], DEFAULT_TRANSACTION_ID);
        assert_eq!(data[5], 0x16);
        assert_eq!(data[6], 0x00);
        assert_eq!(data[7], 0x82);
        assert_eq!(data[88], 0x16 ^ 0x82);
        assert_eq!(data[89], 0);
    }

    #[test]
    fn test_status_from_u8() {
        assert_eq!(Status::from(0x00), Status::New);
        assert_eq!(Status::from(0x01), Status::Busy);
        assert_eq!(Status::from(0x02), Status::Ok);
        assert_eq!(Status::from(0x03), Status::Fail);
        assert_eq!(Status::from(0x04), Status::Timeout);
        assert_eq!(Status::from(0x05), Status::Unsupported);
        assert_eq!(Status::from(0x42), Status::Unknown);
    }

    #[test]
    fn test_parse_response_rejects_short_buffer() {
        let err = RazerReport::parse_response(&[0u8; 64]).unwrap_err();
        assert!(matches!(
            err,
            HidError::InvalidReportSize {
                expected: 90,
                actual: 64
            }
        ));
    }

    #[test]
    fn test_parse_response_clamps_data_size() {
        let mut raw = response(Status::Ok, &[]);
        raw[5] = 0xFF;
        let resp = RazerReport::parse_response(&raw).unwrap();
        assert_eq!(resp.data.len(), DATA_SIZE);
    }

    #[test]
    fn test_run_returns_data() {
        let device = Scripted::new(vec![response(Status::Ok, &[1, 4])]);
        let report = RazerReport::new(0x00, 0x81, 2);
        let resp = report.run(&device, &instant()).unwrap();
        assert_eq!(resp.status, Status::Ok);
        assert_eq!(resp.data, vec![1, 4]);
        assert_eq!(device.sent.borrow().len(), 1);
    }

    #[test]
    fn test_run_retries_busy() {
        let device = Scripted::new(vec![
            response(Status::Busy, &[]),
            response(Status::Busy, &[]),
            response(Status::Ok, &[9]),
        ]);
        let report = RazerReport::new(0x00, 0x81, 2);
        let resp = report.run(&device, &instant()).unwrap();
        assert_eq!(resp.data, vec![9]);
        assert_eq!(device.sent.borrow().len(), 3);
    }

    #[test]
    fn test_run_gives_up_after_retries() {
        let device = Scripted::new(vec![
            response(Status::Timeout, &[]),
            response(Status::Timeout, &[]),
            response(Status::Timeout, &[]),
        ]);
        let report = RazerReport::new(0x00, 0x81, 2);
        assert!(matches!(
            report.run(&device, &instant()),
            Err(HidError::RetriesExhausted {
                status: Status::Timeout,
                attempts: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_run_fail_status_is_error() {
        let device = Scripted::new(vec![response(Status::Fail, &[])]);
        let report = RazerReport::new(0x00, 0x82, 0x16);
        let err = report.run(&device, &instant()).unwrap_err();
        assert_eq!(err.to_string(), "Command 00:82 answered Fail");
    }

    #[test]
    fn test_describe_report() {
        let mut raw = response(Status::Fail, &[0xDE, 0xAD]);
        raw[1] = 0xFF;
        raw[6] = 0x00;
        raw[7] = 0x82;
        let line = describe_report(&raw, "Invalid Report Type");
        assert_eq!(
            line,
            "Invalid Report Type. Start Marker: 03 id: ff Num Params: 02 Reserved: 00 \
             Command: 82 Params: dead0000000000000000000000000000 ."
        );
    }
}
