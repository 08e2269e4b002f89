//! Checksum for Razer USB HID reports
//!
//! XOR of bytes 2..=87 of the report buffer, stored at byte 88.
//! The transaction id (byte 1) and status (byte 0) are not covered.
//!
//! Optimizations:
//! - Process 8 bytes at a time using u64 XOR
//! - Final horizontal XOR to reduce to u8

use crate::hid::REPORT_SIZE;

/// Offset of the first byte covered by the checksum.
pub const CRC_START: usize = 2;
/// Offset of the checksum byte itself (first byte not covered).
pub const CRC_OFFSET: usize = 88;

/// XOR checksum of a Razer report buffer.
#[inline]
pub fn fast_crc(buf: &[u8; REPORT_SIZE]) -> u8 {
    // 86 bytes: 10 u64s + 6 remaining bytes
    let slice = &buf[CRC_START..CRC_OFFSET];

    let mut acc: u64 = 0;
    let chunks = slice.chunks_exact(8);
    let remainder = chunks.remainder();

    for chunk in chunks {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        acc ^= u64::from_ne_bytes(word);
    }

    // Horizontal XOR: fold u64 down to u8
    let mut result = 0u8;
    for shift in (0..64).step_by(8) {
        result ^= ((acc >> shift) & 0xFF) as u8;
    }

    for &byte in remainder {
        result ^= byte;
    }

    result
}
