//! Key translations (button remapping) as exposed by the Razer kernel driver
//!
//! The driver's `button_translations` attribute carries a flat byte buffer of
//! bindings, each a pair of little-endian u16 key codes: the key to remap and
//! its destination. Writing a single byte restores the default bindings;
//! reading a device without bindings yields a single `0x00` byte.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Size of one encoded binding (two u16 key codes)
pub const BINDING_SIZE: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TranslationError {
    #[error("binding buffer of {0} bytes is not a whole number of 4-byte bindings")]
    Malformed(usize),

    #[error("binding buffer of {0} bytes is not a sequence of u16 key codes")]
    OddLength(usize),

    #[error("invalid binding `{0}`, expected FROM:TO")]
    InvalidBinding(String),
}

/// One key remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyTranslation {
    pub from: u16,
    pub to: u16,
    pub flags: u8,
}

impl KeyTranslation {
    pub fn new(from: u16, to: u16) -> Self {
        Self { from, to, flags: 0 }
    }
}

/// Ordered set of key remappings for one device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Translations {
    bindings: Vec<KeyTranslation>,
}

impl Translations {
    pub fn new(bindings: Vec<KeyTranslation>) -> Self {
        Self { bindings }
    }

    /// Decode the driver's binary dump.
    ///
    /// An empty buffer or the single-byte "no bindings" marker both decode to
    /// an empty set.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, TranslationError> {
        if buf.len() <= 1 {
            return Ok(Self::default());
        }
        if buf.len() % BINDING_SIZE != 0 {
            return Err(TranslationError::Malformed(buf.len()));
        }

        let bindings = buf
            .chunks_exact(BINDING_SIZE)
            .map(|c| {
                let from = u16::from_le_bytes([c[0], c[1]]);
                let to = u16::from_le_bytes([c[2], c[3]]);
                KeyTranslation::new(from, to)
            })
            .collect();
        Ok(Self { bindings })
    }

    /// Encode as the driver's binary format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.bindings.len() * BINDING_SIZE);
        for binding in &self.bindings {
            buf.extend_from_slice(&binding.from.to_le_bytes());
            buf.extend_from_slice(&binding.to.to_le_bytes());
        }
        buf
    }

    /// Parse `FROM:TO` pairs; key codes are decimal or `0x`-prefixed hex.
    pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, TranslationError> {
        let bindings = pairs
            .iter()
            .map(|pair| -> Result<KeyTranslation, TranslationError> {
                let pair = pair.as_ref();
                let invalid = || TranslationError::InvalidBinding(pair.to_string());
                let (from, to) = pair.split_once(':').ok_or_else(invalid)?;
                let from = parse_key_code(from).ok_or_else(invalid)?;
                let to = parse_key_code(to).ok_or_else(invalid)?;
                Ok(KeyTranslation::new(from, to))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    /// First binding remapping `key`.
    pub fn lookup(&self, key: u16) -> Option<&KeyTranslation> {
        self.bindings.iter().find(|b| b.from == key)
    }

    pub fn bindings(&self) -> &[KeyTranslation] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings as a from → to map (later duplicates do not override).
    pub fn to_map(&self) -> BTreeMap<u16, u16> {
        let mut map = BTreeMap::new();
        for binding in &self.bindings {
            map.entry(binding.from).or_insert(binding.to);
        }
        map
    }
}

fn parse_key_code(s: &str) -> Option<u16> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

impl fmt::Display for Translations {
    /// Mapping notation, e.g. `{2: 30, 3: 48}`; `{}` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", binding.from, binding.to)?;
        }
        f.write_str("}")
    }
}

/// Result of [`TranslationTable::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Changed,
    Cleared,
}

/// Key translations for every device, keyed by device id.
#[derive(Debug, Default)]
pub struct TranslationTable {
    devices: BTreeMap<u16, Translations>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a binary write for device `id`.
    ///
    /// A single byte clears the bindings of a device that has an entry. Any
    /// other buffer must be made of u16 key codes and replaces the bindings
    /// with its whole 4-byte pairs; a trailing lone code is ignored. Writes
    /// shorter than one binding leave an empty (but present) entry.
    pub fn set(&mut self, id: u16, buf: &[u8]) -> Result<SetOutcome, TranslationError> {
        if buf.len() == 1 && self.devices.remove(&id).is_some() {
            return Ok(SetOutcome::Cleared);
        }
        if buf.len() % 2 != 0 {
            return Err(TranslationError::OddLength(buf.len()));
        }

        let whole = buf.len() - buf.len() % BINDING_SIZE;
        let translations = Translations::from_bytes(&buf[..whole])?;
        self.devices.insert(id, translations);
        Ok(SetOutcome::Changed)
    }

    /// Replace the bindings of device `id` without going through the wire format.
    pub fn insert(&mut self, id: u16, translations: Translations) {
        self.devices.insert(id, translations);
    }

    pub fn get(&self, id: u16) -> Option<&Translations> {
        self.devices.get(&id)
    }

    /// Binary dump for device `id`; a single `0x00` byte if it has no entry.
    pub fn dump(&self, id: u16) -> Vec<u8> {
        match self.devices.get(&id) {
            Some(translations) => translations.to_bytes(),
            None => vec![0],
        }
    }

    /// Translation for `key` pressed on device `id`.
    pub fn lookup(&self, id: u16, key: u16) -> Option<&KeyTranslation> {
        self.devices.get(&id).and_then(|t| t.lookup(key))
    }

    pub fn clear_all(&mut self) {
        self.devices.clear();
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}
