//! Setpoint persistence with a complement-word integrity check.
//!
//! Layout at [`RECORD_ADDRESS`], both words little-endian:
//!
//! ```text
//! +0  f32  setpoint
//! +4  u32  !setpoint.to_bits()
//! ```
//!
//! Blank memory (all 0xFF or all 0x00) never satisfies the check, so a fresh
//! device falls back to the default setpoint.

use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::{NonVolatileStorage, StorageError};

pub const RECORD_ADDRESS: usize = 0;
pub const RECORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetpointError {
    #[error("setpoint record is blank or corrupted (raw {raw:#010x}, inverse {inverse:#010x})")]
    InvalidRecord { raw: u32, inverse: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetpointRecord {
    raw: u32,
    inverse: u32,
}

impl SetpointRecord {
    pub fn new(value: f32) -> Self {
        let raw = value.to_bits();
        Self { raw, inverse: !raw }
    }

    pub fn encode(self) -> [u8; RECORD_LEN] {
        let mut bytes = [0_u8; RECORD_LEN];
        bytes[..4].copy_from_slice(&self.raw.to_le_bytes());
        bytes[4..].copy_from_slice(&self.inverse.to_le_bytes());
        bytes
    }

    pub fn decode(bytes: [u8; RECORD_LEN]) -> Self {
        let [r0, r1, r2, r3, i0, i1, i2, i3] = bytes;
        Self {
            raw: u32::from_le_bytes([r0, r1, r2, r3]),
            inverse: u32::from_le_bytes([i0, i1, i2, i3]),
        }
    }

    pub fn value(self) -> Result<f32, SetpointError> {
        if self.inverse == !self.raw {
            Ok(f32::from_bits(self.raw))
        } else {
            Err(SetpointError::InvalidRecord {
                raw: self.raw,
                inverse: self.inverse,
            })
        }
    }
}

pub struct SetpointStore<S> {
    storage: S,
    default_value: f32,
}

impl<S: NonVolatileStorage> SetpointStore<S> {
    pub fn new(storage: S, default_value: f32) -> Self {
        Self {
            storage,
            default_value,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Reads the record, reporting storage failures and invalid records
    /// separately.
    pub fn load_record(&mut self) -> Result<f32, SetpointError> {
        let mut bytes = [0_u8; RECORD_LEN];
        self.storage.read(RECORD_ADDRESS, &mut bytes)?;
        SetpointRecord::decode(bytes).value()
    }

    /// Returns the persisted setpoint, or the default when no valid record
    /// can be read.
    pub fn load(&mut self) -> f32 {
        match self.load_record() {
            Ok(value) => {
                debug!("restored setpoint {value:.1}");
                value
            }
            Err(SetpointError::InvalidRecord { .. }) => {
                debug!(
                    "no valid setpoint record; using default {:.1}",
                    self.default_value
                );
                self.default_value
            }
            Err(err) => {
                warn!(
                    "setpoint load failed ({err}); using default {:.1}",
                    self.default_value
                );
                self.default_value
            }
        }
    }

    pub fn save(&mut self, value: f32) -> Result<(), StorageError> {
        let bytes = SetpointRecord::new(value).encode();
        self.storage.write(RECORD_ADDRESS, &bytes[..4])?;
        self.storage.write(RECORD_ADDRESS + 4, &bytes[4..])
    }
}
