use crate::ports::{NonVolatileStorage, StorageError};

/// Erased EEPROM cells read back as all ones.
pub const ERASED_BYTE: u8 = 0xFF;

/// Fixed-size byte image with EEPROM addressing semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEeprom {
    cells: Vec<u8>,
}

impl MemoryEeprom {
    pub fn erased(capacity: usize) -> Self {
        Self {
            cells: vec![ERASED_BYTE; capacity],
        }
    }

    /// Wraps an existing image, padding or truncating it to `capacity`.
    pub fn from_image(mut image: Vec<u8>, capacity: usize) -> Self {
        image.resize(capacity, ERASED_BYTE);
        Self { cells: image }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    fn range(&self, address: usize, len: usize) -> Result<std::ops::Range<usize>, StorageError> {
        let end = address.saturating_add(len);
        if end > self.cells.len() {
            return Err(StorageError::OutOfBounds {
                address,
                end,
                capacity: self.cells.len(),
            });
        }
        Ok(address..end)
    }
}

impl NonVolatileStorage for MemoryEeprom {
    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = self.range(address, buf.len())?;
        buf.copy_from_slice(&self.cells[range]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        let range = self.range(address, data.len())?;
        self.cells[range].copy_from_slice(data);
        Ok(())
    }
}
