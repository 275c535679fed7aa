use crate::error::{Result, VmError};

/// Splits virtual addresses into page number and offset for a fixed page size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressTranslator {
    offset_bits: u32,
}

impl AddressTranslator {
    pub fn new(page_size: usize) -> Result<Self> {
        let offset_bits = match page_size {
            32 => 5,
            64 => 6,
            128 => 7,
            other => return Err(VmError::UnsupportedPageSize(other)),
        };

        Ok(AddressTranslator { offset_bits })
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn page_number(&self, address: u32) -> usize {
        (address >> self.offset_bits) as usize
    }

    pub fn page_offset(&self, address: u32) -> usize {
        (address & ((1 << self.offset_bits) - 1)) as usize
    }

    pub fn split(&self, address: u32) -> (usize, usize) {
        (self.page_number(address), self.page_offset(address))
    }
}
