use crate::{address::AddressTranslator, error::{Result, VmError}};

/// Physical memory size used when none is given, in bytes.
pub const DEFAULT_PHYSICAL_MEMORY_SIZE: usize = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    pub page_size: usize,
    /// Number of accesses between two sweeps clearing every R bit.
    pub clear_r_every: usize,
    pub physical_memory_size: usize,
}

impl VmConfig {
    pub fn new(page_size: usize, clear_r_every: usize) -> Self {
        VmConfig {
            page_size,
            clear_r_every,
            physical_memory_size: DEFAULT_PHYSICAL_MEMORY_SIZE,
        }
    }

    pub fn with_physical_memory_size(mut self, physical_memory_size: usize) -> Self {
        self.physical_memory_size = physical_memory_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        AddressTranslator::new(self.page_size)?;

        if self.clear_r_every == 0 {
            return Err(VmError::InvalidAgingInterval);
        }

        if self.physical_memory_size < self.page_size {
            return Err(VmError::PhysicalMemoryTooSmall {
                physical_memory_size: self.physical_memory_size,
                page_size: self.page_size,
            });
        }

        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.physical_memory_size / self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_memory_gives_32_frames_of_32_bytes() {
        let config = VmConfig::new(32, 10);

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_count(), 32);
        assert_eq!(VmConfig::new(128, 10).frame_count(), 8);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            VmConfig::new(48, 10).validate(),
            Err(VmError::UnsupportedPageSize(48))
        );
        assert_eq!(
            VmConfig::new(64, 0).validate(),
            Err(VmError::InvalidAgingInterval)
        );
        assert_eq!(
            VmConfig::new(128, 5).with_physical_memory_size(64).validate(),
            Err(VmError::PhysicalMemoryTooSmall {
                physical_memory_size: 64,
                page_size: 128
            })
        );
    }
}
