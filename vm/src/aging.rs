use log::debug;

use crate::{
    error::{Result, VmError},
    page_table::PageTable,
};

/// Clears every R bit once each `every` accesses.
#[derive(Copy, Clone, Debug)]
pub struct AgingClock {
    every: u64,
}

impl AgingClock {
    pub fn new(every: usize) -> Result<Self> {
        if every == 0 {
            return Err(VmError::InvalidAgingInterval);
        }

        Ok(AgingClock { every: every as u64 })
    }

    pub fn interval(&self) -> u64 {
        self.every
    }

    /// Returns whether a sweep happened. `total_accesses` must already count
    /// the access that was just processed.
    pub fn tick(&self, total_accesses: u64, pages: &mut PageTable) -> bool {
        if total_accesses == 0 || total_accesses % self.every != 0 {
            return false;
        }

        debug!("aging: clearing R bits after {} accesses", total_accesses);
        pages.clear_referenced();

        true
    }
}
