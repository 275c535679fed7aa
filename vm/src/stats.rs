#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Statistics {
    pub reads: u64,
    pub writes: u64,
    pub faults: u64,
    pub accesses: u64,
}

impl Statistics {
    /// Faults per access, `0.0` when nothing was accessed.
    pub fn fault_ratio(&self) -> f64 {
        let total = self.reads + self.writes;

        if total == 0 {
            0.0
        } else {
            self.faults as f64 / total as f64
        }
    }
}
