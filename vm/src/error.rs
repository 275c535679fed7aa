use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("page size must be 32, 64 or 128 (got {0})")]
    UnsupportedPageSize(usize),

    #[error("clear_r_every must be > 0")]
    InvalidAgingInterval,

    #[error(
        "physical memory of {physical_memory_size} bytes cannot hold a single {page_size} byte page"
    )]
    PhysicalMemoryTooSmall {
        physical_memory_size: usize,
        page_size: usize,
    },

    /// The replacer was asked for a victim while no frame was occupied.
    #[error("no occupied frame to evict")]
    NoVictim,
}
