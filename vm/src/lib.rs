pub mod address;
pub mod aging;
pub mod config;
pub mod error;
pub mod frame_table;
pub mod mmu;
pub mod page_replacer;
pub mod page_table;
pub mod stats;

pub use config::{VmConfig, DEFAULT_PHYSICAL_MEMORY_SIZE};
pub use error::{Result, VmError};
