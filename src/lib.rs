pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod logging;
pub mod memory;
pub mod page_table;
pub mod paging;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::SimConfig;
pub use constants::*;
pub use error::{PagingError, Result};
pub use memory::{BackingStore, FramePool, LogicalPage, PageId};
pub use page_table::{PageTable, Residency};
pub use paging::{Access, Pager};
pub use vm_manager::{Simulation, Stats};
