//! Error types for the paging engine and its driver.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for paging operations
pub type Result<T> = std::result::Result<T, PagingError>;

/// Every failure here is fatal to a run; the binary reports it and exits 1.
#[derive(Error, Debug)]
pub enum PagingError {
    /// Rejected simulation sizes
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not reserve storage for the frame pool or backing store
    #[error("Failed to allocate {count} entries for {what}")]
    Allocation { what: &'static str, count: usize },

    #[error("Invalid page in backing store for process {process}, page {page}")]
    PageOutOfRange { process: usize, page: usize },

    #[error("Process {process} is out of range (configured processes: {processes})")]
    ProcessOutOfRange { process: usize, processes: usize },

    #[error("Frame {frame} is out of range (configured frames: {frames})")]
    InvalidFrame { frame: usize, frames: usize },

    /// Eviction is only valid on a frame the caller has seen occupied
    #[error("Attempted to evict a non-existent page at frame {0}")]
    EvictEmptyFrame(usize),

    /// The page table and the frame pool disagree about a page
    #[error("Page table maps process {process}, page {page} to frame {frame}, which does not hold it")]
    ResidencyMismatch { process: usize, page: usize, frame: usize },

    #[error(
        "Failed to find a frame to evict for process {process}, page {page}: no free frames or LRU pages available"
    )]
    NoEvictionCandidate { process: usize, page: usize },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
