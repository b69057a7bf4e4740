//! Simulation sizes.

use crate::constants::*;
use crate::error::{PagingError, Result};

/// Fixed capacities for one run. Nothing here changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    ram_slots: usize,
    page_size: usize,
    processes: usize,
    pages_per_process: usize,
}

impl SimConfig {
    /// Validate and build a configuration
    ///
    /// Every size must be non-zero, the slot count must hold a whole
    /// number of pages, frame indices must stay below the DISK sentinel and
    /// the total page count must fit in a `usize`.
    pub fn new(
        ram_slots: usize,
        page_size: usize,
        processes: usize,
        pages_per_process: usize,
    ) -> Result<Self> {
        for (name, value) in [
            ("ram slots", ram_slots),
            ("page size", page_size),
            ("processes", processes),
            ("pages per process", pages_per_process),
        ] {
            if value == 0 {
                return Err(PagingError::InvalidConfig(format!("{} must be greater than 0", name)));
            }
        }
        if ram_slots % page_size != 0 {
            return Err(PagingError::InvalidConfig(format!(
                "ram slots ({}) must be a multiple of the page size ({})",
                ram_slots, page_size
            )));
        }
        // DISK must stay out of the frame index range
        if ram_slots / page_size > DISK {
            return Err(PagingError::InvalidConfig(format!(
                "{} frames requested; at most {} are supported",
                ram_slots / page_size,
                DISK
            )));
        }
        if processes.checked_mul(pages_per_process).is_none() {
            return Err(PagingError::InvalidConfig(format!(
                "{} processes of {} pages each overflow the page count",
                processes, pages_per_process
            )));
        }

        Ok(SimConfig { ram_slots, page_size, processes, pages_per_process })
    }

    #[inline]
    pub fn ram_slots(&self) -> usize {
        self.ram_slots
    }

    /// Slots per page (and per frame)
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn processes(&self) -> usize {
        self.processes
    }

    #[inline]
    pub fn pages_per_process(&self) -> usize {
        self.pages_per_process
    }

    /// Number of page-sized frames in physical memory
    #[inline]
    pub fn frames(&self) -> usize {
        self.ram_slots / self.page_size
    }

    /// Total logical pages held by the backing store
    #[inline]
    pub fn total_pages(&self) -> usize {
        self.processes * self.pages_per_process
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            ram_slots: RAM_SIZE,
            page_size: PAGE_SIZE,
            processes: PROCESSES,
            pages_per_process: PAGES_PER_PROCESS,
        }
    }
}
