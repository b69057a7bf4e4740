// reference configuration ~slots are the unit of physical storage
pub const RAM_SIZE: usize = 16;
pub const PAGE_SIZE: usize = 2;
pub const NUM_FRAMES: usize = RAM_SIZE / PAGE_SIZE;

pub const PROCESSES: usize = 4;
pub const PAGES_PER_PROCESS: usize = 4;

// printed in the page table report for pages that are only in the backing store
pub const DISK: usize = 99;

pub const EMPTY_SLOT: &str = "EMPTY";
