//! The paging engine: frame allocation and LRU replacement.
//!
//! `Pager` is the only writer of frame occupancy. Each public mutation
//! updates the frame pool and the page table together before returning.

use log::debug;

use crate::config::SimConfig;
use crate::error::{PagingError, Result};
use crate::memory::{BackingStore, FramePool, PageId};
use crate::page_table::{PageTable, Residency};

/// What `ensure_resident` had to do to satisfy a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Already resident; only the timestamp moved
    Hit { frame: usize },
    /// Page fault served from a free frame
    Loaded { frame: usize },
    /// Page fault that evicted `victim` from `frame`
    Replaced { frame: usize, victim: PageId },
}

impl Access {
    #[inline]
    pub fn frame(&self) -> usize {
        match self {
            Access::Hit { frame } | Access::Loaded { frame } | Access::Replaced { frame, .. } => *frame,
        }
    }

    #[inline]
    pub fn is_fault(&self) -> bool {
        !matches!(self, Access::Hit { .. })
    }
}

pub struct Pager {
    store: BackingStore,
    table: PageTable,
    frames: FramePool,
}

impl Pager {
    pub fn new(config: &SimConfig) -> Result<Self> {
        Ok(Pager {
            store: BackingStore::new(config)?,
            table: PageTable::new(config)?,
            frames: FramePool::new(config)?,
        })
    }

    pub fn store(&self) -> &BackingStore {
        &self.store
    }

    pub fn table(&self) -> &PageTable {
        &self.table
    }

    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    /// First frame whose slots are all empty
    pub fn find_free_frame(&self) -> Option<usize> {
        let slots = self.frames.slots();
        slots
            .chunks(self.frames.page_size())
            .position(|run| run.iter().all(Option::is_none))
    }

    /// Least recently used frame owned by `process`
    pub fn find_lru(&self, process: usize) -> Result<Option<usize>> {
        self.lru_among(|id| id.process == process)
    }

    /// Least recently used frame regardless of owner
    pub fn find_lru_global(&self) -> Result<Option<usize>> {
        self.lru_among(|_| true)
    }

    // Frames are scanned in index order and only a strictly older page
    // replaces the candidate, so ties go to the lowest frame.
    fn lru_among(&self, wanted: impl Fn(PageId) -> bool) -> Result<Option<usize>> {
        let mut oldest: Option<(usize, u64)> = None;

        for (frame, id) in self.frames.iter_resident() {
            if !wanted(id) {
                continue;
            }
            let stamp = self.store.get(id)?.last_accessed;
            match oldest {
                Some((_, best)) if stamp >= best => {}
                _ => oldest = Some((frame, stamp)),
            }
        }

        Ok(oldest.map(|(frame, _)| frame))
    }

    /// Remove the page in `frame`, marking it not resident
    ///
    /// Fails on an out-of-range or empty frame.
    pub fn evict(&mut self, frame: usize) -> Result<PageId> {
        let id = self.frames.resident(frame)?.ok_or(PagingError::EvictEmptyFrame(frame))?;
        let last_accessed = self.store.get(id)?.last_accessed;

        self.table.unbind(id)?;
        self.frames.clear(frame)?;

        debug!(
            "Evicted process {}, page {} from frame {} (last accessed at time {})",
            id.process, id.page, frame, last_accessed
        );
        Ok(id)
    }

    /// Make `id` resident at time `clock`
    ///
    /// A resident page only has its timestamp refreshed. On a fault the page
    /// goes to the first free frame, else replaces the requesting process's
    /// LRU page, else the global LRU page.
    pub fn ensure_resident(&mut self, id: PageId, clock: u64) -> Result<Access> {
        // Validate the identity before touching anything
        self.store.get(id)?;

        if let Residency::Resident(frame) = self.table.lookup(id)? {
            // Every slot of the run names `id`, so one stamp covers the run
            if self.frames.resident(frame)? != Some(id) {
                return Err(PagingError::ResidencyMismatch { process: id.process, page: id.page, frame });
            }
            self.store.get_mut(id)?.last_accessed = clock;
            debug!(
                "Page {} of process {} is already in RAM (frame {}), updated last accessed time at {}",
                id.page, id.process, frame, clock
            );
            return Ok(Access::Hit { frame });
        }

        let (frame, victim) = match self.find_free_frame() {
            Some(frame) => (frame, None),
            None => {
                let frame = match self.find_lru(id.process)? {
                    Some(frame) => frame,
                    None => self.find_lru_global()?.ok_or(PagingError::NoEvictionCandidate {
                        process: id.process,
                        page: id.page,
                    })?,
                };
                debug!("Evicting page from frame {} for process {}", frame, id.process);
                (frame, Some(self.evict(frame)?))
            }
        };

        self.frames.fill(frame, id)?;
        self.store.get_mut(id)?.last_accessed = clock;
        self.table.bind(id, frame)?;

        debug!(
            "Loaded process {}, page {} into frame {} at time {}",
            id.process, id.page, frame, clock
        );

        Ok(match victim {
            Some(victim) => Access::Replaced { frame, victim },
            None => Access::Loaded { frame },
        })
    }

    /// Whether frame contents and the page table describe the same residency
    pub fn is_consistent(&self) -> bool {
        let runs_uniform = self
            .frames
            .slots()
            .chunks(self.frames.page_size())
            .all(|run| run.iter().all(|slot| *slot == run[0]));

        let frames_match_table = self
            .frames
            .iter_resident()
            .all(|(frame, id)| self.table.lookup(id).ok() == Some(Residency::Resident(frame)));

        runs_uniform
            && frames_match_table
            && self.table.resident_count() == self.frames.occupied_frames()
    }
}
