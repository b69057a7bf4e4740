use log::debug;

use crate::config::SimConfig;
use crate::error::{PagingError, Result};

/// Identity of a logical page: owning process and page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId {
    pub process: usize,
    pub page: usize,
}

impl PageId {
    pub fn new(process: usize, page: usize) -> Self {
        PageId { process, page }
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "process {}, page {}", self.process, self.page)
    }
}

/// One page record. Lives in the backing store for the whole run; frames
/// only refer to it by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPage {
    pub id: PageId,
    pub last_accessed: u64,
}

/// Backing store - every (process, page) record, never evicted
pub struct BackingStore {
    pages: Vec<LogicalPage>,
    processes: usize,
    pages_per_process: usize,
}

impl BackingStore {
    /// Create one record per (process, page) pair with timestamp 0
    pub fn new(config: &SimConfig) -> Result<Self> {
        let count = config.total_pages();
        let mut pages = Vec::new();
        pages
            .try_reserve_exact(count)
            .map_err(|_| PagingError::Allocation { what: "backing store", count })?;

        for process in 0..config.processes() {
            for page in 0..config.pages_per_process() {
                pages.push(LogicalPage { id: PageId::new(process, page), last_accessed: 0 });
                debug!("Initialized process {}, page {} in backing store", process, page);
            }
        }

        Ok(BackingStore {
            pages,
            processes: config.processes(),
            pages_per_process: config.pages_per_process(),
        })
    }

    fn index(&self, id: PageId) -> Result<usize> {
        if id.process >= self.processes || id.page >= self.pages_per_process {
            return Err(PagingError::PageOutOfRange { process: id.process, page: id.page });
        }
        Ok(id.process * self.pages_per_process + id.page)
    }

    /// Look up a page record
    pub fn get(&self, id: PageId) -> Result<&LogicalPage> {
        let idx = self.index(id)?;
        Ok(&self.pages[idx])
    }

    pub fn get_mut(&mut self, id: PageId) -> Result<&mut LogicalPage> {
        let idx = self.index(id)?;
        Ok(&mut self.pages[idx])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Physical memory as an array of slots. A frame is a run of `page_size`
/// consecutive slots and every slot of an occupied frame names the same page.
pub struct FramePool {
    slots: Vec<Option<PageId>>,
    page_size: usize,
}

impl FramePool {
    /// Create an all-empty pool
    pub fn new(config: &SimConfig) -> Result<Self> {
        let count = config.ram_slots();
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(count)
            .map_err(|_| PagingError::Allocation { what: "frame pool", count })?;
        slots.resize(count, None);

        Ok(FramePool { slots, page_size: config.page_size() })
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.slots.len() / self.page_size
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Option<PageId>] {
        &self.slots
    }

    fn check(&self, frame: usize) -> Result<usize> {
        if frame >= self.frames() {
            return Err(PagingError::InvalidFrame { frame, frames: self.frames() });
        }
        Ok(frame * self.page_size)
    }

    /// The slots making up `frame`
    pub fn frame(&self, frame: usize) -> Result<&[Option<PageId>]> {
        let start = self.check(frame)?;
        Ok(&self.slots[start..start + self.page_size])
    }

    /// Page held by `frame`, judged by its first slot
    pub fn resident(&self, frame: usize) -> Result<Option<PageId>> {
        let start = self.check(frame)?;
        Ok(self.slots[start])
    }

    /// Number of frames currently holding a page
    pub fn occupied_frames(&self) -> usize {
        self.slots.chunks(self.page_size).filter(|run| run[0].is_some()).count()
    }

    /// Frames in index order with their resident page
    pub fn iter_resident(&self) -> impl Iterator<Item = (usize, PageId)> + '_ {
        self.slots
            .chunks(self.page_size)
            .enumerate()
            .filter_map(|(frame, run)| run[0].map(|id| (frame, id)))
    }

    /// Point every slot of `frame` at `id`
    pub(crate) fn fill(&mut self, frame: usize, id: PageId) -> Result<()> {
        let start = self.check(frame)?;
        for slot in &mut self.slots[start..start + self.page_size] {
            *slot = Some(id);
        }
        Ok(())
    }

    /// Empty every slot of `frame`
    pub(crate) fn clear(&mut self, frame: usize) -> Result<()> {
        let start = self.check(frame)?;
        for slot in &mut self.slots[start..start + self.page_size] {
            *slot = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_store_initialization() {
        let store = BackingStore::new(&SimConfig::default()).unwrap();
        assert_eq!(store.len(), 16);

        // Every record starts untouched
        let page = store.get(PageId::new(3, 2)).unwrap();
        assert_eq!(page.id, PageId::new(3, 2));
        assert_eq!(page.last_accessed, 0);
    }

    #[test]
    fn test_backing_store_out_of_range() {
        let store = BackingStore::new(&SimConfig::default()).unwrap();
        assert!(matches!(
            store.get(PageId::new(4, 0)),
            Err(PagingError::PageOutOfRange { process: 4, page: 0 })
        ));
        assert!(matches!(
            store.get(PageId::new(0, 4)),
            Err(PagingError::PageOutOfRange { process: 0, page: 4 })
        ));
    }

    #[test]
    fn test_backing_store_get_mut() {
        let mut store = BackingStore::new(&SimConfig::default()).unwrap();
        store.get_mut(PageId::new(1, 1)).unwrap().last_accessed = 9;

        assert_eq!(store.get(PageId::new(1, 1)).unwrap().last_accessed, 9);
        // Neighbours untouched
        assert_eq!(store.get(PageId::new(1, 0)).unwrap().last_accessed, 0);
        assert_eq!(store.get(PageId::new(1, 2)).unwrap().last_accessed, 0);
    }

    #[test]
    fn test_frame_pool_starts_empty() {
        let pool = FramePool::new(&SimConfig::default()).unwrap();
        assert_eq!(pool.frames(), 8);
        assert_eq!(pool.slots().len(), 16);
        assert!(pool.slots().iter().all(Option::is_none));
        assert_eq!(pool.occupied_frames(), 0);
    }

    #[test]
    fn test_fill_and_clear_cover_whole_run() {
        let mut pool = FramePool::new(&SimConfig::default()).unwrap();
        let id = PageId::new(2, 3);

        pool.fill(5, id).unwrap();
        // Frame 5 is slots 10 and 11
        assert_eq!(pool.slots()[10], Some(id));
        assert_eq!(pool.slots()[11], Some(id));
        assert_eq!(pool.slots()[9], None);
        assert_eq!(pool.slots()[12], None);
        assert_eq!(pool.resident(5).unwrap(), Some(id));
        assert_eq!(pool.occupied_frames(), 1);

        pool.clear(5).unwrap();
        assert!(pool.frame(5).unwrap().iter().all(Option::is_none));
        assert_eq!(pool.occupied_frames(), 0);
    }

    #[test]
    fn test_frame_index_checked() {
        let mut pool = FramePool::new(&SimConfig::default()).unwrap();
        assert!(matches!(pool.resident(8), Err(PagingError::InvalidFrame { frame: 8, frames: 8 })));
        assert!(pool.fill(8, PageId::new(0, 0)).is_err());
        assert!(pool.clear(100).is_err());
    }

    #[test]
    fn test_iter_resident() {
        let mut pool = FramePool::new(&SimConfig::default()).unwrap();
        pool.fill(1, PageId::new(0, 0)).unwrap();
        pool.fill(6, PageId::new(3, 1)).unwrap();

        let resident: Vec<_> = pool.iter_resident().collect();
        assert_eq!(resident, vec![(1, PageId::new(0, 0)), (6, PageId::new(3, 1))]);
    }

    #[test]
    fn test_page_id_display() {
        assert_eq!(PageId::new(1, 3).to_string(), "process 1, page 3");
    }
}
