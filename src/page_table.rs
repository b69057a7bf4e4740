use crate::config::SimConfig;
use crate::constants::DISK;
use crate::error::{PagingError, Result};
use crate::memory::PageId;

/// Where a logical page currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Residency {
    Resident(usize),
    #[default]
    NotResident,
}

impl Residency {
    /// Frame index, or the DISK sentinel used in reports
    pub fn to_output(&self) -> usize {
        match self {
            Residency::Resident(frame) => *frame,
            Residency::NotResident => DISK,
        }
    }

    #[inline]
    pub fn frame(&self) -> Option<usize> {
        match self {
            Residency::Resident(frame) => Some(*frame),
            Residency::NotResident => None,
        }
    }
}

/// Per-process page tables, one row per process
///
/// Binding here has no side effects on the frame pool; the pager keeps the
/// two in step.
pub struct PageTable {
    entries: Vec<Residency>,
    processes: usize,
    pages_per_process: usize,
}

impl PageTable {
    /// All pages start on disk
    pub fn new(config: &SimConfig) -> Result<Self> {
        let count = config.total_pages();
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(count)
            .map_err(|_| PagingError::Allocation { what: "page table", count })?;
        entries.resize(count, Residency::NotResident);

        Ok(PageTable {
            entries,
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

    pub fn lookup(&self, id: PageId) -> Result<Residency> {
        Ok(self.entries[self.index(id)?])
    }

    /// Record that `id` now occupies `frame`
    pub fn bind(&mut self, id: PageId, frame: usize) -> Result<()> {
        let idx = self.index(id)?;
        self.entries[idx] = Residency::Resident(frame);
        Ok(())
    }

    pub fn unbind(&mut self, id: PageId) -> Result<()> {
        let idx = self.index(id)?;
        self.entries[idx] = Residency::NotResident;
        Ok(())
    }

    /// Entries for one process, page 0 first
    pub fn row(&self, process: usize) -> Result<&[Residency]> {
        if process >= self.processes {
            return Err(PagingError::ProcessOutOfRange { process, processes: self.processes });
        }
        let start = process * self.pages_per_process;
        Ok(&self.entries[start..start + self.pages_per_process])
    }

    #[inline]
    pub fn processes(&self) -> usize {
        self.processes
    }

    pub fn resident_count(&self) -> usize {
        self.entries.iter().filter(|e| e.frame().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_all_on_disk() {
        let table = PageTable::new(&SimConfig::default()).unwrap();
        for process in 0..4 {
            let row = table.row(process).unwrap();
            assert_eq!(row.len(), 4);
            assert!(row.iter().all(|e| *e == Residency::NotResident));
        }
        assert_eq!(table.resident_count(), 0);
    }

    #[test]
    fn test_bind_unbind() {
        let mut table = PageTable::new(&SimConfig::default()).unwrap();
        let id = PageId::new(2, 1);

        table.bind(id, 6).unwrap();
        assert_eq!(table.lookup(id).unwrap(), Residency::Resident(6));
        assert_eq!(table.row(2).unwrap()[1], Residency::Resident(6));
        assert_eq!(table.resident_count(), 1);

        table.unbind(id).unwrap();
        assert_eq!(table.lookup(id).unwrap(), Residency::NotResident);
        assert_eq!(table.resident_count(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let mut table = PageTable::new(&SimConfig::default()).unwrap();
        assert!(table.lookup(PageId::new(0, 4)).is_err());
        assert!(table.bind(PageId::new(4, 0), 0).is_err());
        assert!(matches!(table.row(9), Err(PagingError::ProcessOutOfRange { process: 9, .. })));
    }

    #[test]
    fn test_unsatisfiable_size_is_allocation_error() {
        // Fits in a usize but no allocator can reserve it
        let config = SimConfig::new(16, 2, usize::MAX / 2, 1).unwrap();
        assert!(matches!(
            PageTable::new(&config),
            Err(PagingError::Allocation { what: "page table", .. })
        ));
    }

    #[test]
    fn test_residency_to_output() {
        assert_eq!(Residency::Resident(0).to_output(), 0);
        assert_eq!(Residency::Resident(7).to_output(), 7);
        assert_eq!(Residency::NotResident.to_output(), 99);
        assert_eq!(Residency::NotResident.frame(), None);
    }
}
