use log::{info, trace};

use crate::config::SimConfig;
use crate::error::{PagingError, Result};
use crate::memory::PageId;
use crate::paging::{Access, Pager};

/// Counters over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub requests: u64,
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
}

/// One simulation context: engine state plus the request clock and each
/// process's round-robin page cursor
pub struct Simulation {
    config: SimConfig,
    pager: Pager,
    clock: u64,
    next_page: Vec<usize>,
    stats: Stats,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        info!(
            "Initializing {} frames of {} slots and {} pages for {} processes",
            config.frames(),
            config.page_size(),
            config.total_pages(),
            config.processes()
        );
        let processes = config.processes();
        let mut next_page = Vec::new();
        next_page
            .try_reserve_exact(processes)
            .map_err(|_| PagingError::Allocation { what: "page cursors", count: processes })?;
        next_page.resize(processes, 0);

        Ok(Simulation {
            pager: Pager::new(&config)?,
            next_page,
            clock: 0,
            stats: Stats::default(),
            config,
        })
    }

    /// Serve one request from `process` for its next page, then advance the clock
    pub fn step(&mut self, process: usize) -> Result<Access> {
        if process >= self.config.processes() {
            return Err(PagingError::ProcessOutOfRange { process, processes: self.config.processes() });
        }

        let page = self.next_page[process];
        trace!("Process {} is requesting page {} at time {}", process, page, self.clock);

        let access = self.pager.ensure_resident(PageId::new(process, page), self.clock)?;

        self.stats.requests += 1;
        match access {
            Access::Hit { .. } => self.stats.hits += 1,
            Access::Loaded { .. } => self.stats.faults += 1,
            Access::Replaced { .. } => {
                self.stats.faults += 1;
                self.stats.evictions += 1;
            }
        }

        self.next_page[process] = (page + 1) % self.config.pages_per_process();
        self.clock += 1;
        Ok(access)
    }

    /// Replay a whole request trace in order
    pub fn run(&mut self, requests: &[usize]) -> Result<()> {
        for &process in requests {
            self.step(process)?;
        }
        info!(
            "Processed {} requests: {} hits, {} faults, {} evictions",
            self.stats.requests, self.stats.hits, self.stats.faults, self.stats.evictions
        );
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    #[inline]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Page the next request from `process` will ask for
    pub fn next_page(&self, process: usize) -> Option<usize> {
        self.next_page.get(process).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::Residency;

    #[test]
    fn test_round_robin_cursor() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.next_page(1), Some(0));

        for expected in [1, 2, 3, 0, 1] {
            sim.step(1).unwrap();
            assert_eq!(sim.next_page(1), Some(expected));
        }
        // Other processes untouched
        assert_eq!(sim.next_page(0), Some(0));
        assert_eq!(sim.next_page(4), None);
    }

    #[test]
    fn test_clock_advances_once_per_request() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.run(&[0, 0, 3]).unwrap();
        assert_eq!(sim.clock(), 3);
        assert_eq!(sim.stats().requests, 3);
    }

    #[test]
    fn test_wraparound_is_a_hit() {
        // Process 0 asks for pages 0..3 then page 0 again; nothing was evicted
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.run(&[0, 0, 0, 0]).unwrap();

        let access = sim.step(0).unwrap();
        assert_eq!(access, Access::Hit { frame: 0 });
        assert_eq!(
            sim.stats(),
            Stats { requests: 5, hits: 1, faults: 4, evictions: 0 }
        );
        assert_eq!(sim.pager().store().get(PageId::new(0, 0)).unwrap().last_accessed, 4);
    }

    #[test]
    fn test_reference_trace() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.run(&[0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0]).unwrap();

        // All 8 frames fill after 8 requests; every later request evicts
        assert_eq!(sim.stats(), Stats { requests: 17, hits: 0, faults: 17, evictions: 9 });

        let table = sim.pager().table();
        let row: Vec<usize> = table.row(0).unwrap().iter().map(Residency::to_output).collect();
        assert_eq!(row, vec![0, 99, 99, 4]);
        assert!(sim.pager().is_consistent());
    }

    #[test]
    fn test_huge_process_count_fails_cleanly() {
        let config = SimConfig::new(16, 2, usize::MAX / 2, 1).unwrap();
        assert!(matches!(Simulation::new(config), Err(PagingError::Allocation { .. })));
    }

    #[test]
    fn test_process_out_of_range() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert!(matches!(
            sim.step(4),
            Err(PagingError::ProcessOutOfRange { process: 4, processes: 4 })
        ));
        // A rejected request does not tick the clock
        assert_eq!(sim.clock(), 0);
    }
}
