//! First-Fit Contiguous Allocator
//!
//! The simulated address space is a fixed array of cells, each either free
//! or owned by exactly one process. Allocation hands out a single contiguous
//! run of cells per process.
//!
//! # Algorithm
//!
//! The map is scanned from address 0. The first run of free cells that is
//! at least as long as the request is claimed; the lowest address always
//! wins. Freed cells are never compacted, so a request can fail while the
//! total free space would be enough:
//!
//! ```text
//! [ P1 P1 .. .. P2 P2 .. .. ]   4 free cells, request for 3 fails
//! ```

use core::ops::Range;

use hashbrown::HashMap;
use serde::Serialize;

use crate::error::{Result, SimError};
use crate::process::{Process, ProcessId};

/// A maximal run of cells with the same owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryRegion {
    /// First address of the region.
    pub start: usize,
    /// One past the last address.
    pub end: usize,
    /// Owning process, `None` for free space.
    pub owner: Option<ProcessId>,
}

impl MemoryRegion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// Statistics about the memory map state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Total cells in the address space.
    pub total_cells: usize,
    /// Cells not owned by any process.
    pub free_cells: usize,
    /// Longest contiguous free run.
    pub largest_free_block: usize,
    /// Number of processes holding memory.
    pub resident: usize,
}

/// Fixed-size address space with first-fit allocation.
pub struct MemoryMap {
    /// One entry per cell.
    cells: Vec<Option<ProcessId>>,
    /// Region held by each resident process.
    resident: HashMap<ProcessId, Range<usize>>,
}

impl MemoryMap {
    /// Create an entirely free address space of `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![None; size],
            resident: HashMap::new(),
        }
    }

    /// Allocate `process.memory_req` contiguous cells for `process`.
    ///
    /// Returns the claimed address range. On failure nothing is modified.
    /// A process that is already resident keeps its current region.
    pub fn allocate(&mut self, process: &Process) -> Result<Range<usize>> {
        self.allocate_cells(process.pid, process.memory_req)
    }

    /// Allocate `size` contiguous cells for `pid`.
    pub fn allocate_cells(&mut self, pid: ProcessId, size: usize) -> Result<Range<usize>> {
        if let Some(region) = self.resident.get(&pid) {
            log::trace!("[MEM] Process {} already resident at {:?}", pid, region);
            return Ok(region.clone());
        }
        if size == 0 {
            return Ok(0..0);
        }

        let start = self.find_first_fit(size).ok_or_else(|| SimError::MemoryAllocationFailure {
            pid,
            requested: size,
            largest_free: self.largest_free_block(),
        })?;

        let region = start..start + size;
        for cell in &mut self.cells[region.clone()] {
            *cell = Some(pid);
        }
        self.resident.insert(pid, region.clone());

        log::debug!(
            "[MEM] Allocated {} cells for process {} at {}..{}",
            size,
            pid,
            region.start,
            region.end
        );
        Ok(region)
    }

    /// Release every cell owned by `pid`. No-op if it owns nothing.
    pub fn free(&mut self, pid: ProcessId) {
        if let Some(region) = self.resident.remove(&pid) {
            for cell in &mut self.cells[region.clone()] {
                *cell = None;
            }
            log::debug!(
                "[MEM] Freed {} cells of process {}",
                region.len(),
                pid
            );
        }
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.resident.clear();
    }

    /// Lowest start address of a free run of at least `size` cells.
    fn find_first_fit(&self, size: usize) -> Option<usize> {
        let mut run_start = 0;
        let mut run_len = 0;

        for (addr, cell) in self.cells.iter().enumerate() {
            if cell.is_some() {
                run_len = 0;
                continue;
            }
            if run_len == 0 {
                run_start = addr;
            }
            run_len += 1;
            if run_len == size {
                return Some(run_start);
            }
        }
        None
    }

    /// Region currently held by `pid`.
    pub fn region_of(&self, pid: ProcessId) -> Option<Range<usize>> {
        self.resident.get(&pid).cloned()
    }

    /// Owner of the cell at `addr`.
    pub fn owner_at(&self, addr: usize) -> Option<ProcessId> {
        self.cells.get(addr).copied().flatten()
    }

    /// Number of cells owned by `pid`.
    pub fn owned_cells(&self, pid: ProcessId) -> usize {
        self.cells.iter().filter(|c| **c == Some(pid)).count()
    }

    /// Address space size in cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    pub fn largest_free_block(&self) -> usize {
        self.regions()
            .iter()
            .filter(|r| r.is_free())
            .map(MemoryRegion::len)
            .max()
            .unwrap_or(0)
    }

    /// The map as maximal same-owner runs, in address order.
    pub fn regions(&self) -> Vec<MemoryRegion> {
        let mut regions: Vec<MemoryRegion> = Vec::new();
        for (addr, &owner) in self.cells.iter().enumerate() {
            match regions.last_mut() {
                Some(last) if last.owner == owner => last.end = addr + 1,
                _ => regions.push(MemoryRegion {
                    start: addr,
                    end: addr + 1,
                    owner,
                }),
            }
        }
        regions
    }

    /// Get statistics about memory usage.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            total_cells: self.size(),
            free_cells: self.free_cells(),
            largest_free_block: self.largest_free_block(),
            resident: self.resident.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32, memory: usize) -> Process {
        Process::new(ProcessId(pid), 0, 1, 0, memory)
    }

    #[test]
    fn test_first_fit_lowest_address() {
        let mut map = MemoryMap::new(16);
        assert_eq!(map.allocate(&proc(1, 4)).unwrap(), 0..4);
        assert_eq!(map.allocate(&proc(2, 4)).unwrap(), 4..8);
        assert_eq!(map.owned_cells(ProcessId(1)), 4);
        assert_eq!(map.free_cells(), 8);
    }

    #[test]
    fn test_reuses_freed_hole() {
        let mut map = MemoryMap::new(16);
        map.allocate(&proc(1, 4)).unwrap();
        map.allocate(&proc(2, 4)).unwrap();
        map.free(ProcessId(1));

        // The hole at 0 fits and is lower than the tail at 8.
        assert_eq!(map.allocate(&proc(3, 3)).unwrap(), 0..3);
    }

    #[test]
    fn test_fragmentation_blocks_allocation() {
        let mut map = MemoryMap::new(8);
        map.allocate(&proc(1, 2)).unwrap(); // 0..2
        map.allocate(&proc(2, 2)).unwrap(); // 2..4
        map.allocate(&proc(3, 2)).unwrap(); // 4..6
        map.free(ProcessId(2));

        // 4 cells free in total (2..4 and 6..8) but no run of 3.
        assert_eq!(map.free_cells(), 4);
        let err = map.allocate(&proc(4, 3)).unwrap_err();
        assert_eq!(
            err,
            SimError::MemoryAllocationFailure {
                pid: ProcessId(4),
                requested: 3,
                largest_free: 2
            }
        );
        assert_eq!(map.owned_cells(ProcessId(4)), 0);
        assert_eq!(map.free_cells(), 4);
    }

    #[test]
    fn test_oversized_request_fails() {
        let mut map = MemoryMap::new(8);
        assert!(map.allocate(&proc(1, 9)).is_err());
        assert!(map.is_empty());
    }

    #[test]
    fn test_exact_fit_whole_space() {
        let mut map = MemoryMap::new(8);
        assert_eq!(map.allocate(&proc(1, 8)).unwrap(), 0..8);
        assert_eq!(map.free_cells(), 0);
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut map = MemoryMap::new(8);
        map.allocate(&proc(1, 3)).unwrap();
        map.free(ProcessId(1));
        map.free(ProcessId(1));
        map.free(ProcessId(42));
        assert_eq!(map.free_cells(), 8);
    }

    #[test]
    fn test_resident_process_keeps_region() {
        let mut map = MemoryMap::new(8);
        let first = map.allocate(&proc(1, 3)).unwrap();
        let second = map.allocate(&proc(1, 3)).unwrap();
        assert_eq!(first, second);
        assert_eq!(map.owned_cells(ProcessId(1)), 3);
    }

    #[test]
    fn test_zero_sized_request() {
        let mut map = MemoryMap::new(4);
        assert_eq!(map.allocate(&proc(1, 0)).unwrap(), 0..0);
        assert_eq!(map.free_cells(), 4);
        assert_eq!(map.region_of(ProcessId(1)), None);
    }

    #[test]
    fn test_regions_cover_address_space() {
        let mut map = MemoryMap::new(10);
        map.allocate(&proc(1, 3)).unwrap();
        map.allocate(&proc(2, 2)).unwrap();
        map.free(ProcessId(1));

        let regions = map.regions();
        assert_eq!(
            regions,
            vec![
                MemoryRegion { start: 0, end: 3, owner: None },
                MemoryRegion { start: 3, end: 5, owner: Some(ProcessId(2)) },
                MemoryRegion { start: 5, end: 10, owner: None },
            ]
        );
        assert_eq!(regions.iter().map(MemoryRegion::len).sum::<usize>(), 10);
    }

    #[test]
    fn test_stats() {
        let mut map = MemoryMap::new(10);
        map.allocate(&proc(1, 4)).unwrap();
        let stats = map.stats();
        assert_eq!(stats.total_cells, 10);
        assert_eq!(stats.free_cells, 6);
        assert_eq!(stats.largest_free_block, 6);
        assert_eq!(stats.resident, 1);

        map.clear();
        assert_eq!(map.stats().free_cells, 10);
        assert_eq!(map.stats().resident, 0);
    }
}
