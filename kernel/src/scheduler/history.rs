//! Execution history (Gantt chart data).

use serde::Serialize;

use crate::error::{Resource, Result, SimError};
use crate::process::{ProcessId, Tick};

/// One contiguous stretch of CPU time given to a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GanttSegment {
    pub pid: ProcessId,
    pub start: Tick,
    pub end: Tick,
}

impl GanttSegment {
    /// Length of the segment in ticks.
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Append-only log of the segments executed during one run.
///
/// Segments are kept in execution order.
pub struct ExecutionHistory {
    segments: Vec<GanttSegment>,
    capacity: usize,
}

impl ExecutionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            segments: Vec::new(),
            capacity,
        }
    }

    /// Append a segment, failing once `capacity` segments are recorded.
    pub(crate) fn push(&mut self, segment: GanttSegment) -> Result<()> {
        if self.segments.len() >= self.capacity {
            return Err(SimError::CapacityExceeded {
                resource: Resource::ExecutionHistory,
                limit: self.capacity,
            });
        }
        self.segments.push(segment);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.segments.clear();
    }

    /// Iterate over segments in the order they were executed.
    pub fn iter(&self) -> impl Iterator<Item = &GanttSegment> + '_ {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a> IntoIterator for &'a ExecutionHistory {
    type Item = &'a GanttSegment;
    type IntoIter = core::slice::Iter<'a, GanttSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(pid: u32, start: Tick, end: Tick) -> GanttSegment {
        GanttSegment {
            pid: ProcessId(pid),
            start,
            end,
        }
    }

    #[test]
    fn test_keeps_insertion_order() {
        let mut history = ExecutionHistory::new(8);
        history.push(segment(2, 4, 6)).unwrap();
        history.push(segment(1, 0, 4)).unwrap();

        let pids: Vec<u32> = history.iter().map(|s| s.pid.0).collect();
        assert_eq!(pids, vec![2, 1]);
    }

    #[test]
    fn test_capacity_bound() {
        let mut history = ExecutionHistory::new(2);
        history.push(segment(1, 0, 1)).unwrap();
        history.push(segment(1, 1, 2)).unwrap();

        let err = history.push(segment(1, 2, 3)).unwrap_err();
        assert_eq!(
            err,
            SimError::CapacityExceeded {
                resource: Resource::ExecutionHistory,
                limit: 2
            }
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = ExecutionHistory::new(2);
        history.push(segment(1, 0, 3)).unwrap();
        history.clear();
        assert!(history.is_empty());
    }
}
