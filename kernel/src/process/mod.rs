//! Process Management
//!
//! This module provides the process control block, its lifecycle states
//! and the bounded process table with save/restore support.

pub mod table;

pub use table::{Process, ProcessId, ProcessState, ProcessTable, ProcessUpdate, Tick};

/// The sample workload shipped with the simulator.
///
/// Four processes arriving one tick apart with mixed bursts, priorities and
/// memory demands: `(pid, arrival, burst, priority, memory)`.
pub fn demo_workload() -> [Process; 4] {
    [
        Process::new(ProcessId(1), 0, 8, 2, 200),
        Process::new(ProcessId(2), 1, 4, 3, 200),
        Process::new(ProcessId(3), 2, 9, 1, 300),
        Process::new(ProcessId(4), 3, 5, 2, 100),
    ]
}
