use core::fmt;

use crate::process::ProcessId;

/// Crate-wide result type.
pub type Result<T> = core::result::Result<T, SimError>;

/// Bounded resource that can run out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    ProcessTable,
    ExecutionHistory,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::ProcessTable => f.write_str("process table"),
            Resource::ExecutionHistory => f.write_str("execution history"),
        }
    }
}

/// All errors produced by the simulator.
///
/// Variants are split into two categories:
/// - **Local errors**: the caller (or the running scheduler) can route around them
/// - **Fatal errors**: the requested operation is aborted before or during a run
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    // ── Local errors ─────────────────────────────────────────────────

    #[error("Process {pid} already exists")]
    DuplicatePid { pid: ProcessId },

    #[error("{resource} is full ({limit} entries)")]
    CapacityExceeded { resource: Resource, limit: usize },

    #[error("Process {pid} not found")]
    NotFound { pid: ProcessId },

    #[error("Process {pid} needs {requested} contiguous cells, largest free block is {largest_free}")]
    MemoryAllocationFailure {
        pid: ProcessId,
        requested: usize,
        largest_free: usize,
    },

    // ── Fatal errors ─────────────────────────────────────────────────

    #[error("Invalid time quantum: {quantum} (must be > 0)")]
    InvalidQuantum { quantum: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Clock overflow: process {pid} cannot run {ticks} ticks from t={now}")]
    ClockOverflow { pid: ProcessId, now: u64, ticks: u64 },
}

impl SimError {
    /// Whether this error aborts the operation that produced it.
    ///
    /// A full execution history also aborts the run it occurred in; a full
    /// process table only rejects the insertion.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidQuantum { .. } | Self::InvalidConfig(_) | Self::ClockOverflow { .. } => true,
            Self::CapacityExceeded { resource, .. } => *resource == Resource::ExecutionHistory,
            Self::DuplicatePid { .. } | Self::NotFound { .. } | Self::MemoryAllocationFailure { .. } => {
                false
            }
        }
    }
}
