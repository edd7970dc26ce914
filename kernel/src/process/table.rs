//! Process Table
//!
//! Holds the canonical process descriptors of a simulation together with
//! the snapshot used to restore them before each scheduling run.

use serde::Serialize;

use crate::error::{Resource, Result, SimError};

/// Simulated time in ticks.
pub type Tick = u64;

/// Process ID type
///
/// Process IDs are assigned by the caller, not generated by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ProcessId {
    fn from(raw: u32) -> Self {
        ProcessId(raw)
    }
}

impl core::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    /// Created, not yet admitted
    New,
    /// Admitted and waiting for the CPU
    Ready,
    /// Currently executing
    Running,
    /// All CPU demand consumed
    Terminated,
}

impl ProcessState {
    /// Whether `self -> next` is a legal lifecycle edge.
    ///
    /// `Running -> Ready` is only taken by preemptive policies.
    pub fn can_transition_to(self, next: ProcessState) -> bool {
        matches!(
            (self, next),
            (ProcessState::New, ProcessState::Ready)
                | (ProcessState::Ready, ProcessState::Running)
                | (ProcessState::Running, ProcessState::Terminated)
                | (ProcessState::Running, ProcessState::Ready)
        )
    }
}

impl core::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Terminated => "TERMINATED",
        };
        f.write_str(label)
    }
}

/// Process control block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    /// Process ID
    pub pid: ProcessId,
    /// Time of arrival
    pub arrival_time: Tick,
    /// Total CPU time needed
    pub burst_time: Tick,
    /// Higher value = more urgent
    pub priority: i32,
    /// Memory cells required
    pub memory_req: usize,
    /// Lifecycle state
    pub state: ProcessState,
    /// CPU time still owed (preemptive policies)
    pub remaining_time: Tick,
    pub completion_time: Tick,
    pub waiting_time: Tick,
    pub turnaround_time: Tick,
    /// Set when the process could not be given memory during the current run.
    pub allocation_failed: bool,
}

impl Process {
    /// Create a new process in the `New` state
    pub fn new(
        pid: ProcessId,
        arrival_time: Tick,
        burst_time: Tick,
        priority: i32,
        memory_req: usize,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            priority,
            memory_req,
            state: ProcessState::New,
            remaining_time: burst_time,
            completion_time: 0,
            waiting_time: 0,
            turnaround_time: 0,
            allocation_failed: false,
        }
    }

    /// Clear all run-time bookkeeping, keeping the static attributes.
    pub fn reset(&mut self) {
        self.state = ProcessState::New;
        self.remaining_time = self.burst_time;
        self.completion_time = 0;
        self.waiting_time = 0;
        self.turnaround_time = 0;
        self.allocation_failed = false;
    }

    /// Whether the process has arrived by `now`
    pub fn has_arrived(&self, now: Tick) -> bool {
        self.arrival_time <= now
    }

    /// Still waiting for a dispatch in the current run.
    pub fn is_pending(&self) -> bool {
        !self.allocation_failed
            && matches!(self.state, ProcessState::New | ProcessState::Ready)
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }

    /// Mark the process as terminated at `now` and derive its timing metrics.
    pub fn terminate(&mut self, now: Tick) {
        self.state = ProcessState::Terminated;
        self.remaining_time = 0;
        self.completion_time = now;
        self.turnaround_time = now.saturating_sub(self.arrival_time);
        self.waiting_time = self.turnaround_time.saturating_sub(self.burst_time);
    }
}

/// Partial update of a process' static attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessUpdate {
    pub arrival_time: Option<Tick>,
    pub burst_time: Option<Tick>,
    pub priority: Option<i32>,
    pub memory_req: Option<usize>,
}

impl ProcessUpdate {
    fn apply(&self, process: &mut Process) {
        if let Some(arrival) = self.arrival_time {
            process.arrival_time = arrival;
        }
        if let Some(burst) = self.burst_time {
            process.burst_time = burst;
        }
        if let Some(priority) = self.priority {
            process.priority = priority;
        }
        if let Some(memory) = self.memory_req {
            process.memory_req = memory;
        }
        process.reset();
    }
}

/// Bounded table of process descriptors
pub struct ProcessTable {
    /// Canonical descriptors in insertion order
    processes: Vec<Process>,
    /// Copy taken by `save_state`; `None` once the table was edited since.
    snapshot: Option<Vec<Process>>,
    /// Maximum number of processes
    capacity: usize,
}

impl ProcessTable {
    /// Create a new empty process table
    pub fn new(capacity: usize) -> Self {
        Self {
            processes: Vec::with_capacity(capacity),
            snapshot: None,
            capacity,
        }
    }

    /// Add a new process
    ///
    /// Invalidates the snapshot like every other edit, so a reset before the
    /// next `save_state` keeps the new process.
    pub fn insert(&mut self, process: Process) -> Result<ProcessId> {
        if self.contains(process.pid) {
            return Err(SimError::DuplicatePid { pid: process.pid });
        }
        if self.processes.len() >= self.capacity {
            return Err(SimError::CapacityExceeded {
                resource: Resource::ProcessTable,
                limit: self.capacity,
            });
        }

        let pid = process.pid;
        self.processes.push(process);
        self.invalidate_snapshot();
        log::debug!("[PROC] Created process {}", pid);
        Ok(pid)
    }

    /// Remove a process
    pub fn remove(&mut self, pid: ProcessId) -> Result<Process> {
        let index = self.index_of(pid).ok_or(SimError::NotFound { pid })?;
        self.invalidate_snapshot();
        log::debug!("[PROC] Deleted process {}", pid);
        Ok(self.processes.remove(index))
    }

    /// Apply `update` to a process, resetting its run-time fields.
    pub fn update(&mut self, pid: ProcessId, update: ProcessUpdate) -> Result<()> {
        let index = self.index_of(pid).ok_or(SimError::NotFound { pid })?;
        update.apply(&mut self.processes[index]);
        self.invalidate_snapshot();
        log::debug!("[PROC] Updated process {}", pid);
        Ok(())
    }

    /// Copy the canonical descriptors into the snapshot.
    pub fn save_state(&mut self) {
        self.snapshot = Some(self.processes.clone());
    }

    /// Restore the snapshot and clear all run-time fields.
    ///
    /// Without a valid snapshot the canonical descriptors are reset in place.
    pub fn restore(&mut self) {
        match &self.snapshot {
            Some(snapshot) => self.processes.clone_from(snapshot),
            None => log::warn!("[PROC] No saved state, resetting descriptors in place"),
        }
        for process in &mut self.processes {
            process.reset();
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Get a process by PID
    pub fn get(&self, pid: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        self.get(pid).is_some()
    }

    /// All processes in insertion order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub(crate) fn processes_mut(&mut self) -> &mut [Process] {
        &mut self.processes
    }

    /// Get count of processes
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn index_of(&self, pid: ProcessId) -> Option<usize> {
        self.processes.iter().position(|p| p.pid == pid)
    }

    fn invalidate_snapshot(&mut self) {
        if self.snapshot.take().is_some() {
            log::debug!("[PROC] Saved state invalidated");
        }
    }
}
