//! Scheduler engine.
//!
//! This module drives one simulated run over the process table. Time is a
//! logical clock that only moves forward; a single control loop makes every
//! dispatch decision, so no locking is involved.
//!
//! # Policies
//!
//! - **FCFS**, **SJF** and **Priority** are non-preemptive and share one
//!   selection loop parameterised by a [`SelectionPolicy`].
//! - **Round Robin** is preemptive and uses its own pass-based loop.
//!
//! [`SelectionPolicy`]: policy::SelectionPolicy

pub mod event;
pub mod history;
pub mod policy;
pub mod round_robin;

use core::fmt;

use serde::Serialize;

use crate::error::{Result, SimError};
use crate::memory::MemoryMap;
use crate::metrics::RunTotals;
use crate::process::{Process, ProcessState, Tick};

pub use event::{EventLog, SimEvent};
pub use history::{ExecutionHistory, GanttSegment};
pub use policy::SelectionPolicy;

/// Scheduling discipline for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Algorithm {
    /// First come, first served.
    Fcfs,
    /// Shortest job first (non-preemptive).
    Sjf,
    /// Highest priority first (non-preemptive).
    Priority,
    /// Round robin with a fixed time quantum.
    RoundRobin { quantum: Tick },
}

impl Algorithm {
    /// Selection policy for the non-preemptive disciplines.
    pub fn selection_policy(self) -> Option<SelectionPolicy> {
        match self {
            Algorithm::Fcfs => Some(SelectionPolicy::ArrivalOrder),
            Algorithm::Sjf => Some(SelectionPolicy::ShortestBurst),
            Algorithm::Priority => Some(SelectionPolicy::HighestPriority),
            Algorithm::RoundRobin { .. } => None,
        }
    }

    pub fn is_preemptive(self) -> bool {
        matches!(self, Algorithm::RoundRobin { .. })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fcfs => f.write_str("FCFS"),
            Algorithm::Sjf => f.write_str("SJF"),
            Algorithm::Priority => f.write_str("Priority"),
            Algorithm::RoundRobin { quantum } => write!(f, "Round Robin (quantum {})", quantum),
        }
    }
}

/// Drive one complete run of `algorithm`.
///
/// The caller is responsible for resetting the table, memory and history
/// beforehand and for validating the quantum.
pub(crate) fn run(dispatcher: &mut Dispatcher<'_>, algorithm: Algorithm) -> Result<()> {
    dispatcher.events.record(SimEvent::RunStarted { algorithm });

    match algorithm {
        Algorithm::RoundRobin { quantum } => round_robin::run(dispatcher, quantum)?,
        Algorithm::Fcfs | Algorithm::Sjf | Algorithm::Priority => {
            if let Some(policy) = algorithm.selection_policy() {
                policy::run(dispatcher, policy)?;
            }
        }
    }

    dispatcher.events.record(SimEvent::RunFinished {
        time: dispatcher.now,
        busy_time: dispatcher.busy,
    });
    Ok(())
}

/// Mutable view of a simulation for the duration of one run.
///
/// Owns the virtual clock and the busy-time accumulator, and performs every
/// state transition so that each one is checked and recorded exactly once.
pub(crate) struct Dispatcher<'a> {
    processes: &'a mut [Process],
    memory: &'a mut MemoryMap,
    history: &'a mut ExecutionHistory,
    events: &'a mut EventLog,
    /// Current simulated time.
    now: Tick,
    /// Ticks spent executing processes.
    busy: Tick,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        processes: &'a mut [Process],
        memory: &'a mut MemoryMap,
        history: &'a mut ExecutionHistory,
        events: &'a mut EventLog,
    ) -> Self {
        Self {
            processes,
            memory,
            history,
            events,
            now: 0,
            busy: 0,
        }
    }

    pub(crate) fn now(&self) -> Tick {
        self.now
    }

    pub(crate) fn totals(&self) -> RunTotals {
        RunTotals {
            total_time: self.now,
            busy_time: self.busy,
        }
    }

    fn process(&self, index: usize) -> &Process {
        &self.processes[index]
    }

    fn len(&self) -> usize {
        self.processes.len()
    }

    fn transition(&mut self, index: usize, to: ProcessState) {
        let process = &mut self.processes[index];
        let from = process.state;
        debug_assert!(
            from.can_transition_to(to),
            "illegal transition {} -> {} for process {}",
            from,
            to,
            process.pid
        );
        process.state = to;

        let pid = process.pid;
        self.events.record(SimEvent::Transition {
            time: self.now,
            pid,
            from,
            to,
        });
    }

    /// Move every arrived `New` process to `Ready`.
    fn admit_arrivals(&mut self) {
        for index in 0..self.len() {
            let process = self.process(index);
            if process.state == ProcessState::New
                && !process.allocation_failed
                && process.has_arrived(self.now)
            {
                self.transition(index, ProcessState::Ready);
            }
        }
    }

    /// Give the process its memory, or take it out of the run.
    ///
    /// On success the allocation is kept for the dispatch that follows.
    fn try_allocate(&mut self, index: usize) -> bool {
        let process = &self.processes[index];
        match self.memory.allocate(process) {
            Ok(_) => true,
            Err(err) => {
                log::trace!("[SCHED] {}", err);
                let process = &mut self.processes[index];
                process.allocation_failed = true;
                let (pid, requested) = (process.pid, process.memory_req);
                self.events.record(SimEvent::AllocationFailed {
                    time: self.now,
                    pid,
                    requested,
                });
                false
            }
        }
    }

    /// Run a `Ready` process for `slice` ticks.
    ///
    /// The process is left `Running`; the caller decides whether it
    /// terminates or is preempted.
    fn execute(&mut self, index: usize, slice: Tick) -> Result<()> {
        self.transition(index, ProcessState::Running);

        let start = self.now;
        let process = &mut self.processes[index];
        let slice = slice.min(process.remaining_time);
        let end = start.checked_add(slice).ok_or(SimError::ClockOverflow {
            pid: process.pid,
            now: start,
            ticks: slice,
        })?;
        if slice > 0 {
            self.history.push(GanttSegment {
                pid: process.pid,
                start,
                end,
            })?;
        }

        // busy <= now, so it cannot overflow once `end` fits.
        process.remaining_time -= slice;
        self.now = end;
        self.busy += slice;
        Ok(())
    }

    /// Retire a `Running` process whose burst is fully consumed.
    fn terminate(&mut self, index: usize) {
        self.transition(index, ProcessState::Terminated);

        let now = self.now;
        let process = &mut self.processes[index];
        process.terminate(now);
        let pid = process.pid;
        self.memory.free(pid);
    }

    /// Return a `Running` process with work left to the ready set.
    fn preempt(&mut self, index: usize) {
        self.transition(index, ProcessState::Ready);
    }

    /// Advance the clock with the CPU idle.
    fn idle_until(&mut self, until: Tick) {
        if until <= self.now {
            return;
        }
        self.events.record(SimEvent::Idle {
            from: self.now,
            to: until,
        });
        self.now = until;
    }
}
