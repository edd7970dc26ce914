//! Run metrics.
//!
//! Derives per-process timing and aggregate statistics from the final
//! state of the process table after a run.

use serde::Serialize;

use crate::process::{Process, ProcessId, ProcessState, Tick};
use crate::scheduler::{Algorithm, GanttSegment};

/// Clock totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    /// Final value of the simulated clock.
    pub total_time: Tick,
    /// Ticks during which some process was executing.
    pub busy_time: Tick,
}

/// Timing of a process that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: ProcessId,
    pub priority: i32,
    pub arrival_time: Tick,
    pub burst_time: Tick,
    pub completion_time: Tick,
    /// `completion_time - arrival_time`
    pub turnaround_time: Tick,
    /// `turnaround_time - burst_time`
    pub waiting_time: Tick,
}

impl ProcessMetrics {
    /// Metrics of a terminated process, `None` for any other state.
    pub fn from_process(process: &Process) -> Option<Self> {
        if process.state != ProcessState::Terminated {
            return None;
        }
        let turnaround_time = process.completion_time.saturating_sub(process.arrival_time);
        Some(Self {
            pid: process.pid,
            priority: process.priority,
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            completion_time: process.completion_time,
            turnaround_time,
            waiting_time: turnaround_time.saturating_sub(process.burst_time),
        })
    }
}

/// A process that did not complete (insufficient memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailedProcess {
    pub pid: ProcessId,
    pub priority: i32,
    pub memory_req: usize,
    /// State the process was left in.
    pub state: ProcessState,
}

impl From<&Process> for FailedProcess {
    fn from(process: &Process) -> Self {
        Self {
            pid: process.pid,
            priority: process.priority,
            memory_req: process.memory_req,
            state: process.state,
        }
    }
}

/// Aggregate statistics over the completed processes of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    /// Percentage in `[0, 100]`.
    pub cpu_utilization: f64,
    pub total_time: Tick,
    pub busy_time: Tick,
}

/// Everything a front end needs to present a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    /// Terminated processes, in table order.
    pub completed: Vec<ProcessMetrics>,
    /// Processes that never completed, in table order.
    pub failed: Vec<FailedProcess>,
    /// Gantt segments in execution order.
    pub history: Vec<GanttSegment>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Build the report of a run from the final process table.
    pub fn new(
        algorithm: Algorithm,
        processes: &[Process],
        history: Vec<GanttSegment>,
        totals: RunTotals,
    ) -> Self {
        let mut completed = Vec::new();
        let mut failed = Vec::new();
        for process in processes {
            match ProcessMetrics::from_process(process) {
                Some(metrics) => completed.push(metrics),
                None => failed.push(FailedProcess::from(process)),
            }
        }

        let summary = summarize(&completed, failed.len(), totals);
        Self {
            algorithm,
            completed,
            failed,
            history,
            summary,
        }
    }

    /// Metrics of `pid`, if it completed.
    pub fn metrics_of(&self, pid: ProcessId) -> Option<&ProcessMetrics> {
        self.completed.iter().find(|m| m.pid == pid)
    }

    pub fn is_failed(&self, pid: ProcessId) -> bool {
        self.failed.iter().any(|f| f.pid == pid)
    }

    /// Gantt segments belonging to `pid`, in execution order.
    pub fn segments_of(&self, pid: ProcessId) -> impl Iterator<Item = &GanttSegment> + '_ {
        self.history.iter().filter(move |s| s.pid == pid)
    }
}

/// Average waiting/turnaround over `completed` plus CPU utilization.
pub fn summarize(completed: &[ProcessMetrics], failed: usize, totals: RunTotals) -> RunSummary {
    let count = completed.len();
    let (avg_waiting, avg_turnaround) = if count == 0 {
        (0.0, 0.0)
    } else {
        let waiting: f64 = completed.iter().map(|m| m.waiting_time as f64).sum();
        let turnaround: f64 = completed.iter().map(|m| m.turnaround_time as f64).sum();
        (waiting / count as f64, turnaround / count as f64)
    };

    RunSummary {
        completed: count,
        failed,
        avg_waiting,
        avg_turnaround,
        cpu_utilization: cpu_utilization(totals.busy_time, totals.total_time),
        total_time: totals.total_time,
        busy_time: totals.busy_time,
    }
}

/// `busy / total * 100`, or 0 when no time elapsed.
pub fn cpu_utilization(busy_time: Tick, total_time: Tick) -> f64 {
    if total_time == 0 {
        return 0.0;
    }
    busy_time as f64 / total_time as f64 * 100.0
}
