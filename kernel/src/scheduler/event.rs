//! Scheduling events.
//!
//! Every state change made by a run is recorded as a [`SimEvent`] so that a
//! front end can replay or render the run. Each recorded event is also
//! forwarded to the `log` facade.

use core::fmt;

use serde::Serialize;

use super::Algorithm;
use crate::process::{ProcessId, ProcessState, Tick};

/// Scheduling event for the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// A run began
    RunStarted { algorithm: Algorithm },
    /// A process moved between lifecycle states
    Transition {
        time: Tick,
        pid: ProcessId,
        from: ProcessState,
        to: ProcessState,
    },
    /// A process could not be given memory and is out of the run
    AllocationFailed {
        time: Tick,
        pid: ProcessId,
        requested: usize,
    },
    /// The CPU sat idle over `from..to`
    Idle { from: Tick, to: Tick },
    /// A run ended
    RunFinished { time: Tick, busy_time: Tick },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::RunStarted { algorithm } => write!(f, "run started: {}", algorithm),
            SimEvent::Transition { time, pid, from, to } => {
                write!(f, "t={} process {}: {} -> {}", time, pid, from, to)
            }
            SimEvent::AllocationFailed {
                time,
                pid,
                requested,
            } => write!(
                f,
                "t={} process {}: no memory for {} cells",
                time, pid, requested
            ),
            SimEvent::Idle { from, to } => write!(f, "t={}..{} idle", from, to),
            SimEvent::RunFinished { time, busy_time } => {
                write!(f, "t={} run finished (busy {})", time, busy_time)
            }
        }
    }
}

/// Events of the current run, in emission order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: SimEvent) {
        match &event {
            SimEvent::AllocationFailed { .. } => log::warn!("[SCHED] {}", event),
            SimEvent::RunStarted { .. } | SimEvent::RunFinished { .. } => {
                log::info!("[SCHED] {}", event)
            }
            _ => log::debug!("[SCHED] {}", event),
        }

        // Back-to-back idle ticks collapse into one span.
        if let SimEvent::Idle { from, to } = &event {
            if let Some(SimEvent::Idle { to: last_to, .. }) = self.events.last_mut() {
                if *last_to == *from {
                    *last_to = *to;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub fn as_slice(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
