//! Non-preemptive selection policies.
//!
//! FCFS, SJF and Priority differ only in how the next process is chosen
//! among those that have arrived. Everything else (allocation check,
//! execution, termination, idling) is shared by [`run`].

use core::cmp::Ordering;

use super::Dispatcher;
use crate::error::Result;
use crate::process::{Process, Tick};

/// How the next process is picked among the arrived candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Earliest arrival first (FCFS).
    ArrivalOrder,
    /// Smallest burst time first (SJF).
    ShortestBurst,
    /// Largest priority value first.
    HighestPriority,
}

impl SelectionPolicy {
    /// Order two candidates, best first.
    ///
    /// Equal keys compare `Equal`; the stable sort then keeps table order.
    pub fn compare(self, a: &Process, b: &Process) -> Ordering {
        match self {
            SelectionPolicy::ArrivalOrder => a.arrival_time.cmp(&b.arrival_time),
            SelectionPolicy::ShortestBurst => a.burst_time.cmp(&b.burst_time),
            SelectionPolicy::HighestPriority => b.priority.cmp(&a.priority),
        }
    }

    /// Where the clock goes when no candidate is eligible at `now`.
    ///
    /// FCFS jumps straight to the next arrival. SJF and Priority also land
    /// on the next arrival but always move at least one tick.
    pub fn idle_advance(self, now: Tick, next_arrival: Tick) -> Tick {
        match self {
            SelectionPolicy::ArrivalOrder => next_arrival.max(now),
            SelectionPolicy::ShortestBurst | SelectionPolicy::HighestPriority => {
                next_arrival.max(now.saturating_add(1))
            }
        }
    }
}

/// Run a non-preemptive discipline to completion.
///
/// Each round ranks every arrived, still pending process with `policy` and
/// tries them best first. A candidate only wins once its memory has been
/// allocated; candidates that cannot be allocated are out of the run and the
/// next one is tried. The winner runs its whole burst.
pub(crate) fn run(dispatcher: &mut Dispatcher<'_>, policy: SelectionPolicy) -> Result<()> {
    loop {
        dispatcher.admit_arrivals();

        let now = dispatcher.now();
        let mut candidates: Vec<usize> = (0..dispatcher.len())
            .filter(|&i| {
                let process = dispatcher.process(i);
                process.is_pending() && process.has_arrived(now)
            })
            .collect();
        candidates.sort_by(|&a, &b| policy.compare(dispatcher.process(a), dispatcher.process(b)));

        let winner = candidates
            .into_iter()
            .find(|&index| dispatcher.try_allocate(index));

        if let Some(index) = winner {
            let burst = dispatcher.process(index).remaining_time;
            dispatcher.execute(index, burst)?;
            dispatcher.terminate(index);
            continue;
        }

        let next_arrival = dispatcher
            .processes
            .iter()
            .filter(|p| p.is_pending())
            .map(|p| p.arrival_time)
            .min();

        match next_arrival {
            Some(arrival) => {
                let until = policy.idle_advance(now, arrival);
                dispatcher.idle_until(until);
            }
            None => break,
        }
    }
    Ok(())
}
