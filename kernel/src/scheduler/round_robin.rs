//! Round-robin scheduler policy.
//!
//! Every process is loaded into memory once, before the first pass. The
//! table is then walked repeatedly in insertion order and each ready,
//! arrived process gets at most one quantum per pass.

use super::Dispatcher;
use crate::error::Result;
use crate::process::{ProcessState, Tick};

/// Run round robin with time quantum `quantum` (must be non-zero).
pub(crate) fn run(dispatcher: &mut Dispatcher<'_>, quantum: Tick) -> Result<()> {
    debug_assert!(quantum > 0);
    load_all(dispatcher);

    while has_ready(dispatcher) {
        let mut worked = false;

        for index in 0..dispatcher.len() {
            let process = dispatcher.process(index);
            if process.state != ProcessState::Ready || !process.has_arrived(dispatcher.now()) {
                continue;
            }

            let slice = process.remaining_time.min(quantum);
            worked = true;
            dispatcher.execute(index, slice)?;

            if dispatcher.process(index).remaining_time == 0 {
                dispatcher.terminate(index);
            } else {
                dispatcher.preempt(index);
            }
        }

        if !worked {
            if let Some(next) = next_ready_arrival(dispatcher) {
                dispatcher.idle_until(next);
            }
        }
    }
    Ok(())
}

/// Allocate memory for every process up front, in table order.
///
/// Processes that fit become `Ready` regardless of arrival time; the rest
/// stay `New` and never run.
fn load_all(dispatcher: &mut Dispatcher<'_>) {
    for index in 0..dispatcher.len() {
        if dispatcher.try_allocate(index) {
            dispatcher.transition(index, ProcessState::Ready);
        }
    }
    log::debug!(
        "[SCHED] Round robin loaded, {} cells free",
        dispatcher.memory.free_cells()
    );
}

/// Earliest arrival among the `Ready` processes still waiting to arrive.
fn next_ready_arrival(dispatcher: &Dispatcher<'_>) -> Option<Tick> {
    dispatcher
        .processes
        .iter()
        .filter(|p| p.state == ProcessState::Ready)
        .map(|p| p.arrival_time)
        .min()
}

fn has_ready(dispatcher: &Dispatcher<'_>) -> bool {
    dispatcher
        .processes
        .iter()
        .any(|p| p.state == ProcessState::Ready)
}
