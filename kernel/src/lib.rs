//! OSSim Kernel Library
//!
//! A teaching simulator of a uniprocessor kernel: process lifecycle, a
//! first-fit contiguous memory allocator and four CPU scheduling disciplines
//! (FCFS, SJF, Priority and Round Robin).
//!
//! # Usage
//!
//! - Populate a [`Simulation`] with processes and call [`Simulation::save_state`]
//! - Run a discipline; every run restarts from the saved state
//! - Read the returned [`RunReport`] and [`Simulation::events`]
//!
//! ```
//! use ossim_kernel::Simulation;
//!
//! let mut sim = Simulation::default();
//! sim.load_demo_workload().unwrap();
//!
//! let rr = sim.run_round_robin(3).unwrap();
//! let sjf = sim.run_sjf().unwrap();
//! assert_eq!(rr.summary.busy_time, sjf.summary.busy_time);
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod process;
pub mod scheduler;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use config::SimConfig;
pub use error::{Resource, Result, SimError};
pub use memory::{MemoryMap, MemoryRegion, MemoryStats};
pub use metrics::{FailedProcess, ProcessMetrics, RunReport, RunSummary, RunTotals};
pub use process::{Process, ProcessId, ProcessState, ProcessTable, ProcessUpdate, Tick};
pub use scheduler::{Algorithm, ExecutionHistory, GanttSegment, SelectionPolicy, SimEvent};
pub use simulation::Simulation;
