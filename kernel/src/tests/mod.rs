//! Simulator Scenario Tests
//!
//! End-to-end tests driving whole runs through [`crate::Simulation`].

mod process_tests;

use crate::{ProcessId, SimConfig, Simulation, Tick};

/// Build a saved simulation from `(pid, arrival, burst, priority, memory)` rows.
fn simulation_with(memory_size: usize, rows: &[(u32, Tick, Tick, i32, usize)]) -> Simulation {
    let config = SimConfig {
        memory_size,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    for &(pid, arrival, burst, priority, memory) in rows {
        sim.create_process(ProcessId(pid), arrival, burst, priority, memory)
            .unwrap();
    }
    sim.save_state();
    sim
}
