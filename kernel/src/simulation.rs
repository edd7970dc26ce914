//! Simulation context.
//!
//! A [`Simulation`] owns every piece of simulated machine state: the
//! process table, main memory, the execution history and the event log.
//! It is the only entry point a front end needs.

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::memory::MemoryMap;
use crate::metrics::RunReport;
use crate::process::{self, Process, ProcessId, ProcessTable, ProcessUpdate, Tick};
use crate::scheduler::{self, Algorithm, Dispatcher, EventLog, ExecutionHistory, SimEvent};

/// One simulated uniprocessor machine.
///
/// ```
/// use ossim_kernel::{ProcessId, Simulation};
///
/// let mut sim = Simulation::default();
/// sim.create_process(ProcessId(1), 0, 8, 2, 200).unwrap();
/// sim.create_process(ProcessId(2), 1, 4, 3, 200).unwrap();
/// sim.save_state();
///
/// let report = sim.run_fcfs().unwrap();
/// assert_eq!(report.summary.total_time, 12);
/// ```
pub struct Simulation {
    config: SimConfig,
    table: ProcessTable,
    memory: MemoryMap,
    history: ExecutionHistory,
    events: EventLog,
}

impl Simulation {
    /// Create an empty machine with the given limits.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SimConfig) -> Self {
        log::info!(
            "[SIM] Machine created: {} process slots, {} memory cells",
            config.max_processes,
            config.memory_size
        );
        Self {
            config,
            table: ProcessTable::new(config.max_processes),
            memory: MemoryMap::new(config.memory_size),
            history: ExecutionHistory::new(config.history_capacity),
            events: EventLog::new(),
        }
    }

    /// Add a process to the table.
    pub fn create_process(
        &mut self,
        pid: ProcessId,
        arrival_time: Tick,
        burst_time: Tick,
        priority: i32,
        memory_req: usize,
    ) -> Result<ProcessId> {
        self.table.insert(Process::new(
            pid,
            arrival_time,
            burst_time,
            priority,
            memory_req,
        ))
    }

    /// Remove a process from the table.
    pub fn delete_process(&mut self, pid: ProcessId) -> Result<Process> {
        self.memory.free(pid);
        self.table.remove(pid)
    }

    /// Change static attributes of a process.
    pub fn update_process(&mut self, pid: ProcessId, update: ProcessUpdate) -> Result<()> {
        self.table.update(pid, update)
    }

    /// Load the bundled sample workload and save it.
    pub fn load_demo_workload(&mut self) -> Result<()> {
        for process in process::demo_workload() {
            self.table.insert(process)?;
        }
        self.save_state();
        Ok(())
    }

    /// Remember the current table as the state every run starts from.
    pub fn save_state(&mut self) {
        self.table.save_state();
        log::debug!("[SIM] Saved state of {} processes", self.table.len());
    }

    /// Restore the saved table and wipe memory, history and events.
    pub fn reset_processes(&mut self) {
        self.table.restore();
        self.memory.clear();
        self.history.clear();
        self.events.clear();
    }

    pub fn run_fcfs(&mut self) -> Result<RunReport> {
        self.run(Algorithm::Fcfs)
    }

    pub fn run_sjf(&mut self) -> Result<RunReport> {
        self.run(Algorithm::Sjf)
    }

    pub fn run_priority(&mut self) -> Result<RunReport> {
        self.run(Algorithm::Priority)
    }

    pub fn run_round_robin(&mut self, quantum: Tick) -> Result<RunReport> {
        self.run(Algorithm::RoundRobin { quantum })
    }

    /// Run `algorithm` to completion from a fresh reset.
    ///
    /// A zero round-robin quantum is rejected before any state is touched.
    pub fn run(&mut self, algorithm: Algorithm) -> Result<RunReport> {
        if let Algorithm::RoundRobin { quantum: 0 } = algorithm {
            return Err(SimError::InvalidQuantum { quantum: 0 });
        }

        self.reset_processes();

        let totals = {
            let mut dispatcher = Dispatcher::new(
                self.table.processes_mut(),
                &mut self.memory,
                &mut self.history,
                &mut self.events,
            );
            scheduler::run(&mut dispatcher, algorithm)?;
            dispatcher.totals()
        };

        let report = RunReport::new(
            algorithm,
            self.table.processes(),
            self.history.iter().copied().collect(),
            totals,
        );
        log::info!(
            "[SIM] {} done: {} completed, {} failed, avg wait {:.2}, avg turnaround {:.2}, cpu {:.1}%",
            algorithm,
            report.summary.completed,
            report.summary.failed,
            report.summary.avg_waiting,
            report.summary.avg_turnaround,
            report.summary.cpu_utilization
        );
        Ok(report)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Processes in table order.
    pub fn processes(&self) -> &[Process] {
        self.table.processes()
    }

    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.table.get(pid)
    }

    pub fn memory(&self) -> &MemoryMap {
        &self.memory
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    /// Events recorded since the last reset.
    pub fn events(&self) -> &[SimEvent] {
        self.events.as_slice()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_valid_config(SimConfig::default())
    }
}
