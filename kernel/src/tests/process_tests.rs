//! Process Management Unit Tests
//!
//! Tests for process creation, editing, and the save/reset contract.

#[cfg(test)]
mod tests {
    use super::super::simulation_with;
    use crate::{
        ProcessId, ProcessState, ProcessUpdate, Resource, SimConfig, SimError, Simulation,
    };

    // ========================================
    // Creation Tests
    // ========================================

    #[test]
    fn test_create_rejects_duplicate_pid() {
        let mut sim = Simulation::default();
        sim.create_process(ProcessId(1), 0, 3, 0, 10).unwrap();

        let err = sim.create_process(ProcessId(1), 5, 1, 0, 10).unwrap_err();
        assert_eq!(err, SimError::DuplicatePid { pid: ProcessId(1) });
        assert_eq!(sim.processes().len(), 1);
        assert_eq!(sim.process(ProcessId(1)).unwrap().arrival_time, 0);
    }

    #[test]
    fn test_create_respects_table_capacity() {
        let config = SimConfig {
            max_processes: 2,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.create_process(ProcessId(1), 0, 1, 0, 1).unwrap();
        sim.create_process(ProcessId(2), 0, 1, 0, 1).unwrap();

        let err = sim.create_process(ProcessId(3), 0, 1, 0, 1).unwrap_err();
        assert_eq!(
            err,
            SimError::CapacityExceeded {
                resource: Resource::ProcessTable,
                limit: 2
            }
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_default_capacity_is_ten() {
        let mut sim = Simulation::default();
        for pid in 0..10 {
            sim.create_process(ProcessId(pid), 0, 1, 0, 1).unwrap();
        }
        assert!(sim.create_process(ProcessId(10), 0, 1, 0, 1).is_err());
    }

    #[test]
    fn test_default_matches_new_with_default_config() {
        let default = Simulation::default();
        let built = Simulation::new(SimConfig::default()).unwrap();

        assert_eq!(default.config(), built.config());
        assert_eq!(default.table().capacity(), built.table().capacity());
        assert_eq!(default.memory().size(), built.memory().size());
        assert_eq!(default.history().capacity(), built.history().capacity());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            history_capacity: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    // ========================================
    // Delete / Update Tests
    // ========================================

    #[test]
    fn test_delete_unknown_pid() {
        let mut sim = Simulation::default();
        assert_eq!(
            sim.delete_process(ProcessId(4)).unwrap_err(),
            SimError::NotFound { pid: ProcessId(4) }
        );
    }

    #[test]
    fn test_deleted_process_stays_deleted_after_run() {
        let mut sim = simulation_with(1024, &[(1, 0, 3, 0, 1), (2, 0, 3, 0, 1)]);
        sim.delete_process(ProcessId(1)).unwrap();

        let report = sim.run_fcfs().unwrap();
        assert_eq!(report.completed.len(), 1);
        assert!(report.metrics_of(ProcessId(1)).is_none());
        assert!(!report.is_failed(ProcessId(1)));
    }

    #[test]
    fn test_created_process_kept_after_save() {
        let mut sim = simulation_with(1024, &[(1, 0, 3, 0, 1)]);
        sim.create_process(ProcessId(2), 0, 2, 0, 1).unwrap();

        let report = sim.run_fcfs().unwrap();
        assert_eq!(report.completed.len(), 2);
    }

    #[test]
    fn test_update_changes_next_run() {
        let mut sim = simulation_with(1024, &[(1, 0, 3, 0, 1), (2, 0, 5, 0, 1)]);
        sim.update_process(
            ProcessId(2),
            ProcessUpdate {
                burst_time: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        sim.save_state();

        let report = sim.run_sjf().unwrap();
        assert_eq!(report.history[0].pid, ProcessId(2));
        assert_eq!(report.history[0].len(), 1);
    }

    #[test]
    fn test_update_unknown_pid() {
        let mut sim = Simulation::default();
        let err = sim
            .update_process(ProcessId(8), ProcessUpdate::default())
            .unwrap_err();
        assert_eq!(err, SimError::NotFound { pid: ProcessId(8) });
    }

    // ========================================
    // Reset Tests
    // ========================================

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = Simulation::default();
        sim.load_demo_workload().unwrap();
        sim.run_round_robin(2).unwrap();
        assert!(!sim.history().is_empty());

        sim.reset_processes();

        assert!(sim.memory().is_empty());
        assert_eq!(sim.memory().free_cells(), sim.memory().size());
        assert!(sim.history().is_empty());
        assert!(sim.events().is_empty());
        for process in sim.processes() {
            assert_eq!(process.state, ProcessState::New);
            assert_eq!(process.remaining_time, process.burst_time);
            assert_eq!(process.waiting_time, 0);
            assert_eq!(process.turnaround_time, 0);
            assert!(!process.allocation_failed);
        }
    }

    #[test]
    fn test_failure_flag_cleared_between_runs() {
        let mut sim = simulation_with(100, &[(1, 0, 3, 0, 150)]);
        let report = sim.run_fcfs().unwrap();
        assert!(report.is_failed(ProcessId(1)));

        sim.update_process(
            ProcessId(1),
            ProcessUpdate {
                memory_req: Some(80),
                ..Default::default()
            },
        )
        .unwrap();
        let report = sim.run_fcfs().unwrap();
        assert!(!report.is_failed(ProcessId(1)));
        assert_eq!(report.summary.completed, 1);
    }

    #[test]
    fn test_demo_workload() {
        let mut sim = Simulation::default();
        sim.load_demo_workload().unwrap();

        let pids: Vec<u32> = sim.processes().iter().map(|p| p.pid.0).collect();
        assert_eq!(pids, vec![1, 2, 3, 4]);
        assert!(sim.table().has_snapshot());

        // Loading twice collides on every pid.
        assert_eq!(
            sim.load_demo_workload().unwrap_err(),
            SimError::DuplicatePid { pid: ProcessId(1) }
        );
    }
}
