//! Simulator configuration.
//!
//! This module contains the default limits of the simulated machine and
//! the [`SimConfig`] value that carries them into a [`Simulation`].
//! Values here affect table capacity, memory layout and history length.
//!
//! [`Simulation`]: crate::Simulation

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Maximum number of processes in the process table.
pub const MAX_PROCESSES: usize = 10;

/// Size of the simulated address space in cells (1 cell = 1 MB).
pub const MEMORY_SIZE: usize = 1024;

/// Maximum number of Gantt segments recorded for one run.
pub const HISTORY_CAPACITY: usize = 1024;

/// Runtime configuration of a simulation.
///
/// Every field falls back to its compile-time default when missing from
/// a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Process table capacity.
    pub max_processes: usize,
    /// Address space size in cells.
    pub memory_size: usize,
    /// Execution history capacity in segments.
    pub history_capacity: usize,
}

impl SimConfig {
    /// Parse a configuration from TOML text.
    ///
    /// ```
    /// use ossim_kernel::SimConfig;
    ///
    /// let config = SimConfig::from_toml_str("memory_size = 256").unwrap();
    /// assert_eq!(config.memory_size, 256);
    /// assert_eq!(config.max_processes, ossim_kernel::config::MAX_PROCESSES);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimConfig =
            toml::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits the simulator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_processes == 0 {
            return Err(SimError::InvalidConfig("max_processes must be non-zero".into()));
        }
        if self.memory_size == 0 {
            return Err(SimError::InvalidConfig("memory_size must be non-zero".into()));
        }
        if self.history_capacity == 0 {
            return Err(SimError::InvalidConfig("history_capacity must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_processes: MAX_PROCESSES,
            memory_size: MEMORY_SIZE,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimConfig::default();
        assert_eq!(config.max_processes, MAX_PROCESSES);
        assert_eq!(config.memory_size, MEMORY_SIZE);
        assert_eq!(config.history_capacity, HISTORY_CAPACITY);
    }

    #[test]
    fn test_partial_toml() {
        let config = SimConfig::from_toml_str("max_processes = 32\nhistory_capacity = 64\n").unwrap();
        assert_eq!(config.max_processes, 32);
        assert_eq!(config.memory_size, MEMORY_SIZE);
        assert_eq!(config.history_capacity, 64);
    }

    #[test]
    fn test_rejects_zero_memory() {
        let err = SimConfig::from_toml_str("memory_size = 0").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(SimConfig::from_toml_str("quantum = 3").is_err());
    }
}
