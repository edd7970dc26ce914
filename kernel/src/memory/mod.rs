//! Memory management subsystem.
//!
//! This module provides the simulated main memory of the machine.
//!
//! # Components
//!
//! - **MemoryMap**: Fixed-size cell array with first-fit contiguous allocation
//! - **MemoryRegion**: Run-length view of the map for reporting

pub mod first_fit;

pub use first_fit::{MemoryMap, MemoryRegion, MemoryStats};
