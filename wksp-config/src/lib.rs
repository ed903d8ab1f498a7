//! Workspace configuration model and supporting logic.
//!
//! This crate owns the `WorkspaceConfig` tree (environments, recipes,
//! machines), change detection between a baseline and a working draft,
//! recipe-type-specific environment normalization, and unique workspace
//! name generation. It knows nothing about runtime status or network
//! collaborators; that lives in `wksp-orchestrator`.

pub mod config;
pub mod diff;
pub mod environment;
pub mod name;

mod test_memory;

pub use config::{Environment, Machine, MachineAttributes, Recipe, WorkspaceConfig};
pub use environment::{
    normalize, EnvironmentManager, EnvironmentRegistry, DEFAULT_MACHINE_MEMORY_BYTES,
    MIN_MACHINE_MEMORY_BYTES,
};
