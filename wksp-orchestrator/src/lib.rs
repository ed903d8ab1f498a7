//! Workspace lifecycle orchestration business logic.
//!
//! This crate contains the core logic for editing a workspace's
//! configuration while it runs: deciding, from the workspace's observed
//! status, what sequence of stop/update/start operations a configuration
//! change requires, waiting on asynchronous status transitions, and
//! surfacing failures without corrupting the editing session. It is consumed
//! by UI shells or HTTP services through the collaborator traits in
//! [`service`]; an in-memory [`mock`] implementation backs the tests.

pub mod error;
pub mod forms;
pub mod mock;
pub mod orchestrator;
pub mod service;
pub mod session;
pub mod stacks;
pub mod workspace;

pub use error::{OrchestratorError, Result};
pub use forms::{FormHandle, FormRegistry};
pub use orchestrator::LifecycleOrchestrator;
pub use service::{
    ConfirmationPrompt, DataService, Navigator, Notifier, QuotaAttributes, ServiceError,
    StatusWatch, WorkspaceEvents, RESOURCE_QUOTA_ERROR_CODE,
};
pub use session::WorkspaceSession;
pub use stacks::{SourceDescriptor, Stack, StackSelector, StackSource};
pub use workspace::{CreateAttributes, WorkspaceRecord, WorkspaceStatus, WorkspaceSummary};
