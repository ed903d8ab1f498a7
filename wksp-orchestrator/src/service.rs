//! Collaborator contracts consumed by the orchestrator.
//!
//! These traits are the seam between the lifecycle engine and its
//! surroundings: the data service that talks to the server, the notification
//! sink, the confirmation prompt, navigation, and the recently-used event
//! sink. Production shells implement them over HTTP/UI; tests use the
//! in-memory versions in [`crate::mock`].

use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wksp_config::WorkspaceConfig;

use crate::workspace::{CreateAttributes, WorkspaceRecord, WorkspaceStatus, WorkspaceSummary};

/// Error code the server uses for RAM quota violations on start.
pub const RESOURCE_QUOTA_ERROR_CODE: i64 = 10000;

/// Structured attributes attached to a quota violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaAttributes {
    pub workspaces_count: u32,
    /// RAM figures come over the wire as strings, unit split off separately.
    pub used_ram: String,
    pub limit_ram: String,
    pub required_ram: String,
    pub ram_unit: String,
}

/// Failure reported by the data service.
///
/// Mirrors the server's error payload: an HTTP-ish status, an optional
/// application error code, a message, and optional structured attributes.
/// All fields are optional because real backends omit them freely; callers
/// fall back to operation-specific generic messages.
#[derive(Debug, Clone, Default, Error)]
pub struct ServiceError {
    pub status: Option<u16>,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub attributes: Option<QuotaAttributes>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => match self.status {
                Some(status) => write!(f, "request failed with status {}", status),
                None => f.write_str("service request failed"),
            },
        }
    }
}

impl ServiceError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == Some(304)
    }
}

/// Handle on a pending status transition.
///
/// Resolves once the watched workspace is next observed at the target
/// status (immediately if it is already there). There is no built-in
/// timeout; bounding the wait is the implementation's concern.
pub type StatusWatch = BoxFuture<'static, ()>;

/// The HTTP/data layer, seen from the orchestrator.
///
/// `start`/`stop` have command-accepted semantics: an `Ok` means the server
/// took the command, not that the transition completed. Completion is
/// observed through [`DataService::watch_status`].
#[async_trait]
pub trait DataService: Send + Sync {
    /// Fetch summaries of all workspaces visible to the caller.
    async fn fetch_all(&self) -> Result<Vec<WorkspaceSummary>, ServiceError>;

    /// Cache lookup; absent when details were never fetched.
    fn get_by_name(&self, namespace: &str, name: &str) -> Option<WorkspaceRecord>;

    /// Fetch a workspace's details into the cache. A 304 status means the
    /// cache is already current and is treated as success by callers.
    async fn fetch_details(&self, namespace: &str, name: &str) -> Result<(), ServiceError>;

    /// Last observed status; `Unknown` for an unfindable workspace.
    fn get_status(&self, id: &str) -> WorkspaceStatus;

    async fn update(
        &self,
        id: &str,
        config: WorkspaceConfig,
    ) -> Result<WorkspaceConfig, ServiceError>;

    async fn create(
        &self,
        config: WorkspaceConfig,
        attributes: CreateAttributes,
    ) -> Result<WorkspaceRecord, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    async fn start(&self, id: &str) -> Result<(), ServiceError>;

    async fn stop(&self, id: &str) -> Result<(), ServiceError>;

    async fn snapshot(&self, id: &str) -> Result<(), ServiceError>;

    /// Arm a watch for `target` on workspace `id`.
    ///
    /// Implementations must register the waiter before returning, so that a
    /// transition happening between arming and awaiting is not lost. The
    /// orchestrator relies on this to arm both watches of the STARTING
    /// branch before issuing any command.
    fn watch_status(&self, id: &str, target: WorkspaceStatus) -> StatusWatch;
}

/// Toast-style notification sink. Fire-and-forget; never fails the caller.
pub trait Notifier: Send + Sync {
    fn show_info(&self, text: &str);
    fn show_error(&self, text: &str);
}

/// User confirmation dialog. `false` covers rejection and dismissal alike.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Route navigation.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Side-channel for "this workspace was just used" events (recent list).
pub trait WorkspaceEvents: Send + Sync {
    fn recently_used(&self, workspace_id: &str);
}
