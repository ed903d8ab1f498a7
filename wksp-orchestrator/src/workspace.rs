use std::fmt;

use serde::{Deserialize, Serialize};
use wksp_config::WorkspaceConfig;

/// Observed runtime status of a workspace.
///
/// `Unknown` is the status of a workspace not yet resolved (e.g. during
/// creation) or unfindable. Transitions are driven by the backend; the
/// orchestrator only ever observes them through status watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
    Error,
    #[default]
    Unknown,
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkspaceStatus::Stopped => "STOPPED",
            WorkspaceStatus::Starting => "STARTING",
            WorkspaceStatus::Running => "RUNNING",
            WorkspaceStatus::Stopping => "STOPPING",
            WorkspaceStatus::Error => "ERROR",
            WorkspaceStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// The server's authoritative workspace object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    pub id: String,
    pub namespace: String,
    pub config: WorkspaceConfig,
    #[serde(default)]
    pub status: WorkspaceStatus,
}

/// Listing entry, enough to populate the workspace list and the used-name
/// set for name generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub id: String,
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub status: WorkspaceStatus,
}

/// Extra attributes sent alongside a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
}
