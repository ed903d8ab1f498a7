use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use wksp_config::WorkspaceConfig;

use crate::workspace::WorkspaceRecord;

/// Mutable state of one workspace editing session.
///
/// Owns the two config copies the editor works on: `baseline` is the last
/// state the server acknowledged, `draft` is what the user is editing.
/// Cancel discards the draft by overwriting it from the baseline; a
/// successful persist replaces the baseline with the server's response. The
/// session is dropped when navigation leaves the editor.
///
/// Runtime status is deliberately not stored here; it is derived on demand
/// from the data service so the session can never disagree with the backend.
#[derive(Debug)]
pub struct WorkspaceSession {
    pub id: String,
    pub namespace: String,
    /// Name as last persisted.
    pub name: String,
    /// Staged rename, surfaced before other edits reach the draft.
    pub new_name: String,

    pub baseline: WorkspaceConfig,
    pub draft: WorkspaceConfig,

    /// True while the draft differs from the baseline.
    pub edit_mode: bool,
    /// Whether the "apply will restart the workspace" banner is showing.
    pub show_apply_banner: bool,
    /// Message from the last failed start, kept for display.
    pub last_error: Option<String>,

    /// True for a workspace that does not exist on the server yet.
    pub create_mode: bool,

    /// Set while an apply sequence is running; shared so the sequence can
    /// clear it even when its future is dropped mid-flight.
    pub(crate) apply_in_flight: Arc<AtomicBool>,
}

impl WorkspaceSession {
    /// Session for editing a fetched workspace.
    pub fn for_existing(record: &WorkspaceRecord) -> Self {
        Self {
            id: record.id.clone(),
            namespace: record.namespace.clone(),
            name: record.config.name.clone(),
            new_name: record.config.name.clone(),
            baseline: record.config.clone(),
            draft: record.config.clone(),
            edit_mode: false,
            show_apply_banner: false,
            last_error: None,
            create_mode: false,
            apply_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Session for a workspace being created; no server identity yet.
    pub fn for_create(name: String, config: WorkspaceConfig) -> Self {
        Self {
            id: String::new(),
            namespace: String::new(),
            name: name.clone(),
            new_name: name,
            baseline: config.clone(),
            draft: config,
            edit_mode: false,
            show_apply_banner: false,
            last_error: None,
            create_mode: true,
            apply_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overwrite the draft from the baseline.
    pub fn discard_draft(&mut self) {
        self.draft = self.baseline.clone();
        self.new_name = self.baseline.name.clone();
    }

    /// Take the server's authoritative config after a successful persist.
    pub fn accept_persisted(&mut self, config: WorkspaceConfig) {
        self.name = config.name.clone();
        self.new_name = config.name.clone();
        self.baseline = config.clone();
        self.draft = config;
    }
}
