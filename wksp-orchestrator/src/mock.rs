//! In-memory collaborator implementations for tests.
//!
//! `MockDataService` keeps workspace records in a map, records every command
//! it accepts, and drives status watches through `tokio::sync::watch`
//! channels so tests can script backend transitions. Failures are injected
//! per operation. The remaining mocks record what the orchestrator asked of
//! them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;
use wksp_config::WorkspaceConfig;

use crate::service::{
    ConfirmationPrompt, DataService, Navigator, Notifier, ServiceError, StatusWatch,
    WorkspaceEvents,
};
use crate::workspace::{CreateAttributes, WorkspaceRecord, WorkspaceStatus, WorkspaceSummary};

/// A command the mock service accepted, in acceptance order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    Start(String),
    Stop(String),
    Update { id: String, config: WorkspaceConfig },
    Create { name: String },
    Delete(String),
    Snapshot(String),
}

impl MockCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            MockCommand::Start(_) => "start",
            MockCommand::Stop(_) => "stop",
            MockCommand::Update { .. } => "update",
            MockCommand::Create { .. } => "create",
            MockCommand::Delete(_) => "delete",
            MockCommand::Snapshot(_) => "snapshot",
        }
    }
}

#[derive(Default)]
struct MockState {
    workspaces: HashMap<String, WorkspaceRecord>,
    channels: HashMap<String, watch::Sender<WorkspaceStatus>>,
    commands: Vec<MockCommand>,
    /// When set, an accepted stop command immediately transitions the
    /// workspace to STOPPED, as a fast backend would.
    stop_completes_immediately: bool,
    fail_fetch_all: Option<ServiceError>,
    fail_fetch_details: Option<ServiceError>,
    fail_update: Option<ServiceError>,
    fail_create: Option<ServiceError>,
    fail_delete: Option<ServiceError>,
    fail_start: Option<ServiceError>,
    fail_stop: Option<ServiceError>,
    fail_snapshot: Option<ServiceError>,
}

#[derive(Clone, Default)]
pub struct MockDataService {
    state: Arc<Mutex<MockState>>,
}

impl MockDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workspace record at a given status.
    pub fn insert(&self, record: WorkspaceRecord) {
        let mut state = self.state.lock().unwrap();
        let (tx, _) = watch::channel(record.status);
        state.channels.insert(record.id.clone(), tx);
        state.workspaces.insert(record.id.clone(), record);
    }

    /// Script a backend status transition.
    pub fn set_status(&self, id: &str, status: WorkspaceStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = state.workspaces.get_mut(id) {
            record.status = status;
        }
        if let Some(tx) = state.channels.get(id) {
            let _ = tx.send(status);
        }
    }

    /// Make accepted stop commands complete instantly.
    pub fn complete_stops_immediately(&self) {
        self.state.lock().unwrap().stop_completes_immediately = true;
    }

    pub fn fail_update(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_update = Some(err);
    }

    pub fn fail_create(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_create = Some(err);
    }

    pub fn fail_delete(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_delete = Some(err);
    }

    pub fn fail_start(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_start = Some(err);
    }

    pub fn fail_stop(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_stop = Some(err);
    }

    pub fn fail_snapshot(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_snapshot = Some(err);
    }

    pub fn fail_fetch_all(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_fetch_all = Some(err);
    }

    pub fn fail_fetch_details(&self, err: ServiceError) {
        self.state.lock().unwrap().fail_fetch_details = Some(err);
    }

    /// Commands accepted so far, in order.
    pub fn commands(&self) -> Vec<MockCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Command kinds accepted so far, for order assertions.
    pub fn command_kinds(&self) -> Vec<&'static str> {
        self.commands().iter().map(|c| c.kind()).collect()
    }

    pub fn get(&self, id: &str) -> Option<WorkspaceRecord> {
        self.state.lock().unwrap().workspaces.get(id).cloned()
    }

    fn ensure_channel(
        state: &mut MockState,
        id: &str,
    ) -> watch::Receiver<WorkspaceStatus> {
        let status = state
            .workspaces
            .get(id)
            .map(|r| r.status)
            .unwrap_or_default();
        state
            .channels
            .entry(id.to_string())
            .or_insert_with(|| watch::channel(status).0)
            .subscribe()
    }
}

#[async_trait]
impl DataService for MockDataService {
    async fn fetch_all(&self) -> Result<Vec<WorkspaceSummary>, ServiceError> {
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_fetch_all {
            return Err(err.clone());
        }
        Ok(state
            .workspaces
            .values()
            .map(|r| WorkspaceSummary {
                id: r.id.clone(),
                namespace: r.namespace.clone(),
                name: r.config.name.clone(),
                status: r.status,
            })
            .collect())
    }

    fn get_by_name(&self, namespace: &str, name: &str) -> Option<WorkspaceRecord> {
        let state = self.state.lock().unwrap();
        state
            .workspaces
            .values()
            .find(|r| r.namespace == namespace && r.config.name == name)
            .cloned()
    }

    async fn fetch_details(&self, _namespace: &str, name: &str) -> Result<(), ServiceError> {
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_fetch_details {
            return Err(err.clone());
        }
        if state.workspaces.values().any(|r| r.config.name == name) {
            Ok(())
        } else {
            Err(ServiceError::with_status(404, "Workspace not found"))
        }
    }

    fn get_status(&self, id: &str) -> WorkspaceStatus {
        let state = self.state.lock().unwrap();
        state
            .workspaces
            .get(id)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    async fn update(
        &self,
        id: &str,
        config: WorkspaceConfig,
    ) -> Result<WorkspaceConfig, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_update {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Update {
            id: id.to_string(),
            config: config.clone(),
        });
        match state.workspaces.get_mut(id) {
            Some(record) => {
                record.config = config.clone();
                Ok(config)
            }
            None => Err(ServiceError::with_status(404, "Workspace not found")),
        }
    }

    async fn create(
        &self,
        config: WorkspaceConfig,
        _attributes: CreateAttributes,
    ) -> Result<WorkspaceRecord, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_create {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Create {
            name: config.name.clone(),
        });
        let record = WorkspaceRecord {
            id: Uuid::new_v4().to_string(),
            namespace: "dev".to_string(),
            config,
            status: WorkspaceStatus::Stopped,
        };
        let (tx, _) = watch::channel(record.status);
        state.channels.insert(record.id.clone(), tx);
        state.workspaces.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_delete {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Delete(id.to_string()));
        state.workspaces.remove(id);
        Ok(())
    }

    async fn start(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_start {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Start(id.to_string()));
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_stop {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Stop(id.to_string()));
        if state.stop_completes_immediately {
            if let Some(record) = state.workspaces.get_mut(id) {
                record.status = WorkspaceStatus::Stopped;
            }
            if let Some(tx) = state.channels.get(id) {
                let _ = tx.send(WorkspaceStatus::Stopped);
            }
        }
        Ok(())
    }

    async fn snapshot(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.fail_snapshot {
            return Err(err.clone());
        }
        state.commands.push(MockCommand::Snapshot(id.to_string()));
        Ok(())
    }

    fn watch_status(&self, id: &str, target: WorkspaceStatus) -> StatusWatch {
        // Subscribe while still synchronous so no transition is missed
        // between arming and awaiting.
        let mut rx = {
            let mut state = self.state.lock().unwrap();
            Self::ensure_channel(&mut state, id)
        };
        Box::pin(async move {
            let _ = rx.wait_for(|status| *status == target).await;
        })
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub struct RecordingNotifier {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_info(&self, text: &str) {
        self.infos.lock().unwrap().push(text.to_string());
    }

    fn show_error(&self, text: &str) {
        self.errors.lock().unwrap().push(text.to_string());
    }
}

/// Confirmation prompt with a fixed answer.
pub struct StaticConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl StaticConfirm {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for StaticConfirm {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

/// Navigator that records visited paths.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// Event sink that records recently-used workspace ids.
#[derive(Default)]
pub struct RecordingEvents {
    used: Mutex<Vec<String>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recently_used_ids(&self) -> Vec<String> {
        self.used.lock().unwrap().clone()
    }
}

impl WorkspaceEvents for RecordingEvents {
    fn recently_used(&self, workspace_id: &str) {
        self.used.lock().unwrap().push(workspace_id.to_string());
    }
}
