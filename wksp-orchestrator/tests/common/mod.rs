//! Shared fixtures for orchestrator integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use wksp_config::config::{Environment, Machine, WorkspaceConfig};
use wksp_orchestrator::mock::{
    MockDataService, RecordingEvents, RecordingNavigator, RecordingNotifier, StaticConfirm,
};
use wksp_orchestrator::{
    ConfirmationPrompt, LifecycleOrchestrator, WorkspaceRecord, WorkspaceSession, WorkspaceStatus,
};

pub struct Harness {
    pub service: MockDataService,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub events: Arc<RecordingEvents>,
    pub orchestrator: Arc<LifecycleOrchestrator>,
}

pub fn harness() -> Harness {
    harness_with_confirm(Arc::new(StaticConfirm::accepting()))
}

pub fn harness_with_confirm(confirm: Arc<dyn ConfirmationPrompt>) -> Harness {
    let service = MockDataService::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let events = Arc::new(RecordingEvents::new());
    let orchestrator = Arc::new(LifecycleOrchestrator::new(
        Arc::new(service.clone()),
        notifier.clone(),
        confirm,
        navigator.clone(),
        events.clone(),
    ));
    Harness {
        service,
        notifier,
        navigator,
        events,
        orchestrator,
    }
}

pub fn sample_config(name: &str) -> WorkspaceConfig {
    let mut env = Environment::default();
    env.recipe.kind = "dockerfile".to_string();
    env.recipe.content = Some("FROM ubuntu".to_string());
    env.machines
        .insert("dev-machine".to_string(), Machine::default());

    let mut config = WorkspaceConfig {
        name: name.to_string(),
        default_env: "dev".to_string(),
        ..Default::default()
    };
    config.environments.insert("dev".to_string(), env);
    config
}

pub fn sample_record(id: &str, name: &str, status: WorkspaceStatus) -> WorkspaceRecord {
    WorkspaceRecord {
        id: id.to_string(),
        namespace: "dev".to_string(),
        config: sample_config(name),
        status,
    }
}

/// Insert a workspace and load an editing session for it.
pub async fn load_session(
    harness: &Harness,
    id: &str,
    name: &str,
    status: WorkspaceStatus,
) -> WorkspaceSession {
    harness.service.insert(sample_record(id, name, status));
    harness
        .orchestrator
        .load("dev", name)
        .await
        .expect("session should load")
}
