//! Integration tests for create/run/stop/delete/snapshot and session
//! bring-up.

mod common;

use std::sync::Arc;

use common::{harness, harness_with_confirm, load_session, sample_config, sample_record};
use wksp_orchestrator::mock::StaticConfirm;
use wksp_orchestrator::{
    OrchestratorError, QuotaAttributes, ServiceError, WorkspaceStatus, RESOURCE_QUOTA_ERROR_CODE,
};

#[tokio::test]
async fn create_fires_event_notifies_and_navigates() {
    let h = harness();
    let mut session = h.orchestrator.begin_create().await;
    session.draft = sample_config(&session.name.clone());

    h.orchestrator
        .create(&mut session, Some("java-default"))
        .await
        .unwrap();

    assert_eq!(h.events.recently_used_ids().len(), 1);
    let infos = h.notifier.infos();
    assert_eq!(infos.len(), 1);
    assert!(infos[0].ends_with("successfully created."));
    let paths = h.navigator.paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("/workspace/dev/"));
}

#[tokio::test]
async fn create_failure_surfaces_error_and_changes_nothing() {
    let h = harness();
    h.service
        .fail_create(ServiceError::with_message("name already in use"));
    let mut session = h.orchestrator.begin_create().await;
    session.draft = sample_config(&session.name.clone());
    let draft_before = session.draft.clone();

    let result = h.orchestrator.create(&mut session, None).await;

    assert!(matches!(result, Err(OrchestratorError::PersistFailure(_))));
    assert!(h
        .notifier
        .errors()
        .contains(&"name already in use".to_string()));
    assert!(h.navigator.paths().is_empty());
    assert!(h.events.recently_used_ids().is_empty());
    assert_eq!(session.draft, draft_before);
}

#[tokio::test]
async fn begin_create_generates_prefixed_name() {
    let h = harness();
    h.service
        .insert(sample_record("ws-1", "wksp-aaaa", WorkspaceStatus::Stopped));

    let session = h.orchestrator.begin_create().await;

    assert!(session.create_mode);
    assert!(session.name.starts_with("wksp-"));
    assert_eq!(session.name.len(), "wksp-".len() + 4);
    assert_eq!(session.draft.name, session.name);
}

#[tokio::test]
async fn run_success_clears_previous_error() {
    let h = harness();
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;
    session.last_error = Some("old failure".to_string());

    h.orchestrator.run(&mut session).await;

    assert_eq!(session.last_error, None);
    assert_eq!(h.service.command_kinds(), vec!["start"]);
}

#[tokio::test]
async fn run_quota_failure_renders_detailed_message() {
    let h = harness();
    h.service.fail_start(ServiceError {
        code: Some(RESOURCE_QUOTA_ERROR_CODE),
        attributes: Some(QuotaAttributes {
            workspaces_count: 2,
            used_ram: "4".to_string(),
            limit_ram: "4".to_string(),
            required_ram: "2".to_string(),
            ram_unit: "GB".to_string(),
        }),
        ..Default::default()
    });
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.run(&mut session).await;

    let message = session.last_error.expect("failure should be retained");
    assert!(message.contains("There are 2 running workspaces consuming 4GB RAM."));
    assert!(h.notifier.errors().contains(&message));
}

#[tokio::test]
async fn run_failure_without_payload_uses_generic_message() {
    let h = harness();
    h.service.fail_start(ServiceError::default());
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.run(&mut session).await;

    assert_eq!(
        session.last_error.as_deref(),
        Some("Unable to start this workspace.")
    );
}

#[tokio::test]
async fn stop_failure_is_notified_only() {
    let h = harness();
    h.service.fail_stop(ServiceError::with_message("agent unreachable"));
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Running).await;

    h.orchestrator.stop(&mut session).await;

    assert!(h
        .notifier
        .errors()
        .contains(&"agent unreachable".to_string()));
}

#[tokio::test]
async fn delete_stopped_workspace_deletes_immediately() {
    let h = harness();
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.delete(&mut session).await.unwrap();

    assert_eq!(h.service.command_kinds(), vec!["delete"]);
    assert_eq!(h.navigator.paths(), vec!["/workspaces"]);
    assert!(h.service.get("ws-1").is_none());
}

#[tokio::test]
async fn delete_running_workspace_stops_first() {
    let h = harness();
    h.service.complete_stops_immediately();
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Running).await;

    h.orchestrator.delete(&mut session).await.unwrap();

    assert_eq!(h.service.command_kinds(), vec!["stop", "delete"]);
}

#[tokio::test]
async fn delete_mid_transition_is_blocked() {
    let h = harness();
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Starting).await;

    h.orchestrator.delete(&mut session).await.unwrap();

    assert!(h.service.command_kinds().is_empty());
    assert!(h.service.get("ws-1").is_some());
}

#[tokio::test]
async fn declined_confirmation_deletes_nothing() {
    let confirm = Arc::new(StaticConfirm::declining());
    let h = harness_with_confirm(confirm.clone());
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.delete(&mut session).await.unwrap();

    assert_eq!(
        confirm.prompts(),
        vec!["Would you like to delete workspace 'wksp-aaaa'?"]
    );
    assert!(h.service.command_kinds().is_empty());
}

#[tokio::test]
async fn snapshot_failure_is_a_notification_only() {
    let h = harness();
    h.service
        .fail_snapshot(ServiceError::with_message("no snapshot storage"));
    let session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.snapshot(&session).await;

    assert!(h
        .notifier
        .errors()
        .contains(&"no snapshot storage".to_string()));
}

#[tokio::test]
async fn load_reports_unfetchable_workspace() {
    let h = harness();
    h.service
        .fail_fetch_details(ServiceError::with_status(500, "Internal Server Error"));

    let result = h.orchestrator.load("dev", "wksp-gone").await;

    assert!(matches!(
        result,
        Err(OrchestratorError::InvalidWorkspace(_))
    ));
}

#[tokio::test]
async fn load_treats_not_modified_as_success() {
    let h = harness();
    h.service
        .fail_fetch_details(ServiceError::with_status(304, "Not Modified"));

    // 304 is not an invalid-workspace condition; with nothing cached the
    // lookup just comes up empty.
    let result = h.orchestrator.load("dev", "wksp-gone").await;
    assert!(matches!(result, Err(OrchestratorError::NotFound(_))));
}

#[tokio::test]
async fn apply_stack_config_normalizes_compose_memory() {
    let h = harness();
    let mut session = h.orchestrator.begin_create().await;

    let mut config = sample_config("wksp-bbbb");
    let env = &mut config.environments["dev"];
    env.recipe.kind = "compose".to_string();
    env.machines["dev-machine"].attributes.memory_limit_bytes = Some(536870912);

    h.orchestrator
        .apply_stack_config(&mut session, config)
        .unwrap();

    assert_eq!(
        session.draft.environments["dev"].machines["dev-machine"]
            .attributes
            .memory_limit_bytes,
        Some(2147483648)
    );
    assert_eq!(session.baseline, session.draft);
}

#[tokio::test]
async fn rename_respects_form_validity() {
    let h = harness();
    let mut session = load_session(&h, "ws-1", "wksp-aaaa", WorkspaceStatus::Stopped).await;

    h.orchestrator.rename_draft(&mut session, "wksp-new", false);
    assert_eq!(session.draft.name, "wksp-aaaa");

    h.orchestrator.rename_draft(&mut session, "wksp-new", true);
    assert_eq!(session.draft.name, "wksp-new");
    h.orchestrator.note_draft_edited(&mut session);
    assert!(session.edit_mode);
}
