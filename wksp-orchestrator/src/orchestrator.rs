//! The workspace lifecycle state machine.
//!
//! Statuses and triggers: STOPPED -(start)-> STARTING -(backend)-> RUNNING;
//! RUNNING -(stop)-> STOPPING -(backend)-> STOPPED. The orchestrator never
//! asserts a local status change itself; after issuing a command it waits
//! for the data service's status watch to confirm the transition before
//! taking the next step, so observed and actual backend state cannot
//! diverge. All sequences are plain `async fn`s with no detached tasks:
//! dropping an in-flight sequence cancels the remaining steps cleanly.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};
use wksp_config::{diff, environment, name, EnvironmentRegistry, WorkspaceConfig};

use crate::error::{OrchestratorError, Result};
use crate::service::{
    ConfirmationPrompt, DataService, Navigator, Notifier, ServiceError, WorkspaceEvents,
    RESOURCE_QUOTA_ERROR_CODE,
};
use crate::session::WorkspaceSession;
use crate::workspace::{CreateAttributes, WorkspaceStatus};

pub struct LifecycleOrchestrator {
    service: Arc<dyn DataService>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmationPrompt>,
    navigator: Arc<dyn Navigator>,
    events: Arc<dyn WorkspaceEvents>,
    registry: EnvironmentRegistry,
}

impl LifecycleOrchestrator {
    pub fn new(
        service: Arc<dyn DataService>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmationPrompt>,
        navigator: Arc<dyn Navigator>,
        events: Arc<dyn WorkspaceEvents>,
    ) -> Self {
        Self {
            service,
            notifier,
            confirm,
            navigator,
            events,
            registry: EnvironmentRegistry::with_defaults(),
        }
    }

    /// Bring up a session for editing an existing workspace.
    ///
    /// Serves from the data-service cache when possible; a 304 from
    /// `fetch_details` means the cache is already current and counts as
    /// success.
    pub async fn load(&self, namespace: &str, workspace_name: &str) -> Result<WorkspaceSession> {
        if self.service.get_by_name(namespace, workspace_name).is_none() {
            if let Err(err) = self.service.fetch_details(namespace, workspace_name).await {
                if !err.is_not_modified() {
                    let reason = err.to_string();
                    error!(
                        namespace,
                        workspace = workspace_name,
                        "failed to fetch workspace details: {}",
                        reason
                    );
                    return Err(OrchestratorError::InvalidWorkspace(reason));
                }
            }
        }

        let record = self
            .service
            .get_by_name(namespace, workspace_name)
            .ok_or_else(|| {
                OrchestratorError::NotFound(format!("{}:{}", namespace, workspace_name))
            })?;
        record.config.validate()?;
        Ok(WorkspaceSession::for_existing(&record))
    }

    /// Bring up a session for creating a new workspace, with a generated
    /// name unique against the currently used names. A failed listing is
    /// tolerated as an empty used-name set.
    pub async fn begin_create(&self) -> WorkspaceSession {
        let used: HashSet<String> = match self.service.fetch_all().await {
            Ok(summaries) => summaries.into_iter().map(|w| w.name).collect(),
            Err(err) => {
                warn!("failed to fetch used workspace names: {}", err);
                HashSet::new()
            }
        };

        let generated = name::generate_default(&used);
        let config = WorkspaceConfig {
            name: generated.clone(),
            ..Default::default()
        };
        WorkspaceSession::for_create(generated, config)
    }

    /// Current status as the data service sees it. Unknown in create mode
    /// or for an unfindable workspace.
    pub fn current_status(&self, session: &WorkspaceSession) -> WorkspaceStatus {
        if session.create_mode {
            WorkspaceStatus::Unknown
        } else {
            self.service.get_status(&session.id)
        }
    }

    /// Install a stack-derived config as the session's draft and baseline,
    /// normalizing the default environment's machine memory limits first.
    pub fn apply_stack_config(
        &self,
        session: &mut WorkspaceSession,
        config: WorkspaceConfig,
    ) -> Result<()> {
        config.validate()?;

        let mut config = config;
        if let Some(env) = config.default_environment().cloned() {
            let normalized = environment::normalize(&self.registry, &env);
            let key = config.default_env.clone();
            config.environments.insert(key, normalized);
        }

        session.draft = config.clone();
        session.baseline = config;
        session.edit_mode = false;
        Ok(())
    }

    /// Recompute the edit-mode flag and apply banner after a draft edit.
    /// The banner only shows when applying would have to restart the
    /// workspace, i.e. any status other than Stopped/Stopping.
    pub fn note_draft_edited(&self, session: &mut WorkspaceSession) {
        if session.create_mode {
            return;
        }
        session.edit_mode = diff::is_dirty(&session.baseline, &session.draft);
        session.show_apply_banner = !matches!(
            self.current_status(session),
            WorkspaceStatus::Stopped | WorkspaceStatus::Stopping
        );
    }

    /// Stage and commit a rename into the draft. No-op when the name form
    /// is invalid or the name equals the persisted one.
    pub fn rename_draft(&self, session: &mut WorkspaceSession, new_name: &str, form_valid: bool) {
        session.new_name = new_name.to_string();
        diff::rename(&mut session.draft, &session.baseline, new_name, form_valid);
    }

    /// Persist a new workspace from the session draft plus stack-derived
    /// attributes. On success fires the recently-used event, refreshes the
    /// listing and navigates to the new workspace; on failure surfaces the
    /// server message and changes no state.
    pub async fn create(
        &self,
        session: &mut WorkspaceSession,
        stack_id: Option<&str>,
    ) -> Result<()> {
        let attributes = CreateAttributes {
            stack_id: stack_id.map(str::to_string),
        };
        let mut config = session.draft.clone();
        config.links = None;

        info!(workspace = config.name.as_str(), "creating workspace");
        match self.service.create(config, attributes).await {
            Ok(record) => {
                self.events.recently_used(&record.id);
                self.notifier.show_info(&format!(
                    "Workspace {} successfully created.",
                    record.config.name
                ));
                if let Err(err) = self.service.fetch_all().await {
                    warn!("failed to refresh workspace list: {}", err);
                }
                self.navigator.go_to(&format!(
                    "/workspace/{}/{}",
                    record.namespace, record.config.name
                ));
                Ok(())
            }
            Err(err) => {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| "Error during workspace creation.".to_string());
                self.notifier.show_error(&message);
                error!("workspace creation failed: {}", err);
                Err(OrchestratorError::PersistFailure(message))
            }
        }
    }

    /// Apply the edited draft, restarting the workspace when its status
    /// requires it.
    ///
    /// Not running or starting: persist directly. Running: stop, wait for
    /// STOPPED, persist, start. Starting: wait until RUNNING is observed
    /// (a stop against a workspace mid-start is not meaningful), then stop,
    /// wait for STOPPED, persist, start — with both watches armed before
    /// any command so no transition is lost. A persist or command failure
    /// aborts the remaining steps; the user must re-apply.
    pub async fn apply(&self, session: &mut WorkspaceSession) -> Result<()> {
        if session.apply_in_flight.swap(true, Ordering::AcqRel) {
            warn!(
                workspace = session.id.as_str(),
                "apply already in flight; ignoring concurrent call"
            );
            return Ok(());
        }

        // The guard clears the latch on every exit path, including an
        // abandoned sequence whose future is dropped mid-flight.
        let _in_flight = InFlightGuard(session.apply_in_flight.clone());
        self.apply_sequence(session).await
    }

    async fn apply_sequence(&self, session: &mut WorkspaceSession) -> Result<()> {
        session.edit_mode = false;
        session.show_apply_banner = false;

        let status = self.current_status(session);
        info!(
            workspace = session.id.as_str(),
            %status,
            "applying configuration changes"
        );

        match status {
            WorkspaceStatus::Running => {
                let stopped = self
                    .service
                    .watch_status(&session.id, WorkspaceStatus::Stopped);
                self.issue_stop(session).await?;
                stopped.await;
                self.persist_draft(session).await?;
                self.run(session).await;
            }
            WorkspaceStatus::Starting => {
                // Arm both watches before any command is issued; the
                // workspace may transition at any moment.
                let stopped = self
                    .service
                    .watch_status(&session.id, WorkspaceStatus::Stopped);
                let running = self
                    .service
                    .watch_status(&session.id, WorkspaceStatus::Running);
                running.await;
                self.issue_stop(session).await?;
                stopped.await;
                self.persist_draft(session).await?;
                self.run(session).await;
            }
            _ => {
                self.persist_draft(session).await?;
            }
        }
        Ok(())
    }

    /// Discard draft edits. Does not cancel an in-flight apply: a sequence
    /// already underway runs to completion or failure.
    pub fn cancel(&self, session: &mut WorkspaceSession) {
        session.edit_mode = false;
        session.show_apply_banner = false;
        session.discard_draft();
    }

    /// Start the workspace. Failures are classified into a user-facing
    /// message, notified, and retained as `last_error`; nothing propagates
    /// past this boundary.
    pub async fn run(&self, session: &mut WorkspaceSession) {
        session.last_error = None;

        info!(workspace = session.id.as_str(), "starting workspace");
        if let Err(err) = self.service.start(&session.id).await {
            let message = classify_start_error(&err);
            self.notifier.show_error(&message);
            error!(
                workspace = session.id.as_str(),
                "start command rejected: {}", err
            );
            session.last_error = Some(message);
        }
    }

    /// Stop the workspace; a rejection is surfaced as a notification only.
    pub async fn stop(&self, session: &mut WorkspaceSession) {
        let _ = self.issue_stop(session).await;
    }

    /// Delete the workspace after user confirmation.
    ///
    /// Stopped or errored workspaces are deleted immediately; a running one
    /// is stopped first and deleted once STOPPED is observed. Any other
    /// status blocks the delete (the caller must stop the workspace first).
    pub async fn delete(&self, session: &mut WorkspaceSession) -> Result<()> {
        let prompt = format!("Would you like to delete workspace '{}'?", session.name);
        if !self.confirm.confirm(&prompt).await {
            return Ok(());
        }

        match self.current_status(session) {
            WorkspaceStatus::Stopped | WorkspaceStatus::Error => self.remove(session).await,
            WorkspaceStatus::Running => {
                let stopped = self
                    .service
                    .watch_status(&session.id, WorkspaceStatus::Stopped);
                self.issue_stop(session).await?;
                stopped.await;
                self.remove(session).await
            }
            status => {
                warn!(
                    workspace = session.id.as_str(),
                    %status,
                    "delete blocked; workspace must be stopped first"
                );
                Ok(())
            }
        }
    }

    /// Create a snapshot. Fire-and-forget; failures become notifications.
    pub async fn snapshot(&self, session: &WorkspaceSession) {
        if let Err(err) = self.service.snapshot(&session.id).await {
            let message = err
                .message
                .clone()
                .unwrap_or_else(|| "Creating snapshot failed.".to_string());
            self.notifier.show_error(&message);
            error!(
                workspace = session.id.as_str(),
                "snapshot creation failed: {}", err
            );
        }
    }

    /// Send the draft to the server, links stripped. On success the
    /// baseline takes the server's authoritative response and the editor
    /// navigates to the (possibly renamed) workspace.
    async fn persist_draft(&self, session: &mut WorkspaceSession) -> Result<()> {
        let mut config = session.draft.clone();
        config.links = None;

        match self.service.update(&session.id, config).await {
            Ok(updated) => {
                session.accept_persisted(updated);
                self.notifier.show_info("Workspace updated.");
                self.navigator
                    .go_to(&format!("/workspace/{}/{}", session.namespace, session.name));
                Ok(())
            }
            Err(err) => {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| "Update workspace failed.".to_string());
                self.notifier.show_error(&message);
                error!(
                    workspace = session.id.as_str(),
                    "workspace update failed: {}", err
                );
                Err(OrchestratorError::PersistFailure(message))
            }
        }
    }

    async fn issue_stop(&self, session: &WorkspaceSession) -> Result<()> {
        info!(workspace = session.id.as_str(), "stopping workspace");
        self.service.stop(&session.id).await.map_err(|err| {
            let message = err
                .message
                .clone()
                .unwrap_or_else(|| "Stop workspace failed.".to_string());
            self.notifier.show_error(&message);
            error!(
                workspace = session.id.as_str(),
                "stop command rejected: {}", err
            );
            OrchestratorError::CommandFailure {
                command: "stop",
                message,
            }
        })
    }

    async fn remove(&self, session: &WorkspaceSession) -> Result<()> {
        match self.service.delete(&session.id).await {
            Ok(()) => {
                info!(workspace = session.id.as_str(), "workspace deleted");
                self.navigator.go_to("/workspaces");
                Ok(())
            }
            Err(err) => {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| "Delete workspace failed.".to_string());
                self.notifier.show_error(&message);
                error!(
                    workspace = session.id.as_str(),
                    "workspace deletion failed: {}", err
                );
                Err(OrchestratorError::Service(err))
            }
        }
    }
}

struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Map a start failure to its user-facing message. Quota violations render
/// the detailed RAM breakdown; anything else falls back to the server
/// message or a generic one.
fn classify_start_error(err: &ServiceError) -> String {
    if err.code == Some(RESOURCE_QUOTA_ERROR_CODE) {
        if let Some(attrs) = &err.attributes {
            return format!(
                "Unable to start this workspace. There are {} running workspaces consuming {}{} RAM. \
                 Your current RAM limit is {}{}. This workspace requires an additional {}{}. \
                 You can stop other workspaces to free resources.",
                attrs.workspaces_count,
                attrs.used_ram,
                attrs.ram_unit,
                attrs.limit_ram,
                attrs.ram_unit,
                attrs.required_ram,
                attrs.ram_unit,
            );
        }
    }
    err.message
        .clone()
        .unwrap_or_else(|| "Unable to start this workspace.".to_string())
}
