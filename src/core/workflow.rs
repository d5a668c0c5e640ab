//! Create/edit flow for a single media server.
//!
//! The workflow never performs I/O itself. Every transition that needs the
//! backend or the router returns an [`Effect`] which the app turns into a
//! task; results come back through the `*_finished` methods.

use tracing::{debug, info};

use crate::core::model::{
    MediaServerCreate, MediaServerRead, MediaServerType, MediaServerUpdate, Selection,
    ServerTarget,
};
use crate::core::service::{MediaServerService, is_success_message};
use crate::core::validation::{self, Field, FieldError};
use crate::ui::toast::ToastQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the snapshot before entry can run.
    Pending,
    Editing,
    Testing,
    Submitting,
    Deleting,
    /// Saved or deleted; waiting for the return to the list.
    Done,
    /// Target did not exist; the form is never shown.
    Redirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Delete,
    DiscardChanges,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Name(String),
    ServerType(MediaServerType),
    Url(String),
    ApiKey(String),
    Enabled(bool),
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RedirectToList,
    NavigateBack,
    Test {
        revision: u64,
        data: MediaServerCreate,
    },
    Create(MediaServerCreate),
    Update(i64, MediaServerUpdate),
    Delete(i64),
    /// Navigate to the list after the redirect delay, then reload once.
    ReturnToListLater,
    /// Reload now, and again after the delayed return to the list.
    ReloadThenReturnToListLater,
}

#[derive(Debug, Clone)]
pub struct EditWorkflow {
    target: ServerTarget,
    phase: Phase,
    is_create: bool,
    connection_tested: bool,
    ready_to_submit: bool,
    form: MediaServerCreate,
    pristine: MediaServerCreate,
    hydrated_from: Option<Selection>,
    /// Bumped whenever the form contents change; test replies for older
    /// contents are dropped.
    revision: u64,
    errors: Vec<FieldError>,
    result: Option<(String, ResultKind)>,
    confirmation: Option<Confirmation>,
}

impl EditWorkflow {
    pub fn new(target: ServerTarget) -> Self {
        Self {
            target,
            phase: Phase::Pending,
            is_create: matches!(target, ServerTarget::New),
            connection_tested: false,
            ready_to_submit: false,
            form: MediaServerCreate::default(),
            pristine: MediaServerCreate::default(),
            hydrated_from: None,
            revision: 0,
            errors: Vec::new(),
            result: None,
            confirmation: None,
        }
    }

    // ── Accessors ──

    pub fn target(&self) -> ServerTarget {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_create(&self) -> bool {
        self.is_create
    }

    pub fn is_connection_tested(&self) -> bool {
        self.connection_tested
    }

    pub fn is_ready_to_submit(&self) -> bool {
        self.ready_to_submit
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Any request in flight or the view is finished.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Testing | Phase::Submitting | Phase::Deleting | Phase::Done
        )
    }

    /// Form is hydrated and can be shown.
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, Phase::Pending | Phase::Redirected)
    }

    pub fn form(&self) -> &MediaServerCreate {
        &self.form
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn result(&self) -> Option<(&str, ResultKind)> {
        self.result.as_ref().map(|(m, k)| (m.as_str(), *k))
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.form != self.pristine
    }

    fn set_result(&mut self, message: impl Into<String>, kind: ResultKind) {
        self.result = Some((message.into(), kind));
    }

    fn reset_test(&mut self) {
        self.connection_tested = false;
        self.ready_to_submit = false;
    }

    // ── Entry and hydration ──

    /// Run entry once the snapshot is available. Does nothing while it loads.
    pub fn enter(&mut self, service: &mut MediaServerService, toasts: &mut ToastQueue) -> Effect {
        if self.phase != Phase::Pending || service.is_loading() {
            return Effect::None;
        }

        match self.target {
            ServerTarget::New => {
                self.is_create = true;
                service.set_target(ServerTarget::New);
            }
            ServerTarget::Existing(id) => {
                if !service.media_server_exists(id, toasts) {
                    info!("Media server {id} not found, returning to list");
                    self.phase = Phase::Redirected;
                    return Effect::RedirectToList;
                }
                self.is_create = false;
                service.set_target(self.target);
            }
        }

        self.phase = Phase::Editing;
        self.sync(service.selected());
        Effect::None
    }

    /// Copy a newly derived selection into the form. Returns whether the form changed.
    pub fn sync(&mut self, selection: Selection) -> bool {
        if matches!(
            self.phase,
            Phase::Pending | Phase::Redirected | Phase::Submitting | Phase::Deleting | Phase::Done
        ) {
            return false;
        }
        if self.hydrated_from.as_ref() == Some(&selection) {
            return false;
        }

        debug!("Hydrating form from media server {}", selection.id());
        self.form = selection.form_data();
        self.pristine = self.form.clone();
        self.hydrated_from = Some(selection);
        self.revision += 1;
        self.reset_test();
        self.result = None;
        self.errors.clear();
        if self.phase == Phase::Testing {
            self.phase = Phase::Editing;
        }
        true
    }

    // ── Editing ──

    pub fn edit(&mut self, change: FieldChange) {
        if self.is_busy() && self.phase != Phase::Testing {
            return;
        }
        match change {
            FieldChange::Name(v) => self.form.name = v,
            FieldChange::ServerType(v) => self.form.server_type = v,
            FieldChange::Url(v) => self.form.url = v,
            FieldChange::ApiKey(v) => self.form.api_key = v,
            FieldChange::Enabled(v) => self.form.enabled = v,
        }
        self.revision += 1;
        if self.connection_tested {
            self.reset_test();
            self.result = None;
        }
    }

    fn validate(&mut self) -> bool {
        self.errors = validation::validate(&self.form);
        if !self.errors.is_empty() {
            self.set_result("Please fix the highlighted fields", ResultKind::Error);
            return false;
        }
        true
    }

    // ── Test / submit ──

    /// Explicit connection test of the current form contents.
    pub fn test(&mut self) -> Effect {
        if self.phase != Phase::Editing || !self.validate() {
            return Effect::None;
        }
        self.start_test()
    }

    fn start_test(&mut self) -> Effect {
        self.phase = Phase::Testing;
        self.reset_test();
        self.set_result("Testing connection...", ResultKind::Info);
        Effect::Test {
            revision: self.revision,
            data: self.form.clone(),
        }
    }

    pub fn test_finished(&mut self, revision: u64, result: Result<String, String>) {
        if self.phase != Phase::Testing {
            return;
        }
        self.phase = Phase::Editing;
        if revision != self.revision {
            debug!("Ignoring connection test result for stale form contents");
            self.result = None;
            return;
        }
        match result {
            Ok(message) if is_success_message(&message) => {
                self.connection_tested = true;
                self.ready_to_submit = true;
                self.set_result(message, ResultKind::Success);
            }
            Ok(message) | Err(message) => {
                self.reset_test();
                self.set_result(message, ResultKind::Error);
            }
        }
    }

    /// Submit button. Tests first; only a tested form is saved.
    pub fn submit(&mut self) -> Effect {
        if self.phase != Phase::Editing {
            return Effect::None;
        }
        if !self.validate() {
            return Effect::None;
        }
        if !self.connection_tested {
            return self.start_test();
        }

        self.phase = Phase::Submitting;
        if self.is_create {
            self.set_result("Creating Media Server...", ResultKind::Info);
            Effect::Create(self.form.clone())
        } else {
            self.set_result("Updating Media Server...", ResultKind::Info);
            Effect::Update(self.target.id(), self.form.clone().into())
        }
    }

    pub fn submit_finished(&mut self, result: Result<MediaServerRead, String>) -> Effect {
        if self.phase != Phase::Submitting {
            return Effect::None;
        }
        match result {
            Ok(server) => {
                info!("Media server '{}' saved with id {}", server.name, server.id);
                self.phase = Phase::Done;
                let verb = if self.is_create { "Created" } else { "Updated" };
                self.set_result(
                    format!("Media Server {verb} Successfully!"),
                    ResultKind::Success,
                );
                Effect::ReturnToListLater
            }
            Err(message) => {
                self.phase = Phase::Editing;
                self.set_result(message, ResultKind::Error);
                Effect::None
            }
        }
    }

    // ── Delete / cancel ──

    pub fn request_delete(&mut self, service: &MediaServerService, toasts: &mut ToastQueue) {
        if self.is_create || self.phase != Phase::Editing {
            return;
        }
        if service.media_server_exists(self.target.id(), toasts) {
            self.confirmation = Some(Confirmation::Delete);
        }
    }

    pub fn delete_finished(&mut self, result: Result<String, String>) -> Effect {
        if self.phase != Phase::Deleting {
            return Effect::None;
        }
        match result {
            Ok(message) => {
                self.phase = Phase::Done;
                self.set_result(message, ResultKind::Success);
                Effect::ReloadThenReturnToListLater
            }
            Err(message) => {
                self.phase = Phase::Editing;
                self.set_result(message, ResultKind::Error);
                Effect::None
            }
        }
    }

    pub fn cancel(&mut self) -> Effect {
        if self.has_unsaved_changes() && !matches!(self.phase, Phase::Done | Phase::Redirected) {
            self.confirmation = Some(Confirmation::DiscardChanges);
            Effect::None
        } else {
            Effect::NavigateBack
        }
    }

    /// The user accepted the open confirmation dialog.
    pub fn confirm(&mut self) -> Effect {
        match self.confirmation.take() {
            Some(Confirmation::Delete) if self.phase == Phase::Editing => {
                self.phase = Phase::Deleting;
                self.set_result("Deleting Media Server...", ResultKind::Info);
                Effect::Delete(self.target.id())
            }
            Some(Confirmation::DiscardChanges) => Effect::NavigateBack,
            _ => Effect::None,
        }
    }

    pub fn decline(&mut self) {
        self.confirmation = None;
    }
}
