use iced::widget::{column, container, stack};
use iced::{task, Element, Length, Subscription, Task, Theme};
use tracing::{debug, info};

use crate::config::Config;
use crate::core::api::ApiClient;
use crate::core::model::{MediaServerRead, ServerTarget};
use crate::core::service::{MediaServerService, RefreshOutcome};
use crate::core::workflow::{EditWorkflow, Effect, FieldChange, Phase, ResultKind};
use crate::theme as app_theme;
use crate::ui;
use crate::ui::server_list::ListState;
use crate::ui::toast::{ToastQueue, ToastType};

// ── Routes ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Edit(ServerTarget),
}

impl Route {
    /// Startup route from the command line: `--add`, or `--edit <id>`.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        match args.next().as_deref() {
            Some("--add") => Route::Edit(ServerTarget::New),
            Some("--edit") => Route::Edit(ServerTarget::from_param(args.next().as_deref())),
            _ => Route::List,
        }
    }
}

// ── Message enum ──

#[derive(Debug, Clone)]
pub enum Message {
    // Snapshot
    ServersLoaded(Result<Vec<MediaServerRead>, String>),
    ReloadRequested,

    // Navigation
    Navigate(Route),
    ReturnToList { view: u64 },

    // List
    FolderPathChanged(String),
    RefreshLibrary(i64),
    RefreshLibraryFinished(Result<String, String>),
    RefreshAllEnabled,
    RefreshAllFinished(Vec<RefreshOutcome>),
    DismissResult,

    // Edit form
    FormChanged(FieldChange),
    TestRequested,
    SubmitRequested,
    DeleteRequested,
    CancelRequested,
    ConfirmAccepted,
    ConfirmDeclined,
    TestFinished {
        view: u64,
        revision: u64,
        result: Result<String, String>,
    },
    SubmitFinished {
        view: u64,
        result: Result<MediaServerRead, String>,
    },
    DeleteFinished {
        view: u64,
        result: Result<String, String>,
    },

    // Toast
    DismissToast(u64),
    TickToasts,

    // Keyboard
    KeyPressed(iced::keyboard::Key, iced::keyboard::Modifiers),
}

// ── Edit view ──

/// One visit to the edit route. Dropping it aborts its pending return timer.
pub struct EditView {
    pub id: u64,
    pub workflow: EditWorkflow,
    return_handle: Option<task::Handle>,
}

impl EditView {
    pub fn has_pending_return(&self) -> bool {
        self.return_handle.is_some()
    }
}

// ── App state ──

pub struct App {
    pub config: Config,
    pub service: MediaServerService,
    pub route: Route,
    pub list: ListState,
    pub edit: Option<EditView>,
    pub next_view_id: u64,
    pub toasts: ToastQueue,
}

impl App {
    pub fn new(config: Config, api: ApiClient) -> (Self, Task<Message>) {
        let mut service = MediaServerService::new(api);
        let init_task = Task::perform(service.reload(), Message::ServersLoaded);

        let app = App {
            config,
            service,
            route: Route::List,
            list: ListState::default(),
            edit: None,
            next_view_id: 1,
            toasts: ToastQueue::default(),
        };

        (app, init_task)
    }

    pub fn title(&self) -> String {
        match self.route {
            Route::List => "ServerDeck".to_string(),
            Route::Edit(ServerTarget::New) => "ServerDeck · Add Media Server".to_string(),
            Route::Edit(ServerTarget::Existing(_)) => "ServerDeck · Edit Media Server".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![];

        // Toast auto-dismiss ticker
        if !self.toasts.is_empty() {
            subs.push(
                iced::time::every(std::time::Duration::from_millis(100))
                    .map(|_| Message::TickToasts),
            );
        }

        subs.push(iced::keyboard::listen().map(|event| match event {
            iced::keyboard::Event::KeyPressed { key, modifiers, .. } => {
                Message::KeyPressed(key, modifiers)
            }
            _ => Message::TickToasts, // Ignore other keyboard events; reuse a no-op message
        }));

        Subscription::batch(subs)
    }

    // ── Helpers ──

    fn reload(&mut self) -> Task<Message> {
        Task::perform(self.service.reload(), Message::ServersLoaded)
    }

    fn edit_view(&mut self, view: u64) -> Option<&mut EditView> {
        self.edit.as_mut().filter(|e| e.id == view)
    }

    /// Switch routes. Navigating to the current route does nothing.
    fn navigate(&mut self, route: Route) -> Task<Message> {
        if self.route == route {
            return Task::none();
        }
        info!("Navigating to {:?}", route);
        self.route = route;

        let leave = self.leave_edit();
        match route {
            Route::List => leave,
            Route::Edit(target) => {
                let id = self.next_view_id;
                self.next_view_id += 1;
                self.edit = Some(EditView {
                    id,
                    workflow: EditWorkflow::new(target),
                    return_handle: None,
                });
                self.list.result = None;
                Task::batch([leave, self.enter_edit()])
            }
        }
    }

    /// Drop the edit view. A finished save or delete hands its result to the
    /// list and reloads the snapshot, whether the timer or the user left first.
    fn leave_edit(&mut self) -> Task<Message> {
        let Some(edit) = self.edit.take() else {
            return Task::none();
        };
        if edit.workflow.phase() != Phase::Done {
            return Task::none();
        }
        self.list.result = edit
            .workflow
            .result()
            .map(|(message, kind)| (message.to_string(), kind));
        self.reload()
    }

    fn enter_edit(&mut self) -> Task<Message> {
        let Some(edit) = self.edit.as_mut() else {
            return Task::none();
        };
        let view = edit.id;
        let effect = edit.workflow.enter(&mut self.service, &mut self.toasts);
        self.run_effect(view, effect)
    }

    fn drive(&mut self, step: impl FnOnce(&mut EditWorkflow) -> Effect) -> Task<Message> {
        let Some(edit) = self.edit.as_mut() else {
            return Task::none();
        };
        let view = edit.id;
        let effect = step(&mut edit.workflow);
        self.run_effect(view, effect)
    }

    fn run_effect(&mut self, view: u64, effect: Effect) -> Task<Message> {
        match effect {
            Effect::None => Task::none(),
            Effect::RedirectToList | Effect::NavigateBack => self.navigate(Route::List),
            Effect::Test { revision, data } => Task::perform(
                self.service.test_media_server(data),
                move |result| Message::TestFinished {
                    view,
                    revision,
                    result,
                },
            ),
            Effect::Create(data) => Task::perform(
                self.service.add_media_server(data),
                move |result| Message::SubmitFinished { view, result },
            ),
            Effect::Update(id, partial) => Task::perform(
                self.service.update_media_server(id, partial),
                move |result| Message::SubmitFinished { view, result },
            ),
            Effect::Delete(id) => Task::perform(
                self.service.delete_media_server(id),
                move |result| Message::DeleteFinished { view, result },
            ),
            Effect::ReturnToListLater => self.schedule_return(view),
            Effect::ReloadThenReturnToListLater => {
                let reload = self.reload();
                Task::batch([reload, self.schedule_return(view)])
            }
        }
    }

    /// Timer back to the list. Its handle lives on the view, so leaving the
    /// view early cancels it.
    fn schedule_return(&mut self, view: u64) -> Task<Message> {
        let delay = self.config.redirect_delay();
        debug!("Returning to list in {}ms", delay.as_millis());
        let (task, handle) = Task::perform(
            async move { tokio::time::sleep(delay).await },
            move |_| Message::ReturnToList { view },
        )
        .abortable();
        if let Some(edit) = self.edit_view(view) {
            edit.return_handle = Some(handle.abort_on_drop());
        }
        task
    }

    fn folder_param(&self) -> Option<String> {
        let folder = self.list.folder_path.trim();
        (!folder.is_empty()).then(|| folder.to_string())
    }
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ── Snapshot ──
            Message::ServersLoaded(result) => {
                if let Err(e) = self.service.apply_snapshot(result) {
                    self.toasts
                        .push(format!("Failed to load media servers: {e}"), ToastType::Error);
                }
                let task = match self.edit.as_ref().map(|e| e.workflow.phase()) {
                    Some(Phase::Pending) => self.enter_edit(),
                    _ => Task::none(),
                };
                if let Some(edit) = self.edit.as_mut() {
                    edit.workflow.sync(self.service.selected());
                }
                task
            }
            Message::ReloadRequested => self.reload(),

            // ── Navigation ──
            Message::Navigate(route) => self.navigate(route),
            Message::ReturnToList { view } => {
                if self.edit.as_ref().is_none_or(|e| e.id != view) {
                    return Task::none();
                }
                self.navigate(Route::List)
            }

            // ── List ──
            Message::FolderPathChanged(path) => {
                self.list.folder_path = path;
                Task::none()
            }
            Message::RefreshLibrary(id) => {
                if !self.service.media_server_exists(id, &mut self.toasts) {
                    return Task::none();
                }
                self.list.refreshing = true;
                Task::perform(
                    self.service.refresh_library(id, self.folder_param()),
                    Message::RefreshLibraryFinished,
                )
            }
            Message::RefreshLibraryFinished(result) => {
                self.list.refreshing = false;
                self.list.result = Some(match result {
                    Ok(message) => (message, ResultKind::Success),
                    Err(e) => (e, ResultKind::Error),
                });
                Task::none()
            }
            Message::RefreshAllEnabled => {
                if !self.service.servers().iter().any(|s| s.enabled) {
                    self.list.result = Some((
                        "No enabled media servers to refresh".to_string(),
                        ResultKind::Info,
                    ));
                    return Task::none();
                }
                self.list.refreshing = true;
                Task::perform(
                    self.service.refresh_enabled(self.folder_param()),
                    Message::RefreshAllFinished,
                )
            }
            Message::RefreshAllFinished(outcomes) => {
                self.list.apply_refresh_outcomes(&outcomes);
                Task::none()
            }
            Message::DismissResult => {
                self.list.result = None;
                Task::none()
            }

            // ── Edit form ──
            Message::FormChanged(change) => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.workflow.edit(change);
                }
                Task::none()
            }
            Message::TestRequested => self.drive(EditWorkflow::test),
            Message::SubmitRequested => self.drive(EditWorkflow::submit),
            Message::CancelRequested => self.drive(EditWorkflow::cancel),
            Message::ConfirmAccepted => self.drive(EditWorkflow::confirm),
            Message::ConfirmDeclined => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.workflow.decline();
                }
                Task::none()
            }
            Message::DeleteRequested => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.workflow.request_delete(&self.service, &mut self.toasts);
                }
                Task::none()
            }
            Message::TestFinished {
                view,
                revision,
                result,
            } => {
                if let Some(edit) = self.edit_view(view) {
                    edit.workflow.test_finished(revision, result);
                }
                Task::none()
            }
            Message::SubmitFinished { view, result } => {
                let Some(edit) = self.edit_view(view) else {
                    return Task::none();
                };
                let effect = edit.workflow.submit_finished(result);
                self.run_effect(view, effect)
            }
            Message::DeleteFinished { view, result } => {
                let Some(edit) = self.edit_view(view) else {
                    return Task::none();
                };
                let effect = edit.workflow.delete_finished(result);
                self.run_effect(view, effect)
            }

            // ── Toast ──
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
            Message::TickToasts => {
                self.toasts.prune_expired();
                Task::none()
            }

            // ── Keyboard ──
            Message::KeyPressed(key, modifiers) => {
                use iced::keyboard::Key;

                match key {
                    Key::Named(iced::keyboard::key::Named::Escape) => {
                        let confirming = self
                            .edit
                            .as_ref()
                            .is_some_and(|e| e.workflow.confirmation().is_some());
                        if confirming {
                            self.update(Message::ConfirmDeclined)
                        } else if self.edit.is_some() {
                            self.update(Message::CancelRequested)
                        } else {
                            Task::none()
                        }
                    }
                    Key::Character(c) if modifiers.command() && c.as_str() == "r" => {
                        self.reload()
                    }
                    _ => Task::none(),
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = ui::header::header_bar(
            self.service.servers(),
            self.route,
            self.service.is_loading(),
        );

        let content: Element<'_, Message> = match (&self.route, &self.edit) {
            (Route::Edit(_), Some(edit)) if edit.workflow.is_visible() => {
                ui::server_form::server_form(&edit.workflow, edit.has_pending_return())
            }
            (Route::Edit(_), Some(_)) => ui::server_form::loading_placeholder(),
            _ => ui::server_list::server_list(
                self.service.servers(),
                self.service.is_loading(),
                &self.list,
            ),
        };

        // Base layout
        let base = container(
            column![header, content]
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_: &Theme| container::Style {
            background: Some(app_theme::BG_PRIMARY.into()),
            ..Default::default()
        });

        // Stack for overlays (dialogs, toasts)
        let mut layers: Vec<Element<'_, Message>> = vec![base.into()];

        if let Some(confirmation) = self.edit.as_ref().and_then(|e| e.workflow.confirmation()) {
            layers.push(ui::confirm_dialog::confirm_dialog(confirmation));
        }

        if !self.toasts.is_empty() {
            let toast_view = ui::toast::toast_container(&self.toasts);
            layers.push(
                container(toast_view)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(iced::alignment::Horizontal::Right)
                    .align_y(iced::alignment::Vertical::Bottom)
                    .into(),
            );
        }

        stack(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{MediaServerCreate, MediaServerType};
    use crate::core::workflow::Confirmation;
    use chrono::Utc;
    use std::time::Duration;

    fn make_server(id: i64, name: &str) -> MediaServerRead {
        MediaServerRead {
            id,
            name: name.to_string(),
            server_type: MediaServerType::Emby,
            url: "http://192.168.1.5:8096".to_string(),
            api_key: "1234567890".to_string(),
            enabled: true,
            added_at: Utc::now(),
        }
    }

    fn app_with(servers: Vec<MediaServerRead>) -> App {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (mut app, _init) = App::new(Config::default(), api);
        let _ = app.update(Message::ServersLoaded(Ok(servers)));
        app
    }

    fn current_view(app: &App) -> u64 {
        app.edit.as_ref().map(|e| e.id).unwrap()
    }

    #[test]
    fn test_startup_route_from_args() {
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter();
        assert_eq!(Route::from_args(args(&[])), Route::List);
        assert_eq!(Route::from_args(args(&["--add"])), Route::Edit(ServerTarget::New));
        assert_eq!(
            Route::from_args(args(&["--edit", "4"])),
            Route::Edit(ServerTarget::Existing(4))
        );
        assert_eq!(Route::from_args(args(&["--edit", "-1"])), Route::Edit(ServerTarget::New));
        assert_eq!(Route::from_args(args(&["--verbose"])), Route::List);
    }

    #[test]
    fn test_edit_unknown_id_redirects_without_form() {
        let mut app = app_with(vec![make_server(1, "Den")]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::Existing(5))));
        assert_eq!(app.route, Route::List);
        assert!(app.edit.is_none());
        assert_eq!(app.toasts.len(), 1);
    }

    #[test]
    fn test_edit_waits_for_snapshot() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (mut app, _init) = App::new(Config::default(), api);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::Existing(1))));
        assert_eq!(app.edit.as_ref().map(|e| e.workflow.phase()), Some(Phase::Pending));

        let _ = app.update(Message::ServersLoaded(Ok(vec![make_server(1, "Den")])));
        let edit = app.edit.as_ref().unwrap();
        assert_eq!(edit.workflow.phase(), Phase::Editing);
        assert_eq!(edit.workflow.form().name, "Den");
        assert_eq!(app.service.target(), ServerTarget::Existing(1));
    }

    #[test]
    fn test_late_result_for_closed_view_is_ignored() {
        let mut app = app_with(vec![]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::New)));
        let old_view = current_view(&app);
        let _ = app.update(Message::Navigate(Route::List));
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::New)));

        let _ = app.update(Message::SubmitFinished {
            view: old_view,
            result: Ok(make_server(3, "Late")),
        });
        assert_eq!(app.route, Route::Edit(ServerTarget::New));
        assert_eq!(app.edit.as_ref().map(|e| e.workflow.phase()), Some(Phase::Editing));
    }

    #[test]
    fn test_create_success_returns_to_list_and_reloads() {
        let mut app = app_with(vec![]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::New)));
        let view = current_view(&app);
        for change in [
            FieldChange::Name("Home Emby".to_string()),
            FieldChange::Url("http://192.168.1.5:8096".to_string()),
            FieldChange::ApiKey("1234567890".to_string()),
        ] {
            let _ = app.update(Message::FormChanged(change));
        }
        let _ = app.update(Message::SubmitRequested);
        let revision = app.edit.as_ref().unwrap().workflow.revision();
        let _ = app.update(Message::TestFinished {
            view,
            revision,
            result: Ok("Connection Successful!".to_string()),
        });
        let _ = app.update(Message::SubmitRequested);
        assert!(app.edit.as_ref().unwrap().workflow.is_submitting());

        let _ = app.update(Message::SubmitFinished {
            view,
            result: Ok(make_server(9, "Home Emby")),
        });
        assert_eq!(app.route, Route::Edit(ServerTarget::New));
        assert_eq!(app.edit.as_ref().unwrap().workflow.phase(), Phase::Done);
        assert!(app.edit.as_ref().unwrap().has_pending_return());
        assert!(!app.service.is_loading());

        let _ = app.update(Message::ReturnToList { view });
        assert_eq!(app.route, Route::List);
        assert!(app.service.is_loading());
        assert_eq!(
            app.list.result,
            Some(("Media Server Created Successfully!".to_string(), ResultKind::Success))
        );

        // A second timer firing after navigation has no effect.
        let _ = app.update(Message::ReturnToList { view });
        assert_eq!(app.route, Route::List);
    }

    #[test]
    fn test_leaving_during_return_delay_still_reloads_once() {
        let mut app = app_with(vec![]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::New)));
        let view = current_view(&app);
        for change in [
            FieldChange::Name("Home Emby".to_string()),
            FieldChange::Url("http://192.168.1.5:8096".to_string()),
            FieldChange::ApiKey("1234567890".to_string()),
        ] {
            let _ = app.update(Message::FormChanged(change));
        }
        let _ = app.update(Message::SubmitRequested);
        let revision = app.edit.as_ref().unwrap().workflow.revision();
        let _ = app.update(Message::TestFinished {
            view,
            revision,
            result: Ok("Connection Successful!".to_string()),
        });
        let _ = app.update(Message::SubmitRequested);
        let _ = app.update(Message::SubmitFinished {
            view,
            result: Ok(make_server(9, "Home Emby")),
        });
        assert!(!app.service.is_loading());

        // "Back to list" before the timer fires.
        let _ = app.update(Message::CancelRequested);
        assert_eq!(app.route, Route::List);
        assert!(app.edit.is_none());
        assert!(app.service.is_loading());
        assert_eq!(
            app.list.result,
            Some(("Media Server Created Successfully!".to_string(), ResultKind::Success))
        );

        let _ = app.update(Message::ServersLoaded(Ok(vec![make_server(9, "Home Emby")])));
        let _ = app.update(Message::ReturnToList { view });
        assert!(!app.service.is_loading());
        assert_eq!(app.service.servers().len(), 1);
    }

    #[test]
    fn test_delete_reloads_now_and_after_return() {
        let mut app = app_with(vec![make_server(1, "Den")]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::Existing(1))));
        let view = current_view(&app);
        let _ = app.update(Message::DeleteRequested);
        let _ = app.update(Message::ConfirmAccepted);
        assert_eq!(app.edit.as_ref().unwrap().workflow.phase(), Phase::Deleting);

        let _ = app.update(Message::DeleteFinished {
            view,
            result: Ok("Media Server deleted".to_string()),
        });
        assert!(app.service.is_loading());
        assert!(app.edit.as_ref().unwrap().has_pending_return());

        let _ = app.update(Message::ServersLoaded(Ok(vec![])));
        assert!(!app.service.is_loading());
        assert_eq!(app.edit.as_ref().unwrap().workflow.phase(), Phase::Done);

        let _ = app.update(Message::ReturnToList { view });
        assert_eq!(app.route, Route::List);
        assert!(app.service.is_loading());
        assert_eq!(
            app.list.result,
            Some(("Media Server deleted".to_string(), ResultKind::Success))
        );
    }

    #[test]
    fn test_escape_closes_dialog_before_leaving() {
        let mut app = app_with(vec![make_server(1, "Den")]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::Existing(1))));
        let _ = app.update(Message::FormChanged(FieldChange::Name("Den 2".to_string())));
        let escape = || {
            Message::KeyPressed(
                iced::keyboard::Key::Named(iced::keyboard::key::Named::Escape),
                iced::keyboard::Modifiers::empty(),
            )
        };

        let _ = app.update(escape());
        assert_eq!(
            app.edit.as_ref().and_then(|e| e.workflow.confirmation()),
            Some(Confirmation::DiscardChanges)
        );
        let _ = app.update(escape());
        assert!(app.edit.as_ref().unwrap().workflow.confirmation().is_none());
        assert_eq!(app.route, Route::Edit(ServerTarget::Existing(1)));

        let _ = app.update(Message::CancelRequested);
        let _ = app.update(Message::ConfirmAccepted);
        assert_eq!(app.route, Route::List);
    }

    #[test]
    fn test_refresh_unknown_server_skips_request() {
        let mut app = app_with(vec![make_server(1, "Den")]);
        let _ = app.update(Message::RefreshLibrary(4));
        assert!(!app.list.refreshing);
        assert_eq!(app.toasts.len(), 1);
    }

    #[test]
    fn test_refresh_all_with_nothing_enabled() {
        let mut server = make_server(1, "Den");
        server.enabled = false;
        let mut app = app_with(vec![server]);
        let _ = app.update(Message::RefreshAllEnabled);
        assert!(!app.list.refreshing);
        assert_eq!(app.list.result.as_ref().map(|(_, k)| *k), Some(ResultKind::Info));
    }

    #[test]
    fn test_create_form_starts_from_placeholder() {
        let mut app = app_with(vec![make_server(1, "Den")]);
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::Existing(1))));
        let _ = app.update(Message::Navigate(Route::List));
        let _ = app.update(Message::Navigate(Route::Edit(ServerTarget::New)));
        let edit = app.edit.as_ref().unwrap();
        assert!(edit.workflow.is_create());
        assert_eq!(edit.workflow.form(), &MediaServerCreate::default());
    }
}
