use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use activities_client::{ActivitiesApi, ApiError};

use crate::events::UiEvent;
use crate::page::{ActivityDraft, EditForm, ListState, Page, SignupForm, ViewMode};
use crate::session::Session;

// --- User-facing texts ---

pub const LOAD_FAILED: &str = "Failed to load activities, please try again later.";

const LOGIN_REJECTED: &str = "Login failed";
const LOGIN_FAILED: &str = "An error occurred while logging in";
const CREATE_OK: &str = "Activity created successfully";
const CREATE_REJECTED: &str = "Failed to create activity";
const CREATE_FAILED: &str = "An error occurred while creating the activity";
const DETAIL_FAILED: &str = "Failed to load activity details";
const UPDATE_OK: &str = "Activity updated successfully";
const UPDATE_REJECTED: &str = "Failed to update activity";
const UPDATE_FAILED: &str = "An error occurred while updating the activity";
const DELETE_OK: &str = "Activity deleted successfully";
const DELETE_REJECTED: &str = "Failed to delete activity";
const DELETE_FAILED: &str = "An error occurred while deleting the activity";
const UNREGISTER_OK: &str = "Participant removed";
const UNREGISTER_FAILED: &str = "Failed to unregister, please try again";
const SIGNUP_OK: &str = "Signed up successfully";
const SIGNUP_INCOMPLETE: &str = "Please enter an email and choose an activity";
const SIGNUP_FAILED: &str = "Sign-up failed, please try again";
const OPERATION_REJECTED: &str = "Operation failed";

/// Owns the state of one page and turns user actions into API calls.
///
/// No operation returns an error: every failure ends up as a transient
/// message (or the list failure text) on the page.
pub struct ViewController<A: ActivitiesApi + ?Sized> {
    api: Arc<A>,
    session: Session,
    page: Page,
}

impl<A: ActivitiesApi + ?Sized> ViewController<A> {
    pub fn new(api: Arc<A>, session: Session, message_ttl: Duration) -> Self {
        let mut page = Page::new(message_ttl);
        if session.is_admin() {
            page.show_admin_panel();
        }
        Self { api, session, page }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Route a delegated UI event to its action.
    pub async fn dispatch(&mut self, event: UiEvent) {
        if event.requires_admin() && !self.session.is_admin() {
            debug!(action = event.name(), "Ignoring admin action outside admin view");
            return;
        }

        match event {
            UiEvent::Login { username, password } => self.login_admin(&username, &password).await,
            UiEvent::OpenCreateForm => self.open_create_form(),
            UiEvent::CancelCreateForm => self.cancel_create_form(),
            UiEvent::CreateActivity {
                name,
                description,
                schedule,
                max_participants,
            } => {
                self.submit_new_activity(ActivityDraft {
                    name,
                    description,
                    schedule,
                    max_participants,
                })
                .await
            }
            UiEvent::Edit { activity } => self.begin_edit(&activity).await,
            UiEvent::CancelEdit => self.cancel_edit(),
            UiEvent::SaveEdit {
                activity,
                description,
                schedule,
                max_participants,
            } => {
                let draft = ActivityDraft {
                    name: activity.clone(),
                    description,
                    schedule,
                    max_participants,
                };
                self.submit_edit(&activity, draft).await
            }
            UiEvent::DeleteActivity {
                activity,
                confirmed,
            } => self.delete_activity(&activity, confirmed).await,
            UiEvent::Unregister { activity, email } => {
                self.unregister_participant(&activity, &email).await
            }
            UiEvent::Signup { email, activity } => self.submit_signup(&email, &activity).await,
            UiEvent::Refresh => self.load_catalog(self.session.view_mode()).await,
        }
    }

    /// Fetch the whole catalog and replace the target list with it.
    pub async fn load_catalog(&mut self, mode: ViewMode) {
        match self.api.list_activities().await {
            Ok(catalog) => {
                debug!(count = catalog.len(), ?mode, "Rendering activity catalog");
                self.page.replace_list(mode, ListState::Loaded(catalog));
            }
            Err(e) => {
                warn!(error = %e, ?mode, "Failed to load activities");
                self.page.replace_list(mode, ListState::Failed);
            }
        }
    }

    pub fn open_create_form(&mut self) {
        if self.page.create_form.is_none() {
            self.page.create_form = Some(ActivityDraft::default());
        }
    }

    pub fn cancel_create_form(&mut self) {
        self.page.create_form = None;
    }

    pub async fn submit_new_activity(&mut self, draft: ActivityDraft) {
        let new = draft.to_new_activity();
        self.page.create_form = Some(draft);
        let new = match new {
            Ok(new) => new,
            Err(e) => {
                self.page.admin_message.error(e.to_string());
                return;
            }
        };

        match self.api.create_activity(self.session.token(), &new).await {
            Ok(_) => {
                info!(activity = %new.name, "Activity created");
                self.page.create_form = None;
                self.load_catalog(ViewMode::Admin).await;
                self.page.admin_message.success(CREATE_OK);
            }
            Err(e) => {
                let text = failure_text(&e, CREATE_REJECTED, CREATE_FAILED);
                self.page.admin_message.error(text);
            }
        }
    }

    /// Open a pre-filled edit form for one activity, hiding its card.
    pub async fn begin_edit(&mut self, name: &str) {
        match self.api.get_activity(name).await {
            Ok(activity) => {
                self.page.edit_form = Some(EditForm {
                    activity: name.to_string(),
                    draft: ActivityDraft::from_activity(name, &activity),
                });
            }
            Err(e) => {
                warn!(error = %e, activity = name, "Failed to load activity details");
                self.page.admin_message.error(DETAIL_FAILED);
            }
        }
    }

    /// Drop the edit form; the hidden card shows again.
    pub fn cancel_edit(&mut self) {
        self.page.edit_form = None;
    }

    pub async fn submit_edit(&mut self, name: &str, draft: ActivityDraft) {
        let update = draft.to_update();
        self.page.edit_form = Some(EditForm {
            activity: name.to_string(),
            draft,
        });
        let update = match update {
            Ok(update) => update,
            Err(e) => {
                self.page.admin_message.error(e.to_string());
                return;
            }
        };

        match self
            .api
            .update_activity(self.session.token(), name, &update)
            .await
        {
            Ok(_) => {
                info!(activity = name, "Activity updated");
                self.load_catalog(ViewMode::Admin).await;
                self.page.admin_message.success(UPDATE_OK);
            }
            Err(e) => {
                let text = failure_text(&e, UPDATE_REJECTED, UPDATE_FAILED);
                self.page.admin_message.error(text);
            }
        }
    }

    /// Delete an activity. Does nothing unless the user confirmed the prompt.
    pub async fn delete_activity(&mut self, name: &str, confirmed: bool) {
        if !confirmed {
            debug!(activity = name, "Delete not confirmed");
            return;
        }

        match self.api.delete_activity(self.session.token(), name).await {
            Ok(_) => {
                info!(activity = name, "Activity deleted");
                self.load_catalog(ViewMode::Admin).await;
                self.page.admin_message.success(DELETE_OK);
            }
            Err(e) => {
                let text = failure_text(&e, DELETE_REJECTED, DELETE_FAILED);
                self.page.admin_message.error(text);
            }
        }
    }

    pub async fn unregister_participant(&mut self, name: &str, email: &str) {
        match self
            .api
            .unregister(self.session.token(), name, email)
            .await
        {
            Ok(resp) => {
                let text = resp.message.unwrap_or_else(|| UNREGISTER_OK.to_string());
                self.page.message.success(text);
                self.load_catalog(self.session.view_mode()).await;
            }
            Err(e) => {
                let text = failure_text(&e, OPERATION_REJECTED, UNREGISTER_FAILED);
                self.page.message.error(text);
            }
        }
    }

    pub async fn submit_signup(&mut self, email: &str, name: &str) {
        self.page.signup_form = SignupForm {
            email: email.to_string(),
            activity: name.to_string(),
        };
        if email.trim().is_empty() || name.is_empty() {
            self.page.message.error(SIGNUP_INCOMPLETE);
            return;
        }

        match self.api.signup(name, email.trim()).await {
            Ok(resp) => {
                let text = resp.message.unwrap_or_else(|| SIGNUP_OK.to_string());
                self.page.message.success(text);
                self.page.signup_form = SignupForm::default();
                self.load_catalog(ViewMode::Public).await;
            }
            Err(e) => {
                let text = failure_text(&e, OPERATION_REJECTED, SIGNUP_FAILED);
                self.page.message.error(text);
            }
        }
    }

    pub async fn login_admin(&mut self, username: &str, password: &str) {
        self.page.login_username = username.to_string();

        match self.api.login(username, password).await {
            Ok(resp) => {
                info!("Admin login succeeded");
                self.session.promote(resp.token);
                self.page.show_admin_panel();
                self.load_catalog(ViewMode::Admin).await;
            }
            Err(e) => {
                let text = failure_text(&e, LOGIN_REJECTED, LOGIN_FAILED);
                self.page.admin_message.error(text);
            }
        }
    }
}

/// Message for a failed call: the server's reason when it rejected the call
/// with one, else a fixed fallback for rejections or for transport failures.
fn failure_text(err: &ApiError, rejected: &str, transport: &str) -> String {
    if err.is_rejection() {
        err.detail().unwrap_or(rejected).to_string()
    } else {
        warn!(error = %err, "Request to activities API failed");
        transport.to_string()
    }
}
