use std::time::Duration;

use thiserror::Error;

use signup_common::{Activity, ActivityCatalog, ActivityUpdate, NewActivity};

use crate::messages::MessageArea;

/// Which of the two list views is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Public,
    Admin,
}

impl ViewMode {
    pub fn is_admin(self) -> bool {
        matches!(self, ViewMode::Admin)
    }
}

/// Content of one list container. Each load replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(ActivityCatalog),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

// --- Activity forms ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Activity name is required")]
    MissingName,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Max participants must be a whole number of at least 1")]
    InvalidCapacity,
}

/// Raw values of the create/edit form, kept as typed so a rejected submit can
/// be shown again unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: String,
}

impl ActivityDraft {
    pub fn from_activity(name: &str, activity: &Activity) -> Self {
        Self {
            name: name.to_string(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            max_participants: activity.max_participants.to_string(),
        }
    }

    pub fn capacity(&self) -> Result<u32, DraftError> {
        match self.max_participants.trim().parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(DraftError::InvalidCapacity),
        }
    }

    pub fn to_new_activity(&self) -> Result<NewActivity, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }
        let update = self.to_update()?;
        Ok(NewActivity {
            name: name.to_string(),
            description: update.description,
            schedule: update.schedule,
            max_participants: update.max_participants,
        })
    }

    pub fn to_update(&self) -> Result<ActivityUpdate, DraftError> {
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingField("Description"));
        }
        if self.schedule.trim().is_empty() {
            return Err(DraftError::MissingField("Schedule"));
        }
        Ok(ActivityUpdate {
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            max_participants: self.capacity()?,
        })
    }
}

/// Edit form shown in place of an activity's card. The card stays in the list,
/// hidden, until the form is saved or cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub activity: String,
    pub draft: ActivityDraft,
}

// --- Page ---

/// Everything one browser page shows.
#[derive(Debug, Clone)]
pub struct Page {
    pub public_list: ListState,
    pub admin_list: ListState,
    /// Options of the sign-up selector, in catalog order.
    pub activity_options: Vec<String>,
    pub signup_form: SignupForm,
    pub create_form: Option<ActivityDraft>,
    pub edit_form: Option<EditForm>,
    pub login_visible: bool,
    pub admin_panel_visible: bool,
    /// Last username typed into the login form. The password is never kept.
    pub login_username: String,
    pub message: MessageArea,
    pub admin_message: MessageArea,
}

impl Page {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            public_list: ListState::Loading,
            admin_list: ListState::Loading,
            activity_options: Vec::new(),
            signup_form: SignupForm::default(),
            create_form: None,
            edit_form: None,
            login_visible: true,
            admin_panel_visible: false,
            login_username: String::new(),
            message: MessageArea::new(message_ttl),
            admin_message: MessageArea::new(message_ttl),
        }
    }

    pub fn list(&self, mode: ViewMode) -> &ListState {
        match mode {
            ViewMode::Public => &self.public_list,
            ViewMode::Admin => &self.admin_list,
        }
    }

    /// Install the result of a fetch. A successful admin fetch is the newest
    /// catalog there is, so the public list and the selector take it too.
    pub(crate) fn replace_list(&mut self, mode: ViewMode, state: ListState) {
        match mode {
            ViewMode::Public => self.replace_public(state),
            ViewMode::Admin => {
                // The create and edit forms live inside the admin list.
                self.create_form = None;
                self.edit_form = None;
                if let ListState::Loaded(_) = &state {
                    self.replace_public(state.clone());
                }
                self.admin_list = state;
            }
        }
    }

    fn replace_public(&mut self, state: ListState) {
        if let ListState::Loaded(catalog) = &state {
            self.activity_options = catalog.names().map(str::to_string).collect();
        }
        self.public_list = state;
    }

    pub(crate) fn show_admin_panel(&mut self) {
        self.login_visible = false;
        self.admin_panel_visible = true;
    }
}
