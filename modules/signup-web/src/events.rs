// Events delivered by the page's delegated listener. The listener reads the
// closest `[data-action]` element, copies its `data-activity` / `data-email`
// attributes and, for forms, every named field; `action` selects the variant.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum UiEvent {
    Login {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    OpenCreateForm,
    CancelCreateForm,
    CreateActivity {
        #[serde(default)]
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        schedule: String,
        #[serde(default)]
        max_participants: String,
    },
    Edit {
        activity: String,
    },
    CancelEdit,
    SaveEdit {
        activity: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        schedule: String,
        #[serde(default)]
        max_participants: String,
    },
    DeleteActivity {
        activity: String,
        /// Answer to the browser's confirmation prompt.
        #[serde(default)]
        confirmed: bool,
    },
    Unregister {
        activity: String,
        email: String,
    },
    Signup {
        #[serde(default)]
        email: String,
        #[serde(default)]
        activity: String,
    },
    Refresh,
}

impl UiEvent {
    /// Events that only admin controls can produce.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            UiEvent::OpenCreateForm
                | UiEvent::CancelCreateForm
                | UiEvent::CreateActivity { .. }
                | UiEvent::Edit { .. }
                | UiEvent::CancelEdit
                | UiEvent::SaveEdit { .. }
                | UiEvent::DeleteActivity { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Login { .. } => "login",
            UiEvent::OpenCreateForm => "open-create-form",
            UiEvent::CancelCreateForm => "cancel-create-form",
            UiEvent::CreateActivity { .. } => "create-activity",
            UiEvent::Edit { .. } => "edit",
            UiEvent::CancelEdit => "cancel-edit",
            UiEvent::SaveEdit { .. } => "save-edit",
            UiEvent::DeleteActivity { .. } => "delete-activity",
            UiEvent::Unregister { .. } => "unregister",
            UiEvent::Signup { .. } => "signup",
            UiEvent::Refresh => "refresh",
        }
    }
}
