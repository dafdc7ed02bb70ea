// Test mock for the ActivitiesApi boundary.
//
// MockActivitiesApi serves a mutable in-memory catalog and scripted replies
// for each mutating call, and records every call so tests can assert on what
// reached the "network" (including that nothing did).

use std::sync::Mutex;

use async_trait::async_trait;

use activities_client::{ActivitiesApi, ApiError, Result};
use signup_common::{
    Activity, ActivityCatalog, ActivityUpdate, LoginResponse, MessageResponse, NewActivity,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn activity(description: &str, schedule: &str, max: u32, participants: &[&str]) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants: max,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// `{"Chess Club": {description:"d", schedule:"Fri 3pm", max_participants:10, participants:["a@x.com"]}}`
pub fn chess_club_catalog() -> ActivityCatalog {
    let mut catalog = ActivityCatalog::new();
    catalog.insert("Chess Club", activity("d", "Fri 3pm", 10, &["a@x.com"]));
    catalog
}

// ---------------------------------------------------------------------------
// Replies and recorded calls
// ---------------------------------------------------------------------------

/// Scripted outcome of one API call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Ok(Option<String>),
    Reject { status: u16, detail: Option<String> },
    Network,
}

impl MockReply {
    pub fn ok() -> Self {
        MockReply::Ok(None)
    }

    pub fn message(text: &str) -> Self {
        MockReply::Ok(Some(text.to_string()))
    }

    pub fn reject(status: u16, detail: &str) -> Self {
        MockReply::Reject {
            status,
            detail: Some(detail.to_string()),
        }
    }

    pub fn reject_without_detail(status: u16) -> Self {
        MockReply::Reject {
            status,
            detail: None,
        }
    }

    pub fn network() -> Self {
        MockReply::Network
    }

    fn into_result(self) -> Result<Option<String>> {
        match self {
            MockReply::Ok(text) => Ok(text),
            MockReply::Reject { status, detail } => Err(ApiError::Api { status, detail }),
            MockReply::Network => Err(ApiError::Network("connection refused".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login { username: String },
    List,
    Get { name: String },
    Create { name: String, token: Option<String> },
    Update { name: String, token: Option<String> },
    Delete { name: String, token: Option<String> },
    Signup { name: String, email: String },
    Unregister { name: String, email: String, token: Option<String> },
}

// ---------------------------------------------------------------------------
// MockActivitiesApi
// ---------------------------------------------------------------------------

/// Builder pattern: `.with_catalog()`, `.on_login()`, `.on_signup()`, ...
/// Unscripted mutating calls succeed with no message; login succeeds with
/// token `mock_token`.
pub struct MockActivitiesApi {
    catalog: Mutex<Option<ActivityCatalog>>,
    login: MockReply,
    create: MockReply,
    update: MockReply,
    delete: MockReply,
    signup: MockReply,
    unregister: MockReply,
    calls: Mutex<Vec<Call>>,
}

impl Default for MockActivitiesApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockActivitiesApi {
    pub fn new() -> Self {
        Self {
            catalog: Mutex::new(Some(ActivityCatalog::new())),
            login: MockReply::message("mock_token"),
            create: MockReply::ok(),
            update: MockReply::ok(),
            delete: MockReply::ok(),
            signup: MockReply::ok(),
            unregister: MockReply::ok(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_catalog(self, catalog: ActivityCatalog) -> Self {
        *self.catalog.lock().unwrap() = Some(catalog);
        self
    }

    /// Catalog fetches fail with a network error.
    pub fn failing_catalog(self) -> Self {
        *self.catalog.lock().unwrap() = None;
        self
    }

    /// Login reply; an `Ok` message is used as the token.
    pub fn on_login(mut self, reply: MockReply) -> Self {
        self.login = reply;
        self
    }

    pub fn on_create(mut self, reply: MockReply) -> Self {
        self.create = reply;
        self
    }

    pub fn on_update(mut self, reply: MockReply) -> Self {
        self.update = reply;
        self
    }

    pub fn on_delete(mut self, reply: MockReply) -> Self {
        self.delete = reply;
        self
    }

    pub fn on_signup(mut self, reply: MockReply) -> Self {
        self.signup = reply;
        self
    }

    pub fn on_unregister(mut self, reply: MockReply) -> Self {
        self.unregister = reply;
        self
    }

    /// Swap the catalog between calls, as if the server changed.
    pub fn set_catalog(&self, catalog: ActivityCatalog) {
        *self.catalog.lock().unwrap() = Some(catalog);
    }

    /// Make later catalog fetches fail, as if the server went away.
    pub fn drop_catalog(&self) {
        *self.catalog.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::List).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn message(reply: &MockReply) -> Result<MessageResponse> {
        let message = reply.clone().into_result()?;
        Ok(MessageResponse { message })
    }
}

#[async_trait]
impl ActivitiesApi for MockActivitiesApi {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse> {
        self.record(Call::Login {
            username: username.to_string(),
        });
        let token = self.login.clone().into_result()?;
        Ok(LoginResponse { token })
    }

    async fn list_activities(&self) -> Result<ActivityCatalog> {
        self.record(Call::List);
        self.catalog
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Network("MockActivitiesApi: catalog unavailable".to_string()))
    }

    async fn get_activity(&self, name: &str) -> Result<Activity> {
        self.record(Call::Get {
            name: name.to_string(),
        });
        let catalog = self.catalog.lock().unwrap().clone().ok_or_else(|| {
            ApiError::Network("MockActivitiesApi: catalog unavailable".to_string())
        })?;
        catalog.get(name).cloned().ok_or_else(|| ApiError::Api {
            status: 404,
            detail: Some("Activity not found".to_string()),
        })
    }

    async fn create_activity(
        &self,
        token: Option<&str>,
        activity: &NewActivity,
    ) -> Result<MessageResponse> {
        self.record(Call::Create {
            name: activity.name.clone(),
            token: token.map(str::to_string),
        });
        Self::message(&self.create)
    }

    async fn update_activity(
        &self,
        token: Option<&str>,
        name: &str,
        _update: &ActivityUpdate,
    ) -> Result<MessageResponse> {
        self.record(Call::Update {
            name: name.to_string(),
            token: token.map(str::to_string),
        });
        Self::message(&self.update)
    }

    async fn delete_activity(&self, token: Option<&str>, name: &str) -> Result<MessageResponse> {
        self.record(Call::Delete {
            name: name.to_string(),
            token: token.map(str::to_string),
        });
        Self::message(&self.delete)
    }

    async fn signup(&self, name: &str, email: &str) -> Result<MessageResponse> {
        self.record(Call::Signup {
            name: name.to_string(),
            email: email.to_string(),
        });
        Self::message(&self.signup)
    }

    async fn unregister(
        &self,
        token: Option<&str>,
        name: &str,
        email: &str,
    ) -> Result<MessageResponse> {
        self.record(Call::Unregister {
            name: name.to_string(),
            email: email.to_string(),
            token: token.map(str::to_string),
        });
        Self::message(&self.unregister)
    }
}
