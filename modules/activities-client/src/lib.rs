pub mod error;
pub mod traits;

pub use error::{ApiError, Result};
pub use traits::ActivitiesApi;

use serde::de::DeserializeOwned;
use signup_common::{
    Activity, ActivityCatalog, ActivityUpdate, ErrorBody, LoginRequest, LoginResponse,
    MessageResponse, NewActivity,
};

/// Client for the Activities REST API. No timeout or retry is configured; a
/// slow server simply delays the caller.
pub struct ActivitiesClient {
    client: reqwest::Client,
    base_url: String,
}

impl ActivitiesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange admin credentials for a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let url = format!("{}/admin/login", self.base_url);
        let resp = self.execute(self.client.post(&url).json(&body), None).await?;
        Ok(lenient_body(resp).await)
    }

    /// Fetch the whole catalog.
    pub async fn list_activities(&self) -> Result<ActivityCatalog> {
        let url = format!("{}/activities", self.base_url);
        let resp = self.execute(self.client.get(&url), None).await?;
        let catalog: ActivityCatalog = strict_body(resp).await?;
        tracing::debug!(count = catalog.len(), "Fetched activity catalog");
        Ok(catalog)
    }

    pub async fn get_activity(&self, name: &str) -> Result<Activity> {
        let url = self.activity_url(name);
        let resp = self.execute(self.client.get(&url), None).await?;
        strict_body(resp).await
    }

    pub async fn create_activity(
        &self,
        token: Option<&str>,
        activity: &NewActivity,
    ) -> Result<MessageResponse> {
        let url = format!("{}/activities", self.base_url);
        let resp = self
            .execute(self.client.post(&url).json(activity), token)
            .await?;
        tracing::info!(activity = %activity.name, "Activity created");
        Ok(lenient_body(resp).await)
    }

    pub async fn update_activity(
        &self,
        token: Option<&str>,
        name: &str,
        update: &ActivityUpdate,
    ) -> Result<MessageResponse> {
        let url = self.activity_url(name);
        let resp = self.execute(self.client.put(&url).json(update), token).await?;
        tracing::info!(activity = name, "Activity updated");
        Ok(lenient_body(resp).await)
    }

    pub async fn delete_activity(&self, token: Option<&str>, name: &str) -> Result<MessageResponse> {
        let url = self.activity_url(name);
        let resp = self.execute(self.client.delete(&url), token).await?;
        tracing::info!(activity = name, "Activity deleted");
        Ok(lenient_body(resp).await)
    }

    /// Sign a participant up. Public; never carries a token.
    pub async fn signup(&self, name: &str, email: &str) -> Result<MessageResponse> {
        let url = format!(
            "{}/signup?email={}",
            self.activity_url(name),
            urlencoding::encode(email)
        );
        let resp = self.execute(self.client.post(&url), None).await?;
        Ok(lenient_body(resp).await)
    }

    /// Withdraw a participant. The token, when present, marks the removal as
    /// done by an admin.
    pub async fn unregister(
        &self,
        token: Option<&str>,
        name: &str,
        email: &str,
    ) -> Result<MessageResponse> {
        let url = format!(
            "{}/unregister?email={}",
            self.activity_url(name),
            urlencoding::encode(email)
        );
        let resp = self.execute(self.client.delete(&url), token).await?;
        Ok(lenient_body(resp).await)
    }

    fn activity_url(&self, name: &str) -> String {
        format!("{}/activities/{}", self.base_url, urlencoding::encode(name))
    }

    /// Send the request and turn any non-2xx status into `ApiError::Api`,
    /// keeping the server's `detail` when it sent one.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.reason().map(str::to_string));
            tracing::debug!(status = status.as_u16(), ?detail, "Activities API rejected request");
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(resp)
    }
}

async fn strict_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Success is judged by status alone, so an empty or unexpected success body
/// is not an error.
async fn lenient_body<T: DeserializeOwned + Default>(resp: reqwest::Response) -> T {
    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read success body");
            return T::default();
        }
    };
    serde_json::from_str(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring unparseable success body");
        T::default()
    })
}
