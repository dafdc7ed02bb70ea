// ActivitiesApi is the seam between the view controller and the network.
// ActivitiesClient implements it over HTTP; tests swap in an in-memory mock.

use async_trait::async_trait;

use signup_common::{
    Activity, ActivityCatalog, ActivityUpdate, LoginResponse, MessageResponse, NewActivity,
};

use crate::{ActivitiesClient, Result};

#[async_trait]
pub trait ActivitiesApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;

    async fn list_activities(&self) -> Result<ActivityCatalog>;

    async fn get_activity(&self, name: &str) -> Result<Activity>;

    async fn create_activity(
        &self,
        token: Option<&str>,
        activity: &NewActivity,
    ) -> Result<MessageResponse>;

    async fn update_activity(
        &self,
        token: Option<&str>,
        name: &str,
        update: &ActivityUpdate,
    ) -> Result<MessageResponse>;

    async fn delete_activity(&self, token: Option<&str>, name: &str) -> Result<MessageResponse>;

    async fn signup(&self, name: &str, email: &str) -> Result<MessageResponse>;

    async fn unregister(
        &self,
        token: Option<&str>,
        name: &str,
        email: &str,
    ) -> Result<MessageResponse>;
}

#[async_trait]
impl ActivitiesApi for ActivitiesClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.login(username, password).await
    }

    async fn list_activities(&self) -> Result<ActivityCatalog> {
        self.list_activities().await
    }

    async fn get_activity(&self, name: &str) -> Result<Activity> {
        self.get_activity(name).await
    }

    async fn create_activity(
        &self,
        token: Option<&str>,
        activity: &NewActivity,
    ) -> Result<MessageResponse> {
        self.create_activity(token, activity).await
    }

    async fn update_activity(
        &self,
        token: Option<&str>,
        name: &str,
        update: &ActivityUpdate,
    ) -> Result<MessageResponse> {
        self.update_activity(token, name, update).await
    }

    async fn delete_activity(&self, token: Option<&str>, name: &str) -> Result<MessageResponse> {
        self.delete_activity(token, name).await
    }

    async fn signup(&self, name: &str, email: &str) -> Result<MessageResponse> {
        self.signup(name, email).await
    }

    async fn unregister(
        &self,
        token: Option<&str>,
        name: &str,
        email: &str,
    ) -> Result<MessageResponse> {
        self.unregister(token, name, email).await
    }
}
