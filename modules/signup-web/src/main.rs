use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use activities_client::{ActivitiesApi, ActivitiesClient};
use signup_common::Config;
use signup_web::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("signup_web=info".parse()?)
                .add_directive("activities_client=info".parse()?)
                .add_directive("signup_common=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let api: Arc<dyn ActivitiesApi> = Arc::new(ActivitiesClient::new(&config.api_base_url));
    let state = Arc::new(AppState::new(api, &config));
    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Activity sign-up web starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
