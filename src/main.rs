use goal_dashboard::{
    SheetConfig, AppState, ingest::SheetsClient, load_goals, resolve_data_path, router,
    seed::TimeWindow,
};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let goals = load_goals(&data_path).await;
    let window = TimeWindow::challenge()?;

    let sheet_config = SheetConfig::from_env();
    if let Err(err) = sheet_config.credentials() {
        warn!("{err}; /api/sync will be unavailable");
    }
    let sheets = SheetsClient::new(sheet_config)?;

    let state = AppState::new(data_path, goals, window, sheets);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
