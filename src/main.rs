use std::time::Duration;

mod app;
mod auth;
mod bills;
mod config;
mod error;
mod extract;
mod groups;
mod notify;
mod state;
mod store;
mod summary;

use crate::summary::reminder::{run_reminder, spawn_schedule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "billsplit=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    // `billsplit remind` runs the reminder job once, for cron-style schedulers.
    if std::env::args().nth(1).as_deref() == Some("remind") {
        let outcome = run_reminder(app_state.table.as_ref(), app_state.notifier.as_ref()).await?;
        tracing::info!(?outcome, "reminder job finished");
        return Ok(());
    }

    if let Some(secs) = app_state.config.reminder_interval_secs {
        tracing::info!(every_secs = secs, "scheduling in-process reminders");
        spawn_schedule(app_state.clone(), Duration::from_secs(secs));
    }

    app::serve(app::build_app(app_state)).await
}
