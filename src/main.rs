use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use slotbook::config::AppConfig;
use slotbook::db;
use slotbook::handlers;
use slotbook::models::DataMode;
use slotbook::services::mail::resend::ResendMailer;
use slotbook::services::mail::{LogMailer, Mailer};
use slotbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let (conn, mode) = if config.demo_mode {
        tracing::warn!("DEMO_MODE set, serving synthetic data");
        (db::init_demo_db(Utc::now().date_naive())?, DataMode::Demo)
    } else {
        match db::init_db(&config.database_url) {
            Ok(conn) => (conn, DataMode::Database),
            Err(e) => {
                tracing::error!(
                    error = %format!("{e:#}"),
                    path = %config.database_url,
                    "database unavailable, falling back to demo data"
                );
                (db::init_demo_db(Utc::now().date_naive())?, DataMode::Demo)
            }
        }
    };

    let mailer: Box<dyn Mailer> = if config.resend_api_key.is_empty() || config.contact_to_email.is_empty() {
        tracing::info!("mail delivery not configured, contact messages will be logged");
        Box::new(LogMailer)
    } else {
        tracing::info!(to = %config.contact_to_email, "using Resend for contact mail");
        Box::new(ResendMailer::new(
            config.resend_api_key.clone(),
            config.contact_from_email.clone(),
            config.contact_to_email.clone(),
        ))
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        mode,
        config: config.clone(),
        mailer,
    });

    let app = handlers::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(mode = mode.as_str(), "starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
