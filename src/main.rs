use std::sync::Arc;

use alumni_portal::config::{init_db, run_migrations, Config};
use alumni_portal::services::{jwt::JwtService, mailer::mailer_from_config};
use alumni_portal::store::MySqlStore;
use alumni_portal::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alumni_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    run_migrations(&db).await.expect("Failed to run migrations");

    if !config.smtp.is_configured() {
        tracing::warn!("SMTP_HOST/SMTP_FROM not set, reset mails will only be logged");
    }

    let store = Arc::new(MySqlStore::new(db.clone()));
    let state = AppState {
        accounts: store.clone(),
        biodata: store,
        jwt_service: JwtService::new(config.jwt_secret.clone()),
        mailer: mailer_from_config(&config.smtp),
        public_url: config.public_url.clone(),
        expose_error_details: !config.is_production(),
    };

    let app = alumni_portal::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    db.close().await;
    tracing::info!("Shut down cleanly");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
