use std::sync::Arc;

use sms_spam_api::{
    auth::TokenKeys, classifier::SpamClassifier, config::Config, rest, seed_initial_user, store,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sms_spam_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = store::connect(&config.database_url)
        .await
        .map_err(|e| format!("failed to open database {}: {:?}", config.database_url, e))?;

    if let Some(initial_user) = &config.initial_user {
        seed_initial_user(&pool, initial_user)
            .await
            .map_err(|e| format!("failed to create initial user: {:?}", e))?;
    }

    // Missing artifacts leave the service up with prediction disabled
    let classifier = SpamClassifier::load(&config.model_path, &config.tokenizer_path);

    let keys = TokenKeys::new(
        &config.jwt_secret,
        chrono::Duration::minutes(config.token_ttl_minutes),
    );
    tracing::info!(ttl_minutes = keys.ttl().num_minutes(), "Token issuer ready");

    let app_state = AppState::new(pool, keys, Arc::new(classifier));

    let app = rest::router(app_state);
    tracing::info!("REST API listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
