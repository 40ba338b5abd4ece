//! Newsroom API Server
//!
//! Article review and approval for a news platform. Approving an article
//! notifies its subscribers by mail and announces it on X.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

use adapters::{
    HttpMailTransport, MailTransport, NoopMessageTransport, PostgresAccountRepository,
    PostgresArticleRepository, PostgresDeliveryLedger, PostgresPublisherRepository,
    PostgresSubscriptionRepository, XClient,
};
use app::{
    AnnouncementPublisher, ApprovalOrchestrator, ApprovalTrigger, ArticleService,
    NotificationDispatcher, SubscriptionIndex, SubscriptionService,
};
use config::Config;

type Orchestrator = ApprovalOrchestrator<
    PostgresSubscriptionRepository,
    PostgresAccountRepository,
    PostgresPublisherRepository,
    MailTransport,
    PostgresDeliveryLedger,
    XClient,
>;

pub type AppArticleService = ArticleService<
    PostgresArticleRepository,
    PostgresAccountRepository,
    PostgresPublisherRepository,
    Orchestrator,
>;

pub type AppSubscriptionService = SubscriptionService<
    PostgresSubscriptionRepository,
    PostgresAccountRepository,
    PostgresPublisherRepository,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<AppArticleService>,
    pub subscription_service: Arc<AppSubscriptionService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,newsroom_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Newsroom API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let account_repo = Arc::new(PostgresAccountRepository::new(db.clone()));
    let publisher_repo = Arc::new(PostgresPublisherRepository::new(db.clone()));
    let article_repo = Arc::new(PostgresArticleRepository::new(db.clone()));
    let subscription_repo = Arc::new(PostgresSubscriptionRepository::new(db.clone()));
    let ledger = Arc::new(PostgresDeliveryLedger::new(db.clone()));

    let transport = match config.mail_api() {
        Some((url, key)) => MailTransport::Http(HttpMailTransport::new(
            url.to_string(),
            key.to_string(),
            config.mail_from.clone(),
        )),
        None => {
            tracing::warn!("MAIL_API_URL/MAIL_API_KEY not set, notifications will only be logged");
            MailTransport::Noop(NoopMessageTransport)
        }
    };

    let credentials = config.x_credentials();
    let x_client = XClient::from_credentials(config.x_api_url.clone(), &credentials)
        .map(|c| Arc::new(c.with_max_len(config.announcement_max_len)));
    if x_client.is_none() {
        if credentials.has_api_key() {
            tracing::warn!("X_API_KEY is set without an access or bearer token, announcements disabled");
        } else {
            tracing::info!("X credentials not configured, announcements disabled");
        }
    }

    // Create application services
    let orchestrator = Arc::new(ApprovalOrchestrator::new(
        SubscriptionIndex::new(subscription_repo.clone(), account_repo.clone()),
        NotificationDispatcher::new(Arc::new(transport), ledger.clone())
            .with_concurrency(config.notify_concurrency)
            .with_send_timeout(config.send_timeout),
        AnnouncementPublisher::new(x_client, ledger).with_timeout(config.announcement_timeout),
        account_repo.clone(),
        publisher_repo.clone(),
        config.public_base_url.clone(),
    ));

    let article_service = Arc::new(ArticleService::new(
        article_repo,
        account_repo.clone(),
        publisher_repo.clone(),
        ApprovalTrigger::new(orchestrator),
    ));

    let subscription_service = Arc::new(SubscriptionService::new(
        subscription_repo,
        account_repo,
        publisher_repo,
    ));

    // Create app state
    let state = AppState {
        article_service,
        subscription_service,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/articles", post(handlers::submit_article))
        .route(
            "/articles/:id",
            get(handlers::get_article).patch(handlers::edit_article),
        )
        .route("/articles/:id/approve", post(handlers::approve_article))
        .route("/subscriptions", post(handlers::subscribe))
        .route("/subscriptions/:id", delete(handlers::unsubscribe))
        .route(
            "/readers/:id/subscriptions",
            get(handlers::list_reader_subscriptions),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // In-flight approvals finish their side effects before the process exits
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
