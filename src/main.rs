//! Membership rewards API server.

use std::error::Error;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use membership_rewards::adapters::http::{membership_router, MembershipAppState};
use membership_rewards::adapters::memory::{
    InMemoryMemberDirectory, InMemoryMembershipRepository, InMemoryMembershipRequestRepository,
    InMemoryRewardClaimRepository,
};
use membership_rewards::adapters::notify::{LoggingNotifier, MessageComposer, ResendNotifier};
use membership_rewards::adapters::plans::StaticPlanCatalog;
use membership_rewards::adapters::postgres::{
    PostgresMemberDirectory, PostgresMembershipRepository, PostgresMembershipRequestRepository,
    PostgresRewardClaimRepository,
};
use membership_rewards::config::{AppConfig, EmailConfig, ServerConfig};
use membership_rewards::ports::Notifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        json_logs = config.server.json_logs,
        database = config.database.is_some(),
        email = config.email.is_some(),
        "Starting membership rewards service"
    );

    let state = build_state(&config).await?;
    let app = membership_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn build_state(config: &AppConfig) -> Result<MembershipAppState, Box<dyn Error>> {
    let plans = Arc::new(StaticPlanCatalog::load(config.plans.catalog_path.as_deref())?);
    let notifier = build_notifier(config.email.as_ref())?;

    let state = match &config.database {
        Some(database) => {
            let pool: PgPool = database.pool_options().connect(&database.url).await?;
            if database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            MembershipAppState::new(
                Arc::new(PostgresMembershipRepository::new(pool.clone())),
                Arc::new(PostgresMembershipRequestRepository::new(pool.clone())),
                Arc::new(PostgresRewardClaimRepository::new(pool.clone())),
                plans,
                Arc::new(PostgresMemberDirectory::new(pool)),
                notifier,
            )
        }
        None => {
            tracing::warn!("No database configured, using in-memory stores");
            MembershipAppState::new(
                Arc::new(InMemoryMembershipRepository::new()),
                Arc::new(InMemoryMembershipRequestRepository::new()),
                Arc::new(InMemoryRewardClaimRepository::new()),
                plans,
                Arc::new(InMemoryMemberDirectory::new()),
                notifier,
            )
        }
    };

    Ok(state)
}

fn build_notifier(email: Option<&EmailConfig>) -> Result<Arc<dyn Notifier>, Box<dyn Error>> {
    let notifier: Arc<dyn Notifier> = match email {
        Some(email) => Arc::new(ResendNotifier::from_config(email)?),
        None => {
            tracing::warn!("No email configured, notifications will only be logged");
            let defaults = EmailConfig::default();
            Arc::new(LoggingNotifier::new(MessageComposer::new(
                defaults.store_name,
                "admin@localhost",
            )))
        }
    };
    Ok(notifier)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
