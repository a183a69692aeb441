//! HTTP server and composition root

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use relay_common::{AppConfig, JwtService};
use relay_core::{PushNotifier, RealtimeBroadcaster, SnowflakeGenerator};
use relay_db::{
    create_pool, PgChatRepository, PgMessageRepository, PgReactionRepository,
    PgRecipientRepository, PgUserRepository, PoolConfig,
};
use relay_service::{PresenceRegistry, ServiceContextBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::connection::ConnectionManager;
use crate::push::{DisabledPushNotifier, HttpPushNotifier};

/// Wire every dependency together
///
/// The connection manager doubles as the broadcaster handed to the service
/// layer, so services emit straight into live sockets.
pub async fn create_gateway_state(config: AppConfig) -> anyhow::Result<GatewayState> {
    let pool = create_pool(&PoolConfig::from_app_config(&config.database))
        .await
        .context("Database pool creation failed")?;

    let connections = Arc::new(ConnectionManager::new());

    let push_notifier: Arc<dyn PushNotifier> = if config.push.is_enabled() {
        Arc::new(HttpPushNotifier::new(&config.push).context("Push client creation failed")?)
    } else {
        info!("Push delivery disabled (no endpoint configured)");
        Arc::new(DisabledPushNotifier)
    };

    let services = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .recipient_repo(Arc::new(PgRecipientRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool)))
        .broadcaster(connections.clone() as Arc<dyn RealtimeBroadcaster>)
        .push_notifier(push_notifier)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .build()
        .context("Service context assembly failed")?;

    let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.leeway));

    Ok(GatewayState {
        services: Arc::new(services),
        connections,
        presence: Arc::new(PresenceRegistry::new()),
        jwt,
        config: Arc::new(config),
    })
}

/// Build the route table
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Router plus middleware
pub fn create_app(state: GatewayState) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Bind and serve until the process is stopped
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let address = config.gateway.address();
    let state = create_gateway_state(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Gateway listening");
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;
    Ok(())
}
