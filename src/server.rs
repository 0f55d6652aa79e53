//! HTTP server bootstrap for Mintgate.
//!
//! This module wires together:
//! - configuration
//! - database connection pool
//! - the ledger client (explicitly constructed and injected)
//! - core services (claim service, mint orchestrator)
//! - the Axum router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::api::handlers::health::{health_check, readiness_check};
use crate::auth::{ApiKeyValidator, AuthMiddlewareState, RateLimiter};
use crate::claims::ClaimService;
use crate::infra::{EventStore, PgEventStore};
use crate::mint::{EthLedgerClient, LedgerConfig, MintOrchestrator};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Maximum database connections.
    pub max_connections: u32,
    /// Base URL this service is reachable at (used in metadata documents).
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/mintgate".to_string());

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .expect("Invalid listen address");

        let max_connections: u32 = std::env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Self {
            database_url,
            listen_addr,
            max_connections,
            public_base_url,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub claim_service: Arc<ClaimService>,
    pub orchestrator: Arc<MintOrchestrator>,
    pub public_base_url: String,
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Mintgate v{}", env!("CARGO_PKG_VERSION"));

    // Auth configuration
    let validator = match std::env::var("ADMIN_API_KEY") {
        Ok(key) => {
            info!("Admin API key is configured");
            Arc::new(ApiKeyValidator::new(&key))
        }
        Err(_) => {
            warn!("ADMIN_API_KEY not set; privileged endpoints will reject every request");
            Arc::new(ApiKeyValidator::disabled())
        }
    };

    let rate_limiter = std::env::var("RATE_LIMIT_PER_MINUTE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .map(|rpm| Arc::new(RateLimiter::new(rpm)));

    let auth_state = AuthMiddlewareState {
        validator,
        rate_limiter,
    };

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Public base URL: {}", config.public_base_url);
    info!("  Max connections: {}", config.max_connections);

    // Connect to PostgreSQL
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to PostgreSQL");

    let migrate_on_startup = std::env::var("DB_MIGRATE_ON_STARTUP")
        .ok()
        .map(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off"
            )
        })
        .unwrap_or(true);
    if migrate_on_startup {
        info!("Running database migrations...");
        crate::migrations::run_postgres(&pool).await?;
        info!("Database migrations applied");
    } else {
        info!("DB migrations skipped (DB_MIGRATE_ON_STARTUP=0)");
    }

    // Ledger client (injected; there is no service without one)
    let ledger_config = LedgerConfig::from_env().ok_or_else(|| {
        anyhow::anyhow!(
            "ledger not configured; set LEDGER_RPC_URL, MINTER_CONTRACT_ADDRESS, MINTER_PRIVATE_KEY"
        )
    })?;
    info!("Ledger client configured:");
    info!("  RPC URL: {}", ledger_config.rpc_url);
    info!("  Minter: {:?}", ledger_config.minter_address);
    let ledger = Arc::new(EthLedgerClient::new(ledger_config));

    // Initialize services
    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool));

    let batch_width = std::env::var("MINT_BATCH_WIDTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2);
    let orchestrator = Arc::new(MintOrchestrator::new(ledger).with_batch_width(batch_width));

    let claim_service = Arc::new(ClaimService::new(store.clone(), orchestrator.clone()));

    // Create application state
    let state = AppState {
        store,
        claim_service,
        orchestrator,
        public_base_url: config.public_base_url.clone(),
    };

    // Build router
    let app = build_router(auth_state)?.with_state(state);

    // Start server
    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("Mintgate is ready to accept connections");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

/// Assemble the full router; state is attached by the caller.
pub fn build_router(auth_state: AuthMiddlewareState) -> anyhow::Result<Router<AppState>> {
    let api = crate::api::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        crate::auth::auth_middleware,
    ));

    let mut router = Router::new()
        .merge(crate::api::metadata_router())
        .nest("/api", api)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router)
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ]),
    ))
}
