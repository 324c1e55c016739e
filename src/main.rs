use lead_quality_engine::composer::MessageComposer;
use lead_quality_engine::config::Config;
use lead_quality_engine::db::Database;
use lead_quality_engine::generator::{TextGenerator, UnavailableGenerator};
use lead_quality_engine::handlers::AppState;
use lead_quality_engine::lead_store::{InMemoryLeadStore, LeadStore, PgLeadStore};
use lead_quality_engine::llm_client::OpenAiCompatibleClient;
use lead_quality_engine::routes;
use moka::future::Cache;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Lead storage (PostgreSQL when configured, in memory otherwise).
/// - Text-generation client and message cache.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_quality_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Lead storage
    let store: Arc<dyn LeadStore> = match config.database_url {
        Some(ref url) => {
            let db = Database::new(url).await?;
            tracing::info!("Database connection pool established");
            Arc::new(PgLeadStore::new(db.pool))
        }
        None => {
            tracing::info!("Using in-memory lead store");
            Arc::new(InMemoryLeadStore::new())
        }
    };

    // Text generation client; a broken client still serves template messages
    let generator: Arc<dyn TextGenerator> = match OpenAiCompatibleClient::new(&config.llm) {
        Ok(client) => {
            tracing::info!(
                "✓ Text generation client initialized: {} ({})",
                config.llm.base_url,
                config.llm.model
            );
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!("Failed to initialize text generation client: {}", e);
            Arc::new(UnavailableGenerator::new(e.to_string()))
        }
    };
    let composer = MessageComposer::new(generator, Duration::from_secs(config.llm.timeout_secs));

    // Generated message cache, keyed by lead id
    let message_cache = (config.message_cache_ttl_secs > 0).then(|| {
        tracing::info!(
            "Message cache initialized ({}s TTL, 10k capacity)",
            config.message_cache_ttl_secs
        );
        Cache::builder()
            .time_to_live(Duration::from_secs(config.message_cache_ttl_secs))
            .max_capacity(10_000)
            .build()
    });

    let cors = routes::cors_layer(&config.cors_origins)?;
    let port = config.port;

    // Build application state
    let app_state = Arc::new(AppState {
        config,
        store,
        composer,
        message_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    // API routes are rate limited; health check bypasses it
    let api = routes::api_routes().layer(GovernorLayer {
        config: governor_conf,
    });
    let app = routes::app(app_state, api, cors);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
