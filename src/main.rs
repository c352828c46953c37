use clap::Parser;
use llm_log_sifter::{
    annotate::Annotator,
    api::{build_router, AppState},
    config::Config,
    filter::{EngineConfig, FilterEngine, LlmRelevanceFilter, RelevanceFilter},
    llm::ChatClient,
    upload::UploadSpool,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "llm-log-sifter", version, about = "LLM-assisted log filtering service")]
struct Cli {
    /// Configuration file path
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "llm_log_sifter={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting LLM Log Sifter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Pin process start for health uptime reporting
    once_cell::sync::Lazy::force(&llm_log_sifter::api::handlers::STARTED_AT);

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = llm_log_sifter::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("Prometheus metrics initialized");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Initialize remote relevance strategy; a missing key or bad endpoint
    // degrades the service to local-only matching rather than failing startup
    let remote: Option<Arc<dyn RelevanceFilter>> = if config.llm.enabled {
        match ChatClient::from_config(&config.llm) {
            Ok(client) => {
                tracing::info!(
                    deployment = %config.llm.deployment,
                    "Remote relevance filter initialized"
                );
                Some(Arc::new(LlmRelevanceFilter::new(client)))
            }
            Err(e) => {
                tracing::warn!("Remote relevance filter initialization failed: {}", e);
                tracing::warn!("Continuing with local substring matching only");
                None
            }
        }
    } else {
        tracing::info!("Remote relevance filter disabled in configuration");
        None
    };

    // Initialize filtering engine
    let engine = Arc::new(FilterEngine::new(
        remote,
        EngineConfig::from(&config.filtering),
    ));
    tracing::info!(
        remote_available = engine.remote_available(),
        max_concurrent_remote = config.filtering.max_concurrent_remote,
        "Filter engine initialized"
    );

    // Initialize annotator and upload spool
    let annotator = Arc::new(Annotator::with_default_decoders());
    let spool = UploadSpool::new(&config.upload.spool_dir)?;
    tracing::info!(spool_dir = %spool.dir().display(), "Upload spool initialized");

    // Create application state and router
    let state = AppState::new(engine, annotator, spool)
        .with_annotate_by_default(config.filtering.annotate_by_default);
    let app = build_router(
        state,
        config.upload.max_body_bytes,
        std::time::Duration::from_secs(config.server.request_timeout_secs),
    );

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP server listening on http://{}", http_addr);
    tracing::info!("   Upload form: http://{}/", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Filter API: http://{}/api/process", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
