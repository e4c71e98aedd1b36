use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use picstore::{config::Config, routes, AppState};

#[derive(Parser, Debug)]
#[command(name = "picstore")]
#[command(about = "Minimal HTTP image store over a local directory")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PICSTORE_PORT", default_value = "8080")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "PICSTORE_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Directory holding uploaded images
    #[arg(short, long, env = "PICSTORE_UPLOAD_DIR", default_value = "./uploads")]
    upload_dir: PathBuf,

    /// Directory receiving staged download copies
    #[arg(short, long, env = "PICSTORE_DOWNLOAD_DIR", default_value = "./downloads")]
    download_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = "PICSTORE_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "PICSTORE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "picstore=debug,tower_http=debug"
    } else {
        "picstore=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    info!(
        "Storing uploads in {}, staging downloads in {}",
        cli.upload_dir.display(),
        cli.download_dir.display()
    );

    let max_body_size = config.max_upload_size;
    let state = AppState {
        upload_dir: cli.upload_dir,
        download_dir: cli.download_dir,
        config: Arc::new(config),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::file_routes(max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    info!("Starting picstore on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
