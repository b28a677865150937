//! Snake game server binary

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snake_server::{build_router, AppState, GameConfig};

#[derive(Parser, Debug)]
#[command(name = "snake-server")]
#[command(about = "Server-authoritative Snake with anti-cheat", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "snake.toml")]
    config: PathBuf,

    /// Override the listen address
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "snake_server=info,tower_http=info")]
    log_level: String,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .init();

    let mut config = GameConfig::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    if args.check {
        info!("Configuration OK");
        return Ok(());
    }

    let listen = config.server.listen;
    info!(
        "Board {}x{}, score ceiling {}, move check {:?}, anti-cheat {:?}",
        config.board.width,
        config.board.height,
        config.rules.score_ceiling,
        config.rules.move_check,
        config.anti_cheat.policy
    );

    let state = Arc::new(
        AppState::from_config(config)
            .await
            .context("failed to open score store")?,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {}", listen))?;

    info!("Snake server running on http://{}", listen);
    info!("   WebSocket endpoint: ws://{}/ws", listen);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
