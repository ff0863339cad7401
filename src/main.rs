use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tubetap::{
    api::{create_router, AppContext},
    cli::Args,
    config::Config,
    logging,
    outside::{Ffmpeg, Ytdl},
};

fn main() -> anyhow::Result<()> {
    // Initialize the environment & CLI
    let args = Args::parse();

    // The local UTC offset can only be read while the process is still
    // single-threaded, so logging comes up before the runtime
    logging::init_logging(args.log_level)?;

    let mut config =
        Config::load(args.config.as_deref()).context("Could not load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Make sure the workspace parent directory exists
    if let Some(dir) = &config.work_dir {
        std::fs::create_dir_all(dir).context("Could not create work directory")?;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Could not build the async runtime")?
        .block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let (extractor, transcoder) = load_external_components(&config).await?;
    let config = Arc::new(config);

    let app = create_router(AppContext {
        extractor: Arc::new(extractor),
        transcoder: Arc::new(transcoder),
        config: config.clone(),
    });

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Could not bind {}:{}", config.host, config.port))?;
    info!(
        "Listening on http://{}",
        listener
            .local_addr()
            .context("Could not read the bound address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

/// Load the external components
async fn load_external_components(config: &Config) -> anyhow::Result<(Ytdl, Ffmpeg)> {
    // Check both programs concurrently, spawning an external process
    // is not instantaneous
    let (ytdl, ffmpeg) = tokio::try_join!(
        Ytdl::new(config.probe_timeout(), config.download_timeout()),
        Ffmpeg::new(config.transcode_timeout()),
    )?;

    info!("Using {} as the stream extractor", ytdl.program());
    Ok((ytdl, ffmpeg))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
