use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

macro_rules! arg_env {
    ($v:literal) => {
        concat!("TUBETAP_", $v)
    };
}

/// HTTP API to fetch metadata and MP3 audio from web videos
/// through `yt-dlp` (or `youtube-dl`) and `ffmpeg`.
#[derive(Parser, Debug)]
pub struct Args {
    /// The path to a TOML configuration file
    #[clap(long, env = arg_env!("CONFIG"))]
    pub config: Option<PathBuf>,

    /// The address to bind, overriding the configuration
    #[clap(long, env = arg_env!("HOST"))]
    pub host: Option<String>,

    /// The port to listen on, overriding the configuration
    #[clap(long, env = arg_env!("PORT"))]
    pub port: Option<u16>,

    /// The maximum log level (error, warn, info, debug, trace)
    #[clap(long, default_value_t = Level::INFO, env = arg_env!("LOG"))]
    pub log_level: Level,
}
