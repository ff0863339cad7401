//! Service configuration.
//!
//! Values are layered: compiled-in defaults, then an optional TOML file,
//! then `TUBETAP_*` environment variables, later sources winning.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::types::Bitrate;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Target bitrate of delivered MP3 files
    pub audio_bitrate: Bitrate,
    /// Maximum length of sanitized titles, in characters
    pub slug_max_len: usize,
    /// Bound on metadata probes, in seconds
    pub probe_timeout_secs: u64,
    /// Bound on stream downloads, in seconds
    pub download_timeout_secs: u64,
    /// Bound on MP3 conversions, in seconds
    pub transcode_timeout_secs: u64,
    /// Parent directory for per-request workspaces; the system temporary
    /// directory when unset
    pub work_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("audio_bitrate", "192K")?
            .set_default("slug_max_len", 50)?
            .set_default("probe_timeout_secs", 30)?
            .set_default("download_timeout_secs", 600)?
            .set_default("transcode_timeout_secs", 300)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        builder
            .add_source(config::Environment::with_prefix("TUBETAP"))
            .build()?
            .try_deserialize()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.audio_bitrate.to_string(), "192K");
        assert_eq!(config.slug_max_len, 50);
        assert_eq!(config.probe_timeout(), Duration::from_secs(30));
        assert_eq!(config.download_timeout(), Duration::from_secs(600));
        assert_eq!(config.transcode_timeout(), Duration::from_secs(300));
        assert!(config.work_dir.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "port = 9000\naudio_bitrate = \"256K\"\nwork_dir = \"/tmp/tubetap-work\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.audio_bitrate.to_string(), "256K");
        assert_eq!(
            config.work_dir.as_deref(),
            Some(Path::new("/tmp/tubetap-work"))
        );
        // Keys the file does not mention keep their defaults
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.slug_max_len, 50);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
