//! # tubetap
//!
//! Small HTTP service that turns web video URLs into metadata records and
//! MP3 downloads. Extraction is delegated to `yt-dlp` (or `youtube-dl`) and
//! conversion to `ffmpeg`; the service orchestrates the probe, download,
//! transcode and cleanup sequence around them.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod outside;
pub mod slug;
pub mod types;
pub mod workspace;

pub use error::{Error, Result};
