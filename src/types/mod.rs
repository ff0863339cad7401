mod bitrate;
mod format;
mod metadata;

pub use bitrate::Bitrate;
pub use format::{best_audio, FormatDescriptor, NO_AUDIO_CODEC};
pub use metadata::{ProbeResult, VideoMetadata, DEFAULT_TITLE};
