mod command;
mod ffmpeg;
mod ytdl;

pub use ffmpeg::{AudioTranscoder, Ffmpeg};
pub use ytdl::{StreamExtractor, Ytdl};
