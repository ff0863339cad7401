//! Service error type and its mapping onto HTTP responses.
//!
//! Every collaborator failure is caught at the endpoint boundary and turned
//! into a JSON body with a `detail` message; callers never see stack traces
//! or raw command output beyond the extractor's own error line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum Error {
    /// The extractor ran but produced no usable metadata
    #[error("No metadata returned for this URL")]
    NoMetadata,

    /// The extractor reported an empty format list
    #[error("No downloadable formats found for this URL")]
    NoFormats,

    /// No format in the list carries an audio track
    #[error("No audio formats available")]
    NoAudioFormat,

    /// The extractor rejected the URL itself
    #[error("Unavailable or unsupported stream: {0}")]
    UnavailableStream(String),

    /// Metadata extraction failed
    #[error("Could not analyze the video: {0}")]
    Probe(String),

    /// Fetching the audio stream failed
    #[error("Could not download the audio stream: {0}")]
    Download(String),

    /// Converting the downloaded stream to MP3 failed
    #[error("Could not convert the audio to MP3: {0}")]
    Transcode(String),

    /// An external program ran past its allotted time and was killed
    #[error("{program} did not finish within {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// An external program exited with a nonzero status
    #[error("Command `{0}` did run but was not successful")]
    CommandFailed(String),

    /// An external program is missing from the host
    #[error("{0} not found: verify that it is installed and available in your PATH")]
    ProgramNotFound(&'static str),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status for this failure: 4xx when the caller picked a stream we
    /// cannot serve, 502 when the upstream side failed, 504 on timeout, 500
    /// for everything that went wrong on our side.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NoFormats | Error::NoAudioFormat | Error::UnavailableStream(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NoMetadata | Error::Probe(_) | Error::Download(_) => StatusCode::BAD_GATEWAY,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::Transcode(_)
            | Error::CommandFailed(_)
            | Error::ProgramNotFound(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        } else {
            warn!("request rejected: {self}");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
