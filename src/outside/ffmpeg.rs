use std::{ffi::OsStr, path::Path, time::Duration};

use async_trait::async_trait;

use super::command::{
    assert_success_command, run_command, stderr_tail, Capture, FFMPEG, FFMPEG_DEFAULT_ARGS,
    VERSION_CHECK_TIMEOUT,
};
use crate::{
    error::{Error, Result},
    types::Bitrate,
};

/// Interface for converting a downloaded stream into deliverable audio
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Strip video from the input, decode its audio and encode it to MP3 at
    /// the given bitrate, overwriting the output if present.
    async fn transcode_to_mp3(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Result<()>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) program
pub struct Ffmpeg {
    timeout: Duration,
}

impl Ffmpeg {
    /// Verify that the `ffmpeg` binary is reachable
    pub async fn new(timeout: Duration) -> Result<Self> {
        assert_success_command(FFMPEG, |cmd| cmd.arg("-version"), VERSION_CHECK_TIMEOUT)
            .await
            .map_err(|_| Error::ProgramNotFound("ffmpeg"))?;

        Ok(Self { timeout })
    }
}

#[async_trait]
impl AudioTranscoder for Ffmpeg {
    async fn transcode_to_mp3(&self, input: &Path, output: &Path, bitrate: Bitrate) -> Result<()> {
        let bitrate = bitrate.to_string();
        let res = match run_command(
            FFMPEG,
            |cmd| {
                cmd.args(FFMPEG_DEFAULT_ARGS)
                    .arg("-y")
                    .args([OsStr::new("-i"), input.as_os_str()])
                    .arg("-vn")
                    .args(["-c:a", "libmp3lame"])
                    .args(["-b:a", bitrate.as_str()])
                    .arg(output)
            },
            Capture::STDERR,
            self.timeout,
        )
        .await
        {
            Ok(res) => res,
            Err(err @ Error::Timeout { .. }) => return Err(err),
            Err(err) => return Err(Error::Transcode(err.to_string())),
        };

        // A nonzero exit means the output is missing or truncated
        if res.status.success() {
            Ok(())
        } else {
            Err(Error::Transcode(stderr_tail(&res)))
        }
    }
}
