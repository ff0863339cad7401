use std::{ffi::OsStr, path::Path, process::Output, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::command::{
    assert_success_command, run_command, stderr_tail, Capture, VERSION_CHECK_TIMEOUT, YT_DL, YT_DLP,
};
use crate::{
    error::{Error, Result},
    types::ProbeResult,
};

/// Interface for probing stream metadata and downloading audio streams
#[async_trait]
pub trait StreamExtractor: Send + Sync {
    /// Fetch the stream metadata without downloading any media.
    async fn probe(&self, url: &str) -> Result<ProbeResult>;

    /// Download the best audio stream of the video to the given path.
    ///
    /// Which stream is "best" is the extractor's own call (its
    /// `bestaudio/best` policy), independent of any selection made over
    /// probed metadata.
    async fn download_audio(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Interface for the [yt-dlp](https://github.com/yt-dlp/yt-dlp) program,
/// with [youtube-dl](https://github.com/ytdl-org/youtube-dl) as fallback
pub struct Ytdl {
    program: &'static str,
    probe_timeout: Duration,
    download_timeout: Duration,
}

impl Ytdl {
    /// Verify that the `yt-dlp` or `youtube-dl` binary is reachable
    pub async fn new(probe_timeout: Duration, download_timeout: Duration) -> Result<Self> {
        // Check `yt-dlp`, then fall back to `youtube-dl`
        for program in [YT_DLP, YT_DL] {
            let found =
                assert_success_command(program, |cmd| cmd.arg("--version"), VERSION_CHECK_TIMEOUT)
                    .await
                    .is_ok();
            if found {
                return Ok(Self {
                    program,
                    probe_timeout,
                    download_timeout,
                });
            }
        }

        Err(Error::ProgramNotFound("yt-dlp or youtube-dl"))
    }

    /// Which of the two programs answered the availability check
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Run the command and check if it failed blaming the stream itself.
    /// In that case, return [`Error::UnavailableStream`] carrying the
    /// extractor's own error line.
    ///
    /// In other cases, return the output handle.
    async fn run_check_availability<F>(
        &self,
        f: F,
        capture: Capture,
        timeout: Duration,
    ) -> Result<Output>
    where
        F: FnOnce(&mut Command) -> &mut Command + Send,
    {
        let res = run_command(self.program, f, capture | Capture::STDERR, timeout).await?;

        let stderr = String::from_utf8_lossy(&res.stderr);
        match find_caller_fault(&stderr) {
            Some(line) => Err(Error::UnavailableStream(line.to_owned())),
            None => Ok(res),
        }
    }
}

/// Find the extractor error line that blames the requested stream rather
/// than the extraction process (unavailable, unsupported, not a URL at all).
fn find_caller_fault(stderr: &str) -> Option<&str> {
    stderr
        .lines()
        .filter(|line| line.starts_with("ERROR:"))
        .find(|line| {
            let lowered = line.to_lowercase();
            lowered.contains("unavailable")
                || lowered.contains("unsupported")
                || lowered.contains("not a valid url")
        })
        .map(|line| line.trim_start_matches("ERROR:").trim())
}

#[async_trait]
impl StreamExtractor for Ytdl {
    async fn probe(&self, url: &str) -> Result<ProbeResult> {
        let res = match self
            .run_check_availability(
                |cmd| {
                    cmd.arg("-q")
                        .arg("--skip-download")
                        .arg("--no-check-certificate")
                        .arg("--ignore-errors")
                        .arg("--no-playlist")
                        .arg("-j")
                        .arg("--")
                        .arg(url)
                },
                Capture::STDOUT,
                self.probe_timeout,
            )
            .await
        {
            Ok(res) => res,
            Err(err @ (Error::UnavailableStream(_) | Error::Timeout { .. })) => return Err(err),
            Err(err) => return Err(Error::Probe(err.to_string())),
        };

        let stdout = String::from_utf8_lossy(&res.stdout);
        let Some(line) = stdout.lines().find(|line| !line.trim().is_empty()) else {
            // --ignore-errors may exit 0 with nothing extracted
            if res.status.success() {
                return Err(Error::NoMetadata);
            }
            return Err(Error::Probe(stderr_tail(&res)));
        };

        let probe = serde_json::from_str::<ProbeResult>(line).map_err(|_| Error::NoMetadata)?;
        debug!("probe reported {} formats", probe.formats().len());
        Ok(probe)
    }

    async fn download_audio(&self, url: &str, dest: &Path) -> Result<()> {
        let res = match self
            .run_check_availability(
                |cmd| {
                    cmd.arg("-q")
                        .args([OsStr::new("-o"), dest.as_os_str()])
                        .arg("--no-continue") // Or else fails when file already exists, even an empty one
                        .args(["-f", "bestaudio/best"])
                        .arg("--")
                        .arg(url)
                },
                Capture::empty(),
                self.download_timeout,
            )
            .await
        {
            Ok(res) => res,
            Err(err @ (Error::UnavailableStream(_) | Error::Timeout { .. })) => return Err(err),
            Err(err) => return Err(Error::Download(err.to_string())),
        };

        if res.status.success() {
            Ok(())
        } else {
            Err(Error::Download(stderr_tail(&res)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blames_caller_for_unavailable_streams() {
        let stderr = "WARNING: some noise\nERROR: Video unavailable\n";
        assert_eq!(find_caller_fault(stderr), Some("Video unavailable"));
    }

    #[test]
    fn test_blames_caller_for_unsupported_urls() {
        let stderr = "ERROR: Unsupported URL: https://example.com/page\n";
        assert_eq!(
            find_caller_fault(stderr),
            Some("Unsupported URL: https://example.com/page")
        );
    }

    #[test]
    fn test_blames_caller_for_garbage_urls() {
        let stderr = "ERROR: 'not-a-link' is not a valid URL.\n";
        assert_eq!(find_caller_fault(stderr), Some("'not-a-link' is not a valid URL."));
    }

    #[test]
    fn test_other_extractor_errors_are_not_the_callers_fault() {
        let stderr = "ERROR: unable to download webpage (connection reset)\n";
        assert_eq!(find_caller_fault(stderr), None);
        assert_eq!(find_caller_fault("WARNING: unavailable codec\n"), None);
        assert_eq!(find_caller_fault(""), None);
    }
}
