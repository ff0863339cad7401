use std::{
    process::{Output, Stdio},
    time::Duration,
};

use bitflags::bitflags;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{Error, Result};

pub const YT_DL: &str = "youtube-dl";
pub const YT_DLP: &str = "yt-dlp";
pub const FFMPEG: &str = "ffmpeg";
pub const FFMPEG_DEFAULT_ARGS: [&str; 3] = ["-hide_banner", "-loglevel", "error"];

/// Upper bound on the `--version` availability checks at startup
pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct Capture: u8 {
        const STDIN = 0b0000001;
        const STDOUT = 0b0000010;
        const STDERR = 0b0000100;
    }
}

/// Run a command to completion within `timeout`, returning its raw output handle.
///
/// IO handles will be captured only if the caller required it or if the log level is Debug.
/// In that last case, `stdout` and `stderr` will be logged.
///
/// The function returns an error only if the command failed to execute or ran
/// out of time (the child is killed on expiry). If the program runs but
/// returns a non-0 status code, it will not trigger an error.
pub async fn run_command<F>(
    program: &str,
    f: F,
    capture: Capture,
    timeout: Duration,
) -> Result<Output>
where
    F: FnOnce(&mut Command) -> &mut Command + Send,
{
    let is_debug = tracing::enabled!(tracing::Level::DEBUG);
    let get_io = |capture| {
        if capture {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    };

    let mut cmd = Command::new(program);
    let cmd = f(&mut cmd)
        .stdin(get_io(capture.contains(Capture::STDIN)))
        .stdout(get_io(is_debug || capture.contains(Capture::STDOUT)))
        .stderr(get_io(is_debug || capture.contains(Capture::STDERR)))
        .kill_on_drop(true);

    debug!("Executing command: {:?}", cmd.as_std());
    let res = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(res) => res?,
        // Dropping the unfinished future reaps the child through kill_on_drop
        Err(_) => {
            return Err(Error::Timeout {
                program: program.to_owned(),
                seconds: timeout.as_secs(),
            })
        }
    };

    if is_debug {
        debug!("status: {}", res.status);
        debug!("stdout: {} bytes long", res.stdout.len());
        trace!("stdout: {:?}", String::from_utf8_lossy(&res.stdout));
        debug!("stderr: {} bytes long", res.stderr.len());
        trace!("stderr: {:?}", String::from_utf8_lossy(&res.stderr));
    }

    Ok(res)
}

/// Run the command and verify that it has returned a success status code.
pub async fn assert_success_command<F>(program: &str, f: F, timeout: Duration) -> Result<()>
where
    F: FnOnce(&mut Command) -> &mut Command + Send,
{
    let res = run_command(program, f, Capture::empty(), timeout).await?;
    if res.status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed(program.to_owned()))
    }
}

/// Last meaningful stderr line, used in error messages shown to the caller.
pub fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| output.status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_when_asked() {
        let out = run_command(
            "echo",
            |cmd| cmd.arg("hello"),
            Capture::STDOUT,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_execution_error() {
        let out = run_command("false", |cmd| cmd, Capture::empty(), Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!out.status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_assert_success_flags_nonzero_exit() {
        let res = assert_success_command("false", |cmd| cmd, Duration::from_secs(5)).await;
        assert!(matches!(res, Err(Error::CommandFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_times_out_and_kills_the_child() {
        let started = std::time::Instant::now();
        let res = run_command(
            "sleep",
            |cmd| cmd.arg("5"),
            Capture::empty(),
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(res, Err(Error::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_missing_program_reports_io_error() {
        let res = run_command(
            "definitely-not-installed-anywhere",
            |cmd| cmd,
            Capture::empty(),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_tail_takes_last_meaningful_line() {
        use std::os::unix::process::ExitStatusExt;

        let out = Output {
            status: std::process::ExitStatus::from_raw(0),
            stdout: Vec::new(),
            stderr: b"WARNING: something\nERROR: it broke\n\n".to_vec(),
        };
        assert_eq!(stderr_tail(&out), "ERROR: it broke");
    }
}
