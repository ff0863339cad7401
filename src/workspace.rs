use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Name of the raw downloaded stream inside a workspace.
///
/// The name is nominal: the extractor writes whatever container it fetched
/// to this path and the transcoder sniffs the real format from the content.
pub const RAW_FILE_NAME: &str = "raw.webm";

/// A per-request scratch directory for the raw download and the MP3 output.
///
/// The directory destructor runs at the handle drop and removes the
/// directory with everything inside it, ignoring removal errors.
/// **As such, one must not simply get the paths and drop the handle.**
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace, under `root` when given, otherwise under
    /// the system temporary directory.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tubetap-");

        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the extractor should write the raw audio stream
    pub fn raw_path(&self) -> PathBuf {
        self.dir.path().join(RAW_FILE_NAME)
    }

    /// Where the transcoder should write the final MP3
    pub fn mp3_path(&self, base_name: &str) -> PathBuf {
        self.dir.path().join(format!("{base_name}.mp3"))
    }
}
