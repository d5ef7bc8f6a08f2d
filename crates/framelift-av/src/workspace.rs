//! Scratch directory management for pipeline runs.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Per-run scratch directory.
///
/// Created under the output root as `work_<input stem>_<unix timestamp>`
/// with `in/` and `out/` subdirectories, and removed recursively when
/// dropped, on success and failure alike. Keeping it under the output root
/// rather than the system temp dir keeps intermediate frames and the final
/// artifact on the same filesystem.
#[derive(Debug)]
pub struct WorkDirectory {
    root: PathBuf,
}

impl WorkDirectory {
    /// Create the scratch directory for one input file.
    pub fn create(output_root: &Path, input: &Path) -> Result<Self> {
        let stem = input
            .file_stem()
            .ok_or_else(|| Error::workspace(format!("input has no file name: {:?}", input)))?
            .to_string_lossy();

        let root = output_root.join(format!(
            "work_{}_{}",
            stem,
            chrono::Utc::now().timestamp()
        ));

        std::fs::create_dir_all(root.join("in"))?;
        std::fs::create_dir_all(root.join("out"))?;

        tracing::debug!("Created scratch dir {:?}", root);
        Ok(Self { root })
    }

    /// Path to the scratch root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the extracted source frames.
    pub fn frames_in(&self) -> PathBuf {
        self.root.join("in")
    }

    /// Directory the interpolator writes into.
    pub fn frames_out(&self) -> PathBuf {
        self.root.join("out")
    }

    /// Directory for the re-timed 60 fps frame set, created on first use.
    pub fn frames_out60(&self) -> Result<PathBuf> {
        let dir = self.root.join("out60");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Path for a scratch file directly under the root.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Drop for WorkDirectory {
    fn drop(&mut self) {
        if self.root.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.root) {
                tracing::warn!("Failed to remove scratch dir {:?}: {}", self.root, e);
            }
        }
    }
}
