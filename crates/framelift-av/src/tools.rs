//! External tool resolution and health checks.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Model directory expected next to the interpolator binary.
pub const DEFAULT_MODEL: &str = "rife-v4.6";

/// Artifacts the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
    Rife,
    RifeModel,
}

impl Tool {
    /// All artifacts, in resolution order.
    pub const ALL: [Tool; 4] = [Tool::Ffmpeg, Tool::Ffprobe, Tool::Rife, Tool::RifeModel];
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
            Tool::Rife => "rife-ncnn-vulkan",
            Tool::RifeModel => "rife model",
        };
        f.write_str(name)
    }
}

/// Resolved locations of every external artifact.
///
/// Immutable once resolved; re-resolved before each pipeline run so a tool
/// removed between runs is caught before any subprocess spawns.
#[derive(Debug, Clone)]
pub struct BinaryPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub rife: PathBuf,
    pub rife_model: PathBuf,
}

/// Health information about one artifact, for diagnostics.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Which artifact this row describes.
    pub tool: Tool,
    /// Whether the artifact is present.
    pub available: bool,
    /// Version string if obtainable.
    pub version: Option<String>,
    /// Path the artifact was looked up at.
    pub path: PathBuf,
}

/// Locates the external tools the pipeline shells out to.
///
/// Without an explicit directory override, a `binaries/` directory under
/// the working directory wins (development layout), then the install layout
/// relative to the running executable: `../Resources/binaries` inside a
/// macOS bundle, `binaries` next to the executable elsewhere.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    dir_override: Option<PathBuf>,
    ffmpeg_override: Option<PathBuf>,
    ffprobe_override: Option<PathBuf>,
    rife_override: Option<PathBuf>,
    model_name: String,
}

impl Default for ToolResolver {
    fn default() -> Self {
        Self {
            dir_override: None,
            ffmpeg_override: None,
            ffprobe_override: None,
            rife_override: None,
            model_name: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ToolResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed tools directory instead of the automatic lookup.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir_override = Some(dir.into());
        self
    }

    /// Use an explicit ffmpeg path.
    pub fn with_ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_override = Some(path.into());
        self
    }

    /// Use an explicit ffprobe path.
    pub fn with_ffprobe(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_override = Some(path.into());
        self
    }

    /// Use an explicit interpolator path.
    pub fn with_rife(mut self, path: impl Into<PathBuf>) -> Self {
        self.rife_override = Some(path.into());
        self
    }

    /// Use a different model directory name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Locate the directory holding the bundled tools.
    pub fn tools_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.dir_override {
            return Ok(dir.clone());
        }

        let dev_dir = PathBuf::from("binaries");
        if dev_dir.is_dir() {
            return Ok(dev_dir);
        }

        let exe = std::env::current_exe()?;
        let exe_dir = exe.parent().unwrap_or(Path::new("."));

        if cfg!(target_os = "macos") {
            Ok(exe_dir.join("../Resources/binaries"))
        } else {
            Ok(exe_dir.join("binaries"))
        }
    }

    /// Resolve every artifact or report the first one missing.
    pub fn resolve(&self) -> Result<BinaryPaths> {
        let dir = self.tools_dir()?;
        tracing::debug!("Resolving tools in {:?}", dir);

        let ffmpeg = self.artifact_path(&dir, Tool::Ffmpeg);
        let ffprobe = self.artifact_path(&dir, Tool::Ffprobe);
        let rife = self.artifact_path(&dir, Tool::Rife);
        let rife_model = self.artifact_path(&dir, Tool::RifeModel);

        if !ffmpeg.exists() {
            return Err(Error::tool_not_found(Tool::Ffmpeg));
        }
        if !ffprobe.exists() {
            return Err(Error::tool_not_found(Tool::Ffprobe));
        }
        if !rife.exists() {
            return Err(Error::tool_not_found(Tool::Rife));
        }
        if !rife_model.is_dir() {
            return Err(Error::tool_not_found(Tool::RifeModel));
        }

        Ok(BinaryPaths {
            ffmpeg,
            ffprobe,
            rife,
            rife_model,
        })
    }

    /// Report availability of every artifact.
    ///
    /// Unlike [`resolve`](Self::resolve) this never short-circuits, so the
    /// caller can render a full diagnostic table.
    pub fn check(&self) -> Result<Vec<ToolInfo>> {
        let dir = self.tools_dir()?;

        Ok(Tool::ALL
            .iter()
            .map(|&tool| {
                let path = self.artifact_path(&dir, tool);
                let available = match tool {
                    Tool::RifeModel => path.is_dir(),
                    _ => path.exists(),
                };
                let version = match tool {
                    Tool::Ffmpeg | Tool::Ffprobe if available => version_of(&path),
                    _ => None,
                };

                ToolInfo {
                    tool,
                    available,
                    version,
                    path,
                }
            })
            .collect())
    }

    fn artifact_path(&self, dir: &Path, tool: Tool) -> PathBuf {
        let override_path = match tool {
            Tool::Ffmpeg => self.ffmpeg_override.as_deref(),
            Tool::Ffprobe => self.ffprobe_override.as_deref(),
            Tool::Rife => self.rife_override.as_deref(),
            Tool::RifeModel => None,
        };
        if let Some(path) = override_path {
            return path.to_path_buf();
        }

        match tool {
            Tool::Ffmpeg => dir.join(executable_name("ffmpeg")),
            Tool::Ffprobe => dir.join(executable_name("ffprobe")),
            Tool::Rife => dir.join(executable_name("rife-ncnn-vulkan")),
            Tool::RifeModel => dir.join(&self.model_name),
        }
    }
}

/// Binary file name with the platform executable suffix.
fn executable_name(base: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", base)
    } else {
        base.to_string()
    }
}

/// First line of `<tool> -version`, if the tool runs at all.
fn version_of(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
