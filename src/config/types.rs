use anyhow::{Context, Result};
use framelift_av::tools::{self, ToolResolver};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub encode: EncodeConfig,

    #[serde(default)]
    pub interpolation: InterpolationConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Directory holding the bundled tools, overriding the automatic lookup
    /// (development `binaries/` directory, then the install layout next to
    /// the executable).
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    #[serde(default)]
    pub rife_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where finished videos and scratch directories are created
    /// (default: the user's downloads directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodeConfig {
    /// Video bitrate for the final encode (default: "15M")
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,
}

fn default_video_bitrate() -> String {
    "15M".to_string()
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_bitrate: default_video_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterpolationConfig {
    /// Interpolator worker threads. 0 derives a value from the core count.
    #[serde(default)]
    pub threads: usize,

    /// Model directory name inside the tools directory (default: "rife-v4.6")
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    tools::DEFAULT_MODEL.to_string()
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            model: default_model(),
        }
    }
}

impl Config {
    /// Output root for finished videos and scratch directories.
    pub fn output_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.output.dir {
            return Ok(dir.clone());
        }

        let user_dirs = directories::UserDirs::new()
            .context("Could not determine the user's home directory")?;

        Ok(user_dirs
            .download_dir()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| user_dirs.home_dir().join("Downloads")))
    }

    /// Build a tool resolver honoring any configured overrides.
    pub fn tool_resolver(&self) -> ToolResolver {
        let mut resolver = ToolResolver::new().with_model_name(&self.interpolation.model);

        if let Some(ref dir) = self.tools.dir {
            resolver = resolver.with_dir(dir);
        }
        if let Some(ref path) = self.tools.ffmpeg_path {
            resolver = resolver.with_ffmpeg(path);
        }
        if let Some(ref path) = self.tools.ffprobe_path {
            resolver = resolver.with_ffprobe(path);
        }
        if let Some(ref path) = self.tools.rife_path {
            resolver = resolver.with_rife(path);
        }

        resolver
    }
}
