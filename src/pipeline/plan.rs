use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input containers the pipeline accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp4", "avi", "mov", "mkv", "wmv", "flv"];

/// How the target frame rate is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Double the source frame rate.
    #[default]
    DoubleRate,
    /// Raise the source to exactly 60 fps.
    Fixed60,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "double" | "2x" => Ok(Self::DoubleRate),
            "60" | "fixed60" | "fixed-60" => Ok(Self::Fixed60),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// One requested pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    pub mode: OutputMode,
}

impl PipelineRequest {
    pub fn new(input: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            input: input.into(),
            mode,
        }
    }
}

/// Frame rates resolved for a run, derived from the probed source rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPlan {
    pub fps_origin: f64,
    pub fps_target: f64,
    /// Whether a motion-interpolation pass is needed after the AI doubling
    /// to land exactly on the target rate.
    pub needs_secondary: bool,
}

impl TargetPlan {
    pub fn compute(fps_origin: f64, mode: OutputMode) -> Self {
        match mode {
            OutputMode::DoubleRate => Self {
                fps_origin,
                fps_target: fps_origin * 2.0,
                needs_secondary: false,
            },
            OutputMode::Fixed60 => {
                let ratio = 60.0 / fps_origin;
                Self {
                    fps_origin,
                    fps_target: 60.0,
                    needs_secondary: !(ratio == 2.0 || ratio == 3.0 || ratio == 4.0),
                }
            }
        }
    }
}

/// Check whether a file has a supported video container extension.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|&s| s == lower)
        })
        .unwrap_or(false)
}
