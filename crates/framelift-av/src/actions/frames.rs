//! Source frame extraction.

use crate::command::CommandSpec;
use std::path::Path;

/// Explode the video into numbered high-quality JPEG frames.
pub fn extract_frames_spec(ffmpeg: &Path, input: &Path, frames_dir: &Path) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .args(["-y", "-i"])
        .arg(input.to_string_lossy())
        .args(["-q:v", "2"])
        .arg(frames_dir.join("%08d.jpg").to_string_lossy())
}
