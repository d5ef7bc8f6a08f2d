//! Audio track extraction.

use crate::command::CommandSpec;
use std::path::Path;

/// Copy the source audio track into a standalone file, untouched.
pub fn extract_audio_spec(ffmpeg: &Path, input: &Path, audio_out: &Path) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .args(["-y", "-i"])
        .arg(input.to_string_lossy())
        .args(["-vn", "-c:a", "copy"])
        .arg(audio_out.to_string_lossy())
}
