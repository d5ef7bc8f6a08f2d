//! Final remux of interpolated frames with the original audio.

use crate::command::CommandSpec;
use std::path::Path;

/// H.264 encoder for the delivered file.
///
/// Hardware-accelerated on macOS, software elsewhere.
pub fn video_codec() -> &'static str {
    if cfg!(target_os = "macos") {
        "h264_videotoolbox"
    } else {
        "libx264"
    }
}

/// File name for the delivered video.
pub fn output_file_name(stem: &str, target_fps: f64) -> String {
    format!("{}_{:.0}fps.mp4", stem, target_fps)
}

/// Assemble the frame sequence and the extracted audio into the final file.
///
/// `-shortest` truncates to the shorter stream; re-timed video and copied
/// audio rarely land on the same duration exactly.
pub fn remux_spec(
    ffmpeg: &Path,
    framerate: f64,
    frames_dir: &Path,
    audio: &Path,
    bitrate: &str,
    output: &Path,
) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .args(["-y", "-framerate"])
        .arg(format!("{:.0}", framerate))
        .arg("-i")
        .arg(frames_dir.join("%08d.png").to_string_lossy())
        .arg("-i")
        .arg(audio.to_string_lossy())
        .args(["-c:v", video_codec(), "-b:v"])
        .arg(bitrate)
        .args(["-pix_fmt", "yuv420p", "-c:a", "copy", "-shortest"])
        .arg(output.to_string_lossy())
}
