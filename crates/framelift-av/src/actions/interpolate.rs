//! AI frame interpolation and the optional 60 fps re-timing pass.

use crate::command::CommandSpec;
use crate::threads;
use std::path::Path;

/// Double the frame count of a frame directory with rife-ncnn-vulkan.
pub fn interpolate_spec(
    rife: &Path,
    model: &Path,
    frames_in: &Path,
    frames_out: &Path,
    threads: usize,
) -> CommandSpec {
    CommandSpec::new(rife)
        .arg("-i")
        .arg(frames_in.to_string_lossy())
        .arg("-o")
        .arg(frames_out.to_string_lossy())
        .arg("-j")
        .arg(threads::job_spec(threads))
        .arg("-m")
        .arg(model.to_string_lossy())
}

/// Encode interpolated frames into an intermediate clip so the motion
/// filter has a real video stream to work on.
pub fn intermediate_encode_spec(
    ffmpeg: &Path,
    framerate: f64,
    frames_in: &Path,
    clip_out: &Path,
) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .args(["-y", "-framerate"])
        .arg(format!("{:.0}", framerate))
        .arg("-i")
        .arg(frames_in.join("%08d.png").to_string_lossy())
        .args([
            "-c:v", "libx264", "-preset", "ultrafast", "-crf", "18", "-pix_fmt", "yuv420p",
        ])
        .arg(clip_out.to_string_lossy())
}

/// Re-time the intermediate clip to exactly 60 fps with motion-compensated
/// interpolation, emitting numbered PNG frames.
pub fn minterpolate_spec(ffmpeg: &Path, clip_in: &Path, frames_out: &Path) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .args(["-y", "-i"])
        .arg(clip_in.to_string_lossy())
        .args([
            "-filter:v",
            "minterpolate=fps=60:mi_mode=mci:mc_mode=aobmc:me_mode=bidir_ref:vsbmc=1",
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-crf",
            "18",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(frames_out.join("%08d.png").to_string_lossy())
}
