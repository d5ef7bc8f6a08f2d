//! Frame-rate probing via ffprobe.

use crate::command::{CommandRunner, CommandSpec};
use crate::{Error, Result};
use std::path::Path;

/// Build the ffprobe invocation for the primary video stream's rate.
pub fn probe_spec(ffprobe: &Path, input: &Path) -> CommandSpec {
    CommandSpec::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=r_frame_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input.to_string_lossy())
}

/// Measure the frame rate of the primary video stream.
///
/// Fails when ffprobe exits unsuccessfully or reports a rate that is not a
/// positive number, so callers can rely on the result being usable as a
/// divisor.
pub fn frame_rate(runner: &dyn CommandRunner, ffprobe: &Path, input: &Path) -> Result<f64> {
    let spec = probe_spec(ffprobe, input);
    let output = runner.run(&spec).map_err(|e| Error::probe(e.to_string()))?;

    let raw = output.stdout.trim();
    let rate = parse_rate(raw);
    if rate <= 0.0 {
        return Err(Error::probe(format!(
            "unusable frame rate {:?} for {:?}",
            raw, input
        )));
    }

    tracing::debug!("Probed frame rate {:.3} for {:?}", rate, input);
    Ok(rate)
}

/// Parse an ffprobe `r_frame_rate` value.
///
/// Accepts `num/den` rationals and plain decimals. A zero denominator or
/// unparsable input yields 0.0.
pub fn parse_rate(raw: &str) -> f64 {
    let raw = raw.trim();
    if let Some((num, den)) = raw.split_once('/') {
        if let (Ok(num), Ok(den)) = (num.parse::<f64>(), den.parse::<f64>()) {
            if den != 0.0 {
                return num / den;
            }
        }
    }
    raw.parse().unwrap_or(0.0)
}
