//! Pipeline stage commands.
//!
//! Each builder renders one stage of the interpolation pipeline as a
//! [`CommandSpec`](crate::CommandSpec):
//! - Audio track extraction
//! - Source frame extraction
//! - AI interpolation and the optional 60 fps re-timing pass
//! - Final remux of frames and audio

mod audio;
mod frames;
mod interpolate;
mod remux;

pub use audio::extract_audio_spec;
pub use frames::extract_frames_spec;
pub use interpolate::{intermediate_encode_spec, interpolate_spec, minterpolate_spec};
pub use remux::{output_file_name, remux_spec, video_codec};
