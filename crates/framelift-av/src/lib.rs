//! # framelift-av
//!
//! External tool layer for the frame interpolation pipeline.
//!
//! This crate provides functionality for:
//! - Resolving and health-checking the bundled tools (ffmpeg, ffprobe,
//!   rife-ncnn-vulkan and its model directory)
//! - Declarative subprocess execution with captured output
//! - Frame-rate probing
//! - Scratch directory management for pipeline runs
//! - Command builders for each pipeline stage
//!
//! ## Example
//!
//! ```no_run
//! use framelift_av::{probe, SystemRunner, ToolResolver};
//!
//! let binaries = ToolResolver::new().resolve()?;
//! let rate = probe::frame_rate(&SystemRunner, &binaries.ffprobe, "clip.mp4".as_ref())?;
//! println!("{:.3} fps", rate);
//! # Ok::<(), framelift_av::Error>(())
//! ```

pub mod actions;
pub mod command;
mod error;
pub mod probe;
pub mod threads;
pub mod tools;
pub mod workspace;

// Re-exports
pub use command::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use error::{Error, Result};
pub use tools::{BinaryPaths, Tool, ToolInfo, ToolResolver};
pub use workspace::WorkDirectory;
