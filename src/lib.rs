//! # vidinspect
//!
//! Inspect a video file: read its metadata, sample a grid of frames, jump to
//! a single frame, and write a JSON summary of what was found.
//!
//! `vidinspect` decodes frames through FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate and hands them
//! out as [`image::DynamicImage`] values.
//!
//! ## Quick Start
//!
//! ### Run a Full Inspection
//!
//! ```no_run
//! use vidinspect::{HeadlessDisplay, InspectOptions, Inspector};
//!
//! let report = Inspector::new(InspectOptions::new()).run("input.mp4", &mut HeadlessDisplay)?;
//! // output.json now holds the report
//! assert_eq!(report.jumped_frame_info.frame, 900);
//! # Ok::<(), vidinspect::InspectError>(())
//! ```
//!
//! ### Review the Rendered Frames
//!
//! ```no_run
//! use vidinspect::{DirectoryDisplay, InspectOptions, inspect};
//!
//! let options = InspectOptions::new()
//!     .with_stride(5)
//!     .with_max_frames(24)
//!     .with_jump_target(120)
//!     .with_title_font("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
//! let mut display = DirectoryDisplay::new("review")?;
//! inspect("input.mp4", &options, &mut display)?;
//! // review/grid.png and review/frame_000120.png
//! # Ok::<(), vidinspect::InspectError>(())
//! ```
//!
//! ### Read Frames Directly
//!
//! ```no_run
//! use vidinspect::VideoSource;
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! println!("{:?}", source.metadata());
//! source.seek_to_frame(300)?;
//! if let Some(frame) = source.read_frame()? {
//!     frame.image.save("frame_300.png")?;
//! }
//! # Ok::<(), vidinspect::InspectError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
mod conversion;
pub mod display;
pub mod error;
pub mod ffmpeg;
pub mod grid;
pub mod inspect;
pub mod jumper;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod source;
#[cfg(test)]
mod test_support;
pub mod validation;

pub use config::InspectOptions;
pub use display::{DirectoryDisplay, FrameDisplay, HeadlessDisplay};
pub use error::InspectError;
pub use ffmpeg::{DecoderLogLevel, set_decoder_log_level};
pub use grid::{FrameGrid, GridLayout, load_title_font};
pub use inspect::{Inspector, inspect};
pub use jumper::{jump_to_frame, jump_to_frame_from};
pub use metadata::VideoMetadata;
pub use progress::{InspectionStage, ProgressCallback, ProgressInfo};
pub use report::{FrameRecord, InspectionReport};
pub use sampler::{sample_grid, sample_grid_from};
pub use source::{Frame, FrameReader, VideoSource};
pub use validation::{ValidationReport, validate_metadata};
