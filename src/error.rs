//! Error types for the `vidinspect` crate.
//!
//! This module defines [`InspectError`], the unified error type returned by
//! all fallible operations in the crate. Only opening the source is fatal to
//! an inspection run; per-frame read failures are reported as outcomes (a
//! shorter `frame_info` list, or `displayed: false`) rather than errors.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `vidinspect` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InspectError {
    /// The video file could not be opened.
    #[error("Cannot open video at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The requested frame number is at or beyond the reported frame count.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// A sampling stride of zero was provided.
    #[error("Sampling stride must be greater than zero")]
    InvalidStride,

    /// The grid canvas would exceed addressable image dimensions.
    #[error("Grid of {columns}x{rows} cells at {cell_width}x{cell_height} px is too large")]
    GridTooLarge {
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
        /// Width of one cell in pixels.
        cell_width: u32,
        /// Height of one cell, title band included, in pixels.
        cell_height: u32,
    },

    /// A title font could not be loaded.
    #[error("Failed to load title font: {0}")]
    FontError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while composing or saving frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The inspection report could not be serialized or parsed.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

impl From<FfmpegError> for InspectError {
    fn from(error: FfmpegError) -> Self {
        InspectError::FfmpegError(error.to_string())
    }
}
