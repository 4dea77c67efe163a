//! Video metadata types.
//!
//! [`VideoMetadata`] holds the four scalars reported by the decoder when a
//! [`VideoSource`](crate::VideoSource) is opened. Values are passed through
//! exactly as the decoder reports them; see
//! [`validate_metadata`](crate::validate_metadata) for sanity checks.

use serde::{Deserialize, Serialize};

/// Metadata for the inspected video stream.
///
/// Field order matches the `video_metadata` object of the inspection report.
///
/// # Example
///
/// ```no_run
/// use vidinspect::VideoSource;
///
/// let source = VideoSource::open("input.mp4")?;
/// let metadata = source.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.fps);
/// # Ok::<(), vidinspect::InspectError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct VideoMetadata {
    /// Total number of frames. Taken from the stream header when declared,
    /// otherwise estimated from duration and frame rate.
    pub frame_count: u64,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frames per second (average rate; approximate for variable-frame-rate
    /// content).
    pub fps: f64,
}

impl VideoMetadata {
    /// Duration implied by `frame_count / fps`, in seconds.
    ///
    /// Returns `0.0` when the frame rate is not positive.
    pub fn duration_seconds(&self) -> f64 {
        if self.fps > 0.0 {
            self.frame_count as f64 / self.fps
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_report_key_order() {
        let metadata = VideoMetadata {
            frame_count: 1000,
            height: 1080,
            width: 1920,
            fps: 30.0,
        };
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(
            json,
            r#"{"frame_count":1000,"height":1080,"width":1920,"fps":30.0}"#
        );
    }

    #[test]
    fn duration_handles_zero_fps() {
        let metadata = VideoMetadata {
            frame_count: 10,
            height: 0,
            width: 0,
            fps: 0.0,
        };
        assert_eq!(metadata.duration_seconds(), 0.0);
    }
}
