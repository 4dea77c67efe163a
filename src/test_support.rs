//! In-memory stand-ins for the decoder and display, used by unit tests.

use image::{DynamicImage, Rgb, RgbImage};

use crate::display::FrameDisplay;
use crate::error::InspectError;
use crate::grid::FrameGrid;
use crate::metadata::VideoMetadata;
use crate::source::{Frame, FrameReader};

/// Serves tiny solid frames. `decodable` may be smaller than the reported
/// frame count to model truncated files.
pub(crate) struct FakeReader {
    metadata: VideoMetadata,
    decodable: u64,
    fail_at: Option<u64>,
    position: u64,
    pub(crate) reads: u64,
}

impl FakeReader {
    pub(crate) fn new(frame_count: u64) -> Self {
        Self {
            metadata: VideoMetadata {
                frame_count,
                height: 4,
                width: 6,
                fps: 30.0,
            },
            decodable: frame_count,
            fail_at: None,
            position: 0,
            reads: 0,
        }
    }

    pub(crate) fn decodable(mut self, frames: u64) -> Self {
        self.decodable = frames;
        self
    }

    pub(crate) fn failing_at(mut self, frame: u64) -> Self {
        self.fail_at = Some(frame);
        self
    }
}

impl FrameReader for FakeReader {
    fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, InspectError> {
        self.reads += 1;
        if self.fail_at == Some(self.position) {
            return Err(InspectError::VideoDecodeError(format!(
                "corrupt packet at frame {}",
                self.position
            )));
        }
        if self.position >= self.decodable {
            return Ok(None);
        }
        let shade = (self.position % 256) as u8;
        let image = RgbImage::from_pixel(self.metadata.width, self.metadata.height, Rgb([shade; 3]));
        let frame = Frame {
            index: self.position,
            image: DynamicImage::ImageRgb8(image),
        };
        self.position += 1;
        Ok(Some(frame))
    }

    fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), InspectError> {
        let total_frames = self.metadata.frame_count;
        if total_frames > 0 && frame_number >= total_frames {
            return Err(InspectError::FrameOutOfRange {
                frame_number,
                total_frames,
            });
        }
        self.position = frame_number;
        Ok(())
    }
}

/// Remembers what it was asked to show.
#[derive(Default)]
pub(crate) struct RecordingDisplay {
    pub(crate) grids: Vec<Vec<u64>>,
    pub(crate) grid_sizes: Vec<Option<(u32, u32)>>,
    pub(crate) frames: Vec<u64>,
}

impl FrameDisplay for RecordingDisplay {
    fn show_grid(&mut self, grid: &FrameGrid) -> Result<(), InspectError> {
        self.grids.push(grid.placed().to_vec());
        self.grid_sizes
            .push(grid.image().map(|image| (image.width(), image.height())));
        Ok(())
    }

    fn show_frame(&mut self, frame: &Frame) -> Result<(), InspectError> {
        self.frames.push(frame.index);
        Ok(())
    }
}
