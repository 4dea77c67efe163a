//! Display surfaces for rendered frames.
//!
//! The sampling pass hands its finished [`FrameGrid`] to a [`FrameDisplay`],
//! and the jump pass hands it the single frame it decoded. What "display"
//! means is up to the implementation:
//!
//! - [`HeadlessDisplay`] discards everything.
//! - [`DirectoryDisplay`] writes PNG files a reviewer can open.
//!
//! # Example
//!
//! ```no_run
//! use vidinspect::{DirectoryDisplay, InspectOptions, Inspector};
//!
//! let mut display = DirectoryDisplay::new("review")?;
//! let report = Inspector::new(InspectOptions::new()).run("input.mp4", &mut display)?;
//! println!("{} frames sampled", report.frame_info.len());
//! # Ok::<(), vidinspect::InspectError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::error::InspectError;
use crate::grid::FrameGrid;
use crate::source::Frame;

/// A surface that receives rendered frames.
pub trait FrameDisplay {
    /// Present the composed sampling grid.
    fn show_grid(&mut self, grid: &FrameGrid) -> Result<(), InspectError>;

    /// Present a single full-size frame.
    fn show_frame(&mut self, frame: &Frame) -> Result<(), InspectError>;
}

/// Discards all renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay;

impl FrameDisplay for HeadlessDisplay {
    fn show_grid(&mut self, grid: &FrameGrid) -> Result<(), InspectError> {
        log::debug!("Headless: skipping grid of {} frames", grid.placed().len());
        Ok(())
    }

    fn show_frame(&mut self, frame: &Frame) -> Result<(), InspectError> {
        log::debug!("Headless: skipping frame {}", frame.index);
        Ok(())
    }
}

/// Writes renders as PNG files into a directory.
///
/// The grid is saved as `grid.png` and single frames as
/// `frame_<index>.png` with the index zero-padded to six digits.
#[derive(Debug, Clone)]
pub struct DirectoryDisplay {
    directory: PathBuf,
}

impl DirectoryDisplay {
    /// Use `directory`, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::IoError`] if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, InspectError> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Where the grid image is written.
    pub fn grid_path(&self) -> PathBuf {
        self.directory.join("grid.png")
    }

    /// Where the image for frame `index` is written.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.directory.join(format!("frame_{index:06}.png"))
    }
}

impl FrameDisplay for DirectoryDisplay {
    fn show_grid(&mut self, grid: &FrameGrid) -> Result<(), InspectError> {
        let Some(image) = grid.image() else {
            return Ok(());
        };
        let path = self.grid_path();
        image.save(&path)?;
        log::info!("Saved frame grid to {}", path.display());
        Ok(())
    }

    fn show_frame(&mut self, frame: &Frame) -> Result<(), InspectError> {
        let path = self.frame_path(frame.index);
        frame.image.save(&path)?;
        log::info!("Saved frame {} to {}", frame.index, path.display());
        Ok(())
    }
}
