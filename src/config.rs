//! Inspection configuration.
//!
//! [`InspectOptions`] is a builder carrying every tunable of an inspection
//! run. A default-constructed value samples every 10th frame into a 10×10
//! grid, jumps to frame 900, and writes `output.json`.
//!
//! # Example
//!
//! ```
//! use vidinspect::InspectOptions;
//!
//! let options = InspectOptions::new()
//!     .with_stride(5)
//!     .with_max_frames(40)
//!     .with_jump_target(120)
//!     .with_output_path("report.json");
//!
//! assert_eq!(options.grid_layout().columns, 10);
//! assert_eq!(options.grid_layout().rows, 4);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::grid::GridLayout;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Configuration for an inspection run.
#[derive(Clone)]
pub struct InspectOptions {
    pub(crate) stride: u64,
    pub(crate) max_frames: usize,
    pub(crate) jump_target: u64,
    pub(crate) output_path: PathBuf,
    pub(crate) grid_columns: u32,
    pub(crate) thumbnail_width: u32,
    pub(crate) title_font: Option<PathBuf>,
    pub(crate) shared_handle: bool,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) progress_interval: u64,
}

impl Debug for InspectOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InspectOptions")
            .field("stride", &self.stride)
            .field("max_frames", &self.max_frames)
            .field("jump_target", &self.jump_target)
            .field("output_path", &self.output_path)
            .field("grid_columns", &self.grid_columns)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("title_font", &self.title_font)
            .field("shared_handle", &self.shared_handle)
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectOptions {
    /// Sample every Nth frame.
    pub const DEFAULT_STRIDE: u64 = 10;
    /// Place at most this many frames in the grid.
    pub const DEFAULT_MAX_FRAMES: usize = 100;
    /// Frame index the jump pass seeks to.
    pub const DEFAULT_JUMP_TARGET: u64 = 900;
    /// Where the report is written.
    pub const DEFAULT_OUTPUT_PATH: &'static str = "output.json";
    /// Maximum grid columns; rows grow with the cap.
    pub const DEFAULT_GRID_COLUMNS: u32 = 10;
    /// Width of each grid thumbnail in pixels.
    pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 192;

    /// Create options with the documented defaults.
    pub fn new() -> Self {
        Self {
            stride: Self::DEFAULT_STRIDE,
            max_frames: Self::DEFAULT_MAX_FRAMES,
            jump_target: Self::DEFAULT_JUMP_TARGET,
            output_path: PathBuf::from(Self::DEFAULT_OUTPUT_PATH),
            grid_columns: Self::DEFAULT_GRID_COLUMNS,
            thumbnail_width: Self::DEFAULT_THUMBNAIL_WIDTH,
            title_font: None,
            shared_handle: false,
            progress: Arc::new(NoOpProgress),
            progress_interval: 1,
        }
    }

    /// Set the sampling stride. Zero is rejected when the grid pass runs.
    #[must_use]
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride;
        self
    }

    /// Set the maximum number of frames placed in the grid.
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the frame index for the jump pass.
    #[must_use]
    pub fn with_jump_target(mut self, frame_number: u64) -> Self {
        self.jump_target = frame_number;
        self
    }

    /// Set where the JSON report is written.
    #[must_use]
    pub fn with_output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the maximum number of grid columns. Clamped to at least 1.
    #[must_use]
    pub fn with_grid_columns(mut self, columns: u32) -> Self {
        self.grid_columns = columns.max(1);
        self
    }

    /// Set the grid thumbnail width in pixels. Clamped to at least 1.
    #[must_use]
    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width.max(1);
        self
    }

    /// Draw `Frame: <index>` cell titles with the font at `path`.
    ///
    /// Without this a few common system font locations are tried. If no
    /// font can be loaded the grid is still rendered, untitled.
    #[must_use]
    pub fn with_title_font<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.title_font = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reuse one decoder handle for all three passes instead of reopening
    /// the file for each.
    #[must_use]
    pub fn with_shared_handle(mut self, shared: bool) -> Self {
        self.shared_handle = shared;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Fire the progress callback every `frames` decoded frames. Clamped to
    /// at least 1.
    #[must_use]
    pub fn with_progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = frames.max(1);
        self
    }

    /// Sampling stride.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Grid cap.
    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Jump target frame index.
    pub fn jump_target(&self) -> u64 {
        self.jump_target
    }

    /// Report output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Whether the passes share one decoder handle.
    pub fn shared_handle(&self) -> bool {
        self.shared_handle
    }

    /// Grid dimensions implied by the cap and column limit.
    ///
    /// This is an upper bound: the grid pass shrinks it to the number of
    /// frames the video can actually supply.
    pub fn grid_layout(&self) -> GridLayout {
        GridLayout::for_capacity(self.max_frames, self.grid_columns)
    }
}
