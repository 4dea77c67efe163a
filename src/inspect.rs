//! The inspection driver.
//!
//! [`Inspector`] ties the passes together: it reads metadata, runs the grid
//! pass and the jump pass, assembles an [`InspectionReport`], and writes it
//! to the configured output path.
//!
//! By default every pass opens its own decoder handle. With
//! [`InspectOptions::with_shared_handle`] a single handle is opened once and
//! reused, the jump pass seeking backwards over whatever the grid pass read.
//!
//! # Example
//!
//! ```no_run
//! use vidinspect::{HeadlessDisplay, InspectOptions, Inspector};
//!
//! let inspector = Inspector::new(InspectOptions::new().with_output_path("report.json"));
//! let report = inspector.run("input.mp4", &mut HeadlessDisplay)?;
//! println!(
//!     "{} of {} sampled frames displayed, jump displayed: {}",
//!     report.displayed_count(),
//!     report.frame_info.len(),
//!     report.jumped_frame_info.displayed,
//! );
//! # Ok::<(), vidinspect::InspectError>(())
//! ```

use std::path::Path;

use crate::config::InspectOptions;
use crate::display::FrameDisplay;
use crate::error::InspectError;
use crate::jumper::{jump_to_frame, jump_to_frame_from};
use crate::metadata::VideoMetadata;
use crate::report::InspectionReport;
use crate::sampler::{sample_grid, sample_grid_from};
use crate::source::{FrameReader, VideoSource};
use crate::validation::validate_metadata;

/// Runs a full inspection with one set of options.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    options: InspectOptions,
}

impl Inspector {
    pub fn new(options: InspectOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Inspect `path` and return the report without writing it.
    ///
    /// # Errors
    ///
    /// - [`InspectError::InvalidStride`] if the stride is zero. Nothing is
    ///   opened in that case.
    /// - Open errors from [`VideoSource::open`].
    /// - Errors from the display surface.
    ///
    /// Failed reads and seeks are recorded in the report, not returned.
    pub fn build_report<P: AsRef<Path>>(
        &self,
        path: P,
        display: &mut dyn FrameDisplay,
    ) -> Result<InspectionReport, InspectError> {
        if self.options.stride == 0 {
            return Err(InspectError::InvalidStride);
        }
        let path = path.as_ref();
        log::info!("Inspecting {}", path.display());

        if self.options.shared_handle {
            let mut source = VideoSource::open(path)?;
            return inspect_reader(&mut source, &self.options, display);
        }

        let video_metadata = read_metadata(path)?;
        log_validation(&video_metadata);

        let frame_info = sample_grid(path, &self.options, display)?;
        let jumped_frame_info = jump_to_frame(path, self.options.jump_target, display)?;

        Ok(InspectionReport {
            video_metadata,
            frame_info,
            jumped_frame_info,
        })
    }

    /// Inspect `path` and write the report to the configured output path.
    ///
    /// Nothing is written if the inspection fails.
    ///
    /// # Errors
    ///
    /// Everything [`build_report`](Self::build_report) returns, plus I/O and
    /// serialization errors from writing the report.
    pub fn run<P: AsRef<Path>>(
        &self,
        path: P,
        display: &mut dyn FrameDisplay,
    ) -> Result<InspectionReport, InspectError> {
        let report = self.build_report(path, display)?;
        report.write_to(&self.options.output_path)?;
        log::info!("Output saved to {}", self.options.output_path.display());
        Ok(report)
    }
}

/// Run a full inspection and write the report. Shorthand for
/// `Inspector::new(options.clone()).run(path, display)`.
pub fn inspect<P: AsRef<Path>>(
    path: P,
    options: &InspectOptions,
    display: &mut dyn FrameDisplay,
) -> Result<InspectionReport, InspectError> {
    Inspector::new(options.clone()).run(path, display)
}

/// Open, capture metadata, close.
fn read_metadata(path: &Path) -> Result<VideoMetadata, InspectError> {
    let source = VideoSource::open(path)?;
    let metadata = source.metadata();
    log::info!(
        "Metadata: {}x{} @ {:.2} fps, {} frames",
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata.frame_count,
    );
    Ok(metadata)
}

/// All passes on one reader.
fn inspect_reader<R: FrameReader + ?Sized>(
    reader: &mut R,
    options: &InspectOptions,
    display: &mut dyn FrameDisplay,
) -> Result<InspectionReport, InspectError> {
    let video_metadata = reader.metadata();
    log_validation(&video_metadata);

    let frame_info = sample_grid_from(reader, options, display)?;
    let jumped_frame_info = jump_to_frame_from(reader, options.jump_target, display)?;

    Ok(InspectionReport {
        video_metadata,
        frame_info,
        jumped_frame_info,
    })
}

fn log_validation(metadata: &VideoMetadata) {
    let validation = validate_metadata(metadata);
    for warning in &validation.warnings {
        log::warn!("{warning}");
    }
    for error in &validation.errors {
        log::warn!("{error}");
    }
}
