//! Metadata sanity checks.
//!
//! Decoders sometimes report zero dimensions, a zero frame count, or an
//! implausible frame rate. Inspection passes such values through unchanged;
//! [`validate_metadata`] describes them so a reviewer knows to distrust the
//! report.
//!
//! # Example
//!
//! ```no_run
//! use vidinspect::{VideoSource, validate_metadata};
//!
//! let source = VideoSource::open("input.mp4")?;
//! let report = validate_metadata(&source.metadata());
//! print!("{report}");
//! # Ok::<(), vidinspect::InspectError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::metadata::VideoMetadata;

/// Frame rates above this are flagged as suspicious.
const MAX_PLAUSIBLE_FPS: f64 = 240.0;

/// Findings from [`validate_metadata`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Informational notices.
    pub info: Vec<String>,
    /// Values that make parts of the report unreliable.
    pub warnings: Vec<String>,
    /// Values that make the report meaningless.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of findings.
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Check decoder-reported metadata for suspicious values.
pub fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid video dimensions: {}x{}",
            metadata.width, metadata.height,
        ));
    }

    if metadata.frame_count == 0 {
        report
            .warnings
            .push("Frame count is zero; the grid pass will sample nothing".to_string());
    }

    if metadata.fps <= 0.0 || !metadata.fps.is_finite() {
        report
            .warnings
            .push("Frame rate is zero or invalid; seeking will be unreliable".to_string());
    } else if metadata.fps > MAX_PLAUSIBLE_FPS {
        report.warnings.push(format!(
            "Unusually high frame rate ({:.1} fps)",
            metadata.fps,
        ));
    }

    report.info.push(format!(
        "Video: {}x{} @ {:.2} fps, {} frames ({:.2}s)",
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata.frame_count,
        metadata.duration_seconds(),
    ));

    report
}
