//! Progress reporting.
//!
//! The sampling pass decodes every frame up to the last one it needs, which
//! can take a while for long videos. Attach a [`ProgressCallback`] through
//! [`InspectOptions::with_progress`](crate::InspectOptions::with_progress) to
//! observe it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vidinspect::{HeadlessDisplay, InspectOptions, Inspector, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}%", info.stage);
//!         }
//!     }
//! }
//!
//! let options = InspectOptions::new()
//!     .with_progress(Arc::new(PrintProgress))
//!     .with_progress_interval(50);
//! Inspector::new(options).run("input.mp4", &mut HeadlessDisplay)?;
//! # Ok::<(), vidinspect::InspectError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which pass of an inspection is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InspectionStage {
    /// Walking frames from the start for the grid.
    GridSampling,
}

/// A snapshot of progress through a pass.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The pass being reported on.
    pub stage: InspectionStage,
    /// Frames decoded so far.
    pub current: u64,
    /// Frames expected, if known.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known and non-zero.
    pub percentage: Option<f32>,
    /// Wall-clock time since the pass started.
    pub elapsed: Duration,
    /// Index of the most recently decoded frame.
    pub current_frame: Option<u64>,
}

/// Receives progress updates.
///
/// Callbacks observe but cannot halt the pass.
pub trait ProgressCallback: Send + Sync {
    /// Called every [`progress_interval`](crate::InspectOptions::with_progress_interval)
    /// frames and once when the pass ends.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing for one pass and emits callbacks in batches.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    stage: InspectionStage,
    total: Option<u64>,
    current: u64,
    interval: u64,
    start_time: Instant,
    since_last_report: u64,
    last_frame: Option<u64>,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        stage: InspectionStage,
        total: Option<u64>,
        interval: u64,
    ) -> Self {
        Self {
            callback,
            stage,
            total,
            current: 0,
            interval: interval.max(1),
            start_time: Instant::now(),
            since_last_report: 0,
            last_frame: None,
        }
    }

    /// Record one decoded frame.
    pub(crate) fn advance(&mut self, frame_number: u64) {
        self.current += 1;
        self.since_last_report += 1;
        self.last_frame = Some(frame_number);

        if self.since_last_report >= self.interval {
            self.report();
            self.since_last_report = 0;
        }
    }

    /// Emit a final report regardless of the interval.
    pub(crate) fn finish(&mut self) {
        self.report();
    }

    fn report(&self) {
        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        self.callback.on_progress(&ProgressInfo {
            stage: self.stage,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            current_frame: self.last_frame,
        });
    }
}
