//! The grid sampling pass.
//!
//! Walks a video from its first frame, placing every Nth frame into a
//! [`FrameGrid`] until the cap is reached, then hands the grid to the
//! display. A failed read ends the walk and keeps what was already sampled.

use std::path::Path;

use crate::config::InspectOptions;
use crate::display::FrameDisplay;
use crate::error::InspectError;
use crate::grid::{
    FrameGrid, GridLayout, SYSTEM_FONT_CANDIDATES, find_system_font, load_title_font,
};
use crate::progress::{InspectionStage, ProgressTracker};
use crate::report::FrameRecord;
use crate::source::{FrameReader, VideoSource};

/// Open `path` and run the grid pass on a fresh handle.
///
/// The handle is released before returning.
///
/// # Errors
///
/// - [`InspectError::InvalidStride`] if the stride is zero (checked before
///   the file is opened).
/// - Any open error from [`VideoSource::open`].
/// - Errors from the display surface or grid composition.
///
/// # Example
///
/// ```no_run
/// use vidinspect::{HeadlessDisplay, InspectOptions, sample_grid};
///
/// let records = sample_grid("input.mp4", &InspectOptions::new(), &mut HeadlessDisplay)?;
/// for record in &records {
///     println!("sampled frame {}", record.frame);
/// }
/// # Ok::<(), vidinspect::InspectError>(())
/// ```
pub fn sample_grid<P: AsRef<Path>>(
    path: P,
    options: &InspectOptions,
    display: &mut dyn FrameDisplay,
) -> Result<Vec<FrameRecord>, InspectError> {
    if options.stride == 0 {
        return Err(InspectError::InvalidStride);
    }
    let mut source = VideoSource::open(path)?;
    sample_grid_from(&mut source, options, display)
}

/// Run the grid pass on an already-open reader.
///
/// The reader is rewound first, so it may be at any position. Reads frames `0..frame_count` in order. Frame `i` is placed when
/// `i % stride == 0` and fewer than `max_frames` frames have been placed.
/// The walk ends at the first failed read or once the cap is reached. The
/// grid has room for `min(max_frames, ceil(frame_count / stride))` frames.
///
/// # Errors
///
/// Same as [`sample_grid`], minus the open errors, plus
/// [`InspectError::FfmpegError`] if the rewind seek fails. Read failures are
/// not errors.
pub fn sample_grid_from<R: FrameReader + ?Sized>(
    reader: &mut R,
    options: &InspectOptions,
    display: &mut dyn FrameDisplay,
) -> Result<Vec<FrameRecord>, InspectError> {
    if options.stride == 0 {
        return Err(InspectError::InvalidStride);
    }

    reader.rewind()?;

    let frame_count = reader.metadata().frame_count;
    let cap = options.max_frames;
    let reachable = usize::try_from(frame_count.div_ceil(options.stride)).unwrap_or(usize::MAX);
    let cells = cap.min(reachable);
    let mut grid = build_grid(options, cells);
    let mut records = Vec::new();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        InspectionStage::GridSampling,
        Some(frame_count),
        options.progress_interval,
    );

    log::info!(
        "Sampling every {} frame(s), up to {} into a {}x{} grid",
        options.stride,
        cells,
        grid.layout().columns,
        grid.layout().rows,
    );

    for index in 0..frame_count {
        if records.len() >= cap {
            log::debug!("Grid cap of {cap} reached at frame {index}");
            break;
        }

        let mut frame = match reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::debug!("Stream ended at frame {index} of {frame_count}");
                break;
            }
            Err(error) => {
                log::warn!("Stopping grid pass: failed to read frame {index}: {error}");
                break;
            }
        };
        tracker.advance(index);

        if is_sampled(index, options.stride, records.len(), cap) {
            frame.index = index;
            grid.place(&frame)?;
            records.push(FrameRecord::shown(index));
        }
    }
    tracker.finish();

    if !records.is_empty() {
        display.show_grid(&grid)?;
    }
    log::info!("Grid pass placed {} frame(s)", records.len());

    Ok(records)
}

/// Whether frame `index` goes into the grid given `placed` frames so far.
pub(crate) fn is_sampled(index: u64, stride: u64, placed: usize, cap: usize) -> bool {
    placed < cap && index % stride == 0
}

/// A grid sized for `cells` frames, titled if a font can be found.
fn build_grid(options: &InspectOptions, cells: usize) -> FrameGrid {
    let layout = GridLayout::for_capacity(cells, options.grid_columns);
    let grid = FrameGrid::new(layout, options.thumbnail_width);
    let font_path = match &options.title_font {
        Some(path) => path.as_path(),
        None => match find_system_font(SYSTEM_FONT_CANDIDATES) {
            Some(path) => path,
            None => {
                log::info!("No title font configured or found; grid cells will be untitled");
                return grid;
            }
        },
    };
    log::debug!("Grid title font: {}", font_path.display());
    match load_title_font(font_path) {
        Ok(font) => grid.with_title_font(font),
        Err(error) => {
            log::warn!("Grid titles disabled: {error}");
            grid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeReader, RecordingDisplay};

    fn run(
        reader: &mut FakeReader,
        stride: u64,
        cap: usize,
    ) -> (Vec<FrameRecord>, RecordingDisplay) {
        let options = InspectOptions::new()
            .with_stride(stride)
            .with_max_frames(cap)
            .with_thumbnail_width(4);
        let mut display = RecordingDisplay::default();
        let records = sample_grid_from(reader, &options, &mut display).unwrap();
        (records, display)
    }

    fn indices(records: &[FrameRecord]) -> Vec<u64> {
        records.iter().map(|record| record.frame).collect()
    }

    #[test]
    fn selection_rule() {
        assert!(is_sampled(0, 10, 0, 100));
        assert!(is_sampled(990, 10, 99, 100));
        assert!(!is_sampled(995, 10, 99, 100));
        assert!(!is_sampled(1000, 10, 100, 100));
        assert!(!is_sampled(0, 1, 0, 0));
    }

    #[test]
    fn thousand_frames_with_defaults() {
        let mut reader = FakeReader::new(1000);
        let (records, display) = run(&mut reader, 10, 100);

        assert_eq!(records.len(), 100);
        assert_eq!(indices(&records), (0..100).map(|i| i * 10).collect::<Vec<_>>());
        assert!(records.iter().all(|record| record.displayed));
        assert_eq!(display.grids, vec![indices(&records)]);
    }

    #[test]
    fn record_count_matches_formula() {
        for frame_count in [0_u64, 1, 9, 10, 11, 95, 1000, 1234] {
            for stride in [1_u64, 3, 7, 10] {
                for cap in [0_usize, 5, 100] {
                    let mut reader = FakeReader::new(frame_count);
                    let (records, _) = run(&mut reader, stride, cap);

                    let expected = (cap as u64).min(frame_count.div_ceil(stride));
                    assert_eq!(
                        records.len() as u64,
                        expected,
                        "F={frame_count} N={stride} M={cap}"
                    );
                    for window in records.windows(2) {
                        assert!(window[0].frame < window[1].frame);
                    }
                    for record in &records {
                        assert_eq!(record.frame % stride, 0);
                        assert!(record.frame < frame_count);
                    }
                }
            }
        }
    }

    #[test]
    fn read_failure_keeps_partial_results() {
        let mut reader = FakeReader::new(1000).failing_at(35);
        let (records, display) = run(&mut reader, 10, 100);

        assert_eq!(indices(&records), vec![0, 10, 20, 30]);
        assert_eq!(display.grids.len(), 1);
    }

    #[test]
    fn truncated_stream_stops_early() {
        let mut reader = FakeReader::new(100).decodable(50);
        let (records, _) = run(&mut reader, 10, 100);
        assert_eq!(indices(&records), vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn stops_reading_once_cap_is_reached() {
        let mut reader = FakeReader::new(1000);
        let (records, _) = run(&mut reader, 10, 3);
        assert_eq!(indices(&records), vec![0, 10, 20]);
        assert_eq!(reader.reads, 21);
    }

    #[test]
    fn nothing_placed_means_no_grid_shown() {
        let mut reader = FakeReader::new(0);
        let (records, display) = run(&mut reader, 10, 100);
        assert!(records.is_empty());
        assert!(display.grids.is_empty());
    }

    #[test]
    fn cap_above_one_hundred_grows_grid() {
        let mut reader = FakeReader::new(2000);
        let (records, display) = run(&mut reader, 10, 150);
        assert_eq!(records.len(), 150);
        assert_eq!(display.grids[0].len(), 150);
    }

    #[test]
    fn huge_cap_is_bounded_by_video_length() {
        let mut reader = FakeReader::new(1000);
        let (records, display) = run(&mut reader, 10, usize::MAX / 2);

        assert_eq!(records.len(), 100);
        // 6x4 frames at 4 px wide are 3 px tall, plus the title band.
        assert_eq!(display.grid_sizes, vec![Some((40, 10 * (3 + 24)))]);
    }

    #[test]
    fn reader_mid_stream_is_rewound() {
        let mut reader = FakeReader::new(100);
        for _ in 0..42 {
            reader.read_frame().unwrap();
        }
        let (records, display) = run(&mut reader, 10, 100);

        assert_eq!(indices(&records), (0..10).map(|i| i * 10).collect::<Vec<_>>());
        assert_eq!(display.grids, vec![indices(&records)]);
    }

    #[test]
    fn zero_stride_is_rejected() {
        let mut reader = FakeReader::new(10);
        let options = InspectOptions::new().with_stride(0);
        let result = sample_grid_from(&mut reader, &options, &mut RecordingDisplay::default());
        assert!(matches!(result, Err(InspectError::InvalidStride)));
        assert_eq!(reader.reads, 0);
    }

    #[test]
    fn zero_stride_is_rejected_before_opening() {
        let options = InspectOptions::new().with_stride(0);
        let result = sample_grid(
            "definitely/not/a/video.mp4",
            &options,
            &mut RecordingDisplay::default(),
        );
        assert!(matches!(result, Err(InspectError::InvalidStride)));
    }
}
