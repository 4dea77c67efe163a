//! The jump-to-frame pass.
//!
//! Seeks straight to one frame index, tries a single read, and shows the
//! frame if one came back. Every way of not getting the frame (target past
//! the end, seek failure, read failure) is recorded as `displayed: false`.

use std::path::Path;

use crate::display::FrameDisplay;
use crate::error::InspectError;
use crate::report::FrameRecord;
use crate::source::{FrameReader, VideoSource};

/// Open `path` and run the jump pass on a fresh handle.
///
/// # Errors
///
/// Returns an open error from [`VideoSource::open`] or an error from the
/// display surface. Seek and read failures are not errors.
///
/// # Example
///
/// ```no_run
/// use vidinspect::{HeadlessDisplay, jump_to_frame};
///
/// let record = jump_to_frame("input.mp4", 900, &mut HeadlessDisplay)?;
/// assert_eq!(record.frame, 900);
/// # Ok::<(), vidinspect::InspectError>(())
/// ```
pub fn jump_to_frame<P: AsRef<Path>>(
    path: P,
    frame_number: u64,
    display: &mut dyn FrameDisplay,
) -> Result<FrameRecord, InspectError> {
    let mut source = VideoSource::open(path)?;
    jump_to_frame_from(&mut source, frame_number, display)
}

/// Run the jump pass on an already-open reader.
///
/// The reader may be at any position; the seek resets it.
pub fn jump_to_frame_from<R: FrameReader + ?Sized>(
    reader: &mut R,
    frame_number: u64,
    display: &mut dyn FrameDisplay,
) -> Result<FrameRecord, InspectError> {
    let outcome = reader
        .seek_to_frame(frame_number)
        .and_then(|()| reader.read_frame());

    match outcome {
        Ok(Some(frame)) => {
            log::info!("Displaying frame {frame_number}");
            display.show_frame(&frame)?;
            Ok(FrameRecord::shown(frame_number))
        }
        Ok(None) => {
            log::warn!("Could not read frame {frame_number}: end of stream");
            Ok(FrameRecord::not_shown(frame_number))
        }
        Err(error) => {
            log::warn!("Could not read frame {frame_number}: {error}");
            Ok(FrameRecord::not_shown(frame_number))
        }
    }
}
