//! Internal conversion helpers.
//!
//! Pixel-plane copying and the frame-number / timestamp arithmetic shared by
//! the decoder handle.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Bytes per pixel of the RGB24 frames produced by the scaler.
pub(crate) const RGB_BYTES_PER_PIXEL: usize = 3;

/// Copy an RGB24 video frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// The padding is stripped so the result can be passed directly to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * RGB_BYTES_PER_PIXEL;
    let data = video_frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * (height as usize)].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
    for row in data.chunks(stride).take(height as usize) {
        buffer.extend_from_slice(&row[..row_bytes]);
    }
    buffer
}

/// Convert a rational rate to a floating point value, `None` when the
/// denominator or numerator is zero.
pub(crate) fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.numerator() == 0 || rate.denominator() == 0 {
        None
    } else {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    }
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Rescale a PTS value to a frame number, rounding to the nearest frame.
///
/// Timestamps before the stream start map to frame 0.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let frame = (pts_to_seconds(pts, time_base) * frames_per_second).round();
    if frame.is_sign_negative() { 0 } else { frame as u64 }
}

/// Convert a frame number to a container seek timestamp in AV_TIME_BASE
/// (microseconds), as expected by `input.seek()` with no stream index.
///
/// `start_offset` is the stream start time in microseconds. The result
/// saturates instead of overflowing for absurd frame numbers.
pub(crate) fn frame_number_to_seek_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    start_offset: i64,
) -> i64 {
    if frames_per_second <= 0.0 {
        return start_offset;
    }
    let seconds = frame_number as f64 / frames_per_second;
    ((seconds * 1_000_000.0) as i64).saturating_add(start_offset)
}

/// Estimate a frame count from a duration in seconds and a frame rate.
pub(crate) fn estimate_frame_count(duration_seconds: f64, frames_per_second: f64) -> u64 {
    if duration_seconds <= 0.0 || frames_per_second <= 0.0 {
        return 0;
    }
    (duration_seconds * frames_per_second).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pts_maps_to_nearest_frame() {
        // 90 kHz clock at 30 fps: 3000 ticks per frame.
        let time_base = Rational::new(1, 90_000);
        assert_eq!(pts_to_frame_number(0, time_base, 30.0), 0);
        assert_eq!(pts_to_frame_number(3000, time_base, 30.0), 1);
        assert_eq!(pts_to_frame_number(2999, time_base, 30.0), 1);
        assert_eq!(pts_to_frame_number(2_700_000, time_base, 30.0), 900);
    }

    #[test]
    fn negative_pts_clamps_to_zero() {
        let time_base = Rational::new(1, 1000);
        assert_eq!(pts_to_frame_number(-40, time_base, 25.0), 0);
    }

    #[test]
    fn seek_timestamp_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(900, 30.0, 0), 30_000_000);
        assert_eq!(frame_number_to_seek_timestamp(900, 30.0, 1_500), 30_001_500);
        assert_eq!(frame_number_to_seek_timestamp(5, 0.0, 0), 0);
    }

    #[test]
    fn huge_frame_number_saturates() {
        assert_eq!(frame_number_to_seek_timestamp(u64::MAX, 30.0, 1_000_000), i64::MAX);
        assert_eq!(frame_number_to_seek_timestamp(u64::MAX, 0.001, i64::MAX), i64::MAX);
    }

    #[test]
    fn rational_rejects_zero_terms() {
        let ntsc = rational_to_f64(Rational::new(30_000, 1001)).unwrap();
        assert_eq!((ntsc * 100.0).round(), 2997.0);
        assert_eq!(rational_to_f64(Rational::new(0, 1)), None);
        assert_eq!(rational_to_f64(Rational::new(25, 0)), None);
    }

    #[test]
    fn frame_count_estimate() {
        assert_eq!(estimate_frame_count(33.333_333, 30.0), 1000);
        assert_eq!(estimate_frame_count(0.0, 30.0), 0);
        assert_eq!(estimate_frame_count(10.0, 0.0), 0);
    }
}
