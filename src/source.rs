//! The decoder handle.
//!
//! [`VideoSource`] wraps an FFmpeg demuxer and video decoder for one file.
//! Frames are read sequentially with [`read_frame`](VideoSource::read_frame)
//! and the read position can be moved with
//! [`seek_to_frame`](VideoSource::seek_to_frame). Dropping the handle
//! releases the demuxer and decoder.
//!
//! The sampling and jumping passes are written against the [`FrameReader`]
//! trait rather than the concrete handle.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    conversion::{
        estimate_frame_count, frame_number_to_seek_timestamp, frame_to_rgb_buffer,
        pts_to_frame_number, pts_to_seconds, rational_to_f64,
    },
    error::InspectError,
    metadata::VideoMetadata,
};

/// FFmpeg's `AV_NOPTS_VALUE`.
const NO_PTS: i64 = i64::MIN;

/// A single decoded frame and its index within the source.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based frame index.
    pub index: u64,
    /// The decoded picture in RGB8.
    pub image: DynamicImage,
}

/// Sequential, seekable access to decoded frames.
///
/// Implemented by [`VideoSource`]. A failed read is signalled either by
/// `Ok(None)` (end of stream) or by an error; callers that only care whether
/// a frame was produced treat both the same way.
pub trait FrameReader {
    /// Metadata captured when the source was opened.
    fn metadata(&self) -> VideoMetadata;

    /// Decode and return the next frame, or `None` at end of stream.
    fn read_frame(&mut self) -> Result<Option<Frame>, InspectError>;

    /// Move the read position so the next [`read_frame`](FrameReader::read_frame)
    /// returns the frame at `frame_number`.
    fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), InspectError>;

    /// Move the read position back to the first frame.
    fn rewind(&mut self) -> Result<(), InspectError> {
        self.seek_to_frame(0)
    }
}

/// An open video file.
///
/// # Example
///
/// ```no_run
/// use vidinspect::VideoSource;
///
/// let mut source = VideoSource::open("input.mp4")?;
/// println!("{:?}", source.metadata());
///
/// source.seek_to_frame(900)?;
/// if let Some(frame) = source.read_frame()? {
///     frame.image.save("frame_900.png")?;
/// }
/// # Ok::<(), vidinspect::InspectError>(())
/// ```
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    /// Built from the first decoded frame, rebuilt if the input format or
    /// size changes mid-stream.
    scaler: Option<ScalingContext>,
    video_stream_index: usize,
    time_base: Rational,
    /// Stream start time in `time_base` units (0 when unknown).
    start_pts: i64,
    metadata: VideoMetadata,
    /// Index assigned to the next frame returned by `read_frame`.
    position: u64,
    /// After a seek, frames whose index precedes this are discarded.
    seek_target: Option<u64>,
    eof_sent: bool,
    /// Nothing has been demuxed since open, so a rewind needs no seek.
    untouched: bool,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    file_path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("file_path", &self.file_path)
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("position", &self.position)
            .field("seek_target", &self.seek_target)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file for inspection.
    ///
    /// Initializes FFmpeg (idempotent), opens the container, selects the best
    /// video stream, creates its decoder, and captures metadata.
    ///
    /// # Errors
    ///
    /// - [`InspectError::FileOpen`] if the file is missing, the container
    ///   cannot be parsed, or no decoder is available for the codec.
    /// - [`InspectError::NoVideoStream`] if the container has no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, InspectError> {
        let file_path = path.as_ref().to_path_buf();
        let open_error = |reason: String| InspectError::FileOpen {
            path: file_path.clone(),
            reason,
        };

        log::debug!("Opening video source: {}", file_path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&file_path).map_err(|error| open_error(error.to_string()))?;

        let (video_stream_index, time_base, start_pts, stream_frames, stream_seconds, fps, decoder) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(InspectError::NoVideoStream)?;

            let time_base = stream.time_base();
            let start_pts = match stream.start_time() {
                NO_PTS => 0,
                start => start,
            };
            let stream_seconds = match stream.duration() {
                duration if duration > 0 => pts_to_seconds(duration, time_base),
                _ => 0.0,
            };
            let fps = rational_to_f64(stream.avg_frame_rate())
                .or_else(|| rational_to_f64(stream.rate()))
                .unwrap_or(0.0);

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| open_error(format!("Failed to read codec parameters: {error}")))?;
            let decoder = decoder_context
                .decoder()
                .video()
                .map_err(|error| open_error(format!("Failed to create video decoder: {error}")))?;

            (
                stream.index(),
                time_base,
                start_pts,
                stream.frames(),
                stream_seconds,
                fps,
                decoder,
            )
        };

        let frame_count = if stream_frames > 0 {
            stream_frames as u64
        } else {
            let seconds = if stream_seconds > 0.0 {
                stream_seconds
            } else {
                input_context.duration().max(0) as f64 / 1_000_000.0
            };
            estimate_frame_count(seconds, fps)
        };

        let metadata = VideoMetadata {
            frame_count,
            height: decoder.height(),
            width: decoder.width(),
            fps,
        };

        log::info!(
            "Opened video: {} ({}x{}, {:.3} fps, {} frames, stream {})",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            metadata.frame_count,
            video_stream_index,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            video_stream_index,
            time_base,
            start_pts,
            metadata,
            position: 0,
            seek_target: None,
            eof_sent: false,
            untouched: true,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            file_path,
        })
    }

    /// Metadata captured at open time.
    pub fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Index the next successful [`read_frame`](VideoSource::read_frame)
    /// is expected to return.
    pub fn position(&self) -> u64 {
        self.seek_target.unwrap_or(self.position)
    }

    /// Decode the next frame.
    ///
    /// Sequential reads number frames 0, 1, 2, … from the start of the
    /// stream. The first read after a seek is numbered from its
    /// presentation timestamp.
    ///
    /// Returns `Ok(None)` once the decoder is drained.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::FfmpegError`] if demuxing or decoding fails,
    /// or [`InspectError::VideoDecodeError`] if the picture cannot be
    /// converted to RGB.
    pub fn read_frame(&mut self) -> Result<Option<Frame>, InspectError> {
        self.untouched = false;
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let index = match self.seek_target {
                    Some(target) => match self.decoded_frame_number() {
                        Some(number) if number < target => continue,
                        Some(number) => number,
                        None => target,
                    },
                    None => self.position,
                };
                self.seek_target = None;
                self.position = index + 1;

                let image = self.convert_decoded_frame()?;
                return Ok(Some(Frame { index, image }));
            }

            if self.eof_sent {
                log::debug!("Decoder drained at position {}", self.position);
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Seek so that the next read returns `frame_number`.
    ///
    /// Seeks the container to the nearest keyframe at or before the target,
    /// flushes the decoder, and discards decoded frames until the target is
    /// reached. Accuracy depends on the timestamps the container provides.
    ///
    /// # Errors
    ///
    /// - [`InspectError::FrameOutOfRange`] if the source reports a frame
    ///   count and `frame_number` is not below it.
    /// - [`InspectError::FfmpegError`] if the container seek fails.
    pub fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), InspectError> {
        let total_frames = self.metadata.frame_count;
        if total_frames > 0 && frame_number >= total_frames {
            return Err(InspectError::FrameOutOfRange {
                frame_number,
                total_frames,
            });
        }

        let start_offset = (pts_to_seconds(self.start_pts, self.time_base) * 1_000_000.0) as i64;
        let timestamp =
            frame_number_to_seek_timestamp(frame_number, self.metadata.fps, start_offset);

        log::debug!("Seeking to frame {frame_number} (timestamp {timestamp} us)");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.position = frame_number;
        self.seek_target = Some(frame_number);
        Ok(())
    }

    /// Seek back to the first frame.
    ///
    /// A handle that has not been read from is already there, and is left
    /// alone.
    pub fn rewind(&mut self) -> Result<(), InspectError> {
        if self.untouched {
            return Ok(());
        }
        self.seek_to_frame(0)
    }

    /// Frame number of the decoded frame derived from its timestamp.
    fn decoded_frame_number(&self) -> Option<u64> {
        let pts = self.decoded_frame.timestamp().or(self.decoded_frame.pts())?;
        Some(pts_to_frame_number(
            pts - self.start_pts,
            self.time_base,
            self.metadata.fps,
        ))
    }

    /// Scale the current decoded frame to RGB24 and wrap it as an image.
    fn convert_decoded_frame(&mut self) -> Result<DynamicImage, InspectError> {
        let format = self.decoded_frame.format();
        let width = self.decoded_frame.width();
        let height = self.decoded_frame.height();

        let stale = self.scaler.as_ref().is_none_or(|scaler| {
            let input = scaler.input();
            input.format != format || input.width != width || input.height != height
        });
        if stale {
            self.scaler = Some(ScalingContext::get(
                format,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?);
            self.rgb_frame = VideoFrame::empty();
        }

        if let Some(scaler) = self.scaler.as_mut() {
            scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        }

        let buffer = frame_to_rgb_buffer(&self.rgb_frame, width, height);
        let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            InspectError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(rgb_image))
    }
}

impl FrameReader for VideoSource {
    fn metadata(&self) -> VideoMetadata {
        VideoSource::metadata(self)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, InspectError> {
        VideoSource::read_frame(self)
    }

    fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), InspectError> {
        VideoSource::seek_to_frame(self, frame_number)
    }

    fn rewind(&mut self) -> Result<(), InspectError> {
        VideoSource::rewind(self)
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        log::debug!(
            "Releasing video source: {} (position {})",
            self.file_path.display(),
            self.position
        );
    }
}
