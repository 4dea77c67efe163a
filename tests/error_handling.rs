//! Error handling integration tests.
//!
//! These tests verify that failures surface as the right `InspectError`
//! variants and that a failed run leaves no report behind.

use std::path::Path;

use vidinspect::{
    FrameRecord, HeadlessDisplay, InspectError, InspectOptions, Inspector, VideoSource,
    jump_to_frame,
};

#[test]
fn open_nonexistent_file() {
    let result = VideoSource::open("this_file_does_not_exist.mp4");

    let error = result.unwrap_err();
    assert!(matches!(error, InspectError::FileOpen { .. }));
    let error_message = error.to_string();
    assert!(
        error_message.contains("Cannot open video at this_file_does_not_exist.mp4"),
        "Error message should name the path: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a video file")
        .expect("Failed to write invalid file");

    let result = VideoSource::open(&invalid_file_path);
    assert!(matches!(result, Err(InspectError::FileOpen { .. })));
}

#[test]
fn failed_run_writes_no_report() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temporary_directory.path().join("output.json");
    let inspector = Inspector::new(InspectOptions::new().with_output_path(&output));

    let result = inspector.run(
        temporary_directory.path().join("missing.mp4"),
        &mut HeadlessDisplay,
    );

    assert!(matches!(result, Err(InspectError::FileOpen { .. })));
    assert!(!output.exists());
}

#[test]
fn zero_stride_is_rejected() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temporary_directory.path().join("output.json");
    let inspector =
        Inspector::new(InspectOptions::new().with_stride(0).with_output_path(&output));

    let result = inspector.run("tests/fixtures/sample_video.mp4", &mut HeadlessDisplay);

    assert!(matches!(result, Err(InspectError::InvalidStride)));
    assert!(!output.exists());
}

#[test]
fn no_video_stream() {
    let path = "tests/fixtures/audio_only.m4a";
    if !Path::new(path).exists() {
        return;
    }

    let result = VideoSource::open(path);
    assert!(matches!(result, Err(InspectError::NoVideoStream)));
}

#[test]
fn seek_out_of_range() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open test video");
    let error = source.seek_to_frame(999_999).unwrap_err();

    let error_message = error.to_string();
    assert!(
        error_message.contains("out of range"),
        "Error message should mention out of range: {error_message}",
    );
}

#[test]
fn jump_failure_is_recorded_not_raised() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let record = jump_to_frame(path, 1000, &mut HeadlessDisplay).expect("Jump should not error");
    assert_eq!(record, FrameRecord::not_shown(1000));
}
