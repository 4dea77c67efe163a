//! The inspection report and its JSON form.
//!
//! The report is written as UTF-8 JSON indented with four spaces:
//!
//! ```text
//! {
//!     "video_metadata": {
//!         "frame_count": 1000,
//!         "height": 1080,
//!         "width": 1920,
//!         "fps": 30.0
//!     },
//!     "frame_info": [
//!         {
//!             "frame": 0,
//!             "displayed": true
//!         },
//!         ...
//!     ],
//!     "jumped_frame_info": {
//!         "frame": 900,
//!         "displayed": true
//!     }
//! }
//! ```

use std::fs;
use std::io::{Error as IoError, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Serializer, ser::PrettyFormatter};

use crate::error::InspectError;
use crate::metadata::VideoMetadata;

const JSON_INDENT: &[u8] = b"    ";

/// Outcome for one frame: its index and whether it was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Zero-based frame index.
    pub frame: u64,
    /// `false` only when the decoder could not produce the frame.
    pub displayed: bool,
}

impl FrameRecord {
    /// A frame that was decoded and rendered.
    pub fn shown(frame: u64) -> Self {
        Self {
            frame,
            displayed: true,
        }
    }

    /// A frame the decoder could not produce.
    pub fn not_shown(frame: u64) -> Self {
        Self {
            frame,
            displayed: false,
        }
    }
}

/// Everything one inspection run found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionReport {
    /// Decoder-reported metadata.
    pub video_metadata: VideoMetadata,
    /// Grid-pass records in sampling order.
    pub frame_info: Vec<FrameRecord>,
    /// Jump-pass record.
    pub jumped_frame_info: FrameRecord,
}

impl InspectionReport {
    /// Serialize to four-space-indented JSON.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, InspectError> {
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Serialize to a four-space-indented JSON string.
    pub fn to_json_string(&self) -> Result<String, InspectError> {
        String::from_utf8(self.to_json_bytes()?)
            .map_err(|error| IoError::new(ErrorKind::InvalidData, error).into())
    }

    /// Write the report to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::IoError`] if the file cannot be written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), InspectError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_bytes()?)?;
        log::debug!("Wrote inspection report to {}", path.display());
        Ok(())
    }

    /// Read a report previously written with [`write_to`](InspectionReport::write_to).
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::IoError`] if the file cannot be read or
    /// [`InspectError::JsonError`] if it is not a valid report.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, InspectError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Number of grid-pass frames that were displayed.
    pub fn displayed_count(&self) -> usize {
        self.frame_info.iter().filter(|record| record.displayed).count()
    }
}
