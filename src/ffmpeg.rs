//! FFmpeg's own log verbosity.
//!
//! FFmpeg prints decoder warnings straight to stderr, independent of the
//! `log` facade this crate uses for its own messages. Truncated or slightly
//! damaged files, which are common inputs for an inspection tool, can make
//! it very noisy. [`set_decoder_log_level`] tunes or silences it.
//!
//! ```no_run
//! use vidinspect::{DecoderLogLevel, set_decoder_log_level};
//!
//! set_decoder_log_level(DecoderLogLevel::Error);
//! ```

use ffmpeg_next::util::log::Level;

/// FFmpeg log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderLogLevel {
    /// Print nothing.
    Quiet,
    /// Only conditions that abort the process.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Everything.
    Trace,
}

impl DecoderLogLevel {
    /// Parse a level name, case-insensitively. `warn` is accepted for
    /// `warning`.
    ///
    /// ```
    /// use vidinspect::DecoderLogLevel;
    ///
    /// assert_eq!(DecoderLogLevel::parse("WARN"), Some(DecoderLogLevel::Warning));
    /// assert_eq!(DecoderLogLevel::parse("loud"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let level = match value.trim().to_ascii_lowercase().as_str() {
            "quiet" => Self::Quiet,
            "panic" => Self::Panic,
            "fatal" => Self::Fatal,
            "error" => Self::Error,
            "warning" | "warn" => Self::Warning,
            "info" => Self::Info,
            "verbose" => Self::Verbose,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => return None,
        };
        Some(level)
    }

    fn to_ffmpeg_level(self) -> Level {
        match self {
            Self::Quiet => Level::Quiet,
            Self::Panic => Level::Panic,
            Self::Fatal => Level::Fatal,
            Self::Error => Level::Error,
            Self::Warning => Level::Warning,
            Self::Info => Level::Info,
            Self::Verbose => Level::Verbose,
            Self::Debug => Level::Debug,
            Self::Trace => Level::Trace,
        }
    }
}

/// Set FFmpeg's stderr verbosity. Does not affect `log` output.
pub fn set_decoder_log_level(level: DecoderLogLevel) {
    log::debug!("Setting FFmpeg log level to {level:?}");
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
