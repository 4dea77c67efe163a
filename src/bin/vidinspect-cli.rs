use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use vidinspect::{
    DecoderLogLevel, DirectoryDisplay, FrameDisplay, HeadlessDisplay, InspectOptions, Inspector,
    ProgressCallback, ProgressInfo, VideoSource, validate_metadata,
};

const CLI_AFTER_HELP: &str = "Examples:\n  vidinspect inspect input.mp4\n  vidinspect inspect input.mp4 --out report.json --every 5 --max-frames 40 --jump-to 120 --show review --progress\n  vidinspect metadata input.mp4 --json\n  vidinspect validate input.mp4\n  vidinspect completions zsh > _vidinspect";

#[derive(Debug, Parser)]
#[command(
    name = "vidinspect",
    version,
    about = "Sample, jump through, and summarize a video file",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while sampling.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting an existing report.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample a frame grid, jump to one frame, and write a JSON report.
    #[command(
        about = "Run a full inspection",
        after_help = "Examples:\n  vidinspect inspect input.mp4\n  vidinspect inspect input.mp4 --every 30 --max-frames 16 --columns 4 --show review"
    )]
    Inspect {
        /// Input video path.
        input: PathBuf,
        /// Report output path.
        #[arg(long, default_value = InspectOptions::DEFAULT_OUTPUT_PATH)]
        out: PathBuf,
        /// Sample every Nth frame.
        #[arg(long, default_value_t = InspectOptions::DEFAULT_STRIDE)]
        every: u64,
        /// Maximum number of frames placed in the grid.
        #[arg(long, default_value_t = InspectOptions::DEFAULT_MAX_FRAMES)]
        max_frames: usize,
        /// Frame index to jump to.
        #[arg(long, default_value_t = InspectOptions::DEFAULT_JUMP_TARGET)]
        jump_to: u64,
        /// Maximum grid columns.
        #[arg(long, default_value_t = InspectOptions::DEFAULT_GRID_COLUMNS)]
        columns: u32,
        /// Width of each grid thumbnail in pixels.
        #[arg(long, default_value_t = InspectOptions::DEFAULT_THUMBNAIL_WIDTH)]
        thumbnail_width: u32,
        /// TrueType font used for grid cell titles.
        #[arg(long)]
        font: Option<PathBuf>,
        /// Write grid.png and the jumped frame into this directory.
        #[arg(long)]
        show: Option<PathBuf>,
        /// Reuse one decoder handle for every pass.
        #[arg(long)]
        shared_handle: bool,
    },

    /// Print video metadata.
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        after_help = "Examples:\n  vidinspect metadata input.mp4\n  vidinspect metadata input.mp4 --json"
    )]
    Metadata {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check metadata for suspicious values.
    #[command(about = "Validate video metadata")]
    Validate {
        /// Input video path.
        input: PathBuf,
    },

    /// Generate shell completions.
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<DecoderLogLevel> {
    DecoderLogLevel::parse(value)
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(global.verbose)),
    )
    .format_timestamp(None)
    .init();

    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        vidinspect::set_decoder_log_level(parsed);
    }

    Ok(())
}

/// Drives an indicatif bar from grid-pass progress.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        bar.set_message("sampling");
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Inspect {
            input,
            out,
            every,
            max_frames,
            jump_to,
            columns,
            thumbnail_width,
            font,
            show,
            shared_handle,
        } => {
            if every == 0 {
                return Err("--every must be greater than 0".into());
            }
            ensure_writable_path(&out, cli.global.overwrite)?;

            let mut options = InspectOptions::new()
                .with_stride(every)
                .with_max_frames(max_frames)
                .with_jump_target(jump_to)
                .with_output_path(&out)
                .with_grid_columns(columns)
                .with_thumbnail_width(thumbnail_width)
                .with_shared_handle(shared_handle);
            if let Some(font) = &font {
                options = options.with_title_font(font);
            }

            let progress = if cli.global.progress {
                let progress = Arc::new(TerminalProgress::new()?);
                options = options
                    .with_progress(progress.clone())
                    .with_progress_interval(10);
                Some(progress)
            } else {
                None
            };

            let mut display: Box<dyn FrameDisplay> = match &show {
                Some(directory) => Box::new(DirectoryDisplay::new(directory)?),
                None => Box::new(HeadlessDisplay),
            };

            let report = Inspector::new(options).run(&input, display.as_mut())?;

            if let Some(progress) = progress {
                progress.bar.finish_with_message("done");
            }

            let jumped = report.jumped_frame_info;
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Sampled {} frame(s); frame {} {}",
                    report.frame_info.len(),
                    jumped.frame,
                    if jumped.displayed {
                        "displayed"
                    } else {
                        "not displayed"
                    },
                )
                .green()
            );
            println!("Report written to {}", out.display());
            if let Some(directory) = show {
                println!("Renders written to {}", directory.display());
            }
        }
        Commands::Metadata { input, json } => {
            let metadata = VideoSource::open(&input)?.metadata();
            if json {
                let payload = json!({
                    "frame_count": metadata.frame_count,
                    "height": metadata.height,
                    "width": metadata.width,
                    "fps": metadata.fps,
                    "duration_seconds": metadata.duration_seconds(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Video: {}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.fps);
                println!("Frames: {}", metadata.frame_count);
                println!("Duration: {:.2}s", metadata.duration_seconds());
            }
        }
        Commands::Validate { input } => {
            let metadata = VideoSource::open(&input)?.metadata();
            let report = validate_metadata(&metadata);
            print!("{report}");
            if !report.is_valid() {
                return Err(format!("{} validation error(s)", report.errors.len()).into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "vidinspect", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, default_log_filter, ensure_writable_path, parse_log_level};
    use clap::Parser;
    use vidinspect::DecoderLogLevel;

    #[test]
    fn parse_log_level_aliases() {
        assert_eq!(parse_log_level("warn"), Some(DecoderLogLevel::Warning));
        assert_eq!(parse_log_level("QUIET"), Some(DecoderLogLevel::Quiet));
        assert!(parse_log_level("chatty").is_none());
    }

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_log_filter(false), "info");
        assert_eq!(default_log_filter(true), "debug");
    }

    #[test]
    fn inspect_defaults() {
        let cli = Cli::try_parse_from(["vidinspect", "inspect", "input.mp4"]).unwrap();
        let Commands::Inspect {
            out,
            every,
            max_frames,
            jump_to,
            columns,
            shared_handle,
            ..
        } = cli.command
        else {
            panic!("expected inspect");
        };
        assert_eq!(out.to_str(), Some("output.json"));
        assert_eq!(every, 10);
        assert_eq!(max_frames, 100);
        assert_eq!(jump_to, 900);
        assert_eq!(columns, 10);
        assert!(!shared_handle);
    }

    #[test]
    fn existing_output_needs_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_writable_path(file.path(), false).is_err());
        assert!(ensure_writable_path(file.path(), true).is_ok());
        assert!(ensure_writable_path(&file.path().with_extension("missing"), false).is_ok());
    }
}
