pub(crate) mod config;
pub(crate) mod info;
pub(crate) mod mirror;

use std::path::PathBuf;

use dvd_mirror_lib::{AspectRatio, DEFAULT_BATCH_BLOCKS, Settings, VideoTsFolder};

use crate::cli_types::GlobalArgs;
use crate::error::CliError;

/// Global options merged with the settings file. Flags win over settings.
pub(crate) struct RunContext {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub name: Option<String>,
    /// Where the volume label is read from
    pub device: PathBuf,
    pub aspect: AspectRatio,
    pub batch_blocks: usize,
    pub quiet: bool,
}

impl RunContext {
    pub(crate) fn resolve(args: &GlobalArgs, settings: &Settings) -> Result<Self, CliError> {
        let input = args
            .input
            .clone()
            .ok_or_else(|| CliError::config("no disc given, pass --input <VIDEO_TS folder>"))?;
        let output_dir = args
            .output
            .clone()
            .or_else(|| settings.defaults.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let aspect = match args.aspect {
            Some(aspect) => aspect,
            None => settings.preferred_aspect()?.unwrap_or_default(),
        };
        let batch_blocks = args
            .batch_blocks
            .or(settings.defaults.batch_blocks)
            .unwrap_or(DEFAULT_BATCH_BLOCKS);
        let device = args.device.clone().unwrap_or_else(|| input.clone());

        Ok(Self {
            input,
            output_dir,
            name: args.name.clone(),
            device,
            aspect,
            batch_blocks,
            quiet: args.quiet,
        })
    }

    pub(crate) fn open_disc(&self) -> Result<VideoTsFolder, CliError> {
        let disc = VideoTsFolder::open(&self.input)?;
        log::debug!("Reading {}", disc.root().display());
        Ok(disc)
    }
}

/// Format a byte count with one decimal (e.g., "4.2 GB", "512.0 KB").
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KB * KB * KB {
        format!("{:.1} GB", b / (KB * KB * KB))
    } else if b >= KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
