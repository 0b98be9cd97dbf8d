//! Progress bar for copy operations.
//!
//! One bar is reused for every file of a run: each file resets its length
//! and message, and title-set headers are printed above it.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvd_mirror_lib::{CopyProgress, LOGICAL_BLOCK_SIZE};

pub(crate) struct CopyProgressBar {
    pb: ProgressBar,
}

impl CopyProgressBar {
    /// Create a progress bar. When `quiet` is true, nothing is drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new(0);
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} {msg:14} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .expect("static pattern")
            .progress_chars("=> ")
            .tick_chars("/-\\|"),
        );
        Self { pb }
    }

    /// Apply one progress event.
    pub(crate) fn handle(&self, event: CopyProgress) {
        match event {
            CopyProgress::TitleSetStarted { title_set } => {
                let label = if title_set == 0 {
                    "Video manager".to_string()
                } else {
                    format!("Title set {title_set}")
                };
                self.pb.suspend(|| {
                    log::info!("{}", label.if_supports_color(Stdout, |t| t.bold()));
                });
            }
            CopyProgress::FileStarted { path, total_blocks } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.pb.reset();
                self.pb.set_length(total_blocks * LOGICAL_BLOCK_SIZE);
                self.pb.set_message(name);
                self.pb.enable_steady_tick(Duration::from_millis(100));
            }
            CopyProgress::BlocksWritten { blocks } => {
                self.pb.inc(blocks * LOGICAL_BLOCK_SIZE);
            }
            CopyProgress::FileFinished { path } => {
                self.pb.disable_steady_tick();
                self.pb.suspend(|| {
                    log::info!(
                        "  {} {}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        path.display()
                    );
                });
            }
            CopyProgress::Done => {
                self.pb.finish_and_clear();
            }
        }
    }

    /// Clear the bar after a failed run.
    pub(crate) fn abandon(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}
