use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvd_mirror_lib::{
    CopyProgress, LOGICAL_BLOCK_SIZE, MirrorMode, MirrorOptions, resolve_title_name, run_mirror,
};

use super::{RunContext, format_size};
use crate::error::CliError;
use crate::progress::CopyProgressBar;

/// Run one mirror mode and report the result.
pub(crate) fn run_mirror_mode(ctx: &RunContext, mode: MirrorMode) -> Result<(), CliError> {
    let name = resolve_title_name(ctx.name.as_deref(), &ctx.device)?;
    let disc = ctx.open_disc()?;
    let options = MirrorOptions::new(ctx.output_dir.clone(), name)
        .preferred_aspect(ctx.aspect)
        .batch_blocks(ctx.batch_blocks);

    log::info!(
        "{} {}",
        "Backing up".if_supports_color(Stdout, |t| t.bold()),
        ctx.input.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let bar = CopyProgressBar::new(ctx.quiet);
    let progress = |event: CopyProgress| bar.handle(event);
    let summary = match run_mirror(&disc, mode, &options, &progress) {
        Ok(summary) => summary,
        Err(e) => {
            bar.abandon();
            return Err(e.into());
        }
    };

    log::info!(
        "{} Wrote {} file{} ({}) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.files_written,
        if summary.files_written == 1 { "" } else { "s" },
        format_size(summary.blocks_copied * LOGICAL_BLOCK_SIZE),
        summary
            .target_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
