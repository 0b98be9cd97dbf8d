use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvd_mirror_lib::info::DiscReport;
use dvd_mirror_lib::title_name::{probe_volume_label, validate_label};

use super::{RunContext, format_size};
use crate::error::CliError;

/// Print the structure of the disc.
pub(crate) fn run_info(ctx: &RunContext, json: bool) -> Result<(), CliError> {
    let disc = ctx.open_disc()?;
    let title_name = match &ctx.name {
        Some(name) => Some(name.clone()),
        None => match probe_volume_label(&ctx.device).and_then(validate_label) {
            Ok(label) => Some(label),
            Err(e) => {
                log::debug!("No title name: {e}");
                None
            }
        },
    };
    let report = DiscReport::build(&disc, ctx.aspect, title_name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DiscReport) {
    let heading = |text: &str| {
        log::info!("{}", text.if_supports_color(Stdout, |t| t.bold()));
    };

    if let Some(name) = &report.title_name {
        log::info!(
            "Disc title: {}",
            name.if_supports_color(Stdout, |t| t.cyan())
        );
        log::info!("");
    }

    heading("File structure");
    for file in &report.files {
        log::info!(
            "  {:<14} {}",
            file.name,
            format!("{:>10}", format_size(file.size)).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    heading("Main feature");
    match &report.main_feature {
        Some(main) => {
            log::info!(
                "  Title set {} {}",
                main.title_set.if_supports_color(Stdout, |t| t.green()),
                format!("({})", main.rule.description()).if_supports_color(Stdout, |t| t.dimmed()),
            );
            log::info!("  Aspect ratio:   {}", main.aspect_ratio.label());
            log::info!("  Angles:         {}", main.max_angles);
            log::info!("  Audio tracks:   {}", main.audio_tracks);
            log::info!("  Subpictures:    {}", main.subpictures);
            log::info!("  Max chapters:   {}", main.max_chapters);
            log::info!("  Max channels:   {}", main.max_audio_channels);
        }
        None => log::info!(
            "  {}",
            "no title sets on this disc".if_supports_color(Stdout, |t| t.yellow())
        ),
    }

    for set in &report.title_sets {
        log::info!("");
        heading(&format!("Title set {}", set.title_set));
        log::info!(
            "  {} video, {} audio track{}, {} subpicture{}, {} of title VOBs",
            set.aspect_ratio.label(),
            set.audio_tracks,
            if set.audio_tracks == 1 { "" } else { "s" },
            set.subpictures,
            if set.subpictures == 1 { "" } else { "s" },
            format_size(set.size),
        );
        for title in &set.titles {
            log::info!(
                "  {} {:>2}: {} chapter{}, {} angle{}, {} audio channels",
                "Title".if_supports_color(Stdout, |t| t.cyan()),
                title.number,
                title.chapters,
                if title.chapters == 1 { "" } else { "s" },
                title.angles,
                if title.angles == 1 { "" } else { "s" },
                title.audio_channels,
            );
        }
    }
}
