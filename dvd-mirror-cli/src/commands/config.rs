use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvd_mirror_lib::settings::{load_settings_string, settings_path};
use dvd_mirror_lib::{DEFAULT_BATCH_BLOCKS, Settings};

use crate::error::CliError;

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings_path().display());
}

/// Show the settings file and the defaults it yields.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "dvd-mirror Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let settings = Settings::load_from(&path)?;
    let aspect = settings.preferred_aspect()?;

    let fields = [
        (
            "output_dir",
            settings
                .defaults
                .output_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            ".".to_string(),
        ),
        (
            "aspect",
            aspect.map(|a| a.label().to_string()),
            "16:9".to_string(),
        ),
        (
            "batch_blocks",
            settings.defaults.batch_blocks.map(|b| b.to_string()),
            DEFAULT_BATCH_BLOCKS.to_string(),
        ),
    ];
    for (name, value, fallback) in fields {
        let key = format!("{:<14}", format!("{name}:"));
        match value {
            Some(v) => log::info!("  {} {}", key.if_supports_color(Stdout, |t| t.cyan()), v),
            None => log::info!(
                "  {} {} {}",
                key.if_supports_color(Stdout, |t| t.cyan()),
                fallback,
                "(default)".if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }

    if let Some(contents) = load_settings_string() {
        log::info!("");
        log::info!("{}", "File contents".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
    Ok(())
}
