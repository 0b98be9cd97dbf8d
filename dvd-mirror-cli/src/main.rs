//! dvd-mirror CLI
//!
//! Command-line interface for backing up DVD-Video discs into VIDEO_TS folders.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use dvd_mirror_lib::{MirrorMode, Settings};

use cli_types::{Cli, Commands, ConfigAction, chapter_span};
use commands::RunContext;
use error::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.globals.verbose, cli.globals.quiet);

    if let Err(e) = run(cli) {
        eprintln!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mode = match cli.command {
        Commands::Config { action } => {
            return match action {
                ConfigAction::Path => {
                    commands::config::run_config_path();
                    Ok(())
                }
                ConfigAction::Show => commands::config::run_config_show(),
            };
        }
        Commands::Info { json } => {
            let ctx = RunContext::resolve(&cli.globals, &Settings::load()?)?;
            return commands::info::run_info(&ctx, json);
        }
        Commands::Mirror => MirrorMode::Full,
        Commands::TitleSet { title_set } => MirrorMode::TitleSet(title_set),
        Commands::Feature => MirrorMode::MainFeature,
        Commands::Title { title } => MirrorMode::Title(title),
        Commands::Chapters { title, start, end } => {
            let (start, end) = chapter_span(start, end);
            MirrorMode::Chapters { title, start, end }
        }
    };

    let ctx = RunContext::resolve(&cli.globals, &Settings::load()?)?;
    commands::mirror::run_mirror_mode(&ctx, mode)
}
