//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use dvd_mirror_lib::AspectRatio;

#[derive(Parser)]
#[command(name = "dvd-mirror")]
#[command(about = "Back up DVD-Video discs into VIDEO_TS folders", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Clone)]
pub(crate) struct GlobalArgs {
    /// DVD-Video folder to read (the VIDEO_TS directory or its parent)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Directory the backup is written into (default: settings file, then current directory)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Name of the backup directory (default: the disc's volume label)
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Disc device or image to read the volume label from (default: the input path)
    #[arg(long, global = true)]
    pub device: Option<PathBuf>,

    /// Preferred aspect ratio on dual-format discs: 16:9 or 4:3
    #[arg(short, long, global = true)]
    pub aspect: Option<AspectRatio>,

    /// Logical blocks moved per read/write batch
    #[arg(long, global = true, value_parser = parse_batch_blocks)]
    pub batch_blocks: Option<usize>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Mirror the whole disc: the video manager and every title set
    Mirror,

    /// Mirror one title set (0 is the video manager)
    TitleSet {
        /// Title set number
        #[arg(value_parser = clap::value_parser!(u8).range(0..=99))]
        title_set: u8,
    },

    /// Mirror the title set that most likely holds the main feature
    Feature,

    /// Copy every chapter of one title into title VOBs
    Title {
        /// Title number
        #[arg(value_parser = clap::value_parser!(u16).range(1..=99))]
        title: u16,
    },

    /// Copy a span of chapters of one title into title VOBs
    #[command(group(ArgGroup::new("span").args(["start", "end"]).multiple(true).required(true)))]
    Chapters {
        /// Title number (default: the longest title of the main feature)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=99))]
        title: Option<u16>,

        /// First chapter to copy (default: 1)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=99))]
        start: Option<u16>,

        /// Last chapter to copy (default: the title's last chapter)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=99))]
        end: Option<u16>,
    },

    /// Show the disc's files, titles and main feature
    Info {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the settings file path
    Path,

    /// Show the settings file and the defaults in effect
    Show,
}

/// Resolve `--start` / `--end` into an inclusive span. A missing end runs to
/// the last chapter, which the resolver clamps from 99.
pub(crate) fn chapter_span(start: Option<u16>, end: Option<u16>) -> (u16, u16) {
    (start.unwrap_or(1), end.unwrap_or(99))
}

fn parse_batch_blocks(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "dvd-mirror", "title-set", "3", "-i", "/media/disc", "--aspect", "4:3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::TitleSet { title_set: 3 }));
        assert_eq!(cli.globals.aspect, Some(AspectRatio::Standard));
        assert_eq!(cli.globals.input, Some(PathBuf::from("/media/disc")));
    }

    fn span_of(args: &[&str]) -> (Option<u16>, (u16, u16)) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Chapters { title, start, end } => (title, chapter_span(start, end)),
            _ => panic!("not a chapters command"),
        }
    }

    #[test]
    fn chapters_start_alone_runs_to_the_last_chapter() {
        let (title, span) = span_of(&["dvd-mirror", "chapters", "-t", "2", "-s", "4"]);
        assert_eq!(title, Some(2));
        assert_eq!(span, (4, 99));
    }

    #[test]
    fn chapters_end_alone_starts_at_the_first_chapter() {
        let (title, span) = span_of(&["dvd-mirror", "chapters", "--end", "3"]);
        assert_eq!(title, None);
        assert_eq!(span, (1, 3));
    }

    #[test]
    fn chapters_need_a_start_or_an_end() {
        assert!(Cli::try_parse_from(["dvd-mirror", "chapters", "-t", "1"]).is_err());
        let (_, span) = span_of(&["dvd-mirror", "chapters", "-s", "2", "-e", "5"]);
        assert_eq!(span, (2, 5));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(Cli::try_parse_from(["dvd-mirror", "title-set", "100"]).is_err());
        assert!(Cli::try_parse_from(["dvd-mirror", "title", "0"]).is_err());
        assert!(Cli::try_parse_from(["dvd-mirror", "chapters", "-s", "0"]).is_err());
        assert!(Cli::try_parse_from(["dvd-mirror", "mirror", "--batch-blocks", "0"]).is_err());
        assert!(Cli::try_parse_from(["dvd-mirror", "mirror", "--aspect", "21:9"]).is_err());
    }
}
