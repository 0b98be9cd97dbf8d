//! The mirror modes and their orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use dvd_mirror_core::naming::VIDEO_TS_DIR;
use dvd_mirror_core::{
    AspectRatio, CopyProgress, DEFAULT_BATCH_BLOCKS, DvdReader, MirrorError, TitleCatalog,
};

use crate::chapters::{CellRange, resolve_chapter_range};
use crate::copier::Copier;
use crate::metadata::{build_file_layout_catalog, build_title_catalog};

/// What to copy from the disc. Exactly one mode runs per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorMode {
    /// The video manager and every title set
    Full,
    /// One title set; 0 is the video manager
    TitleSet(u8),
    /// The title set picked by the main-feature heuristic
    MainFeature,
    /// Every chapter of one title (1-based)
    Title(u16),
    /// A chapter span of one title. Without a title, the longest title of
    /// the main feature is used.
    Chapters {
        title: Option<u16>,
        start: u16,
        end: u16,
    },
}

/// Options for a mirror run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Directory the `<title name>/VIDEO_TS` tree is created in
    pub output_dir: PathBuf,
    pub title_name: String,
    /// Aspect ratio preferred when a disc carries a film in two formats
    pub preferred_aspect: AspectRatio,
    /// Logical blocks moved per read/write batch
    pub batch_blocks: usize,
}

impl MirrorOptions {
    pub fn new(output_dir: impl Into<PathBuf>, title_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            title_name: title_name.into(),
            preferred_aspect: AspectRatio::Widescreen,
            batch_blocks: DEFAULT_BATCH_BLOCKS,
        }
    }

    pub fn preferred_aspect(mut self, aspect: AspectRatio) -> Self {
        self.preferred_aspect = aspect;
        self
    }

    pub fn batch_blocks(mut self, blocks: usize) -> Self {
        self.batch_blocks = blocks;
        self
    }
}

/// Summary of a completed mirror run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MirrorSummary {
    /// The `VIDEO_TS` directory that was written
    pub target_dir: PathBuf,
    /// Title sets that were copied (0 is the video manager)
    pub title_sets: Vec<u8>,
    pub files_written: usize,
    pub blocks_copied: u64,
}

/// Create `<output_dir>/<title_name>/VIDEO_TS`, or check that it is usable.
pub fn prepare_target(output_dir: &Path, title_name: &str) -> Result<PathBuf, MirrorError> {
    let title_dir = output_dir.join(title_name);
    let target = title_dir.join(VIDEO_TS_DIR);
    for dir in [output_dir, title_dir.as_path(), target.as_path()] {
        if dir.exists() && !dir.is_dir() {
            return Err(MirrorError::config(format!(
                "{} exists and is not a directory",
                dir.display()
            )));
        }
    }
    fs::create_dir_all(&target)?;
    Ok(target)
}

/// Run one mirror mode against a disc.
pub fn run_mirror(
    disc: &dyn DvdReader,
    mode: MirrorMode,
    options: &MirrorOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<MirrorSummary, MirrorError> {
    let layout = build_file_layout_catalog(disc)?;
    let title_set_count = layout.title_set_count();

    // Resolve what to copy before touching the target
    let plan = match mode {
        MirrorMode::Full => Plan::TitleSets((0..=title_set_count).collect()),
        MirrorMode::TitleSet(n) => {
            if n > title_set_count {
                return Err(MirrorError::InvalidTitleSet {
                    requested: n,
                    available: title_set_count,
                });
            }
            Plan::TitleSets(vec![n])
        }
        MirrorMode::MainFeature => {
            let titles = build_title_catalog(disc, &layout, options.preferred_aspect)?;
            let main = titles.main_title_set.ok_or(MirrorError::NoTitleSets)?;
            log::info!("Main feature is title set {main}");
            Plan::TitleSets(vec![main])
        }
        MirrorMode::Title(number) => {
            let titles = build_title_catalog(disc, &layout, options.preferred_aspect)?;
            let chapters = titles.title(number)?.chapters;
            chapter_plan(disc, &titles, number, 1, chapters)?
        }
        MirrorMode::Chapters { title, start, end } => {
            let titles = build_title_catalog(disc, &layout, options.preferred_aspect)?;
            let number = match title {
                Some(number) => number,
                None => main_feature_title(&titles)?,
            };
            chapter_plan(disc, &titles, number, start, end)?
        }
    };

    let target = prepare_target(&options.output_dir, &options.title_name)?;
    log::info!("Mirroring into {}", target.display());
    let mut copier = Copier::new(disc, &layout, target.clone(), options.batch_blocks, progress);
    let mut summary = MirrorSummary {
        target_dir: target,
        ..Default::default()
    };

    match plan {
        Plan::TitleSets(sets) => {
            for title_set in sets {
                progress(CopyProgress::TitleSetStarted { title_set });
                mirror_title_set(&mut copier, title_set)?;
                summary.title_sets.push(title_set);
            }
        }
        Plan::Cells(cells) => {
            progress(CopyProgress::TitleSetStarted {
                title_set: cells.title_set,
            });
            copier.copy_cells(&cells)?;
            summary.title_sets.push(cells.title_set);
        }
    }

    summary.files_written = copier.files_written();
    summary.blocks_copied = copier.blocks_copied();
    progress(CopyProgress::Done);
    Ok(summary)
}

enum Plan {
    TitleSets(Vec<u8>),
    Cells(CellRange),
}

fn chapter_plan(
    disc: &dyn DvdReader,
    titles: &TitleCatalog,
    number: u16,
    start: u16,
    end: u16,
) -> Result<Plan, MirrorError> {
    let record = titles.title(number)?;
    log::info!(
        "Copying chapters {start}-{end} of title {number} (title set {})",
        record.title_set
    );
    Ok(Plan::Cells(resolve_chapter_range(disc, record, start, end)?))
}

/// Copy a whole domain: IFO and BUP, the menu, then every title VOB.
fn mirror_title_set(copier: &mut Copier<'_>, title_set: u8) -> Result<(), MirrorError> {
    copier.copy_info_and_backup(title_set)?;
    copier.copy_menu(title_set)?;
    if title_set > 0 {
        copier.copy_whole_title_set_vobs(title_set)?;
    }
    Ok(())
}

/// The title with the most chapters in the main-feature title set.
fn main_feature_title(titles: &TitleCatalog) -> Result<u16, MirrorError> {
    let main = titles.main_title_set.ok_or(MirrorError::NoTitleSets)?;
    let (number, _) = titles.longest_title_in_set(main).ok_or_else(|| {
        MirrorError::malformed(format!("main feature title set {main} has no titles"))
    })?;
    log::warn!(
        "No title given for the chapter copy, using title {number} of the main feature (title set {main}); pass a title to be sure"
    );
    Ok(number)
}

#[cfg(test)]
#[path = "tests/mirror_tests.rs"]
mod tests;
