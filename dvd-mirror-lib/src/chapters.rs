//! Chapter range to sector range resolution.

use dvd_mirror_core::{DvdReader, MirrorError, ProgramChain, TitleRecord};

/// A half-open span of logical blocks in a title set's title-VOB stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRange {
    pub start: u64,
    pub end: u64,
}

impl SectorRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// From a cell's inclusive first/last sector pair.
    pub fn from_inclusive(first: u32, last: u32) -> Self {
        Self {
            start: u64::from(first),
            end: u64::from(last) + 1,
        }
    }

    pub fn blocks(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks() == 0
    }
}

/// The sector ranges covering a chapter span of one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub title_set: u8,
    /// Sorted by start, non-overlapping, non-empty
    pub ranges: Vec<SectorRange>,
}

impl CellRange {
    pub fn total_blocks(&self) -> u64 {
        self.ranges.iter().map(SectorRange::blocks).sum()
    }
}

/// Sort ranges by start (then end) and cut each range's end back to the next range's
/// start where they overlap. Ranges left empty are dropped.
pub fn align_end_sectors(ranges: &mut Vec<SectorRange>) {
    ranges.sort_by_key(|r| (r.start, r.end));
    for i in 1..ranges.len() {
        let next_start = ranges[i].start;
        let prev = &mut ranges[i - 1];
        if prev.end > next_start {
            prev.end = next_start;
        }
    }
    ranges.retain(|r| !r.is_empty());
}

/// Resolve chapters `start..=end` of `title` into sector ranges.
///
/// Out-of-range chapter numbers are clamped into `1..=chapters`.
/// All chapters are looked up in the program chain of the start chapter.
pub fn resolve_chapter_range(
    disc: &dyn DvdReader,
    title: &TitleRecord,
    start: u16,
    end: u16,
) -> Result<CellRange, MirrorError> {
    let chapters = title.chapters;
    if chapters == 0 {
        return Err(MirrorError::invalid_chapter(format!(
            "title {} of title set {} has no chapters",
            title.vts_title, title.title_set
        )));
    }
    if start > end {
        return Err(MirrorError::invalid_chapter(format!(
            "start chapter {start} is after end chapter {end}"
        )));
    }

    let start = clamp_chapter(start, chapters, "start");
    let end = clamp_chapter(end, chapters, "end");

    let info = disc.title_set_info(title.title_set)?;
    let parts = info
        .parts_of_title
        .get(usize::from(title.vts_title).wrapping_sub(1))
        .ok_or_else(|| {
            MirrorError::malformed(format!(
                "title set {} has no chapter table for title {}",
                title.title_set, title.vts_title
            ))
        })?;
    let part = |chapter: u16| {
        parts.get(usize::from(chapter) - 1).ok_or_else(|| {
            MirrorError::malformed(format!(
                "title {} of title set {} has no entry for chapter {chapter}",
                title.vts_title, title.title_set
            ))
        })
    };

    let first = part(start)?;
    let pgc = info
        .program_chains
        .get(usize::from(first.pgcn).wrapping_sub(1))
        .ok_or_else(|| {
            MirrorError::malformed(format!(
                "title set {} has no program chain {}",
                title.title_set, first.pgcn
            ))
        })?;

    let start_cell = program_entry_cell(pgc, first.pgn, first.pgcn)?;
    let end_cell = if end < chapters {
        let next = part(end + 1)?;
        program_entry_cell(pgc, next.pgn, first.pgcn)?.saturating_sub(1)
    } else {
        pgc.cells.len()
    };
    log::debug!(
        "Chapters {start}-{end} of title set {} title {}: PGC {}, cells {start_cell}-{end_cell}",
        title.title_set,
        title.vts_title,
        first.pgcn
    );

    if end_cell < start_cell || end_cell > pgc.cells.len() {
        return Err(MirrorError::malformed(format!(
            "program chain {} cannot hold cells {start_cell}-{end_cell}",
            first.pgcn
        )));
    }

    let mut ranges: Vec<SectorRange> = pgc.cells[start_cell - 1..end_cell]
        .iter()
        .map(|c| SectorRange::from_inclusive(c.first_sector, c.last_sector))
        .collect();
    align_end_sectors(&mut ranges);

    Ok(CellRange {
        title_set: title.title_set,
        ranges,
    })
}

fn clamp_chapter(chapter: u16, chapters: u16, which: &str) -> u16 {
    if chapter == 0 {
        log::warn!("Chapters are numbered from 1, raising {which} chapter 0 to 1");
        1
    } else if chapter > chapters {
        log::warn!(
            "The title has only {chapters} chapters, truncating {which} chapter {chapter} to {chapters}"
        );
        chapters
    } else {
        chapter
    }
}

/// 1-based entry cell of program `pgn`.
fn program_entry_cell(pgc: &ProgramChain, pgn: u16, pgcn: u16) -> Result<usize, MirrorError> {
    let cell = pgc
        .program_map
        .get(usize::from(pgn).wrapping_sub(1))
        .copied()
        .ok_or_else(|| {
            MirrorError::malformed(format!("program chain {pgcn} has no program {pgn}"))
        })?;
    if cell == 0 {
        return Err(MirrorError::malformed(format!(
            "program {pgn} of program chain {pgcn} starts at cell 0"
        )));
    }
    Ok(usize::from(cell))
}

#[cfg(test)]
#[path = "tests/chapters_tests.rs"]
mod tests;
