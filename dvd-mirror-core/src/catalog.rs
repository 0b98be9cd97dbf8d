//! Per-run catalogs of a disc's file layout and titles.
//!
//! Both catalogs are built once per invocation and are read-only afterwards.

use std::ops::Range;

use serde::Serialize;

use crate::disc::LOGICAL_BLOCK_SIZE;
use crate::error::MirrorError;
use crate::nav::AspectRatio;

/// Maximum number of title VOB files (`VTS_nn_1.VOB` .. `VTS_nn_9.VOB`) per title set.
pub const MAX_TITLE_VOBS: usize = 9;

/// Convert a byte size to a block count, rejecting sizes that are not a
/// whole number of logical blocks.
pub fn size_in_blocks(what: &str, title_set: u8, size: u64) -> Result<u64, MirrorError> {
    if size % LOGICAL_BLOCK_SIZE != 0 {
        return Err(MirrorError::invalid_size(what, title_set, size));
    }
    Ok(size / LOGICAL_BLOCK_SIZE)
}

/// File sizes of one domain. A size of 0 means the file is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleSetLayout {
    /// Size of the IFO file in bytes
    pub ifo_size: u64,
    /// Size of the menu VOB in bytes
    pub menu_size: u64,
    /// Size of the BUP file in bytes
    pub bup_size: u64,
    /// Sizes of `VTS_nn_1.VOB` onwards, stopping at the first missing file
    pub vob_sizes: Vec<u64>,
}

impl TitleSetLayout {
    pub fn vob_count(&self) -> usize {
        self.vob_sizes.len()
    }

    /// Sum of all title VOB sizes in bytes.
    pub fn total_vob_bytes(&self) -> u64 {
        self.vob_sizes.iter().sum()
    }

    /// Size of title VOB `vob` (1-based).
    pub fn vob_size(&self, vob: usize) -> Option<u64> {
        vob.checked_sub(1).and_then(|i| self.vob_sizes.get(i)).copied()
    }

    /// Block span of each title VOB within the title-VOB stream.
    ///
    /// Spans are contiguous and in file order: VOB 1 starts at block 0 and
    /// each following VOB starts where the previous one ends. Every size must
    /// be a multiple of the logical block size.
    pub fn vob_block_spans(&self, title_set: u8) -> Result<Vec<Range<u64>>, MirrorError> {
        let mut spans = Vec::with_capacity(self.vob_sizes.len());
        let mut offset = 0u64;
        for (i, &size) in self.vob_sizes.iter().enumerate() {
            let blocks = size_in_blocks(&format!("Title VOB {}", i + 1), title_set, size)?;
            spans.push(offset..offset + blocks);
            offset += blocks;
        }
        Ok(spans)
    }
}

/// File layout of the whole disc. Index 0 is the video manager, indices
/// 1..=N are the title sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileLayoutCatalog {
    pub title_sets: Vec<TitleSetLayout>,
}

impl FileLayoutCatalog {
    pub fn new(title_sets: Vec<TitleSetLayout>) -> Self {
        Self { title_sets }
    }

    /// Number of title sets, not counting the video manager.
    pub fn title_set_count(&self) -> u8 {
        self.title_sets.len().saturating_sub(1).min(u8::MAX as usize) as u8
    }

    pub fn get(&self, title_set: u8) -> Option<&TitleSetLayout> {
        self.title_sets.get(title_set as usize)
    }

    /// Layout of a title set, or an error naming the valid range.
    pub fn require(&self, title_set: u8) -> Result<&TitleSetLayout, MirrorError> {
        self.get(title_set).ok_or(MirrorError::InvalidTitleSet {
            requested: title_set,
            available: self.title_set_count(),
        })
    }
}

/// Attribute summary of one title set, shared by all of its titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSetSummary {
    /// Title set index (1-based)
    pub title_set: u8,
    pub aspect_ratio: AspectRatio,
    pub audio_tracks: u8,
    /// Highest channel count over the audio tracks
    pub audio_channels: u8,
    pub subpictures: u8,
}

/// One title as reported by the disc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRecord {
    /// Owning title set (1-based)
    pub title_set: u8,
    /// Title index inside the owning title set (1-based)
    pub vts_title: u8,
    pub chapters: u16,
    pub angles: u8,
    pub audio_tracks: u8,
    /// Highest channel count over the audio tracks
    pub audio_channels: u8,
    pub subpictures: u8,
    pub aspect_ratio: AspectRatio,
}

/// All titles of the disc. Title number `n` is `titles[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleCatalog {
    pub titles: Vec<TitleRecord>,
    /// One entry per title set, in title-set order
    pub title_sets: Vec<TitleSetSummary>,
    /// Title set picked as the main feature, when the disc has any
    pub main_title_set: Option<u8>,
}

impl TitleCatalog {
    pub fn title_count(&self) -> u16 {
        self.titles.len().min(u16::MAX as usize) as u16
    }

    /// Look up a title by its 1-based number.
    pub fn title(&self, number: u16) -> Result<&TitleRecord, MirrorError> {
        (number as usize)
            .checked_sub(1)
            .and_then(|i| self.titles.get(i))
            .ok_or(MirrorError::InvalidTitle {
                requested: number,
                available: self.title_count(),
            })
    }

    pub fn summary(&self, title_set: u8) -> Option<&TitleSetSummary> {
        self.title_sets.iter().find(|s| s.title_set == title_set)
    }

    /// Titles of one title set, paired with their 1-based title numbers.
    pub fn titles_in_set(&self, title_set: u8) -> impl Iterator<Item = (u16, &TitleRecord)> {
        self.titles
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.title_set == title_set)
            .map(|(i, t)| (i as u16 + 1, t))
    }

    /// Highest chapter count over the titles of a title set.
    pub fn max_chapters_in_set(&self, title_set: u8) -> u16 {
        self.titles_in_set(title_set)
            .map(|(_, t)| t.chapters)
            .max()
            .unwrap_or(0)
    }

    /// The title with the most chapters in a title set. The lowest title
    /// number wins a tie.
    pub fn longest_title_in_set(&self, title_set: u8) -> Option<(u16, &TitleRecord)> {
        let mut best: Option<(u16, &TitleRecord)> = None;
        for (number, title) in self.titles_in_set(title_set) {
            if best.is_none_or(|(_, b)| title.chapters > b.chapters) {
                best = Some((number, title));
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
