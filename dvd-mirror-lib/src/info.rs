//! Read-only disc information report.

use serde::Serialize;

use dvd_mirror_core::naming;
use dvd_mirror_core::{AspectRatio, DvdReader, FileLayoutCatalog, MirrorError, TitleCatalog};

use crate::feature::{AcceptRule, FeatureChoice, SizeTag};
use crate::metadata::{build_file_layout_catalog, build_title_catalog_with_choice};

/// A file of the disc and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

/// A title as listed under its title set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleEntry {
    /// Disc-wide title number (1-based)
    pub number: u16,
    pub vts_title: u8,
    pub chapters: u16,
    pub angles: u8,
    pub audio_channels: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSetReport {
    pub title_set: u8,
    pub aspect_ratio: AspectRatio,
    pub audio_tracks: u8,
    pub audio_channels: u8,
    pub subpictures: u8,
    /// Total size of the title VOBs in bytes
    pub size: u64,
    pub titles: Vec<TitleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainFeatureReport {
    pub title_set: u8,
    pub rule: AcceptRule,
    pub tag: SizeTag,
    pub score: u8,
    pub chapter_rank: usize,
    pub aspect_ratio: AspectRatio,
    pub audio_tracks: u8,
    pub subpictures: u8,
    /// Most chapters of any title in the title set
    pub max_chapters: u16,
    /// Most angles of any title in the title set
    pub max_angles: u8,
    pub max_audio_channels: u8,
}

/// Everything the `info` command shows.
#[derive(Debug, Clone, Serialize)]
pub struct DiscReport {
    /// Volume label, when one could be read
    pub title_name: Option<String>,
    /// Disc files in `VIDEO_TS` listing order
    pub files: Vec<FileEntry>,
    pub main_feature: Option<MainFeatureReport>,
    pub title_sets: Vec<TitleSetReport>,
}

impl DiscReport {
    /// Read the disc and assemble the report.
    pub fn build(
        disc: &dyn DvdReader,
        preferred_aspect: AspectRatio,
        title_name: Option<String>,
    ) -> Result<Self, MirrorError> {
        let layout = build_file_layout_catalog(disc)?;
        let (titles, choice) = build_title_catalog_with_choice(disc, &layout, preferred_aspect)?;
        Ok(Self::from_catalogs(&layout, &titles, choice, title_name))
    }

    pub fn from_catalogs(
        layout: &FileLayoutCatalog,
        titles: &TitleCatalog,
        choice: Option<FeatureChoice>,
        title_name: Option<String>,
    ) -> Self {
        let title_sets: Vec<TitleSetReport> = titles
            .title_sets
            .iter()
            .map(|s| TitleSetReport {
                title_set: s.title_set,
                aspect_ratio: s.aspect_ratio,
                audio_tracks: s.audio_tracks,
                audio_channels: s.audio_channels,
                subpictures: s.subpictures,
                size: layout.get(s.title_set).map_or(0, |l| l.total_vob_bytes()),
                titles: titles
                    .titles_in_set(s.title_set)
                    .map(|(number, t)| TitleEntry {
                        number,
                        vts_title: t.vts_title,
                        chapters: t.chapters,
                        angles: t.angles,
                        audio_channels: t.audio_channels,
                    })
                    .collect(),
            })
            .collect();

        let main_feature = choice.and_then(|c| {
            let set = title_sets.iter().find(|s| s.title_set == c.title_set)?;
            Some(MainFeatureReport {
                title_set: c.title_set,
                rule: c.rule,
                tag: c.tag,
                score: c.score,
                chapter_rank: c.chapter_rank,
                aspect_ratio: set.aspect_ratio,
                audio_tracks: set.audio_tracks,
                subpictures: set.subpictures,
                max_chapters: set.titles.iter().map(|t| t.chapters).max().unwrap_or(0),
                max_angles: set.titles.iter().map(|t| t.angles).max().unwrap_or(0),
                max_audio_channels: set.audio_channels,
            })
        });

        Self {
            title_name,
            files: list_files(layout),
            main_feature,
            title_sets,
        }
    }
}

/// Files in the order a `VIDEO_TS` listing shows them: per domain the IFO,
/// the menu VOB, the title VOBs, then the BUP. Absent menus are left out.
fn list_files(layout: &FileLayoutCatalog) -> Vec<FileEntry> {
    let mut files = Vec::new();
    for (index, domain) in layout.title_sets.iter().enumerate() {
        let title_set = index as u8;
        files.push(FileEntry {
            name: naming::info_file_name(title_set),
            size: domain.ifo_size,
        });
        if domain.menu_size != 0 {
            files.push(FileEntry {
                name: naming::menu_vob_name(title_set),
                size: domain.menu_size,
            });
        }
        for (k, &size) in domain.vob_sizes.iter().enumerate() {
            files.push(FileEntry {
                name: naming::title_vob_name(title_set, k + 1),
                size,
            });
        }
        files.push(FileEntry {
            name: naming::backup_file_name(title_set),
            size: domain.bup_size,
        });
    }
    files
}

#[cfg(test)]
#[path = "tests/info_tests.rs"]
mod tests;
