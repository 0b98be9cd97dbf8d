//! Building the per-run catalogs from a disc.

use dvd_mirror_core::naming::{self, disc_path};
use dvd_mirror_core::{
    AspectRatio, DvdReader, FileLayoutCatalog, MAX_TITLE_VOBS, MirrorError, TitleCatalog,
    TitleRecord, TitleSetLayout, TitleSetSummary,
};

use crate::feature::{FeatureChoice, choose_main_feature};

/// Probe the sizes of every domain file on the disc.
///
/// The IFO and BUP of the video manager and of every title set must be
/// present. Title VOBs are probed from `VTS_nn_1.VOB` up to the first
/// missing one.
pub fn build_file_layout_catalog(disc: &dyn DvdReader) -> Result<FileLayoutCatalog, MirrorError> {
    let vmg = disc.video_manager()?;
    let required = |name: String| {
        disc.file_size(&disc_path(&name))
            .ok_or_else(|| MirrorError::metadata_unavailable(format!("{name} is missing")))
    };

    let mut title_sets = Vec::with_capacity(usize::from(vmg.title_set_count) + 1);
    for title_set in 0..=vmg.title_set_count {
        let ifo_size = required(naming::info_file_name(title_set))?;
        let bup_size = required(naming::backup_file_name(title_set))?;
        let menu_size = disc
            .file_size(&disc_path(&naming::menu_vob_name(title_set)))
            .unwrap_or(0);

        if ifo_size != bup_size {
            log::warn!(
                "{} is {ifo_size} bytes but {} is {bup_size} bytes",
                naming::info_file_name(title_set),
                naming::backup_file_name(title_set)
            );
        }

        let vob_sizes: Vec<u64> = if title_set == 0 {
            Vec::new()
        } else {
            (1..=MAX_TITLE_VOBS)
                .map_while(|k| disc.file_size(&disc_path(&naming::title_vob_name(title_set, k))))
                .collect()
        };

        log::debug!(
            "Title set {title_set}: IFO {ifo_size}, BUP {bup_size}, menu {menu_size}, title VOBs {vob_sizes:?}"
        );
        title_sets.push(TitleSetLayout {
            ifo_size,
            menu_size,
            bup_size,
            vob_sizes,
        });
    }

    Ok(FileLayoutCatalog::new(title_sets))
}

/// Read every title's attributes and pick the main feature.
pub fn build_title_catalog(
    disc: &dyn DvdReader,
    layout: &FileLayoutCatalog,
    preferred_aspect: AspectRatio,
) -> Result<TitleCatalog, MirrorError> {
    build_title_catalog_with_choice(disc, layout, preferred_aspect).map(|(catalog, _)| catalog)
}

/// [`build_title_catalog`], also handing back how the main feature was chosen.
pub(crate) fn build_title_catalog_with_choice(
    disc: &dyn DvdReader,
    layout: &FileLayoutCatalog,
    preferred_aspect: AspectRatio,
) -> Result<(TitleCatalog, Option<FeatureChoice>), MirrorError> {
    let vmg = disc.video_manager()?;
    let title_set_count = layout.title_set_count();

    let mut title_sets = Vec::with_capacity(usize::from(title_set_count));
    for title_set in 1..=title_set_count {
        let attrs = vmg
            .title_set_attributes
            .get(usize::from(title_set) - 1)
            .ok_or_else(|| {
                MirrorError::metadata_unavailable(format!(
                    "the attribute table has no entry for title set {title_set}"
                ))
            })?;
        title_sets.push(TitleSetSummary {
            title_set,
            aspect_ratio: attrs.aspect_ratio,
            audio_tracks: attrs.audio_streams.len() as u8,
            audio_channels: attrs.max_audio_channels(),
            subpictures: attrs.subpicture_streams,
        });
    }

    let mut titles = Vec::with_capacity(vmg.titles.len());
    for (i, entry) in vmg.titles.iter().enumerate() {
        let summary = title_sets
            .iter()
            .find(|s| s.title_set == entry.title_set)
            .ok_or_else(|| {
                MirrorError::malformed(format!(
                    "title {} belongs to title set {}, but the disc has {title_set_count}",
                    i + 1,
                    entry.title_set
                ))
            })?;
        titles.push(TitleRecord {
            title_set: entry.title_set,
            vts_title: entry.vts_title,
            chapters: entry.chapters,
            angles: entry.angles,
            audio_tracks: summary.audio_tracks,
            audio_channels: summary.audio_channels,
            subpictures: summary.subpictures,
            aspect_ratio: summary.aspect_ratio,
        });
    }

    let mut catalog = TitleCatalog {
        titles,
        title_sets,
        main_title_set: None,
    };
    let choice = choose_main_feature(&catalog, layout, preferred_aspect);
    if let Some(choice) = &choice {
        log::debug!(
            "Main feature is title set {} ({}, score {}, chapter rank {})",
            choice.title_set,
            choice.rule.description(),
            choice.score,
            choice.chapter_rank
        );
        catalog.main_title_set = Some(choice.title_set);
    }
    Ok((catalog, choice))
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod tests;
