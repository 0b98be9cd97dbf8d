use std::cell::RefCell;

use super::*;
use crate::fake_disc::{MemoryDisc, attributes, block_numbers};
use crate::metadata::build_file_layout_catalog;
use dvd_mirror_core::{AspectRatio, TitleSetInfo};

fn no_progress(_: CopyProgress) {}

/// One title set with two title VOBs of 3 and 2 blocks.
fn disc() -> MemoryDisc {
    let mut disc = MemoryDisc::new();
    disc.add_title_set(
        attributes(AspectRatio::Widescreen, &[2], 0),
        TitleSetInfo::default(),
        &[3, 2],
    );
    disc.add_title(1, 1, 1, 1);
    disc
}

fn read(dir: &Path, name: &str) -> Vec<u8> {
    fs::read(dir.join(name)).unwrap()
}

#[test]
fn split_follows_vob_spans() {
    let spans = vec![0..3, 3..5, 5..9];
    let pieces = split_at_vob_boundaries(
        &[SectorRange::new(1, 4), SectorRange::new(4, 9)],
        &spans,
        1,
    )
    .unwrap();
    assert_eq!(
        pieces,
        vec![
            VobPiece { vob: 1, range: SectorRange::new(1, 3) },
            VobPiece { vob: 2, range: SectorRange::new(3, 4) },
            VobPiece { vob: 2, range: SectorRange::new(4, 5) },
            VobPiece { vob: 3, range: SectorRange::new(5, 9) },
        ]
    );
}

#[test]
fn split_beyond_last_vob_is_malformed() {
    let err = split_at_vob_boundaries(&[SectorRange::new(4, 7)], &[0..3, 3..5], 2).unwrap_err();
    assert!(matches!(err, MirrorError::MalformedMetadata(_)));
}

#[test]
fn copies_title_vob_at_its_stream_offset() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 1, &no_progress);
    copier.copy_title_vob(1, 2).unwrap();

    assert_eq!(block_numbers(&read(dir.path(), "VTS_01_2.VOB")), vec![3, 4]);
    assert_eq!(copier.files_written(), 1);
    assert_eq!(copier.blocks_copied(), 2);
}

#[test]
fn copies_info_and_backup_verbatim() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    copier.copy_info_and_backup(0).unwrap();

    assert_eq!(read(dir.path(), "VIDEO_TS.IFO"), vec![0x11; 4096]);
    assert_eq!(read(dir.path(), "VIDEO_TS.BUP"), vec![0x11; 4096]);
    assert_eq!(copier.files_written(), 2);
}

#[test]
fn absent_menu_is_skipped() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    copier.copy_menu(1).unwrap();

    assert_eq!(copier.files_written(), 0);
    assert!(!dir.path().join("VTS_01_0.VOB").exists());
}

#[test]
fn unaligned_file_size_is_rejected() {
    let mut disc = disc();
    disc.add_file("VTS_01_0.VOB", vec![0; 1000]);
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    let err = copier.copy_menu(1).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidSize { size: 1000, .. }));
}

#[test]
fn existing_regular_file_is_overwritten() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("VIDEO_TS.IFO"), vec![0xFF; 10_000]).unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    copier.copy_info_and_backup(0).unwrap();

    assert_eq!(read(dir.path(), "VIDEO_TS.IFO"), vec![0x11; 4096]);
}

#[test]
fn directory_in_place_of_target_file_is_rejected() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("VIDEO_TS.IFO")).unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    let err = copier.copy_info_and_backup(0).unwrap_err();
    assert!(matches!(err, MirrorError::Config(_)));
}

#[test]
fn cells_are_split_across_title_vobs() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("VTS_01_3.VOB"), b"stale").unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 2, &no_progress);
    copier
        .copy_cells(&CellRange {
            title_set: 1,
            ranges: vec![SectorRange::new(1, 4)],
        })
        .unwrap();

    assert_eq!(block_numbers(&read(dir.path(), "VTS_01_1.VOB")), vec![1, 2]);
    assert_eq!(block_numbers(&read(dir.path(), "VTS_01_2.VOB")), vec![3]);
    assert!(!dir.path().join("VTS_01_3.VOB").exists());
    assert_eq!(copier.files_written(), 2);
    assert_eq!(copier.blocks_copied(), 3);
}

#[test]
fn cell_copy_reports_progress_per_file() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let events = RefCell::new(Vec::new());
    let record = |event: CopyProgress| events.borrow_mut().push(event);

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &record);
    copier
        .copy_cells(&CellRange {
            title_set: 1,
            ranges: vec![SectorRange::new(0, 2), SectorRange::new(3, 5)],
        })
        .unwrap();

    let started: Vec<u64> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            CopyProgress::FileStarted { total_blocks, .. } => Some(*total_blocks),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![2, 2]);
    let written: u64 = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            CopyProgress::BlocksWritten { blocks } => Some(*blocks),
            _ => None,
        })
        .sum();
    assert_eq!(written, 4);
}

#[test]
fn short_read_is_reported() {
    let mut disc = disc();
    disc.short_reads = true;
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    let err = copier.copy_title_vob(1, 1).unwrap_err();
    assert!(matches!(
        err,
        MirrorError::ShortRead {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn range_past_stream_end_fails_before_reading() {
    let mut disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    // The disc shrinks after cataloguing: VTS_01_2.VOB now holds 1 block, not 2.
    disc.add_file("VTS_01_2.VOB", crate::fake_disc::numbered_blocks(1, 3, 1));
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 1, &no_progress);
    let err = copier.copy_title_vob(1, 2).unwrap_err();
    assert!(matches!(
        err,
        MirrorError::ShortRead {
            offset: 3,
            expected: 2,
            actual: 1,
            ..
        }
    ));
    assert_eq!(copier.blocks_copied(), 0);
}

#[test]
fn video_manager_has_no_title_vobs() {
    let disc = disc();
    let layout = build_file_layout_catalog(&disc).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut copier = Copier::new(&disc, &layout, dir.path(), 8, &no_progress);
    let err = copier.copy_title_vob(0, 1).unwrap_err();
    assert!(matches!(err, MirrorError::DiscMetadataUnavailable(_)));
}
