use super::*;
use crate::fake_disc::{MemoryDisc, attributes};
use dvd_mirror_core::{AspectRatio, CellPlayback, PartOfTitle, TitleSetInfo};

fn cell(first: u32, last: u32) -> CellPlayback {
    CellPlayback {
        first_sector: first,
        last_sector: last,
    }
}

fn parts(pgcn: u16, programs: u16) -> Vec<PartOfTitle> {
    (1..=programs).map(|pgn| PartOfTitle { pgcn, pgn }).collect()
}

fn record(vts_title: u8, chapters: u16) -> TitleRecord {
    TitleRecord {
        title_set: 1,
        vts_title,
        chapters,
        angles: 1,
        audio_tracks: 1,
        audio_channels: 2,
        subpictures: 0,
        aspect_ratio: AspectRatio::Widescreen,
    }
}

/// Title 1: ten chapters of one 100-sector cell each in PGC 1.
/// Title 2: two chapters of two cells each in PGC 2.
fn disc() -> MemoryDisc {
    let info = TitleSetInfo {
        parts_of_title: vec![parts(1, 10), parts(2, 2)],
        program_chains: vec![
            ProgramChain {
                program_map: (1..=10).collect(),
                cells: (0..10).map(|k| cell(k * 100, k * 100 + 99)).collect(),
            },
            ProgramChain {
                program_map: vec![1, 3],
                cells: vec![
                    cell(2000, 2099),
                    cell(2100, 2199),
                    cell(3000, 3049),
                    cell(3050, 3099),
                ],
            },
        ],
    };
    let mut disc = MemoryDisc::new();
    disc.add_title_set(
        attributes(AspectRatio::Widescreen, &[2], 0),
        info,
        &[4000],
    );
    disc.add_title(1, 1, 10, 1);
    disc.add_title(1, 2, 2, 1);
    disc
}

fn ranges(cells: &CellRange) -> Vec<(u64, u64)> {
    cells.ranges.iter().map(|r| (r.start, r.end)).collect()
}

#[test]
fn single_chapter_maps_to_its_cell() {
    let cells = resolve_chapter_range(&disc(), &record(1, 10), 1, 1).unwrap();
    assert_eq!(cells.title_set, 1);
    assert_eq!(ranges(&cells), vec![(0, 100)]);
}

#[test]
fn chapter_span_covers_every_cell() {
    let cells = resolve_chapter_range(&disc(), &record(1, 10), 3, 5).unwrap();
    assert_eq!(ranges(&cells), vec![(200, 300), (300, 400), (400, 500)]);
    assert_eq!(cells.total_blocks(), 300);
}

#[test]
fn last_chapter_runs_to_last_cell() {
    let cells = resolve_chapter_range(&disc(), &record(1, 10), 9, 10).unwrap();
    assert_eq!(ranges(&cells), vec![(800, 900), (900, 1000)]);
}

#[test]
fn chapters_past_the_end_are_clamped() {
    let cells = resolve_chapter_range(&disc(), &record(1, 10), 20, 20).unwrap();
    assert_eq!(ranges(&cells), vec![(900, 1000)]);

    let cells = resolve_chapter_range(&disc(), &record(1, 10), 8, 25).unwrap();
    assert_eq!(ranges(&cells), vec![(700, 800), (800, 900), (900, 1000)]);
}

#[test]
fn programs_spanning_several_cells() {
    let first = resolve_chapter_range(&disc(), &record(2, 2), 1, 1).unwrap();
    assert_eq!(ranges(&first), vec![(2000, 2100), (2100, 2200)]);

    let second = resolve_chapter_range(&disc(), &record(2, 2), 2, 2).unwrap();
    assert_eq!(ranges(&second), vec![(3000, 3050), (3050, 3100)]);
}

#[test]
fn title_without_chapters_is_rejected() {
    let err = resolve_chapter_range(&disc(), &record(1, 0), 1, 1).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidChapter(_)));
}

#[test]
fn chapter_zero_is_raised_to_the_first() {
    let cells = resolve_chapter_range(&disc(), &record(1, 10), 0, 3).unwrap();
    assert_eq!(ranges(&cells), vec![(0, 100), (100, 200), (200, 300)]);

    let cells = resolve_chapter_range(&disc(), &record(1, 10), 0, 0).unwrap();
    assert_eq!(ranges(&cells), vec![(0, 100)]);
}

#[test]
fn reversed_range_is_rejected() {
    let err = resolve_chapter_range(&disc(), &record(1, 10), 5, 3).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidChapter(_)));
}

#[test]
fn missing_chapter_table_is_malformed() {
    let err = resolve_chapter_range(&disc(), &record(3, 4), 1, 1).unwrap_err();
    assert!(matches!(err, MirrorError::MalformedMetadata(_)));
}

#[test]
fn program_map_beyond_cells_is_malformed() {
    let info = TitleSetInfo {
        parts_of_title: vec![parts(1, 1)],
        program_chains: vec![ProgramChain {
            program_map: vec![3],
            cells: vec![cell(0, 9)],
        }],
    };
    let mut disc = MemoryDisc::new();
    disc.add_title_set(attributes(AspectRatio::Standard, &[2], 0), info, &[10]);
    let err = resolve_chapter_range(&disc, &record(1, 1), 1, 1).unwrap_err();
    assert!(matches!(err, MirrorError::MalformedMetadata(_)));
}

#[test]
fn overlapping_cells_are_aligned() {
    let info = TitleSetInfo {
        parts_of_title: vec![parts(1, 1)],
        program_chains: vec![ProgramChain {
            program_map: vec![1],
            cells: vec![cell(100, 299), cell(0, 199)],
        }],
    };
    let mut disc = MemoryDisc::new();
    disc.add_title_set(attributes(AspectRatio::Standard, &[2], 0), info, &[300]);
    let cells = resolve_chapter_range(&disc, &record(1, 1), 1, 1).unwrap();
    assert_eq!(ranges(&cells), vec![(0, 100), (100, 300)]);
}

#[test]
fn alignment_drops_swallowed_ranges_and_is_idempotent() {
    let mut list = vec![
        SectorRange::new(50, 80),
        SectorRange::new(0, 60),
        SectorRange::new(50, 50),
        SectorRange::new(90, 100),
    ];
    align_end_sectors(&mut list);
    assert_eq!(
        list,
        vec![SectorRange::new(0, 50), SectorRange::new(50, 80), SectorRange::new(90, 100)]
    );

    let again = {
        let mut copy = list.clone();
        align_end_sectors(&mut copy);
        copy
    };
    assert_eq!(again, list);
}

#[test]
fn inclusive_cell_bounds_become_half_open() {
    let range = SectorRange::from_inclusive(10, 19);
    assert_eq!(range.blocks(), 10);
    assert!(!range.is_empty());
    assert!(SectorRange::new(5, 5).is_empty());
}
