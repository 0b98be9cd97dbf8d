use super::*;
use crate::ifo_builder::{AttrSpec, build_vmg_ifo, build_vts_ifo};

fn entry(title_set: u8, vts_title: u8, chapters: u16, angles: u8) -> TitleSearchEntry {
    TitleSearchEntry {
        title_set,
        vts_title,
        chapters,
        angles,
    }
}

fn sample_vmg() -> Vec<u8> {
    build_vmg_ifo(
        &[entry(1, 1, 28, 1), entry(2, 1, 3, 2), entry(2, 2, 1, 1)],
        &[
            AttrSpec {
                aspect_code: 3,
                audio_channels: vec![6, 2],
                subpictures: 4,
            },
            AttrSpec {
                aspect_code: 0,
                audio_channels: vec![2],
                subpictures: 0,
            },
        ],
    )
}

#[test]
fn parses_video_manager_titles() {
    let vmg = parse_video_manager(&sample_vmg()).unwrap();
    assert_eq!(vmg.title_set_count, 2);
    assert_eq!(vmg.titles.len(), 3);
    assert_eq!(vmg.titles[0], entry(1, 1, 28, 1));
    assert_eq!(vmg.titles[1], entry(2, 1, 3, 2));
    assert_eq!(vmg.titles[2].vts_title, 2);
}

#[test]
fn parses_title_set_attributes() {
    let vmg = parse_video_manager(&sample_vmg()).unwrap();
    let first = &vmg.title_set_attributes[0];
    assert_eq!(first.aspect_ratio, AspectRatio::Widescreen);
    assert_eq!(first.audio_streams.len(), 2);
    assert_eq!(first.max_audio_channels(), 6);
    assert_eq!(first.subpicture_streams, 4);

    let second = &vmg.title_set_attributes[1];
    assert_eq!(second.aspect_ratio, AspectRatio::Standard);
    assert_eq!(second.max_audio_channels(), 2);
    assert_eq!(second.subpicture_streams, 0);
}

#[test]
fn rejects_wrong_identifier() {
    let mut data = sample_vmg();
    data[..12].copy_from_slice(b"DVDVIDEO-VTS");
    assert!(matches!(
        parse_video_manager(&data),
        Err(MirrorError::MalformedMetadata(_))
    ));
}

#[test]
fn missing_title_search_table_is_unavailable() {
    let mut data = sample_vmg();
    data[0xC4..0xC8].copy_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(
        parse_video_manager(&data),
        Err(MirrorError::DiscMetadataUnavailable(_))
    ));
}

#[test]
fn truncated_video_manager_is_malformed() {
    let data = sample_vmg();
    let truncated = &data[..2048 + 16];
    assert!(matches!(
        parse_video_manager(truncated),
        Err(MirrorError::MalformedMetadata(_))
    ));
}

fn sample_chains() -> Vec<ProgramChain> {
    vec![
        ProgramChain {
            program_map: vec![1, 3, 4],
            cells: vec![
                CellPlayback {
                    first_sector: 0,
                    last_sector: 99,
                },
                CellPlayback {
                    first_sector: 100,
                    last_sector: 149,
                },
                CellPlayback {
                    first_sector: 150,
                    last_sector: 299,
                },
                CellPlayback {
                    first_sector: 300,
                    last_sector: 319,
                },
            ],
        },
        ProgramChain {
            program_map: vec![1],
            cells: vec![CellPlayback {
                first_sector: 320,
                last_sector: 400,
            }],
        },
    ]
}

#[test]
fn parses_title_set_tables() {
    let parts = vec![
        vec![
            PartOfTitle { pgcn: 1, pgn: 1 },
            PartOfTitle { pgcn: 1, pgn: 2 },
            PartOfTitle { pgcn: 1, pgn: 3 },
        ],
        vec![PartOfTitle { pgcn: 2, pgn: 1 }],
    ];
    let chains = sample_chains();
    let info = parse_title_set(&build_vts_ifo(&parts, &chains)).unwrap();

    assert_eq!(info.parts_of_title, parts);
    assert_eq!(info.program_chains, chains);
}

#[test]
fn title_with_odd_program_count_keeps_cells_aligned() {
    let chains = vec![ProgramChain {
        program_map: vec![1],
        cells: vec![CellPlayback {
            first_sector: 10,
            last_sector: 20,
        }],
    }];
    let info = parse_title_set(&build_vts_ifo(&[vec![PartOfTitle { pgcn: 1, pgn: 1 }]], &chains))
        .unwrap();
    assert_eq!(info.program_chains[0].cells[0].last_sector, 20);
}

#[test]
fn cells_without_playback_table_are_malformed() {
    let chains = sample_chains();
    let mut data = build_vts_ifo(&[vec![PartOfTitle { pgcn: 1, pgn: 1 }]], &chains);

    // Zero the cell playback offset of the first program chain
    let pgcit = u32::from_be_bytes([data[0xCC], data[0xCD], data[0xCE], data[0xCF]]) as usize * 2048;
    let pgc = pgcit
        + u32::from_be_bytes([
            data[pgcit + 12],
            data[pgcit + 13],
            data[pgcit + 14],
            data[pgcit + 15],
        ]) as usize;
    data[pgc + 0xE8] = 0;
    data[pgc + 0xE9] = 0;

    assert!(matches!(
        parse_title_set(&data),
        Err(MirrorError::MalformedMetadata(_))
    ));
}
