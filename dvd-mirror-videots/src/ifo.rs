//! IFO table parsing.
//!
//! Covers the subset of the video manager (`VIDEO_TS.IFO`) and title set
//! (`VTS_nn_0.IFO`) structures that the mirror consumes. All multi-byte
//! fields are big-endian, and table locations are given as sector numbers
//! relative to the start of the IFO file.

use dvd_mirror_core::{
    AspectRatio, AudioAttributes, CellPlayback, MirrorError, PartOfTitle, ProgramChain,
    TitleSearchEntry, TitleSetAttributes, TitleSetInfo, VideoManagerInfo,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const IFO_SECTOR_SIZE: usize = 2048;

const VMG_IDENTIFIER: &[u8; 12] = b"DVDVIDEO-VMG";
const VTS_IDENTIFIER: &[u8; 12] = b"DVDVIDEO-VTS";

/// VMGI_MAT: number of title sets (u16).
const VMG_TITLE_SET_COUNT: usize = 0x3E;
/// VMGI_MAT: sector of the title search pointer table (u32).
const VMG_TT_SRPT_SECTOR: usize = 0xC4;
/// VMGI_MAT: sector of the title set attribute table (u32).
const VMG_VTS_ATRT_SECTOR: usize = 0xD0;

/// VTSI_MAT: sector of the chapter (part of title) search pointer table (u32).
const VTS_PTT_SRPT_SECTOR: usize = 0xC8;
/// VTSI_MAT: sector of the title program chain information table (u32).
const VTS_PGCIT_SECTOR: usize = 0xCC;

/// Every search table starts with an 8-byte header: count, reserved, last byte.
const TABLE_HEADER_SIZE: usize = 8;
const TT_SRPT_ENTRY_SIZE: usize = 12;
const PGCI_SRP_SIZE: usize = 8;

/// Offsets inside a VTS_ATRT attribute entry.
const ATRT_VIDEO_ATTR: usize = 264;
const ATRT_AUDIO_COUNT: usize = 267;
const ATRT_AUDIO_ATTR: usize = 268;
const ATRT_SUBPICTURE_COUNT: usize = 349;
const AUDIO_ATTR_SIZE: usize = 8;
const MAX_AUDIO_STREAMS: u8 = 8;
const MAX_SUBPICTURE_STREAMS: u8 = 32;

/// Offsets inside a program chain.
const PGC_PROGRAM_COUNT: usize = 2;
const PGC_CELL_COUNT: usize = 3;
const PGC_PROGRAM_MAP_OFFSET: usize = 0xE6;
const PGC_CELL_PLAYBACK_OFFSET: usize = 0xE8;
const CELL_PLAYBACK_SIZE: usize = 24;
const CELL_FIRST_SECTOR: usize = 8;
const CELL_LAST_SECTOR: usize = 20;

// ---------------------------------------------------------------------------
// Bounds-checked field access
// ---------------------------------------------------------------------------

fn slice<'a>(data: &'a [u8], offset: usize, len: usize, what: &str) -> Result<&'a [u8], MirrorError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            MirrorError::malformed(format!(
                "{what} at byte {offset} runs past the end of the IFO ({} bytes)",
                data.len()
            ))
        })
}

fn read_u8(data: &[u8], offset: usize, what: &str) -> Result<u8, MirrorError> {
    Ok(slice(data, offset, 1, what)?[0])
}

fn read_u16(data: &[u8], offset: usize, what: &str) -> Result<u16, MirrorError> {
    let b = slice(data, offset, 2, what)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize, what: &str) -> Result<u32, MirrorError> {
    let b = slice(data, offset, 4, what)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Byte offset of a table whose sector pointer is stored at `pointer`.
/// A zero pointer means the table is absent.
fn table_offset(data: &[u8], pointer: usize, what: &str) -> Result<usize, MirrorError> {
    let sector = read_u32(data, pointer, what)?;
    if sector == 0 {
        return Err(MirrorError::metadata_unavailable(format!(
            "{what} is not present"
        )));
    }
    (sector as usize)
        .checked_mul(IFO_SECTOR_SIZE)
        .filter(|&offset| offset < data.len())
        .ok_or_else(|| {
            MirrorError::malformed(format!(
                "{what} at sector {sector} lies outside the IFO"
            ))
        })
}

fn check_identifier(data: &[u8], expected: &[u8; 12]) -> Result<(), MirrorError> {
    let found = slice(data, 0, expected.len(), "IFO identifier")?;
    if found != expected {
        return Err(MirrorError::malformed(format!(
            "Expected identifier {}, found {}",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Video manager
// ---------------------------------------------------------------------------

/// Parse `VIDEO_TS.IFO` (or its backup).
pub fn parse_video_manager(data: &[u8]) -> Result<VideoManagerInfo, MirrorError> {
    check_identifier(data, VMG_IDENTIFIER)?;

    let declared = read_u16(data, VMG_TITLE_SET_COUNT, "Title set count")?;
    let title_set_count = u8::try_from(declared).map_err(|_| {
        MirrorError::malformed(format!("Title set count {declared} is out of range"))
    })?;

    let tt_srpt = table_offset(data, VMG_TT_SRPT_SECTOR, "Title search pointer table")?;
    let titles = parse_title_search_table(data, tt_srpt)?;

    let vts_atrt = table_offset(data, VMG_VTS_ATRT_SECTOR, "Title set attribute table")?;
    let title_set_attributes = parse_attribute_table(data, vts_atrt)?;

    log::debug!(
        "Video manager: {} title sets, {} titles, {} attribute entries",
        title_set_count,
        titles.len(),
        title_set_attributes.len()
    );

    Ok(VideoManagerInfo {
        title_set_count,
        titles,
        title_set_attributes,
    })
}

fn parse_title_search_table(data: &[u8], base: usize) -> Result<Vec<TitleSearchEntry>, MirrorError> {
    let count = read_u16(data, base, "Title search pointer count")? as usize;
    let mut titles = Vec::with_capacity(count);
    for i in 0..count {
        let entry = base + TABLE_HEADER_SIZE + i * TT_SRPT_ENTRY_SIZE;
        let what = format!("Title search pointer {}", i + 1);
        let fields = slice(data, entry, TT_SRPT_ENTRY_SIZE, &what)?;
        titles.push(TitleSearchEntry {
            angles: fields[1],
            chapters: u16::from_be_bytes([fields[2], fields[3]]),
            title_set: fields[6],
            vts_title: fields[7],
        });
    }
    Ok(titles)
}

fn parse_attribute_table(data: &[u8], base: usize) -> Result<Vec<TitleSetAttributes>, MirrorError> {
    let count = read_u16(data, base, "Title set attribute count")? as usize;
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let what = format!("Attribute pointer {}", i + 1);
        let relative = read_u32(data, base + TABLE_HEADER_SIZE + i * 4, &what)? as usize;
        entries.push(parse_attribute_entry(data, base + relative, i + 1)?);
    }
    Ok(entries)
}

fn parse_attribute_entry(
    data: &[u8],
    entry: usize,
    title_set: usize,
) -> Result<TitleSetAttributes, MirrorError> {
    let what = format!("Attributes of title set {title_set}");
    let video = read_u8(data, entry + ATRT_VIDEO_ATTR, &what)?;
    let audio_count = read_u8(data, entry + ATRT_AUDIO_COUNT, &what)?.min(MAX_AUDIO_STREAMS);
    let subpicture_streams =
        read_u8(data, entry + ATRT_SUBPICTURE_COUNT, &what)?.min(MAX_SUBPICTURE_STREAMS);

    let mut audio_streams = Vec::with_capacity(audio_count as usize);
    for a in 0..audio_count as usize {
        let attr = slice(
            data,
            entry + ATRT_AUDIO_ATTR + a * AUDIO_ATTR_SIZE,
            AUDIO_ATTR_SIZE,
            &what,
        )?;
        audio_streams.push(AudioAttributes {
            channels: (attr[1] & 0x07) + 1,
        });
    }

    Ok(TitleSetAttributes {
        aspect_ratio: AspectRatio::from_code((video >> 2) & 0x03),
        audio_streams,
        subpicture_streams,
    })
}

// ---------------------------------------------------------------------------
// Title sets
// ---------------------------------------------------------------------------

/// Parse a `VTS_nn_0.IFO` (or its backup).
pub fn parse_title_set(data: &[u8]) -> Result<TitleSetInfo, MirrorError> {
    check_identifier(data, VTS_IDENTIFIER)?;

    let ptt = table_offset(data, VTS_PTT_SRPT_SECTOR, "Chapter search pointer table")?;
    let parts_of_title = parse_part_of_title_table(data, ptt)?;

    let pgcit = table_offset(data, VTS_PGCIT_SECTOR, "Program chain table")?;
    let program_chains = parse_program_chain_table(data, pgcit)?;

    Ok(TitleSetInfo {
        parts_of_title,
        program_chains,
    })
}

fn parse_part_of_title_table(data: &[u8], base: usize) -> Result<Vec<Vec<PartOfTitle>>, MirrorError> {
    let count = read_u16(data, base, "Chapter table title count")? as usize;
    let last_byte = read_u32(data, base + 4, "Chapter table end")? as usize;

    let mut offsets = Vec::with_capacity(count);
    for i in 0..count {
        let what = format!("Chapter table pointer {}", i + 1);
        offsets.push(read_u32(data, base + TABLE_HEADER_SIZE + i * 4, &what)? as usize);
    }

    let mut titles = Vec::with_capacity(count);
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(last_byte + 1);
        if end < start {
            return Err(MirrorError::malformed(format!(
                "Chapter table of title {} ends before it starts",
                i + 1
            )));
        }
        let mut chapters = Vec::with_capacity((end - start) / 4);
        for c in 0..(end - start) / 4 {
            let what = format!("Chapter {} of title {}", c + 1, i + 1);
            let at = base + start + c * 4;
            chapters.push(PartOfTitle {
                pgcn: read_u16(data, at, &what)?,
                pgn: read_u16(data, at + 2, &what)?,
            });
        }
        titles.push(chapters);
    }
    Ok(titles)
}

fn parse_program_chain_table(data: &[u8], base: usize) -> Result<Vec<ProgramChain>, MirrorError> {
    let count = read_u16(data, base, "Program chain count")? as usize;
    let mut chains = Vec::with_capacity(count);
    for i in 0..count {
        let what = format!("Program chain pointer {}", i + 1);
        let relative = read_u32(data, base + TABLE_HEADER_SIZE + i * PGCI_SRP_SIZE + 4, &what)?;
        chains.push(parse_program_chain(data, base + relative as usize, i + 1)?);
    }
    Ok(chains)
}

fn parse_program_chain(data: &[u8], pgc: usize, number: usize) -> Result<ProgramChain, MirrorError> {
    let what = format!("Program chain {number}");
    let program_count = read_u8(data, pgc + PGC_PROGRAM_COUNT, &what)? as usize;
    let cell_count = read_u8(data, pgc + PGC_CELL_COUNT, &what)? as usize;

    let program_map = if program_count == 0 {
        Vec::new()
    } else {
        let offset = read_u16(data, pgc + PGC_PROGRAM_MAP_OFFSET, &what)? as usize;
        if offset == 0 {
            return Err(MirrorError::malformed(format!(
                "{what} has {program_count} programs but no program map"
            )));
        }
        slice(data, pgc + offset, program_count, &what)?.to_vec()
    };

    let mut cells = Vec::with_capacity(cell_count);
    if cell_count > 0 {
        let offset = read_u16(data, pgc + PGC_CELL_PLAYBACK_OFFSET, &what)? as usize;
        if offset == 0 {
            return Err(MirrorError::malformed(format!(
                "{what} has {cell_count} cells but no cell playback table"
            )));
        }
        for c in 0..cell_count {
            let cell = pgc + offset + c * CELL_PLAYBACK_SIZE;
            cells.push(CellPlayback {
                first_sector: read_u32(data, cell + CELL_FIRST_SECTOR, &what)?,
                last_sector: read_u32(data, cell + CELL_LAST_SECTOR, &what)?,
            });
        }
    }

    Ok(ProgramChain { program_map, cells })
}

#[cfg(test)]
#[path = "tests/ifo_tests.rs"]
mod tests;
