//! Builders for synthetic IFO files.

use dvd_mirror_core::{PartOfTitle, ProgramChain, TitleSearchEntry};

const SECTOR: usize = 2048;
const ATRT_ENTRY_SIZE: usize = 776;
const PGC_HEADER_SIZE: usize = 0xEC;

/// Attributes of one title set as written into the VTS_ATRT.
pub(crate) struct AttrSpec {
    pub aspect_code: u8,
    pub audio_channels: Vec<u8>,
    pub subpictures: u8,
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn pad_to_sector(buf: &mut Vec<u8>) {
    let len = buf.len().div_ceil(SECTOR).max(1) * SECTOR;
    buf.resize(len, 0);
}

/// Append `table` at the next sector boundary and return its sector number.
fn append_table(buf: &mut Vec<u8>, table: &[u8]) -> u32 {
    pad_to_sector(buf);
    let sector = (buf.len() / SECTOR) as u32;
    buf.extend_from_slice(table);
    sector
}

fn table_header(count: usize, body_len: usize) -> Vec<u8> {
    let mut table = vec![0u8; 8];
    put_u16(&mut table, 0, count as u16);
    put_u32(&mut table, 4, (8 + body_len - 1) as u32);
    table
}

/// Build a `VIDEO_TS.IFO` with a title search table and attribute table.
pub(crate) fn build_vmg_ifo(titles: &[TitleSearchEntry], attrs: &[AttrSpec]) -> Vec<u8> {
    let mut ifo = vec![0u8; SECTOR];
    ifo[..12].copy_from_slice(b"DVDVIDEO-VMG");
    put_u16(&mut ifo, 0x3E, attrs.len() as u16);

    let mut tt_srpt = table_header(titles.len(), titles.len() * 12);
    for t in titles {
        let mut entry = [0u8; 12];
        entry[1] = t.angles;
        put_u16(&mut entry, 2, t.chapters);
        entry[6] = t.title_set;
        entry[7] = t.vts_title;
        tt_srpt.extend_from_slice(&entry);
    }

    let pointers_len = attrs.len() * 4;
    let mut atrt = table_header(attrs.len(), pointers_len + attrs.len() * ATRT_ENTRY_SIZE);
    atrt.resize(8 + pointers_len + attrs.len() * ATRT_ENTRY_SIZE, 0);
    for (i, a) in attrs.iter().enumerate() {
        let entry = 8 + pointers_len + i * ATRT_ENTRY_SIZE;
        put_u32(&mut atrt, 8 + i * 4, entry as u32);
        atrt[entry + 264] = a.aspect_code << 2;
        atrt[entry + 267] = a.audio_channels.len() as u8;
        for (s, &channels) in a.audio_channels.iter().enumerate() {
            atrt[entry + 268 + s * 8 + 1] = channels.saturating_sub(1) & 0x07;
        }
        atrt[entry + 349] = a.subpictures;
    }

    let tt_sector = append_table(&mut ifo, &tt_srpt);
    let atrt_sector = append_table(&mut ifo, &atrt);
    put_u32(&mut ifo, 0xC4, tt_sector);
    put_u32(&mut ifo, 0xD0, atrt_sector);
    pad_to_sector(&mut ifo);
    ifo
}

/// Build a `VTS_nn_0.IFO` with a chapter table and program chain table.
pub(crate) fn build_vts_ifo(parts_of_title: &[Vec<PartOfTitle>], chains: &[ProgramChain]) -> Vec<u8> {
    let mut ifo = vec![0u8; SECTOR];
    ifo[..12].copy_from_slice(b"DVDVIDEO-VTS");

    let pointers_len = parts_of_title.len() * 4;
    let chapters_len: usize = parts_of_title.iter().map(|t| t.len() * 4).sum();
    let mut ptt = table_header(parts_of_title.len(), pointers_len + chapters_len);
    let mut offset = 8 + pointers_len;
    for title in parts_of_title {
        ptt.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += title.len() * 4;
    }
    for title in parts_of_title {
        for part in title {
            ptt.extend_from_slice(&part.pgcn.to_be_bytes());
            ptt.extend_from_slice(&part.pgn.to_be_bytes());
        }
    }

    let pgcs: Vec<Vec<u8>> = chains.iter().map(build_pgc).collect();
    let pointers_len = chains.len() * 8;
    let body_len = pointers_len + pgcs.iter().map(Vec::len).sum::<usize>();
    let mut pgcit = table_header(chains.len(), body_len);
    let mut offset = 8 + pointers_len;
    for pgc in &pgcs {
        pgcit.extend_from_slice(&0x8100_0000u32.to_be_bytes());
        pgcit.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += pgc.len();
    }
    for pgc in &pgcs {
        pgcit.extend_from_slice(pgc);
    }

    let ptt_sector = append_table(&mut ifo, &ptt);
    let pgcit_sector = append_table(&mut ifo, &pgcit);
    put_u32(&mut ifo, 0xC8, ptt_sector);
    put_u32(&mut ifo, 0xCC, pgcit_sector);
    pad_to_sector(&mut ifo);
    ifo
}

fn build_pgc(chain: &ProgramChain) -> Vec<u8> {
    let map_offset = PGC_HEADER_SIZE;
    let cell_offset = map_offset + chain.program_map.len().next_multiple_of(2);
    let mut pgc = vec![0u8; cell_offset + chain.cells.len() * 24];
    pgc[2] = chain.program_map.len() as u8;
    pgc[3] = chain.cells.len() as u8;
    if !chain.program_map.is_empty() {
        put_u16(&mut pgc, 0xE6, map_offset as u16);
        pgc[map_offset..map_offset + chain.program_map.len()].copy_from_slice(&chain.program_map);
    }
    if !chain.cells.is_empty() {
        put_u16(&mut pgc, 0xE8, cell_offset as u16);
        for (i, cell) in chain.cells.iter().enumerate() {
            let at = cell_offset + i * 24;
            put_u32(&mut pgc, at + 8, cell.first_sector);
            put_u32(&mut pgc, at + 20, cell.last_sector);
        }
    }
    pgc
}
