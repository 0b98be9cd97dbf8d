//! Block-exact copying from the disc into the mirror directory.
//!
//! Whole files are copied verbatim. Chapter spans are copied cell by cell
//! into title VOBs split at the same boundaries as on the disc, so a sector
//! that lives in `VTS_01_2.VOB` on the disc ends up in `VTS_01_2.VOB` in
//! the mirror too.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dvd_mirror_core::catalog::size_in_blocks;
use dvd_mirror_core::naming;
use dvd_mirror_core::{
    CopyProgress, DvdReader, DvdStream, FileLayoutCatalog, LOGICAL_BLOCK_SIZE, MAX_TITLE_VOBS,
    MirrorError, StreamKind,
};

use crate::chapters::{CellRange, SectorRange};

/// A piece of a cell range that falls inside a single title VOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VobPiece {
    /// Title VOB number (1-based)
    pub vob: usize,
    pub range: SectorRange,
}

/// Split sector ranges at the title VOB boundaries given by `spans`.
pub(crate) fn split_at_vob_boundaries(
    ranges: &[SectorRange],
    spans: &[std::ops::Range<u64>],
    title_set: u8,
) -> Result<Vec<VobPiece>, MirrorError> {
    let mut pieces = Vec::new();
    for range in ranges {
        let mut cursor = range.start;
        while cursor < range.end {
            let (index, span) = spans
                .iter()
                .enumerate()
                .find(|(_, s)| s.contains(&cursor))
                .ok_or_else(|| {
                    MirrorError::malformed(format!(
                        "sector {cursor} lies beyond the title VOBs of title set {title_set}"
                    ))
                })?;
            let end = range.end.min(span.end);
            pieces.push(VobPiece {
                vob: index + 1,
                range: SectorRange::new(cursor, end),
            });
            cursor = end;
        }
    }
    Ok(pieces)
}

/// Copies disc content into one `VIDEO_TS` target directory.
pub struct Copier<'a> {
    disc: &'a dyn DvdReader,
    layout: &'a FileLayoutCatalog,
    target_dir: PathBuf,
    batch_blocks: usize,
    progress: &'a dyn Fn(CopyProgress),
    files_written: usize,
    blocks_copied: u64,
}

impl<'a> Copier<'a> {
    pub fn new(
        disc: &'a dyn DvdReader,
        layout: &'a FileLayoutCatalog,
        target_dir: impl Into<PathBuf>,
        batch_blocks: usize,
        progress: &'a dyn Fn(CopyProgress),
    ) -> Self {
        Self {
            disc,
            layout,
            target_dir: target_dir.into(),
            batch_blocks: batch_blocks.max(1),
            progress,
            files_written: 0,
            blocks_copied: 0,
        }
    }

    pub fn files_written(&self) -> usize {
        self.files_written
    }

    pub fn blocks_copied(&self) -> u64 {
        self.blocks_copied
    }

    /// Copy a domain's IFO followed by its BUP.
    pub fn copy_info_and_backup(&mut self, title_set: u8) -> Result<(), MirrorError> {
        self.copy_file_verbatim(title_set, StreamKind::InfoFile, 0)?;
        self.copy_file_verbatim(title_set, StreamKind::BackupFile, 0)
    }

    /// Copy a domain's menu VOB, if it has one.
    pub fn copy_menu(&mut self, title_set: u8) -> Result<(), MirrorError> {
        self.copy_file_verbatim(title_set, StreamKind::MenuVobs, 0)
    }

    /// Copy title VOB `vob` (1-based) of a title set.
    pub fn copy_title_vob(&mut self, title_set: u8, vob: usize) -> Result<(), MirrorError> {
        self.copy_file_verbatim(title_set, StreamKind::TitleVobs, vob)
    }

    /// Copy every title VOB of a title set, one file at a time.
    pub fn copy_whole_title_set_vobs(&mut self, title_set: u8) -> Result<(), MirrorError> {
        let count = self.layout.require(title_set)?.vob_count();
        for vob in 1..=count {
            self.copy_title_vob(title_set, vob)?;
        }
        Ok(())
    }

    /// Copy one file of the disc unchanged. `vob` is only used for title VOBs.
    ///
    /// Files whose catalog size is 0 are absent on the disc and skipped.
    pub fn copy_file_verbatim(
        &mut self,
        title_set: u8,
        kind: StreamKind,
        vob: usize,
    ) -> Result<(), MirrorError> {
        let (disc, catalog) = (self.disc, self.layout);
        let layout = catalog.require(title_set)?;
        let name = naming::file_name(title_set, kind, vob);
        let size = match kind {
            StreamKind::InfoFile => layout.ifo_size,
            StreamKind::BackupFile => layout.bup_size,
            StreamKind::MenuVobs => layout.menu_size,
            StreamKind::TitleVobs => {
                if title_set == 0 {
                    return Err(MirrorError::metadata_unavailable(
                        "the video manager has no title VOBs",
                    ));
                }
                layout.vob_size(vob).ok_or_else(|| {
                    MirrorError::metadata_unavailable(format!(
                        "title set {title_set} has no title VOB {vob}"
                    ))
                })?
            }
        };
        if size == 0 {
            log::debug!("{name} is not on the disc, skipping");
            return Ok(());
        }
        let blocks = size_in_blocks(&name, title_set, size)?;

        let path = self.target_dir.join(&name);
        let mut file = create_target(&path)?;
        (self.progress)(CopyProgress::FileStarted {
            path: path.clone(),
            total_blocks: blocks,
        });

        let mut stream = disc.open_stream(title_set, kind)?;
        match kind {
            StreamKind::InfoFile | StreamKind::BackupFile => {
                let mut buf = vec![0u8; size as usize];
                let read = stream.read_bytes(&mut buf)?;
                if read != buf.len() {
                    return Err(MirrorError::ShortRead {
                        what: name,
                        offset: 0,
                        expected: blocks,
                        actual: read as u64 / LOGICAL_BLOCK_SIZE,
                    });
                }
                file.write_all(&buf).map_err(|source| short_write(&path, source))?;
                self.blocks_copied += blocks;
                (self.progress)(CopyProgress::BlocksWritten { blocks });
            }
            StreamKind::MenuVobs => {
                self.copy_blocks(stream.as_mut(), &name, 0..blocks, &mut file, &path)?;
            }
            StreamKind::TitleVobs => {
                let spans = layout.vob_block_spans(title_set)?;
                let start = spans[vob - 1].start;
                self.copy_blocks(stream.as_mut(), &name, start..start + blocks, &mut file, &path)?;
            }
        }

        self.finish_file(file, path)
    }

    /// Copy the sector ranges of a chapter span into the title VOBs of its
    /// title set. Existing title VOBs of that title set in the target are
    /// removed first.
    pub fn copy_cells(&mut self, cells: &CellRange) -> Result<(), MirrorError> {
        let title_set = cells.title_set;
        if title_set == 0 {
            return Err(MirrorError::metadata_unavailable(
                "the video manager has no title VOBs",
            ));
        }
        let disc = self.disc;
        let spans = self.layout.require(title_set)?.vob_block_spans(title_set)?;
        let pieces = split_at_vob_boundaries(&cells.ranges, &spans, title_set)?;

        self.remove_title_vobs(title_set)?;

        let mut stream = disc.open_stream(title_set, StreamKind::TitleVobs)?;
        let mut current: Option<(usize, File, PathBuf)> = None;

        for piece in &pieces {
            if current.as_ref().is_none_or(|(vob, _, _)| *vob != piece.vob) {
                if let Some((_, file, path)) = current.take() {
                    self.finish_file(file, path)?;
                }
                let path = self.target_dir.join(naming::title_vob_name(title_set, piece.vob));
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                let total_blocks = pieces
                    .iter()
                    .filter(|p| p.vob == piece.vob)
                    .map(|p| p.range.blocks())
                    .sum();
                (self.progress)(CopyProgress::FileStarted {
                    path: path.clone(),
                    total_blocks,
                });
                current = Some((piece.vob, file, path));
            }
            if let Some((vob, file, path)) = current.as_mut() {
                let what = naming::title_vob_name(title_set, *vob);
                let range = piece.range.start..piece.range.end;
                self.copy_blocks(stream.as_mut(), &what, range, file, path)?;
            }
        }

        if let Some((_, file, path)) = current {
            self.finish_file(file, path)?;
        }
        Ok(())
    }

    fn remove_title_vobs(&self, title_set: u8) -> Result<(), MirrorError> {
        for vob in 1..=MAX_TITLE_VOBS {
            let path = self.target_dir.join(naming::title_vob_name(title_set, vob));
            match fs::remove_file(&path) {
                Ok(()) => log::debug!("Removed stale {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Stream `blocks` (offsets in the source stream) into `file` in batches.
    ///
    /// A range that runs past the end of the stream fails before anything
    /// is read.
    fn copy_blocks(
        &mut self,
        stream: &mut dyn DvdStream,
        what: &str,
        blocks: std::ops::Range<u64>,
        file: &mut File,
        path: &Path,
    ) -> Result<(), MirrorError> {
        let available = stream.size_blocks();
        if blocks.end > available {
            return Err(MirrorError::ShortRead {
                what: what.to_string(),
                offset: blocks.start,
                expected: blocks.end - blocks.start,
                actual: available.saturating_sub(blocks.start),
            });
        }

        let block = LOGICAL_BLOCK_SIZE as usize;
        let mut buf = vec![0u8; self.batch_blocks * block];
        let mut offset = blocks.start;

        while offset < blocks.end {
            let count = (blocks.end - offset).min(self.batch_blocks as u64);
            let chunk = &mut buf[..count as usize * block];
            let read = stream.read_blocks(offset, chunk)? as u64;
            if read != count {
                return Err(MirrorError::ShortRead {
                    what: what.to_string(),
                    offset,
                    expected: count,
                    actual: read,
                });
            }
            file.write_all(chunk).map_err(|source| short_write(path, source))?;
            offset += count;
            self.blocks_copied += count;
            (self.progress)(CopyProgress::BlocksWritten { blocks: count });
        }
        Ok(())
    }

    fn finish_file(&mut self, mut file: File, path: PathBuf) -> Result<(), MirrorError> {
        file.flush().map_err(|source| short_write(&path, source))?;
        self.files_written += 1;
        log::debug!("Wrote {}", path.display());
        (self.progress)(CopyProgress::FileFinished { path });
        Ok(())
    }
}

fn short_write(path: &Path, source: io::Error) -> MirrorError {
    MirrorError::ShortWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Create (or truncate) a whole-file copy target. Only regular files may
/// be overwritten.
fn create_target(path: &Path) -> Result<File, MirrorError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => {
            log::warn!("{} exists, overwriting it", path.display());
        }
        Ok(_) => {
            return Err(MirrorError::config(format!(
                "{} exists and is not a regular file",
                path.display()
            )));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(File::create(path)?)
}

#[cfg(test)]
#[path = "tests/copier_tests.rs"]
mod tests;
