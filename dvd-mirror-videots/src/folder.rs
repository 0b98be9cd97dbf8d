//! A [`DvdReader`] over a `VIDEO_TS` directory.
//!
//! Works with a mounted disc or any unencrypted folder copy of one. File
//! names are matched case-insensitively, since copies made on some systems
//! end up lower-cased.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use dvd_mirror_core::naming::{self, VIDEO_TS_DIR};
use dvd_mirror_core::{
    DvdReader, DvdStream, LOGICAL_BLOCK_SIZE, MAX_TITLE_VOBS, MirrorError, StreamKind,
    TitleSetInfo, VideoManagerInfo,
};

use crate::ifo;

/// A `VIDEO_TS` directory on the local file system.
#[derive(Debug)]
pub struct VideoTsFolder {
    root: PathBuf,
    /// Upper-cased file name -> actual path
    files: HashMap<String, PathBuf>,
}

impl VideoTsFolder {
    /// Open either a `VIDEO_TS` directory or a directory containing one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MirrorError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(MirrorError::metadata_unavailable(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let root = if is_video_ts_name(path) {
            path.to_path_buf()
        } else {
            find_video_ts_child(path)?.ok_or_else(|| {
                MirrorError::metadata_unavailable(format!(
                    "No {VIDEO_TS_DIR} directory found in {}",
                    path.display()
                ))
            })?
        };

        let mut files = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().to_string_lossy().to_uppercase();
                files.insert(name, entry.path());
            }
        }
        log::debug!("Opened {} ({} files)", root.display(), files.len());

        Ok(Self { root, files })
    }

    /// The resolved `VIDEO_TS` directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, file_name: &str) -> Option<&PathBuf> {
        self.files.get(&file_name.to_uppercase())
    }

    fn require(&self, file_name: &str) -> Result<&PathBuf, MirrorError> {
        self.path_of(file_name).ok_or_else(|| {
            MirrorError::metadata_unavailable(format!("{file_name} not found in {}", self.root.display()))
        })
    }

    /// Read and parse a domain's IFO, falling back to the BUP when the IFO
    /// is missing or does not parse.
    fn parse_info<T>(
        &self,
        title_set: u8,
        parse: impl Fn(&[u8]) -> Result<T, MirrorError>,
    ) -> Result<T, MirrorError> {
        let ifo_name = naming::info_file_name(title_set);
        let primary = self
            .require(&ifo_name)
            .and_then(|path| Ok(fs::read(path)?))
            .and_then(|data| parse(&data));

        match primary {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let bup_name = naming::backup_file_name(title_set);
                log::warn!("Could not use {ifo_name} ({e}), trying {bup_name}");
                let data = fs::read(self.require(&bup_name)?)?;
                parse(&data)
            }
        }
    }
}

fn is_video_ts_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(VIDEO_TS_DIR))
}

fn find_video_ts_child(parent: &Path) -> Result<Option<PathBuf>, MirrorError> {
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && is_video_ts_name(&entry.path()) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

impl DvdReader for VideoTsFolder {
    fn video_manager(&self) -> Result<VideoManagerInfo, MirrorError> {
        self.parse_info(0, ifo::parse_video_manager)
    }

    fn title_set_info(&self, title_set: u8) -> Result<TitleSetInfo, MirrorError> {
        if title_set == 0 {
            return Err(MirrorError::InvalidTitleSet {
                requested: 0,
                available: 0,
            });
        }
        self.parse_info(title_set, ifo::parse_title_set)
    }

    fn file_size(&self, path: &str) -> Option<u64> {
        let name = path.rsplit('/').next()?;
        let dir = path[..path.len() - name.len()].trim_matches('/');
        if !dir.is_empty() && !dir.eq_ignore_ascii_case(VIDEO_TS_DIR) {
            return None;
        }
        let file = self.path_of(name)?;
        fs::metadata(file).ok().map(|m| m.len())
    }

    fn open_stream(
        &self,
        title_set: u8,
        kind: StreamKind,
    ) -> Result<Box<dyn DvdStream + '_>, MirrorError> {
        let paths = match kind {
            StreamKind::TitleVobs => {
                if title_set == 0 {
                    return Err(MirrorError::metadata_unavailable(
                        "The video manager has no title VOBs",
                    ));
                }
                let paths: Vec<PathBuf> = (1..=MAX_TITLE_VOBS)
                    .map_while(|k| self.path_of(&naming::title_vob_name(title_set, k)).cloned())
                    .collect();
                if paths.is_empty() {
                    return Err(MirrorError::metadata_unavailable(format!(
                        "Title set {title_set} has no title VOBs"
                    )));
                }
                paths
            }
            _ => {
                let name = naming::file_name(title_set, kind, 0);
                vec![self.require(&name)?.clone()]
            }
        };
        let what = format!("{} of title set {title_set}", kind.description());
        Ok(Box::new(FileStream::new(what, paths)?))
    }
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

struct StreamPart {
    path: PathBuf,
    /// First block of this file within the stream
    start_block: u64,
    /// Length of the file in bytes
    len: u64,
    file: Option<File>,
}

impl StreamPart {
    fn blocks(&self) -> u64 {
        self.len / LOGICAL_BLOCK_SIZE
    }

    fn file(&mut self) -> Result<&mut File, MirrorError> {
        if self.file.is_none() {
            self.file = Some(File::open(&self.path)?);
        }
        self.file
            .as_mut()
            .ok_or_else(|| MirrorError::metadata_unavailable(self.path.display().to_string()))
    }
}

/// One or more consecutive files read as a single block stream.
struct FileStream {
    what: String,
    parts: Vec<StreamPart>,
    total_blocks: u64,
}

impl FileStream {
    fn new(what: String, paths: Vec<PathBuf>) -> Result<Self, MirrorError> {
        let mut parts = Vec::with_capacity(paths.len());
        let mut start_block = 0;
        for path in paths {
            let len = fs::metadata(&path)?.len();
            let part = StreamPart {
                path,
                start_block,
                len,
                file: None,
            };
            start_block += part.blocks();
            parts.push(part);
        }
        Ok(Self {
            what,
            parts,
            total_blocks: start_block,
        })
    }
}

impl DvdStream for FileStream {
    fn size_blocks(&self) -> u64 {
        self.total_blocks
    }

    fn read_blocks(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, MirrorError> {
        let block = LOGICAL_BLOCK_SIZE as usize;
        if buf.len() % block != 0 {
            return Err(MirrorError::malformed(format!(
                "Read buffer for {} is not a whole number of blocks",
                self.what
            )));
        }
        let wanted = (buf.len() / block) as u64;
        let mut done = 0u64;

        while done < wanted {
            let current = offset + done;
            let Some(part) = self
                .parts
                .iter_mut()
                .find(|p| current >= p.start_block && current < p.start_block + p.blocks())
            else {
                break;
            };

            let within = current - part.start_block;
            let count = (part.blocks() - within).min(wanted - done);
            let dest = &mut buf[(done as usize) * block..((done + count) as usize) * block];

            let file = part.file()?;
            file.seek(SeekFrom::Start(within * LOGICAL_BLOCK_SIZE))?;
            file.read_exact(dest)?;
            done += count;
        }

        Ok(done as usize)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, MirrorError> {
        let mut filled = 0;
        for part in &mut self.parts {
            if filled == buf.len() {
                break;
            }
            let take = (part.len as usize).min(buf.len() - filled);
            let file = part.file()?;
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut buf[filled..filled + take])?;
            filled += take;
        }
        Ok(filled)
    }
}

#[cfg(test)]
#[path = "tests/folder_tests.rs"]
mod tests;
