//! The disc-reader boundary.
//!
//! Everything above this module talks to a disc only through [`DvdReader`]
//! and the [`DvdStream`]s it opens. A reader may be backed by a mounted
//! disc, a folder copy of one, or an in-memory fake in tests.

use crate::error::MirrorError;
use crate::nav::{TitleSetInfo, VideoManagerInfo};

/// Size of a DVD logical block in bytes.
pub const LOGICAL_BLOCK_SIZE: u64 = 2048;

/// Which file family of a domain a stream covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// `VIDEO_TS.IFO` / `VTS_nn_0.IFO`
    InfoFile,
    /// `VIDEO_TS.BUP` / `VTS_nn_0.BUP`
    BackupFile,
    /// `VIDEO_TS.VOB` / `VTS_nn_0.VOB`
    MenuVobs,
    /// `VTS_nn_1.VOB` .. `VTS_nn_9.VOB`, addressed as one contiguous stream
    TitleVobs,
}

impl StreamKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::InfoFile => "IFO",
            Self::BackupFile => "BUP",
            Self::MenuVobs => "menu VOB",
            Self::TitleVobs => "title VOB",
        }
    }
}

/// An open content stream of one domain.
pub trait DvdStream {
    /// Total size of the stream in logical blocks.
    fn size_blocks(&self) -> u64;

    /// Read whole blocks starting at `offset` (in blocks from the start of
    /// the stream) into `buf`, whose length must be a multiple of
    /// [`LOGICAL_BLOCK_SIZE`].
    ///
    /// Returns the number of blocks read, which is smaller than requested
    /// only at the end of the stream.
    fn read_blocks(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, MirrorError>;

    /// Read up to `buf.len()` bytes from the start of the stream.
    ///
    /// Returns the number of bytes read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, MirrorError>;
}

/// A source of DVD-Video structures and content.
pub trait DvdReader {
    /// Read the video manager's title search pointers and attribute table.
    fn video_manager(&self) -> Result<VideoManagerInfo, MirrorError>;

    /// Read the chapter and program chain tables of a title set (1-based).
    fn title_set_info(&self, title_set: u8) -> Result<TitleSetInfo, MirrorError>;

    /// Look up a file on the disc by absolute path (e.g. `/VIDEO_TS/VTS_01_1.VOB`)
    /// and return its size in bytes, or `None` when it does not exist.
    fn file_size(&self, path: &str) -> Option<u64>;

    /// Open a content stream. `title_set` 0 addresses the video manager.
    fn open_stream(
        &self,
        title_set: u8,
        kind: StreamKind,
    ) -> Result<Box<dyn DvdStream + '_>, MirrorError>;
}
