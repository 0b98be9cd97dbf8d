use std::path::PathBuf;

/// Progress events emitted while a mirror runs.
#[derive(Debug, Clone)]
pub enum CopyProgress {
    /// A title set is about to be mirrored (0 is the video manager).
    TitleSetStarted { title_set: u8 },
    /// A target file is about to be written.
    FileStarted {
        path: PathBuf,
        /// Total blocks that will be written to this file
        total_blocks: u64,
    },
    /// A batch of blocks has been written to the current file.
    BlocksWritten { blocks: u64 },
    /// The current file is complete.
    FileFinished { path: PathBuf },
    /// The whole mirror is complete.
    Done,
}
