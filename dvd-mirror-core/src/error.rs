use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a disc or writing its mirror.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// A required on-disc structure (IFO table, info or backup file) could not be opened
    #[error("Disc metadata unavailable: {0}")]
    DiscMetadataUnavailable(String),

    /// An on-disc table was present but truncated or inconsistent
    #[error("Malformed disc metadata: {0}")]
    MalformedMetadata(String),

    /// A file or stream size is not a multiple of the logical block size
    #[error("{what} of title set {title_set} has size {size}, which is not a multiple of 2048")]
    InvalidSize {
        what: String,
        title_set: u8,
        size: u64,
    },

    /// I/O error while reading the disc or writing the target
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The disc returned fewer blocks than requested
    #[error("Short read from {what}: expected {expected} blocks at offset {offset}, got {actual}")]
    ShortRead {
        what: String,
        offset: u64,
        expected: u64,
        actual: u64,
    },

    /// The target accepted fewer bytes than were written
    #[error("Short write to {}: {source}", path.display())]
    ShortWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Requested chapter range cannot be satisfied, even after clamping
    #[error("Invalid chapter range: {0}")]
    InvalidChapter(String),

    /// Requested title set does not exist on the disc
    #[error("Title set {requested} does not exist, the disc has {available}")]
    InvalidTitleSet { requested: u8, available: u8 },

    /// Requested title does not exist on the disc
    #[error("Title {requested} does not exist, the disc has {available}")]
    InvalidTitle { requested: u16, available: u16 },

    /// The disc has no title sets to pick a main feature from
    #[error("The disc has no title sets")]
    NoTitleSets,

    /// The volume label is too generic to name the backup
    #[error("The volume label '{0}' is too generic, provide a title name")]
    GenericTitleName(String),

    /// No volume label could be read and no explicit title name was given
    #[error("Could not read a volume label ({0}), provide a title name")]
    TitleNameUnavailable(String),

    /// Invalid configuration or target path
    #[error("Config error: {0}")]
    Config(String),
}

impl MirrorError {
    pub fn metadata_unavailable(msg: impl Into<String>) -> Self {
        Self::DiscMetadataUnavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMetadata(msg.into())
    }

    pub fn invalid_size(what: impl Into<String>, title_set: u8, size: u64) -> Self {
        Self::InvalidSize {
            what: what.into(),
            title_set,
            size,
        }
    }

    pub fn invalid_chapter(msg: impl Into<String>) -> Self {
        Self::InvalidChapter(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by title-name resolution rather than the copy itself.
    pub fn is_title_name_error(&self) -> bool {
        matches!(
            self,
            Self::GenericTitleName(_) | Self::TitleNameUnavailable(_)
        )
    }
}
