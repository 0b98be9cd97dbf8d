pub mod catalog;
pub mod disc;
pub mod error;
pub mod naming;
pub mod nav;
pub mod progress;

pub use catalog::{
    FileLayoutCatalog, MAX_TITLE_VOBS, TitleCatalog, TitleRecord, TitleSetLayout, TitleSetSummary,
};
pub use disc::{DvdReader, DvdStream, LOGICAL_BLOCK_SIZE, StreamKind};
pub use error::MirrorError;
pub use nav::{
    AspectParseError, AspectRatio, AudioAttributes, CellPlayback, PartOfTitle, ProgramChain,
    TitleSearchEntry, TitleSetAttributes, TitleSetInfo, VideoManagerInfo,
};
pub use progress::CopyProgress;

/// Default number of logical blocks moved per read/write batch.
pub const DEFAULT_BATCH_BLOCKS: usize = 512;
