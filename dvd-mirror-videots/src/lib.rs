//! DVD-Video structure reading from a `VIDEO_TS` directory.

pub mod folder;
pub mod ifo;

pub use folder::VideoTsFolder;

#[cfg(test)]
#[path = "tests/ifo_builder.rs"]
pub(crate) mod ifo_builder;
