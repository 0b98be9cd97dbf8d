//! DVD-Video mirroring: catalog building, main-feature detection, chapter
//! resolution and block-exact copying.

pub mod chapters;
pub mod copier;
pub mod feature;
pub mod info;
pub mod metadata;
pub mod mirror;
pub mod settings;
pub mod title_name;

// Re-export core types so frontends only need this crate
pub use dvd_mirror_core::*;
pub use dvd_mirror_videots::VideoTsFolder;

pub use chapters::{CellRange, SectorRange, align_end_sectors, resolve_chapter_range};
pub use copier::Copier;
pub use feature::{AcceptRule, FeatureChoice, SizeTag, choose_main_feature, sizes_comparable};
pub use info::DiscReport;
pub use metadata::{build_file_layout_catalog, build_title_catalog};
pub use mirror::{MirrorMode, MirrorOptions, MirrorSummary, prepare_target, run_mirror};
pub use settings::Settings;
pub use title_name::resolve_title_name;

#[cfg(test)]
#[path = "tests/fake_disc.rs"]
pub(crate) mod fake_disc;
