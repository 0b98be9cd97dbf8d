use crate::disc::StreamKind;

/// Name of the directory holding the DVD-Video files, on disc and in the mirror.
pub const VIDEO_TS_DIR: &str = "VIDEO_TS";

/// File name of a domain file.
///
/// Title set 0 is the video manager (`VIDEO_TS.*`). For other title sets,
/// `vob` selects the VOB number (0 for the menu, 1..=9 for title VOBs) and is
/// only consulted for VOB kinds.
pub fn file_name(title_set: u8, kind: StreamKind, vob: usize) -> String {
    let ext = match kind {
        StreamKind::InfoFile => "IFO",
        StreamKind::BackupFile => "BUP",
        StreamKind::MenuVobs | StreamKind::TitleVobs => "VOB",
    };
    if title_set == 0 {
        return format!("VIDEO_TS.{ext}");
    }
    let number = match kind {
        StreamKind::InfoFile | StreamKind::BackupFile | StreamKind::MenuVobs => 0,
        StreamKind::TitleVobs => vob,
    };
    format!("VTS_{title_set:02}_{number}.{ext}")
}

pub fn info_file_name(title_set: u8) -> String {
    file_name(title_set, StreamKind::InfoFile, 0)
}

pub fn backup_file_name(title_set: u8) -> String {
    file_name(title_set, StreamKind::BackupFile, 0)
}

pub fn menu_vob_name(title_set: u8) -> String {
    file_name(title_set, StreamKind::MenuVobs, 0)
}

/// `VTS_nn_k.VOB` for `vob` in 1..=9.
pub fn title_vob_name(title_set: u8, vob: usize) -> String {
    file_name(title_set, StreamKind::TitleVobs, vob)
}

/// Absolute path of a file on the disc, as passed to `DvdReader::file_size`.
pub fn disc_path(file_name: &str) -> String {
    format!("/{VIDEO_TS_DIR}/{file_name}")
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
