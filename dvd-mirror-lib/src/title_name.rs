//! Naming the backup directory.
//!
//! The name is either given explicitly or read from the volume label of the
//! disc's first track.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use dvd_mirror_core::MirrorError;

/// Byte offset of the volume identifier in the primary volume descriptor.
pub const VOLUME_LABEL_OFFSET: u64 = 32808;
/// Length of the volume identifier, and the longest name used for a backup.
pub const VOLUME_LABEL_LEN: usize = 32;

/// Labels containing this are too generic to name a backup after.
const GENERIC_LABEL: &str = "DVD_VIDEO";

/// Extract a label from the raw volume identifier bytes, dropping trailing
/// spaces and padding.
pub fn parse_volume_label(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Read the volume label of a disc device or image.
pub fn probe_volume_label(device: &Path) -> Result<String, MirrorError> {
    let unavailable = MirrorError::TitleNameUnavailable;
    if device.is_dir() {
        return Err(unavailable(format!(
            "{} is a directory, not a disc device or image",
            device.display()
        )));
    }

    let mut file = File::open(device)
        .map_err(|e| unavailable(format!("cannot open {}: {e}", device.display())))?;
    file.seek(SeekFrom::Start(VOLUME_LABEL_OFFSET))
        .map_err(|e| unavailable(format!("cannot seek {}: {e}", device.display())))?;
    let mut raw = [0u8; VOLUME_LABEL_LEN];
    file.read_exact(&mut raw)
        .map_err(|e| unavailable(format!("cannot read the label of {}: {e}", device.display())))?;

    Ok(parse_volume_label(&raw))
}

/// Check a volume label for use as a backup name.
pub fn validate_label(label: String) -> Result<String, MirrorError> {
    if label.is_empty() {
        return Err(MirrorError::TitleNameUnavailable(
            "the volume label is empty".to_string(),
        ));
    }
    if label.contains(GENERIC_LABEL) {
        return Err(MirrorError::GenericTitleName(label));
    }
    Ok(label)
}

/// Check and shorten an explicitly given backup name.
pub fn validate_explicit_name(name: &str) -> Result<String, MirrorError> {
    if name.trim().is_empty() {
        return Err(MirrorError::config("the title name is empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(MirrorError::config(format!(
            "the title name '{name}' is not a valid directory name"
        )));
    }
    if name.len() <= VOLUME_LABEL_LEN {
        return Ok(name.to_string());
    }

    let mut cut = VOLUME_LABEL_LEN;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &name[..cut];
    log::warn!("Title name '{name}' is longer than {VOLUME_LABEL_LEN} bytes, using '{truncated}'");
    Ok(truncated.to_string())
}

/// Resolve the name of the backup directory: the explicit name when given,
/// otherwise the volume label of `device`.
pub fn resolve_title_name(explicit: Option<&str>, device: &Path) -> Result<String, MirrorError> {
    match explicit {
        Some(name) => validate_explicit_name(name),
        None => {
            let label = validate_label(probe_volume_label(device)?)?;
            log::info!("Using volume label '{label}' as the title name");
            Ok(label)
        }
    }
}

#[cfg(test)]
#[path = "tests/title_name_tests.rs"]
mod tests;
