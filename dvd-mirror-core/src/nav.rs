//! Navigation and attribute tables as delivered by a disc reader.
//!
//! These mirror the subset of the IFO structures the mirror needs: the
//! video manager's title search pointers and per-title-set attributes, and a
//! title set's chapter (PTT) and program chain tables. Readers fill them in;
//! the rest of the workspace only consumes them.

use serde::Serialize;

/// Display aspect ratio of a title set's video stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AspectRatio {
    /// Code 0
    Standard,
    /// Code 3
    #[default]
    Widescreen,
    /// Any reserved code (1 or 2)
    Unknown(u8),
}

impl AspectRatio {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Standard,
            3 => Self::Widescreen,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Widescreen => 3,
            Self::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "4:3",
            Self::Widescreen => "16:9",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Error returned when an aspect ratio name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectParseError(pub String);

impl std::fmt::Display for AspectParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown aspect ratio: '{}' (use 16:9, 4:3, 3 or 0)", self.0)
    }
}

impl std::error::Error for AspectParseError {}

impl std::str::FromStr for AspectRatio {
    type Err = AspectParseError;

    /// Parse `16:9` / `4:3` or the on-disc codes `3` / `0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" | "3" => Ok(Self::Widescreen),
            "4:3" | "0" => Ok(Self::Standard),
            _ => Err(AspectParseError(s.to_string())),
        }
    }
}

/// One entry of the video manager's title search pointer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSearchEntry {
    /// Owning title set (1-based)
    pub title_set: u8,
    /// Title number inside the owning title set (1-based)
    pub vts_title: u8,
    /// Number of chapters (parts of title)
    pub chapters: u16,
    /// Number of camera angles
    pub angles: u8,
}

/// Attributes of a single audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioAttributes {
    /// Channel count (already converted from the on-disc `n - 1` encoding)
    pub channels: u8,
}

/// Title-domain attributes of one title set, from the video manager's
/// attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSetAttributes {
    pub aspect_ratio: AspectRatio,
    pub audio_streams: Vec<AudioAttributes>,
    pub subpicture_streams: u8,
}

impl TitleSetAttributes {
    /// Highest channel count over all audio streams, 0 without audio.
    pub fn max_audio_channels(&self) -> u8 {
        self.audio_streams
            .iter()
            .map(|a| a.channels)
            .max()
            .unwrap_or(0)
    }
}

/// Tables read from `VIDEO_TS.IFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoManagerInfo {
    /// Number of title sets declared by the video manager
    pub title_set_count: u8,
    /// Title search pointers, one per title, in title order
    pub titles: Vec<TitleSearchEntry>,
    /// Attribute table, one entry per title set in title-set order
    pub title_set_attributes: Vec<TitleSetAttributes>,
}

/// A chapter entry: which program chain and program it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartOfTitle {
    /// Program chain number (1-based)
    pub pgcn: u16,
    /// Program number within that chain (1-based)
    pub pgn: u16,
}

/// Sector span of a cell within the title set's title-VOB stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlayback {
    pub first_sector: u32,
    pub last_sector: u32,
}

/// A program chain: its program-to-cell map and its cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramChain {
    /// Entry cell number (1-based) for each program
    pub program_map: Vec<u8>,
    /// Cells in playback order
    pub cells: Vec<CellPlayback>,
}

/// Tables read from a `VTS_nn_0.IFO`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSetInfo {
    /// Chapter list for each title in the set, indexed by `vts_title - 1`
    pub parts_of_title: Vec<Vec<PartOfTitle>>,
    /// Title-domain program chains, indexed by `pgcn - 1`
    pub program_chains: Vec<ProgramChain>,
}

#[cfg(test)]
#[path = "tests/nav_tests.rs"]
mod tests;
