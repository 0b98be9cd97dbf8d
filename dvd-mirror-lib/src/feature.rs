//! Main-feature detection.
//!
//! Ranks title sets by chapter count, size, audio tracks, subpictures and
//! audio channels, then walks a fixed ladder of acceptance rules. The result
//! is a best guess: deterministic for a given disc, but not guaranteed to be
//! the title a human would pick.

use serde::Serialize;

use dvd_mirror_core::{AspectRatio, FileLayoutCatalog, TitleCatalog, TitleSetSummary};

/// Number of chapter-ranking entries a candidate may appear in to get a rank.
const CHAPTER_RANK_WINDOW: usize = 4;
/// Chapter rank used when the candidate is not in the window on the first pass.
const FIRST_PASS_UNRANKED: usize = 6;
/// Chapter rank used when the candidate is not in the window on the fallback pass.
const FALLBACK_UNRANKED: usize = 5;
/// Score when the candidate leads all of audio, subpicture and channel rankings.
const FULL_SCORE: u8 = 3;

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// A ranked value and the title set it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    pub value: u64,
    pub owner: u8,
}

/// Entries sorted by descending value.
///
/// Equal values end up in the order left by a pairwise exchange sort over
/// the inserted entries, not in insertion order. Chapter rank and the
/// chapter leader depend on that order when values tie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    entries: Vec<RankEntry>,
}

impl Ranking {
    pub fn new(pairs: impl IntoIterator<Item = (u64, u8)>) -> Self {
        let mut entries: Vec<RankEntry> = pairs
            .into_iter()
            .map(|(value, owner)| RankEntry { value, owner })
            .collect();
        exchange_sort_descending(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<RankEntry> {
        self.entries.get(index).copied()
    }

    /// The prefix of entries whose value ties the top value.
    pub fn leaders(&self) -> &[RankEntry] {
        let Some(top) = self.entries.first() else {
            return &[];
        };
        let end = self
            .entries
            .iter()
            .position(|e| e.value < top.value)
            .unwrap_or(self.entries.len());
        &self.entries[..end]
    }

    pub fn is_leader(&self, owner: u8) -> bool {
        self.leaders().iter().any(|e| e.owner == owner)
    }

    /// 1-based position of the first entry owned by `owner` among the first
    /// `window` entries.
    pub fn rank_within(&self, owner: u8, window: usize) -> Option<usize> {
        self.entries
            .iter()
            .take(window)
            .position(|e| e.owner == owner)
            .map(|i| i + 1)
    }
}

/// Swap every pair `(i, j)` where entry `i` outranks entry `j`, for all `i`
/// and `j`. The result is descending; ties are not kept stable.
fn exchange_sort_descending(entries: &mut [RankEntry]) {
    for i in 0..entries.len() {
        for j in 0..entries.len() {
            if entries[i].value > entries[j].value {
                entries.swap(i, j);
            }
        }
    }
}

/// The six rankings the heuristic works from.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    /// Chapter count per title, owned by the title's title set
    pub chapters: Ranking,
    /// Angle count per title
    pub angles: Ranking,
    pub subpictures: Ranking,
    pub audio_tracks: Ranking,
    /// Total title-VOB bytes per title set
    pub sizes: Ranking,
    /// Highest audio channel count per title set
    pub channels: Ranking,
}

impl Rankings {
    pub fn build(titles: &TitleCatalog, layout: &FileLayoutCatalog) -> Self {
        let per_set = |f: fn(&TitleSetSummary) -> u64| {
            Ranking::new(titles.title_sets.iter().map(|s| (f(s), s.title_set)))
        };
        Self {
            chapters: Ranking::new(
                titles
                    .titles
                    .iter()
                    .map(|t| (u64::from(t.chapters), t.title_set)),
            ),
            angles: Ranking::new(
                titles
                    .titles
                    .iter()
                    .map(|t| (u64::from(t.angles), t.title_set)),
            ),
            subpictures: per_set(|s| u64::from(s.subpictures)),
            audio_tracks: per_set(|s| u64::from(s.audio_tracks)),
            channels: per_set(|s| u64::from(s.audio_channels)),
            sizes: Ranking::new((1..=layout.title_set_count()).map(|ts| {
                let bytes = layout.get(ts).map_or(0, |l| l.total_vob_bytes());
                (bytes, ts)
            })),
        }
    }

    /// Number of the audio, subpicture and channel rankings that
    /// `candidate` leads (0..=3).
    pub fn score(&self, candidate: u8) -> u8 {
        [&self.audio_tracks, &self.subpictures, &self.channels]
            .iter()
            .filter(|r| r.is_leader(candidate))
            .count() as u8
    }

    /// Position of `candidate` among the top chapter entries, or `unranked`.
    pub fn chapter_rank(&self, candidate: u8, unranked: usize) -> usize {
        self.chapters
            .rank_within(candidate, CHAPTER_RANK_WINDOW)
            .unwrap_or(unranked)
    }
}

/// Dual-feature size test: sizes `a >= b` are comparable when `b` is close
/// enough to `a` to be a second feature. A zero `b` is never comparable.
pub fn sizes_comparable(a: u64, b: u64) -> bool {
    if b == 0 {
        return false;
    }
    a / b == 1 && (a.saturating_mul(2) - b) / b == 1 && (a % b).saturating_mul(3) < a
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// How the two largest title sets relate in size and aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTag {
    /// The largest title set stands alone
    Single,
    /// Comparable sizes with the same aspect ratio, e.g. a disc of episodes
    Multi,
    /// Comparable sizes, equal chapter counts, different aspect ratios
    Dual,
}

/// The acceptance rule that settled the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptRule {
    /// Full score and the most chapters
    Unanimous,
    /// Full score on the aspect-matched side of a dual disc
    DualAspect,
    /// Full score for the chapter leader among comparable title sets
    MultiChapterLeader,
    /// The largest title set, with a strong enough score
    LargestScored,
    /// The largest title set, for lack of anything better
    LargestFallback,
}

impl AcceptRule {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unanimous => "leads audio, subpictures, channels and chapters",
            Self::DualAspect => "preferred aspect of a dual-format disc",
            Self::MultiChapterLeader => "chapter leader among similar-sized title sets",
            Self::LargestScored => "largest title set with leading attributes",
            Self::LargestFallback => "largest title set",
        }
    }
}

/// Result of the main-feature heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureChoice {
    pub title_set: u8,
    pub rule: AcceptRule,
    /// Score of the accepted candidate (0..=3)
    pub score: u8,
    /// Chapter rank of the accepted candidate
    pub chapter_rank: usize,
    pub tag: SizeTag,
}

/// Pick the title set most likely to hold the main feature.
///
/// Returns `None` when the disc has no title sets.
pub fn choose_main_feature(
    titles: &TitleCatalog,
    layout: &FileLayoutCatalog,
    preferred_aspect: AspectRatio,
) -> Option<FeatureChoice> {
    let rankings = Rankings::build(titles, layout);
    let largest = rankings.sizes.get(0)?;
    let aspect_of = |ts: u8| titles.summary(ts).map(|s| s.aspect_ratio);

    let mut tag = SizeTag::Single;
    let mut candidate = largest.owner;

    if let Some(second) = rankings.sizes.get(1)
        && sizes_comparable(largest.value, second.value)
    {
        let (aspect_a, aspect_b) = (aspect_of(largest.owner), aspect_of(second.owner));
        if aspect_a == aspect_b {
            tag = SizeTag::Multi;
        } else if titles.max_chapters_in_set(largest.owner)
            == titles.max_chapters_in_set(second.owner)
        {
            tag = SizeTag::Dual;
            if aspect_a == Some(preferred_aspect) {
                candidate = largest.owner;
            } else if aspect_b == Some(preferred_aspect) {
                candidate = second.owner;
            } else {
                log::warn!(
                    "Neither of the two feature-sized title sets ({} and {}) has the preferred {} aspect ratio, using the larger one",
                    largest.owner,
                    second.owner,
                    preferred_aspect.label()
                );
            }
        }
    }

    let score = rankings.score(candidate);
    let chapter_rank = rankings.chapter_rank(candidate, FIRST_PASS_UNRANKED);
    log::debug!(
        "Main feature candidate: title set {candidate} ({tag:?}), score {score}, chapter rank {chapter_rank}"
    );

    let choice = |title_set, rule, score, chapter_rank| FeatureChoice {
        title_set,
        rule,
        score,
        chapter_rank,
        tag,
    };

    if score == FULL_SCORE && chapter_rank == 1 && tag == SizeTag::Single {
        return Some(choice(candidate, AcceptRule::Unanimous, score, chapter_rank));
    }
    if score == FULL_SCORE && chapter_rank < 3 && tag == SizeTag::Dual {
        return Some(choice(candidate, AcceptRule::DualAspect, score, chapter_rank));
    }

    if tag == SizeTag::Multi {
        // The chapter leader is adopted by title set number, not by its
        // place in the size ranking.
        let number_of_multi = comparable_run(&rankings.sizes).len() - 1;
        if let Some(leader) = rankings.chapters.get(0)
            && (1..=number_of_multi).contains(&usize::from(leader.owner))
        {
            candidate = leader.owner;
        }
        let score = rankings.score(candidate);
        if score == FULL_SCORE {
            let chapter_rank = rankings.chapter_rank(candidate, FIRST_PASS_UNRANKED);
            return Some(choice(
                candidate,
                AcceptRule::MultiChapterLeader,
                score,
                chapter_rank,
            ));
        }
    }

    let candidate = largest.owner;
    let score = rankings.score(candidate);
    let chapter_rank = rankings.chapter_rank(candidate, FALLBACK_UNRANKED);
    let rule = if score == FULL_SCORE || (score > 1 && chapter_rank <= CHAPTER_RANK_WINDOW) {
        AcceptRule::LargestScored
    } else {
        AcceptRule::LargestFallback
    };
    Some(choice(candidate, rule, score, chapter_rank))
}

/// The largest entry of the size ranking followed by every next entry that
/// stays comparable to it.
fn comparable_run(sizes: &Ranking) -> &[RankEntry] {
    let entries = sizes.entries();
    let Some(largest) = entries.first() else {
        return entries;
    };
    let extra = entries[1..]
        .iter()
        .take_while(|e| sizes_comparable(largest.value, e.value))
        .count();
    &entries[..=extra]
}

#[cfg(test)]
#[path = "tests/feature_tests.rs"]
mod tests;
