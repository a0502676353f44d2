use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sentinel season number for matches without season information
/// (e.g. multi-part specials).
pub const NO_SEASON: i32 = -1;

/// A successful filename match: season, one or more episode numbers, and
/// the file the match came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub season: i32,
    /// Episode numbers in filename order of appearance, not numeric order.
    pub episodes: Vec<i32>,
    pub path: Option<PathBuf>,
}

impl EpisodeMatch {
    /// Create a match without a file reference.
    pub fn new(season: i32, episodes: Vec<i32>) -> Self {
        Self {
            season,
            episodes,
            path: None,
        }
    }

    /// Attach the source file this match was derived from.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Smallest episode number in the match.
    pub fn min_episode(&self) -> i32 {
        self.episodes.iter().copied().min().unwrap_or(0)
    }

    /// Largest episode number in the match.
    pub fn max_episode(&self) -> i32 {
        self.episodes.iter().copied().max().unwrap_or(0)
    }

    /// The closed episode-number span covered by this match.
    pub fn span(&self) -> Range {
        Range::new(self.min_episode(), self.max_episode())
    }

    /// Whether the match covers the given episode number exactly.
    pub fn contains(&self, episode: i32) -> bool {
        self.episodes.contains(&episode)
    }

    /// Sort key for batch results: season first, then lowest episode.
    pub fn sort_key(&self) -> (i32, i32) {
        (self.season, self.min_episode())
    }
}

impl fmt::Display for EpisodeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.season != NO_SEASON {
            write!(f, "s{:02}", self.season)?;
        }
        for episode in &self.episodes {
            write!(f, "e{:02}", episode)?;
        }
        Ok(())
    }
}

/// Closed interval `[start, end]` over episode numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Range {
    pub start: i32,
    pub end: i32,
}

impl Range {
    /// Create a closed range. `start` must not exceed `end`.
    pub fn new(start: i32, end: i32) -> Self {
        debug_assert!(start <= end, "range start {} exceeds end {}", start, end);
        Self { start, end }
    }

    /// Sentinel "from `start` onward" range.
    pub fn from(start: i32) -> Self {
        Self {
            start,
            end: i32::MAX,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.start && value <= self.end
    }

    /// Whether two closed ranges share at least one value.
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Cross-season interval `(start_season, start_episode) ..
/// (end_season, end_episode)`, inclusive at both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeRange {
    pub start_season: i32,
    pub start_episode: i32,
    pub end_season: i32,
    pub end_episode: i32,
}

impl EpisodeRange {
    pub fn new(start_season: i32, start_episode: i32, end_season: i32, end_episode: i32) -> Self {
        Self {
            start_season,
            start_episode,
            end_season,
            end_episode,
        }
    }

    /// Collapse to a plain episode range when both endpoints are in the
    /// same season.
    pub fn as_range(&self) -> Option<Range> {
        (self.start_season == self.end_season)
            .then(|| Range::new(self.start_episode, self.end_episode))
    }
}

impl fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{:02}e{:02}-", self.start_season, self.start_episode)?;
        // Open-ended "from episode N" ranges render without an endpoint.
        if self.end_episode != i32::MAX {
            write!(f, "s{:02}e{:02}", self.end_season, self.end_episode)?;
        }
        Ok(())
    }
}

/// A season of a show as found on disk. A missing `dir` means the season
/// does not exist in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub number: i32,
    pub dir: Option<PathBuf>,
}

impl PartialOrd for Season {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Season {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.number.cmp(&other.number)
    }
}
