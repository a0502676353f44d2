use regex::Regex;
use std::path::Path;

use crate::episode::{EpisodeMatch, NO_SEASON};

/// The five filename matching strategies, in priority order. The order is
/// a property of the call site (see [`DEFAULT_ORDER`]), not of this enum,
/// so tests can subset or reorder deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `s01e02`, including multi-episode forms like `s01e02e03` and
    /// `s01e02-s01e03`.
    SeasonEpisode,
    /// `1x02`, including multi-episode forms like `1x02x03` and `1x02-1x03`.
    XDelimited,
    /// `episode 5` / `ep5` / `e5`, with the season taken from an explicit
    /// `season 2` token or from a `Season 2` directory in the path.
    WordDelimited,
    /// Bare `<digits><sep?><2 digits>` with no marker at all, e.g. `0102`.
    NoDelimiter,
    /// `part 2` / `pt II` multi-part specials without season numbering.
    PartDelimited,
}

/// The fixed production priority order: first success wins.
pub const DEFAULT_ORDER: &[Strategy] = &[
    Strategy::SeasonEpisode,
    Strategy::XDelimited,
    Strategy::WordDelimited,
    Strategy::NoDelimiter,
    Strategy::PartDelimited,
];

/// Compiled regexes for all strategies. Built once and reused across files.
#[derive(Debug, Clone)]
pub struct PatternSet {
    season_episode: Regex,
    season_episode_tail: Regex,
    x_delimited: Regex,
    x_delimited_tail: Regex,
    word: Regex,
    word_tail: Regex,
    path_season: Regex,
    no_delimiter: Regex,
    part: Regex,
}

impl PatternSet {
    pub fn new() -> Self {
        Self {
            // Separators accepted between and around markers: . - _ space + x
            season_episode: Regex::new(r"(?i)s(\d+)[ ._x+-]*e(\d+)").unwrap(),
            // Anchored continuation for extra episodes in the same filename,
            // optionally re-prefixed with a season marker.
            season_episode_tail: Regex::new(r"(?i)^[ ._x+-]*(?:s\d+[ ._x+-]*)?e(\d+)").unwrap(),
            x_delimited: Regex::new(r"(?i)(\d+)[ ._+-]*x[ ._+-]*(\d+)").unwrap(),
            // Trailing xNN captures; a leading season digit group is ignored.
            x_delimited_tail: Regex::new(r"(?i)^[ ._+-]*(?:\d+[ ._+-]*)?x[ ._+-]*(\d+)").unwrap(),
            word: Regex::new(r"(?i)\b(?:season[ ._-]*(\d+)[ ._-]*)?(?:episode|ep|e)[ ._-]*(\d+)")
                .unwrap(),
            word_tail: Regex::new(r"(?i)^[ ._-]*(?:episode|ep|e)[ ._-]*(\d+)").unwrap(),
            path_season: Regex::new(r"(?i)\b(?:season|series)[ ._-]*(\d+)").unwrap(),
            no_delimiter: Regex::new(r"(\d{1,2})[ ._-]?(\d{2})").unwrap(),
            part: Regex::new(r"(?i)\b(?:part|pt)[ ._-]*(\d+|[ivxlcdm]+)\b").unwrap(),
        }
    }

    /// Try a single strategy against a tag-stripped filename. The full path
    /// is only consulted by the word-delimited strategy, which may recover
    /// the season number from a parent directory.
    pub fn apply(&self, strategy: Strategy, path: &Path, stripped: &str) -> Option<EpisodeMatch> {
        match strategy {
            Strategy::SeasonEpisode => self.match_season_episode(stripped),
            Strategy::XDelimited => self.match_x_delimited(stripped),
            Strategy::WordDelimited => self.match_word_delimited(path, stripped),
            Strategy::NoDelimiter => self.match_no_delimiter(stripped),
            Strategy::PartDelimited => self.match_part_delimited(stripped),
        }
    }

    fn match_season_episode(&self, stripped: &str) -> Option<EpisodeMatch> {
        let caps = self.season_episode.captures(stripped)?;
        let season: i32 = caps[1].parse().ok()?;
        let mut episodes = vec![caps[2].parse().ok()?];

        let mut rest = &stripped[caps.get(0)?.end()..];
        while let Some(tail) = self.season_episode_tail.captures(rest) {
            episodes.push(tail[1].parse().ok()?);
            rest = &rest[tail.get(0)?.end()..];
        }

        Some(EpisodeMatch::new(season, episodes))
    }

    fn match_x_delimited(&self, stripped: &str) -> Option<EpisodeMatch> {
        let caps = self.x_delimited.captures(stripped)?;
        let season: i32 = caps[1].parse().ok()?;
        let mut episodes = vec![caps[2].parse().ok()?];

        let mut rest = &stripped[caps.get(0)?.end()..];
        while let Some(tail) = self.x_delimited_tail.captures(rest) {
            episodes.push(tail[1].parse().ok()?);
            rest = &rest[tail.get(0)?.end()..];
        }

        Some(EpisodeMatch::new(season, episodes))
    }

    fn match_word_delimited(&self, path: &Path, stripped: &str) -> Option<EpisodeMatch> {
        let caps = self.word.captures(stripped)?;

        // Season from the explicit token, else recovered from the directory
        // path; a file with neither does not match this strategy.
        let season: i32 = match caps.get(1) {
            Some(explicit) => explicit.as_str().parse().ok()?,
            None => self.season_from_path(path)?,
        };
        let mut episodes = vec![caps[2].parse().ok()?];

        let mut rest = &stripped[caps.get(0)?.end()..];
        while let Some(tail) = self.word_tail.captures(rest) {
            episodes.push(tail[1].parse().ok()?);
            rest = &rest[tail.get(0)?.end()..];
        }

        Some(EpisodeMatch::new(season, episodes))
    }

    /// Find a `Season N` / `Series N` token in the file's ancestor
    /// directories, deepest component winning.
    fn season_from_path(&self, path: &Path) -> Option<i32> {
        let mut season = None;
        for component in path.parent()?.components() {
            let name = component.as_os_str().to_string_lossy();
            if let Some(caps) = self.path_season.captures(&name) {
                season = caps[1].parse().ok();
            }
        }
        season
    }

    fn match_no_delimiter(&self, stripped: &str) -> Option<EpisodeMatch> {
        // First occurrence only; this strategy never yields multi-episode
        // matches.
        let caps = self.no_delimiter.captures(stripped)?;
        let season: i32 = caps[1].parse().ok()?;
        let episode: i32 = caps[2].parse().ok()?;
        Some(EpisodeMatch::new(season, vec![episode]))
    }

    fn match_part_delimited(&self, stripped: &str) -> Option<EpisodeMatch> {
        let mut episodes = Vec::new();
        for caps in self.part.captures_iter(stripped) {
            let token = &caps[1];
            let value = match token.parse::<i32>() {
                Ok(n) => n,
                // An invalid roman token fails the whole strategy.
                Err(_) => parse_roman(token)?,
            };
            episodes.push(value);
        }

        if episodes.is_empty() {
            return None;
        }
        Some(EpisodeMatch::new(NO_SEASON, episodes))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

fn roman_digit(c: char) -> Option<i32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Left-to-right roman numeral scan with lookahead for subtractive pairs.
/// Rejects unknown letters and illegal subtractive combinations (only
/// IV, IX, XL, XC, CD, CM are allowed).
pub fn parse_roman(token: &str) -> Option<i32> {
    let digits: Vec<i32> = token.chars().map(roman_digit).collect::<Option<_>>()?;
    if digits.is_empty() {
        return None;
    }

    let mut total = 0;
    let mut i = 0;
    while i < digits.len() {
        if i + 1 < digits.len() && digits[i] < digits[i + 1] {
            let (small, large) = (digits[i], digits[i + 1]);
            let legal = matches!(
                (small, large),
                (1, 5) | (1, 10) | (10, 50) | (10, 100) | (100, 500) | (100, 1000)
            );
            if !legal {
                return None;
            }
            total += large - small;
            i += 2;
        } else {
            total += digits[i];
            i += 1;
        }
    }

    Some(total)
}
