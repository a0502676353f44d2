use std::path::Path;
use tracing::trace;

use crate::episode::{EpisodeMatch, Range};
use crate::pattern::{PatternSet, Strategy, DEFAULT_ORDER};
use crate::tags::TagStripper;

/// Applies the filename strategies in priority order against single files
/// and offers the batch operations the selector layer is built on.
#[derive(Debug, Clone)]
pub struct EpisodeMatcher {
    stripper: TagStripper,
    patterns: PatternSet,
    order: Vec<Strategy>,
}

impl EpisodeMatcher {
    /// Matcher with the production strategy order.
    pub fn new() -> Self {
        Self::with_order(DEFAULT_ORDER.to_vec())
    }

    /// Matcher with an explicit strategy order; mainly for tests that
    /// subset or reorder strategies.
    pub fn with_order(order: Vec<Strategy>) -> Self {
        Self {
            stripper: TagStripper::new(),
            patterns: PatternSet::new(),
            order,
        }
    }

    /// Match a single file. Strategies are tried in order and the first
    /// success wins; the returned match carries the file reference.
    pub fn match_file(&self, path: &Path) -> Option<EpisodeMatch> {
        let name = path.file_name()?.to_string_lossy();
        let stripped = self.stripper.strip(&name);

        for &strategy in &self.order {
            if let Some(m) = self.patterns.apply(strategy, path, &stripped) {
                trace!("matched {:?} via {:?}: {}", path, strategy, m);
                return Some(m.with_path(path.to_path_buf()));
            }
        }
        None
    }

    /// Match every file, silently discarding non-matches, sorted by
    /// `(season, lowest episode)`. The sort is stable, so ties keep their
    /// encounter order.
    pub fn match_all(&self, files: &[impl AsRef<Path>]) -> Vec<EpisodeMatch> {
        let mut matches: Vec<EpisodeMatch> = files
            .iter()
            .filter_map(|f| self.match_file(f.as_ref()))
            .collect();
        matches.sort_by_key(|m| m.sort_key());
        matches
    }

    /// As [`match_all`](Self::match_all), with an extra acceptance
    /// predicate evaluated after a successful pattern match.
    pub fn match_where(
        &self,
        files: &[impl AsRef<Path>],
        predicate: impl Fn(&EpisodeMatch) -> bool,
    ) -> Vec<EpisodeMatch> {
        let mut matches: Vec<EpisodeMatch> = files
            .iter()
            .filter_map(|f| self.match_file(f.as_ref()))
            .filter(|m| predicate(m))
            .collect();
        matches.sort_by_key(|m| m.sort_key());
        matches
    }

    /// Matches whose episode span intersects the given closed range.
    pub fn match_range(&self, files: &[impl AsRef<Path>], range: Range) -> Vec<EpisodeMatch> {
        self.match_where(files, |m| m.span().intersects(&range))
    }

    /// Matches whose span lies entirely at or above `start`.
    pub fn match_from(&self, files: &[impl AsRef<Path>], start: i32) -> Vec<EpisodeMatch> {
        self.match_where(files, |m| m.min_episode() >= start)
    }

    /// The match with the largest maximum episode number; ties resolve to
    /// the first-encountered file.
    pub fn match_largest(&self, files: &[impl AsRef<Path>]) -> Option<EpisodeMatch> {
        let mut largest: Option<EpisodeMatch> = None;
        for file in files {
            if let Some(m) = self.match_file(file.as_ref()) {
                match &largest {
                    Some(best) if m.max_episode() <= best.max_episode() => {}
                    _ => largest = Some(m),
                }
            }
        }
        largest
    }

    /// The first file whose match contains `episode` exactly.
    pub fn match_one(&self, files: &[impl AsRef<Path>], episode: i32) -> Option<EpisodeMatch> {
        files
            .iter()
            .filter_map(|f| self.match_file(f.as_ref()))
            .find(|m| m.contains(episode))
    }
}

impl Default for EpisodeMatcher {
    fn default() -> Self {
        Self::new()
    }
}
