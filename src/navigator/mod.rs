use tracing::debug;

use crate::episode::EpisodeMatch;
use crate::library::Library;
use crate::matcher::EpisodeMatcher;
use crate::pointer::WatchedEpisode;

/// Navigation direction relative to the stored pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Cur,
    Next,
}

impl Direction {
    /// Loose, case-insensitive classification: only the first character is
    /// inspected. `n*` means next, `p*` means prev, anything else (including
    /// `cur`) means the current episode.
    pub fn parse(value: &str) -> Direction {
        match value.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('n') => Direction::Next,
            Some('p') => Direction::Prev,
            _ => Direction::Cur,
        }
    }

    fn step(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Cur => 0,
            Direction::Next => 1,
        }
    }
}

/// Pointer state machine: positioned at an episode of a show, it produces
/// the adjacent episode match, skipping over multi-episode files and
/// crossing season boundaries when the current season is exhausted.
///
/// `navigate` is a pure function of the pointer, the direction and the
/// filesystem snapshot; the caller decides whether to persist the result.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    library: &'a Library,
    matcher: &'a EpisodeMatcher,
}

impl<'a> Navigator<'a> {
    pub fn new(library: &'a Library, matcher: &'a EpisodeMatcher) -> Self {
        Self { library, matcher }
    }

    /// Resolve the episode adjacent to `current` in the given direction,
    /// or `None` when there is nothing to navigate to.
    ///
    /// A single missing episode inside a season is detected by probing two
    /// steps past the boundary: if an episode exists there, the gap is a
    /// genuinely missing file and navigation reports no match rather than
    /// silently skipping it. Only when both probes fail is the season
    /// considered exhausted. Two consecutive missing episodes at a real
    /// season boundary are indistinguishable from a gap; that limitation
    /// is inherited deliberately.
    pub fn navigate(&self, current: &WatchedEpisode, direction: Direction) -> Option<EpisodeMatch> {
        if direction == Direction::Cur {
            return Some(current.matched.clone());
        }
        let step = direction.step();
        let season = current.matched.season;

        let season_dir = match self.library.resolve_season_dir(&current.show, season) {
            Some(dir) => dir,
            None => {
                // The pointed-to season no longer exists on disk. Moving
                // backwards from its first episode still makes sense as a
                // season-boundary move; everything else fails.
                return match direction {
                    Direction::Prev if current.matched.min_episode().saturating_sub(1) < 1 => {
                        self.navigate_season(&current.show, season, direction)
                    }
                    _ => None,
                };
            }
        };
        let files = self.library.list_video_files(&season_dir);

        // The boundary episode number, re-resolved against the season's
        // files: if it lives in a (possibly larger) multi-episode file,
        // that file's own extent supersedes the stored pointer.
        let mut boundary = match direction {
            Direction::Next => current.matched.max_episode(),
            _ => current.matched.min_episode(),
        };
        if let Some(m) = self.matcher.match_one(&files, boundary) {
            boundary = match direction {
                Direction::Next => m.max_episode(),
                _ => m.min_episode(),
            };
        }

        // Saturating: absurd episode numbers from hostile filenames or a
        // corrupt pointer must not overflow.
        if let Some(m) = self.matcher.match_one(&files, boundary.saturating_add(step)) {
            return Some(m);
        }
        if self
            .matcher
            .match_one(&files, boundary.saturating_add(2 * step))
            .is_some()
        {
            debug!(
                "gap at episode {} of season {} of {:?}, not crossing it",
                boundary.saturating_add(step),
                season,
                current.show
            );
            return None;
        }

        self.navigate_season(&current.show, season, direction)
    }

    /// Move into the adjacent season: the largest episode when going back,
    /// episode 0 (a specials/prologue convention) or else episode 1 when
    /// going forward.
    fn navigate_season(&self, show: &str, season: i32, direction: Direction) -> Option<EpisodeMatch> {
        let adjacent = season.saturating_add(direction.step());
        let season_dir = self.library.resolve_season_dir(show, adjacent)?;
        let files = self.library.list_video_files(&season_dir);

        match direction {
            Direction::Prev => self.matcher.match_largest(&files),
            Direction::Next => self
                .matcher
                .match_one(&files, 0)
                .or_else(|| self.matcher.match_one(&files, 1)),
            Direction::Cur => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::EpisodeMatch;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Build `<root>/<show>/Season <n>` with the given episode file names.
    fn fixture_season(root: &Path, show: &str, season: i32, files: &[&str]) {
        let dir = root.join(show).join(format!("Season {}", season));
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), "").unwrap();
        }
    }

    fn pointer(show: &str, season: i32, episodes: Vec<i32>) -> WatchedEpisode {
        WatchedEpisode::new(show, "tester", EpisodeMatch::new(season, episodes))
    }

    #[test]
    fn test_direction_parse_is_loose() {
        assert_eq!(Direction::parse("next"), Direction::Next);
        assert_eq!(Direction::parse("N"), Direction::Next);
        assert_eq!(Direction::parse("nope"), Direction::Next);
        assert_eq!(Direction::parse("prev"), Direction::Prev);
        assert_eq!(Direction::parse("Previous"), Direction::Prev);
        assert_eq!(Direction::parse("cur"), Direction::Cur);
        assert_eq!(Direction::parse("anything"), Direction::Cur);
        assert_eq!(Direction::parse(""), Direction::Cur);
    }

    #[test]
    fn test_cur_is_identity() {
        let root = TempDir::new().unwrap();
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        let current = pointer("Scrubs", 1, vec![4]);
        let m = nav.navigate(&current, Direction::Cur).unwrap();
        assert_eq!(m, current.matched);
    }

    #[test]
    fn test_next_within_season() {
        let root = TempDir::new().unwrap();
        fixture_season(
            root.path(),
            "Scrubs",
            1,
            &["Scrubs.s01e01.mkv", "Scrubs.s01e02.mkv", "Scrubs.s01e03.mkv"],
        );
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        let m = nav.navigate(&pointer("Scrubs", 1, vec![1]), Direction::Next).unwrap();
        assert_eq!(m.episodes, vec![2]);

        let m = nav.navigate(&pointer("Scrubs", 1, vec![2]), Direction::Prev).unwrap();
        assert_eq!(m.episodes, vec![1]);
    }

    #[test]
    fn test_next_skips_multi_episode_file() {
        let root = TempDir::new().unwrap();
        fixture_season(
            root.path(),
            "Scrubs",
            1,
            &["Scrubs.s01e04.mkv", "Scrubs.s01e05e06.mkv", "Scrubs.s01e07.mkv"],
        );
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        // The stored pointer only knows about episode 5, but on disk that
        // episode lives in a double file, so the boundary advances to 6.
        let m = nav.navigate(&pointer("Scrubs", 1, vec![5]), Direction::Next).unwrap();
        assert_eq!(m.episodes, vec![7]);

        // And going backwards from 6 skips down past the double's start.
        let m = nav.navigate(&pointer("Scrubs", 1, vec![6]), Direction::Prev).unwrap();
        assert_eq!(m.episodes, vec![4]);
    }

    #[test]
    fn test_gap_tolerance() {
        let root = TempDir::new().unwrap();
        fixture_season(
            root.path(),
            "Scrubs",
            1,
            &[
                "Scrubs.s01e01.mkv",
                "Scrubs.s01e02.mkv",
                "Scrubs.s01e04.mkv",
                "Scrubs.s01e05.mkv",
            ],
        );
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        // Episode 3 is missing but 4 exists: a genuine gap, not an
        // exhausted season. Navigation refuses to jump it.
        assert_eq!(nav.navigate(&pointer("Scrubs", 1, vec![2]), Direction::Next), None);
    }

    #[test]
    fn test_season_boundary_next_prefers_zero_then_one() {
        let root = TempDir::new().unwrap();
        fixture_season(root.path(), "Scrubs", 1, &["Scrubs.s01e12.mkv"]);
        fixture_season(
            root.path(),
            "Scrubs",
            2,
            &["Scrubs.s02e00.mkv", "Scrubs.s02e01.mkv"],
        );
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        let m = nav.navigate(&pointer("Scrubs", 1, vec![12]), Direction::Next).unwrap();
        assert_eq!((m.season, m.episodes), (2, vec![0]));
    }

    #[test]
    fn test_season_boundary_next_falls_back_to_one() {
        let root = TempDir::new().unwrap();
        fixture_season(root.path(), "Scrubs", 2, &["Scrubs.s02e12.mkv"]);
        fixture_season(
            root.path(),
            "Scrubs",
            3,
            &["Scrubs.s03e01.mkv", "Scrubs.s03e02.mkv"],
        );
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        // Pointer at the last episode of season 2; season 3 has no episode
        // 0, so navigation lands on episode 1.
        let m = nav.navigate(&pointer("Scrubs", 2, vec![12]), Direction::Next).unwrap();
        assert_eq!((m.season, m.episodes), (3, vec![1]));
    }

    #[test]
    fn test_season_boundary_next_without_adjacent_season() {
        let root = TempDir::new().unwrap();
        fixture_season(root.path(), "Scrubs", 3, &["Scrubs.s03e12.mkv"]);
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        assert_eq!(nav.navigate(&pointer("Scrubs", 3, vec![12]), Direction::Next), None);
    }

    #[test]
    fn test_season_boundary_prev_takes_largest() {
        let root = TempDir::new().unwrap();
        fixture_season(
            root.path(),
            "Scrubs",
            1,
            &["Scrubs.s01e11.mkv", "Scrubs.s01e12e13.mkv"],
        );
        fixture_season(root.path(), "Scrubs", 2, &["Scrubs.s02e01.mkv"]);
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        let m = nav.navigate(&pointer("Scrubs", 2, vec![1]), Direction::Prev).unwrap();
        assert_eq!((m.season, m.episodes), (1, vec![12, 13]));
    }

    #[test]
    fn test_navigate_at_numeric_extremes() {
        let root = TempDir::new().unwrap();
        fixture_season(root.path(), "Scrubs", 1, &["Scrubs.s01e01.mkv"]);
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        // A pointer claiming the largest representable episode number
        // fails cleanly instead of overflowing past the boundary probes.
        assert_eq!(
            nav.navigate(&pointer("Scrubs", 1, vec![i32::MAX]), Direction::Next),
            None
        );
    }

    #[test]
    fn test_missing_season_on_disk() {
        let root = TempDir::new().unwrap();
        fixture_season(root.path(), "Scrubs", 3, &["Scrubs.s03e12.mkv"]);
        let library = Library::new(vec![root.path().to_path_buf()]);
        let matcher = EpisodeMatcher::new();
        let nav = Navigator::new(&library, &matcher);

        // Season 4 does not exist. NEXT fails immediately; PREV from
        // mid-season fails too, but PREV from the season start degenerates
        // into a season-boundary move.
        assert_eq!(nav.navigate(&pointer("Scrubs", 4, vec![1]), Direction::Next), None);
        assert_eq!(nav.navigate(&pointer("Scrubs", 4, vec![5]), Direction::Prev), None);

        let m = nav.navigate(&pointer("Scrubs", 4, vec![1]), Direction::Prev).unwrap();
        assert_eq!((m.season, m.episodes), (3, vec![12]));
    }
}
