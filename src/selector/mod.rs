use regex::Regex;
use std::path::PathBuf;
use tracing::debug;

use crate::episode::{EpisodeMatch, EpisodeRange, Range};
use crate::error::ResolveError;
use crate::library::Library;
use crate::matcher::EpisodeMatcher;
use crate::navigator::{Direction, Navigator};
use crate::pointer::WatchedEpisode;

/// A classified episode selector. Markers are case-sensitive lowercase as
/// documented (`s02e10`, not `S02E10`); `pilot` is an alias that classifies
/// straight to `s01e01`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `sNNeMM`
    Episode { season: i32, episode: i32 },
    /// `sNNeMM-sPPeQQ`
    Range(EpisodeRange),
    /// `sNNeMM-`
    From { season: i32, episode: i32 },
    /// `sNN`
    Season(i32),
    /// `sNN-sPP`
    SeasonRange { start: i32, end: i32 },
    /// `sNN-`
    SeasonFrom(i32),
    /// `s$`
    LastSeason,
    /// `all`
    All,
    /// `latest`
    Latest,
    /// `prev` / `cur` / `next`, with `-` extending to the rest of the season
    Pointer {
        direction: Direction,
        rest_of_season: bool,
    },
}

impl Selector {
    /// Classify a selector string, or report it as unrecognizable.
    pub fn parse(input: &str) -> Result<Selector, ResolveError> {
        Self::classify(input).ok_or_else(|| ResolveError::InvalidSelector(input.to_string()))
    }

    fn classify(input: &str) -> Option<Selector> {
        match input {
            "all" => return Some(Selector::All),
            "pilot" => return Some(Selector::Episode { season: 1, episode: 1 }),
            "latest" => return Some(Selector::Latest),
            "s$" => return Some(Selector::LastSeason),
            "prev" | "cur" | "next" => {
                return Some(Selector::Pointer {
                    direction: Direction::parse(input),
                    rest_of_season: false,
                })
            }
            "prev-" | "cur-" | "next-" => {
                return Some(Selector::Pointer {
                    direction: Direction::parse(input),
                    rest_of_season: true,
                })
            }
            _ => {}
        }

        // Markers are deliberately case-sensitive; digit groups are 1+.
        let episode_range = Regex::new(r"^s(\d+)e(\d+)-s(\d+)e(\d+)$").unwrap();
        let episode_from = Regex::new(r"^s(\d+)e(\d+)-$").unwrap();
        let episode = Regex::new(r"^s(\d+)e(\d+)$").unwrap();
        let season_range = Regex::new(r"^s(\d+)-s(\d+)$").unwrap();
        let season_from = Regex::new(r"^s(\d+)-$").unwrap();
        let season = Regex::new(r"^s(\d+)$").unwrap();

        let num = |m: &str| m.parse::<i32>().ok();

        if let Some(caps) = episode_range.captures(input) {
            return Some(Selector::Range(EpisodeRange::new(
                num(&caps[1])?,
                num(&caps[2])?,
                num(&caps[3])?,
                num(&caps[4])?,
            )));
        }
        if let Some(caps) = episode_from.captures(input) {
            return Some(Selector::From {
                season: num(&caps[1])?,
                episode: num(&caps[2])?,
            });
        }
        if let Some(caps) = episode.captures(input) {
            return Some(Selector::Episode {
                season: num(&caps[1])?,
                episode: num(&caps[2])?,
            });
        }
        if let Some(caps) = season_range.captures(input) {
            return Some(Selector::SeasonRange {
                start: num(&caps[1])?,
                end: num(&caps[2])?,
            });
        }
        if let Some(caps) = season_from.captures(input) {
            return Some(Selector::SeasonFrom(num(&caps[1])?));
        }
        if let Some(caps) = season.captures(input) {
            return Some(Selector::Season(num(&caps[1])?));
        }

        None
    }
}

/// Resolves classified selectors against one show in the library. All
/// collaborators are passed in explicitly; there is no ambient state.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    library: &'a Library,
    matcher: &'a EpisodeMatcher,
    show: &'a str,
    user: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(
        library: &'a Library,
        matcher: &'a EpisodeMatcher,
        show: &'a str,
        user: &'a str,
    ) -> Self {
        Self {
            library,
            matcher,
            show,
            user,
        }
    }

    /// Produce the ordered match list for a selector. Pointer-relative
    /// selectors consume the pointer that was read (once) by the caller;
    /// the caller is also responsible for persisting any new pointer.
    pub fn resolve(
        &self,
        selector: &Selector,
        pointer: Option<&WatchedEpisode>,
    ) -> Result<Vec<EpisodeMatch>, ResolveError> {
        debug!("resolving {:?} for {:?}", selector, self.show);
        match *selector {
            Selector::Episode { season, episode } => {
                let files = self.season_files(season)?;
                let m = self.matcher.match_one(&files, episode).ok_or_else(|| {
                    ResolveError::EpisodeNotFound {
                        show: self.show.to_string(),
                        season,
                        episode,
                    }
                })?;
                Ok(vec![m])
            }
            Selector::Range(range) => self.resolve_range(range),
            Selector::From { season, episode } => {
                let files = self.season_files(season)?;
                let matches = self.matcher.match_from(&files, episode);
                if matches.is_empty() {
                    return Err(ResolveError::EpisodeRangeNotFound {
                        show: self.show.to_string(),
                        range: EpisodeRange::new(season, episode, season, i32::MAX),
                    });
                }
                Ok(matches)
            }
            Selector::Season(season) => {
                let files = self.season_files(season)?;
                let matches = self.matcher.match_all(&files);
                if matches.is_empty() {
                    return Err(self.season_not_found(season));
                }
                Ok(matches)
            }
            Selector::SeasonRange { start, end } => self.resolve_season_range(start, end),
            Selector::SeasonFrom(start) => {
                let last = self.last_season_number()?;
                self.resolve_season_range(start, last.max(start))
            }
            Selector::LastSeason => {
                let last = self.last_season_number()?;
                self.resolve(&Selector::Season(last), pointer)
            }
            Selector::All => {
                let show_dir = self.show_dir()?;
                let seasons = self.library.list_seasons(&show_dir);
                let mut matches = Vec::new();
                for season in seasons.iter().filter(|s| s.number >= 1) {
                    if let Some(dir) = &season.dir {
                        let files = self.library.list_video_files(dir);
                        matches.extend(self.matcher.match_all(&files));
                    }
                }
                if matches.is_empty() {
                    return Err(ResolveError::NoSeasonsFound {
                        show: self.show.to_string(),
                    });
                }
                Ok(matches)
            }
            Selector::Latest => {
                let last = self.last_season_number()?;
                let files = self.season_files(last)?;
                let m = self
                    .matcher
                    .match_largest(&files)
                    .ok_or_else(|| self.season_not_found(last))?;
                Ok(vec![m])
            }
            Selector::Pointer {
                direction,
                rest_of_season,
            } => self.resolve_pointer(direction, rest_of_season, pointer),
        }
    }

    fn resolve_range(&self, range: EpisodeRange) -> Result<Vec<EpisodeMatch>, ResolveError> {
        // Backwards ranges parse fine but can never match anything.
        let backwards = range.end_season < range.start_season
            || (range.start_season == range.end_season
                && range.end_episode < range.start_episode);
        if backwards {
            return Err(ResolveError::EpisodeRangeNotFound {
                show: self.show.to_string(),
                range,
            });
        }

        let mut matches = Vec::new();

        if let Some(collapsed) = range.as_range() {
            let files = self.season_files(range.start_season)?;
            matches = self.matcher.match_range(&files, collapsed);
        } else {
            // Seasons missing mid-range are skipped like any other absence;
            // the range only fails when nothing at all matched.
            for season in range.start_season..=range.end_season {
                let Some(dir) = self.library.resolve_season_dir(self.show, season) else {
                    continue;
                };
                let files = self.library.list_video_files(&dir);
                let part = if season == range.start_season {
                    self.matcher.match_from(&files, range.start_episode)
                } else if season == range.end_season {
                    self.matcher.match_range(&files, Range::new(0, range.end_episode))
                } else {
                    self.matcher.match_all(&files)
                };
                matches.extend(part);
            }
        }

        if matches.is_empty() {
            return Err(ResolveError::EpisodeRangeNotFound {
                show: self.show.to_string(),
                range,
            });
        }
        Ok(matches)
    }

    fn resolve_season_range(&self, start: i32, end: i32) -> Result<Vec<EpisodeMatch>, ResolveError> {
        let mut matches = Vec::new();
        for season in start..=end {
            let Some(dir) = self.library.resolve_season_dir(self.show, season) else {
                continue;
            };
            let files = self.library.list_video_files(&dir);
            matches.extend(self.matcher.match_all(&files));
        }
        if matches.is_empty() {
            return Err(ResolveError::SeasonRangeNotFound {
                show: self.show.to_string(),
                start,
                end,
            });
        }
        Ok(matches)
    }

    fn resolve_pointer(
        &self,
        direction: Direction,
        rest_of_season: bool,
        pointer: Option<&WatchedEpisode>,
    ) -> Result<Vec<EpisodeMatch>, ResolveError> {
        let current = pointer.ok_or_else(|| ResolveError::PointerUnavailable {
            show: self.show.to_string(),
            user: self.user.to_string(),
        })?;

        // A CUR pointer whose file vanished is stale, not "not found".
        if direction == Direction::Cur {
            if let Some(path) = &current.matched.path {
                if !path.exists() {
                    return Err(ResolveError::PointerUnavailable {
                        show: current.show.clone(),
                        user: current.user.clone(),
                    });
                }
            }
        }

        let navigator = Navigator::new(self.library, self.matcher);
        let m = navigator.navigate(current, direction).ok_or_else(|| {
            let episode = match direction {
                Direction::Next => current.matched.max_episode().saturating_add(1),
                _ => current.matched.min_episode().saturating_sub(1),
            };
            ResolveError::EpisodeNotFound {
                show: current.show.clone(),
                season: current.matched.season,
                episode,
            }
        })?;

        if !rest_of_season {
            return Ok(vec![m]);
        }
        // Trailing dash: the resolved episode through the end of its season.
        let files = self.season_files(m.season)?;
        let matches = self.matcher.match_from(&files, m.min_episode());
        if matches.is_empty() {
            return Ok(vec![m]);
        }
        Ok(matches)
    }

    fn show_dir(&self) -> Result<PathBuf, ResolveError> {
        self.library
            .resolve_show_dir(self.show)
            .ok_or_else(|| ResolveError::NoSeasonsFound {
                show: self.show.to_string(),
            })
    }

    fn last_season_number(&self) -> Result<i32, ResolveError> {
        let show_dir = self.show_dir()?;
        self.library
            .list_seasons(&show_dir)
            .last()
            .map(|s| s.number)
            .ok_or_else(|| ResolveError::NoSeasonsFound {
                show: self.show.to_string(),
            })
    }

    fn season_files(&self, season: i32) -> Result<Vec<PathBuf>, ResolveError> {
        let dir = self
            .library
            .resolve_season_dir(self.show, season)
            .ok_or_else(|| self.season_not_found(season))?;
        Ok(self.library.list_video_files(&dir))
    }

    fn season_not_found(&self, season: i32) -> ResolveError {
        ResolveError::SeasonNotFound {
            show: self.show.to_string(),
            season,
        }
    }
}
