use thiserror::Error;

use crate::episode::EpisodeRange;

/// Why a selector produced nothing. Absence during matching and navigation
/// is a normal return value; these variants only surface at the resolution
/// boundary, scoped so callers can tell a typo from missing media.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The selector string does not match any recognized grammar form.
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),

    #[error("{show}: season {season} not found")]
    SeasonNotFound { show: String, season: i32 },

    #[error("{show}: episode s{season:02}e{episode:02} not found")]
    EpisodeNotFound {
        show: String,
        season: i32,
        episode: i32,
    },

    #[error("{show}: no episodes in range {range}")]
    EpisodeRangeNotFound { show: String, range: EpisodeRange },

    #[error("{show}: no episodes in seasons {start} through {end}")]
    SeasonRangeNotFound { show: String, start: i32, end: i32 },

    /// The show directory has no recognized season subdirectories (or was
    /// not found under any source root).
    #[error("{show}: no seasons found")]
    NoSeasonsFound { show: String },

    /// Pointer-relative navigation was requested but no usable pointer
    /// exists for this show/user pair.
    #[error("no usable watch pointer for {show}")]
    PointerUnavailable { show: String, user: String },
}
