use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::episode::Season;

/// Video file extensions recognized by the library (simple suffix match,
/// no content sniffing).
pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "webm", "mov", "m4v"];

/// Resolves show and season directories across one or more source roots.
///
/// Root order is significant: the first root that contains the show
/// directory at all wins, even if it lacks the requested season and a
/// later root has it. One show lives in one source root.
#[derive(Debug, Clone)]
pub struct Library {
    roots: Vec<PathBuf>,
    season_dir: Regex,
}

impl Library {
    /// Create a library over the given source roots, in caller-supplied
    /// precedence order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            // "Season 1", "season 01", "Series 2"...
            season_dir: Regex::new(r"(?i)^(?:season|series)\s+(\d+)$").unwrap(),
        }
    }

    /// Directory of the show in the first root that has it.
    pub fn resolve_show_dir(&self, show: &str) -> Option<PathBuf> {
        for root in &self.roots {
            let candidate = root.join(show);
            if candidate.is_dir() {
                return Some(candidate);
            }
        }
        debug!("show {:?} not found under any source root", show);
        None
    }

    /// Directory of the given season, looked up only inside the first root
    /// that contains the show.
    pub fn resolve_season_dir(&self, show: &str, season: i32) -> Option<PathBuf> {
        let show_dir = self.resolve_show_dir(show)?;
        self.season_in(&show_dir, season)
    }

    fn season_in(&self, show_dir: &Path, season: i32) -> Option<PathBuf> {
        self.list_seasons(show_dir)
            .into_iter()
            .find(|s| s.number == season)
            .and_then(|s| s.dir)
    }

    /// Subdirectories of the show matching the season naming convention,
    /// sorted ascending by season number.
    pub fn list_seasons(&self, show_dir: &Path) -> Vec<Season> {
        let mut seasons: Vec<Season> = WalkDir::new(show_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let caps = self.season_dir.captures(&name)?;
                let number: i32 = caps[1].parse().ok()?;
                Some(Season {
                    number,
                    dir: Some(e.into_path()),
                })
            })
            .collect();
        seasons.sort();
        seasons
    }

    /// Video files directly inside `dir`, sorted by file name. A missing,
    /// empty or unreadable directory yields an empty list, never an error.
    pub fn list_video_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .map(|ext| {
                        let ext = ext.to_string_lossy().to_lowercase();
                        VIDEO_EXTENSIONS.contains(&ext.as_str())
                    })
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_resolve_show_dir_first_root_wins() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        fs::create_dir_all(a.path().join("Scrubs")).unwrap();
        fs::create_dir_all(b.path().join("Scrubs")).unwrap();

        let lib = Library::new(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        assert_eq!(lib.resolve_show_dir("Scrubs"), Some(a.path().join("Scrubs")));
        assert_eq!(lib.resolve_show_dir("Missing"), None);
    }

    #[test]
    fn test_root_precedence_over_season_presence() {
        // The first root has the show but not the season; the second has
        // both. The first root still wins, so the season resolves to none.
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        fs::create_dir_all(a.path().join("Scrubs/Season 1")).unwrap();
        fs::create_dir_all(b.path().join("Scrubs/Season 2")).unwrap();

        let lib = Library::new(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        assert_eq!(lib.resolve_season_dir("Scrubs", 2), None);
        assert_eq!(
            lib.resolve_season_dir("Scrubs", 1),
            Some(a.path().join("Scrubs/Season 1"))
        );
    }

    #[test]
    fn test_season_dir_conventions() {
        let root = TempDir::new().unwrap();
        let show = root.path().join("Show");
        fs::create_dir_all(show.join("Season 1")).unwrap();
        fs::create_dir_all(show.join("season 02")).unwrap();
        fs::create_dir_all(show.join("Series 3")).unwrap();
        fs::create_dir_all(show.join("Extras")).unwrap();

        let lib = Library::new(vec![root.path().to_path_buf()]);
        let seasons = lib.list_seasons(&show);
        let numbers: Vec<i32> = seasons.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        assert!(lib.resolve_season_dir("Show", 2).is_some());
        assert!(lib.resolve_season_dir("Show", 4).is_none());
    }

    #[test]
    fn test_list_video_files_filters_and_sorts() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("Show/Season 1");
        fs::create_dir_all(&dir).unwrap();
        touch(&dir.join("Show.s01e02.mkv"));
        touch(&dir.join("Show.s01e01.mkv"));
        touch(&dir.join("notes.txt"));
        touch(&dir.join("cover.jpg"));
        fs::create_dir_all(dir.join("nested")).unwrap();

        let lib = Library::new(vec![root.path().to_path_buf()]);
        let files = lib.list_video_files(&dir);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Show.s01e01.mkv", "Show.s01e02.mkv"]);
    }

    #[test]
    fn test_list_video_files_missing_dir_is_empty() {
        let lib = Library::new(vec![]);
        assert!(lib.list_video_files(Path::new("/nonexistent/season")).is_empty());
    }
}
