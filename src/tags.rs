use regex::Regex;

/// Strips quality and codec tokens from a filename before episode matching,
/// so release metadata like `720p` or `x264` cannot produce false episode
/// numbers.
#[derive(Debug, Clone)]
pub struct TagStripper {
    patterns: Vec<Regex>,
}

impl TagStripper {
    pub fn new() -> Self {
        // Compiled once; the token set is fixed. Episode numbering tokens
        // (sNNeMM, NxNN, bare digit pairs) must never match here.
        let patterns = vec![
            // Resolution plus progressive/interlace marker: 480p, 720p, 1080i...
            Regex::new(r"(?i)\b\d{3,4}[pi]\b").unwrap(),
            // AC3 and AAC with optional channel layout digits (AAC2.0, AAC5 1)
            Regex::new(r"(?i)\bac3\b").unwrap(),
            Regex::new(r"(?i)\baac(?:[ .]?\d(?:[ .]\d)?)?\b").unwrap(),
            // H.264 / x264 with flexible separators
            Regex::new(r"(?i)\b[hx][ ._-]?264\b").unwrap(),
        ];

        Self { patterns }
    }

    /// Remove all recognized tags from `name`. Pure and idempotent:
    /// stripping an already-stripped name is a no-op.
    pub fn strip(&self, name: &str) -> String {
        let mut stripped = name.to_string();
        for pattern in &self.patterns {
            stripped = pattern.replace_all(&stripped, "").to_string();
        }
        stripped
    }
}

impl Default for TagStripper {
    fn default() -> Self {
        Self::new()
    }
}
