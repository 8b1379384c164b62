// src/config.rs
//! Startup configuration read from a flat text file.
//!
//! The file holds exactly five whitespace separated integers, one per line:
//! palm count, fullscreen flag, big palms, big duck and big snowman. Anything
//! else falls back to [`Config::default`].

use std::{fs, path::Path};

/// Upper bound on drawn palms; matches the fixed palm layout.
pub const MAX_PALMS: usize = 16;

const EXPECTED_LINES: usize = 5;

/// Scene knobs read once at startup and again on every reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub palm_count: usize,
    pub fullscreen: bool,
    pub big_palms: bool,
    pub big_duck: bool,
    pub big_snowman: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palm_count: MAX_PALMS,
            fullscreen: false,
            big_palms: true,
            big_duck: true,
            big_snowman: true,
        }
    }
}

impl Config {
    /// Loads the configuration file, using defaults when it is missing or malformed
    ///
    /// # Arguments
    /// * `path` - Location of the configuration file
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                log::warn!(
                    "Config '{}' unreadable ({}), using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Parses configuration text
    ///
    /// Only the line count is validated. A token that is not an integer reads as 0.
    pub fn parse(contents: &str) -> Self {
        let line_count = contents.lines().count();
        if line_count != EXPECTED_LINES {
            log::warn!(
                "Config has {} lines, expected {}; using defaults",
                line_count,
                EXPECTED_LINES
            );
            return Self::default();
        }

        let mut values = contents
            .split_whitespace()
            .map(|token| token.parse::<i64>().unwrap_or(0));
        let mut next = || values.next().unwrap_or(0);

        let palms = next();
        let config = Self {
            palm_count: palms.clamp(0, MAX_PALMS as i64) as usize,
            fullscreen: next() != 0,
            big_palms: next() != 0,
            big_duck: next() != 0,
            big_snowman: next() != 0,
        };
        log::info!("Loaded config: {:?}", config);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_five_lines() {
        let config = Config::parse("4\n1\n0\n1\n0");
        assert_eq!(
            config,
            Config {
                palm_count: 4,
                fullscreen: true,
                big_palms: false,
                big_duck: true,
                big_snowman: false,
            }
        );
    }

    #[test]
    fn test_trailing_newline_still_five_lines() {
        let config = Config::parse("4\n1\n0\n1\n0\n");
        assert_eq!(config.palm_count, 4);
        assert!(config.fullscreen);
    }

    #[test]
    fn test_empty_uses_defaults() {
        assert_eq!(Config::parse(""), Config::default());
        let defaults = Config::default();
        assert_eq!(defaults.palm_count, 16);
        assert!(!defaults.fullscreen);
        assert!(defaults.big_palms && defaults.big_duck && defaults.big_snowman);
    }

    #[test]
    fn test_wrong_line_count_uses_defaults() {
        assert_eq!(Config::parse("4\n1\n0\n1"), Config::default());
        assert_eq!(Config::parse("4\n1\n0\n1\n0\n1"), Config::default());
    }

    #[test]
    fn test_palm_count_clamped() {
        assert_eq!(Config::parse("20\n0\n0\n0\n0").palm_count, 16);
        assert_eq!(Config::parse("-3\n0\n0\n0\n0").palm_count, 0);
    }

    #[test]
    fn test_bad_token_reads_as_zero() {
        let config = Config::parse("x\n1\n1\n1\n1");
        assert_eq!(config.palm_count, 0);
        assert!(config.fullscreen);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "7\n0\n1\n0\n1\n").unwrap();
        let config = Config::load(file.path());
        assert_eq!(config.palm_count, 7);
        assert!(!config.fullscreen);
        assert!(config.big_palms);
        assert!(!config.big_duck);
        assert!(config.big_snowman);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("config.txt"));
        assert_eq!(config, Config::default());
    }
}
