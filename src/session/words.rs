//! Word-list parsing and plain-text file persistence.
//!
//! A word list is a UTF-8 text file with one word per line.  Blank lines
//! are ignored and surrounding whitespace is trimmed, so a list saved with
//! [`save_words`] and reloaded with [`load_words`] yields the identical
//! ordered sequence.  Duplicates are allowed and kept.

use std::path::Path;

use thiserror::Error;

/// Minimum number of words required to start a training session.
pub const MIN_WORDS: usize = 2;

/// The starter list shown on first run, before the user has loaded or
/// typed anything.
pub const DEFAULT_WORDS: &[&str] = &[
    "вокзал",
    "парашют",
    "аккомпанемент",
    "бюллетень",
    "деревня",
    "интеллигент",
    "профессия",
    "коллектив",
    "территория",
    "дискуссия",
];

/// Errors from word-list file I/O.
#[derive(Debug, Error)]
pub enum WordFileError {
    #[error("could not read word list: {0}")]
    Read(std::io::Error),

    #[error("could not write word list: {0}")]
    Write(std::io::Error),
}

/// Split free-form text into a word list: one entry per non-blank line,
/// trimmed.  Never fails; an all-blank input yields an empty list.
pub fn parse_words(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Load a word list from a plain-text file (one word per line).
pub fn load_words(path: &Path) -> Result<Vec<String>, WordFileError> {
    let content = std::fs::read_to_string(path).map_err(WordFileError::Read)?;
    Ok(parse_words(&content))
}

/// Save a word list to a plain-text file, one word per line, with a
/// trailing newline.  Overwrites any existing file.
pub fn save_words(path: &Path, words: &[String]) -> Result<(), WordFileError> {
    let mut content = words.join("\n");
    content.push('\n');
    std::fs::write(path, content).map_err(WordFileError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_trims_and_skips_blank_lines() {
        let words = parse_words("  вокзал  \n\nпарашют\n   \nдеревня");
        assert_eq!(words, vec!["вокзал", "парашют", "деревня"]);
    }

    #[test]
    fn parse_keeps_duplicates_and_order() {
        let words = parse_words("a\nb\na");
        assert_eq!(words, vec!["a", "b", "a"]);
    }

    #[test]
    fn parse_empty_text_yields_empty_list() {
        assert!(parse_words("").is_empty());
        assert!(parse_words("\n  \n\t\n").is_empty());
    }

    /// Saving then reloading must yield the identical ordered sequence.
    #[test]
    fn file_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("words.txt");

        let words: Vec<String> = DEFAULT_WORDS.iter().map(|w| w.to_string()).collect();
        save_words(&path, &words).expect("save");

        let loaded = load_words(&path).expect("load");
        assert_eq!(loaded, words);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        assert!(load_words(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn default_list_is_large_enough_to_start() {
        assert!(DEFAULT_WORDS.len() >= MIN_WORDS);
    }
}
