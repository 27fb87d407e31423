//! Spell-check dictionary
//!
//! Known words come from two places: a system word list (one word per
//! line, loaded once) and the personal word list, a newline-delimited file
//! that only ever grows. Words added at runtime are appended to the personal
//! file before they are merged into memory.

mod suggest;

use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Word list used when no system dictionary is configured.
pub const DEFAULT_SYSTEM_DICTIONARY: &str = "/usr/share/dict/words";

/// Maximum number of suggestions returned by [`Dictionary::suggest`].
pub const MAX_SUGGESTIONS: usize = 8;

/// Known words, system plus personal.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    system: HashSet<String>,
    personal: HashSet<String>,
    word_list_path: Option<PathBuf>,
    generation: u64,
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

fn read_words(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(normalize)
        .filter(|w| !w.is_empty())
}

impl Dictionary {
    /// Load the system dictionary and the personal word list.
    ///
    /// The personal word list is created empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `Error::DictionaryUnavailable` when the system word list cannot be
    /// read; callers disable spell-check in that case.
    pub fn load(system_path: Option<&Path>, word_list_path: &Path) -> Result<Self> {
        let system_path = system_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_DICTIONARY));

        let contents =
            fs::read_to_string(&system_path).map_err(|e| Error::DictionaryUnavailable {
                path: system_path.clone(),
                reason: e.to_string(),
            })?;
        let system: HashSet<String> = read_words(&contents).collect();
        if system.is_empty() {
            return Err(Error::DictionaryUnavailable {
                path: system_path,
                reason: "word list is empty".to_string(),
            });
        }

        let mut dictionary = Self {
            system,
            ..Self::default()
        };
        dictionary.attach_word_list(word_list_path)?;

        info!(
            "Dictionary loaded: {} system words, {} personal words",
            dictionary.system.len(),
            dictionary.personal.len()
        );
        Ok(dictionary)
    }

    /// An in-memory dictionary with no personal word list file.
    #[allow(dead_code)]
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            system: words.into_iter().map(normalize).filter(|w| !w.is_empty()).collect(),
            ..Self::default()
        }
    }

    /// Read (or create) the personal word list and persist future additions there.
    pub fn attach_word_list(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!("Creating personal word list at {}", path.display());
            fs::write(path, "").map_err(|source| Error::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let contents = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.personal.extend(read_words(&contents));
        self.word_list_path = Some(path.to_path_buf());
        self.generation += 1;
        Ok(())
    }

    pub fn word_list_path(&self) -> Option<&Path> {
        self.word_list_path.as_deref()
    }

    /// Bumped whenever the set of known words changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.system.len() + self.personal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.personal.is_empty()
    }

    /// Whether `word` is known. Lookup ignores case.
    pub fn check(&self, word: &str) -> bool {
        let key = normalize(word);
        self.system.contains(&key) || self.personal.contains(&key)
    }

    /// Candidate corrections, closest first.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        suggest::suggestions(
            word,
            self.system.iter().chain(self.personal.iter()),
            MAX_SUGGESTIONS,
        )
    }

    /// Add a word to the personal list.
    ///
    /// Returns `Ok(false)` if the word was already known. Otherwise the word
    /// is appended to the word-list file (opened and closed within this call)
    /// and merged into memory.
    pub fn add(&mut self, word: &str) -> Result<bool> {
        let key = normalize(word);
        if key.is_empty() || self.check(&key) {
            return Ok(false);
        }

        if let Some(path) = &self.word_list_path {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::FileWrite {
                    path: path.clone(),
                    source,
                })?;
            write!(file, "\n{}", word.trim()).map_err(|source| Error::FileWrite {
                path: path.clone(),
                source,
            })?;
        } else {
            warn!("No personal word list attached, '{}' is kept for this session only", word);
        }

        self.personal.insert(key);
        self.generation += 1;
        debug!("Added '{}' to personal dictionary", word.trim());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn system_file(dir: &TempDir, words: &[&str]) -> PathBuf {
        let path = dir.path().join("words");
        fs::write(&path, words.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_missing_system_dictionary_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = Dictionary::load(
            Some(&dir.path().join("nope")),
            &dir.path().join("wordlist"),
        );
        assert!(matches!(result, Err(Error::DictionaryUnavailable { .. })));
    }

    #[test]
    fn test_load_creates_word_list() {
        let dir = TempDir::new().unwrap();
        let system = system_file(&dir, &["hello", "world"]);
        let word_list = dir.path().join("wordlist");

        let dictionary = Dictionary::load(Some(&system), &word_list).unwrap();
        assert!(word_list.exists());
        assert!(dictionary.check("hello"));
        assert!(dictionary.check("World"));
        assert!(!dictionary.check("foobar"));
    }

    #[test]
    fn test_add_persists_and_reports_known_words() {
        let dir = TempDir::new().unwrap();
        let system = system_file(&dir, &["hello"]);
        let word_list = dir.path().join("wordlist");
        let mut dictionary = Dictionary::load(Some(&system), &word_list).unwrap();

        assert!(dictionary.add("foobar").unwrap());
        let persisted = fs::read_to_string(&word_list).unwrap();
        assert!(persisted.lines().any(|l| l == "foobar"));
        assert!(dictionary.check("foobar"));

        assert!(!dictionary.add("foobar").unwrap());
        assert!(!dictionary.add("hello").unwrap());
        let persisted_again = fs::read_to_string(&word_list).unwrap();
        assert_eq!(persisted, persisted_again);
    }

    #[test]
    fn test_word_list_duplicates_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let system = system_file(&dir, &["hello"]);
        let word_list = dir.path().join("wordlist");
        fs::write(&word_list, "serum\n\nserum\nwriter").unwrap();

        let dictionary = Dictionary::load(Some(&system), &word_list).unwrap();
        assert!(dictionary.check("serum"));
        assert!(dictionary.check("writer"));
        assert_eq!(dictionary.len(), 3);
    }

    #[test]
    fn test_personal_words_survive_reload() {
        let dir = TempDir::new().unwrap();
        let system = system_file(&dir, &["hello"]);
        let word_list = dir.path().join("wordlist");

        let mut first = Dictionary::load(Some(&system), &word_list).unwrap();
        first.add("rustacean").unwrap();
        first.add("egui").unwrap();

        let second = Dictionary::load(Some(&system), &word_list).unwrap();
        assert!(second.check("rustacean"));
        assert!(second.check("egui"));
    }

    #[test]
    fn test_generation_changes_on_add() {
        let mut dictionary = Dictionary::from_words(["alpha"]);
        let before = dictionary.generation();
        dictionary.add("beta").unwrap();
        assert!(dictionary.generation() > before);
        assert!(dictionary.check("beta"));
    }

    #[test]
    fn test_suggest_orders_by_distance() {
        let dictionary = Dictionary::from_words(["hello", "help", "yellow", "world"]);
        let suggestions = dictionary.suggest("helo");
        assert_eq!(suggestions.first().map(String::as_str), Some("hello"));
        assert!(suggestions.contains(&"help".to_string()));
        assert!(!suggestions.contains(&"world".to_string()));
    }
}
