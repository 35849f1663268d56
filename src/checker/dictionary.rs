use fst::automaton::Levenshtein;
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a valid dictionary")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: fst::Error,
    },

    #[error("failed to build dictionary")]
    Build(#[from] fst::Error),
}

/// A sorted word list stored as an FST set. Words are kept lowercase.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load a dictionary previously written by [`Dictionary::build_from_words`].
    pub fn load_from_path(path: &Path) -> Result<Self, DictionaryError> {
        let bytes = fs::read(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Set::new(bytes).map_err(|source| DictionaryError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { set })
    }

    /// Build an in-memory dictionary.
    pub fn from_words<I, S>(words: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = Set::from_iter(normalize(words))?;
        Ok(Self { set })
    }

    /// Build a dictionary from a word list and write it to `output_path`.
    pub fn build_from_words<I, S>(words: I, output_path: &Path) -> Result<usize, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let write_err = |source| DictionaryError::Write {
            path: output_path.to_path_buf(),
            source,
        };

        let file = File::create(output_path).map_err(write_err)?;
        let mut builder = SetBuilder::new(BufWriter::new(file))?;

        let words = normalize(words);
        let count = words.len();
        builder.extend_iter(words)?;
        builder.finish()?;

        Ok(count)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                results.push(word.to_string());
            }
        }

        results
    }

    /// Words within `distance` edits of `word`, in order.
    ///
    /// Returns nothing when the automaton for `word` would be too large.
    pub fn words_within(&self, word: &str, distance: u32) -> Vec<String> {
        let lev = match Levenshtein::new(&word.to_lowercase(), distance) {
            Ok(lev) => lev,
            Err(_) => return Vec::new(),
        };

        let mut results = Vec::new();
        let mut stream = self.set.search(lev).into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                results.push(word.to_string());
            }
        }

        results
    }
}

/// Lowercase, trim, drop blanks and comments, then sort and dedup as the FST
/// builder requires.
fn normalize<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .collect();
    words.sort();
    words.dedup();
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = ["hello", "World", "test", "hello", "# comment", ""];
        let count = Dictionary::build_from_words(words, &dict_path).unwrap();
        assert_eq!(count, 3);

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("hello"));
        assert!(dict.contains("World"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Dictionary::load_from_path(&dir.path().join("missing.dict"))
            .err()
            .unwrap();
        assert!(matches!(err, DictionaryError::Read { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.dict");
        fs::write(&path, b"not an fst").unwrap();
        let err = Dictionary::load_from_path(&path).err().unwrap();
        assert!(matches!(err, DictionaryError::Corrupt { .. }));
    }

    #[test]
    fn test_prefix_and_distance_queries() {
        let dict =
            Dictionary::from_words(["sentence", "sense", "send", "test", "the", "than"]).unwrap();
        assert_eq!(dict.words_with_prefix("sen"), vec!["send", "sense", "sentence"]);
        assert_eq!(dict.words_within("tha", 1), vec!["than", "the"]);
        assert_eq!(dict.words_within("Tst", 1), vec!["test"]);
        assert!(dict.words_within("zzz", 1).is_empty());
    }
}
