pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::{Config, Error, Misspelling, Range, Result};
use anyhow::Context;
use dictionary::Dictionary;
use std::convert::Infallible;
use std::future::Future;
use tracing::{debug, trace};

/// Something that can find misspelled words and suggest corrections.
///
/// `check_spelling` may be slow (native spellcheckers usually run it off the
/// caller's thread), so it is asynchronous. `suggest` is expected to be cheap.
pub trait Detector {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Byte ranges of misspelled words in `text`.
    fn check_spelling(
        &self,
        text: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Range>, Self::Error>> + Send;

    /// Corrections for `word`, best first. `None` means the detector has
    /// nothing to offer and is treated like an empty list.
    fn suggest(&self, word: &str) -> Option<Vec<String>>;
}

/// Run `detector` over `view` and report each flagged range against
/// `document`, in the order the detector returned them.
///
/// `view` must have the same length as `document`; ranges found in the view
/// are read back out of the original text.
pub async fn assemble<D: Detector>(
    detector: &D,
    document: &str,
    view: &str,
) -> Result<Vec<Misspelling>> {
    debug_assert_eq!(document.len(), view.len());

    let ranges = detector.check_spelling(view).await.map_err(Error::detector)?;
    debug!(count = ranges.len(), "detector flagged ranges");

    ranges
        .into_iter()
        .map(|index| -> Result<Misspelling> {
            let misspelling = document
                .get(index.start..index.end)
                .ok_or(Error::InvalidRange {
                    start: index.start,
                    end: index.end,
                    len: document.len(),
                })?
                .to_string();
            let suggestions = detector.suggest(&misspelling).unwrap_or_default();
            trace!(?index, %misspelling, suggestions = suggestions.len(), "misspelling");
            Ok(Misspelling {
                index,
                misspelling,
                suggestions,
            })
        })
        .collect()
}

/// Dictionary-backed detector.
pub struct SpellChecker {
    dictionary: Dictionary,
    max_suggestions: usize,
}

impl SpellChecker {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let path = config
            .dictionary_path()
            .context("No dictionary configured and no data directory available")?;
        let dictionary = Dictionary::load_from_path(&path).with_context(|| {
            format!(
                "Failed to load dictionary {} (build one with `mdspell dict build <WORDLIST>`)",
                path.display()
            )
        })?;
        debug!(path = %path.display(), words = dictionary.len(), "loaded dictionary");

        Ok(Self::with_dictionary(dictionary, config.max_suggestions))
    }

    pub fn with_dictionary(dictionary: Dictionary, max_suggestions: usize) -> Self {
        Self {
            dictionary,
            max_suggestions,
        }
    }

    /// Whether `word` is spelled correctly. Possessives and contractions are
    /// checked on the part before the apostrophe, and camelCase or snake_case
    /// words are accepted when every part is known.
    pub fn is_known(&self, word: &str) -> bool {
        if self.dictionary.contains(word) {
            return true;
        }

        if let Some((stem, _)) = word.split_once(['\'', '’']) {
            if !stem.is_empty() && self.dictionary.contains(stem) {
                return true;
            }
        }

        let parts = tokenizer::split_compound_word(word);
        parts.len() > 1 && parts.iter().all(|part| self.dictionary.contains(part))
    }

    fn misspelled_ranges(&self, text: &str) -> Vec<Range> {
        tokenizer::words(text)
            .filter(|token| !self.is_known(token.text))
            .map(|token| Range::new(token.start, token.end))
            .collect()
    }
}

impl Detector for SpellChecker {
    type Error = Infallible;

    async fn check_spelling(&self, text: &str) -> std::result::Result<Vec<Range>, Infallible> {
        Ok(self.misspelled_ranges(text))
    }

    fn suggest(&self, word: &str) -> Option<Vec<String>> {
        let suggestions = suggestions::generate(word, &self.dictionary, self.max_suggestions);
        (!suggestions.is_empty()).then_some(suggestions)
    }
}
