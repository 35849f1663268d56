//! Markdown-aware spellchecking.
//!
//! A document is first turned into a *masked view*: a copy of the same byte
//! length in which code, link targets and HTML markup are blanked out. The
//! [`Detector`] only ever sees that view, so every range it reports can index
//! straight back into the original document.

pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod parser;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use checker::{Detector, SpellChecker};
pub use config::Config;
pub use error::{Error, Result};
pub use parser::FileType;

/// Half-open byte range into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A flagged word, located in the original document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misspelling {
    pub index: Range,
    pub misspelling: String,
    pub suggestions: Vec<String>,
}

/// Spellcheck `document`, using `file_name` to decide which markup to skip.
///
/// Files ending in `.md` are masked as Markdown; everything else is handed to
/// the detector verbatim.
pub async fn get_misspellings<D: Detector>(
    detector: &D,
    document: &str,
    file_name: &str,
) -> Result<Vec<Misspelling>> {
    let file_type = FileType::from_file_name(file_name);
    debug!(file_name, ?file_type, bytes = document.len(), "spellchecking document");

    let view = parser::mask(document, file_type);
    checker::assemble(detector, document, &view).await
}
