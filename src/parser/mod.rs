pub mod html;
pub mod markdown;
pub mod plaintext;

use std::borrow::Cow;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    PlainText,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" => FileType::Markdown,
            _ => FileType::PlainText,
        }
    }

    pub fn from_file_name(file_name: &str) -> Self {
        Self::from_path(Path::new(file_name))
    }
}

/// Produce the view of `content` that the detector is allowed to see.
///
/// The returned text always has the same byte length as `content`.
pub fn mask(content: &str, file_type: FileType) -> Cow<'_, str> {
    match file_type {
        FileType::Markdown => Cow::Owned(markdown::mask(content)),
        FileType::PlainText => plaintext::mask(content),
    }
}
