use unicode_segmentation::UnicodeSegmentation;

/// A word in a text, located by byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into words using Unicode word boundaries. Offsets refer to
/// `text`, so running this over a masked view yields offsets into the
/// original document.
pub fn words(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.unicode_word_indices()
        .map(|(start, word)| Token {
            text: word,
            start,
            end: start + word.len(),
        })
        .filter(|token| is_checkable(token.text))
}

/// Single letters and anything containing a digit are not worth checking.
fn is_checkable(word: &str) -> bool {
    word.chars().nth(1).is_some() && !word.chars().any(|c| c.is_numeric())
}

/// Split camelCase and snake_case into lowercase parts, so identifiers that
/// slip through as prose can still be looked up piece by piece.
pub fn split_compound_word(word: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        if ch == '_' || ch == '-' {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            result.push(std::mem::take(&mut current));
            current.extend(ch.to_lowercase());
        } else {
            current.extend(ch.to_lowercase());
        }
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}
