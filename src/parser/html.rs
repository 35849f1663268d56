//! Raw HTML inside Markdown.
//!
//! Only the markup is masked: tag names, attributes and comments. Text
//! between tags, such as table cell contents, is left for the spellchecker.
//! The exception is elements whose content is never prose (`script`, `style`,
//! `pre`, `code`), which are masked through their closing tag.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "pre", "code"];

lazy_static! {
    static ref OPENING_TAG: Regex = Regex::new(r"^<([A-Za-z][A-Za-z0-9-]*)").unwrap();
}

/// Regions covered by HTML tags, comments and raw-text element bodies.
/// Anything left unterminated runs to the end of `text`.
pub fn tags(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut regions = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' || !starts_tag(&bytes[i + 1..]) {
            i += 1;
            continue;
        }

        if text[i..].starts_with("<!--") {
            let end = text[i + 4..]
                .find("-->")
                .map_or(text.len(), |p| i + 4 + p + 3);
            regions.push(i..end);
            i = end;
            continue;
        }

        let end = tag_end(bytes, i).unwrap_or(text.len());
        regions.push(i..end);

        if let Some(name) = raw_text_element(&text[i..end]) {
            let close = closing_tag_end(text, end, &name).unwrap_or(text.len());
            regions.push(end..close);
            i = close;
            continue;
        }

        i = end;
    }

    regions
}

/// What follows a `<` for it to count as markup: a tag name, a closing tag,
/// a comment or declaration (`<!`), or a processing instruction (`<?`).
fn starts_tag(rest: &[u8]) -> bool {
    match rest {
        [b'/', c, ..] => c.is_ascii_alphabetic(),
        [b'!' | b'?', ..] => true,
        [c, ..] => c.is_ascii_alphabetic(),
        [] => false,
    }
}

/// End (exclusive) of the tag opening at `start`. A `>` inside a quoted
/// attribute value does not close the tag; quotes only count right after `=`.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_equals = false;

    for (j, &b) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'>' => return Some(j + 1),
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'=' => {
                    after_equals = true;
                    continue;
                }
                b' ' | b'\t' | b'\r' | b'\n' => continue,
                _ => {}
            },
        }
        after_equals = false;
    }

    None
}

/// Lowercased name of a raw-text element if `tag` opens one.
fn raw_text_element(tag: &str) -> Option<String> {
    if tag.ends_with("/>") {
        return None;
    }
    let name = OPENING_TAG.captures(tag)?.get(1)?.as_str().to_ascii_lowercase();
    RAW_TEXT_ELEMENTS
        .contains(&name.as_str())
        .then_some(name)
}

/// End (exclusive) of the first `</name>` at or after `from`, ignoring case.
fn closing_tag_end(text: &str, from: usize, name: &str) -> Option<usize> {
    let haystack = text[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);
    let bytes = text.as_bytes();

    let mut search = 0;
    while let Some(p) = haystack[search..].find(&needle) {
        let start = from + search + p;
        let after = start + needle.len();
        match bytes.get(after) {
            Some(b) if b.is_ascii_alphanumeric() || *b == b'-' => search += p + needle.len(),
            _ => return Some(tag_end(bytes, start).unwrap_or(text.len())),
        }
    }

    None
}
