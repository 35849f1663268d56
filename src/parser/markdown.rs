//! Markdown masking.
//!
//! Structural regions that are not prose (code, link targets, HTML markup)
//! are overwritten with [`MASK`], one per byte. Line breaks survive, and so
//! does every other byte, so offsets in the masked view are offsets in the
//! original text.
//!
//! `MASK` is a form feed: whitespace to any word splitter, but neither
//! indentation nor a blank line to the block rules below. Masking a view a
//! second time therefore finds no new code blocks.

use crate::parser::html;
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;
use tracing::trace;

lazy_static! {
    static ref FENCE: Regex = Regex::new(r"^[ \t]*`{3,}").unwrap();
    static ref REFERENCE_DEFINITION: Regex = Regex::new(r"(?m)^ {0,3}\[[^\]\n]+\]:.*$").unwrap();
}

/// A masking stage. Each stage sees the output of the previous one, so text
/// blanked by an earlier stage is never matched again.
type Stage = fn(&str) -> Vec<Range<usize>>;

/// What masked bytes become.
pub const MASK: char = '\u{c}';

const STAGES: [Stage; 4] = [code_blocks, code_spans, link_targets, html::tags];

/// Mask everything in `content` that should not be spellchecked.
pub fn mask(content: &str) -> String {
    let mut view = mask_pass(content);
    let mut passes = 1;

    // Later stages can remove a bracket or backtick an earlier stage paired
    // with. Repeat until nothing changes.
    loop {
        let next = mask_pass(&view);
        if next == view {
            break;
        }
        view = next;
        passes += 1;
    }

    trace!(passes, bytes = content.len(), "masked markdown");
    view
}

fn mask_pass(content: &str) -> String {
    let mut view = content.to_string();
    for stage in STAGES {
        let regions = stage(&view);
        if !regions.is_empty() {
            view = blank(&view, &regions);
        }
    }
    view
}

/// Replace every character that starts inside one of `regions` with
/// [`MASK`], one per byte. `\n` and `\r` are kept.
pub(crate) fn blank(text: &str, regions: &[Range<usize>]) -> String {
    let mut covered = vec![false; text.len()];
    for region in regions {
        let start = region.start.min(text.len());
        let end = region.end.min(text.len());
        covered[start..end].fill(true);
    }

    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        if covered[i] && !matches!(ch, '\n' | '\r') {
            out.extend(std::iter::repeat(MASK).take(ch.len_utf8()));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Fenced and indented code blocks, as whole lines.
fn code_blocks(text: &str) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut fence_start: Option<usize> = None;
    // Start of document counts as a blank line, and so does an indented code
    // line. A closing fence does not.
    let mut prev_blank = true;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let body = line.trim_end_matches(['\n', '\r']);

        if let Some(open) = fence_start {
            if FENCE.is_match(body) {
                regions.push(open..offset);
                fence_start = None;
                prev_blank = false;
            }
            continue;
        }

        if FENCE.is_match(body) {
            fence_start = Some(start);
            continue;
        }

        if is_blank(body) {
            prev_blank = true;
            continue;
        }

        if prev_blank && indent_width(body) >= 4 {
            regions.push(start..offset);
            continue;
        }

        prev_blank = false;
    }

    if let Some(open) = fence_start {
        regions.push(open..text.len());
    }

    regions
}

fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| matches!(b, b' ' | b'\t'))
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Inline code: a run of N backticks up to the next run of exactly N on the
/// same line. Backslashes only matter before the opening run; inside a span
/// they are literal.
fn code_spans(text: &str) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let runs = backtick_runs(line);
        let mut i = 0;
        while i < runs.len() {
            let run = runs[i];
            // An escaped first backtick is literal; the rest of the run can
            // still open a span.
            let (open, len) = if run.escaped {
                (run.start + 1, run.len - 1)
            } else {
                (run.start, run.len)
            };
            if len == 0 {
                i += 1;
                continue;
            }
            match runs[i + 1..].iter().position(|r| r.len == len) {
                Some(j) => {
                    let close = runs[i + 1 + j].start;
                    regions.push(offset + open..offset + close + len);
                    i += j + 2;
                }
                None => i += 1,
            }
        }
        offset += line.len();
    }

    regions
}

#[derive(Debug, Clone, Copy)]
struct BacktickRun {
    start: usize,
    len: usize,
    /// Preceded by an odd number of backslashes.
    escaped: bool,
}

fn backtick_runs(line: &str) -> Vec<BacktickRun> {
    let bytes = line.as_bytes();
    let mut runs = Vec::new();
    let mut backslashes = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'`' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            runs.push(BacktickRun {
                start,
                len: i - start,
                escaped: backslashes % 2 == 1,
            });
            backslashes = 0;
        } else {
            backslashes = if bytes[i] == b'\\' { backslashes + 1 } else { 0 };
            i += 1;
        }
    }

    runs
}

/// Link and image targets: `[text](url)`, `![alt](url)`, `[text][label]`
/// and reference definitions. The brackets go, the text stays.
fn link_targets(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut regions: Vec<Range<usize>> = REFERENCE_DEFINITION
        .find_iter(text)
        .map(|m| m.range())
        .collect();

    // Positions of unmatched '[' (or "![" for images).
    let mut openers: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'[' => {
                let image = i > 0 && bytes[i - 1] == b'!';
                openers.push(if image { i - 1 } else { i });
            }
            b']' => {
                let Some(opener) = openers.pop() else {
                    i += 1;
                    continue;
                };
                let end = match bytes.get(i + 1) {
                    Some(b'(') => target_end(bytes, i + 1),
                    Some(b'[') => label_end(bytes, i + 1),
                    _ => None,
                };
                if let Some(end) = end {
                    let text_start = if bytes[opener] == b'!' {
                        opener + 2
                    } else {
                        opener + 1
                    };
                    regions.push(opener..text_start);
                    regions.push(i..end);
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    regions
}

/// End (exclusive) of the `(...)` group opening at `open`. Parentheses nest;
/// a blank line or end of input means there was no target.
fn target_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = open;

    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j + 1);
                }
            }
            b'\n' if starts_blank_line(&bytes[j + 1..]) => return None,
            _ => {}
        }
        j += 1;
    }

    None
}

/// End (exclusive) of a `[label]` that opens at `open` and stays on one line.
fn label_end(bytes: &[u8], open: usize) -> Option<usize> {
    bytes[open + 1..]
        .iter()
        .position(|&b| matches!(b, b']' | b'[' | b'\n'))
        .filter(|&p| bytes[open + 1 + p] == b']')
        .map(|p| open + p + 2)
}

fn starts_blank_line(rest: &[u8]) -> bool {
    rest.iter()
        .find(|&&b| !matches!(b, b' ' | b'\t' | b'\r'))
        .map_or(true, |&b| b == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blanked(n: usize) -> String {
        MASK.to_string().repeat(n)
    }

    /// `text` with every space standing for a masked byte.
    fn view(text: &str) -> String {
        text.replace(' ', &MASK.to_string())
    }

    #[test]
    fn test_fenced_code_is_masked() {
        assert_eq!(mask("```\ntset\n```"), view("   \n    \n   "));
    }

    #[test]
    fn test_fence_with_info_string_and_prose_after() {
        let content = "Intro\n```rust\nfn main() {}\n```\nOutro";
        let masked = mask(content);
        assert_eq!(masked, format!("Intro\n{}\n{}\n{}\nOutro", blanked(7), blanked(12), blanked(3)));
    }

    #[test]
    fn test_indented_fence_opens_block() {
        let masked = mask("text\n  ````\n  tset\n  ````\nmore");
        assert!(!masked.contains("tset"));
        assert!(masked.starts_with("text\n"));
        assert!(masked.ends_with("\nmore"));
    }

    #[test]
    fn test_unclosed_fence_masks_to_end() {
        let content = "Prose\n```\ncode\nstill code";
        assert_eq!(mask(content), format!("Prose\n{}", view("   \n    \n          ")));
    }

    #[test]
    fn test_backticks_in_info_string_still_open_fence() {
        let content = "```x``` y\ntpyo";
        assert_eq!(mask(content), format!("{}\n{}", blanked(9), blanked(4)));

        let content = "``` a `b`\ntpyo";
        assert_eq!(mask(content), format!("{}\n{}", blanked(9), blanked(4)));
    }

    #[test]
    fn test_line_after_closing_fence_is_not_indented_code() {
        let content = "```\ncode\n```\n    tset";
        assert_eq!(mask(content), format!("{}\n    tset", view("   \n    \n   ")));
    }

    #[test]
    fn test_indented_code_after_blank_line() {
        let content = "# Heading\n\n    tset\n\ntest";
        assert_eq!(mask(content), format!("# Heading\n\n{}\n\ntest", blanked(8)));
    }

    #[test]
    fn test_indented_code_at_start_of_document() {
        assert_eq!(mask("    tset\n    more\nprose"), format!("{}\n{}\nprose", blanked(8), blanked(8)));
    }

    #[test]
    fn test_indented_code_with_tab() {
        assert_eq!(mask("\ttset\n"), view("     \n"));
    }

    #[test]
    fn test_paragraph_continuation_is_not_code() {
        let content = "A paragraph\n    continued here";
        assert_eq!(mask(content), content);
    }

    #[test]
    fn test_masked_line_is_not_blank() {
        assert_eq!(mask("`x`\n    tset"), format!("{}\n    tset", blanked(3)));
    }

    #[test]
    fn test_masked_leading_code_is_not_indentation() {
        let content = "`foo` is a function\n\n`bar`    too";
        let once = mask(content);
        assert_eq!(once, format!("{} is a function\n\n{}    too", blanked(5), blanked(5)));
        assert_eq!(mask(&once), once);
    }

    #[test]
    fn test_inline_code_is_masked() {
        assert_eq!(mask("`tset`"), blanked(6));
        assert_eq!(mask("Use `tset` here"), format!("Use {} here", blanked(6)));
    }

    #[test]
    fn test_inline_code_with_longer_run() {
        assert_eq!(mask("a ``b ` c`` d"), format!("a {} d", blanked(9)));
    }

    #[test]
    fn test_unclosed_code_span_is_literal() {
        assert_eq!(mask("a `b c"), "a `b c");
        assert_eq!(mask("a ``b` c"), "a ``b` c");
    }

    #[test]
    fn test_code_span_does_not_cross_lines() {
        assert_eq!(mask("a `b\nc` d"), "a `b\nc` d");
    }

    #[test]
    fn test_escaped_backtick_is_literal() {
        assert_eq!(mask(r"a \`b` c"), r"a \`b` c");
        assert_eq!(mask(r"a \\`b` c"), format!(r"a \\{} c", blanked(3)));
    }

    #[test]
    fn test_backslash_inside_code_span_is_literal() {
        assert_eq!(mask(r"`tset\`"), blanked(7));
        assert_eq!(mask(r"see `C:\tset\` here"), format!("see {} here", blanked(10)));
        assert_eq!(mask(r"``\`` x"), format!("{} x", blanked(5)));
    }

    #[test]
    fn test_link_url_is_masked() {
        let content = "[My awesoem project](/github)";
        assert_eq!(mask(content), format!("{}My awesoem project{}", blanked(1), blanked(10)));
    }

    #[test]
    fn test_image_url_is_masked() {
        let content = "![Alt text with errror](/my-awesome-image.png)";
        let masked = mask(content);
        assert_eq!(masked.len(), content.len());
        assert_eq!(&masked[..2], view("  "));
        assert_eq!(&masked[2..22], "Alt text with errror");
        assert_eq!(masked[22..].trim(), "");
    }

    #[test]
    fn test_image_inside_link() {
        let content = "[![Alt text with errror](/my-awesome-image.png)](/github)";
        let masked = mask(content);
        assert_eq!(masked.trim(), "Alt text with errror");
        assert_eq!(masked.find("Alt"), content.find("Alt"));
    }

    #[test]
    fn test_link_target_with_parentheses_and_title() {
        let content = "See [docs](https://en.wikipedia.org/wiki/Foo_(bar) \"Tytle\") now";
        let masked = mask(content);
        assert_eq!(masked.split_whitespace().collect::<Vec<_>>(), ["See", "docs", "now"]);
    }

    #[test]
    fn test_unclosed_link_target_is_not_a_link() {
        let content = "[text](unfinished\n\nnext";
        assert_eq!(mask(content), content);
    }

    #[test]
    fn test_brackets_without_target_are_kept() {
        let content = "an [aside] in text";
        assert_eq!(mask(content), content);
    }

    #[test]
    fn test_reference_link_label_is_masked() {
        let content = "[Some text][lebel] here";
        assert_eq!(mask(content), format!("{}Some text{} here", blanked(1), blanked(8)));
    }

    #[test]
    fn test_reference_definition_is_masked() {
        let content = "Prose\n[lebel]: https://example.com \"Tytle\"\nMore";
        assert_eq!(mask(content), format!("Prose\n{}\nMore", blanked(36)));
    }

    #[test]
    fn test_inline_code_wins_over_link_text() {
        let content = "[foo `bar` baz](url)";
        assert_eq!(mask(content), format!("{}foo {} baz{}", blanked(1), blanked(5), blanked(6)));
    }

    #[test]
    fn test_html_tags_are_masked() {
        let content = "# Heading\n\n<img src=\"/test.png\">";
        assert_eq!(mask(content), format!("# Heading\n\n{}", blanked(21)));
    }

    #[test]
    fn test_code_inside_fence_is_not_html() {
        let content = "```\n<b>\n```\n<i>text</i>";
        assert_eq!(mask(content), view("   \n   \n   \n   text    "));
    }

    #[test]
    fn test_multibyte_text_keeps_length() {
        let content = "Café `naïve` [héllo](/ünï) ✓";
        let masked = mask(content);
        assert_eq!(masked.len(), content.len());
        assert!(masked.starts_with("Café "));
        assert!(masked.contains("héllo"));
        assert!(!masked.contains("naïve"));
        assert!(masked.ends_with('✓'));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "```\r\ntset\r\n```\r\nok";
        assert_eq!(mask(content), view("   \r\n    \r\n   \r\nok"));
    }

    #[test]
    fn test_mask_is_idempotent() {
        let content = "text\n`x`\n    code\n[a](b) <td>c</td>\n```\nz";
        let once = mask(content);
        assert_eq!(mask(&once), once);
    }

    #[test]
    fn test_blank_keeps_line_breaks() {
        assert_eq!(blank("ab\ncd", &[0..5]), view("  \n  "));
        assert_eq!(blank("abc", &[1..10]), view("a  "));
    }
}
