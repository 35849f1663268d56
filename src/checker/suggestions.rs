use crate::checker::dictionary::Dictionary;
use std::collections::HashSet;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Suggest corrections for `word`, best first.
///
/// Candidates come from single edits that land in the dictionary and from
/// words sharing a prefix with `word`; they are ranked by edit distance, then
/// by how much of the start of `word` they keep, then alphabetically.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 {
        return Vec::new();
    }

    let lower = word.to_lowercase();
    let mut candidates: HashSet<String> = single_edits(&lower)
        .into_iter()
        .filter(|w| dictionary.contains(w))
        .collect();

    let prefix: String = lower.chars().take(2).collect();
    if !prefix.is_empty() {
        candidates.extend(
            dictionary
                .words_with_prefix(&prefix)
                .into_iter()
                .filter(|w| edit_distance(&lower, w) <= 2),
        );
    }

    // Short words have few useful prefix matches.
    if candidates.len() < max_suggestions && lower.chars().count() <= 3 {
        candidates.extend(dictionary.words_within(&lower, 1));
    }

    candidates.remove(&lower);

    let mut ranked: Vec<(usize, usize, String)> = candidates
        .into_iter()
        .map(|w| (edit_distance(&lower, &w), usize::MAX - common_prefix(&lower, &w), w))
        .collect();
    ranked.sort();

    ranked
        .into_iter()
        .take(max_suggestions)
        .map(|(_, _, w)| match_case(word, &w))
        .collect()
}

/// Levenshtein distance, counting transpositions of neighbours as one edit.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                curr[j] = curr[j].min(before[j - 2] + 1);
            }
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Every string one deletion, transposition, substitution or insertion away.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    for i in 0..chars.len() {
        let mut w = chars.clone();
        w.remove(i);
        edits.push(w.into_iter().collect());
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut w = chars.clone();
        w.swap(i, i + 1);
        edits.push(w.into_iter().collect());
    }

    for i in 0..chars.len() {
        for c in ALPHABET.chars().filter(|&c| c != chars[i]) {
            let mut w = chars.clone();
            w[i] = c;
            edits.push(w.into_iter().collect());
        }
    }

    for i in 0..=chars.len() {
        for c in ALPHABET.chars() {
            let mut w = chars.clone();
            w.insert(i, c);
            edits.push(w.into_iter().collect());
        }
    }

    edits
}

fn common_prefix(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Carry the capitalisation of `original` over to `suggestion`.
fn match_case(original: &str, suggestion: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().map_or(false, char::is_uppercase);
    let rest_upper = original.chars().count() > 1 && chars.all(|c| !c.is_lowercase());

    if first_upper && rest_upper {
        suggestion.to_uppercase()
    } else if first_upper {
        let mut s = suggestion.chars();
        match s.next() {
            Some(c) => c.to_uppercase().chain(s).collect(),
            None => String::new(),
        }
    } else {
        suggestion.to_string()
    }
}
