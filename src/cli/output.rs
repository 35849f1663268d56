use crate::{Misspelling, Range};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONTEXT_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Misspellings found in one file, along with its text so they can be
/// placed on lines.
pub struct FileReport {
    pub path: PathBuf,
    pub content: String,
    pub misspellings: Vec<Misspelling>,
}

impl FileReport {
    pub fn located(&self) -> impl Iterator<Item = (Location, &Misspelling)> + '_ {
        let lines = LineIndex::new(&self.content);
        self.misspellings
            .iter()
            .map(move |m| (lines.locate(&self.content, m.index), m))
    }
}

/// 1-based line and column (in characters) of a range's start, plus the text
/// of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub context: String,
}

struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn locate(&self, content: &str, range: Range) -> Location {
        let line = self.starts.partition_point(|&s| s <= range.start).max(1);
        let line_start = self.starts[line - 1];
        let line_end = content[line_start..]
            .find('\n')
            .map_or(content.len(), |p| line_start + p);

        let before = content.get(line_start..range.start).unwrap_or("");
        let column = before.chars().count() + 1;
        let line_text = content[line_start..line_end].trim_end_matches('\r');

        Location {
            line,
            column,
            context: clip(line_text, column - 1, range.len()),
        }
    }
}

/// Up to `CONTEXT_CHARS` characters either side of the word.
fn clip(line: &str, column: usize, word_bytes: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let word_chars = line
        .char_indices()
        .skip(column)
        .take_while(|(i, _)| *i < byte_index(line, column) + word_bytes)
        .count();

    let start = column.saturating_sub(CONTEXT_CHARS);
    let end = (column + word_chars + CONTEXT_CHARS).min(chars.len());
    let context: String = chars[start..end].iter().collect();

    match (start > 0, end < chars.len()) {
        (true, true) => format!("...{}...", context.trim()),
        (true, false) => format!("...{}", context.trim()),
        (false, true) => format!("{}...", context.trim()),
        (false, false) => context.trim().to_string(),
    }
}

fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(i, _)| i)
}

#[derive(Debug, Serialize)]
struct JsonMisspelling<'a> {
    index: Range,
    misspelling: &'a str,
    suggestions: &'a [String],
    line: usize,
    column: usize,
}

#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    file: String,
    misspellings: Vec<JsonMisspelling<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_misspellings: usize,
    files: Vec<JsonFile<'a>>,
}

pub fn print_report(report: &FileReport, colored_output: bool) {
    if report.misspellings.is_empty() {
        return;
    }

    let file_name = report.path.display().to_string();

    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for (location, misspelling) in report.located() {
        let line_info = format!("{}:{}", location.line, location.column);
        let word = &misspelling.misspelling;

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                word.red().bold(),
                location.context.replace(word.as_str(), &word.red().bold().to_string())
            );
        } else {
            println!("  {} {} {}", line_info, word, location.context);
        }

        if !misspelling.suggestions.is_empty() {
            let separator = if colored_output {
                ", ".dimmed().to_string()
            } else {
                ", ".to_string()
            };
            let suggestions = misspelling
                .suggestions
                .iter()
                .map(|s| {
                    if colored_output {
                        s.green().to_string()
                    } else {
                        s.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator);
            let arrow = if colored_output {
                "→".dimmed().to_string()
            } else {
                "→".to_string()
            };
            println!("    {} {}", arrow, suggestions);
        }
    }
}

pub fn render_json(reports: &[FileReport]) -> Result<String> {
    let files = reports
        .iter()
        .map(|report| JsonFile {
            file: report.path.display().to_string(),
            misspellings: report
                .located()
                .map(|(location, m)| JsonMisspelling {
                    index: m.index,
                    misspelling: &m.misspelling,
                    suggestions: &m.suggestions,
                    line: location.line,
                    column: location.column,
                })
                .collect(),
        })
        .collect();

    let output = JsonOutput {
        files_checked: reports.len(),
        total_misspellings: reports.iter().map(|r| r.misspellings.len()).sum(),
        files,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn print_check_summary(total: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    if total == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
        return;
    }

    let noun = if total == 1 { "misspelling" } else { "misspellings" };
    let file_noun = if files.len() == 1 { "file" } else { "files" };
    if colored {
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total.to_string().red().bold(),
            noun,
            files.len(),
            file_noun
        );
    } else {
        println!("✗ {} {} found in {} {}", total, noun, files.len(), file_noun);
    }
}
