use crate::checker::dictionary::Dictionary;
use crate::config::{Config, DEFAULT_LANGUAGE};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where `dict build` writes when no output is given.
pub fn default_output() -> Result<PathBuf> {
    let data_dir = Config::data_dir().context("Failed to get data directory")?;
    Ok(data_dir.join(format!("{}.dict", DEFAULT_LANGUAGE)))
}

/// Compile a plain word list (one word per line, `#` comments allowed) into
/// an FST dictionary.
pub fn build_dictionary(wordlist: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output()?,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = fs::read_to_string(wordlist)
        .with_context(|| format!("Failed to read word list: {}", wordlist.display()))?;
    debug!(wordlist = %wordlist.display(), output = %output.display(), "building dictionary");

    let count = Dictionary::build_from_words(content.lines(), &output)?;

    println!(
        "{} Dictionary built: {} ({} words)",
        "✓".green().bold(),
        output.display().to_string().cyan(),
        count.to_string().yellow()
    );

    Ok(output)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = Config::data_dir().context("Failed to get data directory")?;

    let mut found = Vec::new();
    if data_dir.exists() {
        for entry in fs::read_dir(&data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("dict") {
                found.push(path);
            }
        }
    }
    found.sort();

    if found.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to build one.",
            "mdspell dict build <WORDLIST>".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for path in found {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        let size_kb = fs::metadata(&path)?.len() / 1024;

        println!(
            "  {} {} ({})",
            "✓".green(),
            name.cyan().bold(),
            format!("{}KB", size_kb).dimmed()
        );
    }

    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}
