use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use ignore::WalkBuilder;
use mdspell::cli::output::{self, FileReport, OutputFormat};
use mdspell::config::ConfigFile;
use mdspell::{dict, Config, SpellChecker};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};

/// Extensions picked up when walking a directory.
const CHECKED_EXTENSIONS: &[&str] = &["md", "txt"];

#[derive(Parser, Debug)]
#[command(name = "mdspell")]
#[command(version, about = "A Markdown-aware spellchecker", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Compiled dictionary to check against
    #[arg(short, long, env = "MDSPELL_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Maximum suggestions per misspelling
    #[arg(short, long)]
    max_suggestions: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if misspellings are found
    #[arg(long)]
    no_fail: bool,

    /// Log what the checker is doing to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// Compile a word list (one word per line) into a dictionary
    Build {
        /// Word list to compile
        wordlist: PathBuf,

        /// Where to write the dictionary (defaults to the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List installed dictionaries
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let colored = !cli.no_color;
    if !colored {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, colored);

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "mdspell", &mut io::stdout());
        return Ok(());
    }

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let config = Config::load(ConfigFile {
        dictionary: cli.dictionary.clone(),
        max_suggestions: cli.max_suggestions,
    })?;
    debug!(?config, "configuration loaded");

    let checker = SpellChecker::new(&config)?;

    let files = collect_files(&cli.paths);
    let mut reports = Vec::with_capacity(files.len());

    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        let file_name = path.to_string_lossy();
        let misspellings = mdspell::get_misspellings(&checker, &content, &file_name).await?;

        reports.push(FileReport {
            path: path.clone(),
            content,
            misspellings,
        });
    }

    let total: usize = reports.iter().map(|r| r.misspellings.len()).sum();

    match cli.format {
        OutputFormat::Text => {
            for report in &reports {
                output::print_report(report, colored);
            }
            let checked: Vec<&PathBuf> = reports.iter().map(|r| &r.path).collect();
            output::print_check_summary(total, &checked, colored);
        }
        OutputFormat::Json => println!("{}", output::render_json(&reports)?),
    }

    if total > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool, ansi: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(io::stderr)
        .init();
}

/// Expand directories into the checkable files beneath them, honoring
/// ignore files. Plain file arguments are kept as given.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) if is_checked_file(entry.path()) => found.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => warn!("Skipping entry under {}: {}", path.display(), err),
            }
        }
        found.sort();
        files.extend(found);
    }

    files
}

fn is_checked_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| {
                CHECKED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str())
            })
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::Build { wordlist, output } => {
                dict::manager::build_dictionary(&wordlist, output.as_deref())?;
            }
            DictCommands::List => {
                dict::manager::list_dictionaries()?;
            }
        },
    }
    Ok(())
}
