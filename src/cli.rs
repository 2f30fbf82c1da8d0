// src/cli.rs
use crate::clipboard;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::export;
use crate::generator::{self, CharacterCounts};
use crate::menu;
use crate::models::NewEntry;
use crate::store::RecordStore;
use crate::strength::{self, StrengthBand};
use clap::{Args, Parser, Subcommand};
use log;
use rpassword;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Generates random passwords and keeps them in a local store.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = false)] // No subcommand opens the text menu
pub struct Cli {
    /// Path to the password database (overrides the configured location)
    #[clap(long, global = true, value_parser)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Per-class character counts; unset counts come from the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct CountArgs {
    /// Number of uppercase letters
    #[clap(short, long, allow_negative_numbers = true)]
    pub upper: Option<i64>,
    /// Number of lowercase letters
    #[clap(short, long, allow_negative_numbers = true)]
    pub lower: Option<i64>,
    /// Number of digits
    #[clap(short, long, allow_negative_numbers = true)]
    pub digits: Option<i64>,
    /// Number of symbols
    #[clap(short, long, allow_negative_numbers = true)]
    pub symbols: Option<i64>,
}

impl CountArgs {
    pub fn resolve(&self, defaults: &CharacterCounts) -> CharacterCounts {
        CharacterCounts {
            upper: self.upper.unwrap_or(defaults.upper),
            lower: self.lower.unwrap_or(defaults.lower),
            digits: self.digits.unwrap_or(defaults.digits),
            symbols: self.symbols.unwrap_or(defaults.symbols),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a password without saving it
    Generate {
        #[clap(flatten)]
        counts: CountArgs,
        /// Copy the password to the clipboard
        #[clap(long)]
        copy: bool,
    },
    /// Save a password for a website, generating one unless --password is given
    Add {
        website: String,
        #[clap(long)]
        link: Option<String>,
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        password: Option<String>,
        #[clap(flatten)]
        counts: CountArgs,
    },
    /// List all stored passwords, newest first
    List,
    /// Show the most recent entry whose website or username contains TERM
    Find { term: String },
    /// Remove every entry with exactly this password (prompted if omitted)
    Remove {
        #[clap(long)]
        password: Option<String>,
    },
    /// Remove every entry whose website or username contains TERM
    RemoveBy { term: String },
    /// Write all entries as CSV
    Export {
        /// Output file; standard output if omitted
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },
    /// Launch the interactive text menu
    Menu,
    /// Launch the Terminal User Interface (TUI)
    Tui,
}

/// Which interactive front-end, if any, should run after the command.
#[derive(Debug, PartialEq, Eq)]
pub enum Frontend {
    Menu,
    Tui,
}

fn print_generated(password: &str) {
    let score = strength::score(password);
    println!("{}", password);
    println!("Strength: {} ({}/100)", StrengthBand::from_score(score).as_str(), score);
}

/// Handles the parsed CLI command.
/// Returns the interactive front-end to launch, or `None` once a one-shot command is done.
pub fn handle_cli_command(
    command: Option<Commands>,
    store: &RecordStore,
    config: &Config,
) -> AppResult<Option<Frontend>> {
    log::debug!("Handling CLI command: {:?}", command);
    match command {
        Some(Commands::Generate { counts, copy }) => {
            let counts = counts.resolve(&config.default_counts);
            let password = generator::generate_password(&counts)?;
            print_generated(&password);
            if copy {
                if config.clipboard_clear_time_seconds > 0 {
                    println!(
                        "Copied to clipboard. Clearing in {} seconds...",
                        config.clipboard_clear_time_seconds
                    );
                }
                clipboard::copy_and_clear_after(&password, config.clipboard_clear_time_seconds)
                    .map_err(|e| {
                        log::error!("Clipboard copy failed: {}", e);
                        AppError::Cli(format!("Failed to copy to clipboard: {}", e))
                    })?;
            }
            Ok(None)
        }
        Some(Commands::Add { website, link, username, password, counts }) => {
            if website.trim().is_empty() {
                return Err(AppError::Cli("Website name cannot be empty.".to_string()));
            }
            let password = match password {
                Some(p) => p,
                None => {
                    let generated =
                        generator::generate_password(&counts.resolve(&config.default_counts))?;
                    print_generated(&generated);
                    generated
                }
            };
            let mut entry = NewEntry::new(website, password);
            if let Some(link) = link {
                entry = entry.with_link(link);
            }
            if let Some(username) = username {
                entry = entry.with_username(username);
            }
            store.insert(&entry)?;
            println!("Password for {} saved ({} stored).", entry.website, store.count()?);
            Ok(None)
        }
        Some(Commands::List) => {
            menu::print_entries(&store.list_all()?);
            Ok(None)
        }
        Some(Commands::Find { term }) => {
            match store.find_first_matching(&term)? {
                Some(entry) => println!("Password for {} is: {}", entry.website, entry.password),
                None => println!("App / website not found in the database."),
            }
            Ok(None)
        }
        Some(Commands::Remove { password }) => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Enter the password to remove: ").map_err(|e| {
                    log::error!("Failed to read password to remove: {}", e);
                    AppError::Cli(format!("Failed to read password: {}", e))
                })?,
            };
            let removed = store.delete_by_exact_password(&password)?;
            println!("Removed {} entr{}.", removed, if removed == 1 { "y" } else { "ies" });
            Ok(None)
        }
        Some(Commands::RemoveBy { term }) => {
            if term.is_empty() {
                log::warn!("Refusing to remove with an empty identifier.");
                return Err(AppError::Cli("Identifier cannot be empty.".to_string()));
            }
            if store.delete_by_identifier_substring(&term)? {
                println!("Removed entries matching '{}'.", term);
            } else {
                println!("No entries match '{}'.", term);
            }
            Ok(None)
        }
        Some(Commands::Export { output }) => {
            let entries = store.list_all()?;
            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        log::error!("Failed to create export file {:?}: {}", path, e);
                        AppError::Io(e)
                    })?;
                    export::write_csv(&entries, io::BufWriter::new(file))?;
                    println!("Exported {} entries to {:?}.", entries.len(), path);
                }
                None => export::write_csv(&entries, io::stdout().lock())?,
            }
            Ok(None)
        }
        Some(Commands::Tui) => {
            log::info!("'tui' command given, preparing to launch TUI.");
            Ok(Some(Frontend::Tui))
        }
        Some(Commands::Menu) | None => {
            log::info!("Launching the text menu.");
            Ok(Some(Frontend::Menu))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("passgen-rs").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_no_subcommand_opens_menu() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        let cli = parse(&[]);
        let frontend = handle_cli_command(cli.command, &store, &Config::default()).unwrap();
        assert_eq!(frontend, Some(Frontend::Menu));
    }

    #[test]
    fn test_count_args_fall_back_to_defaults() {
        let cli = parse(&["generate", "-u", "7", "--symbols", "0"]);
        match cli.command {
            Some(Commands::Generate { counts, copy }) => {
                assert!(!copy);
                let resolved = counts.resolve(&CharacterCounts::new(1, 2, 3, 4));
                assert_eq!(resolved, CharacterCounts::new(7, 2, 3, 0));
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        let cli = parse(&["generate", "-l", "-3"]);
        match handle_cli_command(cli.command, &store, &Config::default()) {
            Err(AppError::Generator(_)) => {}
            other => panic!("Expected generator error, got {:?}", other),
        }
    }

    #[test]
    fn test_add_with_generated_password_and_remove_by() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        let config = Config::default();

        let cli = parse(&["--db", "ignored.db", "add", "Example.com", "--username", "alice"]);
        assert_eq!(cli.db, Some(PathBuf::from("ignored.db")));
        assert_eq!(handle_cli_command(cli.command, &store, &config).unwrap(), None);

        let entry = store.find_first_matching("example").unwrap().unwrap();
        assert_eq!(entry.username.as_deref(), Some("alice"));
        assert_eq!(Some(entry.length), config.default_counts.total());

        let cli = parse(&["remove-by", "EXAMPLE"]);
        handle_cli_command(cli.command, &store, &config).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_remove_by_empty_term_is_refused() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        store.insert(&NewEntry::new("keep", "pw")).unwrap();
        let cli = parse(&["remove-by", ""]);
        assert!(matches!(
            handle_cli_command(cli.command, &store, &Config::default()),
            Err(AppError::Cli(_))
        ));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_with_explicit_password() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        store.insert(&NewEntry::new("a", "same")).unwrap();
        store.insert(&NewEntry::new("b", "same")).unwrap();
        let cli = parse(&["remove", "--password", "same"]);
        handle_cli_command(cli.command, &store, &Config::default()).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("p.db")).unwrap();
        store.insert(&NewEntry::new("GitHub", "Ab3$xy9Q")).unwrap();
        let out = dir.path().join("out.csv");
        let cli = parse(&["export", "--output", out.to_str().unwrap()]);
        handle_cli_command(cli.command, &store, &Config::default()).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(export::CSV_HEADER));
        assert!(lines.next().unwrap().starts_with("GitHub,,,Ab3$xy9Q,8,"));
    }
}
