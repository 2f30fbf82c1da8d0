// src/menu.rs
//! Numbered text menu driving the store from standard input.
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::generator::{self, CharacterCounts};
use crate::models::{NewEntry, PasswordEntry};
use crate::store::RecordStore;
use chrono::Local;
use std::io::{self, BufRead, Write};

const RULE: &str = "----------------------------------------";

/// Renders entries as the fixed-width table used by `list` and the menu.
pub fn write_entries<W: Write>(out: &mut W, entries: &[PasswordEntry]) -> io::Result<()> {
    writeln!(out, "\nStored Passwords:")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "{:<20} {:<30} {:<15} {:<20} {:<10} {:<20}",
        "Website", "Link", "Username", "Password", "Length", "Date/Time"
    )?;
    writeln!(out, "{}", RULE)?;
    for entry in entries {
        writeln!(
            out,
            "{:<20} {:<30} {:<15} {:<20} {:<10} {:<20}",
            entry.website,
            entry.link.as_deref().unwrap_or(""),
            entry.username.as_deref().unwrap_or(""),
            entry.password,
            entry.length,
            entry.created_at
        )?;
    }
    writeln!(out, "{}", RULE)
}

pub fn print_entries(entries: &[PasswordEntry]) {
    if let Err(e) = write_entries(&mut io::stdout().lock(), entries) {
        log::error!("Failed to print entries: {}", e);
    }
}

pub struct Menu<'a, R, W> {
    store: &'a RecordStore,
    defaults: CharacterCounts,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a RecordStore, config: &Config, input: R, out: W) -> Self {
        Menu {
            store,
            defaults: config.default_counts,
            input,
            out,
        }
    }

    /// Reads one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        self.read_line()
    }

    fn prompt_count(&mut self, label: &str, default: i64) -> io::Result<Option<i64>> {
        loop {
            let Some(answer) = self.prompt(&format!("{} [{}]: ", label, default))? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.out, "Please enter a whole number.")?,
            }
        }
    }

    fn show_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(self.out, "|||  Welcome to Password Generator  |||")?;
        writeln!(self.out, "    1. Generate and Save New Password")?;
        writeln!(self.out, "    2. View All Passwords")?;
        writeln!(self.out, "    3. Search Password")?;
        writeln!(self.out, "    4. Remove Password")?;
        writeln!(self.out, "    5. Remove by Website or Username")?;
        writeln!(self.out, "    6. Exit")?;
        write!(self.out, "Enter your choice: ")?;
        self.out.flush()
    }

    /// Runs until the user exits or input ends. Storage failures are reported
    /// and the loop continues.
    pub fn run(&mut self) -> AppResult<()> {
        loop {
            self.show_header()?;
            let Some(choice) = self.read_line()? else {
                break;
            };
            let outcome = match choice.trim() {
                "1" => self.create_new_password(),
                "2" => self.view_passwords(),
                "3" => self.search_password(),
                "4" => self.remove_password(),
                "5" => self.remove_by_identifier(),
                "6" => {
                    writeln!(self.out, "Thank you for using Password Generator!")?;
                    break;
                }
                _ => {
                    writeln!(self.out, "Invalid option. Please try again.")?;
                    Ok(true)
                }
            };
            match outcome {
                Ok(true) => {}
                Ok(false) => break,
                Err(AppError::Store(e)) => {
                    log::error!("Menu action failed: {}", e);
                    writeln!(self.out, "Error: {}", e)?;
                }
                Err(AppError::Generator(e)) => writeln!(self.out, "Error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // Each action returns Ok(false) when input ran out mid-prompt.

    fn create_new_password(&mut self) -> AppResult<bool> {
        let Some(website) = self.prompt("Enter name of App or Website: ")? else {
            return Ok(false);
        };
        if website.trim().is_empty() {
            writeln!(self.out, "Website name cannot be empty.")?;
            return Ok(true);
        }
        let Some(link) = self.prompt("Enter website link (optional): ")? else {
            return Ok(false);
        };
        let Some(username) = self.prompt("Enter username (optional): ")? else {
            return Ok(false);
        };

        let defaults = self.defaults;
        let mut counts = [0i64; 4];
        let labels = [
            ("Enter the number of upper case letters", defaults.upper),
            ("Enter the number of lower case letters", defaults.lower),
            ("Enter the number of numbers", defaults.digits),
            ("Enter the number of symbols", defaults.symbols),
        ];
        for (slot, (label, default)) in counts.iter_mut().zip(labels) {
            match self.prompt_count(label, default)? {
                Some(n) => *slot = n,
                None => return Ok(false),
            }
        }
        let counts = CharacterCounts::new(counts[0], counts[1], counts[2], counts[3]);
        let password = generator::generate_password(&counts)?;

        let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };
        let entry = NewEntry {
            website,
            link: non_empty(link),
            username: non_empty(username),
            password,
        };
        self.store.insert(&entry)?;
        writeln!(self.out, "\nPassword for {} is: {}", entry.website, entry.password)?;
        self.view_passwords()
    }

    fn view_passwords(&mut self) -> AppResult<bool> {
        let entries = self.store.list_all()?;
        write_entries(&mut self.out, &entries)?;
        Ok(true)
    }

    fn search_password(&mut self) -> AppResult<bool> {
        let Some(term) = self.prompt("Enter app name to find password: ")? else {
            return Ok(false);
        };
        match self.store.find_first_matching(&term)? {
            Some(entry) => writeln!(self.out, "\nPassword for {} is: {}", entry.website, entry.password)?,
            None => writeln!(self.out, "\nApp / website not found in the database.")?,
        }
        Ok(true)
    }

    fn remove_password(&mut self) -> AppResult<bool> {
        let Some(password) = self.prompt("Enter the password to remove: ")? else {
            return Ok(false);
        };
        self.store.delete_by_exact_password(&password)?;
        writeln!(self.out, "\nUPDATED LIST")?;
        self.view_passwords()
    }

    fn remove_by_identifier(&mut self) -> AppResult<bool> {
        let Some(term) = self.prompt("Enter website or username to remove: ")? else {
            return Ok(false);
        };
        if term.is_empty() {
            writeln!(self.out, "Please enter a website name or username.")?;
        } else if self.store.delete_by_identifier_substring(&term)? {
            writeln!(self.out, "\nRemoved entries matching '{}'.", term)?;
        } else {
            writeln!(self.out, "\nNo entries match '{}'.", term)?;
        }
        Ok(true)
    }
}

pub fn run_menu(store: &RecordStore, config: &Config) -> AppResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(store, config, stdin.lock(), stdout.lock()).run()
}
