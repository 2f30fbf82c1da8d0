// src/tui.rs
use crate::clipboard;
use crate::config::Config;
use crate::error::{AppResult, TuiError};
use crate::generator::{self, CharacterCounts};
use crate::models::{NewEntry, PasswordEntry};
use crate::store::RecordStore;
use crate::strength::{self, StrengthBand};

use arboard::Clipboard;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use log;

const FIELD_LABELS: [&str; 7] = [
    "Website", "Link", "Username", "Upper", "Lower", "Digits", "Symbols",
];
const NUM_FORM_FIELDS: usize = FIELD_LABELS.len();
const FIRST_COUNT_FIELD: usize = 3;
const MASK: &str = "••••••••";
const BASE_KEYS: &str = "(q) Quit | (j/k) Nav | (a) New | (/) Search | (r) Remove by name | (d) Delete | (c) Copy | (v) Reveal";

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    Form,
    Search,
    RemoveByIdentifier,
}

/// Values typed into the generate-and-save form.
#[derive(Clone, Debug)]
struct FormData {
    fields: [String; NUM_FORM_FIELDS],
    generated: Option<String>,
    show_generated: bool,
}

impl FormData {
    fn new(defaults: &CharacterCounts) -> Self {
        FormData {
            fields: [
                String::new(),
                String::new(),
                String::new(),
                defaults.upper.to_string(),
                defaults.lower.to_string(),
                defaults.digits.to_string(),
                defaults.symbols.to_string(),
            ],
            generated: None,
            show_generated: false,
        }
    }

    fn counts(&self) -> Result<CharacterCounts, String> {
        let mut parsed = [0i64; 4];
        for (i, slot) in parsed.iter_mut().enumerate() {
            let field = FIRST_COUNT_FIELD + i;
            *slot = self.fields[field]
                .trim()
                .parse()
                .map_err(|_| format!("{} must be a whole number.", FIELD_LABELS[field]))?;
        }
        Ok(CharacterCounts::new(parsed[0], parsed[1], parsed[2], parsed[3]))
    }

    fn optional(&self, index: usize) -> Option<String> {
        let value = self.fields[index].trim();
        if value.is_empty() { None } else { Some(self.fields[index].clone()) }
    }
}

struct PendingClear {
    clipboard: Clipboard,
    content: String,
    copied_at: Instant,
}

pub struct App {
    should_quit: bool,
    store: RecordStore,
    config: Config,
    entries: Vec<PasswordEntry>,
    selected_entry_index: Option<usize>,
    list_state: ListState,
    reveal_selected: bool,
    app_status: String,
    input_mode: InputMode,
    form: FormData,
    editing_field_index: usize,
    prompt_input: String,
    pending_clear: Option<PendingClear>,
}

impl App {
    pub fn new(store: RecordStore, config: Config) -> Self {
        let form = FormData::new(&config.default_counts);
        App {
            should_quit: false,
            store,
            config,
            entries: Vec::new(),
            selected_entry_index: None,
            list_state: ListState::default(),
            reveal_selected: false,
            app_status: "Initializing...".to_string(),
            input_mode: InputMode::Normal,
            form,
            editing_field_index: 0,
            prompt_input: String::new(),
            pending_clear: None,
        }
    }

    fn selected_entry(&self) -> Option<&PasswordEntry> {
        self.selected_entry_index.and_then(|i| self.entries.get(i))
    }

    fn copy_to_clipboard(&mut self, content: String, field_name: &str) {
        match clipboard::copy(&content) {
            Ok(clipboard) => {
                self.app_status = format!("{} copied to clipboard!", field_name);
                if self.config.clipboard_clear_time_seconds > 0 {
                    self.pending_clear = Some(PendingClear {
                        clipboard,
                        content,
                        copied_at: Instant::now(),
                    });
                }
            }
            Err(err) => {
                self.app_status = format!("Error copying {}: {}", field_name, err);
                log::error!("Error setting clipboard text for {}: {}", field_name, err);
            }
        }
    }

    /// Clears a copied value once the configured timeout has passed.
    fn on_tick(&mut self) {
        let timeout = Duration::from_secs(self.config.clipboard_clear_time_seconds);
        let expired = self
            .pending_clear
            .as_ref()
            .is_some_and(|pending| pending.copied_at.elapsed() >= timeout);
        if expired {
            if let Some(mut pending) = self.pending_clear.take() {
                clipboard::clear_if_unchanged(&mut pending.clipboard, &pending.content);
                self.app_status = "Clipboard cleared.".to_string();
            }
        }
    }

    /// Reloads the entry list from the store, keeping the selection in range.
    fn refresh_entries(&mut self) {
        match self.store.list_all() {
            Ok(entries) => {
                self.entries = entries;
                log::debug!("Loaded {} entries into the TUI.", self.entries.len());
            }
            Err(e) => {
                self.app_status = format!("Error loading entries: {}", e);
                log::error!("Failed to load entries: {}", e);
                return;
            }
        }
        self.selected_entry_index = match (self.entries.len(), self.selected_entry_index) {
            (0, _) => None,
            (n, Some(i)) if i >= n => Some(n - 1),
            (_, Some(i)) => Some(i),
            (_, None) => Some(0),
        };
        self.list_state.select(self.selected_entry_index);
        self.reveal_selected = false;
    }

    pub fn on_key(&mut self, key_event: KeyEvent) {
        log::debug!("Key event received: {:?}", key_event.code);
        match self.input_mode {
            InputMode::Normal => self.on_normal_key(key_event.code),
            InputMode::Form => self.on_form_key(key_event),
            InputMode::Search | InputMode::RemoveByIdentifier => self.on_prompt_key(key_event.code),
        }
    }

    fn on_normal_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('a') => {
                self.form = FormData::new(&self.config.default_counts);
                self.editing_field_index = 0;
                self.input_mode = InputMode::Form;
                self.app_status =
                    "New password: (Tab) Next | (Enter) Generate | (Ctrl+S) Save | (Ctrl+T) Show | (Ctrl+Y) Copy | (Esc) Cancel"
                        .to_string();
                log::info!("Switched to InputMode::Form");
            }
            KeyCode::Char('/') => {
                self.prompt_input.clear();
                self.input_mode = InputMode::Search;
                self.app_status = "Search website or username: (Enter) Find | (Esc) Cancel".to_string();
            }
            KeyCode::Char('r') => {
                self.prompt_input.clear();
                self.input_mode = InputMode::RemoveByIdentifier;
                self.app_status =
                    "Remove all entries whose website or username contains: (Enter) Remove | (Esc) Cancel"
                        .to_string();
            }
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('c') => match self.selected_entry().map(|e| e.password.clone()) {
                Some(password) => self.copy_to_clipboard(password, "Password"),
                None => self.app_status = "No entry selected to copy.".to_string(),
            },
            KeyCode::Char('v') => {
                if self.selected_entry_index.is_some() {
                    self.reveal_selected = !self.reveal_selected;
                }
            }
            _ => {}
        }
    }

    /// Deletes every entry sharing the selected entry's password.
    fn delete_selected(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else {
            self.app_status = "No entry selected to delete.".to_string();
            return;
        };
        match self.store.delete_by_exact_password(&entry.password) {
            Ok(removed) => {
                self.app_status = format!("Deleted {} entr{} with the password of '{}'.",
                    removed, if removed == 1 { "y" } else { "ies" }, entry.website);
                self.refresh_entries();
            }
            Err(e) => {
                self.app_status = format!("Failed to delete: {}", e);
                log::error!("Failed to delete entry: {}", e);
            }
        }
    }

    fn on_form_key(&mut self, key_event: KeyEvent) {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('s') if ctrl => self.save_form(),
            KeyCode::Char('t') if ctrl => {
                self.form.show_generated = !self.form.show_generated;
            }
            KeyCode::Char('y') if ctrl => match self.form.generated.clone() {
                Some(password) => self.copy_to_clipboard(password, "Password"),
                None => self.app_status = "Generate a password first.".to_string(),
            },
            KeyCode::Char(c) => {
                self.form.fields[self.editing_field_index].push(c);
            }
            KeyCode::Backspace => {
                self.form.fields[self.editing_field_index].pop();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.editing_field_index = (self.editing_field_index + 1) % NUM_FORM_FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.editing_field_index = (self.editing_field_index + NUM_FORM_FIELDS - 1) % NUM_FORM_FIELDS;
            }
            KeyCode::Enter => self.generate_from_form(),
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.app_status = "New password cancelled.".to_string();
                log::info!("Switched to InputMode::Normal via Esc from form.");
            }
            _ => {}
        }
    }

    fn generate_from_form(&mut self) {
        let counts = match self.form.counts() {
            Ok(counts) => counts,
            Err(msg) => {
                self.app_status = msg;
                return;
            }
        };
        match generator::generate_password(&counts) {
            Ok(password) => {
                let score = strength::score(&password);
                self.app_status = format!(
                    "Password generated successfully! Strength: {}",
                    StrengthBand::from_score(score).as_str()
                );
                self.form.generated = Some(password);
                self.form.show_generated = false;
            }
            Err(e) => {
                self.app_status = e.to_string();
            }
        }
    }

    fn save_form(&mut self) {
        let Some(password) = self.form.generated.clone().filter(|p| !p.is_empty()) else {
            self.app_status = "Please generate a password first".to_string();
            return;
        };
        if self.form.fields[0].trim().is_empty() {
            self.app_status = "Please enter a website name".to_string();
            self.editing_field_index = 0;
            return;
        }
        let entry = NewEntry {
            website: self.form.fields[0].clone(),
            link: self.form.optional(1),
            username: self.form.optional(2),
            password,
        };
        match self.store.insert(&entry) {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.selected_entry_index = Some(0);
                self.refresh_entries();
                self.app_status = format!("Password for '{}' saved!", entry.website);
            }
            Err(e) => {
                self.app_status = format!("Failed to save password: {}", e);
                log::error!("Failed to save password: {}", e);
            }
        }
    }

    fn on_prompt_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char(c) => self.prompt_input.push(c),
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.app_status = "Cancelled.".to_string();
            }
            KeyCode::Enter => {
                let term = self.prompt_input.clone();
                if term.is_empty() {
                    self.app_status = "Please enter a website name or username.".to_string();
                    return;
                }
                let mode = self.input_mode;
                self.input_mode = InputMode::Normal;
                match mode {
                    InputMode::Search => self.search(&term),
                    InputMode::RemoveByIdentifier => self.remove_by_identifier(&term),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn search(&mut self, term: &str) {
        match self.store.find_first_matching(term) {
            Ok(Some(found)) => {
                self.refresh_entries();
                self.selected_entry_index = self.entries.iter().position(|e| *e == found);
                self.list_state.select(self.selected_entry_index);
                self.reveal_selected = false;
                self.app_status = format!("Found '{}'. (c) Copy | (v) Reveal", found.website);
            }
            Ok(None) => {
                self.app_status = "App / website not found in the database.".to_string();
            }
            Err(e) => {
                self.app_status = format!("Search failed: {}", e);
                log::error!("Search failed: {}", e);
            }
        }
    }

    fn remove_by_identifier(&mut self, term: &str) {
        match self.store.delete_by_identifier_substring(term) {
            Ok(true) => {
                self.app_status = format!("Removed entries matching '{}'.", term);
                self.refresh_entries();
            }
            Ok(false) => {
                self.app_status = format!("No entries match '{}'.", term);
            }
            Err(e) => {
                self.app_status = format!("Failed to remove: {}", e);
                log::error!("Failed to remove by identifier: {}", e);
            }
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.entries.is_empty() {
            self.selected_entry_index = None;
            self.list_state.select(None);
            return;
        }
        let current_index = self.selected_entry_index.unwrap_or(0) as i32;
        let new_index = (current_index + delta).clamp(0, self.entries.len() as i32 - 1);
        self.selected_entry_index = Some(new_index as usize);
        self.list_state.select(self.selected_entry_index);
        self.reveal_selected = false;
    }

    fn load_initial_entries(&mut self) {
        self.refresh_entries();
        self.app_status = format!("Loaded {} entries from {:?}.", self.entries.len(), self.store.path());
        log::info!("TUI loaded {} entries.", self.entries.len());
    }
}

pub fn run_tui(store: RecordStore, config: Config) -> AppResult<()> {
    log::info!("Initializing TUI...");
    enable_raw_mode().map_err(|e| { log::error!("Failed to enable raw mode: {}", e); TuiError::Io(e) })?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| { log::error!("Failed to setup terminal screen: {}", e); TuiError::Io(e) })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| { log::error!("Failed to create terminal: {}", e); TuiError::Io(e) })?;

    let mut app = App::new(store, config);
    app.load_initial_entries();

    log::info!("Starting TUI application loop.");
    let res = run_app_loop(&mut terminal, &mut app);
    log::info!("TUI application loop finished.");

    disable_raw_mode().map_err(|e| { log::error!("Failed to disable raw mode: {}", e); TuiError::Io(e) })?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(|e| { log::error!("Failed to restore terminal screen: {}", e); TuiError::Io(e) })?;

    res?;
    log::info!("TUI shutdown complete.");
    Ok(())
}

fn run_app_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<(), TuiError> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app)).map_err(|e| { log::error!("Terminal draw error: {}", e); TuiError::Io(e) })?;

        if event::poll(Duration::from_millis(100)).map_err(|e| { log::error!("Event poll error: {}", e); TuiError::Io(e) })? {
            if let Event::Key(key_event) = event::read().map_err(|e| { log::error!("Event read error: {}", e); TuiError::Io(e) })? {
                if key_event.kind == KeyEventKind::Press {
                    app.on_key(key_event);
                }
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn draw_main_ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[0]);

    let list_area = main_chunks[0];
    let detail_area = main_chunks[1];
    let status_bar_area = chunks[1];

    let entries_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Entries ({})", app.entries.len()));
    if app.entries.is_empty() {
        let no_entries_text = Paragraph::new("No entries found. Press 'a' to create one.")
            .block(entries_block).alignment(Alignment::Center).wrap(Wrap { trim: true });
        f.render_widget(no_entries_text, list_area);
    } else {
        let list_items: Vec<ListItem> = app.entries.iter()
            .map(|entry| {
                let who = entry.username.as_deref().unwrap_or("-");
                ListItem::new(Span::raw(format!("{} - {} - {}", entry.website, who, MASK)))
            })
            .collect();
        let list = List::new(list_items)
            .block(entries_block)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Gray))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, list_area, &mut app.list_state);
    }

    let details_block = Block::default().borders(Borders::ALL).title("Details");
    match app.selected_entry() {
        Some(entry) => {
            let password = if app.reveal_selected { entry.password.as_str() } else { MASK };
            let length = entry.length.to_string();
            let detail_text = vec![
                Line::from(vec![Span::styled("Website: ", Style::default().bold()), Span::raw(&entry.website)]),
                Line::from(vec![Span::styled("Link: ", Style::default().bold()), Span::raw(entry.link.as_deref().unwrap_or(""))]),
                Line::from(vec![Span::styled("Username: ", Style::default().bold()), Span::raw(entry.username.as_deref().unwrap_or(""))]),
                Line::from(vec![Span::styled("Password: ", Style::default().bold()), Span::raw(password)]),
                Line::from(vec![Span::styled("Length: ", Style::default().bold()), Span::raw(length)]),
                Line::from(vec![Span::styled("Created: ", Style::default().bold()), Span::raw(&entry.created_at)]),
            ];
            let details_paragraph = Paragraph::new(detail_text).block(details_block).wrap(Wrap { trim: true });
            f.render_widget(details_paragraph, detail_area);
        }
        None => {
            let text = Paragraph::new("Select an entry to see details.").block(details_block).alignment(Alignment::Center);
            f.render_widget(text, detail_area);
        }
    }

    let status_text = match app.input_mode {
        InputMode::Normal => format!("{} | {}", app.app_status, BASE_KEYS),
        InputMode::Search | InputMode::RemoveByIdentifier => {
            format!("{} > {}▋", app.app_status, app.prompt_input)
        }
        InputMode::Form => app.app_status.clone(),
    };
    let status_paragraph = Paragraph::new(status_text).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status_paragraph, status_bar_area);
}

fn strength_color(band: StrengthBand) -> Color {
    match band {
        StrengthBand::VeryWeak => Color::Red,
        StrengthBand::Weak => Color::LightRed,
        StrengthBand::Moderate => Color::Yellow,
        StrengthBand::Strong => Color::Green,
        StrengthBand::VeryStrong => Color::LightGreen,
    }
}

fn draw_form(f: &mut Frame, app: &App) {
    let form_area = centered_rect(60, 80, f.size());
    f.render_widget(Clear, form_area);
    f.render_widget(Block::default().title("Generate New Password").borders(Borders::ALL), form_area);

    let mut constraints = vec![Constraint::Length(3); NUM_FORM_FIELDS];
    constraints.extend([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)]);
    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(form_area);

    for (i, label) in FIELD_LABELS.iter().enumerate() {
        let mut text = app.form.fields[i].clone();
        if app.editing_field_index == i {
            text.push('▋');
        }
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(*label))
            .style(if app.editing_field_index == i { Style::default().fg(Color::Yellow) } else { Style::default() });
        f.render_widget(paragraph, form_chunks[i]);
    }

    let generated = match &app.form.generated {
        Some(p) if app.form.show_generated => p.clone(),
        Some(p) => "•".repeat(p.chars().count()),
        None => String::new(),
    };
    let generated_paragraph = Paragraph::new(generated)
        .block(Block::default().borders(Borders::ALL).title("Generated Password"));
    f.render_widget(generated_paragraph, form_chunks[NUM_FORM_FIELDS]);

    let score = app.form.generated.as_deref().map(strength::score).unwrap_or(0);
    let band = StrengthBand::from_score(score);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Password Strength: {}", band.as_str())))
        .gauge_style(Style::default().fg(strength_color(band)))
        .percent(u16::from(score));
    f.render_widget(gauge, form_chunks[NUM_FORM_FIELDS + 1]);
}

fn ui(f: &mut Frame, app: &mut App) {
    draw_main_ui(f, app);
    if app.input_mode == InputMode::Form {
        draw_form(f, app);
    }
}

/// Helper to create a centered rect for popups.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn test_app() -> (App, TempDir) {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("tui.db")).unwrap();
        let mut app = App::new(store, Config::default());
        app.load_initial_entries();
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_generate_and_save_from_form() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::Form);

        type_text(&mut app, "GitHub");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "github.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Enter);
        let generated = app.form.generated.clone().expect("password generated");
        assert_eq!(Some(generated.len() as i64), CharacterCounts::default().total());

        ctrl(&mut app, 's');
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].website, "GitHub");
        assert_eq!(app.entries[0].username.as_deref(), Some("alice"));
        assert_eq!(app.entries[0].password, generated);
        assert_eq!(app.selected_entry_index, Some(0));
    }

    #[test]
    fn test_save_requires_generated_password_and_website() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('a'));
        ctrl(&mut app, 's');
        assert_eq!(app.app_status, "Please generate a password first");

        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 's');
        assert_eq!(app.app_status, "Please enter a website name");
        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.entries.is_empty());
    }

    #[test]
    fn test_invalid_count_in_form() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('a'));
        for _ in 0..FIRST_COUNT_FIELD {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.app_status, "Upper must be a whole number.");
        assert!(app.form.generated.is_none());

        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "-2");
        press(&mut app, KeyCode::Enter);
        assert!(app.app_status.contains("must not be negative"));
    }

    #[test]
    fn test_search_selects_match() {
        let (mut app, _dir) = test_app();
        app.store.insert(&NewEntry::new("Example.com", "one")).unwrap();
        app.store.insert(&NewEntry::new("other", "two")).unwrap();
        app.refresh_entries();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "EXAMPLE");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.selected_entry().map(|e| e.website.as_str()), Some("Example.com"));

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz-nomatch");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.app_status, "App / website not found in the database.");
    }

    #[test]
    fn test_search_finds_entry_added_after_list_loaded() {
        let (mut app, _dir) = test_app();
        app.store.insert(&NewEntry::new("older", "one")).unwrap();
        app.refresh_entries();
        app.store.insert(&NewEntry::new("fresh.io", "two")).unwrap();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "fresh");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.entries.len(), 2);
        assert_eq!(app.selected_entry().map(|e| e.password.as_str()), Some("two"));
        assert!(app.app_status.starts_with("Found 'fresh.io'"));
    }

    #[test]
    fn test_remove_by_identifier_and_delete_selected() {
        let (mut app, _dir) = test_app();
        app.store.insert(&NewEntry::new("MegaCorp", "a")).unwrap();
        app.store.insert(&NewEntry::new("keep", "shared")).unwrap();
        app.store.insert(&NewEntry::new("also", "shared")).unwrap();
        app.refresh_entries();

        press(&mut app, KeyCode::Char('r'));
        type_text(&mut app, "corp");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.entries.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.entries.is_empty());
        assert_eq!(app.selected_entry_index, None);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let (mut app, _dir) = test_app();
        for site in ["a", "b", "c"] {
            app.store.insert(&NewEntry::new(site, "pw")).unwrap();
        }
        app.refresh_entries();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_entry_index, Some(0));
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.selected_entry_index, Some(2));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
