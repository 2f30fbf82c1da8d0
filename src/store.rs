// src/store.rs
use crate::error::{StoreError, StoreResult};
use crate::models::{self, NewEntry, PasswordEntry};
use log;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::fs;
use std::path::{Path, PathBuf};

const CREATE_PASSWORDS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS passwords (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        website TEXT NOT NULL,
        link TEXT,
        username TEXT,
        password TEXT NOT NULL,
        length INTEGER NOT NULL,
        datetime TEXT NOT NULL
    )";

const SELECT_COLUMNS: &str = "SELECT website, link, username, password, length, datetime FROM passwords";

// Newest first; rows written in the same second fall back to insertion order.
const NEWEST_FIRST: &str = "ORDER BY datetime DESC, id DESC";

// SQLite's LOWER only folds ASCII, so both sides go through `fold_case` instead.
const FOLD_CASE_FN: &str = "fold_case";

const MATCHES_IDENTIFIER: &str = "WHERE instr(fold_case(website), fold_case(?1)) > 0
    OR instr(fold_case(username), fold_case(?1)) > 0";

/// Persistent collection of password entries backed by a single SQLite file.
///
/// Each operation opens its own connection and closes it on return, so the
/// store holds no connection state between calls.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Opens (creating if needed) the database file and its `passwords` table.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        log::info!("Opening password store at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    log::error!("Failed to create store directory {:?}: {}", parent, e);
                    StoreError::Unavailable {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
            }
        }

        let store = RecordStore { path };
        let conn = store.connect()?;
        conn.execute(CREATE_PASSWORDS_TABLE, []).map_err(|e| {
            log::error!("Failed to create passwords table: {}", e);
            StoreError::Query(e)
        })?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| {
            log::error!("Failed to open database {:?}: {}", self.path, e);
            StoreError::Unavailable {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        register_fold_case(&conn)?;
        Ok(conn)
    }

    /// Stores a new entry, stamping it with its length and the current time.
    pub fn insert(&self, entry: &NewEntry) -> StoreResult<()> {
        let clean = entry.sanitized();
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO passwords (website, link, username, password, length, datetime)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                clean.website,
                clean.link,
                clean.username,
                clean.password,
                clean.password_length(),
                models::now_timestamp(),
            ],
        )
        .map_err(|e| {
            log::error!("Failed to insert entry for '{}': {}", clean.website, e);
            StoreError::Query(e)
        })?;
        log::info!("Saved password entry for '{}'", clean.website);
        Ok(())
    }

    /// Every entry, most recently created first.
    pub fn list_all(&self) -> StoreResult<Vec<PasswordEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{} {}", SELECT_COLUMNS, NEWEST_FIRST))?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Listed {} entries", entries.len());
        Ok(entries)
    }

    /// The most recently created entry whose website or username contains `term`,
    /// ignoring case.
    pub fn find_first_matching(&self, term: &str) -> StoreResult<Option<PasswordEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{} {} {} LIMIT 1",
            SELECT_COLUMNS, MATCHES_IDENTIFIER, NEWEST_FIRST
        ))?;
        let mut rows = stmt.query_map(params![term], entry_from_row)?;
        let found = rows.next().transpose()?;
        log::debug!("Search matched: {}", found.is_some());
        Ok(found)
    }

    /// Removes every entry whose password equals `password` exactly.
    /// Returns how many entries were removed.
    pub fn delete_by_exact_password(&self, password: &str) -> StoreResult<usize> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM passwords WHERE password = ?1", params![password])
            .map_err(|e| {
                log::error!("Failed to delete by password: {}", e);
                StoreError::Query(e)
            })?;
        log::info!("Removed {} entries by exact password", removed);
        Ok(removed)
    }

    /// Removes every entry whose website or username contains `term`, ignoring case.
    /// Returns whether anything was removed.
    pub fn delete_by_identifier_substring(&self, term: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        let removed = conn
            .execute(
                &format!("DELETE FROM passwords {}", MATCHES_IDENTIFIER),
                params![term],
            )
            .map_err(|e| {
                log::error!("Failed to delete by identifier: {}", e);
                StoreError::Query(e)
            })?;
        log::info!("Removed {} entries matching identifier", removed);
        Ok(removed > 0)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM passwords", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Registers `fold_case(text)`: full Unicode lowercasing, NULL stays NULL.
fn register_fold_case(conn: &Connection) -> StoreResult<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
    .map_err(|e| {
        log::error!("Failed to register {} on the connection: {}", FOLD_CASE_FN, e);
        StoreError::Query(e)
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<PasswordEntry> {
    Ok(PasswordEntry {
        website: row.get(0)?,
        link: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        length: row.get(4)?,
        created_at: row.get(5)?,
    })
}
