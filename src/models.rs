// src/models.rs
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Timestamp format of the `datetime` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Removes every comma; stored fields end up in comma-separated listings.
pub fn strip_commas(value: &str) -> String {
    value.replace(',', "")
}

/// One stored password record, as read back from the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PasswordEntry {
    pub website: String,
    pub link: Option<String>,
    pub username: Option<String>,
    pub password: String,
    /// Character count of `password` when it was stored.
    pub length: i64,
    pub created_at: String,
}

/// Fields supplied by a caller when saving a password.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub website: String,
    pub link: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

impl NewEntry {
    pub fn new(website: impl Into<String>, password: impl Into<String>) -> Self {
        NewEntry {
            website: website.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Commas stripped from the identifying fields; the password is kept verbatim.
    pub fn sanitized(&self) -> NewEntry {
        NewEntry {
            website: strip_commas(&self.website),
            link: self.link.as_deref().map(strip_commas),
            username: self.username.as_deref().map(strip_commas),
            password: self.password.clone(),
        }
    }

    pub fn password_length(&self) -> i64 {
        self.password.chars().count() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_sanitized_strips_commas_but_not_password() {
        let entry = NewEntry::new("Site, Inc.", "p,a,ss")
            .with_link("a,b.com")
            .with_username("x,y");
        let clean = entry.sanitized();
        assert_eq!(clean.website, "Site Inc.");
        assert_eq!(clean.link.as_deref(), Some("ab.com"));
        assert_eq!(clean.username.as_deref(), Some("xy"));
        assert_eq!(clean.password, "p,a,ss");
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert_eq!(NewEntry::new("w", "Ab3$xy9Q").password_length(), 8);
        assert_eq!(NewEntry::new("w", "héllo").password_length(), 5);
    }

    #[test]
    fn test_format_timestamp() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp::<Utc>(&dt), "2024-03-09 07:05:01");
        assert_eq!(now_timestamp().len(), 19);
    }
}
