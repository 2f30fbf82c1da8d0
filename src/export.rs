// src/export.rs
use crate::models::PasswordEntry;
use std::borrow::Cow;
use std::io::{self, Write};

pub const CSV_HEADER: &str = "website,link,username,password,length,date/time";

/// Quotes a field holding a comma, quote or line break, doubling inner quotes.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes entries as comma-separated lines under [`CSV_HEADER`].
///
/// Passwords are stored verbatim and may contain separators, so any field that
/// needs it is quoted.
pub fn write_csv<W: Write>(entries: &[PasswordEntry], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for entry in entries {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            csv_field(&entry.website),
            csv_field(entry.link.as_deref().unwrap_or("")),
            csv_field(entry.username.as_deref().unwrap_or("")),
            csv_field(&entry.password),
            entry.length,
            csv_field(&entry.created_at)
        )?;
    }
    writer.flush()?;
    log::info!("Exported {} entries as CSV", entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv() {
        let entries = vec![
            PasswordEntry {
                website: "GitHub".to_string(),
                link: Some("github.com".to_string()),
                username: Some("alice".to_string()),
                password: "Ab3$xy9Q".to_string(),
                length: 8,
                created_at: "2024-01-02 03:04:05".to_string(),
            },
            PasswordEntry {
                website: "bare".to_string(),
                link: None,
                username: None,
                password: "pw".to_string(),
                length: 2,
                created_at: "2024-01-01 00:00:00".to_string(),
            },
        ];
        let mut out = Vec::new();
        write_csv(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "website,link,username,password,length,date/time\n\
             GitHub,github.com,alice,Ab3$xy9Q,8,2024-01-02 03:04:05\n\
             bare,,,pw,2,2024-01-01 00:00:00\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_separators_in_password() {
        let entries = vec![PasswordEntry {
            website: "bank".to_string(),
            link: None,
            username: None,
            password: "a,\"b\"\nc".to_string(),
            length: 7,
            created_at: "2024-01-01 00:00:00".to_string(),
        }];
        let mut out = Vec::new();
        write_csv(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "website,link,username,password,length,date/time\n\
             bank,,,\"a,\"\"b\"\"\nc\",7,2024-01-01 00:00:00\n"
        );
    }

    #[test]
    fn test_write_csv_empty_has_header_only() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", CSV_HEADER));
    }
}
