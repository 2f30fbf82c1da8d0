// src/clipboard.rs
use arboard::Clipboard;
use std::thread;
use std::time::Duration;

/// Copies `content` to the system clipboard.
pub fn copy(content: &str) -> Result<Clipboard, arboard::Error> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(content.to_string())?;
    log::info!("Copied value to clipboard.");
    Ok(clipboard)
}

/// Clears the clipboard if it still holds `content`.
pub fn clear_if_unchanged(clipboard: &mut Clipboard, content: &str) {
    match clipboard.get_text() {
        Ok(current) if current == content => match clipboard.clear() {
            Ok(()) => log::info!("Cleared copied value from clipboard."),
            Err(e) => log::warn!("Failed to clear clipboard: {}", e),
        },
        Ok(_) => log::debug!("Clipboard changed since copy; leaving it alone."),
        Err(e) => log::warn!("Failed to read clipboard before clearing: {}", e),
    }
}

/// Copies `content`, then blocks for `clear_after_seconds` and clears it again.
/// A zero timeout leaves the value on the clipboard.
pub fn copy_and_clear_after(content: &str, clear_after_seconds: u64) -> Result<(), arboard::Error> {
    let mut clipboard = copy(content)?;
    if clear_after_seconds > 0 {
        thread::sleep(Duration::from_secs(clear_after_seconds));
        clear_if_unchanged(&mut clipboard, content);
    }
    Ok(())
}
