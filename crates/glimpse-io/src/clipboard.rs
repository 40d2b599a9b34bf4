use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to open clipboard")?;
    clipboard
        .set_text(text.to_owned())
        .context("Failed to write clipboard text")?;
    tracing::debug!("Copied {} chars to clipboard", text.chars().count());
    Ok(())
}

