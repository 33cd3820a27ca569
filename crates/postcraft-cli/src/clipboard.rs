use anyhow::{Context, Result};
use arboard::Clipboard;

pub const COPIED: &str = "Content copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy content. Please try again.";

/// Clipboard access, mockable in tests.
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// Copies already-stripped preview text. Empty text is rejected.
pub fn copy_with(provider: &mut dyn ClipboardProvider, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to copy yet");
    }
    provider.set_text(text)
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = SystemClipboard::new()?;
    copy_with(&mut clipboard, text)
}
