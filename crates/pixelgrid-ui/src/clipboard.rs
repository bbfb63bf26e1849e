use anyhow::{Context, Result, anyhow};

/// Text clipboard capability.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// The system clipboard. A handle is opened per call.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut cb = arboard::Clipboard::new().context("clipboard unavailable")?;
        cb.set_text(text.to_owned()).context("clipboard write failed")
    }

    fn get_text(&mut self) -> Result<String> {
        let mut cb = arboard::Clipboard::new().context("clipboard unavailable")?;
        cb.get_text().context("clipboard read failed")
    }
}

/// In-process clipboard for headless shells and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail, as a denied system clipboard would.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    #[inline]
    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.unavailable {
            return Err(anyhow!("clipboard unavailable"));
        }
        self.text = Some(text.to_owned());
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        if self.unavailable {
            return Err(anyhow!("clipboard unavailable"));
        }
        self.text.clone().context("clipboard is empty")
    }
}
