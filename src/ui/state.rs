//! Window-local state
//!
//! The conversation itself lives in the session store. This holds only what
//! the window owns: the text being typed and a notice awaiting dismissal.

#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Current text in the input field
    pub input_text: String,

    /// Blocking notice shown until the user presses OK
    pub notice: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the input holds something worth sending
    pub fn has_query(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    /// Take the typed query, leaving the input empty
    pub fn take_query(&mut self) -> Option<String> {
        if !self.has_query() {
            return None;
        }
        Some(std::mem::take(&mut self.input_text).trim().to_string())
    }

    /// Show a notice; a notice already on screen is kept
    pub fn show_notice(&mut self, text: impl Into<String>) {
        if self.notice.is_none() {
            self.notice = Some(text.into());
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
