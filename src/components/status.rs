//! Loading and error panels

/// Label of the retry affordance
pub const RETRY_LABEL: &str = "Try Again";

/// Error panel: heading, message and how to retry
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    pub title: &'static str,
    pub message: String,
    pub hint: &'static str,
}

impl ErrorPanel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Error loading data",
            message: message.into(),
            hint: "Press r to Try Again",
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            self.title.to_string(),
            self.message.clone(),
            String::new(),
            self.hint.to_string(),
        ]
    }
}

/// Spinner frame for a loading indicator
pub fn spinner(tick: u64) -> char {
    const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
    FRAMES[(tick % FRAMES.len() as u64) as usize]
}

pub fn loading_line(text: &str, tick: u64) -> String {
    format!("{} {}", spinner(tick), text)
}
