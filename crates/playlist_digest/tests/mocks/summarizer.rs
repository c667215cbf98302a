use std::{
    fmt,
    sync::{Arc, Mutex},
};

use playlist_digest::{Summarizer, SummaryResponse};

#[derive(Debug)]
pub struct MockError {
    pub message: String,
    pub fatal: bool,
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Answers `summary of: <user prompt>`; fails for prompts containing `fail_on`.
#[derive(Clone)]
pub struct MockSummarizer {
    /// `(system prompt, user prompt)` per call
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_on: Option<String>,
    pub fatal: bool,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            fatal: false,
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn fatal_on(marker: &str) -> Self {
        Self {
            fatal: true,
            ..Self::failing_on(marker)
        }
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, user)| user.clone())
            .collect()
    }

    fn answer(&self, system_prompt: &str, content: &str) -> Result<SummaryResponse, MockError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), content.to_string()));

        match &self.fail_on {
            Some(marker) if content.contains(marker.as_str()) => Err(MockError {
                message: format!("mock completion failure ({})", if self.fatal { 401 } else { 429 }),
                fatal: self.fatal,
            }),
            _ => Ok(SummaryResponse {
                summary: format!("summary of: {content}"),
            }),
        }
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &'static str = "mock-gpt";
    type Error = MockError;

    async fn summarize(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<SummaryResponse, Self::Error> {
        self.answer(system_prompt, content)
    }

    fn is_fatal(error: &Self::Error) -> bool {
        error.fatal
    }
}

/// A [`MockSummarizer`] with a context window small enough to force truncation.
#[derive(Clone)]
pub struct SmallContextSummarizer(pub MockSummarizer);

impl Summarizer for SmallContextSummarizer {
    const CONTEXT_WINDOW_LIMIT: usize = 50;
    const SUMMARIZER_MODEL: &'static str = "mock-gpt-small";
    type Error = MockError;

    async fn summarize(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<SummaryResponse, Self::Error> {
        self.0.answer(system_prompt, content)
    }
}
