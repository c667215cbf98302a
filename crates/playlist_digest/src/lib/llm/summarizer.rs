use std::{fmt::Display, future::Future};

/// A chat-completion backend producing one summary per call.
pub trait Summarizer {
    /// Input budget in tokens, leaving headroom for the system prompt and the reply.
    const CONTEXT_WINDOW_LIMIT: usize = 128_000 - 18_000;
    const SUMMARIZER_MODEL: &str;
    const MAX_OUTPUT_TOKENS: u32 = 750;

    type Error: Display;

    fn summarize(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> impl Future<Output = Result<SummaryResponse, Self::Error>>;

    /// Whether `error` will recur on every later call, e.g. a rejected credential.
    fn is_fatal(_error: &Self::Error) -> bool {
        false
    }

    /// Character budget for a compiled prompt, at roughly four characters per token.
    fn prompt_char_budget() -> usize {
        Self::CONTEXT_WINDOW_LIMIT * 4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    pub summary: String,
}
