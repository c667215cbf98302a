//! The interactive flow around a run: collect input, summarize, show results, start over.

use crate::{
    config::RunConfiguration,
    error::Error,
    record::RunReport,
    yt::{PlaylistScraper, TranscriptFetcher},
    PlaylistSummarizer, Summarizer,
};

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    CollectingInput,
    Summarizing(RunConfiguration),
    Done(Result<RunReport, Error>),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::CollectingInput => "collecting input",
            SessionState::Summarizing(_) => "summarizing",
            SessionState::Done(_) => "done",
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Accepts the caller's input. An incomplete configuration leaves the session collecting
    /// input.
    pub fn submit(&mut self, config: RunConfiguration) -> Result<(), Error> {
        self.expect("submit", |state| matches!(state, SessionState::CollectingInput))?;
        config.validate()?;

        self.state = SessionState::Summarizing(config);
        Ok(())
    }

    /// Runs the submitted configuration once. Any run failure lands in [`SessionState::Done`];
    /// the returned error only covers calling this out of order.
    pub async fn summarize<P, T, S>(
        &mut self,
        summarizer: &PlaylistSummarizer<P, T, S>,
    ) -> Result<(), Error>
    where
        P: PlaylistScraper,
        T: TranscriptFetcher,
        S: Summarizer,
    {
        let SessionState::Summarizing(config) = &self.state else {
            return Err(Error::InvalidTransition {
                state: self.state.name(),
                event: "summarize",
            });
        };

        let outcome = summarizer.run(config).await;
        self.state = SessionState::Done(outcome);
        Ok(())
    }

    /// The finished run's outcome, once the session is done.
    pub fn outcome(&self) -> Option<&Result<RunReport, Error>> {
        match &self.state {
            SessionState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Takes the outcome out, returning the session to collecting input.
    pub fn take_outcome(&mut self) -> Option<Result<RunReport, Error>> {
        match std::mem::take(&mut self.state) {
            SessionState::Done(outcome) => Some(outcome),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Discards the previous run and returns to collecting input.
    pub fn start_over(&mut self) -> Result<(), Error> {
        self.expect("start over", |state| matches!(state, SessionState::Done(_)))?;
        self.state = SessionState::CollectingInput;
        Ok(())
    }

    fn expect(
        &self,
        event: &'static str,
        allowed: impl Fn(&SessionState) -> bool,
    ) -> Result<(), Error> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                state: self.state.name(),
                event,
            })
        }
    }
}
