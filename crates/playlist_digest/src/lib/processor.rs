pub mod builder;

use std::time::Instant;

use crate::{
    config::RunConfiguration,
    error::Error,
    prompt::{compile, fit_transcript},
    record::{FailedVideo, RunReport, SummaryRecord},
    yt::{
        playlist::{PlaylistLoad, PlaylistLoader},
        PlaylistRef, PlaylistScraper, TranscriptFetcher,
    },
    Summarizer, SummaryResponse,
};

// Loads a playlist, then summarizes every video that has a transcript, one at a time
#[derive(Debug)]
pub struct PlaylistSummarizer<P, T, S>
where
    P: PlaylistScraper,
    T: TranscriptFetcher,
    S: Summarizer,
{
    loader: PlaylistLoader<P, T>,
    summarizer: S,
    system_prompt: String,
}

impl<P, T, S> PlaylistSummarizer<P, T, S>
where
    P: PlaylistScraper,
    T: TranscriptFetcher,
    S: Summarizer,
{
    /// Validates `config` and summarizes the playlist it names.
    #[tracing::instrument(skip_all, fields(playlist = %config.playlist))]
    pub async fn run(&self, config: &RunConfiguration) -> Result<RunReport, Error> {
        config.validate()?;
        let playlist = PlaylistRef::parse(&config.playlist)?;

        self.summarize_playlist(&playlist, config.user_prompt(), &config.topic)
            .await
    }

    /// Summarizes every video of `playlist` whose transcript can be fetched.
    ///
    /// A failed completion is recorded against its video and the run moves on, unless the
    /// summarizer reports the failure as fatal (e.g. a rejected credential), in which case
    /// the run aborts with [`Error::CompletionCallFailed`].
    #[tracing::instrument(skip(self, user_prompt))]
    pub async fn summarize_playlist(
        &self,
        playlist: &PlaylistRef,
        user_prompt: &str,
        topic: &str,
    ) -> Result<RunReport, Error> {
        let PlaylistLoad { records, skipped } = self.loader.load(playlist).await?;

        let mut report = RunReport::new(playlist.id());
        report.skipped = skipped;

        if records.is_empty() {
            tracing::info!("No videos with transcripts to summarize");
            return Ok(report);
        }

        let budget = S::prompt_char_budget().saturating_sub(self.system_prompt.chars().count());

        for record in &records {
            let transcript = fit_transcript(user_prompt, topic, &record.transcript, budget);
            let prompt = compile(user_prompt, &transcript, topic);

            let started = Instant::now();
            let result = self.summarizer.summarize(&self.system_prompt, &prompt).await;
            let elapsed = started.elapsed().as_secs_f64();

            match result {
                Ok(SummaryResponse { summary }) => {
                    tracing::info!(video_id = %record.video_id, elapsed, "Summarized video");
                    report.summaries.insert(
                        record.video_id.clone(),
                        SummaryRecord::new(record, summary, elapsed),
                    );
                }
                Err(e) if S::is_fatal(&e) => {
                    tracing::error!(video_id = %record.video_id, error = %e, "Aborting run");
                    return Err(Error::CompletionCallFailed {
                        title: record.title.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(video_id = %record.video_id, error = %e, "Failed to summarize video");
                    report.failed.push(FailedVideo {
                        video_id: record.video_id.clone(),
                        title: record.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            summarized = report.summaries.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Finished playlist"
        );

        Ok(report)
    }
}
