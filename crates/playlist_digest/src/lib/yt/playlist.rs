use std::time::Instant;

use crate::{
    error::Error,
    record::{PlaylistEntry, SkippedVideo, VideoRecord},
    yt::{PlaylistRef, PlaylistScraper, Transcript, TranscriptFetcher},
};

/// Fetched playlist members, split by whether their transcript could be obtained.
#[derive(Debug, Default)]
pub struct PlaylistLoad {
    /// In playlist order.
    pub records: Vec<VideoRecord>,
    pub skipped: Vec<SkippedVideo>,
}

/// Enumerates a playlist and fetches a transcript for every member, one at a time.
#[derive(Debug)]
pub struct PlaylistLoader<P, T> {
    scraper: P,
    transcripts: T,
}

impl<P, T> PlaylistLoader<P, T>
where
    P: PlaylistScraper,
    T: TranscriptFetcher,
{
    pub fn new(scraper: P, transcripts: T) -> Self {
        Self {
            scraper,
            transcripts,
        }
    }

    /// Members whose transcript fetch fails are moved to [`PlaylistLoad::skipped`];
    /// only an unreachable or invalid playlist fails the load.
    #[tracing::instrument(skip(self), fields(playlist = %playlist))]
    pub async fn load(&self, playlist: &PlaylistRef) -> Result<PlaylistLoad, Error> {
        let entries = self
            .scraper
            .scrape_playlist(playlist)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to scrape playlist"))?;

        let mut load = PlaylistLoad::default();
        for entry in entries {
            let started = Instant::now();
            let result = self
                .transcripts
                .fetch_transcript(&entry.video_id, &entry.title)
                .await;
            let elapsed = started.elapsed().as_secs_f64();

            match result {
                Ok(Transcript { text, publish_date }) => {
                    tracing::debug!(video_id = %entry.video_id, elapsed, "Fetched transcript");
                    let entry = PlaylistEntry {
                        publish_date: publish_date.or(entry.publish_date),
                        ..entry
                    };
                    load.records.push(VideoRecord::new(entry, text, elapsed));
                }
                Err(reason) => {
                    tracing::warn!(
                        video_id = %entry.video_id,
                        title = %entry.title,
                        reason = %reason,
                        "Skipping video without transcript"
                    );
                    load.skipped.push(SkippedVideo {
                        video_id: entry.video_id,
                        title: entry.title,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            fetched = load.records.len(),
            skipped = load.skipped.len(),
            "Loaded playlist"
        );

        Ok(load)
    }
}
