use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use playlist_digest::yt::{Transcript, TranscriptError, TranscriptFetcher, TranscriptResult};

/// Returns `transcript of <id>` published on 2024-05-13 for every video, unless a transcript,
/// date or failure is registered for it.
#[derive(Clone, Default)]
pub struct MockTranscriptFetcher {
    pub transcripts: HashMap<String, String>,
    pub publish_dates: HashMap<String, Option<NaiveDate>>,
    pub failures: HashMap<String, TranscriptError>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTranscriptFetcher {
    pub fn with_transcript(mut self, video_id: &str, transcript: &str) -> Self {
        self.transcripts
            .insert(video_id.to_string(), transcript.to_string());
        self
    }

    pub fn with_publish_date(mut self, video_id: &str, date: Option<NaiveDate>) -> Self {
        self.publish_dates.insert(video_id.to_string(), date);
        self
    }

    pub fn failing_for(mut self, video_id: &str, reason: TranscriptError) -> Self {
        self.failures.insert(video_id.to_string(), reason);
        self
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    async fn fetch_transcript(&self, video_id: &str, title: &str) -> TranscriptResult {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), title.to_string()));
        if let Some(reason) = self.failures.get(video_id) {
            return Err(reason.clone());
        }

        Ok(Transcript {
            text: self
                .transcripts
                .get(video_id)
                .cloned()
                .unwrap_or_else(|| format!("transcript of {video_id}")),
            publish_date: self
                .publish_dates
                .get(video_id)
                .copied()
                .unwrap_or(NaiveDate::from_ymd_opt(2024, 5, 13)),
        })
    }
}
