//! Records flowing through a run: playlist members, fetched videos, summaries, and the
//! report handed to the presentation layer.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::yt::TranscriptError;

/// A playlist member as the provider lists it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub publish_date: Option<NaiveDate>,
    pub duration_secs: u64,
}

/// A playlist member whose transcript was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub publish_date: Option<NaiveDate>,
    pub duration_secs: u64,
    pub transcript: String,
    pub transcript_fetch_secs: f64,
}

impl VideoRecord {
    pub fn new(entry: PlaylistEntry, transcript: String, transcript_fetch_secs: f64) -> Self {
        let PlaylistEntry {
            video_id,
            title,
            author,
            publish_date,
            duration_secs,
        } = entry;

        Self {
            video_id,
            title,
            author,
            publish_date,
            duration_secs,
            transcript,
            transcript_fetch_secs: round_secs(transcript_fetch_secs),
        }
    }
}

/// The summarized form of a [`VideoRecord`]. Field order matches the exported table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    #[serde(rename = "date_published", serialize_with = "serialize_date")]
    pub publish_date: Option<NaiveDate>,
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    #[serde(skip)]
    pub transcript_fetch_secs: f64,
    #[serde(skip)]
    pub completion_secs: f64,
}

impl SummaryRecord {
    pub fn new(record: &VideoRecord, summary: String, completion_secs: f64) -> Self {
        Self {
            video_id: record.video_id.clone(),
            title: record.title.clone(),
            author: record.author.clone(),
            summary,
            publish_date: record.publish_date,
            duration_secs: record.duration_secs,
            transcript_fetch_secs: record.transcript_fetch_secs,
            completion_secs: round_secs(completion_secs),
        }
    }

    /// `YYYY-MM-DD`, or empty when the provider did not report a date.
    pub fn date_published(&self) -> String {
        self.publish_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

fn serialize_date<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => s.collect_str(&date.format("%Y-%m-%d")),
        None => s.serialize_str(""),
    }
}

/// A video left out of the summaries because its transcript was unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedVideo {
    pub video_id: String,
    pub title: String,
    pub reason: TranscriptError,
}

/// A video whose completion call failed; the rest of the run carried on.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedVideo {
    pub video_id: String,
    pub title: String,
    pub error: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub playlist: String,
    /// Keyed by video id, in playlist order.
    pub summaries: IndexMap<String, SummaryRecord>,
    pub skipped: Vec<SkippedVideo>,
    pub failed: Vec<FailedVideo>,
}

impl RunReport {
    pub fn new(playlist: impl Into<String>) -> Self {
        Self {
            playlist: playlist.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
