//! Serde views over the JSON YouTube embeds in its pages.
//!
//! Only the fields this crate reads are modelled; everything else is ignored.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Runs {
    #[serde(default)]
    pub runs: Vec<TextRun>,
    #[serde(rename = "simpleText")]
    pub simple_text: Option<String>,
}

impl Runs {
    /// Text of the first run, falling back to `simpleText`.
    pub fn text(&self) -> Option<&str> {
        self.runs
            .first()
            .map(|run| run.text.as_str())
            .or(self.simple_text.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TextRun {
    pub text: String,
}

/// `playlistVideoRenderer` item of a playlist page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideoRenderer {
    pub video_id: String,
    #[serde(default)]
    pub title: Runs,
    pub short_byline_text: Option<Runs>,
    pub length_seconds: Option<String>,
    #[serde(default = "default_playable")]
    pub is_playable: bool,
}

fn default_playable() -> bool {
    true
}

/// `ytInitialPlayerResponse` of a watch page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    pub playability_status: PlayabilityStatus,
    pub microformat: Option<Microformat>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayabilityStatus {
    pub status: String,
    pub reason: Option<String>,
}

impl Default for PlayabilityStatus {
    fn default() -> Self {
        Self {
            status: "OK".into(),
            reason: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microformat {
    pub player_microformat_renderer: Option<PlayerMicroformatRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMicroformatRenderer {
    pub publish_date: Option<String>,
    pub upload_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks, absent for uploaded ones.
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Timed-text response requested with `fmt=json3`.
#[derive(Debug, Default, Deserialize)]
pub struct TimedText {
    #[serde(default)]
    pub events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedTextEvent {
    #[serde(default)]
    pub t_start_ms: u64,
    pub segs: Option<Vec<TimedTextSegment>>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextSegment {
    #[serde(default)]
    pub utf8: String,
}
