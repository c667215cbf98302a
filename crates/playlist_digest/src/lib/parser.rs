//! # Yt Parser
//!
//! Extracts and interprets the JSON blobs YouTube embeds in its playlist and watch pages:
//! `ytInitialData` for playlist membership, `ytInitialPlayerResponse` for per-video details
//! and caption tracks, and the `json3` timed-text format for the captions themselves.

use std::{ops::Deref, sync::LazyLock};

use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::Error,
    record::PlaylistEntry,
    types::{CaptionTrack, PlayerResponse, PlaylistVideoRenderer, TimedText},
    yt::TranscriptError,
};

static YT_INTIALDATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)<script[^>]*>\s*var\s+ytInitialData\s*=\s*(\{.*?\});\s*</script>")
        .unwrap()
});

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

static INNERTUBE_API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| regex::Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).unwrap());

static INNERTUBE_CLIENT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r#""INNERTUBE_CONTEXT_CLIENT_VERSION"\s*:\s*"([^"]+)""#).unwrap()
});

/// One page of playlist members, plus the token for the next page if there is one.
#[derive(Debug, Default)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub continuation: Option<String>,
}

/// Parses the first page of a playlist from its `ytInitialData`.
///
/// A page whose browse results carry no video list is an empty playlist.
///
/// # Returns
/// * `Ok(PlaylistPage)` with entries in display order.
/// * `Err(Error::ParseError)` if the page has no browse results at all, which is what
///   YouTube serves for missing or private playlists.
#[tracing::instrument(skip(json))]
pub fn parse_playlist_page(json: &Value) -> Result<PlaylistPage, Error> {
    let tabs = json["contents"]["twoColumnBrowseResultsRenderer"]["tabs"]
        .as_array()
        .ok_or(Error::ParseError(
            "Failed to get ytInitialData['contents']['twoColumnBrowseResultsRenderer']['tabs']",
        ))?;

    let items = tabs
        .iter()
        .filter_map(|tab| tab["tabRenderer"]["content"]["sectionListRenderer"]["contents"].as_array())
        .flatten()
        .filter_map(|section| section["itemSectionRenderer"]["contents"].as_array())
        .flatten()
        .find_map(|content| content["playlistVideoListRenderer"]["contents"].as_array());

    match items {
        Some(items) => Ok(parse_playlist_items(items)),
        None => Ok(PlaylistPage::default()),
    }
}

/// Parses a `browse` continuation response.
#[tracing::instrument(skip(json))]
pub fn parse_playlist_continuation(json: &Value) -> Result<PlaylistPage, Error> {
    let actions = json["onResponseReceivedActions"]
        .as_array()
        .ok_or(Error::ParseError(
            "Failed to get ['onResponseReceivedActions'] from continuation response",
        ))?;

    let mut page = PlaylistPage::default();
    for items in actions
        .iter()
        .filter_map(|action| action["appendContinuationItemsAction"]["continuationItems"].as_array())
    {
        let PlaylistPage {
            entries,
            continuation,
        } = parse_playlist_items(items);
        page.entries.extend(entries);
        page.continuation = continuation.or(page.continuation);
    }

    Ok(page)
}

/// Items that don't describe a playable video are logged and left out.
fn parse_playlist_items(items: &[Value]) -> PlaylistPage {
    let mut page = PlaylistPage::default();

    for item in items {
        if let Some(renderer) = item.get("playlistVideoRenderer") {
            // Deleted and private videos stay listed but carry no length and can't be played
            match serde_json::from_value::<PlaylistVideoRenderer>(renderer.clone())
                .map_err(Error::from)
                .and_then(PlaylistEntry::try_from)
            {
                Ok(entry) => page.entries.push(entry),
                Err(e) => tracing::debug!(error = %e, "Skipping unplayable playlist item"),
            }
        } else if let Some(token) = item["continuationItemRenderer"]["continuationEndpoint"]
            ["continuationCommand"]["token"]
            .as_str()
        {
            page.continuation = Some(token.to_string());
        }
    }

    page
}

/// The human-readable alert YouTube shows instead of a playlist, if any.
pub fn playlist_alert(json: &Value) -> Option<String> {
    json["alerts"].as_array()?.iter().find_map(|alert| {
        let text = &alert["alertRenderer"]["text"];
        text["simpleText"].as_str().map(str::to_string).or_else(|| {
            text["runs"]
                .as_array()
                .map(|runs| runs.iter().filter_map(|r| r["text"].as_str()).join(""))
        })
    })
}

impl TryFrom<PlaylistVideoRenderer> for PlaylistEntry {
    type Error = Error;

    fn try_from(
        PlaylistVideoRenderer {
            video_id,
            title,
            short_byline_text,
            length_seconds,
            is_playable,
        }: PlaylistVideoRenderer,
    ) -> Result<Self, Self::Error> {
        if !is_playable {
            return Err(Error::ParseError("Playlist item is not playable"));
        }
        let duration_secs = length_seconds
            .as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or(Error::ParseError("No value found for 'lengthSeconds'"))?;
        let title = title
            .text()
            .ok_or(Error::ParseError(
                "Failed to get video title via ['title']['runs'][0]['text']",
            ))?
            .to_string();
        let author = short_byline_text
            .as_ref()
            .and_then(|byline| byline.text())
            .unwrap_or_default()
            .to_string();

        Ok(PlaylistEntry {
            video_id,
            title,
            author,
            publish_date: None,
            duration_secs,
        })
    }
}

/// Reads the publish date from a player response's microformat.
///
/// YouTube has served both `2024-05-13` and `2024-05-13T07:00:00-07:00`; only the date
/// part is kept.
pub fn parse_publish_date(player: &PlayerResponse) -> Option<NaiveDate> {
    let renderer = player
        .microformat
        .as_ref()?
        .player_microformat_renderer
        .as_ref()?;
    let raw = renderer
        .publish_date
        .as_deref()
        .or(renderer.upload_date.as_deref())?;

    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// Picks the caption track to fetch for a video.
///
/// Languages are tried in preference order; within a language an uploaded track wins over
/// an auto-generated one.
pub fn select_caption_track(
    player: &PlayerResponse,
    languages: &[String],
) -> Result<CaptionTrack, TranscriptError> {
    if player.playability_status.status != "OK" {
        return Err(TranscriptError::Other(
            player
                .playability_status
                .reason
                .clone()
                .unwrap_or_else(|| format!("video is {}", player.playability_status.status)),
        ));
    }

    let tracks = player
        .captions
        .as_ref()
        .and_then(|captions| captions.player_captions_tracklist_renderer.as_ref())
        .map(|tracklist| tracklist.caption_tracks.as_slice())
        .ok_or(TranscriptError::TranscriptsDisabled)?;

    languages
        .iter()
        .find_map(|lang| {
            let mut matching = tracks
                .iter()
                .filter(|track| track.language_code.eq_ignore_ascii_case(lang));
            matching
                .clone()
                .find(|track| !track.is_generated())
                .or_else(|| matching.find(|track| track.is_generated()))
        })
        .cloned()
        .ok_or(TranscriptError::NoTranscriptFound)
}

/// Flattens timed text into a single line: segments in chronological order, each trimmed,
/// joined by one space, with no timing information kept.
pub fn timed_text_to_transcript(timed_text: &TimedText) -> String {
    timed_text
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref().map(|segs| (event.t_start_ms, segs)))
        .sorted_by_key(|(start, _)| *start)
        .map(|(_, segs)| {
            segs.iter()
                .map(|seg| seg.utf8.as_str())
                .join("")
                .split_whitespace()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .join(" ")
}

/// Innertube credentials scraped from a page, needed for `browse` continuations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InnertubeConfig {
    pub api_key: Option<String>,
    pub client_version: Option<String>,
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    /// Deserializes the page's `ytInitialData`.
    pub fn to_json<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        Self::extract(&YT_INTIALDATA_RE, self).ok_or(Error::ParseError(
            "Failed to extract ytInitialData from the page's script tag",
        ))
    }

    /// Deserializes the page's `ytInitialPlayerResponse`.
    pub fn player_response<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        Self::extract(&YT_PLAYER_RESPONSE_RE, self).ok_or(Error::ParseError(
            "Failed to extract ytInitialPlayerResponse from the page's script tag",
        ))
    }

    pub fn innertube_config(&self) -> InnertubeConfig {
        let capture = |re: &Regex| {
            re.captures(self)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().to_string())
        };

        InnertubeConfig {
            api_key: capture(&INNERTUBE_API_KEY_RE),
            client_version: capture(&INNERTUBE_CLIENT_VERSION_RE),
        }
    }

    fn extract<T: DeserializeOwned>(re: &Regex, doc: &str) -> Option<T> {
        re.captures(doc)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
