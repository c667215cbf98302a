use std::{ops::Deref, time::Duration};

use serde_json::Value;

use crate::{
    error::Error,
    parser::{
        parse_playlist_continuation, parse_playlist_page, playlist_alert, InnertubeConfig,
        YtHtmlDocument,
    },
    record::PlaylistEntry,
    yt::{http_client, PlaylistRef, PlaylistScraper, YOUTUBE_BASE_URL},
};

/// Upper bound on continuation pages; YouTube caps playlists at 5000 videos, 100 per page.
const MAX_CONTINUATION_PAGES: usize = 60;
const DEFAULT_CLIENT_VERSION: &str = "2.20240513.00.00";

pub struct Scraper(pub reqwest::Client);

impl Deref for Scraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Scraper {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        http_client(timeout).map(Scraper)
    }

    /// Loads a YouTube html page
    pub(crate) async fn fetch_page(&self, url: &str) -> Result<YtHtmlDocument, reqwest::Error> {
        let yt_html_document = self
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cookie", "CONSENT=YES+1")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(yt_html_document.into())
    }

    /// Requests the next page of playlist items from the innertube `browse` endpoint
    #[tracing::instrument(skip(self, innertube))]
    async fn fetch_continuation(
        &self,
        token: &str,
        innertube: &InnertubeConfig,
    ) -> Result<Value, reqwest::Error> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "WEB",
                    "clientVersion": innertube
                        .client_version
                        .as_deref()
                        .unwrap_or(DEFAULT_CLIENT_VERSION),
                    "hl": "en"
                }
            },
            "continuation": token
        });

        let mut request = self.post(format!("{}/youtubei/v1/browse", Self::BASE_URL));
        if let Some(key) = &innertube.api_key {
            request = request.query(&[("key", key)]);
        }

        request
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

impl PlaylistScraper for Scraper {
    const BASE_URL: &'static str = YOUTUBE_BASE_URL;

    #[tracing::instrument(skip(self), fields(playlist = %playlist))]
    async fn scrape_playlist(&self, playlist: &PlaylistRef) -> Result<Vec<PlaylistEntry>, Error> {
        let unavailable = |reason: String| Error::playlist_unavailable(playlist.id(), reason);

        let url = format!("{}/playlist?list={}", Self::BASE_URL, playlist.id());
        let doc = self
            .fetch_page(&url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load playlist page"))
            .map_err(|e| unavailable(e.to_string()))?;

        let json = doc
            .to_json::<Value>()
            .map_err(|e| unavailable(e.to_string()))?;
        let first_page = parse_playlist_page(&json)
            .map_err(|e| unavailable(playlist_alert(&json).unwrap_or_else(|| e.to_string())))?;

        let innertube = doc.innertube_config();
        let mut entries = first_page.entries;
        let mut continuation = first_page.continuation;

        for _ in 0..MAX_CONTINUATION_PAGES {
            let Some(token) = continuation.take() else {
                break;
            };
            let json = self
                .fetch_continuation(&token, &innertube)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to load continuation"))
                .map_err(|e| unavailable(e.to_string()))?;
            let page =
                parse_playlist_continuation(&json).map_err(|e| unavailable(e.to_string()))?;

            entries.extend(page.entries);
            continuation = page.continuation;
        }

        if continuation.is_some() {
            tracing::warn!(
                count = entries.len(),
                "Stopped following playlist continuations"
            );
        }
        tracing::info!(count = entries.len(), "Scraped playlist");

        Ok(entries)
    }
}
