use std::sync::{Arc, Mutex};

use playlist_digest::{
    record::PlaylistEntry,
    yt::{PlaylistRef, PlaylistScraper},
    Error,
};

#[derive(Clone)]
pub struct MockPlaylistScraper {
    pub entries: Vec<PlaylistEntry>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockPlaylistScraper {
    pub fn new(entries: Vec<PlaylistEntry>) -> Self {
        Self {
            entries,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn with_ids(ids: &[&str]) -> Self {
        Self::new(ids.iter().map(|id| entry(id)).collect())
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(Vec::new())
        }
    }
}

pub fn entry(id: &str) -> PlaylistEntry {
    PlaylistEntry {
        video_id: id.to_string(),
        title: format!("Title of {id}"),
        author: "Chef Ada".to_string(),
        publish_date: None,
        duration_secs: 600,
    }
}

impl PlaylistScraper for MockPlaylistScraper {
    const BASE_URL: &'static str = "https://youtube.com/mock";

    async fn scrape_playlist(&self, playlist: &PlaylistRef) -> Result<Vec<PlaylistEntry>, Error> {
        self.calls.lock().unwrap().push(playlist.id().to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::PlaylistUnavailable {
                playlist: playlist.id().to_string(),
                reason: msg.clone(),
            });
        }
        Ok(self.entries.clone())
    }
}
