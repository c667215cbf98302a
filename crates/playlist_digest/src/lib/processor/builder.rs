use crate::{
    prompt::SYSTEM_PROMPT,
    yt::{playlist::PlaylistLoader, PlaylistScraper, TranscriptFetcher},
    PlaylistSummarizer, Summarizer,
};

pub struct PlaylistSummarizerBuilder<P = (), T = (), S = ()> {
    playlist_scraper: P,
    transcript_fetcher: T,
    summarizer: S,
    system_prompt: String,
}

impl PlaylistSummarizerBuilder {
    pub fn new() -> Self {
        Self {
            playlist_scraper: (),
            transcript_fetcher: (),
            summarizer: (),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for PlaylistSummarizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T, S> PlaylistSummarizerBuilder<P, T, S> {
    pub fn playlist_scraper<P2: PlaylistScraper>(
        self,
        playlist_scraper: P2,
    ) -> PlaylistSummarizerBuilder<P2, T, S> {
        PlaylistSummarizerBuilder {
            playlist_scraper,
            transcript_fetcher: self.transcript_fetcher,
            summarizer: self.summarizer,
            system_prompt: self.system_prompt,
        }
    }

    pub fn transcript_fetcher<T2: TranscriptFetcher>(
        self,
        transcript_fetcher: T2,
    ) -> PlaylistSummarizerBuilder<P, T2, S> {
        PlaylistSummarizerBuilder {
            playlist_scraper: self.playlist_scraper,
            transcript_fetcher,
            summarizer: self.summarizer,
            system_prompt: self.system_prompt,
        }
    }

    pub fn summarizer<S2: Summarizer>(self, summarizer: S2) -> PlaylistSummarizerBuilder<P, T, S2> {
        PlaylistSummarizerBuilder {
            playlist_scraper: self.playlist_scraper,
            transcript_fetcher: self.transcript_fetcher,
            summarizer,
            system_prompt: self.system_prompt,
        }
    }

    /// Replaces the default summarization instruction sent as the system message.
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

impl<P, T, S> PlaylistSummarizerBuilder<P, T, S>
where
    P: PlaylistScraper,
    T: TranscriptFetcher,
    S: Summarizer,
{
    pub fn build(self) -> PlaylistSummarizer<P, T, S> {
        PlaylistSummarizer {
            loader: PlaylistLoader::new(self.playlist_scraper, self.transcript_fetcher),
            summarizer: self.summarizer,
            system_prompt: self.system_prompt,
        }
    }
}
