pub mod playlist_scraper;
pub mod summarizer;
pub mod transcript_fetcher;
