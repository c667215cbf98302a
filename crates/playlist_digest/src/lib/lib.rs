pub mod config;
mod error;
mod llm;
pub mod parser;
mod processor;
pub mod record;
pub mod render;
pub mod session;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::openai;
pub use llm::{
    prompt,
    summarizer::{Summarizer, SummaryResponse},
};
pub use processor::{builder::PlaylistSummarizerBuilder, PlaylistSummarizer};
