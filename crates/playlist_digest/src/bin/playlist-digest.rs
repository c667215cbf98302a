use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use playlist_digest::{
    config::{CredentialPolicy, PromptMode, RunConfiguration},
    openai::{OpenAIClient, DEFAULT_BASE_URL},
    render::{render_table, render_text, render_warnings, write_csv},
    session::Session,
    tracing::init_tracing_subscriber,
    yt::{scraper::Scraper, transcript::TranscriptClient},
    PlaylistSummarizerBuilder,
};

#[derive(Parser)]
#[command(
    name = "playlist-digest",
    about = "Summarize every video of a YouTube playlist from its transcript"
)]
struct Cli {
    /// OpenAI API key, or the special password when one is configured
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// YouTube playlist URL or list id; the playlist must be public
    #[arg(long)]
    playlist: String,

    /// Topic(s) covered by the playlist, comma separated
    #[arg(long)]
    topic: String,

    /// Replace the default summary instruction with your own prompt
    #[arg(long)]
    custom_prompt: Option<String>,

    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// Also write the summaries table as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Caption languages to try, most preferred first
    #[arg(long, value_delimiter = ',', default_value = "en")]
    languages: Vec<String>,

    /// Timeout in seconds for each HTTP request
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Password that unlocks the privileged API key
    #[arg(long, env = "PLAYLIST_DIGEST_SPECIAL_PASSWORD", hide_env_values = true)]
    special_password: Option<String>,

    /// API key used when the special password is supplied
    #[arg(long, env = "PLAYLIST_DIGEST_PRIVILEGED_API_KEY", hide_env_values = true)]
    privileged_api_key: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Table,
    Both,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let credentials = CredentialPolicy::new(cli.special_password, cli.privileged_api_key);
    let config = RunConfiguration {
        api_key: credentials.resolve(&cli.api_key)?,
        playlist: cli.playlist,
        topic: cli.topic,
        prompt_mode: if cli.custom_prompt.is_some() {
            PromptMode::Custom
        } else {
            PromptMode::Default
        },
        custom_prompt: cli.custom_prompt.unwrap_or_default(),
    };

    let timeout = Duration::from_secs(cli.timeout_secs);
    let openai = OpenAIClient::new(&config.api_key)
        .with_base_url(cli.openai_base_url)
        .with_http_client(
            reqwest::Client::builder()
                .timeout(timeout.max(Duration::from_secs(120)))
                .build()?,
        );

    let summarizer = PlaylistSummarizerBuilder::new()
        .playlist_scraper(Scraper::new(timeout)?)
        .transcript_fetcher(TranscriptClient::new(Scraper::new(timeout)?).with_languages(cli.languages))
        .summarizer(openai)
        .build();

    let mut session = Session::new();
    session.submit(config)?;

    tracing::info!("Loading summaries, this takes a while for long playlists...");
    session.summarize(&summarizer).await?;

    let report = session
        .take_outcome()
        .context("Summarization did not finish")??;

    match cli.format {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Table => println!("{}", render_table(&report)),
        OutputFormat::Both => {
            println!("{}", render_text(&report));
            println!("{}", render_table(&report));
        }
    }

    let warnings = render_warnings(&report);
    if !warnings.is_empty() {
        eprintln!("Some videos were not summarized:\n{warnings}");
    }

    if let Some(path) = cli.csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&report, file)?;
        tracing::info!(path = %path.display(), "Wrote CSV export");
    }

    Ok(())
}
