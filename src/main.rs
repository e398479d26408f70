//! Advisor Assistant command-line host.
//!
//! ```bash
//! # Load the dashboard (falls back to mock data when the CRM is unreachable)
//! advisor-assistant dashboard
//!
//! # Interpret a voice command and speak the reply
//! advisor-assistant command "show income projections"
//!
//! # Speak arbitrary text
//! advisor-assistant say "Good morning"
//! ```
//!
//! `RUST_LOG=debug` shows every backend call.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use advisor_lib::narration;
use advisor_lib::speech::{ConsoleDevice, SpeechDevice, SpeechOptions};
use advisor_lib::state::{config_path, load_config_from, AdvisorSession};
use advisor_lib::types::FallbackPolicy;

#[derive(Parser)]
#[command(
    name = "advisor-assistant",
    about = "Advisor dashboard and voice assistant",
    long_about = "Loads the advisor dashboard from the CRM backend and answers voice-style commands."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file (defaults to ~/.advisor-assistant/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mock only the collections that fail to load
    #[arg(long, global = true)]
    partial_fallback: bool,

    /// Disable spoken output
    #[arg(long, global = true)]
    mute: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load and print the dashboard
    Dashboard {
        /// Also speak the welcome, the daily summary and the top insight
        #[arg(long)]
        narrate: bool,
    },

    /// Interpret a command across every module
    Command {
        /// Command text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Speak text through the console device
    Say {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let path = match cli.config {
        Some(path) => path,
        None => config_path()?,
    };
    let mut config = load_config_from(&path)?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    if cli.partial_fallback {
        config.fallback_policy = FallbackPolicy::PartialFill;
    }
    if cli.mute {
        config.speech.enabled = false;
    }

    let device: Box<dyn SpeechDevice> = Box::new(ConsoleDevice::stdout());
    let session = AdvisorSession::from_config(config, Some(device))?;

    match cli.command {
        Command::Dashboard { narrate } => {
            let snapshot = session.mount().await;
            match &snapshot.source {
                Some(source) => println!("Source: {source:?}"),
                None => println!("Source: pending"),
            }
            for card in session.summary_cards() {
                println!("{:<14} {:>4}  [{}]", card.title, card.count, card.chip);
            }
            println!();
            for lead in &snapshot.data.leads {
                println!(
                    "{}  {:<20} {:<16} {}",
                    lead.number,
                    lead.display_name(),
                    lead.company.as_deref().unwrap_or("-"),
                    lead.rating.as_deref().unwrap_or("-"),
                );
            }
            for opp in &snapshot.data.opportunities {
                println!(
                    "{}  {:<20} {:<16} {}",
                    opp.number,
                    opp.consumer.as_deref().unwrap_or("-"),
                    opp.description.as_deref().unwrap_or("-"),
                    opp.amount.as_deref().unwrap_or("-"),
                );
            }
            for quote in &snapshot.data.quotes {
                println!(
                    "{}  {:<20} {:<16} {}",
                    quote.number,
                    quote.description.as_deref().unwrap_or("-"),
                    quote.status.as_deref().unwrap_or("-"),
                    quote
                        .valid_until_date()
                        .map(|d| d.format("%d %b %Y").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }

            if narrate {
                session.speak_welcome(narration::local_hour());
                session.speak_daily_summary();
                session.speak_top_insight();
            }
        }
        Command::Command { text } => {
            let text = text.join(" ");
            let reply = session.handle_command(&text);
            if !session.speech.is_enabled() {
                println!("{}", reply.spoken);
            }
            for m in &reply.matches {
                println!("{}", serde_json::to_string(m)?);
            }
        }
        Command::Say { text } => {
            let text = text.join(" ");
            session.speech.ensure_supported()?;
            if session.speech.speak(&text, SpeechOptions::default()).is_none() {
                println!("{text}");
            }
        }
    }

    Ok(())
}
