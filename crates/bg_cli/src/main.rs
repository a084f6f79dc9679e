use std::path::PathBuf;

use bg_core::Result;
use bg_inference::{create_providers, ProviderConfig};
use bg_publish::TopicQueue;
use chrono::Local;
use clap::Parser;
use tracing::info;

mod pipeline;
use pipeline::{Config, RunOutcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory generated pages are written to
    #[arg(long, default_value = "blog")]
    blog_dir: PathBuf,
    /// Topic queue file, one topic per line, head of file first
    #[arg(long, default_value = "blog/topics.md")]
    topics_file: PathBuf,
    /// Page template with the {{...}} placeholder tokens
    #[arg(long, default_value = "blog/TEMPLATE.html")]
    template_file: PathBuf,
    /// Index page carrying the blog entry marker comment
    #[arg(long, default_value = "blog/index.html")]
    index_file: PathBuf,
    #[arg(
        long,
        default_value = "auto",
        help = "Content backend to use. Available: auto (all configured, primary first), gemini, openai, dummy"
    )]
    provider: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate and publish the next queued article (default)
    Run,
    /// Show the queued topics in order
    Topics,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = Config {
        blog_dir: cli.blog_dir,
        topics_file: cli.topics_file,
        template_file: cli.template_file,
        index_file: cli.index_file,
        slack_webhook_url: std::env::var("SLACK_WEBHOOK_URL").ok(),
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let provider_config = ProviderConfig {
                gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
                openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            };
            let providers = create_providers(&cli.provider, &provider_config)?;
            info!(
                "🧠 Content backends ready: {}",
                providers
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let today = Local::now().date_naive();
            match pipeline::run_once(&config, &providers, today).await? {
                RunOutcome::Published { file, title } => {
                    println!("Draft \"{}\" saved to {}", title, file.display());
                }
                RunOutcome::QueueEmpty => {
                    println!("No topics queued in {}", config.topics_file.display());
                }
            }
        }
        Commands::Topics => {
            let queue = TopicQueue::new(&config.topics_file);
            match queue.next_topic()? {
                Some((first, remaining)) => {
                    println!("1. {}", first);
                    for (i, topic) in remaining.iter().enumerate() {
                        println!("{}. {}", i + 2, topic);
                    }
                }
                None => println!("No topics queued in {}", config.topics_file.display()),
            }
        }
    }

    Ok(())
}
