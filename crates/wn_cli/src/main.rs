use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wn_core::config::{ProjectConfig, Settings, DEFAULT_GDELT_ENDPOINT};
use wn_core::{Error, Result};
use wn_gdelt::GdeltClient;
use wn_inference::{create_model, models::ModelConfig, NewsService};
use wn_web::{AppState, ChatResponse};

#[derive(Parser, Debug)]
#[command(author, version, about = "Answer news questions from GDELT with Gemini", long_about = None)]
pub struct Cli {
    /// YAML config file; by default world_news.yaml, world-news.yaml or config.yaml is looked up in . and ./configs
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, default_value = "gemini", help = "Model to use for inference. Available models: gemini (default), dummy (offline, needs no GEMINI_API_KEY)")]
    model: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP chat API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Run the tool server over stdio
    Mcp,
    /// Run the pipeline once and print the answer
    Ask {
        question: String,
    },
    /// Send queries to a running chat API; interactive when no query is given
    Chat {
        query: Option<String>,
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        api_base: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ProjectConfig> {
    match path {
        Some(path) => ProjectConfig::from_path(path),
        None => ProjectConfig::discover(),
    }
}

fn non_blank(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("question must not be empty".to_string()));
    }
    Ok(question)
}

/// The only model that runs without `GEMINI_API_KEY`.
const OFFLINE_MODEL: &str = "dummy";

/// Builds the one service instance shared by every request.
fn build_service(cli: &Cli) -> Result<NewsService> {
    let config = load_config(cli.config.as_ref())?;

    let (endpoint, model_config) = if cli.model.eq_ignore_ascii_case(OFFLINE_MODEL) {
        warn!("Offline dummy model selected: answers echo prompts instead of calling Gemini");
        let endpoint = config
            .gdelt
            .endpoint
            .unwrap_or_else(|| DEFAULT_GDELT_ENDPOINT.to_string());
        (endpoint, ModelConfig::default())
    } else {
        let settings = Settings::from_env(config)?;
        (settings.gdelt_endpoint.clone(), ModelConfig::from(&settings))
    };

    let model = create_model(&cli.model, model_config)?;
    info!("🧠 Using {} model", model.name());
    Ok(NewsService::new(Arc::new(GdeltClient::new(endpoint)?), model))
}

async fn call_chat(client: &reqwest::Client, api_base: &str, query: &str) -> Result<ChatResponse> {
    let url = format!("{}/chat", api_base.trim_end_matches('/'));
    let response = client
        .post(url)
        .json(&serde_json::json!({ "query": query }))
        .send()
        .await?
        .error_for_status()?
        .json::<ChatResponse>()
        .await?;
    Ok(response)
}

fn print_chat(response: &ChatResponse) {
    println!("Answer:\n{}", response.answer);
    println!("num_articles: {}", response.num_articles);
}

async fn chat(query: Option<String>, api_base: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    if let Some(query) = query {
        print_chat(&call_chat(&client, api_base, &query).await?);
        return Ok(());
    }

    println!("Enter queries (Ctrl+D to exit):");
    let mut stdout = tokio::io::stdout();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        println!();
        print_chat(&call_chat(&client, api_base, query).await?);
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { host, port } => {
            let service = build_service(&cli)?;
            let listener = wn_web::bind(host, *port).await?;
            wn_web::serve(listener, AppState::new(service)).await?;
        }
        Commands::Mcp => {
            let service = build_service(&cli)?;
            wn_mcp::ToolServer::new(service).run_stdio().await?;
        }
        Commands::Ask { question } => {
            let question = non_blank(question)?;
            let service = build_service(&cli)?;
            let outcome = service.run(question).await?;
            info!(
                "📰 Answer grounded in {} articles for GDELT query {:?}",
                outcome.num_articles, outcome.plan.query
            );
            println!("{}", outcome.answer);
        }
        Commands::Chat { query, api_base } => {
            chat(query.clone(), api_base).await?;
        }
    }

    Ok(())
}
