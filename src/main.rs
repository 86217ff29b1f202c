use clap::Parser;
use clap::Subcommand;
use courtiq::config::AppConfig;
use courtiq::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "courtiq")]
#[command(about = "CourtIQ legal assistant: case retrieval with LLM summarization")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server with the query form and API
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Enable permissive CORS headers
        #[arg(long)]
        cors: bool,
    },
    /// Answer a single query from the command line
    Ask {
        /// The legal query to answer
        query: String,
    },
    /// Validate the configuration file and print the resolved settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Serve { host, port, cors } => {
            courtiq::logging::init_logging(Some(&config))?;
            courtiq::api::serve(&config, host, port, cors).await
        }
        Commands::Ask { query } => {
            if cli.verbose {
                courtiq::logging::init_simple_logging()?;
            }
            let assistant = courtiq::bootstrap(&config).await?;
            let answer = assistant.answer(&query).await;
            println!("{answer}");
            Ok(())
        }
        Commands::CheckConfig => {
            courtiq::logging::init_simple_logging()?;
            info!("Configuration loaded successfully");
            println!("store url:        {}", config.store_url());
            println!("collection:       {}", config.collection());
            println!("dimension:        {}", config.dimension());
            println!("retrieval limit:  {}", config.retrieval_limit());
            println!("llm endpoint:     {}", config.llm_endpoint());
            println!("llm model:        {}", config.llm_model());
            println!("max tokens:       {}", config.max_tokens());
            println!(
                "api key:          {}",
                if config.llm_key().is_empty() {
                    "(not set)"
                } else {
                    "(set)"
                }
            );
            Ok(())
        }
    }
}
