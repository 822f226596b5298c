mod describe;

use clap::{Parser, Subcommand};

use descry_types::MediaKind;

#[derive(Parser)]
#[command(name = "descry", about = "Media description gateway CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one upload+describe cycle and print the description
    Describe {
        /// Media kind: image, audio, text, or video
        kind: String,
    },
    /// Check configuration health
    Health,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let config = descry_config::load_config()?;
                let api_key = descry_config::api_key()?;
                descry_server::start_server(config, api_key, port)
                    .await
                    .map_err(|e| anyhow::anyhow!("{e}"))
            })?;
        }
        Commands::Describe { kind } => {
            let kind: MediaKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(describe::run_describe(kind))?;
        }
        Commands::Health => {
            let config = descry_config::load_config()?;
            println!("descry configuration");
            println!("  port: {}", config.server.port);
            println!("  model: {}", config.genai.model);
            println!("  media dir: {}", config.genai.media_dir.display());
            println!(
                "  credential: {}",
                if descry_config::api_key().is_ok() {
                    "set"
                } else {
                    "missing"
                }
            );
        }
    }

    Ok(())
}
