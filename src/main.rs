//! Flowsync CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowsync::cli::{handle_error, Cli, Commands};
use flowsync::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    init_tracing(&config.logging.level, &config.logging.format);

    let result = match cli.command {
        Commands::Sync(args) => flowsync::cli::commands::sync::execute(args, &config, cli.json).await,
        Commands::Bootstrap(args) => {
            flowsync::cli::commands::bootstrap::execute(args, &config, cli.json).await
        }
        Commands::Watch(args) => {
            flowsync::cli::commands::watch::execute(args, &config, cli.json).await
        }
        Commands::Status(args) => {
            flowsync::cli::commands::status::execute(args, &config, cli.json).await
        }
        Commands::Resolve(args) => {
            flowsync::cli::commands::resolve::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; the configured level is the fallback.
fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
