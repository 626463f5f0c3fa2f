use clap::Parser;
use color_eyre::Result;
use marknote::cli::{self, Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.load_config()?;

    // RUST_LOG wins over the config file; logs go to stderr so stdout stays clean
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command() {
        Commands::Serve {
            host,
            port,
            no_seed,
        } => {
            cli::handle_serve(config, host, port, no_seed).await?;
        }
        Commands::Render { file, html } => {
            cli::handle_render(file, html)?;
        }
        Commands::Fixtures => {
            cli::handle_fixtures()?;
        }
    }

    Ok(())
}
