use std::path::PathBuf;

use anyhow::Result;
use calendar_client::GoogleCalendar;
use calendar_mcp::config::Config;
use clap::Parser;

#[derive(Parser)]
#[command(name = "auth-setup")]
#[command(about = "Run the Google OAuth flow and cache a calendar token")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "calendar-agent.toml")]
    config: PathBuf,

    /// Write an example configuration file to the config path and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.write_config {
        let rendered = toml::to_string_pretty(&Config::example())?;
        std::fs::write(&cli.config, rendered)?;
        println!("Wrote example configuration to {}", cli.config.display());
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config)?;

    if !PathBuf::from(&config.calendar.credentials_path).exists() {
        eprintln!("ERROR: credentials file not found!");
        eprintln!(
            "Place your OAuth client credentials at: {}",
            config.calendar.credentials_path
        );
        std::process::exit(1);
    }

    println!("Starting OAuth flow...");
    println!("A browser window will open. Please authorize the application.");

    GoogleCalendar::authorize(&config.calendar).await?;

    println!("Authentication successful!");
    println!("Token cached at {}", config.calendar.token_cache_path);
    Ok(())
}
