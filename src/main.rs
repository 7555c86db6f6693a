use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use linktally::cli::{Cli, Commands};
use linktally::config::{StaticConfig, get_config, init_config_from};
use linktally::errors::LinktallyError;
use linktally::system::logging::init_logging;
use linktally::system::startup::{prepare_server_startup, run_server};

const SAMPLE_CONFIG_PATH: &str = "config.example.toml";

fn generate_config(path: Option<String>) -> Result<()> {
    let path = path.unwrap_or_else(|| SAMPLE_CONFIG_PATH.to_string());
    StaticConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path))?;
    println!("{} {}", "Sample configuration written to".green(), path);
    Ok(())
}

async fn serve(config_path: Option<&str>) -> Result<()> {
    init_config_from(config_path);
    let config = get_config();

    // guard 需存活到进程退出，保证日志刷盘
    let _log_guard = init_logging(&config.logging)?;

    let ctx = prepare_server_startup(&config).await?;
    run_server(&config, ctx).await
}

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::ConfigGen { path }) => generate_config(path),
        Some(Commands::Serve) | None => serve(cli.config.as_deref()).await,
    };

    if let Err(err) = result {
        match err.downcast_ref::<LinktallyError>() {
            Some(e) => eprintln!("{}", e.format_colored()),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), err),
        }
        std::process::exit(1);
    }
}
