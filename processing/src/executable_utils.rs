use common::config::{Config, ConfigError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_PATH: &str = "target/debug/config/total_config.yaml";

/// Loads `.env`, the YAML config and sets up tracing.
///
/// `RUST_LOG` wins over `sync.log_level` when both are present.
pub fn initialize_executable(config_path: &str) -> Result<Config, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => println!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Ignoring unreadable .env file: {}", e),
    }

    println!("Loading config from: {}", config_path);
    let config = Config::load(config_path)?;

    init_tracing(&config.sync.log_level);
    tracing::info!(
        project = %config.common.project_name,
        merchant_id = config.sync.merchant_id,
        api = %config.content_api.base_url,
        "Configuration loaded"
    );

    Ok(config)
}

pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second initialisation (tests, repeated calls) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn wait_for_keypress() -> std::io::Result<()> {
    println!("Press Enter to exit...");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(())
}
