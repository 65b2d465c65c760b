use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use trigger_bot::application::errors::{BotError, ConfigError};
use trigger_bot::application::services::ConfigStore;
use trigger_bot::domain::entities::CommandTable;
use trigger_bot::domain::traits::ChatTransport;
use trigger_bot::infrastructure::adapters::ConsoleAdapter;
use trigger_bot::infrastructure::config::Config;
use trigger_bot::infrastructure::storage::JsonCommandFile;
use trigger_bot::Engine;

/// Cooldown for commands added without one
const DEFAULT_COOLDOWN_SECS: u64 = 10;

#[derive(Parser)]
#[command(name = "trigger-bot")]
#[command(about = "Chat bot answering trigger phrases from a hot-reloaded command file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,

    /// Command file path (overrides config)
    #[arg(long, global = true)]
    commands: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// Show version
    Version,
    /// Write default config and an empty command file
    InitConfig,
    /// Validate the command file and list its commands
    Check,
    /// Add or replace a command
    Add {
        /// Trigger variations, comma separated
        key: String,
        response: String,
        /// Cooldown in seconds
        #[arg(long, default_value_t = DEFAULT_COOLDOWN_SECS)]
        cooldown: u64,
    },
    /// Remove a command
    Remove {
        key: String,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let Cli {
        command,
        config: config_path,
        commands,
    } = Cli::parse();

    if let Commands::Version = command {
        println!("trigger-bot v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let config = load_config(&config_path, commands);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async move {
        match command {
            Commands::Run => run_bot(config).await,
            Commands::InitConfig => init_config(&config_path, &config).await,
            Commands::Check => check_commands(&config).await,
            Commands::Add { key, response, cooldown } => {
                add_command(&config, key, response, cooldown).await
            }
            Commands::Remove { key } => remove_command(&config, &key).await,
            Commands::Version => Ok(()),
        }
    });

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, commands_override: Option<PathBuf>) -> Config {
    let mut config = if Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.apply_env();

    if let Some(commands) = commands_override {
        config.commands.path = commands;
    }
    config
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {} on #{}", config.bot.name, config.bot.channel);

    let console = Arc::new(ConsoleAdapter::new(&config.bot.channel));
    let inbound = console.spawn_reader();
    let transport: Arc<dyn ChatTransport> = console;

    let mut engine = Engine::start(config.engine_settings(), transport, inbound).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
        _ = engine.wait() => tracing::info!("Input closed, shutting down"),
    }

    engine.stop().await;
    Ok(())
}

async fn init_config(path: &str, config: &Config) -> Result<(), BotError> {
    if Path::new(path).exists() {
        println!("{} already exists, leaving it alone", path);
    } else {
        let yaml = config.to_yaml()?;
        tokio::fs::write(path, yaml)
            .await
            .map_err(|e| BotError::Internal(format!("Failed to write {}: {}", path, e)))?;
        println!("Wrote {}", path);
    }

    let file = JsonCommandFile::new(&config.commands.path);
    if file.init().await? {
        println!("Wrote {}", file.path().display());
    }
    Ok(())
}

async fn check_commands(config: &Config) -> Result<(), BotError> {
    let file = JsonCommandFile::new(&config.commands.path);
    let table = ConfigStore::load(&file).await?;

    println!("{} command(s) in {}", table.len(), file.path().display());
    for (key, entry) in table.iter() {
        println!(
            "  {:?} [{}s] -> {} (variations: {})",
            key,
            entry.cooldown_secs,
            entry.response,
            entry.triggers().join(" | ")
        );
    }
    Ok(())
}

async fn add_command(config: &Config, key: String, response: String, cooldown: u64) -> Result<(), BotError> {
    let file = JsonCommandFile::new(&config.commands.path);
    let mut table = match ConfigStore::load(&file).await {
        Err(ConfigError::NotFound(_)) => CommandTable::new(),
        other => other?,
    };

    let replaced = table.insert(key.clone(), response, cooldown)?.is_some();
    file.write(&table).await?;

    println!("{} {:?}", if replaced { "Updated" } else { "Added" }, key);
    Ok(())
}

async fn remove_command(config: &Config, key: &str) -> Result<(), BotError> {
    let file = JsonCommandFile::new(&config.commands.path);
    let mut table = ConfigStore::load(&file).await?;

    if table.remove(key).is_none() {
        println!("No command {:?}", key);
        return Ok(());
    }
    file.write(&table).await?;

    println!("Removed {:?}", key);
    Ok(())
}
