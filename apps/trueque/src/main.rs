use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use marketplace::client::MarketplaceApi;
use marketplace::config::{BackendMode, MarketplaceConfig};
use marketplace::session::AppContext;
use marketplace::Marketplace;
use modkit::{ClientHub, Module, ModuleCtxBuilder};

mod terminal;
mod views;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// TruequeAndo - community barter marketplace in the terminal
#[derive(Parser)]
#[command(name = "trueque")]
#[command(about = "TruequeAndo - community barter marketplace in the terminal")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the in-memory demo backend regardless of configuration
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive marketplace
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if args.mock {
        force_memory_backend(&mut config)?;
    }

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!("TruequeAndo starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_app(config).await,
        Commands::Check => check_config(config),
    }
}

/// Point the marketplace section at the in-memory backend, keeping the rest
/// of the section as configured.
fn force_memory_backend(config: &mut AppConfig) -> Result<()> {
    let section = config
        .modules
        .entry(Marketplace::NAME.to_string())
        .or_insert_with(|| serde_json::json!({}));
    let Some(section) = section.as_object_mut() else {
        anyhow::bail!("modules.{} must be a mapping", Marketplace::NAME);
    };
    let backend = section
        .entry("backend")
        .or_insert_with(|| serde_json::json!({}));
    let Some(backend) = backend.as_object_mut() else {
        anyhow::bail!("modules.{}.backend must be a mapping", Marketplace::NAME);
    };
    backend.insert("mode".to_string(), serde_json::json!("memory"));
    Ok(())
}

async fn run_app(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");
    let title = config.app.title.clone();

    let config_provider = Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config,
    ))));
    let hub = Arc::new(ClientHub::new());
    let module_ctx = ModuleCtxBuilder::new()
        .with_config_provider(config_provider)
        .with_client_hub(hub.clone())
        .build()
        .for_module(Marketplace::NAME);
    Marketplace
        .init(&module_ctx)
        .await
        .context("Failed to initialize the marketplace module")?;

    let api = hub.get::<dyn MarketplaceApi>()?;
    let ctx = AppContext::new(api);
    // A failed restore is reported as a notice on the first screen.
    let _ = ctx.restore_session().await;

    let mut console: views::Console = terminal::Terminal::new(
        Box::new(tokio::io::BufReader::new(tokio::io::stdin())),
        Box::new(tokio::io::stdout()),
    );
    views::run(&ctx, &mut console, &title).await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let provider = AppConfigProvider::new(config.clone());
    let marketplace: MarketplaceConfig = match provider.get_module_config(Marketplace::NAME) {
        Some(raw) => serde_json::from_value(raw.clone())
            .with_context(|| format!("Invalid modules.{} section", Marketplace::NAME))?,
        None => MarketplaceConfig::default(),
    };
    if marketplace.backend.mode == BackendMode::Remote {
        marketplace::module::build_client(&marketplace)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Backend: {:?}", marketplace.backend.mode);
    println!("{}", config.to_yaml()?);
    Ok(())
}
