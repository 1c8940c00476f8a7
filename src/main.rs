use clap::Parser;
use poly_leadlag::cli::{Cli, Commands};
use poly_leadlag::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = poly_leadlag::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => {
            tracing::info!("Starting variable analysis");
            args.execute(&config).await?;
        }
        Commands::Tiers(args) => {
            tracing::info!("Starting tier analysis");
            args.execute(&config).await?;
        }
        Commands::Preprocess(args) => {
            tracing::info!("Starting preprocessing");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Platforms: A = {} ({}), B = {} ({})",
                config.platforms.a_label,
                config.platforms.a_prefix,
                config.platforms.b_label,
                config.platforms.b_prefix
            );
            println!(
                "  Analysis: alpha={}, {} tiers, {} variables",
                config.analysis.significance_level,
                config.analysis.tiers.len(),
                config.analysis.variables().len()
            );
            for tier in &config.analysis.tiers {
                println!("    {}: {}", tier.name, tier.variables.join(", "));
            }
            println!(
                "  Data: snapshots={}, input={}, interval={}m, output={}",
                config.data.snapshots.display(),
                config.data.input.display(),
                config.data.interval_minutes,
                config.data.output_dir.display()
            );
            println!(
                "  Telemetry: level={}, format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
