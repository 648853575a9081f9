use clap::Parser;
use openspending_query::core::ConfigProvider;
use openspending_query::utils::error::ErrorSeverity;
use openspending_query::utils::{logger, validation::Validate};
use openspending_query::{
    export_cells, CliConfig, LocalStorage, OpenSpendingClient, QueryError, SummaryPipeline,
    TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    let result = match args.config.clone() {
        Some(path) => {
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            init_logging(args.verbose || config.verbose(), args.json_logs || config.json_logs());
            tracing::info!("📁 Loaded configuration from: {}", path);
            run(config).await
        }
        None => {
            init_logging(args.verbose, args.json_logs);
            tracing::debug!("CLI config: {:?}", args);
            run(args).await
        }
    };

    if let Err(e) = result {
        tracing::error!("❌ Summary failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), QueryError> {
    config.validate()?;

    tracing::info!("Starting openspending-query");
    let client = OpenSpendingClient::new(config.timeout_seconds())?;
    let pipeline = SummaryPipeline::new(client, config);
    let result = pipeline.run().await?;

    if let Some(output) = pipeline.config().output_path() {
        let (storage, filename) = LocalStorage::for_file(output);
        export_cells(&storage, &filename, &result).await?;
        tracing::info!("📁 Output saved to: {}", output);
        println!("📁 Output saved to: {}", output);
    }

    println!("✅ Summary complete: {} cells", result.cells().len());
    Ok(())
}
