use anylist_import::{import_pending, BatchSummary, ImportError, ImporterConfig};
use clap::Parser;
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "anylist-import")]
#[command(about = "Import queued recipes from recipes.json into AnyList", long_about = None)]
#[command(after_help = "The importer talks to a gateway serving the JSON recipe API. \
Set its URL with `[service] base_url` in config.toml or ANYLIST__SERVICE__BASE_URL \
(default: http://localhost:8080).")]
struct Cli {
    /// Validate recipes without contacting AnyList or touching data files
    #[arg(long)]
    dry_run: bool,

    /// List collections recipes could not be added to, and show debug output
    #[arg(long)]
    verbose: bool,

    /// Directory holding recipes.json, imported.json and errors.json
    #[arg(long, env = "ANYLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: ./config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if cli.verbose {
                debug!("{:?}", e);
            }
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli) -> Result<(), ImportError> {
    let mut config = match &cli.config {
        Some(path) => ImporterConfig::load_from(path)?,
        None => ImporterConfig::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    let summary = import_pending(&config, cli.dry_run).await?;
    print_summary(&summary, &config.paths().errors, cli.verbose);
    Ok(())
}

fn print_summary(summary: &BatchSummary, errors_path: &Path, verbose: bool) {
    if summary.total == 0 {
        return;
    }

    for line in collection_failure_lines(summary, verbose) {
        println!("{}", line);
    }

    let rule = "=".repeat(50);
    println!("{}", rule);
    if summary.dry_run {
        println!("Would import: {}", summary.imported.len());
    } else {
        println!("Successfully imported: {}", summary.imported.len());
    }
    if !summary.failed.is_empty() {
        if summary.dry_run {
            println!("Failed: {}", summary.failed.len());
        } else {
            println!("Failed: {} (see {})", summary.failed.len(), errors_path.display());
        }
    }
    println!("{}", rule);
}

// Collection failures do not fail a recipe and are listed only on request
fn collection_failure_lines(summary: &BatchSummary, verbose: bool) -> Vec<String> {
    if !verbose {
        return Vec::new();
    }
    summary
        .collection_failures
        .iter()
        .map(|f| {
            format!(
                "Failed to add \"{}\" to collection \"{}\": {}",
                f.recipe, f.collection, f.error
            )
        })
        .collect()
}
