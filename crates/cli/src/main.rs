use std::path::PathBuf;

use anyhow::Context;
use catalog_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog", version, about = "Library catalog web application")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the catalog until Ctrl-C
    Serve,
    /// Print the resolved settings as JSON
    Config,
    /// Load a catalog data file and report what it holds
    CheckData {
        /// Path to a JSON data file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => catalog_app::run(settings).await,
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)?;
            println!("{rendered}");
            Ok(())
        }
        Command::CheckData { file } => check_data(&file).await,
    }
}

async fn check_data(file: &std::path::Path) -> anyhow::Result<()> {
    let data = catalog_db::memory::read_data_file(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;

    println!("genres: {}", data.genres.len());
    println!("books: {}", data.books.len());
    println!("book instances: {}", data.book_instances.len());

    let dangling = data.dangling_references();
    tracing::info!(
        file = %file.display(),
        genres = data.genres.len(),
        books = data.books.len(),
        book_instances = data.book_instances.len(),
        dangling = dangling.len(),
        "data file checked"
    );
    if dangling.is_empty() {
        return Ok(());
    }
    for problem in &dangling {
        tracing::warn!(%problem, "dangling reference");
        println!("dangling: {problem}");
    }
    anyhow::bail!("{} dangling reference(s) in {}", dangling.len(), file.display())
}
