use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{establish_connection, run_migrations, Category, Question};
use trivia_api::telemetry::init_tracing;

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database url, e.g. sqlite:trivia.db
    database_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pool = establish_connection(&cli.database_url, 1)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::Export { path } => {
            let categories = get_all_categories(&pool).await?;
            let questions = get_all_questions(&pool).await?;
            if !path.exists() {
                std::fs::create_dir_all(&path)?
            }
            tracing::info!(
                categories = categories.len(),
                questions = questions.len(),
                "Exporting to {}",
                path.display()
            );
            write_to(&path.join(CATEGORIES_FILE), categories)?;
            write_to(&path.join(QUESTIONS_FILE), questions)?;
        }
        Commands::Import { path } => {
            let categories: Vec<Category> = read_from(&path.join(CATEGORIES_FILE))?;
            let questions: Vec<Question> = read_from(&path.join(QUESTIONS_FILE))?;
            tracing::info!(
                categories = categories.len(),
                questions = questions.len(),
                "Importing from {}",
                path.display()
            );
            import_categories(&pool, categories).await?;
            import_questions(&pool, questions).await?;
        }
    }
    Ok(())
}

fn write_to(path: &Path, data: Vec<impl serde::Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}
