use clap::Parser;
use storage::repository::Storage;
use storage::starter::load_starter;

/// Load the built-in starter courses and questions into a SQLite database.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// SQLite URL
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    db_url: String,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.db_url.trim().is_empty() {
        return Err("--db must not be empty".into());
    }

    let storage = Storage::sqlite(&args.db_url).await?;
    let summary = load_starter(&storage).await?;

    println!(
        "Seeded {} courses and {} questions into {}",
        summary.courses, summary.questions, args.db_url
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
