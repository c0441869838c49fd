use std::path::PathBuf;

use clap::Parser;
use drive_quiz::config::{
    or_env, ENV_API_KEY, ENV_FOLDER_ID, ENV_INDEX_FILE_ID, ENV_RANKING_URL,
};
use drive_quiz::{Config, PrepareConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Google API key for the keyed Drive catalog (env: GOOGLE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Drive folder id holding the quiz JSON files (env: DRIVE_FOLDER_ID)
    #[arg(long)]
    folder_id: Option<String>,

    /// Publicly shared index file id (env: DRIVE_INDEX_FILE_ID)
    #[arg(long)]
    index_file: Option<String>,

    /// Base URL of the ranking store (env: RANKING_API_BASE)
    #[arg(long)]
    ranking_url: Option<String>,

    /// Display name used on the leaderboard
    #[arg(long, default_value = "Player")]
    name: String,

    /// Path of the local score history file
    #[arg(long, default_value = "drive-quiz-scores.json")]
    data_file: PathBuf,

    /// Leaderboard size
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Disable difficulty tiers (flat 10s countdown per question)
    #[arg(long)]
    classic: bool,

    /// Play a local quiz JSON file instead of the remote catalog
    #[arg(long)]
    quiz_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let args = Args::parse();
    let config = Config {
        api_key: or_env(args.api_key, ENV_API_KEY),
        folder_id: or_env(args.folder_id, ENV_FOLDER_ID),
        index_file_id: or_env(args.index_file, ENV_INDEX_FILE_ID),
        ranking_url: or_env(args.ranking_url, ENV_RANKING_URL),
        display_name: args.name,
        data_file: args.data_file,
        quiz_file: args.quiz_file,
        top_n: args.top,
        tiered: !args.classic,
        prepare: PrepareConfig::default(),
    };

    if config.quiz_file.is_none() && !config.has_catalog_source() {
        eprintln!(
            "No catalog source configured: pass --api-key/--folder-id, \
             --index-file or --quiz-file (or set the matching env vars)."
        );
        std::process::exit(2);
    }

    if let Err(e) = drive_quiz::run(config).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
