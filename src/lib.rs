//! # drive-quiz
//!
//! A terminal quiz application backed by a remote file catalog.
//!
//! Quiz definitions live as JSON files in a Google Drive folder (or
//! behind a public index file). The app lists them and prepares a timed
//! attempt: shuffled questions, shuffled options, the correct answer's
//! slot rebalanced across the batch, and difficulty tiers with per-tier
//! countdowns. Attempts score on a 0–10 scale, with a local score
//! history per quiz and a cumulative score on a remote leaderboard.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drive_quiz::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), drive_quiz::QuizError> {
//!     let mut config = Config::default();
//!     config.index_file_id = Some("PUBLIC_INDEX_FILE_ID".to_string());
//!     drive_quiz::run(config).await
//! }
//! ```

mod app;
pub mod config;
mod data;
mod models;
mod net;
pub mod prepare;
mod storage;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

pub use app::{App, AttemptOutcome, Stage, PASS_SCORE};
pub use config::Config;
pub use data::{load_quiz_from_json, parse_quiz_payload, LoadError};
pub use models::{CatalogItem, Question, QuizDoc, Tier};
pub use net::{DriveClient, NetError, RankingClient, RankingEntry, UserProfile};
pub use prepare::PrepareConfig;
pub use storage::{AttemptRecord, ScoreStore, StoreError};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading a local quiz file.
    Load(LoadError),
    /// Error reading or writing the score store.
    Store(StoreError),
    /// IO error during quiz execution.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load quiz: {}", e),
            QuizError::Store(e) => write!(f, "Score store error: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Store(e) => Some(e),
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        QuizError::Store(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// Result of a background fetch, tagged with the request token it was
/// started under so stale replies can be dropped.
enum FetchEvent {
    Catalog {
        token: u64,
        result: Result<Vec<CatalogItem>, String>,
    },
    Quiz {
        token: u64,
        result: Result<QuizDoc, String>,
    },
    Ranking {
        token: u64,
        result: Result<Vec<RankingEntry>, String>,
    },
}

/// Handles to the remote sources plus the channel fetches report back on.
struct Remote {
    drive: Arc<DriveClient>,
    ranking: Arc<RankingClient>,
    tx: mpsc::UnboundedSender<FetchEvent>,
    top_n: usize,
}

impl Remote {
    fn spawn_catalog(&self, token: u64) {
        let drive = Arc::clone(&self.drive);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = drive.list_catalog().await.map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::Catalog { token, result });
        });
    }

    fn spawn_quiz(&self, token: u64, id: String, fallback_name: String) {
        let drive = Arc::clone(&self.drive);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = drive
                .fetch_quiz(&id, &fallback_name)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::Quiz { token, result });
        });
    }

    fn spawn_ranking(&self, token: u64) {
        let ranking = Arc::clone(&self.ranking);
        let tx = self.tx.clone();
        let top_n = self.top_n;
        tokio::spawn(async move {
            let result = ranking
                .fetch_ranking(top_n)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::Ranking { token, result });
        });
    }

    /// Push an attempt's hits to the cumulative score. Fire-and-forget:
    /// a failure is logged, never surfaced.
    fn spawn_add_score(&self, uuid: String, name: String, delta: u64) {
        if !self.ranking.is_configured() {
            return;
        }
        let ranking = Arc::clone(&self.ranking);
        tokio::spawn(async move {
            if let Err(e) = ranking.add_score(&uuid, &name, delta).await {
                log::warn!("score sync failed: {}", e);
            }
        });
    }

    fn spawn_profile_sync(&self, profile: UserProfile) {
        if !self.ranking.is_configured() {
            return;
        }
        let ranking = Arc::clone(&self.ranking);
        tokio::spawn(async move {
            if let Err(e) = ranking.upsert_profile(&profile).await {
                log::warn!("profile sync failed: {}", e);
            }
        });
    }
}

/// Run the application: set up the terminal, drive the event loop, restore
/// the terminal on the way out.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let mut store = ScoreStore::open(&config.data_file)?;
    let mut app = App::new(config.prepare.clone(), config.tiered);
    app.set_attempts(store.attempts());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let remote = Remote {
        drive: Arc::new(DriveClient::new(
            config.api_key.clone(),
            config.folder_id.clone(),
            config.index_file_id.clone(),
        )),
        ranking: Arc::new(RankingClient::new(config.ranking_url.clone())),
        tx,
        top_n: config.top_n,
    };

    remote.spawn_profile_sync(UserProfile {
        uuid: store.device_id().to_string(),
        name: config.display_name.clone(),
        photo_url: None,
        score: 0,
    });

    if let Some(path) = &config.quiz_file {
        // Offline mode: open the local file directly at the start screen.
        let doc = load_quiz_from_json(path)?;
        app.open_quiz(doc);
    } else {
        let token = app.begin_catalog_load();
        remote.spawn_catalog(token);
    }

    let mut terminal = terminal::init()?;
    let result = run_event_loop(&mut terminal, &mut app, &mut store, &config, &remote, &mut rx).await;
    terminal::restore()?;
    result
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    store: &mut ScoreStore,
    config: &Config,
    remote: &Remote,
    rx: &mut mpsc::UnboundedReceiver<FetchEvent>,
) -> Result<(), QuizError> {
    loop {
        if app.should_quit {
            break;
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        while let Ok(fetch) = rx.try_recv() {
            apply_fetch(app, fetch);
        }

        // The poll timeout below doubles as the countdown tick.
        app.tick(Instant::now());
        persist_outcome(app, store, config, remote);

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, remote, key.code);
            }
        }
    }

    Ok(())
}

fn apply_fetch(app: &mut App, fetch: FetchEvent) {
    match fetch {
        FetchEvent::Catalog { token, result } => app.catalog_loaded(token, result),
        FetchEvent::Quiz { token, result } => app.quiz_loaded(token, result),
        FetchEvent::Ranking { token, result } => app.ranking_loaded(token, result),
    }
}

/// Persist a finished attempt locally and push its hits to the ranking.
fn persist_outcome(app: &mut App, store: &mut ScoreStore, config: &Config, remote: &Remote) {
    let Some(outcome) = app.take_outcome() else {
        return;
    };

    match store.record(&outcome.quiz_id, outcome.score) {
        Ok(()) => {
            if let Some(record) = store.last(&outcome.quiz_id) {
                app.record_attempt(&outcome.quiz_id, record);
            }
        }
        Err(e) => log::warn!("failed to persist attempt: {}", e),
    }

    if outcome.hits > 0 {
        remote.spawn_add_score(
            store.device_id().to_string(),
            config.display_name.clone(),
            outcome.hits as u64,
        );
    }
}

fn handle_input(app: &mut App, remote: &Remote, key: KeyCode) {
    match app.stage {
        Stage::Catalog => handle_catalog_input(app, remote, key),
        Stage::Start => handle_start_input(app, key),
        Stage::Quiz => handle_quiz_input(app, key),
        Stage::Result => handle_result_input(app, key),
        Stage::Dashboard => handle_dashboard_input(app, key),
    }
}

fn handle_catalog_input(app: &mut App, remote: &Remote, key: KeyCode) {
    if app.loading {
        // Only cancellation is accepted mid-fetch; the stale reply will be
        // dropped by its token.
        if key == KeyCode::Esc {
            app.cancel_loading();
        }
        return;
    }

    match key {
        KeyCode::Up => app.select_previous_item(),
        KeyCode::Down => app.select_next_item(),
        KeyCode::Enter => {
            if let Some(item) = app.selected_item() {
                let name = item.display_name().to_string();
                let token = app.begin_quiz_load();
                remote.spawn_quiz(token, item.id, name);
            }
        }
        KeyCode::F(5) => {
            let token = app.begin_catalog_load();
            remote.spawn_catalog(token);
        }
        KeyCode::Tab => {
            let token = app.begin_ranking_load();
            remote.spawn_ranking(token);
        }
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        KeyCode::Esc => {
            if app.search.is_empty() {
                app.should_quit = true;
            } else {
                app.search.clear();
                app.selected = 0;
            }
        }
        _ => {}
    }
}

fn handle_start_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.start_attempt(&mut rand::thread_rng(), Instant::now()),
        KeyCode::Esc | KeyCode::Backspace => app.back_to_catalog(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(Instant::now()),
        KeyCode::Esc => app.back_to_start(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.start_attempt(&mut rand::thread_rng(), Instant::now())
        }
        KeyCode::Esc => app.back_to_catalog(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Tab => app.back_to_catalog(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}
