//! Application state machine.
//!
//! Stages follow `catalog → (loading) → start → quiz → result`, with the
//! ranking dashboard reachable from the catalog. One countdown deadline is
//! armed at a time and dropped on any transition away from the quiz;
//! answer submission is guarded by a one-shot lock so a double-tap or a
//! timeout racing a manual answer scores once.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::models::{CatalogItem, Question, QuizDoc};
use crate::net::RankingEntry;
use crate::prepare::{self, PrepareConfig};
use crate::storage::{AttemptRecord, REVISIT_AFTER_MS};

/// Passing grade on the 0–10 scale.
pub const PASS_SCORE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Catalog,
    Start,
    Quiz,
    Result,
    Dashboard,
}

/// A finished attempt waiting to be persisted and pushed to the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub quiz_id: String,
    pub score: f64,
    pub hits: usize,
}

pub struct App {
    pub stage: Stage,
    prepare_cfg: PrepareConfig,
    tiered: bool,

    // Catalog.
    pub catalog: Option<Vec<CatalogItem>>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub selected: usize,
    attempts: HashMap<String, AttemptRecord>,

    // Current quiz and attempt.
    current_quiz_id: Option<String>,
    pub quiz_name: String,
    base_questions: Vec<Question>,
    questions: Vec<Question>,
    index: usize,
    pub hits: usize,
    pub misses: usize,
    pub selected_option: usize,
    locked: bool,
    deadline: Option<Instant>,
    time_limit: Duration,
    pending_outcome: Option<AttemptOutcome>,

    // Dashboard.
    pub ranking: Vec<RankingEntry>,
    pub ranking_loading: bool,
    pub ranking_error: Option<String>,

    request_token: u64,
    pub should_quit: bool,
}

impl App {
    pub fn new(prepare_cfg: PrepareConfig, tiered: bool) -> Self {
        Self {
            stage: Stage::Catalog,
            prepare_cfg,
            tiered,
            catalog: None,
            loading: false,
            error: None,
            search: String::new(),
            selected: 0,
            attempts: HashMap::new(),
            current_quiz_id: None,
            quiz_name: String::new(),
            base_questions: Vec::new(),
            questions: Vec::new(),
            index: 0,
            hits: 0,
            misses: 0,
            selected_option: 0,
            locked: false,
            deadline: None,
            time_limit: Duration::ZERO,
            pending_outcome: None,
            ranking: Vec::new(),
            ranking_loading: false,
            ranking_error: None,
            request_token: 0,
            should_quit: false,
        }
    }

    // ---- fetch tokens ----------------------------------------------------

    /// Bump and return the token a new fetch should carry. Results coming
    /// back with an older token are stale and get dropped.
    pub fn next_token(&mut self) -> u64 {
        self.request_token += 1;
        self.request_token
    }

    fn is_current(&self, token: u64) -> bool {
        token == self.request_token
    }

    // ---- catalog ---------------------------------------------------------

    pub fn begin_catalog_load(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.next_token()
    }

    pub fn catalog_loaded(&mut self, token: u64, result: Result<Vec<CatalogItem>, String>) {
        if !self.is_current(token) {
            return;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.selected = 0;
                self.catalog = Some(items);
            }
            Err(message) => self.error = Some(message),
        }
    }

    /// Sync the local attempt history (catalog badges) from the store.
    pub fn set_attempts(&mut self, attempts: HashMap<String, AttemptRecord>) {
        self.attempts = attempts;
    }

    pub fn record_attempt(&mut self, quiz_id: &str, record: AttemptRecord) {
        self.attempts.insert(quiz_id.to_string(), record);
    }

    pub fn last_attempt(&self, quiz_id: &str) -> Option<AttemptRecord> {
        self.attempts.get(quiz_id).copied()
    }

    pub fn needs_revisit(&self, quiz_id: &str, now_ms: i64) -> bool {
        self.last_attempt(quiz_id)
            .is_some_and(|rec| now_ms - rec.at_ms > REVISIT_AFTER_MS)
    }

    /// Catalog entries matching the search box, in listing order.
    pub fn filtered_catalog(&self) -> Vec<&CatalogItem> {
        let term = self.search.trim().to_lowercase();
        self.catalog
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|item| {
                term.is_empty() || item.display_name().to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn select_next_item(&mut self) {
        let len = self.filtered_catalog().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous_item(&mut self) {
        let len = self.filtered_catalog().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
    }

    pub fn search_pop(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    /// The highlighted catalog entry, clamped to the filtered view.
    pub fn selected_item(&self) -> Option<CatalogItem> {
        let filtered = self.filtered_catalog();
        filtered
            .get(self.selected.min(filtered.len().saturating_sub(1)))
            .map(|item| (*item).clone())
    }

    // ---- opening a quiz --------------------------------------------------

    pub fn begin_quiz_load(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.next_token()
    }

    /// Abort the in-flight fetch: the token moves on, so a late result is
    /// ignored and the catalog stays interactive.
    pub fn cancel_loading(&mut self) {
        self.loading = false;
        self.next_token();
    }

    pub fn quiz_loaded(&mut self, token: u64, result: Result<QuizDoc, String>) {
        if !self.is_current(token) {
            return;
        }
        self.loading = false;
        match result {
            Ok(doc) => self.open_quiz(doc),
            Err(message) => self.error = Some(message),
        }
    }

    /// Install a fetched quiz and move to the start screen. The raw set is
    /// kept for the attempt lifetime; each start derives a fresh prepared
    /// sequence from it.
    pub fn open_quiz(&mut self, doc: QuizDoc) {
        self.quiz_name = doc.name.unwrap_or_else(|| "Quiz".to_string());
        self.current_quiz_id = Some(doc.id);
        self.base_questions = doc.questions;
        self.questions.clear();
        self.index = 0;
        self.hits = 0;
        self.misses = 0;
        self.stage = Stage::Start;
    }

    pub fn question_count(&self) -> usize {
        self.base_questions.len()
    }

    // ---- the attempt -----------------------------------------------------

    /// Start (or retry) an attempt: prepare a fresh sequence and arm the
    /// first question's countdown. No-op for an empty quiz.
    pub fn start_attempt<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) {
        if self.base_questions.is_empty() {
            return;
        }
        self.questions = if self.tiered {
            prepare::prepare_tiered(rng, &self.prepare_cfg, &self.base_questions)
        } else {
            prepare::prepare_questions(rng, &self.prepare_cfg, &self.base_questions)
        };
        self.index = 0;
        self.hits = 0;
        self.misses = 0;
        self.locked = false;
        self.selected_option = 0;
        self.stage = Stage::Quiz;
        self.arm_timer(now);
    }

    fn arm_timer(&mut self, now: Instant) {
        if let Some(question) = self.questions.get(self.index) {
            self.time_limit = self.prepare_cfg.question_duration(question);
            self.deadline = Some(now + self.time_limit);
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Remaining countdown as (seconds left, fraction of the budget).
    pub fn countdown(&self, now: Instant) -> (u64, f64) {
        match self.deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(now);
                let ratio = if self.time_limit.is_zero() {
                    0.0
                } else {
                    left.as_secs_f64() / self.time_limit.as_secs_f64()
                };
                (left.as_secs(), ratio.clamp(0.0, 1.0))
            }
            None => (0, 0.0),
        }
    }

    pub fn select_next_option(&mut self) {
        if let Some(question) = self.current_question() {
            let len = question.options.len().max(1);
            self.selected_option = (self.selected_option + 1) % len;
        }
    }

    pub fn select_previous_option(&mut self) {
        if let Some(question) = self.current_question() {
            let len = question.options.len().max(1);
            self.selected_option = (self.selected_option + len - 1) % len;
        }
    }

    /// Submit the highlighted option. First actor to take the lock wins;
    /// a second tap or a racing timeout is a no-op.
    pub fn submit_answer(&mut self, now: Instant) {
        if self.stage != Stage::Quiz || self.locked {
            return;
        }
        self.locked = true;
        self.deadline = None;

        let correct = match self.current_question() {
            Some(q) => q
                .options
                .get(self.selected_option)
                .is_some_and(|chosen| *chosen == q.correct_option),
            None => false,
        };
        if correct {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.advance(now);
    }

    /// Drive the countdown. Call with the current time on every loop turn;
    /// an expired deadline scores a miss and auto-advances.
    pub fn tick(&mut self, now: Instant) {
        if self.stage != Stage::Quiz || self.locked {
            return;
        }
        let Some(deadline) = self.deadline else {
            return;
        };
        if now >= deadline {
            self.locked = true;
            self.deadline = None;
            self.misses += 1;
            self.advance(now);
        }
    }

    fn advance(&mut self, now: Instant) {
        self.index += 1;
        if self.index >= self.questions.len() {
            self.finish_attempt();
        } else {
            self.locked = false;
            self.selected_option = 0;
            self.arm_timer(now);
        }
    }

    fn finish_attempt(&mut self) {
        self.stage = Stage::Result;
        self.deadline = None;
        if let Some(quiz_id) = self.current_quiz_id.clone() {
            self.pending_outcome = Some(AttemptOutcome {
                quiz_id,
                score: self.score(),
                hits: self.hits,
            });
        }
    }

    /// The finished attempt that still needs persisting, if any. Consumed
    /// by the runtime exactly once per result.
    pub fn take_outcome(&mut self) -> Option<AttemptOutcome> {
        self.pending_outcome.take()
    }

    /// Grade on the 0–10 scale.
    pub fn score(&self) -> f64 {
        let total = self.questions.len();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 10.0
        }
    }

    pub fn passed(&self) -> bool {
        self.score() >= PASS_SCORE
    }

    /// Leave the attempt (abandon or after the result). Any armed timer is
    /// dropped and a late fetch result is invalidated.
    pub fn back_to_catalog(&mut self) {
        self.deadline = None;
        self.locked = false;
        self.loading = false;
        self.next_token();
        self.stage = Stage::Catalog;
    }

    pub fn back_to_start(&mut self) {
        self.deadline = None;
        self.locked = false;
        self.stage = Stage::Start;
    }

    // ---- dashboard -------------------------------------------------------

    pub fn begin_ranking_load(&mut self) -> u64 {
        self.stage = Stage::Dashboard;
        self.ranking_loading = true;
        self.ranking_error = None;
        self.next_token()
    }

    pub fn ranking_loaded(&mut self, token: u64, result: Result<Vec<RankingEntry>, String>) {
        if !self.is_current(token) {
            return;
        }
        self.ranking_loading = false;
        match result {
            Ok(entries) => self.ranking = entries,
            Err(message) => self.ranking_error = Some(message),
        }
    }
}
