//! Question set preparation.
//!
//! Turns a raw, unordered question set into the sequence presented during
//! one attempt: question order shuffled, each question's options shuffled,
//! the correct answer's slot rebalanced across the batch, and (in tiered
//! mode) questions bucketed easy→medium→hard with a per-tier time budget.
//!
//! Every function takes the RNG as a parameter so callers can pass
//! `rand::thread_rng()` and tests can pass a seeded `StdRng`.

use std::time::Duration;

use rand::Rng;

use crate::models::{Question, Tier};

/// Tuning knobs for the preparer.
///
/// The length thresholds and tier durations are heuristics carried over
/// from the original app; longer prompts give more context, count as
/// easier and get more time.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Prompts longer than this many chars classify as easy.
    pub easy_min_chars: usize,
    /// Prompts longer than this many chars (but not easy) classify as medium.
    pub medium_min_chars: usize,
    pub easy_duration: Duration,
    pub medium_duration: Duration,
    pub hard_duration: Duration,
    /// Countdown used when the quiz was prepared without tiers.
    pub untiered_duration: Duration,
    /// Assumed option count for slot cycling when a batch reports none.
    pub fallback_option_count: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            easy_min_chars: 150,
            medium_min_chars: 80,
            easy_duration: Duration::from_secs(30),
            medium_duration: Duration::from_secs(20),
            hard_duration: Duration::from_secs(15),
            untiered_duration: Duration::from_secs(10),
            fallback_option_count: 4,
        }
    }
}

impl PrepareConfig {
    pub fn tier_duration(&self, tier: Tier) -> Duration {
        match tier {
            Tier::Easy => self.easy_duration,
            Tier::Medium => self.medium_duration,
            Tier::Hard => self.hard_duration,
        }
    }

    /// Countdown budget for a prepared question.
    pub fn question_duration(&self, question: &Question) -> Duration {
        match question.tier {
            Some(tier) => self.tier_duration(tier),
            None => self.untiered_duration,
        }
    }

    /// Text-length difficulty bucket for a prompt.
    pub fn classify(&self, prompt: &str) -> Tier {
        let len = prompt.chars().count();
        if len > self.easy_min_chars {
            Tier::Easy
        } else if len > self.medium_min_chars {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }
}

/// Fisher–Yates shuffle on a copy of the input.
///
/// Walks from the last index down to 1, swapping each element with a
/// uniformly chosen one at or below it. The caller's slice is untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(rng: &mut R, input: &[T]) -> Vec<T> {
    let mut arr = input.to_vec();
    for i in (1..arr.len()).rev() {
        let j = rng.gen_range(0..=i);
        arr.swap(i, j);
    }
    arr
}

/// Shuffle each question's options and spread the correct answer's final
/// slot evenly across the batch.
///
/// A per-question independent random slot can cluster by chance; instead a
/// cycle `0..M-1` (M = max option count in the batch) is laid out over the
/// batch, shuffled globally, and each question's correct option is swapped
/// into its assigned slot. A question whose correct value is absent from
/// its options is left shuffled without correction.
pub fn rebalance_correct_slots<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &PrepareConfig,
    questions: &mut [Question],
) {
    if questions.is_empty() {
        return;
    }

    let max_options = questions
        .iter()
        .map(|q| q.options.len())
        .max()
        .filter(|&m| m > 0)
        .unwrap_or(cfg.fallback_option_count);

    let slot_cycle: Vec<usize> = (0..questions.len()).map(|i| i % max_options).collect();
    let desired_slots = shuffled(rng, &slot_cycle);

    for (question, desired) in questions.iter_mut().zip(desired_slots) {
        question.options = shuffled(rng, &question.options);
        // Modulo guards questions with fewer options than the batch max.
        let len = question.options.len().max(1);
        let desired = desired % len;
        if let Some(current) = question.correct_index() {
            if current != desired {
                question.options.swap(current, desired);
            }
        }
    }
}

/// Prepare an attempt without tiers: shuffled order, shuffled options,
/// rebalanced correct slots. No tier tags are assigned.
pub fn prepare_questions<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &PrepareConfig,
    base: &[Question],
) -> Vec<Question> {
    let mut questions = shuffled(rng, base);
    for q in &mut questions {
        q.tier = None;
    }
    rebalance_correct_slots(rng, cfg, &mut questions);
    questions
}

/// Prepare an attempt with difficulty tiers.
///
/// The shuffled batch is ordered by text-length classification (easy
/// first), split into three contiguous blocks of `floor(N/3)` with the
/// remainder going to the earlier blocks, and every question is tagged by
/// the block it landed in — the length classification decides membership
/// only, the block decides the final tag. Presentation order is the block
/// order, easy→medium→hard.
pub fn prepare_tiered<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &PrepareConfig,
    base: &[Question],
) -> Vec<Question> {
    let mut questions = shuffled(rng, base);
    if questions.is_empty() {
        return questions;
    }

    let rank = |tier: Tier| match tier {
        Tier::Easy => 0u8,
        Tier::Medium => 1,
        Tier::Hard => 2,
    };
    // Stable sort keeps the shuffled order within each bucket.
    questions.sort_by_key(|q| rank(cfg.classify(&q.prompt)));

    let n = questions.len();
    let rem = n % 3;
    let easy_len = n / 3 + usize::from(rem >= 1);
    let medium_len = n / 3 + usize::from(rem >= 2);

    for (i, question) in questions.iter_mut().enumerate() {
        question.tier = Some(if i < easy_len {
            Tier::Easy
        } else if i < easy_len + medium_len {
            Tier::Medium
        } else {
            Tier::Hard
        });
    }

    rebalance_correct_slots(rng, cfg, &mut questions);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: &str, prompt: &str, options: &[&str], correct: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: correct.to_string(),
            tier: None,
        }
    }

    fn batch(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                question(
                    &format!("q{i}"),
                    &format!("prompt {i}"),
                    &["A", "B", "C", "D"],
                    "B",
                )
            })
            .collect()
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn assert_valid(prepared: &[Question], base: &[Question]) {
        assert_eq!(prepared.len(), base.len());
        let mut ids: Vec<_> = prepared.iter().map(|q| q.id.clone()).collect();
        ids.sort();
        let mut base_ids: Vec<_> = base.iter().map(|q| q.id.clone()).collect();
        base_ids.sort();
        assert_eq!(ids, base_ids, "preparation must not drop or duplicate");

        for q in prepared {
            let original = base.iter().find(|b| b.id == q.id).unwrap();
            let mut opts = q.options.clone();
            opts.sort();
            let mut orig_opts = original.options.clone();
            orig_opts.sort();
            assert_eq!(opts, orig_opts, "option multiset must be preserved");
            if original.correct_index().is_some() {
                assert_eq!(
                    q.options.iter().filter(|o| **o == q.correct_option).count(),
                    1,
                    "correct option must survive exactly once"
                );
            }
        }
    }

    #[test]
    fn shuffled_is_a_permutation_and_leaves_input_alone() {
        let input: Vec<u32> = (0..20).collect();
        let copy = input.clone();
        let mut r = rng(1);
        let out = shuffled(&mut r, &input);
        assert_eq!(input, copy);
        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, input);
    }

    #[test]
    fn shuffled_is_deterministic_for_a_seed() {
        let input: Vec<u32> = (0..10).collect();
        let a = shuffled(&mut rng(42), &input);
        let b = shuffled(&mut rng(42), &input);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffled_handles_trivial_lengths() {
        let mut r = rng(7);
        assert_eq!(shuffled(&mut r, &Vec::<u32>::new()), Vec::<u32>::new());
        assert_eq!(shuffled(&mut r, &[9]), vec![9]);
    }

    #[test]
    fn classify_uses_exact_thresholds() {
        let cfg = PrepareConfig::default();
        assert_eq!(cfg.classify(&"x".repeat(151)), Tier::Easy);
        assert_eq!(cfg.classify(&"x".repeat(150)), Tier::Medium);
        assert_eq!(cfg.classify(&"x".repeat(81)), Tier::Medium);
        assert_eq!(cfg.classify(&"x".repeat(80)), Tier::Hard);
        assert_eq!(cfg.classify(""), Tier::Hard);
    }

    #[test]
    fn tier_durations() {
        let cfg = PrepareConfig::default();
        assert_eq!(cfg.tier_duration(Tier::Easy), Duration::from_secs(30));
        assert_eq!(cfg.tier_duration(Tier::Medium), Duration::from_secs(20));
        assert_eq!(cfg.tier_duration(Tier::Hard), Duration::from_secs(15));

        let mut q = question("q", "p", &["A", "B"], "A");
        assert_eq!(cfg.question_duration(&q), Duration::from_secs(10));
        q.tier = Some(Tier::Hard);
        assert_eq!(cfg.question_duration(&q), Duration::from_secs(15));
    }

    #[test]
    fn rebalance_fills_every_slot_when_batch_is_a_multiple() {
        // 8 questions with 4 options each: the slot cycle guarantees the
        // correct answer lands in each slot exactly twice.
        let cfg = PrepareConfig::default();
        let mut questions = batch(8);
        let mut r = rng(3);
        rebalance_correct_slots(&mut r, &cfg, &mut questions);

        let mut histogram = [0usize; 4];
        for q in &questions {
            histogram[q.correct_index().unwrap()] += 1;
        }
        assert_eq!(histogram, [2, 2, 2, 2]);
    }

    #[test]
    fn correct_slot_is_roughly_uniform_per_batch_position() {
        let cfg = PrepareConfig::default();
        let base = batch(4);
        let mut r = rng(11);
        let trials = 2000;
        let mut histogram = [0usize; 4];

        for _ in 0..trials {
            let mut questions = base.clone();
            rebalance_correct_slots(&mut r, &cfg, &mut questions);
            histogram[questions[0].correct_index().unwrap()] += 1;
        }

        for count in histogram {
            assert!(
                (350..=650).contains(&count),
                "slot counts skewed: {histogram:?}"
            );
        }
    }

    #[test]
    fn missing_correct_option_is_tolerated() {
        let cfg = PrepareConfig::default();
        let mut questions = vec![question("q0", "p", &["A", "B", "C"], "Z")];
        let mut r = rng(5);
        rebalance_correct_slots(&mut r, &cfg, &mut questions);

        let mut opts = questions[0].options.clone();
        opts.sort();
        assert_eq!(opts, vec!["A", "B", "C"]);
        assert_eq!(questions[0].correct_index(), None);
    }

    #[test]
    fn short_option_lists_stay_in_range() {
        let cfg = PrepareConfig::default();
        let mut questions = batch(6);
        questions.push(question("q6", "p", &["A", "B"], "B"));
        let mut r = rng(9);
        rebalance_correct_slots(&mut r, &cfg, &mut questions);

        let short = questions.iter().find(|q| q.id == "q6").unwrap();
        assert_eq!(short.options.len(), 2);
        assert!(short.correct_index().unwrap() < 2);
    }

    #[test]
    fn two_option_question_keeps_its_answer() {
        let cfg = PrepareConfig::default();
        let base = vec![question("only", "p", &["A", "B"], "B")];
        let prepared = prepare_tiered(&mut rng(13), &cfg, &base);

        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].options.len(), 2);
        assert_eq!(
            prepared[0].options.iter().filter(|o| *o == "B").count(),
            1
        );
    }

    #[test]
    fn prepare_questions_assigns_no_tiers() {
        let cfg = PrepareConfig::default();
        let base = batch(5);
        let prepared = prepare_questions(&mut rng(17), &cfg, &base);
        assert_valid(&prepared, &base);
        assert!(prepared.iter().all(|q| q.tier.is_none()));
    }

    #[test]
    fn tiered_batch_of_nine_splits_three_ways() {
        let cfg = PrepareConfig::default();
        let base = batch(9);
        let prepared = prepare_tiered(&mut rng(19), &cfg, &base);
        assert_valid(&prepared, &base);

        let tiers: Vec<_> = prepared.iter().map(|q| q.tier.unwrap()).collect();
        assert_eq!(&tiers[0..3], &[Tier::Easy; 3]);
        assert_eq!(&tiers[3..6], &[Tier::Medium; 3]);
        assert_eq!(&tiers[6..9], &[Tier::Hard; 3]);

        assert_eq!(
            cfg.question_duration(&prepared[0]),
            Duration::from_secs(30)
        );
        assert_eq!(
            cfg.question_duration(&prepared[4]),
            Duration::from_secs(20)
        );
        assert_eq!(
            cfg.question_duration(&prepared[8]),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn tiered_remainder_goes_to_earlier_blocks() {
        let cfg = PrepareConfig::default();

        for (n, expected) in [(10, (4, 3, 3)), (11, (4, 4, 3)), (2, (1, 1, 0))] {
            let prepared = prepare_tiered(&mut rng(n as u64), &cfg, &batch(n));
            let count = |tier| {
                prepared
                    .iter()
                    .filter(|q| q.tier == Some(tier))
                    .count()
            };
            assert_eq!(
                (count(Tier::Easy), count(Tier::Medium), count(Tier::Hard)),
                expected,
                "n = {n}"
            );
        }
    }

    #[test]
    fn tiered_order_is_easy_then_medium_then_hard() {
        let cfg = PrepareConfig::default();
        let prepared = prepare_tiered(&mut rng(23), &cfg, &batch(17));
        let ranks: Vec<u8> = prepared
            .iter()
            .map(|q| match q.tier.unwrap() {
                Tier::Easy => 0,
                Tier::Medium => 1,
                Tier::Hard => 2,
            })
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn length_classification_decides_block_membership() {
        // Three prompts long enough to classify easy, three medium, three
        // hard: the blocks must line up with the classification.
        let cfg = PrepareConfig::default();
        let mut base = Vec::new();
        for i in 0..3 {
            base.push(question(
                &format!("e{i}"),
                &"e".repeat(160 + i),
                &["A", "B", "C", "D"],
                "A",
            ));
            base.push(question(
                &format!("m{i}"),
                &"m".repeat(100 + i),
                &["A", "B", "C", "D"],
                "A",
            ));
            base.push(question(
                &format!("h{i}"),
                &"h".repeat(10 + i),
                &["A", "B", "C", "D"],
                "A",
            ));
        }

        let prepared = prepare_tiered(&mut rng(29), &cfg, &base);
        for q in &prepared {
            let expected = match q.id.as_bytes()[0] {
                b'e' => Tier::Easy,
                b'm' => Tier::Medium,
                _ => Tier::Hard,
            };
            assert_eq!(q.tier, Some(expected), "question {}", q.id);
        }
    }

    #[test]
    fn preparing_twice_yields_two_valid_attempts() {
        let cfg = PrepareConfig::default();
        let base = batch(12);
        let mut r = rng(31);
        let first = prepare_tiered(&mut r, &cfg, &base);
        let second = prepare_tiered(&mut r, &cfg, &base);
        assert_valid(&first, &base);
        assert_valid(&second, &base);
    }

    #[test]
    fn empty_batch_prepares_to_empty() {
        let cfg = PrepareConfig::default();
        assert!(prepare_tiered(&mut rng(37), &cfg, &[]).is_empty());
        assert!(prepare_questions(&mut rng(37), &cfg, &[]).is_empty());
    }
}
