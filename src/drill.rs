use chrono::Local;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::checker::{self, Verdict};
use crate::history::{AnswerRecord, HistoryLog};
use crate::language::{Direction, PairSelector, UniformSelector, WeightedSelector, WordPair};
use crate::session::{DrillConfig, Feedback, Phase, SessionState};
use crate::stats::{ErrorCountStore, ErrorCounts};

/// A running vocabulary drill
pub struct Drill {
    pub config: DrillConfig,
    pub session: SessionState,
    pairs: Vec<WordPair>,
    counts: ErrorCounts,
    store: Box<dyn ErrorCountStore>,
    selector: Box<dyn PairSelector>,
    history: Option<HistoryLog>,
    rng: StdRng,
}

impl Drill {
    /// Load the error counts from `store` and draw the first word.
    pub fn new(
        pairs: Vec<WordPair>,
        store: Box<dyn ErrorCountStore>,
        config: DrillConfig,
    ) -> Self {
        let selector: Box<dyn PairSelector> = if config.random_words {
            Box::new(UniformSelector)
        } else {
            Box::new(WeightedSelector)
        };
        let counts = store.load_or_default();
        debug!(pairs = pairs.len(), known = counts.len(), "starting drill");

        let mut drill = Self {
            config,
            session: SessionState::default(),
            pairs,
            counts,
            store,
            selector,
            history: None,
            rng: StdRng::from_entropy(),
        };
        drill.pick_next();
        drill
    }

    /// Reseed the generator and redraw the current word.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.pick_next();
        self
    }

    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = Some(history);
        self
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn counts(&self) -> &ErrorCounts {
        &self.counts
    }

    pub fn current(&self) -> Option<&WordPair> {
        self.session.current.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.session.input
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn feedback(&self) -> Feedback {
        self.session.feedback()
    }

    pub fn is_waiting(&self) -> bool {
        self.session.is_waiting()
    }

    /// Word shown to the learner.
    pub fn prompt(&self) -> Option<&str> {
        let direction = self.direction();
        self.current().map(|pair| direction.prompt_of(pair))
    }

    /// Expected answer, only once it has been revealed by a wrong answer.
    pub fn revealed_answer(&self) -> Option<&str> {
        if !self.is_waiting() {
            return None;
        }
        let direction = self.direction();
        self.current().map(|pair| direction.answer_of(pair))
    }

    /// Draw the next word and clear input, message and feedback.
    pub fn pick_next(&mut self) -> Option<&WordPair> {
        let picked = self
            .selector
            .select(&self.pairs, &self.counts, self.config.direction, &mut self.rng)
            .cloned();
        if let Some(pair) = &picked {
            debug!(prompt = self.config.direction.prompt_of(pair), "picked word");
        }
        self.session.current = picked;
        self.session.reset_transient();
        self.session.current.as_ref()
    }

    pub fn write(&mut self, c: char) {
        if self.session.phase == Phase::Idle && self.session.current.is_some() {
            self.session.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.session.phase == Phase::Idle {
            self.session.input.pop();
        }
    }

    /// Check the typed answer. Does nothing (returns `None`) without a current
    /// word or once the current word has already been checked.
    pub fn check(&mut self, now: Instant) -> Option<Verdict> {
        if self.session.phase != Phase::Idle {
            return None;
        }
        let pair = self.session.current.clone()?;
        let direction = self.config.direction;
        let expected = direction.answer_of(&pair);
        let verdict = checker::check(&self.session.input, expected);

        self.session.answered += 1;
        if verdict.correct {
            self.session.correct += 1;
            self.session.phase = Phase::Correct {
                advance_at: now + self.config.advance_delay,
            };
        } else {
            let key = direction.key_of(&pair);
            let count = self.counts.increment(key);
            info!(key, count, "incorrect answer");
            if let Err(e) = self.store.save(&self.counts) {
                warn!(error = %e, "failed to persist error counts");
            }
            self.session.phase = Phase::Incorrect;
        }

        self.record_history(&pair, verdict);
        Some(verdict)
    }

    fn record_history(&self, pair: &WordPair, verdict: Verdict) {
        let Some(history) = &self.history else {
            return;
        };
        let direction = self.config.direction;
        let record = AnswerRecord {
            timestamp: Local::now(),
            direction,
            prompt: direction.prompt_of(pair).to_string(),
            expected: direction.answer_of(pair).to_string(),
            given: self.session.input.clone(),
            correct: verdict.correct,
        };
        if let Err(e) = history.record(&record) {
            warn!(error = %e, path = %history.path().display(), "failed to append history");
        }
    }

    /// Move on after a wrong answer. Returns false when nothing was waiting.
    pub fn acknowledge(&mut self) -> bool {
        if self.is_waiting() {
            self.pick_next();
            true
        } else {
            false
        }
    }

    /// Enter key: acknowledge a revealed answer, otherwise check the input.
    pub fn submit(&mut self, now: Instant) -> Option<Verdict> {
        if self.acknowledge() {
            None
        } else {
            self.check(now)
        }
    }

    /// Perform the scheduled advance after a correct answer. Returns true when
    /// a new word was drawn.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.session.phase {
            Phase::Correct { advance_at } if now >= advance_at => {
                self.pick_next();
                true
            }
            _ => false,
        }
    }

    /// Swap drill direction, pick up stored counts and draw a new word.
    /// Counts only grow: an increment whose save failed is kept.
    pub fn toggle_direction(&mut self) {
        self.config.direction = self.config.direction.toggled();
        self.counts.merge_max(self.store.load_or_default());
        info!(direction = %self.config.direction, "direction changed");
        self.pick_next();
    }

    /// Pairs with at least one mistake in the current direction, most first.
    pub fn struggles(&self, limit: usize) -> Vec<(WordPair, u32)> {
        rank_struggles(&self.pairs, &self.counts, self.config.direction, limit)
    }
}

/// Pairs ordered by error count (highest first, ties by prompt), skipping
/// pairs without mistakes.
pub fn rank_struggles(
    pairs: &[WordPair],
    counts: &ErrorCounts,
    direction: Direction,
    limit: usize,
) -> Vec<(WordPair, u32)> {
    pairs
        .iter()
        .map(|pair| (pair, counts.get(direction.key_of(pair))))
        .filter(|(_, count)| *count > 0)
        .sorted_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| direction.prompt_of(a.0).cmp(direction.prompt_of(b.0)))
        })
        .take(limit)
        .map(|(pair, count)| (pair.clone(), count))
        .collect()
}
