use std::time::{Duration, Instant};

use crate::language::{Direction, WordPair};

/// How long a correct answer stays on screen before the next word.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub direction: Direction,
    pub random_words: bool,
    pub advance_delay: Duration,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            random_words: false,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

/// Where the current word is in its check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the learner to type and submit.
    Idle,
    /// Answered correctly; the next word is drawn at `advance_at`.
    Correct { advance_at: Instant },
    /// Answered wrongly; the answer is revealed until acknowledged.
    Incorrect,
}

/// Colour hint for the answer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub current: Option<WordPair>,
    pub input: String,
    pub phase: Phase,
    // Running tally for this process
    pub answered: usize,
    pub correct: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current: None,
            input: String::new(),
            phase: Phase::Idle,
            answered: 0,
            correct: 0,
        }
    }
}

impl SessionState {
    /// Clear everything tied to the previous word.
    pub fn reset_transient(&mut self) {
        self.input.clear();
        self.phase = Phase::Idle;
    }

    pub fn is_waiting(&self) -> bool {
        self.phase == Phase::Incorrect
    }

    pub fn feedback(&self) -> Feedback {
        match self.phase {
            Phase::Idle => Feedback::Neutral,
            Phase::Correct { .. } => Feedback::Correct,
            Phase::Incorrect => Feedback::Incorrect,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Idle => None,
            Phase::Correct { .. } => Some("Correct!"),
            Phase::Incorrect => Some("Incorrect."),
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            ((self.correct as f64 / self.answered as f64) * 100.0).round()
        }
    }
}
