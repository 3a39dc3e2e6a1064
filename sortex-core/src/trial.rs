use crate::rule::{Context, Side};
use crate::stimulus::{StimulusItem, TOTAL_TRIALS};
use serde::Serialize;

/// Points awarded for a correct response
pub const REWARD_POINTS: u32 = 25;

pub const MAX_SCORE: u32 = REWARD_POINTS * TOTAL_TRIALS as u32;

/// Recorded outcome of one resolved trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseRecord {
    pub trial: usize,
    pub item: StimulusItem,
    pub chosen_side: Side,
    pub is_correct: bool,
    pub context: Context,
}

impl ResponseRecord {
    pub fn points(&self) -> u32 {
        if self.is_correct { REWARD_POINTS } else { 0 }
    }

    /// True when the response follows the first-context mapping regardless of
    /// the context it was given in.
    pub fn follows_first_rule(&self) -> bool {
        Context::First.expected_side(self.item.category) == self.chosen_side
    }
}

/// Feedback shown between resolution and the next trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn from_outcome(is_correct: bool) -> Self {
        if is_correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => "✅ Correct! +25 points",
            Feedback::Incorrect => "❌ Incorrect",
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Feedback::None)
    }
}
