//! Post-game analysis of a finished session: how well the participant did
//! under each context, and whether they noticed the silent rule switch.

use serde::Serialize;
use sortex_core::{Category, Context, REWARD_POINTS, ResponseRecord, Side, items_in};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextStats {
    pub context: Context,
    pub trials: usize,
    pub correct: usize,
}

impl ContextStats {
    fn collect(history: &[ResponseRecord], context: Context) -> Self {
        let in_context = history.iter().filter(|r| r.context == context);
        let (trials, correct) =
            in_context.fold((0, 0), |(n, c), r| (n + 1, c + usize::from(r.is_correct)));
        Self {
            context,
            trials,
            correct,
        }
    }

    /// Fraction correct, 0.0 when no trial was seen in this context
    pub fn accuracy(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.correct as f64 / self.trials as f64
        }
    }
}

/// One marker on the results timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub trial: usize,
    pub symbol: &'static str,
    pub side: Side,
    /// Chosen side, upper-cased for display
    pub label: String,
    pub correct: bool,
    pub context: Context,
}

/// The bucket layout of one context, as shown next to the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPanel {
    pub context: Context,
    pub title: &'static str,
    pub left: Category,
    pub right: Category,
    pub left_symbols: Vec<&'static str>,
    pub right_symbols: Vec<&'static str>,
}

impl PatternPanel {
    pub fn for_context(context: Context) -> Self {
        let left = context.category_for(Side::Left);
        let right = context.category_for(Side::Right);
        let symbols =
            |c: Category| -> Vec<&'static str> { items_in(c).map(|i| i.symbol).collect() };
        Self {
            context,
            title: match context {
                Context::First => "First Pattern",
                Context::Second => "Second Pattern",
            },
            left,
            right,
            left_symbols: symbols(left),
            right_symbols: symbols(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub score: u32,
    pub first: ContextStats,
    pub second: ContextStats,
    /// Accuracy lost after the switch (first minus second)
    pub switch_cost: f64,
    /// Second-context responses that still followed the first mapping
    pub perseverative_errors: usize,
    /// First second-context trial from which every response was correct
    pub adapted_at: Option<usize>,
    pub switch_point: usize,
    pub timeline: Vec<TimelineEntry>,
    pub patterns: [PatternPanel; 2],
}

impl SessionSummary {
    pub fn from_history(history: &[ResponseRecord]) -> Self {
        let first = ContextStats::collect(history, Context::First);
        let second = ContextStats::collect(history, Context::Second);
        let correct = history.iter().filter(|r| r.is_correct).count() as u32;

        let after_switch: Vec<&ResponseRecord> = history
            .iter()
            .filter(|r| r.context == Context::Second)
            .collect();
        let perseverative_errors = after_switch
            .iter()
            .filter(|r| !r.is_correct && r.follows_first_rule())
            .count();

        // the correct run has to reach the end of the history
        let adapted_at = after_switch
            .iter()
            .rposition(|r| !r.is_correct)
            .map_or(0, |i| i + 1);
        let adapted_at = after_switch.get(adapted_at).map(|r| r.trial);

        let timeline = history
            .iter()
            .map(|r| TimelineEntry {
                trial: r.trial,
                symbol: r.item.symbol,
                side: r.chosen_side,
                label: r.chosen_side.label().to_uppercase(),
                correct: r.is_correct,
                context: r.context,
            })
            .collect();

        Self {
            score: correct * REWARD_POINTS,
            switch_cost: first.accuracy() - second.accuracy(),
            first,
            second,
            perseverative_errors,
            adapted_at,
            switch_point: Context::SWITCH_POINT,
            timeline,
            patterns: [
                PatternPanel::for_context(Context::First),
                PatternPanel::for_context(Context::Second),
            ],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
