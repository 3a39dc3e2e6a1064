//! The hidden sorting rule.
//!
//! Trials before the midpoint belong to [`Context::First`], where animals go
//! left and shapes go right. From the midpoint on the mapping is inverted
//! without any signal to the participant.

use crate::stimulus::{Category, Stimulus, TOTAL_TRIALS};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Context {
    First,
    Second,
}

impl Context {
    /// Trial index at which the mapping flips
    pub const SWITCH_POINT: usize = TOTAL_TRIALS / 2;

    /// 1 or 2, as shown to people
    pub fn number(&self) -> u8 {
        match self {
            Context::First => 1,
            Context::Second => 2,
        }
    }

    pub fn expected_side(&self, category: Category) -> Side {
        match (self, category) {
            (Context::First, Category::Animal) => Side::Left,
            (Context::First, Category::Shape) => Side::Right,
            (Context::Second, Category::Animal) => Side::Right,
            (Context::Second, Category::Shape) => Side::Left,
        }
    }

    /// Category sorted into `side` under this context
    pub fn category_for(&self, side: Side) -> Category {
        match (self, side) {
            (Context::First, Side::Left) | (Context::Second, Side::Right) => Category::Animal,
            (Context::First, Side::Right) | (Context::Second, Side::Left) => Category::Shape,
        }
    }
}

pub fn context_of(trial_index: usize) -> Context {
    if trial_index < Context::SWITCH_POINT {
        Context::First
    } else {
        Context::Second
    }
}

/// Side the participant is expected to pick for `item` at `trial_index`.
pub fn correct_side<S: Stimulus>(item: &S, trial_index: usize) -> Side {
    context_of(trial_index).expected_side(item.category())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::{CATALOG, StimulusItem};

    #[test]
    fn first_context_sorts_animals_left() {
        for trial in 0..Context::SWITCH_POINT {
            for item in CATALOG.iter() {
                let expected = if item.is_animal() {
                    Side::Left
                } else {
                    Side::Right
                };
                assert_eq!(correct_side(item, trial), expected, "trial {trial}");
            }
        }
    }

    #[test]
    fn second_context_inverts_mapping() {
        for trial in Context::SWITCH_POINT..TOTAL_TRIALS {
            for item in CATALOG.iter() {
                let expected = if item.is_animal() {
                    Side::Right
                } else {
                    Side::Left
                };
                assert_eq!(correct_side(item, trial), expected, "trial {trial}");
            }
        }
    }

    #[test]
    fn switch_happens_exactly_at_midpoint() {
        assert_eq!(Context::SWITCH_POINT, 4);
        assert_eq!(context_of(3), Context::First);
        assert_eq!(context_of(4), Context::Second);

        let koala = StimulusItem::animal("🐨", "koala");
        assert_eq!(correct_side(&koala, 4), Side::Right);
        assert_eq!(correct_side(&koala, 3), Side::Left);
    }

    #[test]
    fn category_for_is_inverse_of_expected_side() {
        for ctx in [Context::First, Context::Second] {
            for side in [Side::Left, Side::Right] {
                assert_eq!(ctx.expected_side(ctx.category_for(side)), side);
            }
        }
    }
}
