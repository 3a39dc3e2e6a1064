pub mod phase;
pub mod rule;
pub mod stimulus;
pub mod trial;

pub use phase::Phase;
pub use rule::{Context, Side, context_of, correct_side};
pub use stimulus::{CATALOG, Category, Stimulus, StimulusItem, TOTAL_TRIALS, catalog_item, items_in};
pub use trial::{Feedback, MAX_SCORE, REWARD_POINTS, ResponseRecord};
