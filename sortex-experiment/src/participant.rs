use super::state::SessionController;
use rand::Rng;
use sortex_core::{Context, Side, StimulusItem, correct_side};
use sortex_timing::Timer;
use std::time::Duration;
use tracing::debug;

/// How a simulated participant picks a side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Always follows the live rule
    Correct,
    /// Keeps the first mapping for the whole session
    Perseverate,
    /// Coin flip
    Random,
}

pub struct Participant<R: Rng> {
    pub strategy: Strategy,
    pub rng: R,
    /// Pause before each response
    pub think_time: Duration,
}

impl<R: Rng> Participant<R> {
    pub fn new(strategy: Strategy, rng: R) -> Self {
        Self {
            strategy,
            rng,
            think_time: Duration::from_millis(400),
        }
    }

    pub fn respond(&mut self, item: &StimulusItem, trial_index: usize) -> Side {
        match self.strategy {
            Strategy::Correct => correct_side(item, trial_index),
            Strategy::Perseverate => Context::First.expected_side(item.category),
            Strategy::Random => {
                if self.rng.random_bool(0.5) {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }
}

/// Plays the session to the end, sleeping on the controller's timer between
/// steps. With a manual timer this runs instantly.
pub fn play_through<T, R>(session: &mut SessionController<T>, participant: &mut Participant<R>)
where
    T: Timer,
    R: Rng,
{
    while !session.phase().is_finished() {
        if session.phase().allows_input() {
            let Some(item) = session.current_item() else {
                break;
            };
            session.timer.sleep(participant.think_time);
            let side = participant.respond(item, session.trial_index());
            debug!(trial = session.trial_index(), %side, "simulated response");
            session.choose_side(side);
        }
        if let Some(wait) = session.time_to_transition() {
            session.timer.sleep(wait);
        }
        session.tick();
    }
}
