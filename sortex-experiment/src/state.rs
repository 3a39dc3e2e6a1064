use super::config::SessionConfig;
use super::view::{SessionObserver, SessionView};
use sortex_core::{
    Feedback, Phase, REWARD_POINTS, ResponseRecord, Side, StimulusItem, TOTAL_TRIALS,
    catalog_item, context_of, correct_side,
};
use sortex_timing::{DeferredTransition, Ticket, Timer};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SideChosen(Side),
    /// The feedback delay of a resolved trial ran out. `epoch` is the session
    /// epoch the transition was scheduled in, `ticket` identifies the trial's
    /// own transition.
    TransitionDue { epoch: u64, ticket: Ticket },
    Reset,
}

/// Work left for the deferred transition of a resolved trial
#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    epoch: u64,
}

/// Drives one play-through from the first trial to the results screen.
///
/// State only changes through [`choose_side`](Self::choose_side),
/// [`reset`](Self::reset) and the deferred transition delivered by
/// [`update`](Self::update). Observers get a fresh [`SessionView`] after every
/// change.
pub struct SessionController<T: Timer> {
    pub timer: T,
    pub config: SessionConfig,
    trial_index: usize,
    score: u32,
    history: Vec<ResponseRecord>,
    pending_response: Option<Side>,
    feedback: Feedback,
    phase: Phase,
    transition: DeferredTransition<PendingAdvance>,
    epoch: u64,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<T: Timer> SessionController<T> {
    pub fn new(config: SessionConfig, timer: T) -> Self {
        info!(
            trials = TOTAL_TRIALS,
            feedback_delay_ms = config.feedback_delay_ms,
            "session created"
        );
        Self {
            timer,
            config,
            trial_index: 0,
            score: 0,
            history: Vec::with_capacity(TOTAL_TRIALS),
            pending_response: None,
            feedback: Feedback::None,
            phase: Phase::Active,
            transition: DeferredTransition::new(),
            epoch: 0,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Records the participant's pick for the current trial.
    ///
    /// Ignored unless the session is [`Phase::Active`]; returns the new record
    /// when the response was accepted.
    pub fn choose_side(&mut self, side: Side) -> Option<ResponseRecord> {
        if !self.phase.allows_input() {
            debug!(phase = %self.phase, %side, "response ignored outside active phase");
            return None;
        }
        let item = *catalog_item(self.trial_index)?;

        let is_correct = correct_side(&item, self.trial_index) == side;
        let record = ResponseRecord {
            trial: self.trial_index,
            item,
            chosen_side: side,
            is_correct,
            context: context_of(self.trial_index),
        };
        self.history.push(record);
        if is_correct {
            self.score += REWARD_POINTS;
        }
        self.pending_response = Some(side);
        self.feedback = Feedback::from_outcome(is_correct);
        self.phase = Phase::Resolved;

        let now = self.timer.now();
        self.transition.schedule(
            now,
            self.config.feedback_delay(),
            PendingAdvance { epoch: self.epoch },
        );

        debug!(
            trial = self.trial_index,
            item = item.name,
            %side,
            correct = is_correct,
            score = self.score,
            "trial resolved"
        );
        self.notify();
        Some(record)
    }

    /// Returns every state to its initial value and drops any pending
    /// transition. Legal in every phase.
    pub fn reset(&mut self) {
        let dropped = self.transition.cancel();
        self.epoch += 1;
        self.trial_index = 0;
        self.score = 0;
        self.history.clear();
        self.pending_response = None;
        self.feedback = Feedback::None;
        self.phase = Phase::Active;

        info!(epoch = self.epoch, dropped_transition = dropped, "session reset");
        self.notify();
    }

    /// Polls the clock and reports the events that became due.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some((ticket, pending)) = self.transition.poll(self.timer.now()) {
            events.push(SessionEvent::TransitionDue {
                epoch: pending.epoch,
                ticket,
            });
        }
        events
    }

    /// Applies one event. Returns whether it changed the session.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::SideChosen(side) => self.choose_side(side).is_some(),
            SessionEvent::Reset => {
                self.reset();
                true
            }
            SessionEvent::TransitionDue { epoch, .. } if epoch != self.epoch => {
                debug!(epoch, current = self.epoch, "stale transition dropped");
                false
            }
            SessionEvent::TransitionDue { ticket, .. }
                if !self.transition.is_current(ticket) =>
            {
                debug!(
                    generation = ticket.generation,
                    "transition of an earlier trial dropped"
                );
                false
            }
            SessionEvent::TransitionDue { .. } if self.phase.is_resolved() => {
                self.advance();
                true
            }
            SessionEvent::TransitionDue { .. } => false,
        }
    }

    /// Polls and applies everything that is due. Returns whether anything
    /// changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        for event in self.update() {
            changed |= self.handle_event(event);
        }
        changed
    }

    fn advance(&mut self) {
        self.pending_response = None;
        self.feedback = Feedback::None;

        let has_next = self.trial_index + 1 < TOTAL_TRIALS;
        self.trial_index += 1;
        self.phase = Phase::after_resolution(has_next);

        if self.phase.is_finished() {
            info!(
                score = self.score,
                correct = self.history.iter().filter(|r| r.is_correct).count(),
                "session finished"
            );
        } else {
            debug!(trial = self.trial_index, "next trial");
        }
        self.notify();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let mut observers = std::mem::take(&mut self.observers);
        {
            let view = self.view();
            for observer in observers.iter_mut() {
                observer.on_change(&view);
            }
        }
        self.observers = observers;
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            trial_index: self.trial_index,
            total_trials: TOTAL_TRIALS,
            current_item: self.current_item(),
            score: self.score,
            feedback: self.feedback,
            phase: self.phase,
            pending_response: self.pending_response,
            history: &self.history,
        }
    }

    pub fn trial_index(&self) -> usize {
        self.trial_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn pending_response(&self) -> Option<Side> {
        self.pending_response
    }

    /// Responses so far, in trial order
    pub fn history(&self) -> &[ResponseRecord] {
        &self.history
    }

    /// Stimulus awaiting (or just given) a response; `None` once finished
    pub fn current_item(&self) -> Option<&'static StimulusItem> {
        catalog_item(self.trial_index)
    }

    pub fn is_transition_pending(&self) -> bool {
        self.transition.is_pending()
    }

    /// Time until the pending transition is due, if one is pending
    pub fn time_to_transition(&self) -> Option<std::time::Duration> {
        self.transition.remaining(self.timer.now())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortex_core::Context;
    use sortex_timing::ManualTimer;
    use std::time::Duration;

    fn session() -> (SessionController<ManualTimer>, ManualTimer) {
        let clock = ManualTimer::new();
        let ctrl = SessionController::new(SessionConfig::default(), clock.clone());
        (ctrl, clock)
    }

    #[test]
    fn correct_first_pick_scores() {
        let (mut s, _) = session();
        assert_eq!(s.current_item().map(|i| i.name), Some("dog"));

        let record = s.choose_side(Side::Left).expect("accepted");
        assert!(record.is_correct);
        assert_eq!(record.context, Context::First);
        assert_eq!(s.score(), 25);
        assert_eq!(s.phase(), Phase::Resolved);
        assert_eq!(s.feedback(), Feedback::Correct);
        assert_eq!(s.history().len(), s.trial_index() + 1);
    }

    #[test]
    fn wrong_first_pick_scores_nothing() {
        let (mut s, _) = session();
        let record = s.choose_side(Side::Right).expect("accepted");
        assert!(!record.is_correct);
        assert_eq!(s.score(), 0);
        assert_eq!(s.feedback(), Feedback::Incorrect);
    }

    #[test]
    fn second_pick_while_resolved_is_ignored() {
        let (mut s, _) = session();
        s.choose_side(Side::Left);
        assert!(s.choose_side(Side::Right).is_none());
        assert!(!s.handle_event(SessionEvent::SideChosen(Side::Left)));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.score(), 25);
        assert_eq!(s.trial_index(), 0);
    }

    #[test]
    fn advances_only_after_delay() {
        let (mut s, clock) = session();
        s.choose_side(Side::Left);

        clock.advance(Duration::from_millis(999));
        assert!(!s.tick());
        assert_eq!(s.phase(), Phase::Resolved);

        clock.advance(Duration::from_millis(1));
        assert!(s.tick());
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.trial_index(), 1);
        assert_eq!(s.feedback(), Feedback::None);
        assert_eq!(s.pending_response(), None);
        assert_eq!(s.history().len(), s.trial_index());
    }

    #[test]
    fn reset_cancels_pending_transition() {
        let (mut s, clock) = session();
        s.choose_side(Side::Left);
        assert!(s.is_transition_pending());

        s.reset();
        assert!(!s.is_transition_pending());

        clock.advance(Duration::from_secs(5));
        assert!(!s.tick());
        assert_eq!(s.trial_index(), 0);
        assert_eq!(s.phase(), Phase::Active);
        assert!(s.history().is_empty());
    }

    #[test]
    fn late_transition_from_previous_epoch_is_dropped() {
        let (mut s, clock) = session();
        s.choose_side(Side::Left);
        clock.advance(Duration::from_secs(1));
        let due = s.update();
        assert_eq!(due.len(), 1);
        assert!(matches!(due[0], SessionEvent::TransitionDue { epoch: 0, .. }));

        // reset lands between delivery and application
        s.reset();
        s.choose_side(Side::Right);
        for event in due {
            assert!(!s.handle_event(event));
        }
        assert_eq!(s.phase(), Phase::Resolved);
        assert_eq!(s.trial_index(), 0);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn finishing_moves_index_past_last_trial() {
        let (mut s, clock) = session();
        for trial in 0..TOTAL_TRIALS {
            let item = s.current_item().copied().expect("item");
            s.choose_side(correct_side(&item, trial));
            clock.advance(Duration::from_secs(1));
            s.tick();
        }
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.trial_index(), TOTAL_TRIALS);
        assert_eq!(s.history().len(), TOTAL_TRIALS);
        assert!(s.current_item().is_none());
        assert!(s.choose_side(Side::Left).is_none());
    }
}
