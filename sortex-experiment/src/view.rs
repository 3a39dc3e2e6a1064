use sortex_core::{Context, Feedback, Phase, ResponseRecord, Side, StimulusItem};

/// Read-only snapshot of a session, handed to renderers. The response
/// history stays hidden until the session finishes, see
/// [`results`](Self::results).
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub trial_index: usize,
    pub total_trials: usize,
    pub current_item: Option<&'static StimulusItem>,
    pub score: u32,
    pub feedback: Feedback,
    pub phase: Phase,
    pub pending_response: Option<Side>,
    pub(crate) history: &'a [ResponseRecord],
}

impl SessionView<'_> {
    /// 1-based trial number for "Trial n of N", capped at the last trial
    pub fn trial_number(&self) -> usize {
        (self.trial_index + 1).min(self.total_trials)
    }

    /// Buckets use the first-context colours until the midpoint
    pub fn is_first_context_styled(&self) -> bool {
        self.trial_index < Context::SWITCH_POINT
    }

    /// Side the current item should drop toward while its feedback is shown
    pub fn animate_toward(&self) -> Option<Side> {
        if self.phase.is_resolved() && self.feedback.is_visible() {
            self.pending_response
        } else {
            None
        }
    }

    pub fn inputs_enabled(&self) -> bool {
        self.phase.allows_input()
    }

    pub fn feedback_text(&self) -> &'static str {
        self.feedback.text()
    }

    /// Full history, only once the session has finished
    pub fn results(&self) -> Option<&[ResponseRecord]> {
        self.phase.is_finished().then_some(self.history)
    }
}

/// Gets told about every session change
pub trait SessionObserver {
    fn on_change(&mut self, view: &SessionView<'_>);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionView<'_>),
{
    fn on_change(&mut self, view: &SessionView<'_>) {
        self(view)
    }
}
