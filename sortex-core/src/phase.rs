use serde::Serialize;

/// Controller phase within one play-through
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for the participant to pick a side
    Active,
    /// Response recorded, feedback visible, advance pending
    Resolved,
    /// All trials resolved. Only a reset leaves this phase.
    Finished,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Active
    }
}

impl Phase {
    pub fn allows_input(&self) -> bool {
        matches!(self, Phase::Active)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Phase::Resolved)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Finished)
    }

    /// Phase entered once the pending transition of a resolved trial fires.
    /// `has_next_trial` is whether another trial follows the resolved one.
    pub fn after_resolution(has_next_trial: bool) -> Self {
        if has_next_trial {
            Phase::Active
        } else {
            Phase::Finished
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Active => "active",
            Phase::Resolved => "resolved",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}
