//! Single-slot, cancellable one-shot transition.
//!
//! A slot holds at most one pending action with a deadline. The host loop
//! polls it with the current time; the action is handed back exactly once,
//! the first time the deadline has been reached. Cancelling bumps the slot
//! generation, so a [`Ticket`] taken before the cancel can be recognised as
//! stale.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Scheduled<A> {
    due_ns: u64,
    ticket: Ticket,
    action: A,
}

#[derive(Debug, Clone)]
pub struct DeferredTransition<A> {
    slot: Option<Scheduled<A>>,
    generation: u64,
}

impl<A> Default for DeferredTransition<A> {
    fn default() -> Self {
        Self {
            slot: None,
            generation: 0,
        }
    }
}

impl<A> DeferredTransition<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the slot. An action already pending is replaced; every earlier
    /// ticket becomes stale.
    pub fn schedule(&mut self, now_ns: u64, delay: Duration, action: A) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
        };
        let delay_ns = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
        self.slot = Some(Scheduled {
            due_ns: now_ns.saturating_add(delay_ns),
            ticket,
            action,
        });
        ticket
    }

    /// Drops the pending action, if any. Returns whether something was dropped.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.slot.take().is_some()
    }

    /// Takes the pending action once its deadline has been reached.
    pub fn poll(&mut self, now_ns: u64) -> Option<(Ticket, A)> {
        match &self.slot {
            Some(s) if now_ns >= s.due_ns => {
                let s = self.slot.take()?;
                Some((s.ticket, s.action))
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether `ticket` still refers to the current generation
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    pub fn remaining(&self, now_ns: u64) -> Option<Duration> {
        self.slot
            .as_ref()
            .map(|s| Duration::from_nanos(s.due_ns.saturating_sub(now_ns)))
    }
}
