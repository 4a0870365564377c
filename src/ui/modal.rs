//! Modal dialogs as an explicit state machine.
//!
//! `Hidden → Opening → Open → Closing → Hidden`. Opening and Closing last for
//! the fade duration; [`Modal::tick`] settles them once it has elapsed, or the
//! owner can call [`Modal::settle`] directly. A new request always wins over
//! one in flight: opening a closing modal reverses it, closing an opening one
//! starts the fade-out.

use std::time::{Duration, Instant};

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModalPhase {
    #[default]
    Hidden,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: ModalPhase,
    pub to: ModalPhase,
}

#[derive(Debug, Clone)]
pub struct Modal {
    phase: ModalPhase,
    fade: Duration,
    changed_at: Option<Instant>,
}

impl Default for Modal {
    fn default() -> Self {
        Self::new(DEFAULT_FADE)
    }
}

impl Modal {
    pub fn new(fade: Duration) -> Self {
        Self {
            phase: ModalPhase::Hidden,
            fade,
            changed_at: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != ModalPhase::Hidden
    }

    pub fn open(&mut self, now: Instant) -> Option<Transition> {
        match self.phase {
            ModalPhase::Hidden | ModalPhase::Closing => self.move_to(ModalPhase::Opening, now),
            ModalPhase::Opening | ModalPhase::Open => None,
        }
    }

    pub fn close(&mut self, now: Instant) -> Option<Transition> {
        match self.phase {
            ModalPhase::Open | ModalPhase::Opening => self.move_to(ModalPhase::Closing, now),
            ModalPhase::Hidden | ModalPhase::Closing => None,
        }
    }

    /// Ends a running fade at `now` without waiting for it.
    pub fn settle(&mut self, now: Instant) -> Option<Transition> {
        match self.phase {
            ModalPhase::Opening => self.move_to(ModalPhase::Open, now),
            ModalPhase::Closing => self.move_to(ModalPhase::Hidden, now),
            ModalPhase::Hidden | ModalPhase::Open => None,
        }
    }

    /// Settles the fade if it has run for its full duration by `now`.
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let started = self.changed_at?;
        let fading = matches!(self.phase, ModalPhase::Opening | ModalPhase::Closing);
        if fading && now.saturating_duration_since(started) >= self.fade {
            let to = match self.phase {
                ModalPhase::Opening => ModalPhase::Open,
                _ => ModalPhase::Hidden,
            };
            return self.move_to(to, now);
        }
        None
    }

    fn move_to(&mut self, to: ModalPhase, now: Instant) -> Option<Transition> {
        let from = self.phase;
        self.phase = to;
        self.changed_at = Some(now);
        tracing::trace!(?from, ?to, "modal transition");
        Some(Transition { from, to })
    }
}
