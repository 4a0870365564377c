//! Sequenced fetches and the background poll loop.
//!
//! Every fetch takes a [`Ticket`] from the view's [`Sequencer`] before it is
//! sent. When the response arrives it is applied through
//! [`Sequenced::apply`], which drops it if a newer ticket has already been
//! applied. A slow poll can therefore never overwrite the re-fetch that
//! followed a user action.

use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use serde::Serialize;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Ticket(pub u64);

/// Monotonic request ids for one view.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// A fetched value plus the ticket it was fetched under.
#[derive(Debug, Clone)]
pub struct Sequenced<T> {
    value: Option<T>,
    applied: u64,
}

impl<T> Default for Sequenced<T> {
    fn default() -> Self {
        Self {
            value: None,
            applied: 0,
        }
    }
}

impl<T> Sequenced<T> {
    /// Stores `value` unless a response with a newer ticket is already in
    /// place. Returns whether the value was stored.
    pub fn apply(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(
                ticket = ticket.0,
                applied = self.applied,
                "discarding stale response"
            );
            return false;
        }
        self.value = Some(value);
        self.applied = ticket.0;
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.applied
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

/// Runs `tick` every `period` until `shutdown` fires. Missed ticks are
/// skipped rather than replayed; a failed tick is logged and the view keeps
/// whatever it rendered last.
pub fn spawn_poller<F, Fut>(
    name: &'static str,
    period: Duration,
    shutdown: CancellationToken,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = AppResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(poller = name, period_ms = period.as_millis() as u64, "poller started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(err) = tick().await {
                        tracing::warn!(poller = name, error = %err, "poll failed, keeping last state");
                    }
                }
            }
        }

        tracing::info!(poller = name, "poller stopped");
    })
}
