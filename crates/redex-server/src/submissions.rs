//! Simulated form submission: a validated form is accepted immediately and
//! flips to submitted after a fixed delay, on a timer that dies with its
//! ticket.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use redex_core::{FormErrors, FormState};

/// A one-shot timer running on the tokio runtime. Dropping the handle
/// aborts the timer if it has not fired yet.
pub struct DelayedTask {
    handle: JoinHandle<()>,
}

impl DelayedTask {
    pub fn spawn<F>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        });
        Self { handle }
    }

    /// Stop the timer. No-op if it already fired.
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Entry<T> {
    state: FormState<T>,
    created: Instant,
    timer: Option<DelayedTask>,
}

/// What a client sees when it polls a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatus<T> {
    pub ticket: Uuid,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<T>,
}

/// Pending and completed submissions of one form kind, keyed by ticket.
pub struct Submissions<T> {
    kind: &'static str,
    delay: Duration,
    entries: Arc<DashMap<Uuid, Entry<T>>>,
}

impl<T> Submissions<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(kind: &'static str, delay: Duration) -> Self {
        Self {
            kind,
            delay,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Accept a validation outcome. Valid input gets a ticket and starts the
    /// delay; invalid input is handed back untouched.
    pub fn submit(&self, validated: Result<T, FormErrors>) -> Result<Uuid, FormErrors> {
        let value = validated?;

        let ticket = Uuid::new_v4();
        self.entries.insert(
            ticket,
            Entry {
                state: FormState::Submitting,
                created: Instant::now(),
                timer: None,
            },
        );

        let entries = self.entries.clone();
        let kind = self.kind;
        let timer = DelayedTask::spawn(self.delay, move || {
            if let Some(mut entry) = entries.get_mut(&ticket) {
                match entry.state.complete(value) {
                    Ok(()) => tracing::info!("{} {} submitted", kind, ticket),
                    Err(e) => tracing::warn!("{} {} not completed: {}", kind, ticket, e),
                }
            }
        });

        if let Some(mut entry) = self.entries.get_mut(&ticket) {
            entry.timer = Some(timer);
        }

        tracing::info!("{} {} accepted, confirming in {:?}", self.kind, ticket, self.delay);
        Ok(ticket)
    }

    pub fn status(&self, ticket: Uuid) -> Option<SubmissionStatus<T>> {
        self.entries.get(&ticket).map(|entry| SubmissionStatus {
            ticket,
            status: entry.state.name(),
            confirmation: match &entry.state {
                FormState::Submitted(value) => Some(value.clone()),
                _ => None,
            },
        })
    }

    /// Dismiss a ticket. A submission still in its delay never completes.
    /// Returns the state the ticket was in, or None if unknown.
    pub fn cancel(&self, ticket: Uuid) -> Option<&'static str> {
        let (_, entry) = self.entries.remove(&ticket)?;
        let state = entry.state.name();
        if let Some(timer) = entry.timer {
            timer.cancel();
        }
        if state == "submitting" {
            tracing::info!("{} {} cancelled before confirmation", self.kind, ticket);
        }
        Some(state)
    }

    /// Drop tickets older than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.created) < max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
