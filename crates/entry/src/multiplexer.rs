// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reply multiplexer: routes reply envelopes arriving on the shared
//! broker queue to the in-flight HTTP handler waiting on the matching
//! `correlation_id`.
//!
//! One mapping, guarded by a mutex; the broker reader task is the sole
//! producer, each waiter the sole consumer for its own key. Consumption
//! from the broker never blocks on a waiter: `deliver` only ever takes
//! the lock long enough to either hand off through a oneshot channel or
//! buffer the envelope.

use lambda_common::{CorrelationId, ReplyEnvelope};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// How long an unclaimed buffered envelope is kept before being dropped
/// by [`ReplyMultiplexer::sweep`]. Generous relative to the per-call
/// dispatch deadline so a buffered reply always outlives the waiter that
/// should have claimed it.
pub const BUFFER_GRACE_PERIOD: Duration = Duration::from_secs(120);

enum Slot {
    Buffered(ReplyEnvelope, Instant),
    Waiting(oneshot::Sender<ReplyEnvelope>),
}

#[derive(Default)]
pub struct ReplyMultiplexer {
    slots: Mutex<HashMap<CorrelationId, Slot>>,
}

impl ReplyMultiplexer {
    /// Wait for the reply matching `id`, up to `deadline`. Returns `None`
    /// on timeout or if the multiplexer is torn down first; the waiter
    /// entry is removed either way so a later reply is simply discarded.
    pub async fn wait_for(&self, id: CorrelationId, deadline: Duration) -> Option<ReplyEnvelope> {
        let rx = {
            let mut slots = self.slots.lock();
            match slots.remove(&id) {
                Some(Slot::Buffered(envelope, _)) => return Some(envelope),
                Some(Slot::Waiting(_)) => {
                    // Two waiters for the same correlation id can't happen —
                    // ids are minted fresh per dispatch — but don't panic on
                    // a logic bug; just lose the race gracefully.
                    tracing::error!(correlation_id = %id, "duplicate waiter registered for correlation id");
                    return None;
                }
                None => {
                    let (tx, rx) = oneshot::channel();
                    slots.insert(id, Slot::Waiting(tx));
                    rx
                }
            }
        };

        match tokio::time::timeout(deadline, rx).await {
            Ok(Ok(envelope)) => Some(envelope),
            Ok(Err(_)) => None,
            Err(_) => {
                self.slots.lock().remove(&id);
                None
            }
        }
    }

    /// Hand a freshly-received envelope to its waiter, or buffer it if
    /// none is registered yet.
    pub fn deliver(&self, envelope: ReplyEnvelope) {
        let mut slots = self.slots.lock();
        match slots.remove(&envelope.correlation_id) {
            Some(Slot::Waiting(tx)) => {
                let _ = tx.send(envelope);
            }
            Some(Slot::Buffered(first, inserted_at)) => {
                tracing::warn!(correlation_id = %envelope.correlation_id, "duplicate reply envelope, keeping the first");
                slots.insert(envelope.correlation_id, Slot::Buffered(first, inserted_at));
            }
            None => {
                let id = envelope.correlation_id;
                slots.insert(id, Slot::Buffered(envelope, Instant::now()));
            }
        }
    }

    /// Evict buffered envelopes older than [`BUFFER_GRACE_PERIOD`] that no
    /// waiter ever claimed (the waiter's own deadline fired first).
    pub fn sweep(&self) {
        let mut slots = self.slots.lock();
        slots.retain(|_, slot| match slot {
            Slot::Buffered(_, inserted_at) => inserted_at.elapsed() < BUFFER_GRACE_PERIOD,
            Slot::Waiting(_) => true,
        });
    }
}

#[cfg(test)]
#[path = "multiplexer_tests.rs"]
mod tests;
