use std::time::Instant;

use tokio::task::AbortHandle;

use crate::profile::{ClientProfile, ConnectionId};

pub struct PoolEntry {
    pub profile: ClientProfile,
    pub enqueued_at: Instant,
    pub ticket: u64,
    timer: Option<AbortHandle>,
}

/// Clients currently searching for a partner, in insertion order.
///
/// Each entry owns the abort handle of its timeout supervisor; leaving the
/// pool on any path aborts it, so a handle never outlives its entry.
#[derive(Default)]
pub struct WaitingPool {
    entries: Vec<PoolEntry>,
    next_ticket: u64,
}

impl WaitingPool {
    /// Returns the ticket identifying this stay in the pool. The supervisor
    /// task is spawned after insertion and attached with [`WaitingPool::arm`].
    pub fn insert(&mut self, profile: ClientProfile) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.entries.push(PoolEntry {
            profile,
            enqueued_at: Instant::now(),
            ticket,
            timer: None,
        });
        ticket
    }

    pub fn arm(&mut self, connection_id: ConnectionId, timer: AbortHandle) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.profile.connection_id == connection_id)
        {
            entry.timer = Some(timer);
        }
    }

    /// Removes the entry for `connection_id` and aborts its timer.
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<PoolEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.profile.connection_id == connection_id)?;
        let entry = self.entries.remove(index);
        if let Some(timer) = &entry.timer {
            timer.abort();
        }
        Some(entry)
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.get(connection_id).is_some()
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&PoolEntry> {
        self.entries
            .iter()
            .find(|e| e.profile.connection_id == connection_id)
    }

    /// Ticket of the live entry for `connection_id`, if it is still queued.
    pub fn ticket_of(&self, connection_id: ConnectionId) -> Option<u64> {
        self.get(connection_id).map(|e| e.ticket)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
