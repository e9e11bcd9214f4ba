use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::events;
use crate::profile::ConnectionId;

pub type ClientSender = mpsc::UnboundedSender<String>;

/// Live connections, keyed by connection id. A missing or dead handle means
/// the peer is gone; delivery to it is silently skipped.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ClientSender>,
}

impl ConnectionRegistry {
    pub fn register(&mut self, connection_id: ConnectionId, sender: ClientSender) {
        self.connections.insert(connection_id, sender);
    }

    pub fn unregister(&mut self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
    }

    pub fn resolve(&self, connection_id: ConnectionId) -> Option<&ClientSender> {
        self.connections.get(&connection_id)
    }

    /// Serialize `(event, data)` into a frame and hand it to one connection.
    pub fn emit(
        &self,
        connection_id: ConnectionId,
        event: &str,
        data: &impl Serialize,
    ) -> anyhow::Result<()> {
        let Some(sender) = self.resolve(connection_id) else {
            trace!("emit {event} skipped, {connection_id} is gone");
            return Ok(());
        };
        let frame = events::frame(event, data)?;
        if sender.send(frame).is_err() {
            debug!("emit {event} dropped, {connection_id} closed its channel");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
