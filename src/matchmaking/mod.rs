pub mod matcher;
pub mod pool;
pub mod timeout;

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::events::{ChatMessage, ChatResponse, Envelope, FindRequest, LeaveChat, ServerReady, Status};
use crate::profile::ConnectionId;
use crate::registry::{ClientSender, ConnectionRegistry};
use crate::rooms::RoomMap;
use pool::WaitingPool;

/// The matchmaking core. Owns all shared state (connection registry,
/// waiting pool, room map) behind one lock; client events and timer
/// firings alike are serialized through it.
pub struct Matchmaker {
    pub(crate) config: Arc<ServerConfig>,
    state: Mutex<CoreState>,
}

struct CoreState {
    registry: ConnectionRegistry,
    pool: WaitingPool,
    rooms: RoomMap,
}

impl Matchmaker {
    pub fn new(config: Arc<ServerConfig>) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: Mutex::new(CoreState {
                registry: ConnectionRegistry::default(),
                pool: WaitingPool::default(),
                rooms: RoomMap::default(),
            }),
        })
    }

    pub async fn connect(&self, connection_id: ConnectionId, sender: ClientSender) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.registry.register(connection_id, sender);
        info!("connected: {connection_id} ({} online)", state.registry.len());
        state
            .registry
            .emit(connection_id, "server_ready", &ServerReady::new(&self.config))
    }

    /// Route one inbound frame. Malformed payloads are dropped with a warn,
    /// never an error; only plumbing failures bubble up.
    pub async fn dispatch(self: &Arc<Self>, connection_id: ConnectionId, envelope: Envelope) -> anyhow::Result<()> {
        match envelope.event.as_str() {
            "find" => {
                let request = if envelope.data.is_null() {
                    FindRequest::default()
                } else {
                    match serde_json::from_value(envelope.data) {
                        Ok(request) => request,
                        Err(e) => {
                            warn!("malformed find from {connection_id}: {e}");
                            return Ok(());
                        }
                    }
                };
                self.find(connection_id, request).await
            }
            "cancel_search" => self.cancel_search(connection_id).await,
            "chat_message" => match serde_json::from_value::<ChatMessage>(envelope.data) {
                Ok(message) => self.chat_message(connection_id, message).await,
                Err(e) => {
                    warn!("malformed chat_message from {connection_id}: {e}");
                    Ok(())
                }
            },
            "leave_chat" => match serde_json::from_value::<LeaveChat>(envelope.data) {
                Ok(LeaveChat { room_id }) => self.leave_chat(connection_id, room_id).await,
                Err(e) => {
                    warn!("malformed leave_chat from {connection_id}: {e}");
                    Ok(())
                }
            },
            other => {
                warn!("unknown event {other:?} from {connection_id}");
                Ok(())
            }
        }
    }

    pub async fn find(self: &Arc<Self>, connection_id: ConnectionId, request: FindRequest) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;

        if state.rooms.contains_member(connection_id) {
            warn!("find from {connection_id} ignored, connection is already in a room");
            return Ok(());
        }

        // A repeated find fully retires the previous entry and its timer
        // before the new search runs.
        if state.pool.remove(connection_id).is_some() {
            debug!("retired previous search for {connection_id}");
        }

        let candidate = request.into_profile(connection_id);
        debug!(
            "find from {connection_id}: {} seeking {:?}",
            candidate.name, candidate.preference
        );

        match matcher::select_partner(&candidate, &state.pool) {
            Some(partner_id) => {
                let Some(partner_entry) = state.pool.remove(partner_id) else {
                    warn!("selected partner {partner_id} vanished from the pool");
                    return Ok(());
                };
                let partner = partner_entry.profile;
                let room_id = state.rooms.create(connection_id, partner.connection_id);
                info!(
                    "matched {connection_id} with {} in room {room_id}",
                    partner.connection_id
                );
                state
                    .registry
                    .emit(connection_id, "status", &Status::matched(room_id, partner.safe()))?;
                state
                    .registry
                    .emit(partner.connection_id, "status", &Status::matched(room_id, candidate.safe()))?;
            }
            None => {
                let preference = candidate.preference;
                let ticket = state.pool.insert(candidate);
                let task = tokio::spawn(timeout::supervise(Arc::clone(self), connection_id, ticket));
                state.pool.arm(connection_id, task.abort_handle());
                state.registry.emit(
                    connection_id,
                    "status",
                    &Status::searching(timeout::rotating_message(preference, 0)),
                )?;
            }
        }
        Ok(())
    }

    pub async fn cancel_search(&self, connection_id: ConnectionId) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        let message = if state.pool.remove(connection_id).is_some() {
            info!("search cancelled by {connection_id}");
            "Search cancelled."
        } else {
            debug!("cancel_search from {connection_id} with no active search");
            "No active search."
        };
        state
            .registry
            .emit(connection_id, "status", &Status::cancelled(message))
    }

    /// Partner-only delivery: the sender's client renders its own message
    /// locally, so nothing is echoed back.
    pub async fn chat_message(&self, connection_id: ConnectionId, message: ChatMessage) -> anyhow::Result<()> {
        let state = self.state.lock().await;
        let partner = state
            .rooms
            .get(message.room_id)
            .and_then(|room| room.other(connection_id));
        let Some(partner) = partner else {
            warn!(
                "{connection_id} sent a message to room {} it is not in",
                message.room_id
            );
            return Ok(());
        };
        debug!("{connection_id} -> {partner} in room {}", message.room_id);
        state
            .registry
            .emit(partner, "chat_response", &ChatResponse::chatting(connection_id, message))
    }

    pub async fn leave_chat(&self, connection_id: ConnectionId, room_id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        let is_member = state
            .rooms
            .get(room_id)
            .is_some_and(|room| room.contains(connection_id));
        if !is_member {
            debug!("leave_chat from {connection_id} ignored, not a member of {room_id}");
            return Ok(());
        }
        let Some(room) = state.rooms.remove(room_id) else {
            return Ok(());
        };
        info!("{connection_id} left room {room_id}");
        if let Some(other) = room.other(connection_id) {
            state
                .registry
                .emit(other, "chat_response", &ChatResponse::partner_left(room_id))?;
        }
        Ok(())
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.registry.unregister(connection_id);
        if state.pool.remove(connection_id).is_some() {
            debug!("cleared queued search for disconnected {connection_id}");
        }
        if let Some(room) = state.rooms.remove_by_member(connection_id) {
            info!("room {} closed, {connection_id} disconnected", room.id);
            if let Some(other) = room.other(connection_id) {
                state
                    .registry
                    .emit(other, "chat_response", &ChatResponse::partner_disconnected(room.id))?;
            }
        }
        info!("disconnected: {connection_id}");
        Ok(())
    }

    /// Supervisor tick. Returns false once the entry this timer was armed
    /// for is no longer queued, which stops the task.
    pub(crate) async fn searching_heartbeat(
        &self,
        connection_id: ConnectionId,
        ticket: u64,
        index: usize,
    ) -> bool {
        let state = self.state.lock().await;
        let Some(entry) = state.pool.get(connection_id) else {
            return false;
        };
        if entry.ticket != ticket {
            return false;
        }
        let message = timeout::rotating_message(entry.profile.preference, index);
        if let Err(e) = state
            .registry
            .emit(connection_id, "status", &Status::searching(message))
        {
            warn!("heartbeat emit failed for {connection_id}: {e:#}");
        }
        true
    }

    /// Supervisor deadline. A firing that lost the race to any removal path
    /// finds a missing or re-ticketed entry and does nothing.
    pub(crate) async fn expire(&self, connection_id: ConnectionId, ticket: u64) {
        let mut state = self.state.lock().await;
        if state.pool.ticket_of(connection_id) != Some(ticket) {
            return;
        }
        // remove() aborts our own handle; cancellation only lands at an
        // await point and none remain before this task returns.
        let Some(entry) = state.pool.remove(connection_id) else {
            return;
        };
        let message = timeout::timeout_message(entry.profile.preference);
        info!("search timeout for {connection_id}");
        if let Err(e) = state
            .registry
            .emit(connection_id, "status", &Status::timeout(message))
        {
            warn!("timeout emit failed for {connection_id}: {e:#}");
        }
    }

    /// True while `connection_id` is queued in the waiting pool.
    pub async fn is_searching(&self, connection_id: ConnectionId) -> bool {
        self.state.lock().await.pool.contains(connection_id)
    }

    /// Room currently containing `connection_id`, if any.
    pub async fn room_of(&self, connection_id: ConnectionId) -> Option<Uuid> {
        let state = self.state.lock().await;
        state
            .rooms
            .get_by_member(connection_id)
            .map(|room| room.id)
    }
}
