use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::profile::ConnectionId;

pub struct Room {
    pub id: Uuid,
    pub members: [ConnectionId; 2],
    pub created_at: Instant,
}

impl Room {
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.members.contains(&connection_id)
    }

    /// The member that is not `connection_id`.
    pub fn other(&self, connection_id: ConnectionId) -> Option<ConnectionId> {
        match self.members {
            [a, b] if a == connection_id => Some(b),
            [a, b] if b == connection_id => Some(a),
            _ => None,
        }
    }
}

/// All active two-party rooms. A connection is a member of at most one room.
#[derive(Default)]
pub struct RoomMap {
    rooms: HashMap<Uuid, Room>,
}

impl RoomMap {
    pub fn create(&mut self, a: ConnectionId, b: ConnectionId) -> Uuid {
        let id = Uuid::now_v7();
        self.rooms.insert(
            id,
            Room {
                id,
                members: [a, b],
                created_at: Instant::now(),
            },
        );
        id
    }

    pub fn get(&self, room_id: Uuid) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    pub fn remove(&mut self, room_id: Uuid) -> Option<Room> {
        self.rooms.remove(&room_id)
    }

    /// Tear out the room containing `connection_id`, if any.
    pub fn remove_by_member(&mut self, connection_id: ConnectionId) -> Option<Room> {
        let id = self.get_by_member(connection_id).map(|room| room.id)?;
        self.rooms.remove(&id)
    }

    pub fn get_by_member(&self, connection_id: ConnectionId) -> Option<&Room> {
        self.rooms.values().find(|room| room.contains(connection_id))
    }

    pub fn contains_member(&self, connection_id: ConnectionId) -> bool {
        self.get_by_member(connection_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
