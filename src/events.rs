use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::profile::{ClientProfile, ConnectionId, Gender, Preference, SafeProfile};

/// Wire framing, both directions: `{"event": "...", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

pub fn frame(event: &str, data: &impl Serialize) -> anyhow::Result<String> {
    let data = serde_json::to_value(data)?;
    Ok(serde_json::to_string(&serde_json::json!({ "event": event, "data": data }))?)
}

// ---------------- inbound ----------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub preference: Option<String>,
}

impl FindRequest {
    pub fn into_profile(self, connection_id: ConnectionId) -> ClientProfile {
        let gender = self
            .gender
            .as_deref()
            .and_then(Gender::parse)
            .unwrap_or(Gender::Male);
        ClientProfile {
            connection_id,
            user_id: self.user_id.unwrap_or_else(|| connection_id.to_string()),
            name: self.name.unwrap_or_else(|| "Anonymous".to_owned()),
            gender,
            preference: Preference::parse(self.preference.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub room_id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub time: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveChat {
    pub room_id: Uuid,
}

// ---------------- outbound ----------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerReady<'a> {
    pub state: &'a str,
    pub version: &'a str,
    pub reward: u32,
    pub preference_cost: u32,
    pub maintenance: &'a str,
    pub url: &'a str,
}

impl<'a> ServerReady<'a> {
    pub fn new(config: &'a ServerConfig) -> Self {
        Self {
            state: "ready",
            version: env!("CARGO_PKG_VERSION"),
            reward: config.reward,
            preference_cost: config.preference_cost,
            maintenance: &config.maintenance,
            url: &config.app_url,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Searching,
    Matched,
    Timeout,
    Cancelled,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub state: SearchState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<SafeProfile>,
}

impl Status {
    pub fn searching(message: &str) -> Self {
        Self {
            state: SearchState::Searching,
            message: Some(message.to_owned()),
            room_id: None,
            partner: None,
        }
    }

    pub fn matched(room_id: Uuid, partner: SafeProfile) -> Self {
        Self {
            state: SearchState::Matched,
            message: None,
            room_id: Some(room_id),
            partner: Some(partner),
        }
    }

    pub fn timeout(message: &str) -> Self {
        Self {
            state: SearchState::Timeout,
            message: Some(message.to_owned()),
            room_id: None,
            partner: None,
        }
    }

    pub fn cancelled(message: &str) -> Self {
        Self {
            state: SearchState::Cancelled,
            message: Some(message.to_owned()),
            room_id: None,
            partner: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    Chatting,
    PartnerLeft,
    PartnerDisconnected,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub status: ChatStatus,
    pub room_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ConnectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
}

impl ChatResponse {
    pub fn chatting(sender: ConnectionId, msg: ChatMessage) -> Self {
        Self {
            status: ChatStatus::Chatting,
            room_id: msg.room_id,
            from: Some(sender),
            name: msg.name,
            gender: msg.gender,
            kind: Some(msg.kind),
            message: msg.message,
            time: msg.time,
        }
    }

    pub fn partner_left(room_id: Uuid) -> Self {
        Self {
            status: ChatStatus::PartnerLeft,
            room_id,
            from: None,
            name: None,
            gender: None,
            kind: None,
            message: "Your partner left the chat.".to_owned(),
            time: None,
        }
    }

    pub fn partner_disconnected(room_id: Uuid) -> Self {
        Self {
            status: ChatStatus::PartnerDisconnected,
            room_id,
            from: None,
            name: None,
            gender: None,
            kind: None,
            message: "Your partner disconnected.".to_owned(),
            time: None,
        }
    }
}
