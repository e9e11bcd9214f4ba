use serde::Serialize;
use uuid::Uuid;

pub type ConnectionId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Some(Gender::Male),
            "F" | "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Preference {
    Male,
    Female,
    Any,
}

impl Preference {
    /// Anything unrecognized falls back to `Any` instead of refusing the client.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("M") | Some("MALE") => Preference::Male,
            Some("F") | Some("FEMALE") => Preference::Female,
            _ => Preference::Any,
        }
    }

    pub fn is_specific(self) -> bool {
        !matches!(self, Preference::Any)
    }

    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            Preference::Any => true,
            Preference::Male => gender == Gender::Male,
            Preference::Female => gender == Gender::Female,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientProfile {
    pub connection_id: ConnectionId,
    pub user_id: String,
    pub name: String,
    pub gender: Gender,
    pub preference: Preference,
}

/// The subset of a profile the partner is allowed to see.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeProfile {
    pub user_id: String,
    pub name: String,
    pub gender: Gender,
    pub preference: Preference,
}

impl ClientProfile {
    pub fn safe(&self) -> SafeProfile {
        SafeProfile {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            gender: self.gender,
            preference: self.preference,
        }
    }
}
