use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain model representing a child profile.
///
/// Every profile belongs to exactly one owner; all reads and writes are
/// scoped to that owner's `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub appearance: Option<Appearance>,
    pub special_traits: Option<String>,
    pub favorite_thing: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChildProfile {
    /// Generate a unique ID for a child profile
    pub fn generate_id() -> String {
        format!("profile::{}", Uuid::new_v4())
    }
}

/// Gender as captured by the profile wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boy,
    Girl,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Boy => "boy",
            Gender::Girl => "girl",
        }
    }

    /// Parse a stored or submitted gender value.
    pub fn parse(value: &str) -> Option<Gender> {
        match value {
            "boy" => Some(Gender::Boy),
            "girl" => Some(Gender::Girl),
            _ => None,
        }
    }
}

/// Appearance details used to describe the child to the illustrator and the
/// story generator. All fields optional.
///
/// Serialized with camelCase keys; the appearance column stores this struct
/// as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_features: Option<String>,
}
