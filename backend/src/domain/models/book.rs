use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::models::profile::ChildProfile;

/// Lifecycle status of a book.
///
/// The set of legal moves lives in [`BookStatus::can_transition`]; services
/// consult it before every status write so that an illegal move (for example
/// `draft` straight to `ready`) is rejected before anything is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    /// Reserved initial state; `create_draft` currently starts at `Creating`.
    Draft,
    /// Accumulating creation parameters through the wizard.
    Creating,
    /// A story-generation call is in flight.
    GeneratingStory,
    /// Story persisted; waiting for every page to get an illustration.
    CreatingPictures,
    /// Parking state for the manual production pipeline; no automatic
    /// outgoing transitions.
    Processing,
    /// Every page has an image reference.
    Ready,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Draft => "draft",
            BookStatus::Creating => "creating",
            BookStatus::GeneratingStory => "generating-story",
            BookStatus::CreatingPictures => "creating-pictures",
            BookStatus::Processing => "processing",
            BookStatus::Ready => "ready",
        }
    }

    /// Parse a stored status value.
    pub fn parse(value: &str) -> Option<BookStatus> {
        match value {
            "draft" => Some(BookStatus::Draft),
            "creating" => Some(BookStatus::Creating),
            "generating-story" => Some(BookStatus::GeneratingStory),
            "creating-pictures" => Some(BookStatus::CreatingPictures),
            "processing" => Some(BookStatus::Processing),
            "ready" => Some(BookStatus::Ready),
            _ => None,
        }
    }

    /// The transition table: is `self -> to` a legal move?
    ///
    /// `GeneratingStory -> Creating` is the compensating rollback after a
    /// failed generation; `Ready -> CreatingPictures` is the manual
    /// regenerate action. `Processing` has no outgoing transitions.
    pub fn can_transition(&self, to: BookStatus) -> bool {
        matches!(
            (self, to),
            (BookStatus::Draft, BookStatus::Creating)
                | (BookStatus::Creating, BookStatus::GeneratingStory)
                | (BookStatus::GeneratingStory, BookStatus::CreatingPictures)
                | (BookStatus::GeneratingStory, BookStatus::Creating)
                | (BookStatus::CreatingPictures, BookStatus::Ready)
                | (BookStatus::Ready, BookStatus::CreatingPictures)
        )
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a book and its creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: BookStatus,
    pub cover_url: Option<String>,
    pub theme: Option<String>,
    pub qualities: Option<Vec<String>>,
    pub magical_details: Option<String>,
    pub magical_image_url: Option<String>,
    pub special_memories: Option<String>,
    pub special_memories_image_url: Option<String>,
    pub narrative_style: Option<String>,
    /// Serialized `GeneratedStory` once a story has been generated.
    pub story_content: Option<String>,
    /// The exact prompt that produced `story_content`, kept for inspection.
    pub generation_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Generate a unique ID for a book
    pub fn generate_id() -> String {
        format!("book::{}", Uuid::new_v4())
    }

    /// Creation fields still missing before a story can be generated.
    ///
    /// The text fields must be present and non-empty. `qualities` only has
    /// to be present; an empty list is valid and the generator falls back to
    /// its default quality set.
    pub fn missing_creation_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !filled(&self.theme) {
            missing.push("theme");
        }
        if self.qualities.is_none() {
            missing.push("qualities");
        }
        if !filled(&self.magical_details) {
            missing.push("magical_details");
        }
        if !filled(&self.special_memories) {
            missing.push("special_memories");
        }
        if !filled(&self.narrative_style) {
            missing.push("narrative_style");
        }
        missing
    }
}

fn filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// A book together with its linked child profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWithProfiles {
    pub book: Book,
    pub child_profiles: Vec<ChildProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_fields() -> Book {
        Book {
            id: Book::generate_id(),
            user_id: "user-1".to_string(),
            title: "My Book".to_string(),
            status: BookStatus::Creating,
            cover_url: None,
            theme: Some("space adventure".to_string()),
            qualities: Some(vec!["bravery".to_string()]),
            magical_details: Some("a talking comet".to_string()),
            magical_image_url: None,
            special_memories: Some("first day of school".to_string()),
            special_memories_image_url: None,
            narrative_style: Some("rhyming".to_string()),
            story_content: None,
            generation_prompt: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookStatus::Draft,
            BookStatus::Creating,
            BookStatus::GeneratingStory,
            BookStatus::CreatingPictures,
            BookStatus::Processing,
            BookStatus::Ready,
        ] {
            assert_eq!(BookStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookStatus::parse("published"), None);
    }

    #[test]
    fn test_transition_table_legal_moves() {
        assert!(BookStatus::Draft.can_transition(BookStatus::Creating));
        assert!(BookStatus::Creating.can_transition(BookStatus::GeneratingStory));
        assert!(BookStatus::GeneratingStory.can_transition(BookStatus::CreatingPictures));
        assert!(BookStatus::GeneratingStory.can_transition(BookStatus::Creating));
        assert!(BookStatus::CreatingPictures.can_transition(BookStatus::Ready));
        assert!(BookStatus::Ready.can_transition(BookStatus::CreatingPictures));
    }

    #[test]
    fn test_transition_table_illegal_moves() {
        // no shortcut from draft to ready
        assert!(!BookStatus::Draft.can_transition(BookStatus::Ready));
        assert!(!BookStatus::Creating.can_transition(BookStatus::Ready));
        assert!(!BookStatus::Creating.can_transition(BookStatus::CreatingPictures));
        // ready never regresses to generation states
        assert!(!BookStatus::Ready.can_transition(BookStatus::Creating));
        assert!(!BookStatus::Ready.can_transition(BookStatus::GeneratingStory));
        // processing is a parking state
        assert!(!BookStatus::Processing.can_transition(BookStatus::Ready));
        assert!(!BookStatus::Processing.can_transition(BookStatus::Creating));
        // self transitions are not moves
        assert!(!BookStatus::Creating.can_transition(BookStatus::Creating));
    }

    #[test]
    fn test_missing_creation_fields_complete() {
        let book = book_with_fields();
        assert!(book.missing_creation_fields().is_empty());
    }

    #[test]
    fn test_missing_creation_fields_empty_qualities_is_valid() {
        let mut book = book_with_fields();
        book.qualities = Some(Vec::new());
        assert!(book.missing_creation_fields().is_empty());
    }

    #[test]
    fn test_missing_creation_fields_reports_each_gap() {
        let mut book = book_with_fields();
        book.theme = None;
        book.qualities = None;
        book.narrative_style = Some("   ".to_string());
        let missing = book.missing_creation_fields();
        assert_eq!(missing, vec!["theme", "qualities", "narrative_style"]);
    }
}
