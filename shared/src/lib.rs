use serde::{Deserialize, Serialize};

/// A child profile as exposed over the API.
///
/// Dates are RFC 3339 strings; `birthday` is a plain `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    /// "boy" or "girl" when set
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub appearance: Option<Appearance>,
    pub special_traits: Option<String>,
    pub favorite_thing: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Free-form appearance details captured by the profile wizard.
///
/// Serialized with camelCase keys to match the stored appearance JSON.
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

/// Request to create a child profile at the end of the profile wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildProfileRequest {
    pub name: String,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub appearance: Option<Appearance>,
    pub special_traits: Option<String>,
    pub favorite_thing: Option<String>,
    pub avatar_url: Option<String>,
}

/// Request to update a child profile; all fields optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildProfileRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub appearance: Option<Appearance>,
    pub special_traits: Option<String>,
    pub favorite_thing: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfileResponse {
    pub profile: ChildProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfileListResponse {
    pub profiles: Vec<ChildProfile>,
}

/// A book as exposed over the API, including its linked child profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// One of: draft, creating, generating-story, creating-pictures,
    /// processing, ready
    pub status: String,
    pub cover_url: Option<String>,
    pub theme: Option<String>,
    pub qualities: Option<Vec<String>>,
    pub magical_details: Option<String>,
    pub magical_image_url: Option<String>,
    pub special_memories: Option<String>,
    pub special_memories_image_url: Option<String>,
    pub narrative_style: Option<String>,
    /// Serialized `GeneratedStory` JSON once a story has been generated
    pub story_content: Option<String>,
    /// The prompt that produced `story_content`, kept for inspection
    pub generation_prompt: Option<String>,
    pub child_profiles: Vec<ChildProfile>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to create a draft book from the character-selection screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDraftBookRequest {
    pub title: String,
    pub profile_ids: Vec<String>,
}

/// Partial update issued by a single wizard step.
///
/// Only the fields present in the request are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookCreationRequest {
    pub theme: Option<String>,
    pub qualities: Option<Vec<String>>,
    pub magical_details: Option<String>,
    pub magical_image_url: Option<String>,
    pub special_memories: Option<String>,
    pub special_memories_image_url: Option<String>,
    pub narrative_style: Option<String>,
    pub cover_url: Option<String>,
}

/// The complete set of creation parameters accumulated by the book wizard,
/// committed in one request at the end of the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCreationData {
    pub theme: String,
    pub qualities: Vec<String>,
    pub magical_details: String,
    pub magical_image_url: Option<String>,
    pub special_memories: String,
    pub special_memories_image_url: Option<String>,
    pub narrative_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub book: Book,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
}

/// A single page of a generated book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub id: i64,
    pub book_id: String,
    pub page_number: i64,
    pub text_content: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPageListResponse {
    pub pages: Vec<BookPage>,
}

/// Request to attach an illustration reference to a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachPageImageRequest {
    pub image_url: String,
}

/// Response after attaching a page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachPageImageResponse {
    pub success: bool,
    /// True when this attachment completed the book and it became ready
    pub book_ready: bool,
}
