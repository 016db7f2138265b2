//! # Story Generator Boundary
//!
//! The orchestrator talks to story generation through the [`StoryGenerator`]
//! trait so that tests can substitute a canned generator and the production
//! wiring can plug in the OpenAI-backed one.

pub mod openai;

pub use openai::OpenAiStoryGenerator;

use async_trait::async_trait;

use crate::domain::models::profile::ChildProfile;
use crate::domain::models::story::GeneratedStory;

/// Character sheet handed to the generator for one child.
///
/// A flattened view of [`ChildProfile`] carrying only what the prompt needs.
#[derive(Debug, Clone)]
pub struct ProfileDescriptor {
    pub name: String,
    pub gender: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub special_traits: Option<String>,
    pub favorite_thing: Option<String>,
}

impl ProfileDescriptor {
    pub fn from_profile(profile: &ChildProfile) -> Self {
        let appearance = profile.appearance.as_ref();
        Self {
            name: profile.name.clone(),
            gender: profile.gender.map(|g| g.as_str().to_string()),
            hair_color: appearance.and_then(|a| a.hair_color.clone()),
            eye_color: appearance.and_then(|a| a.eye_color.clone()),
            special_traits: profile.special_traits.clone(),
            favorite_thing: profile.favorite_thing.clone(),
        }
    }
}

/// Narrative parameters collected by the book wizard.
#[derive(Debug, Clone)]
pub struct StoryParams {
    pub theme: String,
    pub qualities: Vec<String>,
    pub magical_details: String,
    pub special_memories: String,
    pub narrative_style: String,
}

/// Failures from the story-generation boundary.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("story generator API key not configured")]
    MissingCredentials,

    #[error("story generator request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("story generator returned no content")]
    EmptyResponse,

    #[error("unable to parse story returned by the generator: {0}")]
    Parse(String),

    #[error("generator returned an invalid story: {0}")]
    InvalidStory(String),
}

/// External collaborator that turns profiles and narrative parameters into a
/// structured story. The call is synchronous from the caller's point of view
/// and may take tens of seconds.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(
        &self,
        profiles: &[ProfileDescriptor],
        params: &StoryParams,
    ) -> Result<GeneratedStory, GenerationError>;
}
