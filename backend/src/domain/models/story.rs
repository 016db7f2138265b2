use serde::{Deserialize, Serialize};

/// One page of a generated story.
///
/// Serialized with camelCase keys; this is the shape the generator is asked
/// to produce and the shape stored inside a book's `story_content` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    pub page_number: i64,
    pub text: String,
    pub image_description: String,
}

/// A complete story as returned by the Story Generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStory {
    pub title: String,
    pub pages: Vec<StoryPage>,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_prompt: Option<String>,
}

impl GeneratedStory {
    /// Check the structure the generator must deliver: a non-empty title and
    /// at least one page.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("story has no title".to_string());
        }
        if self.pages.is_empty() {
            return Err("story has no pages".to_string());
        }
        Ok(())
    }

    /// Renumber pages 1..N in the order the generator returned them and fix
    /// up `total_pages`. Generator-supplied page numbers are not trusted.
    pub fn normalize(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.page_number = index as i64 + 1;
        }
        self.total_pages = self.pages.len() as i64;
    }
}
