//! OpenAI-backed story generator.
//!
//! Calls the chat-completions API with a prompt describing the characters
//! and narrative parameters, then parses the strict-JSON story the model is
//! instructed to return. Models routinely wrap JSON in markdown fences or
//! stray prose, so the response is cleaned before parsing.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::domain::models::story::GeneratedStory;
use crate::generator::{GenerationError, ProfileDescriptor, StoryGenerator, StoryParams};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a creative children's book author who specializes in educational and magical stories for young children. You create engaging, age-appropriate content that teaches valuable life lessons while entertaining children.";

/// Qualities used when the wizard's quality list is empty.
const DEFAULT_QUALITIES: &str = "kindness, bravery, curiosity";

/// Story generator backed by the OpenAI chat-completions API.
pub struct OpenAiStoryGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiStoryGenerator {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl StoryGenerator for OpenAiStoryGenerator {
    async fn generate(
        &self,
        profiles: &[ProfileDescriptor],
        params: &StoryParams,
    ) -> Result<GeneratedStory, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::MissingCredentials)?;

        let prompt = build_prompt(profiles, params);
        debug!("Story generation prompt:\n{}", prompt);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.8,
            max_tokens: 2000,
        };

        info!("Requesting story from model {}", self.model);
        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatCompletionResponse = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        let mut story = parse_story(&content)?;
        story.generation_prompt = Some(prompt);

        info!(
            "Generated story \"{}\" with {} pages",
            story.title,
            story.pages.len()
        );
        Ok(story)
    }
}

/// Build the user prompt for one generation call.
fn build_prompt(profiles: &[ProfileDescriptor], params: &StoryParams) -> String {
    let character_descriptions = profiles
        .iter()
        .map(describe_character)
        .collect::<Vec<_>>()
        .join("\n");

    let qualities_list = if params.qualities.is_empty() {
        DEFAULT_QUALITIES.to_string()
    } else {
        params.qualities.join(", ")
    };

    let character_names = profiles
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" and ");

    format!(
        r#"Create a magical children's picture book story with the following specifications:

CHARACTERS:
{character_descriptions}

STORY REQUIREMENTS:
- Theme: {theme}
- Focus on these qualities: {qualities_list}
- Magical elements: {magical_details}
- Include these special memories/elements: {special_memories}
- Narrative style: {narrative_style}

BOOK SPECIFICATIONS:
- Target age: 3-8 years old
- Total pages: 18 pages
- Each page should have 1-3 sentences (20-60 words per page)
- Story should be educational, teaching about {qualities_list}
- Include adventure, friendship, and positive messages
- Language should be simple but engaging
- Each page needs a detailed image description for illustration

FORMAT YOUR RESPONSE STRICTLY AS JSON (no markdown, no code fences, no extra text):

{{
  "title": "Story Title",
  "pages": [
    {{
      "pageNumber": 1,
      "text": "Page text content (1-3 sentences, 20-60 words)",
      "imageDescription": "Detailed description of what should be illustrated on this page, including character positions, setting, expressions, and visual details"
    }}
  ],
  "totalPages": 18
}}

STORY GUIDELINES:
- Start with introducing the character(s) in their normal world
- Present a gentle conflict or adventure opportunity
- Show the character(s) using the specified qualities to overcome challenges
- Include the magical elements naturally in the story
- End with a positive resolution and lesson learned
- Make sure each page flows naturally to the next
- Keep vocabulary appropriate for young children
- Include emotional moments that children can relate to

Please ensure the story is engaging, educational, and celebrates the unique qualities of {character_names}."#,
        character_descriptions = character_descriptions,
        theme = params.theme,
        qualities_list = qualities_list,
        magical_details = params.magical_details,
        special_memories = params.special_memories,
        narrative_style = params.narrative_style,
        character_names = character_names,
    )
}

fn describe_character(profile: &ProfileDescriptor) -> String {
    let mut desc = format!(
        "{} ({})",
        profile.name,
        profile.gender.as_deref().unwrap_or("child")
    );

    let mut appearance = Vec::new();
    if let Some(hair) = &profile.hair_color {
        appearance.push(format!("{} hair", hair));
    }
    if let Some(eyes) = &profile.eye_color {
        appearance.push(format!("{} eyes", eyes));
    }
    if !appearance.is_empty() {
        desc.push_str(&format!(" with {}", appearance.join(" and ")));
    }

    if let Some(traits) = &profile.special_traits {
        desc.push_str(&format!(". Special traits: {}", traits));
    }
    if let Some(favorite) = &profile.favorite_thing {
        desc.push_str(&format!(". Loves: {}", favorite));
    }

    desc
}

/// Parse the model's reply into a [`GeneratedStory`].
fn parse_story(content: &str) -> Result<GeneratedStory, GenerationError> {
    let cleaned = clean_model_output(content);

    let story: GeneratedStory = serde_json::from_str(cleaned)
        .map_err(|e| GenerationError::Parse(format!("{} in: {}", e, truncate(cleaned, 200))))?;

    story.validate().map_err(GenerationError::InvalidStory)?;
    Ok(story)
}

/// Strip markdown code fences and any prose around the outermost JSON
/// object.
fn clean_model_output(raw: &str) -> &str {
    let mut s = raw.trim();

    if s.starts_with("```") {
        // drop the opening fence line (``` or ```json)
        s = match s.split_once('\n') {
            Some((_, rest)) => rest,
            None => &s[3..],
        };
        s = s.trim_end();
        if let Some(stripped) = s.strip_suffix("```") {
            s = stripped;
        }
        s = s.trim();
    }

    if let (Some(start), Some(end)) = (s.find('{'), s.rfind('}')) {
        if start < end {
            s = &s[start..=end];
        }
    }

    s
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_STORY_JSON: &str = r#"{
        "title": "Mia and the Moonlit Garden",
        "pages": [
            {"pageNumber": 5, "text": "Mia tiptoed into the garden.", "imageDescription": "A girl at a moonlit garden gate."},
            {"pageNumber": 2, "text": "The flowers began to glow.", "imageDescription": "Glowing flowers around the girl."}
        ],
        "totalPages": 2
    }"#;

    fn descriptor(name: &str) -> ProfileDescriptor {
        ProfileDescriptor {
            name: name.to_string(),
            gender: Some("girl".to_string()),
            hair_color: Some("brown".to_string()),
            eye_color: None,
            special_traits: Some("loves puzzles".to_string()),
            favorite_thing: Some("her red kite".to_string()),
        }
    }

    fn params(qualities: Vec<&str>) -> StoryParams {
        StoryParams {
            theme: "a garden adventure".to_string(),
            qualities: qualities.into_iter().map(|s| s.to_string()).collect(),
            magical_details: "flowers that glow at night".to_string(),
            special_memories: "planting seeds with grandma".to_string(),
            narrative_style: "gentle and rhythmic".to_string(),
        }
    }

    #[test]
    fn test_clean_model_output_passes_plain_json() {
        assert_eq!(clean_model_output(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_clean_model_output_strips_code_fences() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(clean_model_output(raw), "{\"a\": 1}");

        let raw_no_lang = "```\n{\"a\": 1}\n```";
        assert_eq!(clean_model_output(raw_no_lang), "{\"a\": 1}");
    }

    #[test]
    fn test_clean_model_output_extracts_json_from_prose() {
        let raw = "Here is your story:\n{\"a\": 1}\nEnjoy!";
        assert_eq!(clean_model_output(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_story_accepts_fenced_response() {
        let fenced = format!("```json\n{}\n```", SAMPLE_STORY_JSON);
        let story = parse_story(&fenced).unwrap();
        assert_eq!(story.title, "Mia and the Moonlit Garden");
        assert_eq!(story.pages.len(), 2);
    }

    #[test]
    fn test_parse_story_rejects_non_json() {
        let result = parse_story("I'm sorry, I can't help with that.");
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[test]
    fn test_parse_story_rejects_empty_pages() {
        let result = parse_story(r#"{"title": "Empty", "pages": [], "totalPages": 0}"#);
        assert!(matches!(result, Err(GenerationError::InvalidStory(_))));
    }

    #[test]
    fn test_prompt_includes_characters_and_parameters() {
        let prompt = build_prompt(&[descriptor("Mia")], &params(vec!["courage"]));
        assert!(prompt.contains("Mia (girl) with brown hair"));
        assert!(prompt.contains("Special traits: loves puzzles"));
        assert!(prompt.contains("Loves: her red kite"));
        assert!(prompt.contains("Theme: a garden adventure"));
        assert!(prompt.contains("Focus on these qualities: courage"));
    }

    #[test]
    fn test_prompt_defaults_empty_qualities() {
        let prompt = build_prompt(&[descriptor("Mia")], &params(vec![]));
        assert!(prompt.contains("kindness, bravery, curiosity"));
    }

    #[test]
    fn test_prompt_joins_multiple_character_names() {
        let prompt = build_prompt(
            &[descriptor("Mia"), descriptor("Theo")],
            &params(vec!["kindness"]),
        );
        assert!(prompt.contains("Mia and Theo"));
    }

    #[tokio::test]
    async fn test_generate_without_api_key_fails_closed() {
        let generator = OpenAiStoryGenerator::new(None, "gpt-4o".to_string());
        let result = generator
            .generate(&[descriptor("Mia")], &params(vec![]))
            .await;
        assert!(matches!(result, Err(GenerationError::MissingCredentials)));
    }
}
