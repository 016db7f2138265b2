//! Domain-level command types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to these internal types.

pub mod profiles {
    use crate::domain::models::profile::Appearance;

    /// Input for creating a child profile.
    #[derive(Debug, Clone)]
    pub struct CreateProfileCommand {
        pub name: String,
        pub gender: Option<String>,
        pub birthday: Option<String>,
        pub appearance: Option<Appearance>,
        pub special_traits: Option<String>,
        pub favorite_thing: Option<String>,
        pub avatar_url: Option<String>,
    }

    /// Input for updating a child profile; only present fields are written.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub gender: Option<String>,
        pub birthday: Option<String>,
        pub appearance: Option<Appearance>,
        pub special_traits: Option<String>,
        pub favorite_thing: Option<String>,
        pub avatar_url: Option<String>,
    }
}

pub mod books {
    /// Input for creating a draft book from the character-selection step.
    #[derive(Debug, Clone)]
    pub struct CreateDraftCommand {
        pub title: String,
        pub profile_ids: Vec<String>,
    }

    /// A single wizard step's partial update of the creation attributes.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateCreationCommand {
        pub theme: Option<String>,
        pub qualities: Option<Vec<String>>,
        pub magical_details: Option<String>,
        pub magical_image_url: Option<String>,
        pub special_memories: Option<String>,
        pub special_memories_image_url: Option<String>,
        pub narrative_style: Option<String>,
        pub cover_url: Option<String>,
    }

    /// The full creation payload committed at the end of the wizard.
    #[derive(Debug, Clone)]
    pub struct CompleteCreationCommand {
        pub theme: String,
        pub qualities: Vec<String>,
        pub magical_details: String,
        pub magical_image_url: Option<String>,
        pub special_memories: String,
        pub special_memories_image_url: Option<String>,
        pub narrative_style: String,
    }
}

pub mod pages {
    /// Input for attaching an illustration reference to a page.
    #[derive(Debug, Clone)]
    pub struct AttachImageCommand {
        pub page_id: i64,
        pub image_url: String,
    }

    /// Result of attaching a page image.
    #[derive(Debug, Clone)]
    pub struct AttachImageResult {
        /// True when this attachment completed the book and it became ready
        /// (or the book was already ready).
        pub book_ready: bool,
    }
}
