use std::sync::Arc;

use log::{error, info, warn};

use crate::domain::book_service::BookService;
use crate::domain::models::book::{Book, BookStatus, BookWithProfiles};
use crate::domain::models::profile::ChildProfile;
use crate::error::{DomainError, DomainResult};
use crate::generator::{GenerationError, ProfileDescriptor, StoryGenerator, StoryParams};
use crate::storage::{BookRepository, DbConnection};

/// Orchestrates story generation for a book.
///
/// Drives `creating -> generating-story -> creating-pictures` around the
/// generator call. Any failure after entering `generating-story` rolls the
/// book back to `creating` so the user can trigger generation again; pages
/// are only written once the whole story has been accepted, so the failure
/// path never leaves partial pages behind.
#[derive(Clone)]
pub struct StoryService {
    book_service: BookService,
    book_repository: BookRepository,
    generator: Arc<dyn StoryGenerator>,
}

impl StoryService {
    pub fn new(
        db: DbConnection,
        book_service: BookService,
        generator: Arc<dyn StoryGenerator>,
    ) -> Self {
        Self {
            book_service,
            book_repository: BookRepository::new(db),
            generator,
        }
    }

    /// Generate a story for a book with complete creation data.
    ///
    /// On success the book carries the generated title and story, one page
    /// row per story page (renumbered 1..N), and status `creating-pictures`.
    pub async fn generate_story(
        &self,
        owner: &str,
        book_id: &str,
    ) -> DomainResult<BookWithProfiles> {
        info!("Generating story for book {}", book_id);

        let BookWithProfiles {
            book,
            child_profiles,
        } = self.book_service.fetch_book(owner, book_id).await?;

        let missing = book.missing_creation_fields();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteCreation { missing });
        }

        self.book_service
            .transition_status(&book, BookStatus::GeneratingStory)
            .await?;

        match self.run_generation(&book, &child_profiles).await {
            Ok(()) => self.book_service.fetch_book(owner, book_id).await,
            Err(e) => {
                warn!(
                    "Story generation for book {} failed, rolling back to creating: {}",
                    book_id, e
                );
                // compensating rollback, not a retry
                if let Err(rollback_error) = self
                    .book_repository
                    .update_status(owner, book_id, BookStatus::Creating)
                    .await
                {
                    error!(
                        "Failed to roll back book {} after generation failure: {:#}",
                        book_id, rollback_error
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_generation(&self, book: &Book, profiles: &[ChildProfile]) -> DomainResult<()> {
        let descriptors: Vec<ProfileDescriptor> =
            profiles.iter().map(ProfileDescriptor::from_profile).collect();

        let params = StoryParams {
            theme: book.theme.clone().unwrap_or_default(),
            qualities: book.qualities.clone().unwrap_or_default(),
            magical_details: book.magical_details.clone().unwrap_or_default(),
            special_memories: book.special_memories.clone().unwrap_or_default(),
            narrative_style: book.narrative_style.clone().unwrap_or_default(),
        };

        let mut story = self.generator.generate(&descriptors, &params).await?;

        story
            .validate()
            .map_err(|reason| DomainError::Generation(GenerationError::InvalidStory(reason)))?;

        // generator-supplied page numbers are not trusted
        story.normalize();

        self.book_repository
            .persist_generated_story(&book.user_id, &book.id, &story)
            .await?;

        info!(
            "Persisted story \"{}\" with {} pages for book {}",
            story.title,
            story.pages.len(),
            book.id
        );
        Ok(())
    }
}
