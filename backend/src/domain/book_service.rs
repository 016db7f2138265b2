use chrono::Utc;
use log::info;

use crate::domain::commands::books::{
    CompleteCreationCommand, CreateDraftCommand, UpdateCreationCommand,
};
use crate::domain::models::book::{Book, BookStatus, BookWithProfiles};
use crate::domain::models::page::all_pages_illustrated;
use crate::error::{DomainError, DomainResult};
use crate::storage::{BookRepository, DbConnection, PageRepository, ProfileRepository};

/// Service for managing books and their lifecycle status.
///
/// Status writes go through [`BookService::transition_status`], which
/// consults the [`BookStatus`] transition table, so every caller gets the
/// same legality check.
#[derive(Clone)]
pub struct BookService {
    book_repository: BookRepository,
    profile_repository: ProfileRepository,
    page_repository: PageRepository,
}

impl BookService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            book_repository: BookRepository::new(db.clone()),
            profile_repository: ProfileRepository::new(db.clone()),
            page_repository: PageRepository::new(db),
        }
    }

    /// Create a draft book from the character-selection step.
    ///
    /// The book starts in `creating` and accumulates the remaining wizard
    /// fields through partial updates. Requires at least one profile, and
    /// every profile must belong to the same owner as the book.
    pub async fn create_draft(
        &self,
        owner: &str,
        command: CreateDraftCommand,
    ) -> DomainResult<BookWithProfiles> {
        info!(
            "Creating draft book: title={}, profiles={}",
            command.title,
            command.profile_ids.len()
        );

        if command.profile_ids.is_empty() {
            return Err(DomainError::Validation(
                "a book needs at least one child profile".to_string(),
            ));
        }

        let title = command.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation(
                "book title cannot be empty".to_string(),
            ));
        }

        for profile_id in &command.profile_ids {
            if self
                .profile_repository
                .get_profile(owner, profile_id)
                .await?
                .is_none()
            {
                return Err(DomainError::NotFound {
                    entity: "child profile",
                    id: profile_id.clone(),
                });
            }
        }

        let now = Utc::now();
        let book = Book {
            id: Book::generate_id(),
            user_id: owner.to_string(),
            title: title.to_string(),
            status: BookStatus::Creating,
            cover_url: None,
            theme: None,
            qualities: None,
            magical_details: None,
            magical_image_url: None,
            special_memories: None,
            special_memories_image_url: None,
            narrative_style: None,
            story_content: None,
            generation_prompt: None,
            created_at: now,
            updated_at: now,
        };

        self.book_repository.store_book(&book).await?;
        self.book_repository
            .link_profiles(&book.id, &command.profile_ids)
            .await?;

        info!("Created draft book {} with ID: {}", book.title, book.id);
        self.fetch_book(owner, &book.id).await
    }

    /// Get one of the owner's books with its linked profiles, applying the
    /// pictures-complete reconciliation check before returning.
    pub async fn fetch_book(&self, owner: &str, book_id: &str) -> DomainResult<BookWithProfiles> {
        let book = self.get_owned_book(owner, book_id).await?;
        let book = self.reconcile_pictures(book).await?;
        let child_profiles = self.profile_repository.list_profiles_for_book(&book.id).await?;
        Ok(BookWithProfiles {
            book,
            child_profiles,
        })
    }

    /// List the owner's books, newest first, each with its linked profiles
    pub async fn list_books(&self, owner: &str) -> DomainResult<Vec<BookWithProfiles>> {
        let books = self.book_repository.list_books(owner).await?;

        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let child_profiles = self.profile_repository.list_profiles_for_book(&book.id).await?;
            result.push(BookWithProfiles {
                book,
                child_profiles,
            });
        }

        info!("Found {} books for owner", result.len());
        Ok(result)
    }

    /// Apply one wizard step's partial update of the creation attributes.
    ///
    /// The store does not enforce step ordering; the only precondition is
    /// that the book exists and is owned by the caller.
    pub async fn update_creation_fields(
        &self,
        owner: &str,
        book_id: &str,
        command: UpdateCreationCommand,
    ) -> DomainResult<BookWithProfiles> {
        info!("Updating creation fields for book {}", book_id);

        let mut book = self.get_owned_book(owner, book_id).await?;

        if command.theme.is_some() {
            book.theme = command.theme;
        }
        if command.qualities.is_some() {
            book.qualities = command.qualities;
        }
        if command.magical_details.is_some() {
            book.magical_details = command.magical_details;
        }
        if command.magical_image_url.is_some() {
            book.magical_image_url = command.magical_image_url;
        }
        if command.special_memories.is_some() {
            book.special_memories = command.special_memories;
        }
        if command.special_memories_image_url.is_some() {
            book.special_memories_image_url = command.special_memories_image_url;
        }
        if command.narrative_style.is_some() {
            book.narrative_style = command.narrative_style;
        }
        if command.cover_url.is_some() {
            book.cover_url = command.cover_url;
        }

        book.updated_at = Utc::now();
        self.book_repository.update_book(&book).await?;

        let child_profiles = self.profile_repository.list_profiles_for_book(&book.id).await?;
        Ok(BookWithProfiles {
            book,
            child_profiles,
        })
    }

    /// Commit the wizard's accumulated creation data in one write.
    ///
    /// Status is untouched; triggering generation is a separate, explicit
    /// call.
    pub async fn complete_creation(
        &self,
        owner: &str,
        book_id: &str,
        command: CompleteCreationCommand,
    ) -> DomainResult<BookWithProfiles> {
        info!("Completing creation data for book {}", book_id);

        let command = UpdateCreationCommand {
            theme: Some(command.theme),
            qualities: Some(command.qualities),
            magical_details: Some(command.magical_details),
            magical_image_url: command.magical_image_url,
            special_memories: Some(command.special_memories),
            special_memories_image_url: command.special_memories_image_url,
            narrative_style: Some(command.narrative_style),
            cover_url: None,
        };
        self.update_creation_fields(owner, book_id, command).await
    }

    /// Delete a book together with its pages and profile links
    pub async fn delete_book(&self, owner: &str, book_id: &str) -> DomainResult<()> {
        let book = self.get_owned_book(owner, book_id).await?;

        self.book_repository.delete_book(owner, book_id).await?;

        info!("Deleted book {} with ID: {}", book.title, book.id);
        Ok(())
    }

    /// Request a fresh illustration pass for a finished book.
    ///
    /// Moves `ready` back to `creating-pictures` and clears every page's
    /// image reference.
    pub async fn regenerate_pictures(
        &self,
        owner: &str,
        book_id: &str,
    ) -> DomainResult<BookWithProfiles> {
        info!("Regenerating pictures for book {}", book_id);

        let book = self.get_owned_book(owner, book_id).await?;
        self.transition_status(&book, BookStatus::CreatingPictures)
            .await?;
        self.page_repository.clear_images(&book.id).await?;

        self.fetch_book(owner, book_id).await
    }

    /// Look up a book scoped to its owner
    pub(crate) async fn find_book(&self, owner: &str, book_id: &str) -> DomainResult<Option<Book>> {
        Ok(self.book_repository.get_book(owner, book_id).await?)
    }

    pub(crate) async fn get_owned_book(&self, owner: &str, book_id: &str) -> DomainResult<Book> {
        self.find_book(owner, book_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "book",
                id: book_id.to_string(),
            })
    }

    /// Validated status write: rejects moves the transition table forbids.
    pub(crate) async fn transition_status(
        &self,
        book: &Book,
        to: BookStatus,
    ) -> DomainResult<()> {
        if !book.status.can_transition(to) {
            return Err(DomainError::IllegalTransition {
                from: book.status,
                to,
            });
        }
        self.book_repository
            .update_status(&book.user_id, &book.id, to)
            .await?;
        Ok(())
    }

    /// Level-triggered reconciliation: once every page of a
    /// `creating-pictures` book has an image reference, flip it to `ready`.
    ///
    /// Safe to call from any entry point and any state; a book that is
    /// already `ready` (or anywhere else) passes through untouched.
    pub(crate) async fn reconcile_pictures(&self, mut book: Book) -> DomainResult<Book> {
        if book.status == BookStatus::CreatingPictures {
            let pages = self.page_repository.list_pages(&book.id).await?;
            if all_pages_illustrated(&pages) {
                self.transition_status(&book, BookStatus::Ready).await?;
                book.status = BookStatus::Ready;
                info!(
                    "Book {} is ready: all {} pages illustrated",
                    book.id,
                    pages.len()
                );
            }
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::profiles::CreateProfileCommand;
    use crate::domain::models::story::{GeneratedStory, StoryPage};
    use crate::domain::profile_service::ProfileService;

    async fn setup_test() -> (BookService, ProfileService, DbConnection) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        (
            BookService::new(db.clone()),
            ProfileService::new(db.clone()),
            db,
        )
    }

    async fn create_profile(profiles: &ProfileService, owner: &str, name: &str) -> String {
        profiles
            .create_profile(
                owner,
                CreateProfileCommand {
                    name: name.to_string(),
                    gender: None,
                    birthday: None,
                    appearance: None,
                    special_traits: None,
                    favorite_thing: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn story(pages: usize) -> GeneratedStory {
        GeneratedStory {
            title: "A Test Story".to_string(),
            pages: (1..=pages as i64)
                .map(|n| StoryPage {
                    page_number: n,
                    text: format!("Page {}", n),
                    image_description: format!("Picture {}", n),
                })
                .collect(),
            total_pages: pages as i64,
            generation_prompt: None,
        }
    }

    /// Put a drafted book into creating-pictures with the given page count.
    async fn persist_story(db: &DbConnection, owner: &str, book_id: &str, pages: usize) {
        BookRepository::new(db.clone())
            .persist_generated_story(owner, book_id, &story(pages))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_draft() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;

        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Mia's Adventure".to_string(),
                    profile_ids: vec![profile_id.clone()],
                },
            )
            .await
            .unwrap();

        assert_eq!(created.book.status, BookStatus::Creating);
        assert_eq!(created.book.title, "Mia's Adventure");
        assert_eq!(created.child_profiles.len(), 1);
        assert_eq!(created.child_profiles[0].id, profile_id);
    }

    #[tokio::test]
    async fn test_create_draft_requires_profiles() {
        let (books, _profiles, _db) = setup_test().await;

        let result = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "No Characters".to_string(),
                    profile_ids: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        // and no row was created
        assert!(books.list_books("owner-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_draft_rejects_foreign_profile() {
        let (books, profiles, _db) = setup_test().await;
        let foreign_profile = create_profile(&profiles, "owner-2", "Noor").await;

        let result = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Borrowed Character".to_string(),
                    profile_ids: vec![foreign_profile],
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_book_is_owner_scoped() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Secret Book".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();

        let result = books.fetch_book("owner-2", &created.book.id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_creation_fields_is_cumulative() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Wizard Steps".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();

        // one wizard step at a time
        books
            .update_creation_fields(
                "owner-1",
                &created.book.id,
                UpdateCreationCommand {
                    theme: Some("under the sea".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = books
            .update_creation_fields(
                "owner-1",
                &created.book.id,
                UpdateCreationCommand {
                    qualities: Some(vec!["patience".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.book.theme.as_deref(), Some("under the sea"));
        assert_eq!(
            updated.book.qualities,
            Some(vec!["patience".to_string()])
        );
        assert_eq!(updated.book.status, BookStatus::Creating);
    }

    #[tokio::test]
    async fn test_complete_creation_fills_all_fields() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "One Shot".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();

        let completed = books
            .complete_creation(
                "owner-1",
                &created.book.id,
                CompleteCreationCommand {
                    theme: "jungle trek".to_string(),
                    qualities: vec!["courage".to_string()],
                    magical_details: "a compass that sings".to_string(),
                    magical_image_url: None,
                    special_memories: "camping with dad".to_string(),
                    special_memories_image_url: None,
                    narrative_style: "playful".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(completed.book.missing_creation_fields().is_empty());
        // completion does not move the status; generation does
        assert_eq!(completed.book.status, BookStatus::Creating);
    }

    #[tokio::test]
    async fn test_delete_book_cascades_pages_and_links() {
        let (books, profiles, db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Short Lived".to_string(),
                    profile_ids: vec![profile_id.clone()],
                },
            )
            .await
            .unwrap();
        persist_story(&db, "owner-1", &created.book.id, 3).await;

        books.delete_book("owner-1", &created.book.id).await.unwrap();

        assert!(matches!(
            books.fetch_book("owner-1", &created.book.id).await,
            Err(DomainError::NotFound { .. })
        ));
        let pages = PageRepository::new(db.clone())
            .list_pages(&created.book.id)
            .await
            .unwrap();
        assert!(pages.is_empty());
        // the profile itself survives
        assert!(profiles.get_profile("owner-1", &profile_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_book_reconciles_to_ready() {
        let (books, profiles, db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Six Pages".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();
        persist_story(&db, "owner-1", &created.book.id, 6).await;

        let page_repo = PageRepository::new(db.clone());
        let pages = page_repo.list_pages(&created.book.id).await.unwrap();

        // all but one page illustrated: still creating-pictures
        for page in &pages[..5] {
            page_repo
                .set_image_url(page.id, "images/page.png")
                .await
                .unwrap();
        }
        let fetched = books.fetch_book("owner-1", &created.book.id).await.unwrap();
        assert_eq!(fetched.book.status, BookStatus::CreatingPictures);

        // last page lands: the next fetch reports ready
        page_repo
            .set_image_url(pages[5].id, "images/page.png")
            .await
            .unwrap();
        let fetched = books.fetch_book("owner-1", &created.book.id).await.unwrap();
        assert_eq!(fetched.book.status, BookStatus::Ready);

        // ready never regresses on later fetches
        let fetched_again = books.fetch_book("owner-1", &created.book.id).await.unwrap();
        assert_eq!(fetched_again.book.status, BookStatus::Ready);
    }

    #[tokio::test]
    async fn test_book_with_no_pages_never_becomes_ready() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Empty".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();

        let fetched = books.fetch_book("owner-1", &created.book.id).await.unwrap();
        assert_eq!(fetched.book.status, BookStatus::Creating);
    }

    #[tokio::test]
    async fn test_regenerate_pictures_clears_images() {
        let (books, profiles, db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Redo".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();
        persist_story(&db, "owner-1", &created.book.id, 2).await;

        let page_repo = PageRepository::new(db.clone());
        for page in page_repo.list_pages(&created.book.id).await.unwrap() {
            page_repo
                .set_image_url(page.id, "images/old.png")
                .await
                .unwrap();
        }
        let ready = books.fetch_book("owner-1", &created.book.id).await.unwrap();
        assert_eq!(ready.book.status, BookStatus::Ready);

        let regenerated = books
            .regenerate_pictures("owner-1", &created.book.id)
            .await
            .unwrap();
        assert_eq!(regenerated.book.status, BookStatus::CreatingPictures);
        let pages = page_repo.list_pages(&created.book.id).await.unwrap();
        assert!(pages.iter().all(|p| p.image_url.is_none()));
    }

    #[tokio::test]
    async fn test_regenerate_pictures_rejected_while_creating() {
        let (books, profiles, _db) = setup_test().await;
        let profile_id = create_profile(&profiles, "owner-1", "Mia").await;
        let created = books
            .create_draft(
                "owner-1",
                CreateDraftCommand {
                    title: "Too Early".to_string(),
                    profile_ids: vec![profile_id],
                },
            )
            .await
            .unwrap();

        let result = books
            .regenerate_pictures("owner-1", &created.book.id)
            .await;
        assert!(matches!(
            result,
            Err(DomainError::IllegalTransition { .. })
        ));
    }
}
