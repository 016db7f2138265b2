use log::info;

use crate::domain::book_service::BookService;
use crate::domain::commands::pages::{AttachImageCommand, AttachImageResult};
use crate::domain::models::book::BookStatus;
use crate::domain::models::page::BookPage;
use crate::error::{DomainError, DomainResult};
use crate::storage::{DbConnection, PageRepository};

/// Service for reading book pages and attaching illustration references.
///
/// Ownership is checked through the parent book; a page whose book belongs
/// to somebody else is indistinguishable from a missing page.
#[derive(Clone)]
pub struct PageService {
    page_repository: PageRepository,
    book_service: BookService,
}

impl PageService {
    pub fn new(db: DbConnection, book_service: BookService) -> Self {
        Self {
            page_repository: PageRepository::new(db),
            book_service,
        }
    }

    /// List a book's pages in page-number order
    pub async fn list_pages(&self, owner: &str, book_id: &str) -> DomainResult<Vec<BookPage>> {
        let book = self.book_service.get_owned_book(owner, book_id).await?;
        Ok(self.page_repository.list_pages(&book.id).await?)
    }

    /// Attach an image reference to a page, then re-run the
    /// pictures-complete check on the parent book.
    pub async fn attach_page_image(
        &self,
        owner: &str,
        command: AttachImageCommand,
    ) -> DomainResult<AttachImageResult> {
        info!("Attaching image to page {}", command.page_id);

        let image_url = command.image_url.trim();
        if image_url.is_empty() {
            return Err(DomainError::Validation(
                "image_url is required".to_string(),
            ));
        }

        let not_found = || DomainError::NotFound {
            entity: "book page",
            id: command.page_id.to_string(),
        };

        let page = self
            .page_repository
            .get_page(command.page_id)
            .await?
            .ok_or_else(not_found)?;

        let book = self
            .book_service
            .find_book(owner, &page.book_id)
            .await?
            .ok_or_else(not_found)?;

        self.page_repository
            .set_image_url(page.id, image_url)
            .await?;

        let book = self.book_service.reconcile_pictures(book).await?;

        Ok(AttachImageResult {
            book_ready: book.status == BookStatus::Ready,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::books::CreateDraftCommand;
    use crate::domain::commands::profiles::CreateProfileCommand;
    use crate::domain::models::story::{GeneratedStory, StoryPage};
    use crate::domain::profile_service::ProfileService;
    use crate::storage::BookRepository;

    struct TestEnv {
        pages: PageService,
        books: BookService,
        db: DbConnection,
    }

    async fn setup_test() -> TestEnv {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        let books = BookService::new(db.clone());
        let pages = PageService::new(db.clone(), books.clone());
        TestEnv { pages, books, db }
    }

    /// Create an owned book in creating-pictures with the given page count.
    async fn book_with_pages(env: &TestEnv, owner: &str, page_count: usize) -> String {
        let profile = ProfileService::new(env.db.clone())
            .create_profile(
                owner,
                CreateProfileCommand {
                    name: "Mia".to_string(),
                    gender: None,
                    birthday: None,
                    appearance: None,
                    special_traits: None,
                    favorite_thing: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        let created = env
            .books
            .create_draft(
                owner,
                CreateDraftCommand {
                    title: "Paged Book".to_string(),
                    profile_ids: vec![profile.id],
                },
            )
            .await
            .unwrap();

        let story = GeneratedStory {
            title: "Paged Story".to_string(),
            pages: (1..=page_count as i64)
                .map(|n| StoryPage {
                    page_number: n,
                    text: format!("Page {}", n),
                    image_description: format!("Picture {}", n),
                })
                .collect(),
            total_pages: page_count as i64,
            generation_prompt: None,
        };
        BookRepository::new(env.db.clone())
            .persist_generated_story(owner, &created.book.id, &story)
            .await
            .unwrap();

        created.book.id
    }

    #[tokio::test]
    async fn test_list_pages_in_order() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 3).await;

        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();
        let numbers: Vec<i64> = pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(pages.iter().all(|p| p.image_url.is_none()));
    }

    #[tokio::test]
    async fn test_list_pages_is_owner_scoped() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 3).await;

        let result = env.pages.list_pages("owner-2", &book_id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_attach_last_image_flips_book_to_ready() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 3).await;
        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();

        for page in &pages[..2] {
            let result = env
                .pages
                .attach_page_image(
                    "owner-1",
                    AttachImageCommand {
                        page_id: page.id,
                        image_url: "images/page.png".to_string(),
                    },
                )
                .await
                .unwrap();
            assert!(!result.book_ready);
        }

        let result = env
            .pages
            .attach_page_image(
                "owner-1",
                AttachImageCommand {
                    page_id: pages[2].id,
                    image_url: "images/page.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(result.book_ready);

        let book = env.books.fetch_book("owner-1", &book_id).await.unwrap();
        assert_eq!(book.book.status, BookStatus::Ready);
    }

    #[tokio::test]
    async fn test_attach_again_is_a_no_op_on_ready_book() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 1).await;
        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();

        let first = env
            .pages
            .attach_page_image(
                "owner-1",
                AttachImageCommand {
                    page_id: pages[0].id,
                    image_url: "images/page.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(first.book_ready);

        // repeating the attachment leaves the book ready
        let second = env
            .pages
            .attach_page_image(
                "owner-1",
                AttachImageCommand {
                    page_id: pages[0].id,
                    image_url: "images/replacement.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(second.book_ready);

        let book = env.books.fetch_book("owner-1", &book_id).await.unwrap();
        assert_eq!(book.book.status, BookStatus::Ready);
    }

    #[tokio::test]
    async fn test_attach_to_missing_page() {
        let env = setup_test().await;
        let result = env
            .pages
            .attach_page_image(
                "owner-1",
                AttachImageCommand {
                    page_id: 9999,
                    image_url: "images/page.png".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_attach_to_foreign_book_page() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 1).await;
        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();

        let result = env
            .pages
            .attach_page_image(
                "owner-2",
                AttachImageCommand {
                    page_id: pages[0].id,
                    image_url: "images/steal.png".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        // the page was not touched
        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();
        assert!(pages[0].image_url.is_none());
    }

    #[tokio::test]
    async fn test_attach_requires_image_url() {
        let env = setup_test().await;
        let book_id = book_with_pages(&env, "owner-1", 1).await;
        let pages = env.pages.list_pages("owner-1", &book_id).await.unwrap();

        let result = env
            .pages
            .attach_page_image(
                "owner-1",
                AttachImageCommand {
                    page_id: pages[0].id,
                    image_url: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
