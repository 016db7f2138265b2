use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::page::BookPage;
use crate::storage::sqlite::connection::DbConnection;

/// Repository for book-page operations.
///
/// Pages carry no owner column of their own; ownership checks go through the
/// parent book in the domain layer.
#[derive(Clone)]
pub struct PageRepository {
    db: DbConnection,
}

impl PageRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Get a page by ID
    pub async fn get_page(&self, page_id: i64) -> Result<Option<BookPage>> {
        let row = sqlx::query(
            r#"
            SELECT id, book_id, page_number, text_content, image_url, created_at
            FROM book_pages
            WHERE id = ?
            "#,
        )
        .bind(page_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(row_to_page))
    }

    /// List a book's pages in page-number order
    pub async fn list_pages(&self, book_id: &str) -> Result<Vec<BookPage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, book_id, page_number, text_content, image_url, created_at
            FROM book_pages
            WHERE book_id = ?
            ORDER BY page_number ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(row_to_page).collect())
    }

    /// Attach an image reference to a page
    pub async fn set_image_url(&self, page_id: i64, image_url: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE book_pages
            SET image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(image_url)
        .bind(page_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Clear the image references of every page in a book, used when a new
    /// illustration pass is requested
    pub async fn clear_images(&self, book_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE book_pages
            SET image_url = NULL
            WHERE book_id = ?
            "#,
        )
        .bind(book_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

fn row_to_page(row: &SqliteRow) -> BookPage {
    BookPage {
        id: row.get("id"),
        book_id: row.get("book_id"),
        page_number: row.get("page_number"),
        text_content: row.get("text_content"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    }
}
