use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::book::{Book, BookStatus};
use crate::domain::models::story::GeneratedStory;
use crate::storage::sqlite::connection::DbConnection;

/// Repository for book and book-profile-link operations.
#[derive(Clone)]
pub struct BookRepository {
    db: DbConnection,
}

impl BookRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a book in the database
    pub async fn store_book(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books
                (id, user_id, title, status, cover_url, theme, qualities,
                 magical_details, magical_image_url, special_memories,
                 special_memories_image_url, narrative_style, story_content,
                 generation_prompt, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.id)
        .bind(&book.user_id)
        .bind(&book.title)
        .bind(book.status.as_str())
        .bind(&book.cover_url)
        .bind(&book.theme)
        .bind(qualities_json(book)?)
        .bind(&book.magical_details)
        .bind(&book.magical_image_url)
        .bind(&book.special_memories)
        .bind(&book.special_memories_image_url)
        .bind(&book.narrative_style)
        .bind(&book.story_content)
        .bind(&book.generation_prompt)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Link child profiles to a book
    pub async fn link_profiles(&self, book_id: &str, profile_ids: &[String]) -> Result<()> {
        for profile_id in profile_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO book_profiles (book_id, profile_id)
                VALUES (?, ?)
                "#,
            )
            .bind(book_id)
            .bind(profile_id)
            .execute(self.db.pool())
            .await?;
        }
        Ok(())
    }

    /// Get an owner's book by ID
    pub async fn get_book(&self, user_id: &str, book_id: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, status, cover_url, theme, qualities,
                   magical_details, magical_image_url, special_memories,
                   special_memories_image_url, narrative_style, story_content,
                   generation_prompt, created_at, updated_at
            FROM books
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_book).transpose()
    }

    /// List an owner's books, newest first
    pub async fn list_books(&self, user_id: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, status, cover_url, theme, qualities,
                   magical_details, magical_image_url, special_memories,
                   special_memories_image_url, narrative_style, story_content,
                   generation_prompt, created_at, updated_at
            FROM books
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_book).collect()
    }

    /// Update a book's mutable fields
    pub async fn update_book(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE books
            SET title = ?, status = ?, cover_url = ?, theme = ?, qualities = ?,
                magical_details = ?, magical_image_url = ?, special_memories = ?,
                special_memories_image_url = ?, narrative_style = ?,
                story_content = ?, generation_prompt = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&book.title)
        .bind(book.status.as_str())
        .bind(&book.cover_url)
        .bind(&book.theme)
        .bind(qualities_json(book)?)
        .bind(&book.magical_details)
        .bind(&book.magical_image_url)
        .bind(&book.special_memories)
        .bind(&book.special_memories_image_url)
        .bind(&book.narrative_style)
        .bind(&book.story_content)
        .bind(&book.generation_prompt)
        .bind(book.updated_at)
        .bind(&book.id)
        .bind(&book.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Write only the status column
    pub async fn update_status(
        &self,
        user_id: &str,
        book_id: &str,
        status: BookStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE books
            SET status = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(book_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Persist a generated story and its pages as one unit.
    ///
    /// The book gets the generated title, the serialized story, the prompt
    /// that produced it, and status `creating-pictures`; one page row per
    /// story page is inserted with a null image reference. Everything runs
    /// in a single transaction so a failure leaves no partial pages behind.
    pub async fn persist_generated_story(
        &self,
        user_id: &str,
        book_id: &str,
        story: &GeneratedStory,
    ) -> Result<()> {
        let story_json =
            serde_json::to_string(story).context("Failed to serialize generated story")?;
        let now = Utc::now();

        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?, story_content = ?, generation_prompt = ?,
                status = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&story.title)
        .bind(&story_json)
        .bind(&story.generation_prompt)
        .bind(BookStatus::CreatingPictures.as_str())
        .bind(now)
        .bind(book_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Book not found: {}", book_id));
        }

        for page in &story.pages {
            sqlx::query(
                r#"
                INSERT INTO book_pages (book_id, page_number, text_content, image_url, created_at)
                VALUES (?, ?, ?, NULL, ?)
                "#,
            )
            .bind(book_id)
            .bind(page.page_number)
            .bind(&page.text)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a book together with its pages and profile links
    pub async fn delete_book(&self, user_id: &str, book_id: &str) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM book_pages WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM book_profiles WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM books WHERE id = ? AND user_id = ?")
            .bind(book_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn qualities_json(book: &Book) -> Result<Option<String>> {
    book.qualities
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize book qualities")
}

fn row_to_book(row: &SqliteRow) -> Result<Book> {
    let status: String = row.get("status");
    let qualities: Option<String> = row.get("qualities");

    Ok(Book {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        status: BookStatus::parse(&status)
            .ok_or_else(|| anyhow!("Unknown book status in database: {}", status))?,
        cover_url: row.get("cover_url"),
        theme: row.get("theme"),
        qualities: qualities
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()
            .context("Failed to parse stored book qualities")?,
        magical_details: row.get("magical_details"),
        magical_image_url: row.get("magical_image_url"),
        special_memories: row.get("special_memories"),
        special_memories_image_url: row.get("special_memories_image_url"),
        narrative_style: row.get("narrative_style"),
        story_content: row.get("story_content"),
        generation_prompt: row.get("generation_prompt"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
