use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::profile::{Appearance, ChildProfile, Gender};
use crate::storage::sqlite::connection::DbConnection;

/// Repository for child-profile operations, all scoped to an owner.
#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a profile in the database
    pub async fn store_profile(&self, profile: &ChildProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO child_profiles
                (id, user_id, name, gender, birthday, appearance,
                 special_traits, favorite_thing, avatar_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.birthday)
        .bind(appearance_json(profile)?)
        .bind(&profile.special_traits)
        .bind(&profile.favorite_thing)
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get an owner's profile by ID
    pub async fn get_profile(&self, user_id: &str, profile_id: &str) -> Result<Option<ChildProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, gender, birthday, appearance,
                   special_traits, favorite_thing, avatar_url, created_at, updated_at
            FROM child_profiles
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(profile_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    /// List an owner's profiles, oldest first
    pub async fn list_profiles(&self, user_id: &str) -> Result<Vec<ChildProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, gender, birthday, appearance,
                   special_traits, favorite_thing, avatar_url, created_at, updated_at
            FROM child_profiles
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_profile).collect()
    }

    /// List the profiles linked to a book
    pub async fn list_profiles_for_book(&self, book_id: &str) -> Result<Vec<ChildProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.user_id, p.name, p.gender, p.birthday, p.appearance,
                   p.special_traits, p.favorite_thing, p.avatar_url, p.created_at, p.updated_at
            FROM child_profiles p
            INNER JOIN book_profiles bp ON bp.profile_id = p.id
            WHERE bp.book_id = ?
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_profile).collect()
    }

    /// Update a profile in the database
    pub async fn update_profile(&self, profile: &ChildProfile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE child_profiles
            SET name = ?, gender = ?, birthday = ?, appearance = ?,
                special_traits = ?, favorite_thing = ?, avatar_url = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.birthday)
        .bind(appearance_json(profile)?)
        .bind(&profile.special_traits)
        .bind(&profile.favorite_thing)
        .bind(&profile.avatar_url)
        .bind(profile.updated_at)
        .bind(&profile.id)
        .bind(&profile.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a profile and its book links. Books themselves are untouched.
    pub async fn delete_profile(&self, user_id: &str, profile_id: &str) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM book_profiles WHERE profile_id = ?")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM child_profiles WHERE id = ? AND user_id = ?")
            .bind(profile_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn appearance_json(profile: &ChildProfile) -> Result<Option<String>> {
    profile
        .appearance
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize profile appearance")
}

fn row_to_profile(row: &SqliteRow) -> Result<ChildProfile> {
    let gender: Option<String> = row.get("gender");
    let appearance: Option<String> = row.get("appearance");

    Ok(ChildProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        gender: gender.as_deref().and_then(Gender::parse),
        birthday: row.get("birthday"),
        appearance: appearance
            .as_deref()
            .map(serde_json::from_str::<Appearance>)
            .transpose()
            .context("Failed to parse stored profile appearance")?,
        special_traits: row.get("special_traits"),
        favorite_thing: row.get("favorite_thing"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
