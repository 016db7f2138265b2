use chrono::{NaiveDate, Utc};
use log::info;

use crate::domain::commands::profiles::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::models::profile::{ChildProfile, Gender};
use crate::error::{DomainError, DomainResult};
use crate::storage::{DbConnection, ProfileRepository};

/// Service for managing child profiles.
///
/// Every operation is scoped to the authenticated owner; a profile that
/// exists but belongs to somebody else behaves exactly like a missing one.
#[derive(Clone)]
pub struct ProfileService {
    profile_repository: ProfileRepository,
}

impl ProfileService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            profile_repository: ProfileRepository::new(db),
        }
    }

    /// Create a new child profile
    pub async fn create_profile(
        &self,
        owner: &str,
        command: CreateProfileCommand,
    ) -> DomainResult<ChildProfile> {
        info!("Creating child profile: name={}", command.name);

        let name = validate_name(&command.name)?;
        let gender = parse_gender(command.gender.as_deref())?;
        let birthday = parse_birthday(command.birthday.as_deref())?;

        let now = Utc::now();
        let profile = ChildProfile {
            id: ChildProfile::generate_id(),
            user_id: owner.to_string(),
            name,
            gender,
            birthday,
            appearance: command.appearance,
            special_traits: command.special_traits,
            favorite_thing: command.favorite_thing,
            avatar_url: command.avatar_url,
            created_at: now,
            updated_at: now,
        };

        self.profile_repository.store_profile(&profile).await?;

        info!("Created child profile {} with ID: {}", profile.name, profile.id);
        Ok(profile)
    }

    /// Get one of the owner's profiles by ID
    pub async fn get_profile(&self, owner: &str, profile_id: &str) -> DomainResult<ChildProfile> {
        self.profile_repository
            .get_profile(owner, profile_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "child profile",
                id: profile_id.to_string(),
            })
    }

    /// List all of the owner's profiles
    pub async fn list_profiles(&self, owner: &str) -> DomainResult<Vec<ChildProfile>> {
        let profiles = self.profile_repository.list_profiles(owner).await?;
        info!("Found {} profiles for owner", profiles.len());
        Ok(profiles)
    }

    /// Update an existing profile; only fields present in the command change
    pub async fn update_profile(
        &self,
        owner: &str,
        profile_id: &str,
        command: UpdateProfileCommand,
    ) -> DomainResult<ChildProfile> {
        info!("Updating child profile: {}", profile_id);

        let mut profile = self.get_profile(owner, profile_id).await?;

        if let Some(name) = command.name {
            profile.name = validate_name(&name)?;
        }
        if command.gender.is_some() {
            profile.gender = parse_gender(command.gender.as_deref())?;
        }
        if command.birthday.is_some() {
            profile.birthday = parse_birthday(command.birthday.as_deref())?;
        }
        if let Some(appearance) = command.appearance {
            profile.appearance = Some(appearance);
        }
        if let Some(special_traits) = command.special_traits {
            profile.special_traits = Some(special_traits);
        }
        if let Some(favorite_thing) = command.favorite_thing {
            profile.favorite_thing = Some(favorite_thing);
        }
        if let Some(avatar_url) = command.avatar_url {
            profile.avatar_url = Some(avatar_url);
        }

        profile.updated_at = Utc::now();

        self.profile_repository.update_profile(&profile).await?;

        info!("Updated child profile {} with ID: {}", profile.name, profile.id);
        Ok(profile)
    }

    /// Delete a profile. Its book links go with it; the books stay.
    pub async fn delete_profile(&self, owner: &str, profile_id: &str) -> DomainResult<()> {
        let profile = self.get_profile(owner, profile_id).await?;

        self.profile_repository
            .delete_profile(owner, profile_id)
            .await?;

        info!("Deleted child profile {} with ID: {}", profile.name, profile.id);
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "profile name cannot be empty".to_string(),
        ));
    }
    if trimmed.len() > 100 {
        return Err(DomainError::Validation(
            "profile name cannot exceed 100 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_gender(value: Option<&str>) -> DomainResult<Option<Gender>> {
    value
        .map(|v| {
            Gender::parse(v)
                .ok_or_else(|| DomainError::Validation(format!("unknown gender: {}", v)))
        })
        .transpose()
}

fn parse_birthday(value: Option<&str>) -> DomainResult<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                DomainError::Validation(format!("invalid birthday, use YYYY-MM-DD: {}", v))
            })
        })
        .transpose()
}
