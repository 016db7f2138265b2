use crate::domain::commands::profiles::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::models::profile::{Appearance as DomainAppearance, ChildProfile as DomainProfile};
use shared::{
    Appearance as SharedAppearance, ChildProfile as SharedProfile, ChildProfileListResponse,
    ChildProfileResponse, CreateChildProfileRequest, UpdateChildProfileRequest,
};

/// Mapper to convert between shared profile DTOs and domain profile models.
pub struct ProfileMapper;

impl ProfileMapper {
    pub fn to_create_command(request: CreateChildProfileRequest) -> CreateProfileCommand {
        CreateProfileCommand {
            name: request.name,
            gender: request.gender,
            birthday: request.birthday,
            appearance: request.appearance.map(appearance_to_domain),
            special_traits: request.special_traits,
            favorite_thing: request.favorite_thing,
            avatar_url: request.avatar_url,
        }
    }

    pub fn to_update_command(request: UpdateChildProfileRequest) -> UpdateProfileCommand {
        UpdateProfileCommand {
            name: request.name,
            gender: request.gender,
            birthday: request.birthday,
            appearance: request.appearance.map(appearance_to_domain),
            special_traits: request.special_traits,
            favorite_thing: request.favorite_thing,
            avatar_url: request.avatar_url,
        }
    }

    /// Converts a domain profile model to a shared profile DTO.
    pub fn to_dto(domain: DomainProfile) -> SharedProfile {
        SharedProfile {
            id: domain.id,
            name: domain.name,
            gender: domain.gender.map(|g| g.as_str().to_string()),
            birthday: domain.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
            appearance: domain.appearance.map(appearance_to_dto),
            special_traits: domain.special_traits,
            favorite_thing: domain.favorite_thing,
            avatar_url: domain.avatar_url,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainProfile, message: &str) -> ChildProfileResponse {
        ChildProfileResponse {
            profile: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_list_dto(domain_profiles: Vec<DomainProfile>) -> ChildProfileListResponse {
        ChildProfileListResponse {
            profiles: domain_profiles.into_iter().map(Self::to_dto).collect(),
        }
    }
}

fn appearance_to_domain(dto: SharedAppearance) -> DomainAppearance {
    DomainAppearance {
        hair_color: dto.hair_color,
        eye_color: dto.eye_color,
        skin_tone: dto.skin_tone,
        other_features: dto.other_features,
    }
}

fn appearance_to_dto(domain: DomainAppearance) -> SharedAppearance {
    SharedAppearance {
        hair_color: domain.hair_color,
        eye_color: domain.eye_color,
        skin_tone: domain.skin_tone,
        other_features: domain.other_features,
    }
}
