use crate::domain::commands::books::{
    CompleteCreationCommand, CreateDraftCommand, UpdateCreationCommand,
};
use crate::domain::models::book::BookWithProfiles;
use crate::io::rest::mappers::ProfileMapper;
use shared::{
    Book as SharedBook, BookCreationData, BookListResponse, BookResponse, CreateDraftBookRequest,
    UpdateBookCreationRequest,
};

/// Mapper to convert between shared book DTOs and domain book models.
pub struct BookMapper;

impl BookMapper {
    pub fn to_draft_command(request: CreateDraftBookRequest) -> CreateDraftCommand {
        CreateDraftCommand {
            title: request.title,
            profile_ids: request.profile_ids,
        }
    }

    pub fn to_update_creation_command(request: UpdateBookCreationRequest) -> UpdateCreationCommand {
        UpdateCreationCommand {
            theme: request.theme,
            qualities: request.qualities,
            magical_details: request.magical_details,
            magical_image_url: request.magical_image_url,
            special_memories: request.special_memories,
            special_memories_image_url: request.special_memories_image_url,
            narrative_style: request.narrative_style,
            cover_url: request.cover_url,
        }
    }

    pub fn to_complete_creation_command(data: BookCreationData) -> CompleteCreationCommand {
        CompleteCreationCommand {
            theme: data.theme,
            qualities: data.qualities,
            magical_details: data.magical_details,
            magical_image_url: data.magical_image_url,
            special_memories: data.special_memories,
            special_memories_image_url: data.special_memories_image_url,
            narrative_style: data.narrative_style,
        }
    }

    /// Converts a domain book (with its profiles) to a shared book DTO.
    pub fn to_dto(domain: BookWithProfiles) -> SharedBook {
        let book = domain.book;
        SharedBook {
            id: book.id,
            title: book.title,
            status: book.status.as_str().to_string(),
            cover_url: book.cover_url,
            theme: book.theme,
            qualities: book.qualities,
            magical_details: book.magical_details,
            magical_image_url: book.magical_image_url,
            special_memories: book.special_memories,
            special_memories_image_url: book.special_memories_image_url,
            narrative_style: book.narrative_style,
            story_content: book.story_content,
            generation_prompt: book.generation_prompt,
            child_profiles: domain
                .child_profiles
                .into_iter()
                .map(ProfileMapper::to_dto)
                .collect(),
            created_at: book.created_at.to_rfc3339(),
            updated_at: book.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: BookWithProfiles, message: &str) -> BookResponse {
        BookResponse {
            book: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_list_dto(domain_books: Vec<BookWithProfiles>) -> BookListResponse {
        BookListResponse {
            books: domain_books.into_iter().map(Self::to_dto).collect(),
        }
    }
}
