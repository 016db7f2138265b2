use crate::domain::commands::pages::{AttachImageCommand, AttachImageResult};
use crate::domain::models::page::BookPage as DomainPage;
use shared::{
    AttachPageImageRequest, AttachPageImageResponse, BookPage as SharedPage, BookPageListResponse,
};

/// Mapper to convert between shared page DTOs and domain page models.
pub struct PageMapper;

impl PageMapper {
    pub fn to_attach_command(page_id: i64, request: AttachPageImageRequest) -> AttachImageCommand {
        AttachImageCommand {
            page_id,
            image_url: request.image_url,
        }
    }

    pub fn to_dto(domain: DomainPage) -> SharedPage {
        SharedPage {
            id: domain.id,
            book_id: domain.book_id,
            page_number: domain.page_number,
            text_content: domain.text_content,
            image_url: domain.image_url,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_list_dto(domain_pages: Vec<DomainPage>) -> BookPageListResponse {
        BookPageListResponse {
            pages: domain_pages.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_attach_response(result: AttachImageResult) -> AttachPageImageResponse {
        AttachPageImageResponse {
            success: true,
            book_ready: result.book_ready,
        }
    }
}
