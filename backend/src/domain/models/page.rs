use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single page of a book.
///
/// Pages are created in bulk when story generation succeeds, numbered 1..N,
/// and afterwards mutated only to attach an image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub id: i64,
    pub book_id: String,
    pub page_number: i64,
    pub text_content: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The reconciliation predicate: a book's pictures are complete when it has
/// at least one page and every page carries an image reference.
///
/// Pure over the given snapshot, so callers can re-run it from any entry
/// point; running it again once a book is ready changes nothing.
pub fn all_pages_illustrated(pages: &[BookPage]) -> bool {
    !pages.is_empty() && pages.iter().all(|p| p.image_url.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: i64, image_url: Option<&str>) -> BookPage {
        BookPage {
            id: number,
            book_id: "book::test".to_string(),
            page_number: number,
            text_content: Some(format!("Page {} text", number)),
            image_url: image_url.map(|s| s.to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_pages_is_not_complete() {
        assert!(!all_pages_illustrated(&[]));
    }

    #[test]
    fn test_missing_image_is_not_complete() {
        let pages = vec![page(1, Some("a.png")), page(2, None)];
        assert!(!all_pages_illustrated(&pages));
    }

    #[test]
    fn test_all_images_is_complete() {
        let pages = vec![page(1, Some("a.png")), page(2, Some("b.png"))];
        assert!(all_pages_illustrated(&pages));
    }
}
