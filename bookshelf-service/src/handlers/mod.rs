pub mod books;
pub mod health;
pub mod reviews;

pub use books::{
    create_book, delete_book, get_book, list_books, list_books_by_owner, update_book,
    update_reading_status, upvote_book,
};
pub use health::{banner, health_check, metrics_endpoint, readiness_check};
pub use reviews::{create_review, delete_review, list_reviews, update_review};

use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Validate a path id before it ever reaches the store.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid id format: {}", id)))
}
