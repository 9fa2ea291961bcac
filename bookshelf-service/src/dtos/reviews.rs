use crate::models::Review;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "book_id must not be empty"))]
    pub book_id: String,
    #[validate(email)]
    pub reviewer_email: String,
    pub review_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub review_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    pub book_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub book_id: String,
    pub reviewer_email: String,
    pub review_text: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            book_id: review.book_id,
            reviewer_email: review.reviewer_email,
            review_text: review.review_text,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}
