use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A reader's review of a book.
///
/// `book_id` is the caller-provided reference string and is stored as-is;
/// it is never parsed as an ObjectId. The `(book_id, reviewer_email)` pair
/// is unique, enforced by an index created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub book_id: String,
    pub reviewer_email: String,
    pub review_text: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(book_id: String, reviewer_email: String, review_text: String) -> Self {
        Self {
            id: None,
            book_id,
            reviewer_email,
            review_text,
            created_at: Utc::now(),
        }
    }
}
