pub mod books;
pub mod documents;
pub mod reviews;

pub use books::UpdateReadingStatusRequest;
pub use documents::{bson_to_json, document_to_json};
pub use reviews::{CreateReviewRequest, ReviewListParams, ReviewResponse, UpdateReviewRequest};
