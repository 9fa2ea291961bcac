use crate::dtos::{CreateReviewRequest, ReviewListParams, ReviewResponse, UpdateReviewRequest};
use crate::handlers::parse_object_id;
use crate::models::Review;
use crate::services::is_duplicate_key_error;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use serde_json::json;
use service_core::error::AppError;
use validator::Validate;

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = match params.book_id {
        Some(book_id) => doc! { "book_id": book_id },
        None => doc! {},
    };

    let mut cursor = state.db.reviews().find(filter, None).await?;

    let mut reviews = Vec::new();
    while let Some(review) = cursor.try_next().await? {
        reviews.push(ReviewResponse::from(review));
    }

    Ok(Json(reviews))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let review = Review::new(payload.book_id, payload.reviewer_email, payload.review_text);

    // Single insert; the unique (book_id, reviewer_email) index rejects a
    // duplicate pair even under concurrent requests.
    let result = state
        .db
        .reviews()
        .insert_one(&review, None)
        .await
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::Conflict(anyhow::anyhow!(
                    "A review for this book by this reviewer already exists"
                ))
            } else {
                tracing::error!("Failed to insert review into database: {}", e);
                AppError::from(e)
            }
        })?;

    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_default();

    tracing::info!(book_id = %review.book_id, reviewer_email = %review.reviewer_email, "Review created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "inserted_id": inserted_id })),
    ))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    // No existence requirement: an unmatched id is reported through the
    // returned counts, not as an error.
    let result = state
        .db
        .reviews()
        .update_one(
            doc! { "_id": oid },
            doc! { "$set": { "review_text": &payload.review_text } },
            None,
        )
        .await?;

    Ok(Json(json!({
        "matched_count": result.matched_count,
        "modified_count": result.modified_count,
    })))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let result = state.db.reviews().delete_one(doc! { "_id": oid }, None).await?;

    Ok(Json(json!({ "deleted_count": result.deleted_count })))
}
