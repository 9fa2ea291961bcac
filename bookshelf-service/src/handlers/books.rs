use crate::dtos::{bson_to_json, document_to_json, UpdateReadingStatusRequest};
use crate::handlers::parse_object_id;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use serde_json::{json, Value};
use service_core::error::AppError;

pub async fn list_books(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut cursor = state.db.books().find(doc! {}, None).await?;

    let mut books = Vec::new();
    while let Some(book) = cursor.try_next().await? {
        books.push(document_to_json(book));
    }

    Ok(Json(books))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    // The book shape is caller-defined; the body is inserted verbatim.
    let book = mongodb::bson::to_document(&payload).map_err(|_| {
        AppError::BadRequest(anyhow::anyhow!("Book payload must be a JSON object"))
    })?;

    let result = state.db.books().insert_one(&book, None).await.map_err(|e| {
        tracing::error!("Failed to insert book into database: {}", e);
        AppError::from(e)
    })?;

    let inserted_id = bson_to_json(result.inserted_id);
    tracing::info!(inserted_id = %inserted_id, "Book created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "inserted_id": inserted_id })),
    ))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let book = state
        .db
        .books()
        .find_one(doc! { "_id": oid }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Book not found")))?;

    Ok(Json(document_to_json(book)))
}

pub async fn list_books_by_owner(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut cursor = state
        .db
        .books()
        .find(doc! { "user_email": &email }, None)
        .await
        .map_err(|e| {
            tracing::error!(user_email = %email, "Failed to fetch user books: {}", e);
            AppError::from(e)
        })?;

    let mut books = Vec::new();
    while let Some(book) = cursor.try_next().await? {
        books.push(document_to_json(book));
    }

    Ok(Json(books))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let mut fields = mongodb::bson::to_document(&payload).map_err(|_| {
        AppError::BadRequest(anyhow::anyhow!("Book payload must be a JSON object"))
    })?;
    // The _id is immutable in the store; a client echoing it back must not
    // end up trying to rewrite it.
    fields.remove("_id");

    if fields.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No fields to update")));
    }

    let result = state
        .db
        .books()
        .update_one(doc! { "_id": oid }, doc! { "$set": fields }, None)
        .await?;

    // Matched, not modified: an update that merely re-sends the current
    // field values still succeeds. Only an absent document is a 404.
    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Book not found")));
    }

    tracing::info!(book_id = %id, "Book updated");
    Ok(Json(json!({ "success": true })))
}

pub async fn update_reading_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReadingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let result = state
        .db
        .books()
        .update_one(
            doc! { "_id": oid },
            doc! { "$set": { "reading_status": &payload.reading_status } },
            None,
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Book not found")));
    }

    tracing::info!(book_id = %id, reading_status = %payload.reading_status, "Reading status updated");
    Ok(Json(json!({ "message": "Reading status updated" })))
}

pub async fn upvote_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    // Single atomic increment; the store serializes concurrent upvotes.
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    let updated = state
        .db
        .books()
        .find_one_and_update(doc! { "_id": oid }, doc! { "$inc": { "upvote": 1 } }, options)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Book not found")))?;

    tracing::info!(book_id = %id, "Book upvoted");
    Ok(Json(document_to_json(updated)))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oid = parse_object_id(&id)?;

    let result = state
        .db
        .books()
        .delete_one(doc! { "_id": oid }, None)
        .await
        .map_err(|e| {
            tracing::error!(book_id = %id, "Failed to delete book: {}", e);
            AppError::from(e)
        })?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Book not found")));
    }

    tracing::info!(book_id = %id, "Book deleted");
    Ok(Json(json!({ "success": true })))
}
