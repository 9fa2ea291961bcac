mod common;

use common::TestApp;
use mongodb::bson::{doc, oid::ObjectId};
use reqwest::{Client, StatusCode};
use serde_json::json;

async fn post_review(
    app: &TestApp,
    client: &Client,
    book_id: &str,
    reviewer_email: &str,
    review_text: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/reviews", app.address))
        .json(&json!({
            "book_id": book_id,
            "reviewer_email": reviewer_email,
            "review_text": review_text,
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn create_review_then_list_for_book() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let inserted_id = body["inserted_id"].as_str().expect("inserted_id missing");
    assert_eq!(inserted_id.len(), 24);

    let reviews: Vec<serde_json::Value> = client
        .get(format!("{}/reviews?book_id=book-1", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["id"], inserted_id);
    assert_eq!(reviews[0]["book_id"], "book-1");
    assert_eq!(reviews[0]["reviewer_email"], "a@x.com");
    assert_eq!(reviews[0]["review_text"], "Loved it");

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_review_is_rejected_with_conflict() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_review(&app, &client, "book-1", "a@x.com", "Changed my mind").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // No second document was created
    let count = app
        .db
        .reviews()
        .count_documents(doc! {}, None)
        .await
        .expect("Failed to count reviews");
    assert_eq!(count, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn same_book_different_reviewer_is_allowed() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_review(&app, &client, "book-1", "b@y.com", "Not for me").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_review(&app, &client, "book-2", "a@x.com", "Also great").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    app.cleanup().await;
}

#[tokio::test]
async fn list_reviews_filters_by_book_id() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    post_review(&app, &client, "book-2", "a@x.com", "Fine").await;

    let reviews: Vec<serde_json::Value> = client
        .get(format!("{}/reviews?book_id=book-2", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["book_id"], "book-2");

    // Without the query parameter, every review is returned
    let reviews: Vec<serde_json::Value> = client
        .get(format!("{}/reviews", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(reviews.len(), 2);

    app.cleanup().await;
}

#[tokio::test]
async fn update_review_overwrites_the_text() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let id = body["inserted_id"].as_str().expect("inserted_id missing");

    let response = client
        .patch(format!("{}/reviews/{}", app.address, id))
        .json(&json!({ "review_text": "Even better on re-read" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["matched_count"], 1);
    assert_eq!(body["modified_count"], 1);

    let stored = app
        .db
        .reviews()
        .find_one(doc! { "_id": ObjectId::parse_str(id).unwrap() }, None)
        .await
        .expect("Failed to query reviews")
        .expect("Review not found in DB");
    assert_eq!(stored.review_text, "Even better on re-read");

    app.cleanup().await;
}

#[tokio::test]
async fn update_review_on_absent_id_is_a_silent_noop() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .patch(format!(
            "{}/reviews/{}",
            app.address,
            ObjectId::new().to_hex()
        ))
        .json(&json!({ "review_text": "Nobody will read this" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["matched_count"], 0);
    assert_eq!(body["modified_count"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_review_reports_the_deleted_count() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "a@x.com", "Loved it").await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let id = body["inserted_id"].as_str().expect("inserted_id missing");

    let response = client
        .delete(format!("{}/reviews/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["deleted_count"], 1);

    // Deleting again is not an error, the count is just zero
    let response = client
        .delete(format!("{}/reviews/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["deleted_count"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn create_review_validates_the_request_shape() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_review(&app, &client, "book-1", "not-an-email", "Loved it").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_review(&app, &client, "", "a@x.com", "Loved it").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    app.cleanup().await;
}
