use crate::models::Review;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for bookshelf-service");

        // Index on user_email for the my-books owner lookup
        let owner_index = IndexModel::builder()
            .keys(doc! { "user_email": 1 })
            .options(
                IndexOptions::builder()
                    .name("owner_lookup".to_string())
                    .build(),
            )
            .build();

        self.books().create_index(owner_index, None).await.map_err(|e| {
            tracing::error!("Failed to create owner index on Books collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on Books.user_email");

        // Unique compound index guaranteeing one review per (book, reviewer).
        // Review creation is a single insert; a duplicate pair surfaces as a
        // duplicate-key write error instead of a racy pre-insert lookup.
        let reviewer_index = IndexModel::builder()
            .keys(doc! { "book_id": 1, "reviewer_email": 1 })
            .options(
                IndexOptions::builder()
                    .name("unique_reviewer_per_book".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.reviews()
            .create_index(reviewer_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create unique reviewer index on Reviews collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on Reviews.(book_id, reviewer_email)");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Books are schemaless; the collection is addressed as raw documents.
    pub fn books(&self) -> Collection<Document> {
        self.db.collection("Books")
    }

    pub fn reviews(&self) -> Collection<Review> {
        self.db.collection("Reviews")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

/// True when the error is a duplicate-key write rejection (code 11000),
/// i.e. the unique reviewer index turned down an insert.
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
