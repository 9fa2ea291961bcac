use crate::config::BookshelfConfig;
use crate::handlers;
use crate::services::MongoDb;
use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::{get, patch},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub config: BookshelfConfig,
    pub db: MongoDb,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: BookshelfConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE]);

        let app = Router::new()
            .route("/", get(handlers::banner))
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route(
                "/books",
                get(handlers::list_books).post(handlers::create_book),
            )
            .route(
                "/books/:id",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .patch(handlers::update_reading_status)
                    .delete(handlers::delete_book),
            )
            .route("/books/:id/upvote", patch(handlers::upvote_book))
            .route("/my-books/:email", get(handlers::list_books_by_owner))
            .route(
                "/reviews",
                get(handlers::list_reviews).post(handlers::create_review),
            )
            .route(
                "/reviews/:id",
                patch(handlers::update_review).delete(handlers::delete_review),
            )
            .layer(from_fn(metrics_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(request_id_middleware))
            .layer(cors)
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
