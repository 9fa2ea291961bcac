use bookshelf_service::config::BookshelfConfig;
use bookshelf_service::services::MongoDb;
use bookshelf_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");

        let db_name = format!("bookshelf_test_{}", Uuid::new_v4());

        let mut config = BookshelfConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    /// Insert a book through the API and return its generated id.
    pub async fn insert_book(&self, client: &reqwest::Client, book: serde_json::Value) -> String {
        let response = client
            .post(format!("{}/books", self.address))
            .json(&book)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["inserted_id"]
            .as_str()
            .expect("inserted_id missing from insert response")
            .to_string()
    }

    /// Cleanup test resources (drop the per-test database).
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
