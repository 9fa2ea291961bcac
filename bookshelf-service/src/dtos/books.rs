use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateReadingStatusRequest {
    pub reading_status: String,
}
