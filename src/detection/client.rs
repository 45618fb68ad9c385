use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use super::response::{parse_chair_count, parse_seated_count};
use super::DetectionError;
use crate::settings::GameSettings;

const UPLOAD_FIELD: &str = "image";
const UPLOAD_FILE_NAME: &str = "uploaded_image.jpg";

/// Remote vision service. Calls run on background tasks, never on the controller loop.
#[async_trait]
pub trait DetectionClient: Send + Sync {
    async fn detect_chairs(&self, image: Vec<u8>) -> Result<u32, DetectionError>;

    /// Number of people whose status is "Sitting".
    async fn detect_occupancy(&self, image: Vec<u8>) -> Result<u32, DetectionError>;
}

/// Multipart JPEG upload to the `/object` and `/sitstand` style endpoints.
pub struct HttpDetectionClient {
    client: reqwest::Client,
    chair_endpoint: String,
    occupancy_endpoint: String,
}

impl HttpDetectionClient {
    pub fn new(
        chair_endpoint: impl Into<String>,
        occupancy_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DetectionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DetectionError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            chair_endpoint: chair_endpoint.into(),
            occupancy_endpoint: occupancy_endpoint.into(),
        })
    }

    pub fn from_settings(settings: &GameSettings) -> Result<Self, DetectionError> {
        Self::new(
            settings.chair_endpoint.clone(),
            settings.occupancy_endpoint.clone(),
            settings.request_timeout(),
        )
    }

    async fn upload(&self, url: &str, image: Vec<u8>) -> Result<String, DetectionError> {
        if image.is_empty() {
            return Err(DetectionError::EmptyFrame);
        }

        let part = Part::bytes(image)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("image/jpeg")
            .map_err(|err| DetectionError::Transport(err.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| DetectionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectionError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| DetectionError::Transport(err.to_string()))
    }
}

#[async_trait]
impl DetectionClient for HttpDetectionClient {
    async fn detect_chairs(&self, image: Vec<u8>) -> Result<u32, DetectionError> {
        let body = self.upload(&self.chair_endpoint, image).await?;
        parse_chair_count(&body)
    }

    async fn detect_occupancy(&self, image: Vec<u8>) -> Result<u32, DetectionError> {
        let body = self.upload(&self.occupancy_endpoint, image).await?;
        parse_seated_count(&body)
    }
}
