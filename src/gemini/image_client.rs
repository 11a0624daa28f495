use crate::{
    config::GenAiConfig,
    error::ImageError,
    gemini::transport::HttpTransport,
    logger,
    models::{GeneratedImage, PredictRequest, PredictResponse},
};
use async_trait::async_trait;
use std::sync::Arc;

/// The image stage: prompt in, decoded image out.
#[async_trait]
pub trait ImageRequester: Send + Sync {
    async fn request_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;
}

#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    endpoint: String,
}

impl ImageClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &GenAiConfig) -> Self {
        Self {
            transport,
            api_key: config.credential().map(String::from),
            endpoint: config.image_endpoint(),
        }
    }
}

#[async_trait]
impl ImageRequester for ImageClient {
    async fn request_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::MissingCredential)?;

        let payload = serde_json::to_value(PredictRequest::single(prompt)).map_err(|e| {
            ImageError::RequestFailed {
                status: None,
                detail: format!("request serialization: {}", e),
            }
        })?;

        log::info!("Generating dish image");
        log::debug!("Image prompt: {}", prompt);

        let timer = logger::timer("image request");
        let response = self
            .transport
            .post_json(&self.endpoint, api_key, &payload)
            .await?;
        timer.stop();

        if !response.is_success() {
            return Err(ImageError::RequestFailed {
                status: Some(response.status),
                detail: response.body,
            });
        }

        let parsed: PredictResponse = serde_json::from_str(&response.body)
            .map_err(|e| ImageError::InvalidImagePayload(format!("response is not JSON: {}", e)))?;
        let image = GeneratedImage::from_response(parsed)?;
        log::info!(
            "Image ready ({} bytes, {})",
            image.as_bytes().len(),
            image.mime_type()
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::transport::testing::RecordingTransport;
    use serde_json::json;

    fn client(transport: Arc<RecordingTransport>) -> ImageClient {
        ImageClient::new(transport, &GenAiConfig::new().with_api_key("secret"))
    }

    #[tokio::test]
    async fn test_single_sample_request() {
        let transport = Arc::new(RecordingTransport::new().respond(
            200,
            json!({"predictions": [{"bytesBase64Encoded": "AQID", "mimeType": "image/png"}]})
                .to_string(),
        ));
        let image = client(transport.clone())
            .request_image("steaming khao soi")
            .await
            .unwrap();
        assert_eq!(image.as_bytes(), &[1, 2, 3]);
        assert_eq!(image.data_uri(), "data:image/png;base64,AQID");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].url.ends_with(":predict"));
        assert_eq!(
            calls[0].body,
            json!({"instances": [{"prompt": "steaming khao soi"}], "parameters": {"sampleCount": 1}})
        );
    }

    #[tokio::test]
    async fn test_empty_predictions() {
        let transport =
            Arc::new(RecordingTransport::new().respond(200, json!({"predictions": []}).to_string()));
        let err = client(transport).request_image("x").await.unwrap_err();
        assert!(matches!(err, ImageError::InvalidImagePayload(_)));
    }

    #[tokio::test]
    async fn test_error_status() {
        let transport = Arc::new(RecordingTransport::new().respond(429, "quota"));
        let err = client(transport).request_image("x").await.unwrap_err();
        assert_eq!(
            err,
            ImageError::RequestFailed {
                status: Some(429),
                detail: "quota".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let transport = Arc::new(RecordingTransport::new());
        let client = ImageClient::new(transport.clone(), &GenAiConfig::new());
        assert_eq!(
            client.request_image("x").await,
            Err(ImageError::MissingCredential)
        );
        assert!(transport.calls().is_empty());
    }
}
