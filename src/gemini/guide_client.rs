use crate::{
    config::GenAiConfig,
    error::GuideError,
    gemini::transport::HttpTransport,
    logger,
    models::{guide_prompt, CulinaryGuide, GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use std::sync::Arc;

/// The guide stage: location in, validated guide out.
#[async_trait]
pub trait GuideRequester: Send + Sync {
    async fn request_guide(&self, location: &str) -> Result<CulinaryGuide, GuideError>;
}

#[derive(Clone)]
pub struct GuideClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    endpoint: String,
}

impl GuideClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &GenAiConfig) -> Self {
        Self {
            transport,
            api_key: config.credential().map(String::from),
            endpoint: config.text_endpoint(),
        }
    }

    fn build_request(location: &str) -> Result<serde_json::Value, GuideError> {
        let request =
            GenerateContentRequest::structured(guide_prompt(location), CulinaryGuide::response_schema());
        serde_json::to_value(&request).map_err(|e| GuideError::RequestFailed {
            status: None,
            detail: format!("request serialization: {}", e),
        })
    }
}

#[async_trait]
impl GuideRequester for GuideClient {
    async fn request_guide(&self, location: &str) -> Result<CulinaryGuide, GuideError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(GuideError::EmptyQuery);
        }
        let api_key = self.api_key.as_deref().ok_or(GuideError::MissingCredential)?;

        let payload = Self::build_request(location)?;
        log::info!("Requesting culinary guide for '{}'", location);
        log::debug!("Guide endpoint: {}", self.endpoint);

        let timer = logger::timer("guide request");
        let response = self
            .transport
            .post_json(&self.endpoint, api_key, &payload)
            .await
            .map_err(|e| {
                log::error!("Guide request could not be sent: {}", e);
                GuideError::from(e)
            })?;
        timer.stop();

        if !response.is_success() {
            log::error!(
                "Guide endpoint returned HTTP {}: {}",
                response.status,
                response.body
            );
            return Err(GuideError::RequestFailed {
                status: Some(response.status),
                detail: response.body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response.body)
            .map_err(|e| GuideError::MalformedResponse(format!("response is not JSON: {}", e)))?;
        let text = parsed.first_text().ok_or_else(|| {
            log::warn!(
                "Guide response had no text part (finish reason: {})",
                parsed.finish_reason().unwrap_or("unknown")
            );
            GuideError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
        })?;

        let guide = CulinaryGuide::from_payload(text).map_err(|e| {
            log::error!("Guide payload rejected: {}", e);
            e
        })?;
        log::info!(
            "Guide ready for {} with {} dishes",
            guide.location_name,
            guide.must_try_dishes.len()
        );
        Ok(guide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gemini::transport::testing::RecordingTransport;
    use serde_json::json;

    fn guide_body(guide: serde_json::Value) -> String {
        json!({
            "candidates": [{"content": {"parts": [{"text": guide.to_string()}]}}]
        })
        .to_string()
    }

    fn thailand() -> serde_json::Value {
        json!({
            "locationName": "Thailand",
            "mustTryDishes": [
                {"name": "Pad Thai", "description": "Stir-fried rice noodles"},
                {"name": "Tom Yum", "description": "Hot and sour soup"},
                {"name": "Som Tam", "description": "Green papaya salad"},
                {"name": "Massaman Curry", "description": "Rich, mild curry"}
            ],
            "etiquetteTip": "Never point your feet at people.",
            "restaurantSuggestion": "Yaowarat Road night market",
            "imageGenPrompt": "A photorealistic plate of pad thai with lime"
        })
    }

    fn client(transport: Arc<RecordingTransport>, key: Option<&str>) -> GuideClient {
        let mut config = GenAiConfig::new().with_base_url("https://ai.test/v1beta");
        config.api_key = key.map(String::from);
        GuideClient::new(transport, &config)
    }

    #[tokio::test]
    async fn test_valid_guide() {
        let transport = Arc::new(RecordingTransport::new().respond(200, guide_body(thailand())));
        let guide = client(transport.clone(), Some("secret"))
            .request_guide("  Thailand ")
            .await
            .unwrap();
        assert_eq!(guide.location_name, "Thailand");
        assert_eq!(guide.must_try_dishes.len(), 4);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].api_key, "secret");
        assert!(calls[0].url.ends_with(":generateContent"));
        let body = &calls[0].body;
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("\"Thailand\""));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            CulinaryGuide::response_schema()
        );
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_call() {
        let transport = Arc::new(RecordingTransport::new());
        let err = client(transport.clone(), Some("secret"))
            .request_guide(" \t\n")
            .await
            .unwrap_err();
        assert_eq!(err, GuideError::EmptyQuery);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let transport = Arc::new(RecordingTransport::new().respond(200, guide_body(thailand())));
        let err = client(transport.clone(), None)
            .request_guide("Thailand")
            .await
            .unwrap_err();
        assert_eq!(err, GuideError::MissingCredential);
        assert!(transport.calls().is_empty());

        let blank = client(transport.clone(), Some("  "))
            .request_guide("Thailand")
            .await
            .unwrap_err();
        assert_eq!(blank, GuideError::MissingCredential);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let transport = Arc::new(RecordingTransport::new().respond(500, "boom"));
        let err = client(transport, Some("k"))
            .request_guide("Peru")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GuideError::RequestFailed {
                status: Some(500),
                detail: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = Arc::new(
            RecordingTransport::new().fail(TransportError::Send("connection reset".into())),
        );
        let err = client(transport, Some("k"))
            .request_guide("Peru")
            .await
            .unwrap_err();
        assert!(matches!(err, GuideError::RequestFailed { status: None, .. }));
    }

    #[tokio::test]
    async fn test_missing_text_is_malformed() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, json!({"candidates": []}).to_string())
                .respond(200, "<html>"),
        );
        let client = client(transport, Some("k"));
        assert!(matches!(
            client.request_guide("Peru").await,
            Err(GuideError::MalformedResponse(_))
        ));
        assert!(matches!(
            client.request_guide("Peru").await,
            Err(GuideError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_schema_violation_is_invalid_payload() {
        let mut guide = thailand();
        guide.as_object_mut().unwrap().remove("etiquetteTip");
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, guide_body(guide))
                .respond(
                    200,
                    json!({"candidates": [{"content": {"parts": [{"text": "Sure! Here is"}]}}]})
                        .to_string(),
                ),
        );
        let client = client(transport, Some("k"));
        assert!(matches!(
            client.request_guide("Thailand").await,
            Err(GuideError::InvalidGuidePayload(_))
        ));
        assert!(matches!(
            client.request_guide("Thailand").await,
            Err(GuideError::InvalidGuidePayload(_))
        ));
    }
}
