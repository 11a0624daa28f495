pub mod guide_client;
pub mod image_client;
pub mod transport;

use crate::{config::GenAiConfig, error::TransportError};
use std::sync::Arc;

pub use guide_client::{GuideClient, GuideRequester};
pub use image_client::{ImageClient, ImageRequester};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Both generative clients over one shared HTTP transport.
#[derive(Clone)]
pub struct GeminiClient {
    guide_client: Arc<GuideClient>,
    image_client: Arc<ImageClient>,
}

impl GeminiClient {
    pub fn new(config: &GenAiConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &GenAiConfig) -> Self {
        if config.credential().is_none() {
            log::warn!("No API key configured; guide requests will fail");
        }
        Self {
            guide_client: Arc::new(GuideClient::new(transport.clone(), config)),
            image_client: Arc::new(ImageClient::new(transport, config)),
        }
    }

    pub fn guide(&self) -> Arc<GuideClient> {
        self.guide_client.clone()
    }

    pub fn image(&self) -> Arc<ImageClient> {
        self.image_client.clone()
    }
}
