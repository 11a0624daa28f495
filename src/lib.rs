//! Turns a location into a culinary guide: a structured Gemini text request
//! first, then an Imagen picture of the signature dish.

pub mod config;
pub mod controller;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;

pub use config::GenAiConfig;
pub use controller::{OperationState, OrchestrationController, Phase, QueryHandle};
pub use error::{ConfigError, GuideError, ImageError, TransportError};
pub use gemini::{
    GeminiClient, GuideClient, GuideRequester, HttpTransport, ImageClient, ImageRequester,
    ReqwestTransport,
};
pub use models::{CulinaryGuide, Dish, GeneratedImage};
