use crate::error::{GuideError, ImageError};
use crate::models::{CulinaryGuide, GeneratedImage};

/// What the user sees for any guide-stage failure.
pub const GUIDE_FAILURE_MESSAGE: &str =
    "We couldn't put together a guide for that location. Please try again.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    GuideLoading,
    GuideReady,
    GuideFailed(GuideError),
    ImageLoading,
    ImageReady,
    ImageFailed(ImageError),
}

impl Phase {
    pub fn is_guide_failure(&self) -> bool {
        matches!(self, Phase::GuideFailed(_))
    }
}

/// Everything the presentation layer may read. Only the controller writes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationState {
    pub query: Option<String>,
    pub guide: Option<CulinaryGuide>,
    pub guide_loading: bool,
    pub image: Option<GeneratedImage>,
    pub image_loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl OperationState {
    pub(crate) fn loading(query: String) -> Self {
        Self {
            query: Some(query),
            guide_loading: true,
            phase: Phase::GuideLoading,
            ..Default::default()
        }
    }

    pub(crate) fn rejected(query: &str, err: GuideError) -> Self {
        Self {
            query: Some(query.to_string()),
            error: Some(GUIDE_FAILURE_MESSAGE.to_string()),
            phase: Phase::GuideFailed(err),
            ..Default::default()
        }
    }

    pub(crate) fn guide_failed(&mut self, err: GuideError) {
        self.guide = None;
        self.image = None;
        self.guide_loading = false;
        self.image_loading = false;
        self.error = Some(GUIDE_FAILURE_MESSAGE.to_string());
        self.phase = Phase::GuideFailed(err);
    }

    pub(crate) fn guide_ready(&mut self, guide: CulinaryGuide) {
        self.guide = Some(guide);
        self.guide_loading = false;
        self.error = None;
        self.phase = Phase::GuideReady;
    }

    pub(crate) fn image_started(&mut self) {
        self.image_loading = true;
        self.phase = Phase::ImageLoading;
    }

    pub(crate) fn image_ready(&mut self, image: GeneratedImage) {
        self.image = Some(image);
        self.image_loading = false;
        self.phase = Phase::ImageReady;
    }

    // guide and error stay as they are
    pub(crate) fn image_failed(&mut self, err: ImageError) {
        self.image_loading = false;
        self.phase = Phase::ImageFailed(err);
    }

    /// Submitting is disabled while the guide is loading.
    pub fn can_submit(&self) -> bool {
        !self.guide_loading
    }
}
