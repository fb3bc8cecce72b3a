pub mod brief;
pub mod descriptor;
pub mod gftt;
pub mod matcher;
pub mod ransac;

pub use brief::*;
pub use descriptor::*;
pub use gftt::*;
pub use matcher::*;
pub use ransac::*;

use image::GrayImage;

pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Detection error: {0}")]
    DetectionError(String),

    #[error("Descriptor error: {0}")]
    DescriptorError(String),

    #[error("Matching error: {0}")]
    MatchingError(String),

    #[error("Insufficient matches: found {found}, required {required}")]
    InsufficientMatches { found: usize, required: usize },
}

/// Detector and descriptor bundled behind one configuration, so both images
/// of a pair get the identical treatment.
pub struct FeatureExtractor {
    detector: GfttParams,
    extractor: BriefExtractor,
}

impl FeatureExtractor {
    pub fn new(detector: GfttParams, descriptor: BriefParams) -> Self {
        Self {
            detector,
            extractor: BriefExtractor::new(descriptor),
        }
    }

    /// Detect keypoints in the masked region and describe them.
    ///
    /// An image without corners yields an empty set, not an error.
    pub fn extract(&self, image: &GrayImage, mask: Option<&GrayImage>) -> Result<Descriptors> {
        let keypoints = gftt_detect(image, mask, &self.detector)?;
        Ok(self.extractor.compute(image, &keypoints))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(GfttParams::default(), BriefParams::default())
    }
}
