use image::Rgba;
use pano_features::{BriefParams, GfttParams, RansacConfig};
use pano_imgproc::MATCH_COLOR;

use crate::{Result, StitchError};

/// Tunables for one stitching run.
///
/// The band fractions restrict feature search to the halves facing the
/// shared edge: right half of the left photo, left half of the right photo.
#[derive(Debug, Clone)]
pub struct StitchConfig {
    /// Inputs whose larger dimension exceeds this are downscaled to it.
    pub max_dimension: u32,
    /// Detection band of the left image, as column fractions `[min, max)`.
    pub left_band: (f64, f64),
    /// Detection band of the right image, as column fractions `[min, max)`.
    pub right_band: (f64, f64),
    /// Matches farther than this multiple of the best distance are dropped.
    pub match_distance_band: f32,
    /// Fewer surviving matches than this aborts the run.
    pub min_matches: usize,
    pub detector: GfttParams,
    pub descriptor: BriefParams,
    pub ransac: RansacConfig,
    /// Color of keypoints and match lines in the step renders.
    pub match_color: Rgba<u8>,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1024,
            left_band: (0.5, 1.0),
            right_band: (0.0, 0.5),
            match_distance_band: 3.0,
            min_matches: 4,
            detector: GfttParams::default(),
            descriptor: BriefParams::default(),
            ransac: RansacConfig::default(),
            match_color: MATCH_COLOR,
        }
    }
}

impl StitchConfig {
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_bands(mut self, left: (f64, f64), right: (f64, f64)) -> Self {
        self.left_band = left;
        self.right_band = right;
        self
    }

    pub fn with_match_distance_band(mut self, band: f32) -> Self {
        self.match_distance_band = band;
        self
    }

    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches;
        self
    }

    pub fn with_detector(mut self, detector: GfttParams) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_descriptor(mut self, descriptor: BriefParams) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_ransac(mut self, ransac: RansacConfig) -> Self {
        self.ransac = ransac;
        self
    }

    pub fn with_match_color(mut self, color: Rgba<u8>) -> Self {
        self.match_color = color;
        self
    }

    /// Reject out-of-range settings before any pixels are touched.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(StitchError::InvalidConfiguration(
                "maximum dimension must be at least 1".into(),
            ));
        }
        check_band("left", self.left_band)?;
        check_band("right", self.right_band)?;
        if !self.match_distance_band.is_finite() || self.match_distance_band <= 0.0 {
            return Err(StitchError::InvalidConfiguration(format!(
                "match distance band must be positive, got {}",
                self.match_distance_band
            )));
        }
        if self.min_matches < 4 {
            return Err(StitchError::InvalidConfiguration(format!(
                "minimum match count must be at least 4, got {}",
                self.min_matches
            )));
        }
        if self.detector.max_corners == 0 {
            return Err(StitchError::InvalidConfiguration(
                "corner budget must be at least 1".into(),
            ));
        }
        if self.descriptor.bytes == 0 {
            return Err(StitchError::InvalidConfiguration(
                "descriptor length must be at least 1 byte".into(),
            ));
        }
        if self.descriptor.patch_size < 2 {
            return Err(StitchError::InvalidConfiguration(format!(
                "descriptor patch must span at least 2 pixels, got {}",
                self.descriptor.patch_size
            )));
        }
        if !self.ransac.threshold.is_finite() || self.ransac.threshold <= 0.0 {
            return Err(StitchError::InvalidConfiguration(format!(
                "reprojection threshold must be positive, got {}",
                self.ransac.threshold
            )));
        }
        if self.ransac.max_iterations == 0 {
            return Err(StitchError::InvalidConfiguration(
                "iteration budget must be at least 1".into(),
            ));
        }
        if !(self.ransac.confidence > 0.0 && self.ransac.confidence < 1.0) {
            return Err(StitchError::InvalidConfiguration(format!(
                "confidence must lie strictly between 0 and 1, got {}",
                self.ransac.confidence
            )));
        }
        Ok(())
    }
}

fn check_band(which: &str, (min, max): (f64, f64)) -> Result<()> {
    let in_range = (0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max);
    if !in_range || min > max {
        return Err(StitchError::InvalidConfiguration(format!(
            "{which} band fractions must satisfy 0 <= min <= max <= 1, got ({min}, {max})"
        )));
    }
    Ok(())
}
