use image::{GrayImage, Rgba, RgbaImage};
use pano_core::KeyPoints;
use pano_features::{
    estimate_homography, FeatureError, FeatureExtractor, MatchType, Matcher,
};
use pano_imgproc::{
    column_band_mask, draw_keypoints, draw_matches, gray_to_rgba, hstack_rgba, rgba_to_gray,
};

use crate::adapter::{decode_image, normalize};
use crate::compose::compose;
use crate::config::StitchConfig;
use crate::result::StitchResult;
use crate::{Result, StitchError};

/// Runs the whole pipeline for one pair of photos.
///
/// `run` is synchronous and long-running; callers wanting a responsive
/// thread should move the call onto a worker and collect the result over
/// a channel. A stitcher holds no per-run state and can be reused.
pub struct Stitcher {
    config: StitchConfig,
    extractor: FeatureExtractor,
    matcher: Matcher,
}

impl Stitcher {
    pub fn new(config: StitchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: StitchConfig) -> Self {
        let extractor =
            FeatureExtractor::new(config.detector.clone(), config.descriptor.clone());
        let matcher = Matcher::new(MatchType::BruteForceHamming)
            .with_distance_band(config.match_distance_band);
        Self {
            config,
            extractor,
            matcher,
        }
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    /// Decode two encoded images and stitch them.
    pub fn run_bytes(&self, left: &[u8], right: &[u8]) -> Result<StitchResult> {
        let left = decode_image(left)?;
        let right = decode_image(right)?;
        self.run(&left, &right)
    }

    /// Stitch a decoded pair, yielding all five step renders.
    ///
    /// The left image anchors the output frame; the right image is warped
    /// onto it. Fails without a partial result when any stage cannot
    /// proceed.
    pub fn run(&self, left: &RgbaImage, right: &RgbaImage) -> Result<StitchResult> {
        let left = normalize(left, self.config.max_dimension);
        let right = normalize(right, self.config.max_dimension);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            left_w = left.width(),
            left_h = left.height(),
            right_w = right.width(),
            right_h = right.height(),
            "normalized input pair"
        );

        let step_original = hstack_rgba(&left, &right);

        let left_gray = rgba_to_gray(&left);
        let right_gray = rgba_to_gray(&right);

        let (left_min, left_max) = self.config.left_band;
        let (right_min, right_max) = self.config.right_band;
        let left_mask = column_band_mask(left.width(), left.height(), left_min, left_max)?;
        let right_mask = column_band_mask(right.width(), right.height(), right_min, right_max)?;

        let left_descs = self.extractor.extract(&left_gray, Some(&left_mask))?;
        let right_descs = self.extractor.extract(&right_gray, Some(&right_mask))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            left = left_descs.len(),
            right = right_descs.len(),
            "extracted features"
        );

        if left_descs.is_empty() || right_descs.is_empty() {
            return Err(StitchError::EmptyFeatureSet {
                left: left_descs.len(),
                right: right_descs.len(),
            });
        }

        let left_kps = left_descs.keypoints();
        let right_kps = right_descs.keypoints();

        let step_keypoints = render_keypoint_pair(
            &left_gray,
            &right_gray,
            &left_kps,
            &right_kps,
            self.config.match_color,
        );

        let matches = self.matcher.match_descriptors(&left_descs, &right_descs)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(kept = matches.len(), "matched descriptors");

        if matches.len() < self.config.min_matches {
            return Err(StitchError::InsufficientMatches {
                found: matches.len(),
                required: self.config.min_matches,
            });
        }

        let step_matches = draw_matches(
            &left_gray,
            &left_kps,
            &right_gray,
            &right_kps,
            &matches,
            self.config.match_color,
        );

        let estimate =
            estimate_homography(&left_descs, &right_descs, &matches, &self.config.ransac)
                .map_err(|e| match e {
                    FeatureError::InsufficientMatches { found, required } => {
                        StitchError::InsufficientMatches { found, required }
                    }
                    other => StitchError::Feature(other),
                })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            inliers = estimate.num_inliers,
            residual = estimate.residual,
            "estimated homography"
        );

        let inlier_matches = estimate.inlier_matches(&matches);
        let step_inliers = draw_matches(
            &left_gray,
            &left_kps,
            &right_gray,
            &right_kps,
            &inlier_matches,
            self.config.match_color,
        );

        let composite = compose(&left, &right, &estimate.matrix)?;

        Ok(StitchResult::new([
            step_original,
            step_keypoints,
            step_matches,
            step_inliers,
            composite,
        ]))
    }
}

impl Default for Stitcher {
    fn default() -> Self {
        Self::from_parts(StitchConfig::default())
    }
}

fn render_keypoint_pair(
    left: &GrayImage,
    right: &GrayImage,
    left_kps: &KeyPoints,
    right_kps: &KeyPoints,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = hstack_rgba(&gray_to_rgba(left), &gray_to_rgba(right));
    draw_keypoints(&mut canvas, left_kps, 0, color);
    draw_keypoints(&mut canvas, right_kps, left.width(), color);
    canvas
}
