//! Two-image panorama stitching.
//!
//! Feeds a pair of overlapping photos through normalization, masked corner
//! detection, descriptor matching and robust homography estimation, then
//! composites the right image onto the left image's frame. Every run yields
//! the five step renders of [`StitchResult`] or fails with a [`StitchError`].

pub mod adapter;
pub mod compose;
pub mod config;
pub mod pipeline;
pub mod result;

pub use adapter::*;
pub use compose::*;
pub use config::*;
pub use pipeline::*;
pub use result::*;

pub use pano_core::{FeatureMatch, KeyPoint, Matches};
pub use pano_features::{BriefParams, GfttParams, HomographyEstimate, RansacConfig};

pub type Result<T> = std::result::Result<T, StitchError>;

#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Empty feature set: {left} left keypoints, {right} right keypoints")]
    EmptyFeatureSet { left: usize, right: usize },

    #[error("Insufficient matches: found {found}, required {required}")]
    InsufficientMatches { found: usize, required: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Degenerate homography: transform is not invertible")]
    DegenerateHomography,

    #[error("Image processing error: {0}")]
    Imgproc(#[from] pano_imgproc::ImgprocError),

    #[error("Feature error: {0}")]
    Feature(#[from] pano_features::FeatureError),
}
