pub mod color;
pub mod draw;
pub mod geometry;
pub mod mask;
pub mod resize;

pub use color::*;
pub use draw::*;
pub use geometry::*;
pub use mask::*;
pub use resize::*;

pub type Result<T> = std::result::Result<T, ImgprocError>;

#[derive(Debug, thiserror::Error)]
pub enum ImgprocError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}

pub fn validate_image_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImgprocError::DimensionMismatch(
            "Image dimensions must be non-zero".into(),
        ));
    }
    Ok(())
}
