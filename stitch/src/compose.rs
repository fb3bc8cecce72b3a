use image::RgbaImage;
use nalgebra::Matrix3;
use pano_imgproc::warp_perspective_rgba;

use crate::{Result, StitchError};

/// Composite the aligned pair onto one canvas.
///
/// `homography` maps right-image coordinates into the left image's frame.
/// The canvas spans `(width_l + width_r) x height_l`; the right image is
/// warped into it, then the left image is laid over the top-left corner,
/// overwriting the warped content there. Uncovered pixels stay transparent.
pub fn compose(
    left: &RgbaImage,
    right: &RgbaImage,
    homography: &Matrix3<f64>,
) -> Result<RgbaImage> {
    let out_width = left.width() + right.width();
    let out_height = left.height();

    // The warp takes a canvas-to-source map, so invert here.
    let inverse = homography
        .try_inverse()
        .ok_or(StitchError::DegenerateHomography)?;
    let mut canvas = warp_perspective_rgba(right, &inverse, out_width, out_height);

    for y in 0..left.height() {
        for x in 0..left.width() {
            canvas.put_pixel(x, y, *left.get_pixel(x, y));
        }
    }

    Ok(canvas)
}
