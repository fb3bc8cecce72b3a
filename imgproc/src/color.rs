use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

/// Convert an RGBA image to grayscale with the BT.601 luma weights.
pub fn rgba_to_gray(rgba: &RgbaImage) -> GrayImage {
    let (w, h) = rgba.dimensions();
    let count = (w * h) as usize;
    let mut gray_data = vec![0u8; count];
    let rgba_data = rgba.as_raw();

    gray_data
        .par_iter_mut()
        .zip(rgba_data.par_chunks(4))
        .for_each(|(g, px)| {
            let luma =
                0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            *g = luma.round().clamp(0.0, 255.0) as u8;
        });

    GrayImage::from_raw(w, h, gray_data).unwrap()
}

/// Expand a grayscale image into opaque RGBA.
pub fn gray_to_rgba(gray: &GrayImage) -> RgbaImage {
    let (w, h) = gray.dimensions();
    let count = (w * h) as usize;
    let mut rgba_data = vec![0u8; count * 4];
    let gray_data = gray.as_raw();

    rgba_data
        .par_chunks_mut(4)
        .zip(gray_data.par_iter())
        .for_each(|(px, &g)| {
            px[0] = g;
            px[1] = g;
            px[2] = g;
            px[3] = 255;
        });

    RgbaImage::from_raw(w, h, rgba_data).unwrap()
}
