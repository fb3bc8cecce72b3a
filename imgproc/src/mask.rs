use crate::{validate_image_size, ImgprocError, Result};
use image::GrayImage;
use rayon::prelude::*;

/// Build a detection mask that admits a vertical band of columns.
///
/// Columns `i` with `floor(min_frac * width) <= i < floor(max_frac * width)`
/// are set to 255, everything else to 0. `min_frac == max_frac` yields an
/// all-zero mask.
pub fn column_band_mask(width: u32, height: u32, min_frac: f64, max_frac: f64) -> Result<GrayImage> {
    validate_image_size(width, height)?;

    if !(0.0..=1.0).contains(&min_frac) || !(0.0..=1.0).contains(&max_frac) {
        return Err(ImgprocError::InvalidRange(format!(
            "column band fractions must lie in [0, 1], got ({min_frac}, {max_frac})"
        )));
    }
    if min_frac > max_frac {
        return Err(ImgprocError::InvalidRange(format!(
            "column band min {min_frac} exceeds max {max_frac}"
        )));
    }

    let x_min = (min_frac * width as f64) as usize;
    let x_max = (max_frac * width as f64) as usize;

    let mut data = vec![0u8; (width * height) as usize];
    data.par_chunks_mut(width as usize).for_each(|row| {
        for v in &mut row[x_min..x_max] {
            *v = 255;
        }
    });

    GrayImage::from_raw(width, height, data)
        .ok_or_else(|| ImgprocError::DimensionMismatch("mask buffer size mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed_columns(mask: &GrayImage) -> Vec<u32> {
        (0..mask.width())
            .filter(|&x| mask.get_pixel(x, 0)[0] == 255)
            .collect()
    }

    #[test]
    fn right_half_band() {
        let mask = column_band_mask(10, 4, 0.5, 1.0).unwrap();
        assert_eq!(allowed_columns(&mask), vec![5, 6, 7, 8, 9]);

        for y in 0..4 {
            assert_eq!(mask.get_pixel(4, y)[0], 0);
            assert_eq!(mask.get_pixel(5, y)[0], 255);
        }
    }

    #[test]
    fn left_half_band() {
        let mask = column_band_mask(10, 4, 0.0, 0.5).unwrap();
        assert_eq!(allowed_columns(&mask), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn fractional_bounds_floor_to_columns() {
        let mask = column_band_mask(7, 2, 0.3, 0.8).unwrap();
        // floor(0.3 * 7) = 2, floor(0.8 * 7) = 5
        assert_eq!(allowed_columns(&mask), vec![2, 3, 4]);
    }

    #[test]
    fn empty_band_is_all_zero() {
        let mask = column_band_mask(8, 3, 0.5, 0.5).unwrap();
        assert!(allowed_columns(&mask).is_empty());
    }

    #[test]
    fn full_band_admits_every_column() {
        let mask = column_band_mask(6, 2, 0.0, 1.0).unwrap();
        assert_eq!(allowed_columns(&mask).len(), 6);
    }

    #[test]
    fn out_of_range_fractions_are_rejected() {
        assert!(column_band_mask(8, 3, -0.1, 0.5).is_err());
        assert!(column_band_mask(8, 3, 0.0, 1.5).is_err());
        assert!(column_band_mask(8, 3, 0.8, 0.2).is_err());
        assert!(column_band_mask(0, 3, 0.0, 1.0).is_err());
    }
}
