use image::{GrayImage, RgbaImage};
use nalgebra::{Matrix3, Point2};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    Constant(u8),
    Replicate,
}

/// Apply a 3x3 projective matrix to a point.
pub fn transform_point(matrix: &Matrix3<f64>, pt: &Point2<f64>) -> Point2<f64> {
    let x = pt.x;
    let y = pt.y;

    let w = matrix[(2, 0)] * x + matrix[(2, 1)] * y + matrix[(2, 2)];

    if w.abs() > 1e-10 {
        Point2::new(
            (matrix[(0, 0)] * x + matrix[(0, 1)] * y + matrix[(0, 2)]) / w,
            (matrix[(1, 0)] * x + matrix[(1, 1)] * y + matrix[(1, 2)]) / w,
        )
    } else {
        Point2::new(
            matrix[(0, 0)] * x + matrix[(0, 1)] * y + matrix[(0, 2)],
            matrix[(1, 0)] * x + matrix[(1, 1)] * y + matrix[(1, 2)],
        )
    }
}

fn sample_pixel(img: &GrayImage, x: isize, y: isize, border: BorderMode) -> f32 {
    let width = img.width() as isize;
    let height = img.height() as isize;

    match border {
        BorderMode::Constant(v) => {
            if x < 0 || x >= width || y < 0 || y >= height {
                v as f32
            } else {
                img.get_pixel(x as u32, y as u32)[0] as f32
            }
        }
        BorderMode::Replicate => {
            let cx = x.clamp(0, width - 1);
            let cy = y.clamp(0, height - 1);
            img.get_pixel(cx as u32, cy as u32)[0] as f32
        }
    }
}

fn get_pixel_bilinear(img: &GrayImage, x: f32, y: f32, border: BorderMode) -> f32 {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let v00 = sample_pixel(img, x0, y0, border);
    let v10 = sample_pixel(img, x1, y0, border);
    let v01 = sample_pixel(img, x0, y1, border);
    let v11 = sample_pixel(img, x1, y1, border);

    let v0 = v00 * (1.0 - fx) + v10 * fx;
    let v1 = v01 * (1.0 - fx) + v11 * fx;

    v0 * (1.0 - fy) + v1 * fy
}

fn sample_pixel_rgba(img: &RgbaImage, x: isize, y: isize) -> [f32; 4] {
    let width = img.width() as isize;
    let height = img.height() as isize;

    if x < 0 || x >= width || y < 0 || y >= height {
        return [0.0; 4];
    }

    let px = img.get_pixel(x as u32, y as u32);
    [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32]
}

fn get_pixel_bilinear_rgba(img: &RgbaImage, x: f32, y: f32) -> [f32; 4] {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let v00 = sample_pixel_rgba(img, x0, y0);
    let v10 = sample_pixel_rgba(img, x1, y0);
    let v01 = sample_pixel_rgba(img, x0, y1);
    let v11 = sample_pixel_rgba(img, x1, y1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let v0 = v00[c] * (1.0 - fx) + v10[c] * fx;
        let v1 = v01[c] * (1.0 - fx) + v11[c] * fx;
        out[c] = v0 * (1.0 - fy) + v1 * fy;
    }
    out
}

/// Perspective warp of a grayscale image.
///
/// `matrix` maps destination coordinates into source coordinates.
pub fn warp_perspective(
    src: &GrayImage,
    matrix: &Matrix3<f64>,
    width: u32,
    height: u32,
) -> GrayImage {
    warp_perspective_ex(src, matrix, width, height, BorderMode::Constant(0))
}

pub fn warp_perspective_ex(
    src: &GrayImage,
    matrix: &Matrix3<f64>,
    width: u32,
    height: u32,
    border: BorderMode,
) -> GrayImage {
    let mut data = vec![0u8; (width * height) as usize];

    data.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let pt = Point2::new(x as f64, y as f64);
                let src_pt = transform_point(matrix, &pt);
                let val = get_pixel_bilinear(src, src_pt.x as f32, src_pt.y as f32, border);
                row[x as usize] = val.clamp(0.0, 255.0) as u8;
            }
        });

    GrayImage::from_raw(width, height, data).unwrap()
}

/// Perspective warp of an RGBA image.
///
/// `matrix` maps destination coordinates into source coordinates. Pixels
/// mapping outside the source stay transparent black.
pub fn warp_perspective_rgba(
    src: &RgbaImage,
    matrix: &Matrix3<f64>,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut data = vec![0u8; (width * height * 4) as usize];

    data.par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let pt = Point2::new(x as f64, y as f64);
                let src_pt = transform_point(matrix, &pt);
                let px = get_pixel_bilinear_rgba(src, src_pt.x as f32, src_pt.y as f32);
                for c in 0..4 {
                    row[x as usize * 4 + c] = px[c].clamp(0.0, 255.0) as u8;
                }
            }
        });

    RgbaImage::from_raw(width, height, data).unwrap()
}
