use crate::color::gray_to_rgba;
use image::{GrayImage, Rgba, RgbaImage};
use pano_core::{KeyPoints, Matches};
use std::cmp::max;

/// Color used for keypoint and match overlays.
pub const MATCH_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Place two RGBA images side by side on a shared canvas.
///
/// The canvas height is the taller of the two; the gap below the shorter
/// image stays zero-filled.
pub fn hstack_rgba(left: &RgbaImage, right: &RgbaImage) -> RgbaImage {
    let (w1, h1) = left.dimensions();
    let (w2, h2) = right.dimensions();

    let mut output = RgbaImage::new(w1 + w2, max(h1, h2));

    for y in 0..h1 {
        for x in 0..w1 {
            output.put_pixel(x, y, *left.get_pixel(x, y));
        }
    }
    for y in 0..h2 {
        for x in 0..w2 {
            output.put_pixel(x + w1, y, *right.get_pixel(x, y));
        }
    }

    output
}

/// Draw keypoints as small filled circles, offset horizontally by `offset_x`.
pub fn draw_keypoints(canvas: &mut RgbaImage, keypoints: &KeyPoints, offset_x: u32, color: Rgba<u8>) {
    for kp in keypoints.iter() {
        let center = (
            kp.x.round() as i32 + offset_x as i32,
            kp.y.round() as i32,
        );
        draw_circle(canvas, center, 3, color);
    }
}

/// Draw matches between two grayscale images side-by-side.
///
/// Returns an RGBA canvas with a line per match and dots at its endpoints.
/// Unmatched keypoints are not drawn.
pub fn draw_matches(
    left: &GrayImage,
    left_kps: &KeyPoints,
    right: &GrayImage,
    right_kps: &KeyPoints,
    matches: &Matches,
    color: Rgba<u8>,
) -> RgbaImage {
    let left_rgba = gray_to_rgba(left);
    let right_rgba = gray_to_rgba(right);
    let mut output = hstack_rgba(&left_rgba, &right_rgba);

    let w1 = left.width();

    for m in matches.iter() {
        let kp1 = left_kps.keypoints[m.query_idx as usize];
        let kp2 = right_kps.keypoints[m.train_idx as usize];

        let p1 = (kp1.x.round() as i32, kp1.y.round() as i32);
        let p2 = ((kp2.x.round() as i32) + w1 as i32, kp2.y.round() as i32);

        draw_line_segment(&mut output, p1, p2, color);
        draw_circle(&mut output, p1, 2, color);
        draw_circle(&mut output, p2, 2, color);
    }

    output
}

// Simple Bresenham's line algorithm
fn draw_line_segment(img: &mut RgbaImage, p1: (i32, i32), p2: (i32, i32), color: Rgba<u8>) {
    let (mut x0, mut y0) = p1;
    let (x1, y1) = p2;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && x0 < img.width() as i32 && y0 >= 0 && y0 < img.height() as i32 {
            img.put_pixel(x0 as u32, y0 as u32, color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

// Simple filled circle
fn draw_circle(img: &mut RgbaImage, center: (i32, i32), radius: i32, color: Rgba<u8>) {
    let (cx, cy) = center;
    let r2 = radius * radius;

    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if (x - cx).pow(2) + (y - cy).pow(2) <= r2
                && x >= 0
                && x < img.width() as i32
                && y >= 0
                && y < img.height() as i32
            {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
