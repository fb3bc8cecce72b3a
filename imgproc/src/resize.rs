use image::RgbaImage;
use rayon::prelude::*;

/// Bilinear resize of an RGBA image.
pub fn resize_rgba(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }

    let src_width = src.width() as f32 - 1.0;
    let src_height = src.height() as f32 - 1.0;
    let dst_width = (width.max(2) - 1) as f32;
    let dst_height = (height.max(2) - 1) as f32;

    if src_width <= 0.0 || src_height <= 0.0 {
        let px = *src.get_pixel(0, 0);
        return RgbaImage::from_pixel(width, height, px);
    }

    let mut data = vec![0u8; (width * height * 4) as usize];

    data.par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let fx = (x as f32 / dst_width) * src_width;
                let fy = (y as f32 / dst_height) * src_height;

                let x0 = fx as u32;
                let y0 = fy as u32;
                let x1 = (x0 + 1).min(src.width() - 1);
                let y1 = (y0 + 1).min(src.height() - 1);

                let dx = fx - x0 as f32;
                let dy = fy - y0 as f32;

                for c in 0..4 {
                    let v00 = src.get_pixel(x0, y0)[c] as f32;
                    let v10 = src.get_pixel(x1, y0)[c] as f32;
                    let v01 = src.get_pixel(x0, y1)[c] as f32;
                    let v11 = src.get_pixel(x1, y1)[c] as f32;

                    let v0 = v00 * (1.0 - dx) + v10 * dx;
                    let v1 = v01 * (1.0 - dx) + v11 * dx;
                    let v = v0 * (1.0 - dy) + v1 * dy;

                    row[x as usize * 4 + c] = v.clamp(0.0, 255.0) as u8;
                }
            }
        });

    RgbaImage::from_raw(width, height, data).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn resize_to_same_size_keeps_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, Rgba([10, 20, 30, 255]));

        let out = resize_rgba(&img, 4, 4);
        assert_eq!(out.get_pixel(1, 2).0, [10, 20, 30, 255]);
    }

    #[test]
    fn downscale_halves_dimensions() {
        let img = RgbaImage::from_pixel(8, 6, Rgba([50, 60, 70, 255]));
        let out = resize_rgba(&img, 4, 3);

        assert_eq!(out.dimensions(), (4, 3));
        for px in out.pixels() {
            assert_eq!(px.0, [50, 60, 70, 255]);
        }
    }

    #[test]
    fn corner_pixels_map_to_corners() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(9, 9, Rgba([0, 255, 0, 255]));

        let out = resize_rgba(&img, 5, 5);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(4, 4).0, [0, 255, 0, 255]);
    }

    #[test]
    fn single_pixel_source_broadcasts() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 8, 7, 255]));
        let out = resize_rgba(&img, 3, 3);

        assert_eq!(out.dimensions(), (3, 3));
        assert_eq!(out.get_pixel(2, 1).0, [9, 8, 7, 255]);
    }
}
