use crate::{FeatureError, Result};
use image::GrayImage;
use pano_core::{KeyPoint, KeyPoints};

#[derive(Debug, Clone)]
pub struct GfttParams {
    pub max_corners: usize,
    pub quality_level: f64,
    pub min_distance: f64,
}

impl Default for GfttParams {
    fn default() -> Self {
        Self {
            max_corners: 1000,
            quality_level: 0.01,
            min_distance: 1.0,
        }
    }
}

/// Shi-Tomasi (minimum eigenvalue) corner detection.
///
/// Candidates below `quality_level` times the strongest response are
/// discarded; survivors are kept in descending response order subject to
/// `min_distance` spacing and the `max_corners` cap. When a mask is given,
/// only pixels with a non-zero mask value can become keypoints.
pub fn gftt_detect(
    image: &GrayImage,
    mask: Option<&GrayImage>,
    params: &GfttParams,
) -> Result<KeyPoints> {
    if let Some(m) = mask {
        if m.dimensions() != image.dimensions() {
            return Err(FeatureError::DetectionError(format!(
                "mask dimensions {:?} do not match image {:?}",
                m.dimensions(),
                image.dimensions()
            )));
        }
    }

    let width = image.width() as i32;
    let height = image.height() as i32;
    let half_window = 1i32;

    let mut scores = Vec::new();
    let mut max_score = 0.0f64;

    for y in (half_window + 1)..(height - half_window - 1) {
        for x in (half_window + 1)..(width - half_window - 1) {
            if let Some(m) = mask {
                if m.get_pixel(x as u32, y as u32)[0] == 0 {
                    continue;
                }
            }

            let mut i_xx = 0.0f64;
            let mut i_yy = 0.0f64;
            let mut i_xy = 0.0f64;

            for by in -half_window..=half_window {
                for bx in -half_window..=half_window {
                    let gx = image.get_pixel((x + bx + 1) as u32, (y + by) as u32)[0] as f64
                        - image.get_pixel((x + bx - 1) as u32, (y + by) as u32)[0] as f64;
                    let gy = image.get_pixel((x + bx) as u32, (y + by + 1) as u32)[0] as f64
                        - image.get_pixel((x + bx) as u32, (y + by - 1) as u32)[0] as f64;

                    i_xx += gx * gx;
                    i_yy += gy * gy;
                    i_xy += gx * gy;
                }
            }

            // Min eigenvalue of the 2x2 gradient covariance
            let trace = i_xx + i_yy;
            let term = ((i_xx - i_yy).powi(2) + 4.0 * i_xy * i_xy).sqrt();
            let lambda_min = (trace - term) * 0.5;

            if lambda_min > 0.0 {
                if lambda_min > max_score {
                    max_score = lambda_min;
                }
                scores.push((x, y, lambda_min));
            }
        }
    }

    let threshold = max_score * params.quality_level;
    let mut candidates: Vec<_> = scores
        .into_iter()
        .filter(|&(_, _, s)| s >= threshold)
        .collect();

    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut corners = KeyPoints::new();
    let min_dist_sq = params.min_distance * params.min_distance;

    for (x, y, score) in candidates {
        if corners.len() >= params.max_corners {
            break;
        }

        let mut too_close = false;
        for kp in corners.keypoints.iter() {
            let dx = (x as f64) - kp.x;
            let dy = (y as f64) - kp.y;
            if dx * dx + dy * dy < min_dist_sq {
                too_close = true;
                break;
            }
        }

        if !too_close {
            corners.push(KeyPoint::new(x as f64, y as f64).with_response(score));
        }
    }

    Ok(corners)
}
