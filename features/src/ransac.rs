//! Robust homography estimation from feature matches.
//!
//! Plugs a normalized-DLT homography model into the generic RANSAC engine
//! and returns the consensus transform together with per-match inlier flags.

use crate::descriptor::Descriptors;
use crate::{FeatureError, Result};
use nalgebra::{DMatrix, Matrix3, Vector3};
use pano_core::{Matches, Ransac, RobustConfig, RobustModel};

pub type RansacConfig = RobustConfig;

#[derive(Clone, Debug)]
pub struct MatchPair {
    pub src: (f64, f64),
    pub dst: (f64, f64),
}

pub struct HomographyEstimator;

impl RobustModel<MatchPair> for HomographyEstimator {
    type Model = Matrix3<f64>;

    fn min_sample_size(&self) -> usize {
        4
    }

    fn is_degenerate(&self, sample: &[&MatchPair]) -> bool {
        has_collinear_triple(sample, |m| m.src) || has_collinear_triple(sample, |m| m.dst)
    }

    fn estimate(&self, data: &[&MatchPair]) -> Option<Self::Model> {
        let pairs: Vec<MatchPair> = data.iter().map(|m| (*m).clone()).collect();
        fit_homography(&pairs)
    }

    fn compute_error(&self, model: &Self::Model, data: &MatchPair) -> f64 {
        let p1 = Vector3::new(data.src.0, data.src.1, 1.0);
        let p2_pred = model * p1;
        if p2_pred[2].abs() > 1e-10 {
            let x2_pred = p2_pred[0] / p2_pred[2];
            let y2_pred = p2_pred[1] / p2_pred[2];
            ((x2_pred - data.dst.0).powi(2) + (y2_pred - data.dst.1).powi(2)).sqrt()
        } else {
            f64::INFINITY
        }
    }
}

fn has_collinear_triple(sample: &[&MatchPair], point: impl Fn(&MatchPair) -> (f64, f64)) -> bool {
    let n = sample.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let (ax, ay) = point(sample[i]);
                let (bx, by) = point(sample[j]);
                let (cx, cy) = point(sample[k]);

                let abx = bx - ax;
                let aby = by - ay;
                let acx = cx - ax;
                let acy = cy - ay;

                let cross = (abx * acy - aby * acx).abs();
                let ab = (abx * abx + aby * aby).sqrt();
                let ac = (acx * acx + acy * acy).sqrt();
                if cross <= 1e-6 * ab * ac {
                    return true;
                }
            }
        }
    }
    false
}

/// Fit a homography to all given pairs by normalized DLT.
fn fit_homography(pairs: &[MatchPair]) -> Option<Matrix3<f64>> {
    if pairs.len() < 4 {
        return None;
    }

    let (t_src, src_norm) = normalize_points(pairs.iter().map(|m| m.src))?;
    let (t_dst, dst_norm) = normalize_points(pairs.iter().map(|m| m.dst))?;

    let n = pairs.len();
    let mut a = vec![0.0f64; n * 2 * 9];
    for i in 0..n {
        let (x1, y1) = src_norm[i];
        let (x2, y2) = dst_norm[i];
        let row1 = i * 2;
        let row2 = i * 2 + 1;
        a[row1 * 9] = -x1;
        a[row1 * 9 + 1] = -y1;
        a[row1 * 9 + 2] = -1.0;
        a[row1 * 9 + 6] = x2 * x1;
        a[row1 * 9 + 7] = x2 * y1;
        a[row1 * 9 + 8] = x2;
        a[row2 * 9 + 3] = -x1;
        a[row2 * 9 + 4] = -y1;
        a[row2 * 9 + 5] = -1.0;
        a[row2 * 9 + 6] = y2 * x1;
        a[row2 * 9 + 7] = y2 * y1;
        a[row2 * 9 + 8] = y2;
    }

    let h_norm = solve_dlt(&a, n * 2)?;
    let h = t_dst.try_inverse()? * h_norm * t_src;

    if h[(2, 2)].abs() < 1e-12 {
        return None;
    }
    Some(h / h[(2, 2)])
}

/// Hartley normalization: translate the centroid to the origin and scale the
/// mean distance to sqrt(2).
fn normalize_points(
    points: impl Iterator<Item = (f64, f64)> + Clone,
) -> Option<(Matrix3<f64>, Vec<(f64, f64)>)> {
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut n = 0usize;
    for (x, y) in points.clone() {
        cx += x;
        cy += y;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    cx /= n as f64;
    cy /= n as f64;

    let mut mean_dist = 0.0;
    for (x, y) in points.clone() {
        mean_dist += ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    }
    mean_dist /= n as f64;
    if mean_dist < 1e-12 {
        return None;
    }

    let scale = std::f64::consts::SQRT_2 / mean_dist;
    let transform = Matrix3::new(scale, 0.0, -scale * cx, 0.0, scale, -scale * cy, 0.0, 0.0, 1.0);
    let normalized = points.map(|(x, y)| (scale * (x - cx), scale * (y - cy))).collect();
    Some((transform, normalized))
}

/// Solve A h = 0 by SVD, taking the right singular vector of the smallest
/// singular value.
fn solve_dlt(a: &[f64], n_rows: usize) -> Option<Matrix3<f64>> {
    let mut matrix = DMatrix::from_row_slice(n_rows, 9, a);

    // If underdetermined, pad with zeros to ensure we get 9 singular vectors
    if n_rows < 9 {
        let mut padded = DMatrix::zeros(9, 9);
        padded.view_mut((0, 0), (n_rows, 9)).copy_from(&matrix);
        matrix = padded;
    }

    let svd = matrix.svd(false, true);
    let v_t = svd.v_t?;
    let h_vec = v_t.row(8);

    Some(Matrix3::new(
        h_vec[0], h_vec[1], h_vec[2], h_vec[3], h_vec[4], h_vec[5], h_vec[6], h_vec[7], h_vec[8],
    ))
}

/// Consensus homography plus per-match inlier flags.
///
/// `inliers` is index-aligned with the match sequence the estimate was
/// computed from; `matrix` maps train-image coordinates into the query
/// image's frame.
#[derive(Debug, Clone)]
pub struct HomographyEstimate {
    pub matrix: Matrix3<f64>,
    pub inliers: Vec<bool>,
    pub num_inliers: usize,
    pub residual: f64,
}

impl HomographyEstimate {
    /// The subset of `matches` flagged as inliers, in order.
    pub fn inlier_matches(&self, matches: &Matches) -> Matches {
        matches
            .iter()
            .enumerate()
            .filter(|(i, _)| self.inliers.get(*i).copied().unwrap_or(false))
            .map(|(_, m)| *m)
            .collect()
    }
}

/// Estimate the homography mapping train-image points onto query-image
/// points from matched descriptors.
///
/// Fails with [`FeatureError::InsufficientMatches`] when fewer than the
/// minimal sample of matches is supplied or no consensus of that size
/// exists.
pub fn estimate_homography(
    query: &Descriptors,
    train: &Descriptors,
    matches: &Matches,
    config: &RansacConfig,
) -> Result<HomographyEstimate> {
    let required = config.min_sample_size.max(4);
    if matches.len() < required {
        return Err(FeatureError::InsufficientMatches {
            found: matches.len(),
            required,
        });
    }

    let data: Vec<MatchPair> = matches
        .iter()
        .map(|m| {
            let q = &query.descriptors[m.query_idx as usize].keypoint;
            let t = &train.descriptors[m.train_idx as usize].keypoint;
            MatchPair {
                src: (t.x, t.y),
                dst: (q.x, q.y),
            }
        })
        .collect();

    let estimator = HomographyEstimator;
    let result = Ransac::new(config.clone()).run(&estimator, &data);

    let Some(mut matrix) = result.model else {
        return Err(FeatureError::InsufficientMatches {
            found: 0,
            required,
        });
    };
    if result.num_inliers < required {
        return Err(FeatureError::InsufficientMatches {
            found: result.num_inliers,
            required,
        });
    }

    let mut inliers = result.inliers;
    let mut num_inliers = result.num_inliers;
    let mut residual = result.residual;

    // Polish by refitting on the full consensus set
    let inlier_pairs: Vec<MatchPair> = data
        .iter()
        .zip(inliers.iter())
        .filter(|(_, &keep)| keep)
        .map(|(pair, _)| pair.clone())
        .collect();

    if let Some(refined) = fit_homography(&inlier_pairs) {
        let (flags, count, err) = score_model(&estimator, &refined, &data, config.threshold);
        if count >= num_inliers {
            matrix = refined;
            inliers = flags;
            num_inliers = count;
            residual = err;
        }
    }

    Ok(HomographyEstimate {
        matrix,
        inliers,
        num_inliers,
        residual,
    })
}

fn score_model(
    estimator: &HomographyEstimator,
    model: &Matrix3<f64>,
    data: &[MatchPair],
    threshold: f64,
) -> (Vec<bool>, usize, f64) {
    let mut inliers = vec![false; data.len()];
    let mut num_inliers = 0;
    let mut total_error = 0.0;

    for (i, pair) in data.iter().enumerate() {
        let err = estimator.compute_error(model, pair);
        if err < threshold {
            inliers[i] = true;
            num_inliers += 1;
            total_error += err;
        }
    }

    let residual = if num_inliers > 0 {
        total_error / num_inliers as f64
    } else {
        f64::INFINITY
    };
    (inliers, num_inliers, residual)
}
