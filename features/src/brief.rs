use crate::descriptor::{Descriptor, DescriptorExtractor, Descriptors};
use image::GrayImage;
use pano_core::{KeyPoint, KeyPoints};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default seed for the point-pair test pattern. Both images of a run (and
/// repeated runs) must sample the identical pattern.
pub const DEFAULT_BRIEF_SEED: u64 = 0x0B5E_55ED_1234_5678;

#[derive(Debug, Clone)]
pub struct BriefParams {
    /// Descriptor length in bytes (8 comparisons each).
    pub bytes: usize,
    /// Side length of the square sampling patch around a keypoint.
    pub patch_size: i32,
    pub seed: u64,
}

impl Default for BriefParams {
    fn default() -> Self {
        Self {
            bytes: 32,
            patch_size: 48,
            seed: DEFAULT_BRIEF_SEED,
        }
    }
}

/// BRIEF binary descriptor with a fixed, seeded sampling pattern.
pub struct BriefExtractor {
    params: BriefParams,
    pattern: Vec<[(i32, i32); 2]>,
}

impl BriefExtractor {
    pub fn new(params: BriefParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let half = params.patch_size / 2;

        let pattern = (0..params.bytes * 8)
            .map(|_| {
                let p1 = (rng.gen_range(-half..half), rng.gen_range(-half..half));
                let p2 = (rng.gen_range(-half..half), rng.gen_range(-half..half));
                [p1, p2]
            })
            .collect();

        Self { params, pattern }
    }

    /// Describe every keypoint whose patch lies fully inside the image.
    ///
    /// Keypoints too close to the border are dropped, so the returned set
    /// can be smaller than the input.
    pub fn compute(&self, image: &GrayImage, keypoints: &KeyPoints) -> Descriptors {
        keypoints
            .iter()
            .filter_map(|kp| self.compute_single(image, kp))
            .collect()
    }

    fn compute_single(&self, image: &GrayImage, kp: &KeyPoint) -> Option<Descriptor> {
        let x = kp.x.round() as i32;
        let y = kp.y.round() as i32;

        // Patch plus the one-pixel smoothing apron must stay inside
        let margin = self.params.patch_size / 2 + 1;
        if x < margin
            || y < margin
            || x >= image.width() as i32 - margin
            || y >= image.height() as i32 - margin
        {
            return None;
        }

        let mut data = vec![0u8; self.params.bytes];

        for (i, pair) in self.pattern.iter().enumerate() {
            let byte_idx = i / 8;
            let bit_idx = i % 8;

            let v1 = smoothed_intensity(image, x + pair[0].0, y + pair[0].1);
            let v2 = smoothed_intensity(image, x + pair[1].0, y + pair[1].1);

            if v1 > v2 {
                data[byte_idx] |= 1 << bit_idx;
            }
        }

        Some(Descriptor::new(data, *kp))
    }
}

impl DescriptorExtractor for BriefExtractor {
    fn extract(&self, image: &GrayImage, keypoints: &KeyPoints) -> Descriptors {
        self.compute(image, keypoints)
    }
}

/// 3x3 box sum around the sample point. Callers guarantee the window is in
/// bounds.
fn smoothed_intensity(image: &GrayImage, x: i32, y: i32) -> u32 {
    let mut sum = 0u32;
    for dy in -1..=1 {
        for dx in -1..=1 {
            sum += image.get_pixel((x + dx) as u32, (y + dy) as u32)[0] as u32;
        }
    }
    sum
}
