use image::RgbaImage;
use std::ops::Index;

/// The five renders produced by one run, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StitchStep {
    /// Both normalized inputs side by side, untouched.
    OriginalPair,
    /// Grayscale pair with the detected keypoints marked.
    Keypoints,
    /// Grayscale pair with every surviving match drawn as a line.
    Matches,
    /// Same as [`StitchStep::Matches`], restricted to consensus inliers.
    InlierMatches,
    /// The final composite.
    Composite,
}

impl StitchStep {
    pub const ALL: [StitchStep; 5] = [
        StitchStep::OriginalPair,
        StitchStep::Keypoints,
        StitchStep::Matches,
        StitchStep::InlierMatches,
        StitchStep::Composite,
    ];

    pub fn index(self) -> usize {
        match self {
            StitchStep::OriginalPair => 0,
            StitchStep::Keypoints => 1,
            StitchStep::Matches => 2,
            StitchStep::InlierMatches => 3,
            StitchStep::Composite => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StitchStep::OriginalPair => "Original Images",
            StitchStep::Keypoints => "Feature Detection",
            StitchStep::Matches => "Feature Matching",
            StitchStep::InlierMatches => "Matches for Homography",
            StitchStep::Composite => "Stitched Images",
        }
    }
}

/// Read-only bundle of the step renders from a completed run.
#[derive(Debug, Clone)]
pub struct StitchResult {
    steps: [RgbaImage; 5],
}

impl StitchResult {
    pub(crate) fn new(steps: [RgbaImage; 5]) -> Self {
        Self { steps }
    }

    pub fn step(&self, step: StitchStep) -> &RgbaImage {
        &self.steps[step.index()]
    }

    pub fn composite(&self) -> &RgbaImage {
        self.step(StitchStep::Composite)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StitchStep, &RgbaImage)> {
        StitchStep::ALL.iter().map(move |&s| (s, self.step(s)))
    }

    pub fn into_steps(self) -> [RgbaImage; 5] {
        self.steps
    }
}

impl Index<usize> for StitchResult {
    type Output = RgbaImage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_enumerate_in_pipeline_order() {
        for (i, step) in StitchStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn labels_are_distinct() {
        let labels: Vec<_> = StitchStep::ALL.iter().map(|s| s.label()).collect();
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn indexing_matches_step_access() {
        let steps = [
            RgbaImage::new(1, 1),
            RgbaImage::new(2, 1),
            RgbaImage::new(3, 1),
            RgbaImage::new(4, 1),
            RgbaImage::new(5, 1),
        ];
        let result = StitchResult::new(steps);
        assert_eq!(result[4].width(), 5);
        assert_eq!(result.composite().width(), 5);
        assert_eq!(result.step(StitchStep::OriginalPair).width(), 1);
        assert_eq!(result.iter().count(), 5);
    }
}
