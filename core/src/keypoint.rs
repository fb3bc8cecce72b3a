use nalgebra::Point2;

/// A salient image location, in pixel coordinates of the image it was
/// detected in. Its position in the detection sequence is its identity
/// for the run; matches and inlier flags refer to that position.
#[derive(Debug, Clone, Copy)]
pub struct KeyPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub angle: f64,
    pub response: f64,
    pub octave: i32,
}

impl KeyPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: 1.0,
            angle: -1.0,
            response: 0.0,
            octave: 0,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_response(mut self, response: f64) -> Self {
        self.response = response;
        self
    }

    pub fn with_octave(mut self, octave: i32) -> Self {
        self.octave = octave;
        self
    }

    pub fn pt(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl Default for KeyPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Keypoints of one image, in detection order.
#[derive(Debug, Clone, Default)]
pub struct KeyPoints {
    pub keypoints: Vec<KeyPoint>,
}

impl KeyPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keypoints: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, kp: KeyPoint) {
        self.keypoints.push(kp);
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyPoint> {
        self.keypoints.iter()
    }
}

impl FromIterator<KeyPoint> for KeyPoints {
    fn from_iter<I: IntoIterator<Item = KeyPoint>>(iter: I) -> Self {
        Self {
            keypoints: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeyPoints {
    type Item = &'a KeyPoint;
    type IntoIter = std::slice::Iter<'a, KeyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.keypoints.iter()
    }
}

/// One correspondence between two keypoint sequences. `query_idx` indexes
/// the first (left) sequence, `train_idx` the second (right), `distance`
/// is the descriptor distance of the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureMatch {
    pub query_idx: i32,
    pub train_idx: i32,
    pub distance: f32,
}

impl FeatureMatch {
    pub fn new(query_idx: i32, train_idx: i32, distance: f32) -> Self {
        Self {
            query_idx,
            train_idx,
            distance,
        }
    }
}

/// The matches of one image pair.
#[derive(Debug, Clone, Default)]
pub struct Matches {
    pub matches: Vec<FeatureMatch>,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, m: FeatureMatch) {
        self.matches.push(m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMatch> {
        self.matches.iter()
    }

    /// Smallest descriptor distance among the matches, `None` when empty.
    pub fn min_distance(&self) -> Option<f32> {
        self.matches
            .iter()
            .map(|m| m.distance)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl FromIterator<FeatureMatch> for Matches {
    fn from_iter<I: IntoIterator<Item = FeatureMatch>>(iter: I) -> Self {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a FeatureMatch;
    type IntoIter = std::slice::Iter<'a, FeatureMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypoint_builders_set_fields() {
        let kp = KeyPoint::new(3.0, 4.0)
            .with_size(7.0)
            .with_response(0.5)
            .with_octave(2);
        assert_eq!(kp.x, 3.0);
        assert_eq!(kp.y, 4.0);
        assert_eq!(kp.size, 7.0);
        assert_eq!(kp.response, 0.5);
        assert_eq!(kp.octave, 2);
        assert_eq!(kp.pt(), Point2::new(3.0, 4.0));
    }

    #[test]
    fn matches_min_distance() {
        let mut matches = Matches::new();
        assert!(matches.min_distance().is_none());

        matches.push(FeatureMatch::new(0, 0, 12.0));
        matches.push(FeatureMatch::new(1, 3, 4.0));
        matches.push(FeatureMatch::new(2, 1, 9.0));
        assert_eq!(matches.min_distance(), Some(4.0));
    }

    #[test]
    fn collections_collect_from_iterators() {
        let kps: KeyPoints = (0..3).map(|i| KeyPoint::new(i as f64, 0.0)).collect();
        assert_eq!(kps.len(), 3);

        let matches: Matches = kps
            .iter()
            .enumerate()
            .map(|(i, _)| FeatureMatch::new(i as i32, i as i32, 1.0))
            .collect();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches.matches[2].train_idx, 2);
    }
}
