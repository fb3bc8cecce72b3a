use crate::descriptor::Descriptors;
use crate::{FeatureError, Result};
use pano_core::{FeatureMatch, Matches};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    BruteForceHamming,
}

/// Brute-force nearest-neighbor matcher with a best-distance band filter.
///
/// Every query descriptor is paired with its single nearest train
/// descriptor; the pass is not symmetric and performs no mutual check.
/// The band filter then keeps a candidate only while its distance stays
/// under `band` times the smallest candidate distance.
pub struct Matcher {
    match_type: MatchType,
    distance_band: Option<f32>,
}

impl Matcher {
    pub fn new(match_type: MatchType) -> Self {
        Self {
            match_type,
            distance_band: None,
        }
    }

    pub fn with_distance_band(mut self, band: f32) -> Self {
        self.distance_band = Some(band);
        self
    }

    pub fn match_descriptors(&self, query: &Descriptors, train: &Descriptors) -> Result<Matches> {
        let candidates = self.match_descriptors_unfiltered(query, train)?;
        match self.distance_band {
            Some(band) => Ok(apply_distance_band(candidates, band)),
            None => Ok(candidates),
        }
    }

    /// The raw nearest-neighbor pass, before the band filter.
    pub fn match_descriptors_unfiltered(
        &self,
        query: &Descriptors,
        train: &Descriptors,
    ) -> Result<Matches> {
        validate_descriptor_sizes(query, train)?;

        match self.match_type {
            MatchType::BruteForceHamming => Ok(brute_force_match(query, train)),
        }
    }
}

fn validate_descriptor_sizes(query: &Descriptors, train: &Descriptors) -> Result<()> {
    let (Some(q), Some(t)) = (query.descriptors.first(), train.descriptors.first()) else {
        return Ok(());
    };

    if q.size() != t.size() {
        return Err(FeatureError::MatchingError(format!(
            "descriptor sizes differ: query {} vs train {}",
            q.size(),
            t.size()
        )));
    }
    Ok(())
}

fn brute_force_match(query: &Descriptors, train: &Descriptors) -> Matches {
    let mut matches = Matches::with_capacity(query.len());

    if train.is_empty() {
        return matches;
    }

    for (query_idx, q_desc) in query.iter().enumerate() {
        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;

        for (train_idx, t_desc) in train.iter().enumerate() {
            let distance = q_desc.hamming_distance(t_desc);
            if distance < best_dist {
                best_dist = distance;
                best_idx = train_idx;
            }
        }

        matches.push(FeatureMatch::new(
            query_idx as i32,
            best_idx as i32,
            best_dist as f32,
        ));
    }

    matches
}

/// Keep matches with `distance < band * min_distance`. The reference
/// distance is floored at one bit so exact-duplicate descriptors
/// (distance 0) cannot reject every match.
fn apply_distance_band(candidates: Matches, band: f32) -> Matches {
    let Some(min_distance) = candidates.min_distance() else {
        return candidates;
    };

    let reference = min_distance.max(1.0);
    let mut kept = Matches::with_capacity(candidates.len());
    for m in candidates.iter() {
        if m.distance < band * reference {
            kept.push(*m);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use pano_core::KeyPoint;

    fn descriptor(bytes: Vec<u8>) -> Descriptor {
        Descriptor::new(bytes, KeyPoint::new(0.0, 0.0))
    }

    fn descriptors(all: Vec<Vec<u8>>) -> Descriptors {
        let mut descs = Descriptors::new();
        for bytes in all {
            descs.push(descriptor(bytes));
        }
        descs
    }

    #[test]
    fn nearest_neighbor_pairs_identical_descriptors() {
        let q = descriptors(vec![vec![0xAA; 32], vec![0x55; 32]]);
        let t = descriptors(vec![vec![0xAA; 32], vec![0x55; 32]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming);
        let matches = matcher.match_descriptors(&q, &t).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches.matches[0].query_idx, 0);
        assert_eq!(matches.matches[0].train_idx, 0);
        assert_eq!(matches.matches[1].query_idx, 1);
        assert_eq!(matches.matches[1].train_idx, 1);
    }

    #[test]
    fn band_filter_drops_distant_candidates() {
        // Query 0 matches train 0 with distance 1; query 1's best is 8 bits away
        let q = descriptors(vec![vec![0b0000_0001, 0, 0, 0], vec![0xFF, 0, 0, 0]]);
        let t = descriptors(vec![vec![0b0000_0011, 0, 0, 0], vec![0x00, 0, 0, 0]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming).with_distance_band(3.0);
        let matches = matcher.match_descriptors(&q, &t).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches.matches[0].query_idx, 0);
        assert_eq!(matches.matches[0].distance, 1.0);
    }

    #[test]
    fn every_kept_distance_is_inside_the_band() {
        let q = descriptors(vec![
            vec![0x00, 0x00],
            vec![0x0F, 0x00],
            vec![0xFF, 0x0F],
            vec![0xFF, 0xFF],
        ]);
        let t = descriptors(vec![vec![0x01, 0x00], vec![0xF0, 0xFF]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming).with_distance_band(3.0);
        let unfiltered = matcher.match_descriptors_unfiltered(&q, &t).unwrap();
        let filtered = matcher.match_descriptors(&q, &t).unwrap();

        let min = unfiltered.min_distance().unwrap().max(1.0);
        assert!(filtered.len() <= unfiltered.len());
        for m in filtered.iter() {
            assert!(m.distance < 3.0 * min);
        }
    }

    #[test]
    fn zero_distance_best_still_keeps_exact_matches() {
        // Both queries find exact duplicates; the one-bit floor keeps them
        let q = descriptors(vec![vec![0xAA; 8], vec![0x33; 8]]);
        let t = descriptors(vec![vec![0x33; 8], vec![0xAA; 8]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming).with_distance_band(3.0);
        let matches = matcher.match_descriptors(&q, &t).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches.matches[0].train_idx, 1);
        assert_eq!(matches.matches[1].train_idx, 0);
    }

    #[test]
    fn empty_sides_give_empty_matches() {
        let empty = Descriptors::new();
        let some = descriptors(vec![vec![0xAA; 4]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming).with_distance_band(3.0);
        assert!(matcher.match_descriptors(&empty, &some).unwrap().is_empty());
        assert!(matcher.match_descriptors(&some, &empty).unwrap().is_empty());
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let q = descriptors(vec![vec![0xAA; 16]]);
        let t = descriptors(vec![vec![0xAA; 32]]);

        let matcher = Matcher::new(MatchType::BruteForceHamming);
        assert!(matcher.match_descriptors(&q, &t).is_err());
    }
}
