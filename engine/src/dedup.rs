//! Duplicate-visit detection.
//!
//! GPS reads jitter; without this check a stationary user pressing "log"
//! twice would record the same visit twice. Detection compares a candidate
//! fix against the single most recent accepted capture, nothing older.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Default radius under which two captures count as the same visit.
/// Matches the GPS accuracy warning threshold, not coincidentally.
pub const DEFAULT_DUPLICATE_RADIUS_M: f64 = 50.0;

/// Flags a candidate position as "the same visit" as the last logged one.
///
/// Checking is side-effect free; the caller records the position only
/// after the capture has been accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDetector {
    radius_m: f64,
    last: Option<Coordinates>,
}

impl DuplicateDetector {
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            last: None,
        }
    }

    /// The configured dedup radius in metres.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// The most recent accepted capture position, if any.
    pub fn last(&self) -> Option<Coordinates> {
        self.last
    }

    /// True when the candidate falls within the dedup radius of the last
    /// accepted capture. Always false before the first capture.
    pub fn is_duplicate(&self, candidate: Coordinates) -> bool {
        match self.last {
            Some(last) => last.distance_to(&candidate) < self.radius_m,
            None => false,
        }
    }

    /// Distance in metres from the last accepted capture, if any.
    pub fn distance_from_last(&self, candidate: Coordinates) -> Option<f64> {
        self.last.map(|last| last.distance_to(&candidate))
    }

    /// Overwrite the last accepted position. Call only after the capture
    /// has been accepted.
    pub fn record(&mut self, position: Coordinates) {
        self.last = Some(position);
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_RADIUS_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_last_position_is_never_duplicate() {
        let detector = DuplicateDetector::default();
        assert!(!detector.is_duplicate(Coordinates::new(51.5074, -0.1278)));
    }

    #[test]
    fn within_radius_is_duplicate() {
        let mut detector = DuplicateDetector::new(50.0);
        detector.record(Coordinates::new(51.5074, -0.1278));

        // ~10m away
        assert!(detector.is_duplicate(Coordinates::new(51.50749, -0.1278)));
    }

    #[test]
    fn outside_radius_is_not_duplicate() {
        let mut detector = DuplicateDetector::new(50.0);
        detector.record(Coordinates::new(51.5074, -0.1278));

        // ~111m away
        assert!(!detector.is_duplicate(Coordinates::new(51.5084, -0.1278)));
    }

    #[test]
    fn checking_does_not_mutate() {
        let mut detector = DuplicateDetector::new(50.0);
        detector.record(Coordinates::new(51.5074, -0.1278));

        let far = Coordinates::new(53.4808, -2.2426);
        assert!(!detector.is_duplicate(far));
        // Last position unchanged until record() is called.
        assert_eq!(detector.last(), Some(Coordinates::new(51.5074, -0.1278)));
    }

    #[test]
    fn only_single_last_position_is_kept() {
        let mut detector = DuplicateDetector::new(50.0);
        let a = Coordinates::new(51.5074, -0.1278);
        let b = Coordinates::new(53.4808, -2.2426);

        detector.record(a);
        detector.record(b);

        // Returning near A is not flagged; only B is remembered.
        assert!(!detector.is_duplicate(Coordinates::new(51.50741, -0.1278)));
        assert!(detector.is_duplicate(Coordinates::new(53.48081, -2.2426)));
    }

    #[test]
    fn distance_from_last() {
        let mut detector = DuplicateDetector::new(50.0);
        assert_eq!(
            detector.distance_from_last(Coordinates::new(0.0, 0.0)),
            None
        );
        detector.record(Coordinates::new(51.5074, -0.1278));
        let d = detector
            .distance_from_last(Coordinates::new(51.50749, -0.1278))
            .unwrap();
        assert!(d > 5.0 && d < 15.0);
    }
}
