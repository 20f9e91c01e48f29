//! Tolerance-based quadrilateral classification
//!
//! Every target is judged on two criteria, one about sides and one about
//! angles, and graded as validity 40% + side criterion 30% + angle criterion 30%.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::quad::{Point, Quad};
use crate::approx_equal;
use crate::consts::{SCORE_PRIMARY, SCORE_SECONDARY, SCORE_VALID};
use crate::settings::ValidatorConfig;

/// Shape the player was asked to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadTarget {
    Square,
    Rectangle,
    Rhombus,
    Parallelogram,
}

impl QuadTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuadTarget::Square => "square",
            QuadTarget::Rectangle => "rectangle",
            QuadTarget::Rhombus => "rhombus",
            QuadTarget::Parallelogram => "parallelogram",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" => Some(QuadTarget::Square),
            "rectangle" => Some(QuadTarget::Rectangle),
            "rhombus" => Some(QuadTarget::Rhombus),
            "parallelogram" => Some(QuadTarget::Parallelogram),
            _ => None,
        }
    }
}

/// Graded verdict for one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub target: QuadTarget,
    pub is_valid: bool,
    /// AB, BC, CD, DA
    pub sides: [f64; 4],
    /// Angles at A, B, C, D (degrees); zeroed when the shape is invalid
    pub angles: [f64; 4],
    /// Side criterion for the target (all equal, or opposite pairs equal)
    pub side_criterion: bool,
    /// Angle criterion for the target (right angles, or their absence)
    pub angle_criterion: bool,
    /// Rectangle only: adjacent sides differ enough to rule out a square
    pub not_square: Option<bool>,
    pub matches_target: bool,
    /// Weighted score in [0, 1]
    pub score: f64,
}

impl ClassificationResult {
    /// Score as a whole percentage for feedback text
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }

    /// Result for input that is not a labeled quadrilateral at all
    pub fn malformed(target: QuadTarget) -> Self {
        Self {
            target,
            is_valid: false,
            sides: [0.0; 4],
            angles: [0.0; 4],
            side_criterion: false,
            angle_criterion: false,
            not_square: None,
            matches_target: false,
            score: 0.0,
        }
    }
}

/// Weighted score; fixed weights, clamped to [0, 1]
pub fn score(is_valid: bool, primary: bool, secondary: bool) -> f64 {
    let mut s = 0.0;
    if is_valid {
        s += SCORE_VALID;
    }
    if primary {
        s += SCORE_PRIMARY;
    }
    if secondary {
        s += SCORE_SECONDARY;
    }
    s.clamp(0.0, 1.0)
}

/// All four sides within tolerance of their mean
pub fn all_sides_equal(sides: &[f64; 4], tolerance: f64) -> bool {
    let mean = sides.iter().sum::<f64>() / 4.0;
    sides.iter().all(|&s| approx_equal(s, mean, mean, tolerance))
}

/// AB ≈ CD and BC ≈ DA, each relative to the larger of the pair
pub fn opposite_sides_equal(sides: &[f64; 4], tolerance: f64) -> bool {
    let pair = |a: f64, b: f64| approx_equal(a, b, a.max(b), tolerance);
    pair(sides[0], sides[2]) && pair(sides[1], sides[3])
}

/// Every angle within tolerance of 90°
pub fn all_angles_right(angles: &[f64; 4], tolerance_deg: f64) -> bool {
    angles.iter().all(|&a| (a - 90.0).abs() <= tolerance_deg)
}

/// Adjacent sides differ by more than `margin` of the smaller one
pub fn adjacent_sides_differ(sides: &[f64; 4], margin: f64) -> bool {
    let width = (sides[0] + sides[2]) / 2.0;
    let height = (sides[1] + sides[3]) / 2.0;
    (width - height).abs() > width.min(height) * margin
}

/// ∠A ≈ ∠C and ∠B ≈ ∠D
pub fn opposite_angles_equal(angles: &[f64; 4], tolerance_deg: f64) -> bool {
    (angles[0] - angles[2]).abs() <= tolerance_deg && (angles[1] - angles[3]).abs() <= tolerance_deg
}

/// Unsigned angles only sum to 360° for a simple convex outline; a crossed
/// ("bow-tie") outline falls well short.
fn outline_closes(angles: &[f64; 4], tolerance_deg: f64) -> bool {
    (angles.iter().sum::<f64>() - 360.0).abs() <= 4.0 * tolerance_deg
}

/// Classify a quadrilateral against a target shape
pub fn classify(quad: &Quad, target: QuadTarget, config: &ValidatorConfig) -> ClassificationResult {
    let sides = quad.side_lengths();
    let is_valid = quad.is_valid(config.min_side);

    if !is_valid {
        log::debug!("Degenerate {} attempt: sides {:?}", target.as_str(), sides);
        return ClassificationResult {
            sides,
            ..ClassificationResult::malformed(target)
        };
    }

    let angles = quad.interior_angles();
    let tol = config.side_tolerance;
    let angle_tol = config.angle_tolerance_deg;
    let right = all_angles_right(&angles, angle_tol);

    let (primary, secondary, not_square) = match target {
        QuadTarget::Square => (all_sides_equal(&sides, tol), right, None),
        QuadTarget::Rectangle => {
            let not_square = adjacent_sides_differ(&sides, config.not_square_margin);
            (opposite_sides_equal(&sides, tol) && not_square, right, Some(not_square))
        }
        QuadTarget::Rhombus => (
            all_sides_equal(&sides, tol),
            !right && outline_closes(&angles, angle_tol),
            None,
        ),
        QuadTarget::Parallelogram => (
            opposite_sides_equal(&sides, tol),
            !right && opposite_angles_equal(&angles, angle_tol) && outline_closes(&angles, angle_tol),
            None,
        ),
    };

    ClassificationResult {
        target,
        is_valid,
        sides,
        angles,
        side_criterion: primary,
        angle_criterion: secondary,
        not_square,
        matches_target: primary && secondary,
        score: score(is_valid, primary, secondary),
    }
}

/// Classify the label → point map the UI submits
pub fn classify_points(
    points: &BTreeMap<String, Point>,
    target: QuadTarget,
    config: &ValidatorConfig,
) -> ClassificationResult {
    match Quad::from_labeled(points) {
        Some(quad) => classify(&quad, target, config),
        None => {
            log::warn!("Expected labels A-D, got {} point(s)", points.len());
            ClassificationResult::malformed(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use proptest::prelude::*;

    fn cfg() -> ValidatorConfig {
        ValidatorConfig::default()
    }

    fn square() -> Quad {
        Quad::from_coords([(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)])
    }

    fn wide_rectangle() -> Quad {
        Quad::from_coords([(0.0, 0.0), (150.0, 0.0), (150.0, 80.0), (0.0, 80.0)])
    }

    #[test]
    fn test_square_scores_full_marks() {
        let result = classify(&square(), QuadTarget::Square, &cfg());
        assert!(result.is_valid);
        for s in result.sides {
            assert!((s - 100.0).abs() < 1e-9);
        }
        for a in result.angles {
            assert!((a - 90.0).abs() < 1e-9);
        }
        assert!(result.matches_target);
        assert!((result.score - 1.0).abs() < 1e-9);
        assert_eq!(result.score_percent(), 100);
    }

    #[test]
    fn test_rectangle_with_distinct_adjacent_sides() {
        let result = classify(&wide_rectangle(), QuadTarget::Rectangle, &cfg());
        assert!((result.sides[0] - 150.0).abs() < 1e-9);
        assert!((result.sides[2] - 150.0).abs() < 1e-9);
        assert!((result.sides[1] - 80.0).abs() < 1e-9);
        assert!((result.sides[3] - 80.0).abs() < 1e-9);
        assert!(result.angle_criterion);
        assert_eq!(result.not_square, Some(true));
        assert!(result.matches_target);
    }

    #[test]
    fn test_square_is_not_a_rectangle() {
        let as_square = classify(&square(), QuadTarget::Square, &cfg());
        let as_rect = classify(&square(), QuadTarget::Rectangle, &cfg());
        assert!(as_square.matches_target);
        assert_eq!(as_rect.not_square, Some(false));
        assert!(!as_rect.matches_target);
        assert_eq!(as_rect.score_percent(), 70);
    }

    #[test]
    fn test_near_square_rectangle_rejected() {
        // 110 x 100: opposite sides equal, right angles, but only 10% apart
        let quad = Quad::from_coords([(0.0, 0.0), (110.0, 0.0), (110.0, 100.0), (0.0, 100.0)]);
        let result = classify(&quad, QuadTarget::Rectangle, &cfg());
        assert_eq!(result.not_square, Some(false));
        assert!(!result.matches_target);
    }

    #[test]
    fn test_hand_placed_square_within_tolerance() {
        let quad = Quad::from_coords([(2.0, -1.0), (101.0, 1.0), (99.0, 103.0), (-1.0, 98.0)]);
        let result = classify(&quad, QuadTarget::Square, &cfg());
        assert!(result.matches_target, "{result:?}");
    }

    #[test]
    fn test_skewed_square_loses_angle_points() {
        let quad = Quad::from_coords([(0.0, 0.0), (100.0, 0.0), (130.0, 95.0), (30.0, 95.0)]);
        let result = classify(&quad, QuadTarget::Square, &cfg());
        assert!(result.is_valid);
        assert!(!result.angle_criterion);
        assert!(!result.matches_target);
    }

    #[test]
    fn test_degenerate_shape_short_circuits() {
        let quad = Quad::from_coords([(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]);
        let result = classify(&quad, QuadTarget::Square, &cfg());
        assert!(!result.is_valid);
        assert!(!result.side_criterion);
        assert!(!result.angle_criterion);
        assert_eq!(result.angles, [0.0; 4]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_rhombus_and_parallelogram() {
        // Rhombus: side 100, 60° / 120° angles
        let h = 100.0 * 60f64.to_radians().sin();
        let c = 100.0 * 60f64.to_radians().cos();
        let rhombus = Quad::from_coords([(0.0, 0.0), (100.0, 0.0), (100.0 + c, h), (c, h)]);
        assert!(classify(&rhombus, QuadTarget::Rhombus, &cfg()).matches_target);
        assert!(!classify(&rhombus, QuadTarget::Square, &cfg()).matches_target);

        let para = Quad::from_coords([(0.0, 0.0), (160.0, 0.0), (200.0, 70.0), (40.0, 70.0)]);
        assert!(classify(&para, QuadTarget::Parallelogram, &cfg()).matches_target);
        assert!(!classify(&para, QuadTarget::Rhombus, &cfg()).matches_target);

        // A rectangle is not accepted as a (non-rectangular) parallelogram
        assert!(!classify(&wide_rectangle(), QuadTarget::Parallelogram, &cfg()).matches_target);
    }

    #[test]
    fn test_crossed_outline_is_not_parallelogram() {
        let bowtie = Quad::from_coords([(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
        let result = classify(&bowtie, QuadTarget::Parallelogram, &cfg());
        assert!(result.side_criterion);
        assert!(!result.matches_target);
    }

    #[test]
    fn test_malformed_labels() {
        let mut points = square().to_labeled();
        points.remove("D");
        let result = classify_points(&points, QuadTarget::Square, &cfg());
        assert!(!result.is_valid);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_strict_preset_rejects_sloppy_square() {
        let quad = Quad::from_coords([(0.0, 0.0), (100.0, 0.0), (100.0, 112.0), (0.0, 112.0)]);
        assert!(classify(&quad, QuadTarget::Square, &cfg()).matches_target);
        let strict = crate::Difficulty::Strict.validator();
        assert!(!classify(&quad, QuadTarget::Square, &strict).matches_target);
    }

    proptest! {
        #[test]
        fn prop_square_never_classifies_as_rectangle(
            side in 20.0f64..400.0,
            rotation in 0.0f64..std::f64::consts::TAU,
            tx in -500.0f64..500.0, ty in -500.0f64..500.0,
            jitter in proptest::array::uniform8(-1.0f64..1.0),
        ) {
            // Hand-placement wobble: up to 1% of the side per coordinate
            let wobble = side * 0.01;
            let (sin, cos) = rotation.sin_cos();
            let corners = [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)];
            let vertices: [DVec2; 4] = std::array::from_fn(|i| {
                let (x, y) = corners[i];
                let rotated = DVec2::new(x * cos - y * sin, x * sin + y * cos);
                rotated + DVec2::new(tx + jitter[2 * i] * wobble, ty + jitter[2 * i + 1] * wobble)
            });
            let quad = Quad { vertices };

            let as_square = classify(&quad, QuadTarget::Square, &cfg());
            if as_square.matches_target {
                let as_rect = classify(&quad, QuadTarget::Rectangle, &cfg());
                prop_assert_eq!(as_rect.not_square, Some(false));
                prop_assert!(!as_rect.matches_target);
            }
        }
    }
}
