//! Polygon angle sums and multiple-choice angle questions
//!
//! These missions are answered by picking an option, not by dragging points,
//! so they are checked against the closed form: sum = (n - 2) × 180°.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Polygons used by the angle-sum missions
pub const MISSION_POLYGONS: [u32; 4] = [5, 6, 7, 8];

/// Choices shown on an angle-sum mission screen
pub const OPTION_COUNT: usize = 4;

/// Sum of interior angles of an n-gon, in degrees
pub fn angle_sum(sides: u32) -> f64 {
    (sides.saturating_sub(2) as f64) * 180.0
}

/// Each interior angle of a regular n-gon, in degrees
pub fn interior_angle(sides: u32) -> f64 {
    if sides < 3 {
        return 0.0;
    }
    angle_sum(sides) / sides as f64
}

/// Each exterior angle of a regular n-gon
pub fn exterior_angle(sides: u32) -> f64 {
    if sides < 3 {
        return 0.0;
    }
    360.0 / sides as f64
}

pub fn polygon_name(sides: u32) -> &'static str {
    match sides {
        3 => "triangle",
        4 => "quadrilateral",
        5 => "pentagon",
        6 => "hexagon",
        7 => "heptagon",
        8 => "octagon",
        9 => "nonagon",
        10 => "decagon",
        _ => "polygon",
    }
}

/// What the question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleAsk {
    /// Total of the interior angles
    Sum,
    /// One interior angle of the regular polygon
    EachInterior,
}

impl AngleAsk {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Some(AngleAsk::Sum),
            "each_interior" | "interior" | "each" => Some(AngleAsk::EachInterior),
            _ => None,
        }
    }
}

/// A multiple-choice angle question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleQuestion {
    pub sides: u32,
    pub ask: AngleAsk,
    /// Options shown to the player, rounded to 2 decimals
    pub options: Vec<f64>,
    pub answer_index: usize,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl AngleQuestion {
    /// Build a question with `option_count` choices. Distractors are the
    /// mistakes players actually make (off-by-one n, n × 180, exterior angle),
    /// shuffled deterministically from `rng`.
    pub fn generate(sides: u32, ask: AngleAsk, option_count: usize, rng: &mut Pcg32) -> Self {
        let sides = sides.max(3);
        let answer = round2(Self::value_for(sides, ask));

        let mut distractors: Vec<f64> = match ask {
            AngleAsk::Sum => vec![
                angle_sum(sides + 1),
                angle_sum(sides - 1),
                sides as f64 * 180.0,
                angle_sum(sides + 2),
                360.0,
            ],
            AngleAsk::EachInterior => vec![
                exterior_angle(sides),
                interior_angle(sides + 1),
                interior_angle(sides - 1),
                180.0 - interior_angle(sides + 2),
                angle_sum(sides) / (sides - 1) as f64,
            ],
        }
        .into_iter()
        .map(round2)
        .collect();

        distractors.retain(|&d| d > 0.0 && (d - answer).abs() > 0.005);
        distractors.sort_by(f64::total_cmp);
        distractors.dedup_by(|a, b| (*a - *b).abs() < 0.005);
        distractors.shuffle(rng);
        distractors.truncate(option_count.saturating_sub(1));

        let answer_index = rng.random_range(0..=distractors.len());
        let mut options = distractors;
        options.insert(answer_index, answer);

        Self {
            sides,
            ask,
            options,
            answer_index,
        }
    }

    /// Mission-screen question. The same seed always rebuilds the same
    /// question, so a stateless caller can check an answer later.
    pub fn from_seed(sides: u32, ask: AngleAsk, seed: u64) -> Self {
        Self::generate(sides, ask, OPTION_COUNT, &mut Pcg32::seed_from_u64(seed))
    }

    fn value_for(sides: u32, ask: AngleAsk) -> f64 {
        match ask {
            AngleAsk::Sum => angle_sum(sides),
            AngleAsk::EachInterior => interior_angle(sides),
        }
    }

    /// The exact value being asked for
    pub fn correct_value(&self) -> f64 {
        Self::value_for(self.sides, self.ask)
    }

    /// Exact match on the chosen option
    pub fn check(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}
