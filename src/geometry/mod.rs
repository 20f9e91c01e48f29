//! Shape validation
//!
//! Pure and deterministic: the same points always produce the same verdict.
//! Nothing here fails; degenerate input shows up as `is_valid = false`.

pub mod classify;
pub mod polygon;
pub mod quad;
pub mod selection;

pub use classify::{ClassificationResult, QuadTarget, classify, classify_points};
pub use polygon::{AngleAsk, AngleQuestion, angle_sum, interior_angle as regular_interior_angle};
pub use quad::{Point, Quad, interior_angle};
pub use selection::{Candidate, SelectionResult, classify_selection, correct_ids};
