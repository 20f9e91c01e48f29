//! "Select every shape of type X" missions

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::classify::{QuadTarget, classify};
use super::quad::Quad;
use crate::settings::ValidatorConfig;

/// Outcome of comparing a player's picks with the answer key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Picks that belong to the answer key
    pub correct_count: usize,
    /// Picks that don't
    pub incorrect_count: usize,
    /// Picks equal the answer key as sets
    pub is_exact_match: bool,
}

impl SelectionResult {
    /// Answer-key entries the player hasn't picked yet
    pub fn missing(&self, correct_total: usize) -> usize {
        correct_total.saturating_sub(self.correct_count)
    }
}

/// Compare selected shape IDs with the correct IDs. Order and repeats are ignored.
pub fn classify_selection(selected: &[u32], correct: &[u32]) -> SelectionResult {
    let selected: BTreeSet<u32> = selected.iter().copied().collect();
    let correct: BTreeSet<u32> = correct.iter().copied().collect();

    let correct_count = selected.intersection(&correct).count();
    let incorrect_count = selected.len() - correct_count;

    SelectionResult {
        correct_count,
        incorrect_count,
        is_exact_match: selected.len() == correct.len() && incorrect_count == 0,
    }
}

/// A candidate shape on the selection board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: u32,
    pub quad: Quad,
}

/// IDs of the candidates that classify as `target`
pub fn correct_ids(candidates: &[Candidate], target: QuadTarget, config: &ValidatorConfig) -> Vec<u32> {
    candidates
        .iter()
        .filter(|c| classify(&c.quad, target, config).matches_target)
        .map(|c| c.id)
        .collect()
}
