//! Scoring functions that guide the best-first search.
use crate::engine::{PuzzleParams, State};

/// Counts adjacent pairs of equal-colored units across all tubes.
///
/// A tube `[A, A, B, B, B]` contributes 3 pairs: one `AA` and two `BB`.
pub fn adjacent_pairs(state: &State) -> usize {
    state
        .tubes()
        .iter()
        .map(|tube| tube.units().windows(2).filter(|w| w[0] == w[1]).count())
        .sum()
}

/// Estimates the remaining disorder of a state. Lower is better.
///
/// The score is `capacity * n_color - adjacent_pairs(state)`. When every color
/// has exactly `capacity` units this equals the number of same-color runs in
/// the state, so `score - n_color` counts the merges still needed and never
/// overestimates the remaining moves. For other layouts it is only a proxy.
/// The score is independent of tube order, so every state sharing a canonical
/// snapshot shares its score.
///
/// # Examples
/// ```
/// use water_sort_solver::engine::{PuzzleParams, State};
/// use water_sort_solver::heuristics::disorder_score;
///
/// let params = PuzzleParams::new(2, 1, 2).unwrap();
/// let sorted = State::from_units(vec![vec![0, 0], vec![1, 1], vec![]], &params).unwrap();
/// let mixed = State::from_units(vec![vec![0, 1], vec![1, 0], vec![]], &params).unwrap();
/// assert_eq!(disorder_score(&sorted, &params), 2);
/// assert_eq!(disorder_score(&mixed, &params), 4);
/// ```
pub fn disorder_score(state: &State, params: &PuzzleParams) -> usize {
    // Saturates for layouts holding more than `capacity` units of some color.
    (params.capacity * params.n_color).saturating_sub(adjacent_pairs(state))
}
