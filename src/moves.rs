//! Move generation.
//!
//! Two variants share the pour rule defined on `State`:
//! - `candidate_moves` lists the legal pours of a state, for the depth-first
//!   search, which applies them in place and undoes them with `State::unpour`.
//! - `successors` returns a copy of the state for every legal pour, for the
//!   best-first search, which keeps states as immutable graph nodes.
//!
//! Both enumerate every ordered pair `(i, j)` with `i != j` over the full tube
//! count, in row-major order, and skip the pairs where nothing can be poured.
use crate::engine::{Move, State};

/// Lists every legal pour of `state`.
///
/// Pairs whose destination is full or whose top colors differ are filtered out
/// here rather than left to pour zero units, so every returned move changes
/// the state.
pub fn candidate_moves(state: &State) -> Vec<Move> {
    let n = state.tube_count();
    let mut moves = Vec::new();
    for src in 0..n {
        if state.tube(src).is_empty() {
            continue;
        }
        for dst in 0..n {
            let mv = Move::new(src, dst);
            if state.can_pour(mv) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Returns a copy of `state` with each legal pour applied, paired with the move.
///
/// Successors that are identical to `state` up to tube order are dropped. This
/// removes pours such as moving a whole single-color tube into an empty tube.
///
/// # Examples
/// ```
/// use water_sort_solver::engine::{Move, PuzzleParams, State};
/// use water_sort_solver::moves::successors;
///
/// let params = PuzzleParams::new(1, 1, 2).unwrap();
/// let state = State::from_units(vec![vec![0, 0], vec![]], &params).unwrap();
/// // Pouring the full tube into the empty one only swaps their roles.
/// assert!(successors(&state).is_empty());
/// ```
pub fn successors(state: &State) -> Vec<(State, Move)> {
    let canonical = state.canonical();
    let mut result = Vec::new();
    for mv in candidate_moves(state) {
        let mut next = state.clone();
        next.pour(mv);
        if next.canonical() != canonical {
            result.push((next, mv));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PuzzleParams;

    fn state(units: Vec<Vec<u8>>, n_color: usize, capacity: usize) -> State {
        let params = PuzzleParams::new(n_color, units.len() - n_color, capacity).unwrap();
        State::from_units(units, &params).unwrap()
    }

    #[test]
    fn test_candidate_moves_filters_illegal_pairs() {
        // Tube 1 is full, so nothing can be poured into it.
        let s = state(vec![vec![0, 1], vec![1, 1, 1], vec![]], 2, 3);
        let moves = candidate_moves(&s);
        assert_eq!(
            moves,
            vec![Move::new(0, 2), Move::new(1, 0), Move::new(1, 2)]
        );
        for mv in moves {
            let mut copy = s.clone();
            assert!(copy.pour(mv) > 0, "{} should pour at least one unit", mv);
        }
    }

    #[test]
    fn test_candidate_moves_none_when_blocked() {
        let s = state(vec![vec![0, 1], vec![1, 0]], 2, 2);
        assert!(candidate_moves(&s).is_empty());
    }

    #[test]
    fn test_candidate_moves_skips_empty_sources() {
        let s = state(vec![vec![], vec![0], vec![]], 1, 2);
        let moves = candidate_moves(&s);
        assert!(moves.iter().all(|mv| mv.src == 1));
        assert_eq!(moves, vec![Move::new(1, 0), Move::new(1, 2)]);
    }

    #[test]
    fn test_successors_apply_move() {
        let s = state(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let succ = successors(&s);
        assert_eq!(succ.len(), 2);
        let (next, mv) = &succ[0];
        assert_eq!(*mv, Move::new(0, 2));
        assert_eq!(next.tube(0).units(), &[0]);
        assert_eq!(next.tube(2).units(), &[1]);
        // The input is untouched.
        assert_eq!(s.tube(0).units(), &[0, 1]);
    }

    #[test]
    fn test_successors_drop_shape_preserving_pours() {
        // Pouring the lone unit of tube 0 into empty tube 2 only relabels tubes.
        let s = state(vec![vec![0], vec![0, 1], vec![], vec![1]], 2, 2);
        let succ = successors(&s);
        assert!(succ.iter().all(|(_, mv)| *mv != Move::new(0, 2)));
        assert!(succ.iter().all(|(_, mv)| *mv != Move::new(3, 2)));
        assert!(succ.iter().any(|(_, mv)| *mv == Move::new(1, 3)));
    }

    #[test]
    fn test_successors_match_in_place_pour() {
        let s = state(vec![vec![0, 1, 1], vec![1], vec![0, 0], vec![]], 2, 3);
        for (next, mv) in successors(&s) {
            let mut in_place = s.clone();
            let moved = in_place.pour(mv);
            assert_eq!(in_place, next);
            in_place.unpour(mv, moved);
            assert_eq!(in_place, s);
        }
    }
}
