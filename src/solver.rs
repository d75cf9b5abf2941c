//! Search engines for the water sort puzzle.
//!
//! - `solve_dfs`: depth-first search with backtracking. Returns the first
//!   solution found, which is usually far from the shortest.
//! - `solve_best_first`: best-first search ordered by `cost + disorder_score`,
//!   returning a shortest solution for well-formed puzzles.
//!
//! Both deduplicate states by their `CanonicalState`, so two layouts that only
//! differ by which tube holds which content are explored once. Returned move
//! indices always refer to the physical tube order of the input state.
use crate::engine::{CanonicalState, Move, PuzzleParams, State};
use crate::heuristics::disorder_score;
use crate::moves::{candidate_moves, successors};
use log::{debug, info, trace};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

/// Default maximum number of moves explored along one DFS branch.
///
/// Large enough to be effectively unbounded for practical puzzle sizes. It is
/// not a completeness guarantee for adversarial inputs.
pub const DEFAULT_DEPTH_LIMIT: usize = 10_000;

/// Limits applied to a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum DFS depth, in moves from the initial state. Unused by best-first search.
    pub depth_limit: usize,
    /// Stop after this many states have been explored.
    pub max_states: Option<usize>,
    /// Stop once this much wall-clock time has elapsed.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            max_states: None,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = Some(max_states);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// Counters collected during a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Distinct states entered (DFS) or expanded (best-first).
    pub states_explored: usize,
    /// Deepest move count reached from the initial state.
    pub max_depth: usize,
    /// `true` if the search stopped on `max_states` or `time_limit`.
    pub budget_exhausted: bool,
}

/// Outcome of a search.
///
/// A failed search is a normal result: `solution_found` is `false` and `moves`
/// is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    pub solution_found: bool,
    /// Pours leading from the initial state to a solved state, in order.
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

impl Solution {
    fn found(moves: Vec<Move>, stats: SearchStats) -> Self {
        Solution {
            solution_found: true,
            moves,
            stats,
        }
    }

    fn not_found(stats: SearchStats) -> Self {
        Solution {
            solution_found: false,
            moves: Vec::new(),
            stats,
        }
    }
}

struct Budget {
    started: Instant,
    max_states: Option<usize>,
    time_limit: Option<Duration>,
}

impl Budget {
    fn start(config: &SearchConfig) -> Self {
        Budget {
            started: Instant::now(),
            max_states: config.max_states,
            time_limit: config.time_limit,
        }
    }

    fn exhausted(&self, states_explored: usize) -> bool {
        self.max_states.is_some_and(|max| states_explored >= max)
            || self.time_limit.is_some_and(|limit| self.started.elapsed() >= limit)
    }
}

/// One level of the explicit DFS stack.
struct Frame {
    candidates: Vec<Move>,
    next: usize,
    /// The pour that led into this frame and how many units it moved.
    /// `None` for the root.
    applied: Option<(Move, usize)>,
}

/// Finds any solution with depth-first search and backtracking.
///
/// A single board is mutated in place: each step pours a candidate move and
/// descends if the resulting canonical state is new and the depth limit allows,
/// and every pop of a stack frame undoes exactly the pour that created it. The
/// stack is explicit, so deep searches do not grow the native call stack.
///
/// # Examples
/// ```
/// use water_sort_solver::engine::{PuzzleParams, State};
/// use water_sort_solver::solver::{solve_dfs, SearchConfig};
///
/// let params = PuzzleParams::new(2, 1, 2).unwrap();
/// let state = State::from_units(vec![vec![0, 1], vec![1, 0], vec![]], &params).unwrap();
/// let solution = solve_dfs(&state, &SearchConfig::default());
/// assert!(solution.solution_found);
/// assert!(state.replay(&solution.moves).unwrap().is_solved());
/// ```
pub fn solve_dfs(initial: &State, config: &SearchConfig) -> Solution {
    info!(
        "DFS: {} tubes, depth limit {}",
        initial.tube_count(),
        config.depth_limit
    );
    let budget = Budget::start(config);
    let mut stats = SearchStats::default();
    let mut board = initial.clone();
    let mut visited: HashSet<CanonicalState> = HashSet::new();
    visited.insert(board.canonical());
    stats.states_explored = 1;

    if board.is_solved() {
        info!("DFS: initial state is already solved");
        return Solution::found(Vec::new(), stats);
    }

    let mut path: Vec<Move> = Vec::new();
    let mut frames = vec![Frame {
        candidates: candidate_moves(&board),
        next: 0,
        applied: None,
    }];

    loop {
        let next_move = match frames.last_mut() {
            Some(frame) => {
                let mv = frame.candidates.get(frame.next).copied();
                frame.next += 1;
                mv
            }
            None => break,
        };

        let Some(mv) = next_move else {
            // Every candidate of the top frame is done: backtrack.
            if let Some(Frame {
                applied: Some((mv, poured)),
                ..
            }) = frames.pop()
            {
                board.unpour(mv, poured);
                path.pop();
            }
            continue;
        };

        if budget.exhausted(stats.states_explored) {
            stats.budget_exhausted = true;
            debug!(
                "DFS: budget exhausted after {} states",
                stats.states_explored
            );
            return Solution::not_found(stats);
        }

        let poured = board.pour(mv);
        if poured == 0 {
            continue;
        }

        let depth = frames.len() - 1;
        if depth < config.depth_limit && visited.insert(board.canonical()) {
            stats.states_explored += 1;
            path.push(mv);
            stats.max_depth = stats.max_depth.max(path.len());
            trace!("DFS: depth {} via {}", path.len(), mv);

            if board.is_solved() {
                info!(
                    "DFS: solved in {} moves, {} states explored",
                    path.len(),
                    stats.states_explored
                );
                return Solution::found(path, stats);
            }

            frames.push(Frame {
                candidates: candidate_moves(&board),
                next: 0,
                applied: Some((mv, poured)),
            });
        } else {
            board.unpour(mv, poured);
        }
    }

    info!(
        "DFS: no solution, {} states explored",
        stats.states_explored
    );
    Solution::not_found(stats)
}

/// A state pushed onto the best-first frontier.
struct Node {
    state: State,
    parent: Option<usize>,
    mv: Option<Move>,
    cost: usize,
}

/// Finds a shortest solution with best-first search.
///
/// The frontier is ordered by `cost + disorder_score`, where `cost` is the number
/// of moves from the initial state; ties pop in insertion order. The best known
/// cost of each canonical state is tracked, and a popped entry whose priority no
/// longer matches that cost is stale and skipped. Each pushed node records its
/// parent node and the move from it, so the path is rebuilt by walking back to
/// the root.
///
/// When every color has exactly `capacity` units, a pour changes the number of
/// adjacent equal pairs by at most one, so `disorder_score - n_color` is a
/// consistent lower bound and the returned solution has minimum length.
pub fn solve_best_first(initial: &State, params: &PuzzleParams, config: &SearchConfig) -> Solution {
    info!("Best-first: {} tubes", initial.tube_count());
    let budget = Budget::start(config);
    let mut stats = SearchStats::default();

    let mut nodes = vec![Node {
        state: initial.clone(),
        parent: None,
        mv: None,
        cost: 0,
    }];
    let mut best_cost: HashMap<CanonicalState, usize> = HashMap::new();
    best_cost.insert(initial.canonical(), 0);
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((disorder_score(initial, params), 0usize)));
    let mut stale = 0usize;

    while let Some(Reverse((priority, id))) = frontier.pop() {
        let cost = nodes[id].cost;
        let key = nodes[id].state.canonical();
        let known = best_cost.get(&key).copied();
        if known.map(|c| c + disorder_score(&nodes[id].state, params)) != Some(priority) {
            stale += 1;
            continue;
        }

        if budget.exhausted(stats.states_explored) {
            stats.budget_exhausted = true;
            debug!(
                "Best-first: budget exhausted after {} states, {} stale entries skipped",
                stats.states_explored, stale
            );
            return Solution::not_found(stats);
        }
        stats.states_explored += 1;
        stats.max_depth = stats.max_depth.max(cost);
        trace!("Best-first: expanding node {} at cost {}, priority {}", id, cost, priority);

        if nodes[id].state.is_solved() {
            let moves = reconstruct_path(&nodes, id);
            debug!("Best-first: {} stale entries skipped", stale);
            info!(
                "Best-first: solved in {} moves, {} states explored",
                moves.len(),
                stats.states_explored
            );
            return Solution::found(moves, stats);
        }

        for (next, mv) in successors(&nodes[id].state) {
            let next_cost = cost + 1;
            let next_key = next.canonical();
            if best_cost.get(&next_key).map_or(true, |&c| next_cost < c) {
                best_cost.insert(next_key, next_cost);
                let next_priority = next_cost + disorder_score(&next, params);
                nodes.push(Node {
                    state: next,
                    parent: Some(id),
                    mv: Some(mv),
                    cost: next_cost,
                });
                frontier.push(Reverse((next_priority, nodes.len() - 1)));
            }
        }
    }

    info!(
        "Best-first: no solution, {} states explored",
        stats.states_explored
    );
    Solution::not_found(stats)
}

fn reconstruct_path(nodes: &[Node], goal: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        if let Some(mv) = nodes[id].mv {
            moves.push(mv);
        }
        cursor = nodes[id].parent;
    }
    moves.reverse();
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Color;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn puzzle(units: Vec<Vec<Color>>, n_color: usize, capacity: usize) -> (State, PuzzleParams) {
        let params = PuzzleParams::new(n_color, units.len() - n_color, capacity).unwrap();
        (State::from_units(units, &params).unwrap(), params)
    }

    fn assert_replays_to_solved(initial: &State, solution: &Solution) {
        assert!(solution.solution_found);
        let end = initial
            .replay(&solution.moves)
            .expect("every returned move should be legal");
        assert!(end.is_solved(), "final state not solved:\n{}", end);
    }

    #[test]
    fn test_solve_dfs_two_colors() {
        let (state, _) = puzzle(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let solution = solve_dfs(&state, &SearchConfig::default());
        assert_replays_to_solved(&state, &solution);
        assert!(solution.moves.len() >= 3);
    }

    #[test]
    fn test_solve_best_first_two_colors_is_shortest() {
        let (state, params) = puzzle(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let solution = solve_best_first(&state, &params, &SearchConfig::default());
        assert_replays_to_solved(&state, &solution);
        // Any first pour leaves two half-filled tubes of the same color, so three pours are needed.
        assert_eq!(solution.moves.len(), 3);
    }

    #[test]
    fn test_already_solved_needs_no_moves() {
        let (state, params) = puzzle(vec![vec![0, 0], vec![1, 1], vec![]], 2, 2);
        let dfs = solve_dfs(&state, &SearchConfig::default());
        assert!(dfs.solution_found);
        assert!(dfs.moves.is_empty());
        let best = solve_best_first(&state, &params, &SearchConfig::default());
        assert!(best.solution_found);
        assert!(best.moves.is_empty());
    }

    #[test]
    fn test_unsolvable_reports_failure() {
        // No free space: nothing can ever be poured.
        let (state, params) = puzzle(vec![vec![0, 1], vec![1, 0]], 2, 2);
        let dfs = solve_dfs(&state, &SearchConfig::default());
        assert!(!dfs.solution_found);
        assert!(dfs.moves.is_empty());
        assert!(!dfs.stats.budget_exhausted);
        let best = solve_best_first(&state, &params, &SearchConfig::default());
        assert!(!best.solution_found);
        assert!(best.moves.is_empty());
    }

    #[test]
    fn test_dfs_depth_limit_prunes() {
        let (state, _) = puzzle(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let solution = solve_dfs(&state, &SearchConfig::default().with_depth_limit(1));
        assert!(!solution.solution_found);
        assert!(solution.moves.is_empty());
        assert_eq!(solution.stats.max_depth, 1);
    }

    #[test]
    fn test_state_budget_stops_both_searches() {
        let (state, params) = puzzle(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let config = SearchConfig::default().with_max_states(1);
        let dfs = solve_dfs(&state, &config);
        assert!(!dfs.solution_found);
        assert!(dfs.stats.budget_exhausted);
        let best = solve_best_first(&state, &params, &config);
        assert!(!best.solution_found);
        assert!(best.stats.budget_exhausted);
        assert!(best.moves.is_empty());
    }

    #[test]
    fn test_zero_time_limit_stops_search() {
        let (state, params) = puzzle(vec![vec![0, 1], vec![1, 0], vec![]], 2, 2);
        let config = SearchConfig::default().with_time_limit(Duration::ZERO);
        assert!(solve_dfs(&state, &config).stats.budget_exhausted);
        assert!(solve_best_first(&state, &params, &config).stats.budget_exhausted);
    }

    #[test]
    fn test_three_colors_both_solvers() {
        let (state, params) = puzzle(
            vec![vec![0, 1, 2], vec![2, 0, 1], vec![1, 2, 0], vec![], vec![]],
            3,
            3,
        );
        let dfs = solve_dfs(&state, &SearchConfig::default());
        assert_replays_to_solved(&state, &dfs);
        let best = solve_best_first(&state, &params, &SearchConfig::default());
        assert_replays_to_solved(&state, &best);
        assert!(best.moves.len() <= dfs.moves.len());
        // 0->3, 1->4, 0->4, 1->0, 1->3, 2->0, 2->3, 2->4 solves it in eight pours.
        assert!(best.moves.len() <= 8);
    }

    #[test]
    fn test_moves_refer_to_physical_tube_order() {
        // Same puzzle with tubes rearranged: the solution must replay on this exact layout.
        let (state, params) = puzzle(
            vec![vec![], vec![1, 2, 0], vec![0, 1, 2], vec![], vec![2, 0, 1]],
            3,
            3,
        );
        let best = solve_best_first(&state, &params, &SearchConfig::default());
        assert_replays_to_solved(&state, &best);
        let dfs = solve_dfs(&state, &SearchConfig::default());
        assert_replays_to_solved(&state, &dfs);
    }

    #[test]
    fn test_random_puzzles_agree() {
        let mut rng = SmallRng::seed_from_u64(514514);
        for _ in 0..10 {
            let mut units: Vec<Color> = (0..3).flat_map(|c| [c; 3]).collect();
            units.shuffle(&mut rng);
            let mut tubes: Vec<Vec<Color>> = units.chunks(3).map(|c| c.to_vec()).collect();
            tubes.push(Vec::new());
            tubes.push(Vec::new());
            let (state, params) = puzzle(tubes, 3, 3);

            let dfs = solve_dfs(&state, &SearchConfig::default());
            let best = solve_best_first(&state, &params, &SearchConfig::default());
            assert_eq!(dfs.solution_found, best.solution_found, "start:\n{}", state);
            if best.solution_found {
                assert_replays_to_solved(&state, &dfs);
                assert_replays_to_solved(&state, &best);
                assert!(
                    best.moves.len() <= dfs.moves.len(),
                    "best-first {} moves, DFS {} moves, start:\n{}",
                    best.moves.len(),
                    dfs.moves.len(),
                    state
                );
            }
        }
    }
}
