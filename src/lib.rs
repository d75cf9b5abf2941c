//! # Water Sort Solver Library
//!
//! This library solves the tube-based liquid color-sorting puzzle: given tubes
//! each holding a stack of colored units, it finds a sequence of pours that
//! leaves every tube either empty or full with a single color.
//!
//! It is used by two binaries:
//! - `water_sort_solver`: Reads a puzzle file, runs one of the two searches,
//!   and prints the moves and the final state.
//! - `compare_solvers`: Runs both searches over a set of puzzle files and
//!   compares solution lengths and explored states.
//!
//! ## Modules
//! - `engine`: The state model (`Tube`, `Move`, `PuzzleParams`, `State`), the pour
//!   rule with its undo, the goal test, and tube-order-independent canonicalization.
//! - `moves`: Enumeration of legal pours, in place or as copied successor states.
//! - `heuristics`: The disorder score guiding best-first search.
//! - `solver`: `solve_dfs` (any solution) and `solve_best_first` (shortest solution).
//! - `utils`: Parsing of the text puzzle format.
//! - `cli`: Argument and logging setup shared by the binaries.
//! - `error`: The `SolverError` type.

pub mod cli;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod moves;
pub mod solver;
pub mod utils;

use crate::engine::{Color, Move, PuzzleParams, State};
use crate::error::Result;
use crate::solver::{solve_best_first, solve_dfs, SearchConfig, Solution};

/// Solving session for one puzzle size.
///
/// Each call to [`Solver::solve`] or [`Solver::optimal_solve`] validates the
/// initial layout, replaces the previous result, and records whether a solution
/// was found together with its moves.
///
/// # Examples
/// ```
/// use water_sort_solver::engine::PuzzleParams;
/// use water_sort_solver::Solver;
///
/// let mut solver = Solver::new(PuzzleParams::new(2, 1, 2).unwrap());
/// solver.optimal_solve(&[vec![0, 1], vec![1, 0], vec![]]).unwrap();
/// assert!(solver.solution_found());
/// assert_eq!(solver.moves().len(), 3);
///
/// // Malformed input is rejected before searching.
/// assert!(solver.solve(&[vec![0, 1, 1], vec![1, 0], vec![]]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Solver {
    params: PuzzleParams,
    config: SearchConfig,
    solution: Solution,
}

impl Solver {
    pub fn new(params: PuzzleParams) -> Self {
        Solver::with_config(params, SearchConfig::default())
    }

    pub fn with_config(params: PuzzleParams, config: SearchConfig) -> Self {
        Solver {
            params,
            config,
            solution: Solution::default(),
        }
    }

    /// Finds any solution with depth-first search.
    ///
    /// # Errors
    /// Returns `SolverError::InvalidPuzzle` if `initial` does not match the
    /// puzzle parameters. Not finding a solution is not an error.
    pub fn solve(&mut self, initial: &[Vec<Color>]) -> Result<()> {
        self.solution = Solution::default();
        let state = self.initial_state(initial)?;
        self.solution = solve_dfs(&state, &self.config);
        Ok(())
    }

    /// Finds a shortest solution with best-first search.
    ///
    /// # Errors
    /// Same as [`Solver::solve`].
    pub fn optimal_solve(&mut self, initial: &[Vec<Color>]) -> Result<()> {
        self.solution = Solution::default();
        let state = self.initial_state(initial)?;
        self.solution = solve_best_first(&state, &self.params, &self.config);
        Ok(())
    }

    pub fn solution_found(&self) -> bool {
        self.solution.solution_found
    }

    /// Moves of the last solution, as `(source, destination)` tube indices.
    pub fn moves(&self) -> &[Move] {
        &self.solution.moves
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn params(&self) -> &PuzzleParams {
        &self.params
    }

    fn initial_state(&self, initial: &[Vec<Color>]) -> Result<State> {
        State::from_units(initial.to_vec(), &self.params)
    }
}
