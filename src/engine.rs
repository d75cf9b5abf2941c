//! State model for the water sort puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Tube`: an ordered stack of color units, bottom to top.
//! - `Move`: a pour from a source tube to a destination tube.
//! - `PuzzleParams`: the fixed puzzle dimensions (colors, empty tubes, capacity).
//! - `State`: a full configuration of tubes, with the pour rule, its undo,
//!   the goal test, and canonicalization for deduplication.
//! - `CanonicalState`: a tube-order-independent snapshot used as a map key.
use crate::error::{Result, SolverError};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A color identifier. Colors are numbered from 0 up to `n_color - 1`.
pub type Color = u8;

/// Base used to fold the units of a tube into a tube hash.
const TUBE_HASH_BASE: u64 = 7;
/// Base used to fold tube hashes into a state hash.
const STATE_HASH_BASE: u64 = 293;
/// Prime modulus for the canonical hash.
const HASH_MODULUS: u64 = 999_999_937;

/// Returns the label used to display a color: `A` for 0, `B` for 1, ...,
/// and `[n]` for ids past `Z`.
///
/// # Examples
/// ```
/// use water_sort_solver::engine::color_label;
/// assert_eq!(color_label(0), "A");
/// assert_eq!(color_label(25), "Z");
/// assert_eq!(color_label(26), "[26]");
/// ```
pub fn color_label(color: Color) -> String {
    if color < 26 {
        ((b'A' + color) as char).to_string()
    } else {
        format!("[{}]", color)
    }
}

/// A single pour action from tube `src` into tube `dst`.
///
/// Indices refer to tubes in the state's current (unsorted) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: usize,
    pub dst: usize,
}

impl Move {
    pub fn new(src: usize, dst: usize) -> Self {
        Move { src, dst }
    }
}

impl From<(usize, usize)> for Move {
    fn from((src, dst): (usize, usize)) -> Self {
        Move { src, dst }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

/// An ordered stack of color units. Index 0 is the bottom of the tube.
///
/// Tubes order lexicographically on their unit sequence, which is the order
/// used to canonicalize a state.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tube {
    units: Vec<Color>,
}

impl Tube {
    /// Creates an empty tube.
    pub fn new() -> Self {
        Tube { units: Vec::new() }
    }

    /// Creates a tube holding `units`, listed bottom to top.
    pub fn from_units(units: Vec<Color>) -> Self {
        Tube { units }
    }

    pub fn units(&self) -> &[Color] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the color on top of the tube, or `None` for an empty tube.
    pub fn top(&self) -> Option<Color> {
        self.units.last().copied()
    }

    /// Returns `true` if the tube is exactly full and every unit has the same color.
    ///
    /// A monochrome tube that is only partially filled is not complete.
    pub fn is_complete(&self, capacity: usize) -> bool {
        self.units.len() == capacity && self.units.windows(2).all(|w| w[0] == w[1])
    }

    /// Number of same-colored units forming the top run of the tube.
    pub fn top_run_len(&self) -> usize {
        match self.top() {
            Some(top) => self.units.iter().rev().take_while(|&&c| c == top).count(),
            None => 0,
        }
    }

    fn push(&mut self, unit: Color) {
        self.units.push(unit);
    }

    fn pop(&mut self) -> Option<Color> {
        self.units.pop()
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.is_empty() {
            return write!(f, "-");
        }
        for &unit in &self.units {
            write!(f, "{}", color_label(unit))?;
        }
        Ok(())
    }
}

/// Fixed dimensions of a puzzle, shared by every state of a solving session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleParams {
    /// Number of distinct colors, which is also the number of initially filled tubes.
    pub n_color: usize,
    /// Number of auxiliary empty tubes.
    pub n_empty_tubes: usize,
    /// Capacity of every tube.
    pub capacity: usize,
}

impl PuzzleParams {
    /// Creates puzzle parameters, rejecting a zero color count or capacity.
    pub fn new(n_color: usize, n_empty_tubes: usize, capacity: usize) -> Result<Self> {
        if n_color == 0 {
            return Err(SolverError::InvalidParams(
                "number of colors must be positive".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(SolverError::InvalidParams(
                "tube capacity must be positive".to_string(),
            ));
        }
        Ok(PuzzleParams {
            n_color,
            n_empty_tubes,
            capacity,
        })
    }

    /// Infers parameters from a tube layout.
    ///
    /// The color count is the number of distinct colors present, the capacity is
    /// `capacity` if given and otherwise the length of the longest tube, and every
    /// tube beyond the color count is an auxiliary tube.
    pub fn infer(tubes: &[Tube], capacity: Option<usize>) -> Result<Self> {
        let colors: BTreeSet<Color> = tubes.iter().flat_map(|t| t.units().iter().copied()).collect();
        let n_color = colors.len();
        if n_color > tubes.len() {
            return Err(SolverError::InvalidParams(format!(
                "{} colors cannot fit in {} tubes",
                n_color,
                tubes.len()
            )));
        }
        let capacity = capacity.unwrap_or_else(|| tubes.iter().map(Tube::len).max().unwrap_or(0));
        PuzzleParams::new(n_color, tubes.len() - n_color, capacity)
    }

    /// Total number of tubes in the puzzle.
    pub fn tube_count(&self) -> usize {
        self.n_color + self.n_empty_tubes
    }
}

/// A full configuration of tubes.
///
/// The tube order is physical: move indices refer to it. Identity for
/// deduplication ignores the order, see [`State::canonical`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    tubes: Vec<Tube>,
    capacity: usize,
}

impl State {
    /// Creates a state after validating it against `params`.
    ///
    /// # Errors
    /// Returns `SolverError::InvalidPuzzle` if the tube count does not match
    /// `params.tube_count()`, a tube holds more than `params.capacity` units,
    /// or a color id is not below `params.n_color`.
    pub fn new(tubes: Vec<Tube>, params: &PuzzleParams) -> Result<Self> {
        if tubes.len() != params.tube_count() {
            return Err(SolverError::InvalidPuzzle(format!(
                "expected {} tubes ({} colors + {} empty), found {}",
                params.tube_count(),
                params.n_color,
                params.n_empty_tubes,
                tubes.len()
            )));
        }
        for (i, tube) in tubes.iter().enumerate() {
            if tube.len() > params.capacity {
                return Err(SolverError::InvalidPuzzle(format!(
                    "tube {} holds {} units, capacity is {}",
                    i,
                    tube.len(),
                    params.capacity
                )));
            }
            if let Some(&bad) = tube.units().iter().find(|&&c| c as usize >= params.n_color) {
                return Err(SolverError::InvalidPuzzle(format!(
                    "tube {} holds color {}, but the puzzle has {} colors",
                    i, bad, params.n_color
                )));
            }
        }
        Ok(State {
            tubes,
            capacity: params.capacity,
        })
    }

    /// Creates a state from raw unit lists, one per tube, bottom to top.
    ///
    /// # Examples
    /// ```
    /// use water_sort_solver::engine::{PuzzleParams, State};
    /// let params = PuzzleParams::new(2, 1, 2).unwrap();
    /// let state = State::from_units(vec![vec![0, 1], vec![1, 0], vec![]], &params).unwrap();
    /// assert_eq!(state.tube_count(), 3);
    /// assert!(!state.is_solved());
    /// ```
    pub fn from_units(units: Vec<Vec<Color>>, params: &PuzzleParams) -> Result<Self> {
        State::new(units.into_iter().map(Tube::from_units).collect(), params)
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube(&self, index: usize) -> &Tube {
        &self.tubes[index]
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Goal test: every tube is either empty or full with a single color.
    pub fn is_solved(&self) -> bool {
        self.tubes
            .iter()
            .all(|tube| tube.is_empty() || tube.is_complete(self.capacity))
    }

    /// Returns `true` if at least one unit can be poured for `mv`.
    ///
    /// A pour is legal when the indices are distinct and in range, the source is
    /// non-empty, the destination is not full, and the destination is empty or
    /// has the same top color as the source.
    pub fn can_pour(&self, mv: Move) -> bool {
        if mv.src == mv.dst || mv.src >= self.tubes.len() || mv.dst >= self.tubes.len() {
            return false;
        }
        let (src, dst) = (&self.tubes[mv.src], &self.tubes[mv.dst]);
        match src.top() {
            Some(color) => dst.len() < self.capacity && dst.top().map_or(true, |t| t == color),
            None => false,
        }
    }

    /// Applies `mv` in place, moving units one at a time while the pour stays legal.
    ///
    /// Returns the number of units moved so the caller can reverse the pour with
    /// [`State::unpour`]. An illegal move leaves the state untouched and returns 0.
    pub fn pour(&mut self, mv: Move) -> usize {
        let mut moved = 0;
        while self.can_pour(mv) {
            let Some(unit) = self.tubes[mv.src].pop() else {
                break;
            };
            self.tubes[mv.dst].push(unit);
            moved += 1;
        }
        moved
    }

    /// Reverses a pour of `count` units made by `mv`, moving them back from the
    /// destination to the source.
    pub fn unpour(&mut self, mv: Move, count: usize) {
        for _ in 0..count {
            let Some(unit) = self.tubes[mv.dst].pop() else {
                debug_assert!(false, "unpour of {} asked for more units than poured", mv);
                break;
            };
            self.tubes[mv.src].push(unit);
        }
    }

    /// Applies `moves` in order to a copy of this state.
    ///
    /// # Errors
    /// Returns `SolverError::IllegalMove` for the first move that pours nothing.
    pub fn replay(&self, moves: &[Move]) -> Result<State> {
        let mut state = self.clone();
        for (step, &mv) in moves.iter().enumerate() {
            if state.pour(mv) == 0 {
                return Err(SolverError::IllegalMove {
                    src: mv.src,
                    dst: mv.dst,
                    step,
                });
            }
        }
        Ok(state)
    }

    /// Hash of the state that ignores tube order.
    ///
    /// Tubes are sorted, each tube is folded into a polynomial hash (base 7, each
    /// unit contributing `color + 1`), and tube hashes are folded with base 293,
    /// all modulo the prime 999 999 937. Distinct states can collide; maps keyed by
    /// [`CanonicalState`] resolve collisions by comparing contents.
    pub fn canonical_hash(&self) -> u64 {
        let mut sorted: Vec<&Tube> = self.tubes.iter().collect();
        sorted.sort();
        fingerprint(sorted.into_iter())
    }

    /// Snapshot of this state that is invariant under tube permutation.
    pub fn canonical(&self) -> CanonicalState {
        let mut tubes = self.tubes.clone();
        tubes.sort();
        let hash = fingerprint(tubes.iter());
        CanonicalState { tubes, hash }
    }
}

fn fingerprint<'a>(tubes: impl Iterator<Item = &'a Tube>) -> u64 {
    tubes.fold(0, |state_hash, tube| {
        let tube_hash = tube.units().iter().fold(0, |h, &unit| {
            (h * TUBE_HASH_BASE + unit as u64 + 1) % HASH_MODULUS
        });
        (state_hash * STATE_HASH_BASE + tube_hash) % HASH_MODULUS
    })
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tube) in self.tubes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>2} | {}", i, tube)?;
        }
        Ok(())
    }
}

/// A state with its tubes sorted, keyed by its canonical hash.
///
/// `Hash` writes only the precomputed fingerprint, while equality compares the
/// sorted tubes, so two states that differ only by tube order are equal and a
/// fingerprint collision between different states is still told apart.
#[derive(Clone, Debug, Eq)]
pub struct CanonicalState {
    tubes: Vec<Tube>,
    hash: u64,
}

impl CanonicalState {
    pub fn fingerprint(&self) -> u64 {
        self.hash
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }
}

impl PartialEq for CanonicalState {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.tubes == other.tubes
    }
}

impl Hash for CanonicalState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
