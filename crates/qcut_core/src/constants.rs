//! Constants for QCUT
//!
//! Gantree: L0_Foundation → Constants
//!
//! Solver defaults and numerical tolerances used by the cut searcher.

// ============================================================================
// Search Constants
// Gantree: search // 탐색 상수
// ============================================================================

pub mod search {
    //! Cut search defaults

    /// Default wall-clock limit for one solver invocation (seconds)
    /// Gantree: DEFAULT_TIME_LIMIT_SECS: u64 = 300
    pub const DEFAULT_TIME_LIMIT_SECS: u64 = 300;

    /// Slack added to the cut bound so rounding never excludes `max_cuts`
    pub const CUT_SLACK: f64 = 0.1;

    /// Lower bound on a subcircuit's input qubits (forces non-empty subcircuits)
    pub const MIN_SUBCIRCUIT_INPUT: f64 = 0.1;

    /// A solver value above this is read as a set binary
    pub const ASSIGNMENT_TOLERANCE: f64 = 1e-4;

    /// Cut count below which the cost exponent bound stays at its base value
    pub const COST_EXPONENT_CUT_HEADROOM: usize = 20;

    /// Default maximum number of cuts
    pub const DEFAULT_MAX_CUTS: usize = 10;

    /// Default candidate subcircuit counts
    pub const DEFAULT_NUM_SUBCIRCUITS: [usize; 2] = [2, 3];

    /// Upper bound on the cost exponent variable for subcircuits past the first
    #[inline]
    pub fn cost_exponent_bound(num_qubits: usize, max_cuts: usize) -> usize {
        num_qubits + 2 * max_cuts.max(COST_EXPONENT_CUT_HEADROOM)
    }
}

// ============================================================================
// Solver Constants
// Gantree: solver // 솔버 상수
// ============================================================================

pub mod solver {
    //! Numerical tolerances for the built-in integer solver

    /// Feasibility tolerance for linear constraints
    pub const FEASIBILITY_TOL: f64 = 1e-6;

    /// Tolerance used when rounding derived integer bounds
    pub const INTEGRALITY_TOL: f64 = 1e-6;

    /// Nodes processed between wall-clock checks
    pub const TIME_CHECK_INTERVAL: u64 = 64;
}

// ============================================================================
// Tests
// ============================================================================
