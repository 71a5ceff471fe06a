//! Solver interface and solution types
//!
//! Gantree: L2_Mip → SolverTrait
//!
//! Any integer-programming engine plugs into the cut searcher through
//! [`MipSolver`]. The searcher only needs an optimal (or best-found)
//! assignment, the objective, the gap and a wall-clock limit with an
//! objective cutoff.

use crate::model::{Model, Var};
use qcut_core::search::DEFAULT_TIME_LIMIT_SECS;
use qcut_core::QcutResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Parameters
// ============================================================================

/// Per-call solver parameters
/// Gantree: SolveParams // 솔버 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveParams {
    /// Wall-clock limit
    pub time_limit: Duration,

    /// Only solutions with objective strictly better than this are accepted
    pub cutoff: Option<f64>,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            cutoff: None,
        }
    }
}

impl SolveParams {
    /// Create default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wall-clock limit
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Set the objective cutoff (ignored when not finite)
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.is_finite().then_some(cutoff);
        self
    }
}

// ============================================================================
// Solution
// ============================================================================

/// Termination status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Search completed; the incumbent (if any) is optimal
    Optimal,
    /// No feasible assignment exists
    Infeasible,
    /// Every feasible assignment is no better than the cutoff
    Cutoff,
    /// Stopped by the time or node limit
    TimeLimit,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Cutoff => "cutoff",
            SolveStatus::TimeLimit => "time limit",
        };
        write!(f, "{}", label)
    }
}

/// Solver output
/// Gantree: Solution // 해
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Termination status
    pub status: SolveStatus,

    /// Best objective found, in the model's sense
    pub objective: Option<f64>,

    /// Best assignment (empty when none was found)
    pub values: Vec<f64>,

    /// Wall-clock time in seconds
    pub runtime: f64,

    /// Nodes explored
    pub node_count: u64,

    /// Relative gap between the incumbent and the best bound
    pub mip_gap: f64,
}

impl Solution {
    /// Solution without an assignment
    pub fn empty(status: SolveStatus, runtime: f64, node_count: u64) -> Self {
        Self {
            status,
            objective: None,
            values: Vec::new(),
            runtime,
            node_count,
            mip_gap: f64::INFINITY,
        }
    }

    /// Whether an assignment is available
    pub fn has_solution(&self) -> bool {
        !self.values.is_empty()
    }

    /// Whether the assignment is proven optimal
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal && self.has_solution()
    }

    /// Value of a variable in the assignment
    pub fn value(&self, var: Var) -> Option<f64> {
        self.values.get(var.index()).copied()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.objective {
            Some(obj) => write!(
                f,
                "Solution({}, obj={}, gap={:.4}, nodes={}, {:.3}s)",
                self.status, obj, self.mip_gap, self.node_count, self.runtime
            ),
            None => write!(
                f,
                "Solution({}, nodes={}, {:.3}s)",
                self.status, self.node_count, self.runtime
            ),
        }
    }
}

// ============================================================================
// Solver Trait
// ============================================================================

/// Integer-programming oracle
/// Gantree: MipSolver // 솔버 인터페이스
pub trait MipSolver: Send + Sync {
    /// Solver name
    fn name(&self) -> &str;

    /// Solve a model
    /// Gantree: solve(model, params) -> Result<Solution>
    fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution>;
}

impl<S: MipSolver + ?Sized> MipSolver for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution> {
        (**self).solve(model, params)
    }
}

impl<S: MipSolver + ?Sized> MipSolver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution> {
        (**self).solve(model, params)
    }
}

// ============================================================================
// Tests
// ============================================================================
