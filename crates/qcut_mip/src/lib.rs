//! # QCUT MIP
//!
//! Integer programming model and solver interface for the QCUT cut
//! searcher.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcut_mip // L2: Mip (완료)
//!     Model // 변수/제약/목적함수 (완료)
//!     SolverTrait // 솔버 인터페이스 (완료)
//!     BranchAndBound // 내장 분기 한정 솔버 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcut_mip::prelude::*;
//!
//! let mut model = Model::new("knapsack");
//! let x = model.add_binary();
//! let y = model.add_binary();
//! model.add_le(x * 2.0 + y * 3.0, 4.0);
//! model.set_objective(x * 3.0 + y * 4.0, ObjSense::Maximize);
//!
//! let solution = BranchAndBound::new()
//!     .solve(&model, &SolveParams::new())
//!     .unwrap();
//! assert_eq!(solution.objective, Some(4.0));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Model types (Gantree: L2_Mip → Model)
pub mod model;

/// Solver trait and solution types (Gantree: L2_Mip → SolverTrait)
pub mod solver;

/// Built-in solver (Gantree: L2_Mip → BranchAndBound)
pub mod branch_bound;

// ============================================================================
// Re-exports
// ============================================================================

pub use branch_bound::BranchAndBound;
pub use model::{Constraint, LinExpr, Model, ObjSense, Sense, Var, VarInfo, VarType};
pub use solver::{MipSolver, SolveParams, SolveStatus, Solution};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qcut_mip::prelude::*;
    //! ```

    pub use crate::branch_bound::BranchAndBound;
    pub use crate::model::{LinExpr, Model, ObjSense, Sense, Var, VarType};
    pub use crate::solver::{MipSolver, SolveParams, SolveStatus, Solution};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;

    /// Two-way graph partition with a balance bound, minimizing cut edges
    #[test]
    fn test_small_partition_model() {
        // path 0-1-2-3, at most 2 vertices per part
        let edges = [(0, 1), (1, 2), (2, 3)];
        let mut model = Model::new("bisect");
        let side: Vec<Var> = (0..4).map(|_| model.add_binary()).collect();
        let cut: Vec<Var> = edges.iter().map(|_| model.add_binary()).collect();

        for (&(u, v), &e) in edges.iter().zip(&cut) {
            model.add_ge(e, side[u] - side[v]);
            model.add_ge(e, side[v] - side[u]);
        }
        model.add_eq(LinExpr::sum(side.iter().copied()), 2.0);
        model.add_eq(side[0], 1.0);
        model.set_objective(LinExpr::sum(cut.iter().copied()), ObjSense::Minimize);

        let solution = BranchAndBound::new().solve(&model, &SolveParams::new()).unwrap();
        assert!(solution.is_optimal());
        assert_relative_eq!(solution.objective.unwrap(), 1.0);
        assert_eq!(solution.value(side[1]), Some(1.0));
        assert_eq!(solution.value(side[2]), Some(0.0));
        assert!(model.is_feasible(&solution.values, 1e-9));
    }

    #[test]
    fn test_solver_through_trait_object() {
        let solver: Box<dyn MipSolver> = Box::new(BranchAndBound::new());
        let mut model = Model::new("trivial");
        let x = model.add_var(VarType::Integer, 2.0, 5.0);
        model.set_objective(x, ObjSense::Minimize);

        let solution = solver.solve(&model, &SolveParams::new()).unwrap();
        assert_eq!(solver.name(), "branch_and_bound");
        assert_eq!(solution.value(x), Some(2.0));
    }
}
