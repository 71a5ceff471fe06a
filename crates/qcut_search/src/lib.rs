//! # QCUT Search
//!
//! Wire-cut search for quantum circuits: find where to cut a circuit so
//! that every subcircuit fits a qubit budget, then rank the candidates by
//! their classical reconstruction cost.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcut_search // L3: Search (완료)
//!     Keys // 2큐빗/전체 순번 키 (완료)
//!     InteractionGraph // 상호작용 그래프 (완료)
//!         strip_circuit(), from_circuit(), check_graph()
//!     CutSearchModel // MIP 분할 모델 (완료)
//!         new(graph, k, maxQ, nq, C), solve(solver, cutoff)
//!     Interpreter // 절단/분할 해석 (완료)
//!         resolve_cuts(), assign_subcircuits(), subcircuit_counters()
//!     CostEstimator // 재구성 비용 (완료)
//!     CutConfig // 탐색 설정 (완료)
//!     CutSearcher // 탐색 드라이버 (완료)
//!         find_cuts() - 자동 절단
//!         cut_with_partition() - 수동 절단
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcut_search::prelude::*;
//!
//! let circuit = CircuitBuilder::new(5).h(0).cx_chain().build();
//! let config = CutConfig::new(3).with_num_subcircuits(vec![2]);
//!
//! let mut searcher = CutSearcher::with_branch_and_bound(config);
//! let solution = searcher.find_cuts(&circuit).unwrap().unwrap();
//! assert_eq!(solution.num_cuts(), 1);
//! println!("{}", solution.report());
//! ```
//!
//! ## Manual Partition
//!
//! ```rust
//! use qcut_search::prelude::*;
//!
//! let circuit = CircuitBuilder::new(5).cx_chain().build();
//! let searcher = CutSearcher::with_branch_and_bound(CutConfig::new(3));
//!
//! // Interaction-graph vertex ids, one list per subcircuit
//! let solution = searcher
//!     .cut_with_partition(&circuit, vec![vec![0, 1], vec![2, 3]])
//!     .unwrap();
//! assert_eq!(solution.positions[0].wire, 2);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Gate identity keys (Gantree: L3_Search → Keys)
pub mod key;

/// Interaction graph (Gantree: L3_Search → InteractionGraph)
pub mod graph;

/// Partition model (Gantree: L3_Search → CutSearchModel)
pub mod mip;

/// Cut interpretation (Gantree: L3_Search → Interpreter)
pub mod interpret;

/// Cost estimate (Gantree: L3_Search → CostEstimator)
pub mod cost;

/// Configuration (Gantree: L3_Search → CutConfig)
pub mod config;

/// Search driver (Gantree: L3_Search → CutSearcher)
pub mod searcher;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::CutConfig;
pub use cost::cost_estimate;
pub use graph::{check_graph, strip_circuit, InteractionGraph};
pub use interpret::{
    assign_subcircuits, o_rho_pairs, resolve_cuts, subcircuit_counters, CutPosition, PathElement,
    PathMap, SubcircuitCounter,
};
pub use key::{DepthKey, VertexKey};
pub use mip::{CutSearchModel, PartitionSolution};
pub use searcher::{CutSearcher, CutSolution};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qcut_search::prelude::*;
    //! ```

    pub use crate::config::CutConfig;
    pub use crate::cost::cost_estimate;
    pub use crate::graph::InteractionGraph;
    pub use crate::interpret::{CutPosition, PathElement, PathMap, SubcircuitCounter};
    pub use crate::searcher::{CutSearcher, CutSolution};
    pub use qcut_core::{Circuit, CircuitBuilder, CircuitGenerator, QcutError, QcutResult};
    pub use qcut_mip::{BranchAndBound, MipSolver};
}

// ============================================================================
// Version Info
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::{NAME, VERSION};
    use approx::assert_relative_eq;
    use qcut_core::Gate;

    /// 4-qubit brickwork: cz(0,1) cz(2,3) | cz(1,2) | cz(0,1) cz(2,3)
    fn brickwork() -> Circuit {
        CircuitGenerator::with_seed(7).brickwork(4, 3)
    }

    fn search(circuit: &Circuit, max_q: usize, counts: Vec<usize>) -> CutSolution {
        let config = CutConfig::new(max_q).with_num_subcircuits(counts);
        CutSearcher::with_branch_and_bound(config)
            .find_cuts(circuit)
            .unwrap()
            .unwrap()
    }

    /// Original qubit of every local qubit, per subcircuit
    fn local_to_original(solution: &CutSolution) -> Vec<Vec<usize>> {
        let mut map: Vec<Vec<usize>> = solution
            .subcircuits
            .iter()
            .map(|s| vec![usize::MAX; s.num_qubits()])
            .collect();
        for (qubit, path) in solution.path_map.iter().enumerate() {
            for element in path {
                map[element.subcircuit][element.local_qubit] = qubit;
            }
        }
        map
    }

    #[test]
    fn test_brickwork_budget_and_partition() {
        let circuit = brickwork();
        let solution = search(&circuit, 3, vec![2]);

        // Every partition fits the budget
        assert!(solution.num_d_qubits.iter().all(|&d| d <= 3));
        assert!(solution.subcircuits.iter().all(|s| s.num_qubits() <= 3));

        // Every two-qubit gate lands in exactly one subcircuit
        let two_qubit: usize = solution.subcircuits.iter().map(|s| s.count_2q()).sum();
        assert_eq!(two_qubit, circuit.count_2q());
        let total: usize = solution.subcircuits.iter().map(|s| s.gate_count()).sum();
        assert_eq!(total, circuit.gate_count());

        // Optimizer and interpreter agree on the cut count
        assert_relative_eq!(solution.objective, solution.num_cuts() as f64);
        let rho: usize = solution.counter.iter().map(|c| c.rho).sum();
        assert_eq!(rho, solution.num_cuts());
    }

    #[test]
    fn test_two_qubit_gates_survive_renaming() {
        let circuit = brickwork();
        let solution = search(&circuit, 3, vec![2]);
        let originals = local_to_original(&solution);

        let mut remaining: Vec<Gate> = circuit
            .gates()
            .iter()
            .filter(|g| g.is_two_qubit())
            .cloned()
            .collect();

        for (p, sub) in solution.subcircuits.iter().enumerate() {
            for gate in sub.gates().iter().filter(|g| g.is_two_qubit()) {
                let restored = gate.remap(|q| originals[p][q]);
                let index = remaining
                    .iter()
                    .position(|g| *g == restored)
                    .expect("restored gate missing from original");
                remaining.remove(index);
            }
        }
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_positions_descending() {
        let solution = search(&brickwork(), 3, vec![2]);
        assert!(solution
            .positions
            .windows(2)
            .all(|pair| pair[0].gate_index >= pair[1].gate_index));
    }

    #[test]
    fn test_path_map_starts_on_fresh_segments() {
        let solution = search(&brickwork(), 3, vec![2]);

        assert_eq!(solution.path_map.len(), 4);
        for path in &solution.path_map {
            assert!(!path.is_empty());
            // Consecutive segments change subcircuit
            assert!(path
                .windows(2)
                .all(|pair| pair[0].subcircuit != pair[1].subcircuit));
        }
    }

    #[test]
    fn test_cost_matches_counts() {
        let solution = search(&brickwork(), 3, vec![2]);
        let expected = cost_estimate(
            &solution.num_rho_qubits,
            &solution.num_o_qubits,
            &solution.num_d_qubits,
        );
        assert_relative_eq!(solution.cost_estimate, expected);
    }

    #[test]
    fn test_solution_serializes() {
        let solution = search(&brickwork(), 3, vec![2]);
        let json = serde_json::to_string(&solution).unwrap();
        let restored: CutSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.positions, solution.positions);
        assert_eq!(restored.path_map, solution.path_map);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "qcut_search");
    }
}
