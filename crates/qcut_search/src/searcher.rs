//! Cut search driver
//!
//! Gantree: L3_Search → CutSearcher
//!
//! Tries every candidate subcircuit count in order, interprets each
//! feasible partition and keeps the one with the lowest reconstruction cost.

use crate::config::CutConfig;
use crate::cost::cost_estimate;
use crate::graph::InteractionGraph;
use crate::interpret::{
    assign_subcircuits, o_rho_pairs, resolve_cuts, subcircuit_counters, CutPosition, PathMap,
    SubcircuitCounter,
};
use crate::key::VertexKey;
use crate::mip::{CutSearchModel, PartitionSolution};
use qcut_core::{Circuit, QcutError, QcutResult};
use qcut_mip::{BranchAndBound, MipSolver};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Instant;

// ============================================================================
// CutSolution
// ============================================================================

/// Accepted cut with everything needed to run and recombine subcircuits
/// Gantree: CutSolution // 절단 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSolution {
    /// Circuit that was cut
    pub circuit: Circuit,

    /// Per-subcircuit qubit budget
    pub max_subcircuit_qubit: usize,

    /// Subcircuits on local qubits
    pub subcircuits: Vec<Circuit>,

    /// Route of every original qubit through the subcircuits
    pub path_map: PathMap,

    /// Cut positions, descending by gate index
    pub positions: Vec<CutPosition>,

    /// Qubit role counters per subcircuit
    pub counter: Vec<SubcircuitCounter>,

    /// Qubits entering each subcircuit through a cut
    pub num_rho_qubits: Vec<usize>,

    /// Qubits leaving each subcircuit through a cut
    pub num_o_qubits: Vec<usize>,

    /// Input qubits of each subcircuit
    pub num_d_qubits: Vec<usize>,

    /// Reconstruction cost estimate
    pub cost_estimate: f64,

    /// Number of cut edges reported by the partition step
    pub objective: f64,

    /// Solver time in seconds
    pub searcher_time: f64,

    /// Whether the partition was proven optimal
    pub optimal: bool,

    /// Relative optimality gap
    pub mip_gap: f64,

    /// Solver nodes explored
    pub node_count: u64,

    /// Number of subcircuits
    pub num_subcircuits: usize,
}

impl CutSolution {
    /// Number of cuts applied to the circuit
    pub fn num_cuts(&self) -> usize {
        self.positions.len()
    }

    /// Per-subcircuit summary
    /// Gantree: report() -> String // 요약
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} subcircuits, {} cuts (maxQ = {})",
            self.num_subcircuits,
            self.num_cuts(),
            self.max_subcircuit_qubit
        );
        for (p, counter) in self.counter.iter().enumerate() {
            let _ = writeln!(
                out,
                "  subcircuit {}: rho = {}, O = {}, width = {}, effective = {}, depth = {}, size = {}",
                p,
                counter.rho,
                counter.o,
                counter.d,
                counter.effective,
                counter.depth,
                counter.size
            );
        }
        let _ = writeln!(
            out,
            "  objective = {:.0}, time = {:.3}s, optimal = {}, gap = {:.4}",
            self.objective, self.searcher_time, self.optimal, self.mip_gap
        );
        let _ = write!(out, "  estimated cost = {:.3e}", self.cost_estimate);
        out
    }
}

// ============================================================================
// CutSearcher
// ============================================================================

/// Cut search driver
/// Gantree: CutSearcher<S: MipSolver> // 탐색 드라이버
#[derive(Debug)]
pub struct CutSearcher<S: MipSolver> {
    config: CutConfig,
    solver: S,
    best_cost: f64,
}

impl CutSearcher<BranchAndBound> {
    /// Searcher backed by the built-in branch-and-bound solver
    pub fn with_branch_and_bound(config: CutConfig) -> Self {
        Self::new(config, BranchAndBound::new())
    }
}

impl<S: MipSolver> CutSearcher<S> {
    /// Create searcher
    pub fn new(config: CutConfig, solver: S) -> Self {
        Self {
            config,
            solver,
            best_cost: f64::INFINITY,
        }
    }

    /// Configuration
    pub fn config(&self) -> &CutConfig {
        &self.config
    }

    /// Solver
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Lowest cost accepted by the last search
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    // ========================================================================
    // Automatic Mode
    // ========================================================================

    /// Search every configured subcircuit count for the cheapest cut
    ///
    /// Returns `Ok(None)` when no count yields a feasible partition.
    /// Structural faults in the circuit or partition are returned as errors.
    /// Gantree: find_cuts(&Circuit) -> Result<Option<CutSolution>> // 자동 절단
    pub fn find_cuts(&mut self, circuit: &Circuit) -> QcutResult<Option<CutSolution>> {
        self.config.validate().map_err(QcutError::InvalidConfig)?;

        let graph = InteractionGraph::from_circuit(circuit)?;
        let num_qubits = circuit.num_qubits();
        self.best_cost = f64::INFINITY;
        let mut best: Option<CutSolution> = None;

        log::info!(
            "searching cuts for {} qubits, {} two-qubit gates: {}",
            num_qubits,
            graph.n_vertices(),
            self.config
        );

        for &num_subcircuit in &self.config.num_subcircuits {
            if !self.config.is_candidate(num_subcircuit, num_qubits) {
                log::info!(
                    "{} subcircuits cannot hold {} qubits, skipped",
                    num_subcircuit,
                    num_qubits
                );
                continue;
            }

            let model = CutSearchModel::new(
                &graph,
                num_subcircuit,
                self.config.max_subcircuit_qubit,
                num_qubits,
                self.config.max_cuts,
            )?
            .with_time_limit(self.config.time_limit());

            let partition = match model.solve(&self.solver, self.best_cost)? {
                Some(partition) => partition,
                None => {
                    log::info!("{} subcircuits: no feasible partition", num_subcircuit);
                    continue;
                }
            };

            let solution = build_solution(circuit, self.config.max_subcircuit_qubit, partition)?;
            log::debug!("trial:\n{}", solution.report());

            if solution.cost_estimate < self.best_cost {
                log::info!(
                    "{} subcircuits: {} cuts, cost {:.3e} accepted",
                    num_subcircuit,
                    solution.num_cuts(),
                    solution.cost_estimate
                );
                self.best_cost = solution.cost_estimate;
                best = Some(solution);
            }
        }

        if best.is_none() {
            log::info!("no valid cut found");
        }
        Ok(best)
    }

    // ========================================================================
    // Manual Mode
    // ========================================================================

    /// Evaluate a caller-supplied partition of interaction-graph vertex ids
    ///
    /// Every vertex id must appear exactly once. The solver is not invoked;
    /// rho, O and d come from the interpreted subcircuits.
    /// Gantree: cut_with_partition(&Circuit, partitions) -> Result<CutSolution> // 수동 절단
    pub fn cut_with_partition(
        &self,
        circuit: &Circuit,
        partitions: Vec<Vec<usize>>,
    ) -> QcutResult<CutSolution> {
        let start = Instant::now();
        let graph = InteractionGraph::from_circuit(circuit)?;
        let n_vertices = graph.n_vertices();

        let assigned: usize = partitions.iter().map(Vec::len).sum();
        if assigned != n_vertices {
            return Err(QcutError::PartitionSumMismatch {
                assigned,
                expected: n_vertices,
            });
        }

        let mut partition_of = vec![None; n_vertices];
        for (p, ids) in partitions.iter().enumerate() {
            for &id in ids {
                match partition_of.get_mut(id) {
                    Some(slot) if slot.is_none() => *slot = Some(p),
                    _ => {
                        return Err(QcutError::InvalidConfig(format!(
                            "vertex id {} is out of range or repeated",
                            id
                        )))
                    }
                }
            }
        }

        let keys = graph.vertex_keys();
        let subcircuit_vertices: Vec<Vec<VertexKey>> = partitions
            .iter()
            .map(|ids| ids.iter().map(|&id| keys[id]).collect())
            .collect();
        let cut_edges: Vec<(VertexKey, VertexKey)> = graph
            .edges()
            .iter()
            .filter(|&&(u, v)| partition_of[u] != partition_of[v])
            .map(|&(u, v)| (keys[u], keys[v]))
            .collect();

        let positions = resolve_cuts(&cut_edges, circuit)?;
        let (subcircuits, path_map) = assign_subcircuits(&subcircuit_vertices, circuit)?;
        let counter = subcircuit_counters(&subcircuits, &o_rho_pairs(&path_map));

        let num_rho_qubits: Vec<usize> = counter.iter().map(|c| c.rho).collect();
        let num_o_qubits: Vec<usize> = counter.iter().map(|c| c.o).collect();
        let num_d_qubits: Vec<usize> = counter.iter().map(|c| c.d).collect();
        let cost = cost_estimate(&num_rho_qubits, &num_o_qubits, &num_d_qubits);

        Ok(CutSolution {
            circuit: circuit.clone(),
            max_subcircuit_qubit: self.config.max_subcircuit_qubit,
            num_subcircuits: subcircuits.len(),
            subcircuits,
            path_map,
            positions,
            counter,
            num_rho_qubits,
            num_o_qubits,
            num_d_qubits,
            cost_estimate: cost,
            objective: cut_edges.len() as f64,
            searcher_time: start.elapsed().as_secs_f64(),
            optimal: false,
            mip_gap: 0.0,
            node_count: 0,
        })
    }
}

/// Turn a decoded partition into a full result bundle
fn build_solution(
    circuit: &Circuit,
    max_subcircuit_qubit: usize,
    partition: PartitionSolution,
) -> QcutResult<CutSolution> {
    let positions = resolve_cuts(&partition.cut_edges, circuit)?;
    let (subcircuits, path_map) = assign_subcircuits(&partition.subcircuit_vertices, circuit)?;
    let counter = subcircuit_counters(&subcircuits, &o_rho_pairs(&path_map));
    let cost = cost_estimate(
        &partition.num_rho_qubits,
        &partition.num_o_qubits,
        &partition.num_d_qubits,
    );

    Ok(CutSolution {
        circuit: circuit.clone(),
        max_subcircuit_qubit,
        num_subcircuits: partition.num_subcircuits(),
        subcircuits,
        path_map,
        positions,
        counter,
        num_rho_qubits: partition.num_rho_qubits,
        num_o_qubits: partition.num_o_qubits,
        num_d_qubits: partition.num_d_qubits,
        cost_estimate: cost,
        objective: partition.objective,
        searcher_time: partition.runtime,
        optimal: partition.optimal,
        mip_gap: partition.mip_gap,
        node_count: partition.node_count,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qcut_core::CircuitBuilder;
    use qcut_mip::{Model, SolveParams, Solution};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Branch and bound that counts its invocations
    #[derive(Default)]
    struct CountingSolver {
        calls: AtomicUsize,
    }

    impl MipSolver for CountingSolver {
        fn name(&self) -> &str {
            "counting"
        }

        fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BranchAndBound::new().solve(model, params)
        }
    }

    /// Branch and bound that records the cutoff of every call
    #[derive(Default)]
    struct RecordingSolver {
        cutoffs: Mutex<Vec<Option<f64>>>,
    }

    impl MipSolver for RecordingSolver {
        fn name(&self) -> &str {
            "recording"
        }

        fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution> {
            if let Ok(mut cutoffs) = self.cutoffs.lock() {
                cutoffs.push(params.cutoff);
            }
            BranchAndBound::new().solve(model, params)
        }
    }

    /// Solver that always faults
    struct FaultySolver;

    impl MipSolver for FaultySolver {
        fn name(&self) -> &str {
            "faulty"
        }

        fn solve(&self, _model: &Model, _params: &SolveParams) -> QcutResult<Solution> {
            Err(QcutError::SolverError("out of memory".into()))
        }
    }

    fn chain() -> Circuit {
        CircuitBuilder::new(5).cx_chain().build()
    }

    fn two_components() -> Circuit {
        CircuitBuilder::new(4)
            .cnot(0, 1)
            .cnot(0, 1)
            .cnot(2, 3)
            .cnot(2, 3)
            .build()
    }

    #[test]
    fn test_skips_impossible_counts() {
        let config = CutConfig::new(3)
            .with_max_cuts(1)
            .with_num_subcircuits(vec![3, 4, 6]);
        let mut searcher = CutSearcher::new(config, CountingSolver::default());

        let result = searcher.find_cuts(&chain()).unwrap();
        assert!(result.is_none());
        assert_eq!(searcher.solver().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_chain_single_cut() {
        let config = CutConfig::new(3).with_num_subcircuits(vec![2]);
        let mut searcher = CutSearcher::new(config, CountingSolver::default());

        let solution = searcher.find_cuts(&chain()).unwrap().unwrap();
        assert_eq!(searcher.solver().calls.load(Ordering::SeqCst), 1);
        assert_eq!(solution.num_subcircuits, 2);
        assert_eq!(solution.num_cuts(), 1);
        assert_eq!(solution.num_rho_qubits, vec![0, 1]);
        assert_eq!(solution.num_o_qubits, vec![1, 0]);
        assert_eq!(solution.num_d_qubits, vec![3, 3]);
        assert_relative_eq!(solution.cost_estimate, 128.0);
        assert_relative_eq!(searcher.best_cost(), 128.0);
        assert!(solution.optimal);

        // Every subcircuit fits the budget
        assert!(solution.subcircuits.iter().all(|s| s.num_qubits() <= 3));
    }

    #[test]
    fn test_cut_count_consistency() {
        let config = CutConfig::new(3).with_num_subcircuits(vec![2]);
        let mut searcher = CutSearcher::with_branch_and_bound(config);
        let solution = searcher.find_cuts(&chain()).unwrap().unwrap();

        let rho: usize = solution.counter.iter().map(|c| c.rho).sum();
        let o: usize = solution.counter.iter().map(|c| c.o).sum();
        assert_relative_eq!(solution.objective, solution.num_cuts() as f64);
        assert_eq!(rho, solution.num_cuts());
        assert_eq!(o, solution.num_cuts());
        assert_eq!(solution.positions.len(), 1);
    }

    #[test]
    fn test_best_cost_feeds_next_cutoff() {
        let config = CutConfig::new(3).with_num_subcircuits(vec![2, 3]);
        let mut searcher = CutSearcher::new(config, RecordingSolver::default());
        searcher.find_cuts(&chain()).unwrap().unwrap();

        let cutoffs = searcher.solver().cutoffs.lock().unwrap().clone();
        assert_eq!(cutoffs, vec![None, Some(128.0)]);
    }

    #[test]
    fn test_barrier_keeps_budget() {
        let circuit = CircuitBuilder::new(5)
            .cnot(0, 1)
            .cnot(1, 2)
            .barrier()
            .cnot(2, 3)
            .cnot(3, 4)
            .build();
        let config = CutConfig::new(3).with_num_subcircuits(vec![2]);
        let mut searcher = CutSearcher::with_branch_and_bound(config);

        let solution = searcher.find_cuts(&circuit).unwrap().unwrap();
        assert_eq!(solution.num_cuts(), 1);
        assert!(solution.counter.iter().all(|c| c.d <= 3));
        let rho: usize = solution.counter.iter().map(|c| c.rho).sum();
        assert_eq!(rho, 1);

        let manual = searcher
            .cut_with_partition(&circuit, vec![vec![0, 1], vec![2, 3]])
            .unwrap();
        assert_eq!(manual.num_d_qubits, vec![3, 3]);
        assert_relative_eq!(manual.cost_estimate, 128.0);
    }

    #[test]
    fn test_disconnected_needs_no_cut() {
        let config = CutConfig::new(3)
            .with_max_cuts(1)
            .with_num_subcircuits(vec![2]);
        let mut searcher = CutSearcher::with_branch_and_bound(config);

        let solution = searcher.find_cuts(&two_components()).unwrap().unwrap();
        assert_eq!(solution.num_cuts(), 0);
        assert_eq!(solution.num_rho_qubits, vec![0, 0]);
        assert_eq!(solution.num_d_qubits, vec![2, 2]);
        assert_relative_eq!(solution.cost_estimate, 16.0);
        assert!(solution.path_map.iter().all(|path| path.len() == 1));
    }

    #[test]
    fn test_solver_fault_is_empty_result() {
        let config = CutConfig::new(3).with_num_subcircuits(vec![2, 3]);
        let mut searcher = CutSearcher::new(config, FaultySolver);
        assert!(searcher.find_cuts(&chain()).unwrap().is_none());
        assert!(searcher.best_cost().is_infinite());
    }

    #[test]
    fn test_invalid_config() {
        let config = CutConfig::new(0);
        let mut searcher = CutSearcher::with_branch_and_bound(config);
        assert!(matches!(
            searcher.find_cuts(&chain()),
            Err(QcutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_manual_partition() {
        let searcher = CutSearcher::with_branch_and_bound(CutConfig::new(3));
        let solution = searcher
            .cut_with_partition(&chain(), vec![vec![0, 1], vec![2, 3]])
            .unwrap();

        assert_eq!(solution.num_cuts(), 1);
        assert_eq!(solution.positions[0].wire, 2);
        assert_eq!(solution.num_rho_qubits, vec![0, 1]);
        assert_eq!(solution.num_o_qubits, vec![1, 0]);
        assert_eq!(solution.num_d_qubits, vec![3, 3]);
        assert_relative_eq!(solution.cost_estimate, 128.0);
        assert_eq!(solution.node_count, 0);
    }

    #[test]
    fn test_manual_partition_rejects_bad_ids() {
        let searcher = CutSearcher::with_branch_and_bound(CutConfig::new(3));
        assert!(matches!(
            searcher.cut_with_partition(&chain(), vec![vec![0, 1], vec![2]]),
            Err(QcutError::PartitionSumMismatch { assigned: 3, expected: 4 })
        ));
        assert!(matches!(
            searcher.cut_with_partition(&chain(), vec![vec![0, 1], vec![1, 3]]),
            Err(QcutError::InvalidConfig(_))
        ));
        assert!(searcher
            .cut_with_partition(&chain(), vec![vec![0, 9], vec![2, 3]])
            .is_err());
    }

    #[test]
    fn test_report() {
        let searcher = CutSearcher::with_branch_and_bound(CutConfig::new(3));
        let solution = searcher
            .cut_with_partition(&chain(), vec![vec![0, 1], vec![2, 3]])
            .unwrap();
        let report = solution.report();
        assert!(report.contains("2 subcircuits, 1 cuts"));
        assert!(report.contains("subcircuit 1: rho = 1"));
    }
}
