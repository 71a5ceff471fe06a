//! Partition optimizer
//!
//! Gantree: L3_Search → CutSearchModel
//!
//! Integer program assigning every interaction-graph vertex to one of `k`
//! subcircuits so that each subcircuit's input qubits fit the budget,
//! minimizing the number of cut edges.

use crate::graph::{check_graph, InteractionGraph};
use crate::key::VertexKey;
use qcut_core::search::{
    cost_exponent_bound, ASSIGNMENT_TOLERANCE, CUT_SLACK, DEFAULT_TIME_LIMIT_SECS,
    MIN_SUBCIRCUIT_INPUT,
};
use qcut_core::{QcutError, QcutResult};
use qcut_mip::{LinExpr, MipSolver, Model, ObjSense, SolveParams, Solution, Var, VarType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// PartitionSolution
// ============================================================================

/// Decoded optimizer output
/// Gantree: PartitionSolution // 분할 해
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSolution {
    /// Number of cut edges (objective value)
    pub objective: f64,

    /// Whether the solver proved optimality
    pub optimal: bool,

    /// Solver wall-clock time in seconds
    pub runtime: f64,

    /// Nodes explored by the solver
    pub node_count: u64,

    /// Relative optimality gap
    pub mip_gap: f64,

    /// Vertex keys of every partition, in vertex order
    pub subcircuit_vertices: Vec<Vec<VertexKey>>,

    /// Cut edges as `(source, destination)` keys, one per graph edge
    pub cut_edges: Vec<(VertexKey, VertexKey)>,

    /// Qubits entering each partition through a cut
    pub num_rho_qubits: Vec<usize>,

    /// Qubits leaving each partition through a cut
    pub num_o_qubits: Vec<usize>,

    /// Input qubits of each partition (original + rho)
    pub num_d_qubits: Vec<usize>,
}

impl PartitionSolution {
    /// Number of partitions
    pub fn num_subcircuits(&self) -> usize {
        self.subcircuit_vertices.len()
    }
}

// ============================================================================
// Per-partition variables
// ============================================================================

#[derive(Debug, Clone)]
struct PartitionVars {
    rho: Var,
    o: Var,
    d: Var,
}

// ============================================================================
// CutSearchModel
// ============================================================================

/// Cut search integer program for one subcircuit count
/// Gantree: CutSearchModel // MIP 모델
#[derive(Debug, Clone)]
pub struct CutSearchModel {
    model: Model,
    vertex_var: Vec<Vec<Var>>,
    edge_var: Vec<Vec<Var>>,
    partition_vars: Vec<PartitionVars>,
    num_cuts: Var,
    vertex_keys: Vec<VertexKey>,
    edges: Vec<(usize, usize)>,
    num_subcircuit: usize,
    max_subcircuit_qubit: usize,
    time_limit: Duration,
}

impl CutSearchModel {
    /// Build the model
    ///
    /// Fails on a malformed graph or when `num_subcircuit` is zero.
    /// Gantree: new(graph, k, maxQ, nq, C) -> Result<Self> // 모델 구성
    pub fn new(
        graph: &InteractionGraph,
        num_subcircuit: usize,
        max_subcircuit_qubit: usize,
        num_qubits: usize,
        max_cuts: usize,
    ) -> QcutResult<Self> {
        check_graph(graph.n_vertices(), graph.edges())?;
        if num_subcircuit == 0 {
            return Err(QcutError::InvalidModel(
                "at least one subcircuit is required".into(),
            ));
        }

        let n_vertices = graph.n_vertices();
        let edges = graph.edges().to_vec();
        let max_q = max_subcircuit_qubit as f64;
        let mut model = Model::new("cut_searching");

        // vertex_var[p][v]: vertex v lies in partition p
        let vertex_var: Vec<Vec<Var>> = (0..num_subcircuit)
            .map(|_| (0..n_vertices).map(|_| model.add_binary()).collect())
            .collect();

        // edge_var[p][e]: exactly one endpoint of e lies in partition p
        let edge_var: Vec<Vec<Var>> = (0..num_subcircuit)
            .map(|_| edges.iter().map(|_| model.add_binary()).collect())
            .collect();

        for v in 0..n_vertices {
            model.add_eq(LinExpr::sum(vertex_var.iter().map(|row| row[v])), 1.0);
        }

        for p in 0..num_subcircuit {
            for (e, &(u, v)) in edges.iter().enumerate() {
                let x = edge_var[p][e];
                let a = vertex_var[p][u];
                let b = vertex_var[p][v];
                model.add_le(x, a + b);
                model.add_ge(x, a - b);
                model.add_ge(x, b - a);
                model.add_le(x, LinExpr::constant(2.0) - a - b);
            }
        }

        // Symmetry breaking: vertex i only in partitions 0..=i
        for vertex in 0..num_subcircuit.min(n_vertices) {
            if vertex + 1 < num_subcircuit {
                let later = (vertex + 1..num_subcircuit).map(|p| vertex_var[p][vertex]);
                model.add_eq(LinExpr::sum(later), 0.0);
            }
        }

        let num_cuts = model.add_named_var(
            "num_cuts",
            VarType::Integer,
            0.0,
            max_cuts as f64 + CUT_SLACK,
        );
        let all_edges = edge_var.iter().flat_map(|row| row.iter().copied());
        model.add_eq(num_cuts, LinExpr::sum(all_edges) / 2.0);

        let mut partition_vars = Vec::with_capacity(num_subcircuit);
        let mut effective = LinExpr::new();
        for p in 0..num_subcircuit {
            let original = model.add_named_var(
                format!("subcircuit_input_{}", p),
                VarType::Integer,
                0.0,
                max_q,
            );
            let weighted = graph
                .weights()
                .iter()
                .zip(&vertex_var[p])
                .map(|(&w, &var)| var * w as f64);
            model.add_eq(original, LinExpr::sum(weighted));

            // Cut edges whose destination (rho) or source (O) lies in p
            let mut entering = LinExpr::new();
            let mut leaving = LinExpr::new();
            for (e, &(u, v)) in edges.iter().enumerate() {
                entering += model.add_and(edge_var[p][e], vertex_var[p][v]);
                leaving += model.add_and(edge_var[p][e], vertex_var[p][u]);
            }

            let rho = model.add_named_var(
                format!("subcircuit_rho_qubits_{}", p),
                VarType::Integer,
                0.0,
                max_q,
            );
            model.add_eq(rho, entering);

            let o = model.add_named_var(
                format!("subcircuit_O_qubits_{}", p),
                VarType::Integer,
                0.0,
                max_q,
            );
            model.add_eq(o, leaving);

            let d = model.add_named_var(
                format!("subcircuit_d_{}", p),
                VarType::Integer,
                MIN_SUBCIRCUIT_INPUT,
                max_q,
            );
            model.add_eq(d, original + rho);

            effective += d - o;
            if p > 0 {
                // Exponent of the reconstruction cost proxy; not in the objective
                let ub = cost_exponent_bound(num_qubits, max_cuts) as f64;
                let exponent = model.add_named_var(
                    format!("build_cost_exponent_{}", p),
                    VarType::Integer,
                    0.0,
                    ub,
                );
                model.add_eq(exponent, effective.clone() + num_cuts * 2.0);
            }

            partition_vars.push(PartitionVars { rho, o, d });
        }

        model.set_objective(num_cuts, ObjSense::Minimize);
        log::debug!(
            "{} subcircuits: {} vars, {} constraints",
            num_subcircuit,
            model.num_vars(),
            model.num_constrs()
        );

        Ok(Self {
            model,
            vertex_var,
            edge_var,
            partition_vars,
            num_cuts,
            vertex_keys: graph.vertex_keys().to_vec(),
            edges,
            num_subcircuit,
            max_subcircuit_qubit,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
        })
    }

    /// Set the solver wall-clock limit
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Underlying integer program
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Number of partitions
    pub fn num_subcircuit(&self) -> usize {
        self.num_subcircuit
    }

    /// Per-partition qubit budget
    pub fn max_subcircuit_qubit(&self) -> usize {
        self.max_subcircuit_qubit
    }

    /// Cut count variable
    pub fn num_cuts_var(&self) -> Var {
        self.num_cuts
    }

    // ========================================================================
    // Solve
    // ========================================================================

    /// Solve with an objective cutoff
    ///
    /// Returns `Ok(None)` when no assignment was found, including when the
    /// solver itself faults. Partition bookkeeping errors are returned.
    /// Gantree: solve(solver, cutoff) -> Result<Option<PartitionSolution>> // 풀기
    pub fn solve<S: MipSolver + ?Sized>(
        &self,
        solver: &S,
        cutoff: f64,
    ) -> QcutResult<Option<PartitionSolution>> {
        let params = SolveParams::new()
            .with_time_limit(self.time_limit)
            .with_cutoff(cutoff);

        let solution = match solver.solve(&self.model, &params) {
            Ok(solution) => solution,
            Err(err) => {
                log::warn!(
                    "{} failed on {} subcircuits: {}",
                    solver.name(),
                    self.num_subcircuit,
                    err
                );
                return Ok(None);
            }
        };
        if !solution.has_solution() {
            return Ok(None);
        }
        self.decode(&solution).map(Some)
    }

    fn decode(&self, solution: &Solution) -> QcutResult<PartitionSolution> {
        let is_set = |var: Var| {
            solution
                .value(var)
                .map_or(false, |x| x.abs() > ASSIGNMENT_TOLERANCE)
        };
        let count = |var: Var| solution.value(var).map_or(0, |x| x.round().max(0.0) as usize);

        let subcircuit_vertices: Vec<Vec<VertexKey>> = self
            .vertex_var
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.vertex_keys)
                    .filter(|&(&var, _)| is_set(var))
                    .map(|(_, &key)| key)
                    .collect()
            })
            .collect();

        let assigned: usize = subcircuit_vertices.iter().map(Vec::len).sum();
        if assigned != self.vertex_keys.len() {
            return Err(QcutError::PartitionSumMismatch {
                assigned,
                expected: self.vertex_keys.len(),
            });
        }

        let mut seen = vec![false; self.edges.len()];
        let mut cut_edges = Vec::new();
        for row in &self.edge_var {
            for (e, &var) in row.iter().enumerate() {
                if is_set(var) && !seen[e] {
                    seen[e] = true;
                    let (u, v) = self.edges[e];
                    cut_edges.push((self.vertex_keys[u], self.vertex_keys[v]));
                }
            }
        }

        Ok(PartitionSolution {
            objective: solution.objective.unwrap_or(cut_edges.len() as f64),
            optimal: solution.is_optimal(),
            runtime: solution.runtime,
            node_count: solution.node_count,
            mip_gap: solution.mip_gap,
            subcircuit_vertices,
            cut_edges,
            num_rho_qubits: self.partition_vars.iter().map(|pv| count(pv.rho)).collect(),
            num_o_qubits: self.partition_vars.iter().map(|pv| count(pv.o)).collect(),
            num_d_qubits: self.partition_vars.iter().map(|pv| count(pv.d)).collect(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
