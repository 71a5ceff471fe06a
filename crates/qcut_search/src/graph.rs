//! Interaction graph builder
//!
//! Gantree: L3_Search → InteractionGraph
//!
//! Vertices are two-qubit gate occurrences; edges are the direct op-to-op
//! dependencies between them once every other operation is stripped.

use crate::key::{OrdinalCounter, VertexKey};
use qcut_core::{Circuit, QcutError, QcutResult};
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Stripping
// ============================================================================

/// Keep only the two-qubit gates of a circuit
///
/// Single-qubit gates, measurements, resets and barriers are dropped.
/// Every kept gate is re-validated, since deserialized circuits skip
/// validation.
/// Gantree: strip_circuit(&Circuit) -> Result<Circuit> // 2큐빗 게이트만
pub fn strip_circuit(circuit: &Circuit) -> QcutResult<Circuit> {
    let mut stripped = match circuit.name() {
        Some(name) => Circuit::with_name(circuit.num_qubits(), name),
        None => Circuit::new(circuit.num_qubits()),
    };
    for gate in circuit.gates().iter().filter(|g| g.is_two_qubit()) {
        stripped.add_gate(gate.clone())?;
    }
    Ok(stripped)
}

// ============================================================================
// InteractionGraph
// ============================================================================

/// Two-qubit interaction graph of a circuit
/// Gantree: InteractionGraph // 상호작용 그래프
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionGraph {
    n_vertices: usize,
    edges: Vec<(usize, usize)>,
    vertex_keys: Vec<VertexKey>,
    key_ids: HashMap<VertexKey, usize>,
    weights: Vec<usize>,
}

impl InteractionGraph {
    /// Strip a circuit and build its interaction graph
    /// Gantree: from_circuit(&Circuit) -> Result<Self> // 그래프 생성
    pub fn from_circuit(circuit: &Circuit) -> QcutResult<Self> {
        Self::from_stripped(&strip_circuit(circuit)?)
    }

    /// Build the graph of a circuit holding only two-qubit gates
    ///
    /// Vertex ids follow gate order. Ids are tied to the operation, so two
    /// gates never share a vertex even if their keys were to coincide.
    pub fn from_stripped(stripped: &Circuit) -> QcutResult<Self> {
        let mut counter = OrdinalCounter::new(stripped.num_qubits());
        let mut vertex_keys = Vec::with_capacity(stripped.gate_count());
        let mut key_ids = HashMap::new();

        for (op, gate) in stripped.gates().iter().enumerate() {
            if !gate.is_two_qubit() {
                return Err(QcutError::InvalidVertexArity {
                    vertex: op,
                    arity: gate.arity(),
                });
            }
            let args = counter.stamp(&gate.qubits());
            let key = VertexKey::new(args[0], args[1]);
            key_ids.entry(key).or_insert(op);
            vertex_keys.push(key);
        }

        // Every stripped operation is a vertex, so op index == vertex id
        let edges = stripped
            .dag()
            .edges()
            .into_iter()
            .map(|e| (e.source, e.target))
            .collect();

        let weights = vertex_keys.iter().map(VertexKey::weight).collect();
        let graph = Self {
            n_vertices: vertex_keys.len(),
            edges,
            vertex_keys,
            key_ids,
            weights,
        };
        log::debug!(
            "interaction graph: {} vertices, {} edges",
            graph.n_vertices,
            graph.edges.len()
        );
        Ok(graph)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of vertices
    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// Edges `(u, v)` with `u < v`, one per shared wire
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Number of edges
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Vertex keys by id
    pub fn vertex_keys(&self) -> &[VertexKey] {
        &self.vertex_keys
    }

    /// Key of a vertex
    pub fn key(&self, id: usize) -> Option<VertexKey> {
        self.vertex_keys.get(id).copied()
    }

    /// Id of a key
    pub fn id_of(&self, key: &VertexKey) -> Option<usize> {
        self.key_ids.get(key).copied()
    }

    /// Qubit-input weights by id
    pub fn weights(&self) -> &[usize] {
        &self.weights
    }

    /// Check the edge invariants of this graph
    pub fn check(&self) -> QcutResult<()> {
        check_graph(self.n_vertices, &self.edges)
    }
}

/// Check that edges cover exactly `0..n_vertices` and are ordered
/// Gantree: check_graph(n, edges) -> Result<()> // 그래프 검증
pub fn check_graph(n_vertices: usize, edges: &[(usize, usize)]) -> QcutResult<()> {
    let covered: BTreeSet<usize> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();
    if covered.len() != n_vertices || covered.iter().next_back().map_or(false, |&max| max >= n_vertices) {
        return Err(QcutError::MalformedGraph(format!(
            "edges cover {} vertex ids, expected exactly 0..{}",
            covered.len(),
            n_vertices
        )));
    }
    for &(u, v) in edges {
        if u >= v {
            return Err(QcutError::MalformedGraph(format!(
                "edge ({}, {}) is not ordered",
                u, v
            )));
        }
        if u >= n_vertices {
            return Err(QcutError::MalformedGraph(format!(
                "edge ({}, {}) is out of range",
                u, v
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qcut_core::{CircuitBuilder, CircuitGenerator, Gate, WireCount};

    #[test]
    fn test_strip_circuit() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .cnot(0, 1)
            .barrier()
            .rz(1, 0.2)
            .cz(1, 2)
            .measure_all()
            .build();

        let stripped = strip_circuit(&circuit).unwrap();
        assert_eq!(stripped.gate_count(), 2);
        assert_eq!(stripped.gates()[1], Gate::Cz(1, 2));
    }

    #[test]
    fn test_strip_rejects_unvalidated_gate() {
        // Deserialized circuits bypass add_gate validation
        let json = serde_json::to_string(&CircuitBuilder::new(3).cnot(0, 2).build()).unwrap();
        let circuit: Circuit =
            serde_json::from_str(&json.replace("\"num_qubits\":3", "\"num_qubits\":2")).unwrap();
        assert_eq!(circuit.gate_count(), 1);

        let err = InteractionGraph::from_circuit(&circuit).unwrap_err();
        assert_eq!(err, QcutError::GateQubitMismatch { qubit: 2, num_qubits: 2 });
    }

    #[test]
    fn test_chain_graph() {
        let circuit = CircuitBuilder::new(5).h(0).cx_chain().build();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();

        assert_eq!(graph.n_vertices(), 4);
        assert_eq!(graph.edges(), &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(graph.weights(), &[2, 1, 1, 1]);
        assert!(graph.check().is_ok());

        let key = graph.key(1).unwrap();
        assert_eq!(key, VertexKey::new(WireCount::new(1, 1), WireCount::new(2, 0)));
        assert_eq!(graph.id_of(&key), Some(1));
    }

    #[test]
    fn test_parallel_edges_kept() {
        let circuit = CircuitBuilder::new(3)
            .cnot(0, 1)
            .cnot(1, 0)
            .cz(1, 2)
            .build();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();

        // Two wires between the first pair of gates
        assert_eq!(graph.edges(), &[(0, 1), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_reference_circuit_graph() {
        let circuit = CircuitGenerator::new().quantum_volume_8q();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();

        assert_eq!(graph.n_vertices(), 32);
        assert_eq!(graph.n_edges(), 56);
        // Every qubit enters exactly once
        assert_eq!(graph.weights().iter().sum::<usize>(), 8);
        assert!(graph.check().is_ok());
    }

    #[test]
    fn test_non_two_qubit_vertex() {
        let circuit = CircuitBuilder::new(2).cnot(0, 1).h(0).build();
        let err = InteractionGraph::from_stripped(&circuit).unwrap_err();
        assert_eq!(err, QcutError::InvalidVertexArity { vertex: 1, arity: 1 });
    }

    #[test]
    fn test_check_graph() {
        assert!(check_graph(3, &[(0, 1), (1, 2)]).is_ok());
        // Vertex 2 not covered
        assert!(check_graph(3, &[(0, 1)]).is_err());
        // Unordered
        assert!(check_graph(2, &[(1, 0)]).is_err());
        // Out of range
        assert!(check_graph(2, &[(0, 1), (1, 2)]).is_err());
        // A lone gate has no edges
        assert!(check_graph(1, &[]).is_err());
    }
}
