//! Per-wire dependency view of a circuit
//!
//! Gantree: L1_Circuit → CircuitDag
//!
//! A circuit's gate list is already topologically ordered, so the dependency
//! DAG reduces to the ordered operation list of every wire. Two operations
//! are adjacent in the DAG when they are consecutive on some wire; an
//! operation pair sharing two consecutive wires yields two edges.

use crate::circuit::Circuit;
use crate::types::{GateIndex, QubitId};
use serde::{Deserialize, Serialize};

/// Op-to-op dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// Upstream operation
    pub source: GateIndex,

    /// Downstream operation
    pub target: GateIndex,

    /// Wire carrying the dependency
    pub wire: QubitId,
}

/// Dependency view over a circuit
/// Gantree: CircuitDag // 의존 그래프
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDag {
    /// Operation indices on each wire, in circuit order
    wires: Vec<Vec<GateIndex>>,

    /// Number of operations
    num_ops: usize,
}

impl CircuitDag {
    /// Build the wire lists of a circuit
    /// Gantree: from_circuit(&Circuit) -> Self // DAG 생성
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut wires = vec![Vec::new(); circuit.num_qubits()];
        for (index, gate) in circuit.gates().iter().enumerate() {
            for qubit in gate.qubits() {
                // A barrier may list a qubit twice; keep a single node per wire
                if wires[qubit].last() != Some(&index) {
                    wires[qubit].push(index);
                }
            }
        }
        Self {
            wires,
            num_ops: circuit.gate_count(),
        }
    }

    /// Number of operation nodes
    pub fn num_ops(&self) -> usize {
        self.num_ops
    }

    /// Operations on a wire, in execution order
    /// Gantree: nodes_on_wire(q) -> &[GateIndex] // 와이어 노드
    pub fn nodes_on_wire(&self, wire: QubitId) -> &[GateIndex] {
        self.wires.get(wire).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Op-to-op edges, grouped by wire in wire order
    ///
    /// Input and output nodes are not represented, so a wire with a single
    /// operation contributes no edge.
    /// Gantree: edges(&self) -> Vec<DagEdge> // 연산간 간선
    pub fn edges(&self) -> Vec<DagEdge> {
        self.wires
            .iter()
            .enumerate()
            .flat_map(|(wire, ops)| {
                ops.windows(2).map(move |pair| DagEdge {
                    source: pair[0],
                    target: pair[1],
                    wire,
                })
            })
            .collect()
    }

    /// Direct successors of an operation, one entry per shared wire
    pub fn successors(&self, op: GateIndex) -> Vec<DagEdge> {
        self.edges().into_iter().filter(|e| e.source == op).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
