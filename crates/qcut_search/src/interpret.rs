//! Cut and partition interpreter
//!
//! Gantree: L3_Search → Interpreter
//!
//! Maps an abstract vertex partition back onto the circuit: where each cut
//! severs a wire, which subcircuit owns every operation, and how original
//! qubits are routed through subcircuit-local qubits.

use crate::key::{DepthKey, OrdinalCounter, VertexKey};
use qcut_core::{Circuit, Gate, QcutError, QcutResult, QubitId, SubcircuitId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Types
// ============================================================================

/// Wire position at which a cut is applied
/// Gantree: CutPosition // 절단 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutPosition {
    /// Severed wire
    pub wire: QubitId,

    /// Index, among the operations on `wire`, of the gate the cut follows
    pub gate_index: usize,
}

impl fmt::Display for CutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}] after op {}", self.wire, self.gate_index)
    }
}

/// One segment of an original qubit's route
/// Gantree: PathElement // 경로 원소
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    /// Subcircuit the segment runs in
    pub subcircuit: SubcircuitId,

    /// Local qubit of that subcircuit
    pub local_qubit: QubitId,
}

/// Route of every original qubit, indexed by qubit
pub type PathMap = Vec<Vec<PathElement>>;

/// Per-subcircuit qubit role counters
/// Gantree: SubcircuitCounter // 큐비트 역할 카운터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcircuitCounter {
    /// Qubits entering through a cut
    pub rho: usize,

    /// Qubits leaving through a cut
    pub o: usize,

    /// Width of the subcircuit
    pub d: usize,

    /// `d - o`
    pub effective: usize,

    /// Circuit depth
    pub depth: usize,

    /// Operation count
    pub size: usize,
}

// ============================================================================
// Cut Positions
// ============================================================================

/// Locate every cut edge on the circuit
///
/// The cut lies on the wire where the destination's two-qubit ordinal is
/// one past the source's. When the same gate pair is cut on several wires,
/// successive repetitions take successive matching wires. Positions are
/// returned in descending `gate_index` order.
/// Gantree: resolve_cuts(cut_edges, circuit) -> Result<Vec<CutPosition>> // 절단 위치
pub fn resolve_cuts(
    cut_edges: &[(VertexKey, VertexKey)],
    circuit: &Circuit,
) -> QcutResult<Vec<CutPosition>> {
    let dag = circuit.dag();
    let gates = circuit.gates();
    let mut repeats: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();
    let mut positions = Vec::with_capacity(cut_edges.len());

    for &(source, dest) in cut_edges {
        let unresolved = || QcutError::UnresolvedCut {
            source_gate: source.to_string(),
            dest_gate: dest.to_string(),
        };

        let repeat = repeats.entry((source, dest)).or_insert(0);
        let (wire, dest_count) = source
            .successor_wires(&dest)
            .get(*repeat)
            .copied()
            .ok_or_else(unresolved)?;
        *repeat += 1;

        // dest_count is 1-based among two-qubit gates: it names the source gate
        let gate_index = dag
            .nodes_on_wire(wire)
            .iter()
            .enumerate()
            .filter(|&(_, &op)| gates[op].is_two_qubit())
            .nth(dest_count - 1)
            .map(|(index, _)| index)
            .ok_or_else(unresolved)?;

        positions.push(CutPosition { wire, gate_index });
    }

    positions.sort_by(|a, b| b.gate_index.cmp(&a.gate_index));
    Ok(positions)
}

// ============================================================================
// Subcircuit Assignment
// ============================================================================

/// Attribute every operation to a partition and build the subcircuits
///
/// Two-qubit gates take the partition of their vertex. Every other
/// operation joins the partition holding the two-qubit gate nearest to it
/// on a shared wire; on a tie the lower partition index wins. Barriers are
/// attributed wire by wire and split into one barrier per partition over
/// the local qubits it owns at that point.
/// Gantree: assign_subcircuits(partitions, circuit) -> Result<(Vec<Circuit>, PathMap)> // 부분회로 생성
pub fn assign_subcircuits(
    partition_vertices: &[Vec<VertexKey>],
    circuit: &Circuit,
) -> QcutResult<(Vec<Circuit>, PathMap)> {
    let num_qubits = circuit.num_qubits();
    let gates = circuit.gates();
    let num_partitions = partition_vertices.len();

    let mut partition_of: HashMap<VertexKey, usize> = HashMap::new();
    for (p, keys) in partition_vertices.iter().enumerate() {
        for &key in keys {
            partition_of.entry(key).or_insert(p);
        }
    }

    // Translate vertex keys into depth keys
    let mut all_ops = OrdinalCounter::new(num_qubits);
    let mut two_qubit_ops = OrdinalCounter::new(num_qubits);
    let mut depth_keys = Vec::with_capacity(gates.len());
    let mut partition_keys: Vec<Vec<DepthKey>> = vec![Vec::new(); num_partitions];
    let mut translated = 0;

    for gate in gates {
        let qubits = gate.qubits();
        let depth_key = DepthKey(all_ops.stamp(&qubits));
        if gate.is_two_qubit() {
            let args = two_qubit_ops.stamp(&qubits);
            if let Some(&p) = partition_of.get(&VertexKey::new(args[0], args[1])) {
                partition_keys[p].push(depth_key.clone());
                translated += 1;
            }
        }
        depth_keys.push(depth_key);
    }

    let given: usize = partition_vertices.iter().map(Vec::len).sum();
    let expected = circuit.count_2q();
    if translated != expected || given != expected {
        return Err(QcutError::PartitionSumMismatch {
            assigned: translated,
            expected,
        });
    }

    // Nearest partition for every operation on every wire
    let dag = circuit.dag();
    let mut path_map: PathMap = vec![Vec::new(); num_qubits];
    let mut widths = vec![0usize; num_partitions];
    let mut owner: Vec<Option<usize>> = vec![None; gates.len()];
    let mut barrier_owner: HashMap<(usize, QubitId), usize> = HashMap::new();

    for (wire, path) in path_map.iter_mut().enumerate() {
        for &op in dag.nodes_on_wire(wire) {
            let unattributed = || QcutError::UnattributedGate {
                gate: op,
                name: gates[op].name().to_string(),
            };
            let is_barrier = gates[op].is_barrier();
            let key = if is_barrier {
                DepthKey(
                    depth_keys[op]
                        .args()
                        .iter()
                        .filter(|arg| arg.qubit == wire)
                        .copied()
                        .collect(),
                )
            } else {
                depth_keys[op].clone()
            };
            let p = nearest_partition(&key, &partition_keys).ok_or_else(unattributed)?;

            if path.last().map_or(true, |element| element.subcircuit != p) {
                path.push(PathElement {
                    subcircuit: p,
                    local_qubit: widths[p],
                });
                widths[p] += 1;
            }

            if is_barrier {
                barrier_owner.insert((op, wire), p);
                continue;
            }
            match owner[op] {
                Some(previous) if previous != p => return Err(unattributed()),
                _ => owner[op] = Some(p),
            }
        }
    }

    // Emit gates on local qubits, following each wire's route
    let mut subcircuits: Vec<Circuit> = widths
        .iter()
        .enumerate()
        .map(|(p, &width)| Circuit::with_name(width, format!("subcircuit_{}", p)))
        .collect();
    let mut pointers = vec![0usize; num_qubits];

    for (op, gate) in gates.iter().enumerate() {
        let unattributed = || QcutError::UnattributedGate {
            gate: op,
            name: gate.name().to_string(),
        };

        if let Gate::Barrier(qubits) = gate {
            let mut locals: Vec<Vec<QubitId>> = vec![Vec::new(); num_partitions];
            for &q in qubits {
                let p = barrier_owner.get(&(op, q)).copied().ok_or_else(unattributed)?;
                let local = route(&path_map[q], &mut pointers[q], p).ok_or_else(unattributed)?;
                locals[p].push(local);
            }
            for (p, local) in locals.into_iter().enumerate() {
                if !local.is_empty() {
                    subcircuits[p].add_gate(Gate::Barrier(local))?;
                }
            }
            continue;
        }

        let p = owner[op].ok_or_else(unattributed)?;
        let mut routed = true;
        let local = gate.remap(|q| {
            route(&path_map[q], &mut pointers[q], p).unwrap_or_else(|| {
                routed = false;
                0
            })
        });
        if !routed {
            return Err(unattributed());
        }
        subcircuits[p].add_gate(local)?;
    }

    Ok((subcircuits, path_map))
}

/// Local qubit of partition `p` on a wire route, stepping past a cut if needed
fn route(path: &[PathElement], pointer: &mut usize, p: usize) -> Option<QubitId> {
    if path.get(*pointer).map_or(false, |element| element.subcircuit != p) {
        *pointer += 1;
    }
    path.get(*pointer)
        .filter(|element| element.subcircuit == p)
        .map(|element| element.local_qubit)
}

/// First partition at minimum distance, if any partition shares a wire
fn nearest_partition(key: &DepthKey, partition_keys: &[Vec<DepthKey>]) -> Option<usize> {
    let mut nearest: Option<(usize, usize)> = None;
    for (p, keys) in partition_keys.iter().enumerate() {
        let distance = keys.iter().filter_map(|other| key.distance(other)).min();
        if let Some(distance) = distance {
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((p, distance));
            }
        }
    }
    nearest.map(|(p, _)| p)
}

// ============================================================================
// Qubit Role Counters
// ============================================================================

/// Consecutive route segments `(O side, rho side)` of every qubit
/// Gantree: o_rho_pairs(path_map) -> Vec<(PathElement, PathElement)> // O-ρ 쌍
pub fn o_rho_pairs(path_map: &PathMap) -> Vec<(PathElement, PathElement)> {
    path_map
        .iter()
        .flat_map(|path| path.windows(2).map(|pair| (pair[0], pair[1])))
        .collect()
}

/// Count rho, O, width, effective, depth and size of every subcircuit
/// Gantree: subcircuit_counters(subcircuits, pairs) -> Vec<SubcircuitCounter> // 카운터
pub fn subcircuit_counters(
    subcircuits: &[Circuit],
    pairs: &[(PathElement, PathElement)],
) -> Vec<SubcircuitCounter> {
    let mut counters: Vec<SubcircuitCounter> = subcircuits
        .iter()
        .map(|sub| SubcircuitCounter {
            d: sub.num_qubits(),
            depth: sub.depth(),
            size: sub.size(),
            ..Default::default()
        })
        .collect();

    for (o_side, rho_side) in pairs {
        if let Some(counter) = counters.get_mut(o_side.subcircuit) {
            counter.o += 1;
        }
        if let Some(counter) = counters.get_mut(rho_side.subcircuit) {
            counter.rho += 1;
        }
    }
    for counter in &mut counters {
        counter.effective = counter.d.saturating_sub(counter.o);
    }
    counters
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InteractionGraph;
    use qcut_core::{CircuitBuilder, Gate};

    /// 5-qubit CX chain with single-qubit gates around the cut
    fn chain_circuit() -> Circuit {
        CircuitBuilder::new(5)
            .h(0)
            .cnot(0, 1)
            .rz(1, 0.4)
            .cnot(1, 2)
            .x(2)
            .cnot(2, 3)
            .cnot(3, 4)
            .h(4)
            .build()
    }

    fn halves(circuit: &Circuit) -> Vec<Vec<VertexKey>> {
        let keys = InteractionGraph::from_circuit(circuit)
            .unwrap()
            .vertex_keys()
            .to_vec();
        vec![keys[0..2].to_vec(), keys[2..4].to_vec()]
    }

    #[test]
    fn test_resolve_single_cut() {
        let circuit = chain_circuit();
        let keys = halves(&circuit);
        let positions = resolve_cuts(&[(keys[0][1], keys[1][0])], &circuit).unwrap();

        // Wire 2 carries cx(1,2), x, cx(2,3); the cut follows cx(1,2)
        assert_eq!(positions, vec![CutPosition { wire: 2, gate_index: 0 }]);
    }

    #[test]
    fn test_resolve_repeated_pair() {
        let circuit = CircuitBuilder::new(2)
            .cnot(0, 1)
            .h(1)
            .cz(0, 1)
            .build();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();
        let (a, b) = (graph.key(0).unwrap(), graph.key(1).unwrap());

        let positions = resolve_cuts(&[(a, b), (a, b)], &circuit).unwrap();
        assert_eq!(positions.len(), 2);
        assert!(positions.contains(&CutPosition { wire: 0, gate_index: 0 }));
        assert!(positions.contains(&CutPosition { wire: 1, gate_index: 0 }));
    }

    #[test]
    fn test_resolve_sorted_descending() {
        let circuit = CircuitBuilder::new(3)
            .cnot(0, 1)
            .cnot(0, 1)
            .cnot(0, 1)
            .cnot(1, 2)
            .build();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();
        let key = |i| graph.key(i).unwrap();

        let positions = resolve_cuts(&[(key(0), key(1)), (key(2), key(3))], &circuit).unwrap();
        assert_eq!(positions[0], CutPosition { wire: 1, gate_index: 2 });
        assert_eq!(positions[1].gate_index, 0);
    }

    #[test]
    fn test_resolve_unrelated_pair() {
        let circuit = chain_circuit();
        let keys = halves(&circuit);
        let err = resolve_cuts(&[(keys[0][0], keys[1][1])], &circuit).unwrap_err();
        assert!(matches!(err, QcutError::UnresolvedCut { .. }));
    }

    #[test]
    fn test_assign_chain() {
        let circuit = chain_circuit();
        let (subcircuits, path_map) = assign_subcircuits(&halves(&circuit), &circuit).unwrap();

        assert_eq!(subcircuits.len(), 2);
        assert_eq!(subcircuits[0].num_qubits(), 3);
        assert_eq!(subcircuits[1].num_qubits(), 3);

        // x(2) is one op from both cx(1,2) and cx(2,3): first partition wins
        assert_eq!(subcircuits[0].gate_count(), 5);
        assert_eq!(subcircuits[0].gates()[3], Gate::Cnot(1, 2));
        assert_eq!(subcircuits[0].gates()[4], Gate::X(2));
        assert_eq!(
            subcircuits[1].gates(),
            &[Gate::Cnot(0, 1), Gate::Cnot(1, 2), Gate::H(2)]
        );

        assert_eq!(
            path_map[2],
            vec![
                PathElement { subcircuit: 0, local_qubit: 2 },
                PathElement { subcircuit: 1, local_qubit: 0 },
            ]
        );
        assert_eq!(path_map[4], vec![PathElement { subcircuit: 1, local_qubit: 2 }]);
    }

    #[test]
    fn test_barrier_split_across_partitions() {
        let circuit = CircuitBuilder::new(5)
            .cnot(0, 1)
            .cnot(1, 2)
            .barrier()
            .cnot(2, 3)
            .cnot(3, 4)
            .build();
        let (subcircuits, path_map) = assign_subcircuits(&halves(&circuit), &circuit).unwrap();

        // Each half keeps its own wires; no extra routing through the barrier
        assert_eq!(subcircuits[0].num_qubits(), 3);
        assert_eq!(subcircuits[1].num_qubits(), 3);
        assert_eq!(o_rho_pairs(&path_map).len(), 1);

        assert_eq!(
            subcircuits[0].gates(),
            &[Gate::Cnot(0, 1), Gate::Cnot(1, 2), Gate::Barrier(vec![0, 1, 2])]
        );
        assert_eq!(
            subcircuits[1].gates(),
            &[Gate::Barrier(vec![1, 2]), Gate::Cnot(0, 1), Gate::Cnot(1, 2)]
        );
        assert_eq!(path_map[4], vec![PathElement { subcircuit: 1, local_qubit: 2 }]);
    }

    #[test]
    fn test_barrier_on_idle_wire() {
        let circuit = CircuitBuilder::new(3).cnot(0, 1).cnot(0, 1).barrier().build();
        let keys = InteractionGraph::from_circuit(&circuit)
            .unwrap()
            .vertex_keys()
            .to_vec();
        let err = assign_subcircuits(&[keys], &circuit).unwrap_err();
        assert!(matches!(err, QcutError::UnattributedGate { .. }));
    }

    #[test]
    fn test_counters() {
        let circuit = chain_circuit();
        let (subcircuits, path_map) = assign_subcircuits(&halves(&circuit), &circuit).unwrap();
        let pairs = o_rho_pairs(&path_map);
        assert_eq!(pairs.len(), 1);

        let counters = subcircuit_counters(&subcircuits, &pairs);
        assert_eq!(counters[0].o, 1);
        assert_eq!(counters[0].rho, 0);
        assert_eq!(counters[0].effective, 2);
        assert_eq!(counters[1].rho, 1);
        assert_eq!(counters[1].effective, 3);
        assert_eq!(counters[1].size, 3);
        assert_eq!(counters[1].depth, 3);
    }

    #[test]
    fn test_roundtrip_two_qubit_sequence() {
        let circuit = chain_circuit();
        let (subcircuits, path_map) = assign_subcircuits(&halves(&circuit), &circuit).unwrap();

        // Map local qubits back to original qubits
        let mut original: HashMap<(usize, usize), usize> = HashMap::new();
        for (q, path) in path_map.iter().enumerate() {
            for element in path {
                original.insert((element.subcircuit, element.local_qubit), q);
            }
        }

        let mut restored = Vec::new();
        for (p, sub) in subcircuits.iter().enumerate() {
            for gate in sub.gates().iter().filter(|g| g.is_two_qubit()) {
                restored.push(gate.remap(|q| original[&(p, q)]));
            }
        }
        let expected: Vec<Gate> = circuit
            .gates()
            .iter()
            .filter(|g| g.is_two_qubit())
            .cloned()
            .collect();
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_partition_mismatch() {
        let circuit = chain_circuit();
        let mut partitions = halves(&circuit);
        partitions[1].pop();
        let err = assign_subcircuits(&partitions, &circuit).unwrap_err();
        assert_eq!(err, QcutError::PartitionSumMismatch { assigned: 3, expected: 4 });
    }

    #[test]
    fn test_isolated_wire_unattributed() {
        // Qubit 2 never meets a two-qubit gate
        let circuit = CircuitBuilder::new(3).cnot(0, 1).cnot(0, 1).h(2).build();
        let graph = InteractionGraph::from_circuit(&circuit).unwrap();
        let partitions = vec![graph.vertex_keys().to_vec()];

        let err = assign_subcircuits(&partitions, &circuit).unwrap_err();
        assert!(matches!(err, QcutError::UnattributedGate { gate: 2, .. }));
    }
}
