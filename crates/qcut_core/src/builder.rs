//! Circuit builder for QCUT
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for the circuits handed to the cut searcher. Gates on
//! out-of-range qubits are silently dropped; use [`CircuitBuilder::build_validated`]
//! or [`Circuit::add_gate`] when that must be an error.

use crate::circuit::Circuit;
use crate::error::{QcutError, QcutResult};
use crate::gate::Gate;
use crate::types::{Angle, QubitId};

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    /// Internal circuit being built
    circuit: Circuit,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new circuit builder
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
        }
    }

    /// Append any gate
    pub fn gate(mut self, gate: Gate) -> Self {
        let _ = self.circuit.add_gate(gate);
        self
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Add Hadamard gate
    pub fn h(self, qubit: QubitId) -> Self {
        self.gate(Gate::H(qubit))
    }

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.gate(Gate::X(qubit))
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.gate(Gate::Y(qubit))
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.gate(Gate::Z(qubit))
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.gate(Gate::S(qubit))
    }

    /// Add T gate
    pub fn t(self, qubit: QubitId) -> Self {
        self.gate(Gate::T(qubit))
    }

    /// Add SX gate
    pub fn sx(self, qubit: QubitId) -> Self {
        self.gate(Gate::Sx(qubit))
    }

    /// Add Rx rotation
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Rx(qubit, angle))
    }

    /// Add Ry rotation
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Ry(qubit, angle))
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Rz(qubit, angle))
    }

    /// Add U gate (general single-qubit)
    pub fn u(self, qubit: QubitId, theta: Angle, phi: Angle, lambda: Angle) -> Self {
        self.gate(Gate::U(qubit, theta, phi, lambda))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    /// Gantree: cnot(self, c, t) -> Self // CNOT 추가
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::Cnot(control, target))
    }

    /// Alias for cnot
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.cnot(control, target)
    }

    /// Add CZ gate
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::Cz(control, target))
    }

    /// Add SWAP gate
    pub fn swap(self, qubit1: QubitId, qubit2: QubitId) -> Self {
        self.gate(Gate::Swap(qubit1, qubit2))
    }

    /// Add CRZ gate
    pub fn crz(self, control: QubitId, target: QubitId, angle: Angle) -> Self {
        self.gate(Gate::Crz(control, target, angle))
    }

    /// Add an opaque two-qubit unitary labelled by `seed`
    /// Gantree: su4(self, a, b, seed) -> Self // SU(4) 블록
    pub fn su4(self, qubit1: QubitId, qubit2: QubitId, seed: u64) -> Self {
        self.gate(Gate::Su4(qubit1, qubit2, seed))
    }

    // ========================================================================
    // Measurement and Control
    // ========================================================================

    /// Add measurement on single qubit
    pub fn measure(self, qubit: QubitId) -> Self {
        self.gate(Gate::Measure(qubit))
    }

    /// Add one measurement per qubit
    pub fn measure_all(mut self) -> Self {
        for q in 0..self.circuit.num_qubits() {
            let _ = self.circuit.add_gate(Gate::Measure(q));
        }
        self
    }

    /// Add barrier across all qubits
    pub fn barrier(self) -> Self {
        let qubits: Vec<QubitId> = (0..self.circuit.num_qubits()).collect();
        self.gate(Gate::Barrier(qubits))
    }

    /// Add barrier on specific qubits
    pub fn barrier_on(self, qubits: Vec<QubitId>) -> Self {
        self.gate(Gate::Barrier(qubits))
    }

    /// Add reset
    pub fn reset(self, qubit: QubitId) -> Self {
        self.gate(Gate::Reset(qubit))
    }

    // ========================================================================
    // Layer Operations
    // ========================================================================

    /// Add CX chain (linear connectivity)
    /// Gantree: cx_chain(self) -> Self // CX 체인
    pub fn cx_chain(mut self) -> Self {
        let n = self.circuit.num_qubits();
        for i in 0..n.saturating_sub(1) {
            let _ = self.circuit.add_gate(Gate::Cnot(i, i + 1));
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build and return the circuit
    pub fn build(self) -> Circuit {
        self.circuit
    }

    /// Build with validation
    pub fn build_validated(self) -> QcutResult<Circuit> {
        if self.circuit.is_empty() {
            return Err(QcutError::EmptyCircuit);
        }
        Ok(self.circuit)
    }

    /// Get reference to current circuit state
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .cnot(0, 1)
            .cnot(1, 2)
            .measure_all()
            .build();

        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.gate_count(), 6);
    }

    #[test]
    fn test_builder_chain() {
        let circuit = CircuitBuilder::new(5).h(0).cx_chain().build();

        assert_eq!(circuit.gate_count(), 5);
        assert_eq!(circuit.count_2q(), 4);
    }

    #[test]
    fn test_builder_drops_out_of_range() {
        let circuit = CircuitBuilder::new(2).h(0).cnot(1, 5).build();
        assert_eq!(circuit.gate_count(), 1);
    }

    #[test]
    fn test_builder_su4() {
        let circuit = CircuitBuilder::new(3).su4(2, 0, 11).su4(0, 1, 12).build();
        assert_eq!(circuit.count_2q(), 2);
        assert_eq!(circuit.gates()[0], Gate::Su4(2, 0, 11));
    }

    #[test]
    fn test_build_validated_empty() {
        assert!(CircuitBuilder::new(2).build_validated().is_err());
        assert!(CircuitBuilder::new(2).h(1).build_validated().is_ok());
    }
}
