//! Quantum gate definitions for QCUT
//!
//! Gantree: L1_Circuit → Gate
//!
//! Gate enum covering the single- and two-qubit operations that appear in
//! circuits handed to the cut searcher. Only two-qubit operations become
//! vertices of the interaction graph; everything else is reattached to a
//! subcircuit after the partition is known.

use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Hadamard gate
    H(QubitId),

    /// Pauli-X gate (NOT)
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate (inverse of S)
    Sdg(QubitId),

    /// T gate (fourth root of Z)
    T(QubitId),

    /// T-dagger gate (inverse of T)
    Tdg(QubitId),

    /// SX gate (sqrt(X))
    Sx(QubitId),

    /// Identity gate
    Id(QubitId),

    // ========================================================================
    // Single-Qubit Parameterized Rotation Gates
    // ========================================================================
    /// Rotation around X-axis
    Rx(QubitId, Angle),

    /// Rotation around Y-axis
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    Rz(QubitId, Angle),

    /// General single-qubit rotation U(θ, φ, λ)
    U(QubitId, Angle, Angle, Angle),

    /// Phase gate P(λ) = diag(1, e^{iλ})
    P(QubitId, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (CX)
    /// Gantree: CNOT(QubitId, QubitId) // ctrl, tgt
    Cnot(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// Controlled-Y
    Cy(QubitId, QubitId),

    /// SWAP gate
    Swap(QubitId, QubitId),

    /// iSWAP gate
    ISwap(QubitId, QubitId),

    /// Controlled-Rz
    Crz(QubitId, QubitId, Angle),

    /// Controlled-Rx
    Crx(QubitId, QubitId, Angle),

    /// Controlled-Ry
    Cry(QubitId, QubitId, Angle),

    /// ECR gate (Echoed Cross-Resonance)
    Ecr(QubitId, QubitId),

    /// Opaque two-qubit unitary block, labelled by the seed it was drawn from
    /// Gantree: Su4(QubitId, QubitId, u64) // 임의 2Q 유니터리
    Su4(QubitId, QubitId, u64),

    // ========================================================================
    // Measurement and Control
    // ========================================================================
    /// Single qubit measurement
    Measure(QubitId),

    /// Barrier over the listed qubits
    Barrier(Vec<QubitId>),

    /// Reset qubit to |0⟩
    Reset(QubitId),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate, in argument order
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::T(q)
            | Gate::Tdg(q)
            | Gate::Sx(q)
            | Gate::Id(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::U(q, _, _, _)
            | Gate::P(q, _)
            | Gate::Measure(q)
            | Gate::Reset(q) => vec![*q],

            Gate::Cnot(c, t)
            | Gate::Cz(c, t)
            | Gate::Cy(c, t)
            | Gate::Swap(c, t)
            | Gate::ISwap(c, t)
            | Gate::Ecr(c, t)
            | Gate::Crz(c, t, _)
            | Gate::Crx(c, t, _)
            | Gate::Cry(c, t, _)
            | Gate::Su4(c, t, _) => vec![*c, *t],

            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// Number of qubit arguments
    pub fn arity(&self) -> usize {
        match self {
            Gate::Barrier(qs) => qs.len(),
            _ if self.is_two_qubit() => 2,
            _ => 1,
        }
    }

    /// Check if gate is a single-qubit unitary
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            Gate::H(_)
                | Gate::X(_)
                | Gate::Y(_)
                | Gate::Z(_)
                | Gate::S(_)
                | Gate::Sdg(_)
                | Gate::T(_)
                | Gate::Tdg(_)
                | Gate::Sx(_)
                | Gate::Id(_)
                | Gate::Rx(_, _)
                | Gate::Ry(_, _)
                | Gate::Rz(_, _)
                | Gate::U(_, _, _, _)
                | Gate::P(_, _)
        )
    }

    /// Check if gate is a two-qubit operation (barriers never are)
    /// Gantree: is_two_qubit(&self) -> bool // 2Q 판별
    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self,
            Gate::Cnot(_, _)
                | Gate::Cz(_, _)
                | Gate::Cy(_, _)
                | Gate::Swap(_, _)
                | Gate::ISwap(_, _)
                | Gate::Ecr(_, _)
                | Gate::Crz(_, _, _)
                | Gate::Crx(_, _, _)
                | Gate::Cry(_, _, _)
                | Gate::Su4(_, _, _)
        )
    }

    /// Check if gate is a barrier
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Get gate name
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::T(_) => "t",
            Gate::Tdg(_) => "tdg",
            Gate::Sx(_) => "sx",
            Gate::Id(_) => "id",
            Gate::Rx(_, _) => "rx",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::U(_, _, _, _) => "u",
            Gate::P(_, _) => "p",
            Gate::Cnot(_, _) => "cx",
            Gate::Cz(_, _) => "cz",
            Gate::Cy(_, _) => "cy",
            Gate::Swap(_, _) => "swap",
            Gate::ISwap(_, _) => "iswap",
            Gate::Ecr(_, _) => "ecr",
            Gate::Crz(_, _, _) => "crz",
            Gate::Crx(_, _, _) => "crx",
            Gate::Cry(_, _, _) => "cry",
            Gate::Su4(_, _, _) => "su4",
            Gate::Measure(_) => "measure",
            Gate::Barrier(_) => "barrier",
            Gate::Reset(_) => "reset",
        }
    }

    // ========================================================================
    // Qubit Remapping
    // ========================================================================

    /// Return the same operation applied to remapped qubits
    ///
    /// `map` is called once per qubit argument, in argument order. Used when a
    /// gate is moved into a subcircuit that numbers its qubits locally.
    /// Gantree: remap(&self, f) -> Gate // 큐비트 재배치
    pub fn remap<F>(&self, mut map: F) -> Gate
    where
        F: FnMut(QubitId) -> QubitId,
    {
        match self {
            Gate::H(q) => Gate::H(map(*q)),
            Gate::X(q) => Gate::X(map(*q)),
            Gate::Y(q) => Gate::Y(map(*q)),
            Gate::Z(q) => Gate::Z(map(*q)),
            Gate::S(q) => Gate::S(map(*q)),
            Gate::Sdg(q) => Gate::Sdg(map(*q)),
            Gate::T(q) => Gate::T(map(*q)),
            Gate::Tdg(q) => Gate::Tdg(map(*q)),
            Gate::Sx(q) => Gate::Sx(map(*q)),
            Gate::Id(q) => Gate::Id(map(*q)),
            Gate::Rx(q, a) => Gate::Rx(map(*q), *a),
            Gate::Ry(q, a) => Gate::Ry(map(*q), *a),
            Gate::Rz(q, a) => Gate::Rz(map(*q), *a),
            Gate::U(q, t, p, l) => Gate::U(map(*q), *t, *p, *l),
            Gate::P(q, l) => Gate::P(map(*q), *l),
            Gate::Cnot(c, t) => {
                let c = map(*c);
                Gate::Cnot(c, map(*t))
            }
            Gate::Cz(c, t) => {
                let c = map(*c);
                Gate::Cz(c, map(*t))
            }
            Gate::Cy(c, t) => {
                let c = map(*c);
                Gate::Cy(c, map(*t))
            }
            Gate::Swap(a, b) => {
                let a = map(*a);
                Gate::Swap(a, map(*b))
            }
            Gate::ISwap(a, b) => {
                let a = map(*a);
                Gate::ISwap(a, map(*b))
            }
            Gate::Ecr(c, t) => {
                let c = map(*c);
                Gate::Ecr(c, map(*t))
            }
            Gate::Crz(c, t, a) => {
                let c = map(*c);
                Gate::Crz(c, map(*t), *a)
            }
            Gate::Crx(c, t, a) => {
                let c = map(*c);
                Gate::Crx(c, map(*t), *a)
            }
            Gate::Cry(c, t, a) => {
                let c = map(*c);
                Gate::Cry(c, map(*t), *a)
            }
            Gate::Su4(a, b, seed) => {
                let a = map(*a);
                Gate::Su4(a, map(*b), *seed)
            }
            Gate::Measure(q) => Gate::Measure(map(*q)),
            Gate::Reset(q) => Gate::Reset(map(*q)),
            Gate::Barrier(qs) => Gate::Barrier(qs.iter().map(|&q| map(q)).collect()),
        }
    }

    /// Convert to OpenQASM 2.0 string
    /// Gantree: to_qasm(&self) -> String // QASM 변환
    pub fn to_qasm(&self) -> String {
        match self {
            Gate::H(q) => format!("h q[{}];", q),
            Gate::X(q) => format!("x q[{}];", q),
            Gate::Y(q) => format!("y q[{}];", q),
            Gate::Z(q) => format!("z q[{}];", q),
            Gate::S(q) => format!("s q[{}];", q),
            Gate::Sdg(q) => format!("sdg q[{}];", q),
            Gate::T(q) => format!("t q[{}];", q),
            Gate::Tdg(q) => format!("tdg q[{}];", q),
            Gate::Sx(q) => format!("sx q[{}];", q),
            Gate::Id(q) => format!("id q[{}];", q),

            Gate::Rx(q, theta) => format!("rx({}) q[{}];", theta, q),
            Gate::Ry(q, theta) => format!("ry({}) q[{}];", theta, q),
            Gate::Rz(q, theta) => format!("rz({}) q[{}];", theta, q),
            Gate::U(q, theta, phi, lambda) => {
                format!("u({},{},{}) q[{}];", theta, phi, lambda, q)
            }
            Gate::P(q, lambda) => format!("p({}) q[{}];", lambda, q),

            Gate::Cnot(c, t) => format!("cx q[{}],q[{}];", c, t),
            Gate::Cz(c, t) => format!("cz q[{}],q[{}];", c, t),
            Gate::Cy(c, t) => format!("cy q[{}],q[{}];", c, t),
            Gate::Swap(a, b) => format!("swap q[{}],q[{}];", a, b),
            Gate::ISwap(a, b) => format!("iswap q[{}],q[{}];", a, b),
            Gate::Ecr(c, t) => format!("ecr q[{}],q[{}];", c, t),
            Gate::Crz(c, t, theta) => format!("crz({}) q[{}],q[{}];", theta, c, t),
            Gate::Crx(c, t, theta) => format!("crx({}) q[{}],q[{}];", theta, c, t),
            Gate::Cry(c, t, theta) => format!("cry({}) q[{}],q[{}];", theta, c, t),
            // su4 is not a qelib1 gate; the seed travels as its parameter
            Gate::Su4(a, b, seed) => format!("su4({}) q[{}],q[{}];", seed, a, b),

            Gate::Measure(q) => format!("measure q[{}] -> c[{}];", q, q),
            Gate::Barrier(qs) => {
                let qubits: Vec<String> = qs.iter().map(|q| format!("q[{}]", q)).collect();
                format!("barrier {};", qubits.join(","))
            }
            Gate::Reset(q) => format!("reset q[{}];", q),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qasm())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_qubits() {
        assert_eq!(Gate::H(0).qubits(), vec![0]);
        assert_eq!(Gate::Cnot(0, 1).qubits(), vec![0, 1]);
        assert_eq!(Gate::Su4(4, 0, 542).qubits(), vec![4, 0]);
        assert_eq!(Gate::Barrier(vec![0, 1, 2]).qubits(), vec![0, 1, 2]);
    }

    #[test]
    fn test_gate_classification() {
        assert!(Gate::H(0).is_single_qubit());
        assert!(!Gate::H(0).is_two_qubit());

        assert!(Gate::Cnot(0, 1).is_two_qubit());
        assert!(Gate::Su4(0, 1, 7).is_two_qubit());
        assert!(!Gate::Cnot(0, 1).is_single_qubit());

        // A two-qubit barrier is not a two-qubit gate
        assert!(!Gate::Barrier(vec![0, 1]).is_two_qubit());
        assert_eq!(Gate::Barrier(vec![0, 1]).arity(), 2);

        assert!(!Gate::Measure(0).is_single_qubit());
        assert_eq!(Gate::Measure(0).arity(), 1);
    }

    #[test]
    fn test_remap() {
        let gate = Gate::Crz(3, 5, 0.25);
        let remapped = gate.remap(|q| q - 3);
        assert_eq!(remapped, Gate::Crz(0, 2, 0.25));

        let barrier = Gate::Barrier(vec![1, 2]).remap(|q| q * 10);
        assert_eq!(barrier, Gate::Barrier(vec![10, 20]));
    }

    #[test]
    fn test_remap_argument_order() {
        let mut seen = Vec::new();
        let _ = Gate::Cnot(7, 2).remap(|q| {
            seen.push(q);
            q
        });
        assert_eq!(seen, vec![7, 2]);
    }

    #[test]
    fn test_gate_to_qasm() {
        assert_eq!(Gate::H(0).to_qasm(), "h q[0];");
        assert_eq!(Gate::Cnot(0, 1).to_qasm(), "cx q[0],q[1];");
        assert_eq!(Gate::Su4(2, 7, 552).to_qasm(), "su4(552) q[2],q[7];");
        assert_eq!(
            Gate::Rx(0, 1.5707963267948966).to_qasm(),
            "rx(1.5707963267948966) q[0];"
        );
    }
}
