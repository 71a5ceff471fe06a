//! Circuit generators
//!
//! Gantree: L1_Circuit → Generators
//!
//! Seedable circuit families used to exercise the cut searcher.

use crate::builder::CircuitBuilder;
use crate::circuit::Circuit;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::f64::consts::PI;

/// Two-qubit blocks of the 8-qubit quantum-volume reference circuit
/// as `(seed, qubit, qubit)`
const QV8_BLOCKS: [(u64, usize, usize); 32] = [
    (542, 4, 0),
    (996, 5, 1),
    (402, 6, 3),
    (552, 2, 7),
    (242, 7, 4),
    (212, 6, 3),
    (910, 0, 1),
    (573, 5, 2),
    (48, 2, 1),
    (906, 5, 0),
    (663, 3, 7),
    (193, 4, 6),
    (430, 0, 7),
    (630, 1, 4),
    (167, 5, 3),
    (67, 6, 2),
    (473, 4, 3),
    (121, 5, 0),
    (854, 1, 6),
    (834, 7, 2),
    (529, 2, 1),
    (351, 3, 5),
    (376, 6, 0),
    (857, 7, 4),
    (139, 6, 4),
    (537, 7, 0),
    (338, 1, 3),
    (358, 2, 5),
    (843, 0, 1),
    (100, 3, 6),
    (911, 4, 2),
    (172, 7, 5),
];

/// Circuit generator
/// Gantree: CircuitGenerator // 회로 생성기
pub struct CircuitGenerator {
    /// Random seed
    seed: Option<u64>,
}

impl CircuitGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    // ========================================================================
    // Fixed Circuits
    // ========================================================================

    /// GHZ state preparation: H then a CX chain
    pub fn ghz(&self, num_qubits: usize) -> Circuit {
        CircuitBuilder::with_name(num_qubits, format!("ghz_{}", num_qubits))
            .h(0)
            .cx_chain()
            .build()
    }

    /// The 8-qubit, 32-block quantum-volume reference circuit
    /// Gantree: quantum_volume_8q() -> Circuit // QV 기준 회로
    pub fn quantum_volume_8q(&self) -> Circuit {
        QV8_BLOCKS
            .iter()
            .fold(CircuitBuilder::with_name(8, "QV_8"), |b, &(seed, q0, q1)| {
                b.su4(q0, q1, seed)
            })
            .build()
    }

    // ========================================================================
    // Random Circuits
    // ========================================================================

    /// Quantum-volume style circuit
    ///
    /// Each layer shuffles the qubits and applies a random `Su4` block to
    /// every adjacent pair of the permutation.
    pub fn quantum_volume(&self, num_qubits: usize, depth: usize) -> Circuit {
        let mut rng = self.get_rng();
        let mut builder = CircuitBuilder::with_name(num_qubits, format!("QV_{}", num_qubits));
        let mut order: Vec<usize> = (0..num_qubits).collect();

        for _ in 0..depth {
            order.shuffle(&mut rng);
            for pair in order.chunks_exact(2) {
                builder = builder.su4(pair[0], pair[1], rng.gen_range(0..1000));
            }
        }

        builder.build()
    }

    /// Nearest-neighbour brickwork with random single-qubit rotations
    ///
    /// Even layers couple (0,1), (2,3), ...; odd layers couple (1,2), (3,4), ...
    pub fn brickwork(&self, num_qubits: usize, depth: usize) -> Circuit {
        let mut rng = self.get_rng();
        let mut builder = CircuitBuilder::with_name(num_qubits, format!("brick_{}", num_qubits));

        for layer in 0..depth {
            for q in 0..num_qubits {
                let angle: f64 = rng.gen::<f64>() * 2.0 * PI;
                builder = if rng.gen::<bool>() {
                    builder.rx(q, angle)
                } else {
                    builder.rz(q, angle)
                };
            }
            let mut q = layer % 2;
            while q + 1 < num_qubits {
                builder = builder.cz(q, q + 1);
                q += 2;
            }
        }

        builder.build()
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Get RNG with optional seed
    fn get_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for CircuitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
