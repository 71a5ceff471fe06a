//! # QCUT Core
//!
//! Circuits, gates and the per-wire dependency view used by the QCUT cut
//! searcher.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcut_core // L0+L1: Foundation + Circuit (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // 핵심 타입 (완료)
//!         Constants // 탐색/솔버 상수 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Circuit // 회로 구조 (완료)
//!         Gate // 게이트 enum (완료)
//!         Circuit // 회로 구조체 (완료)
//!         CircuitBuilder // 빌더 패턴 (완료)
//!         CircuitDag // 와이어 의존 그래프 (완료)
//!         Generators // 회로 생성기 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcut_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new(3)
//!     .h(0)
//!     .cnot(0, 1)
//!     .cnot(1, 2)
//!     .build();
//!
//! let dag = circuit.dag();
//! assert_eq!(dag.nodes_on_wire(1), &[1, 2]);
//! println!("{}", circuit.to_qasm());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

/// Wire dependency view (Gantree: L1_Circuit → CircuitDag)
pub mod dag;

/// Circuit generators (Gantree: L1_Circuit → Generators)
pub mod generators;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use constants::{search, solver};
pub use dag::{CircuitDag, DagEdge};
pub use error::{QcutError, QcutResult};
pub use gate::Gate;
pub use generators::CircuitGenerator;
pub use types::{Angle, GateIndex, QubitId, SubcircuitId, WireCount};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qcut_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::dag::{CircuitDag, DagEdge};
    pub use crate::error::{QcutError, QcutResult};
    pub use crate::gate::Gate;
    pub use crate::generators::CircuitGenerator;
    pub use crate::types::{Angle, GateIndex, QubitId, SubcircuitId, WireCount};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_dag_edges_follow_wires() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .cnot(0, 1)
            .rz(1, 0.3)
            .cnot(1, 2)
            .build();

        let edges = circuit.dag().edges();
        // wire 0: h -> cx ; wire 1: cx -> rz -> cx
        assert_eq!(edges.len(), 3);
        assert!(edges
            .iter()
            .any(|e| e.source == 0 && e.target == 1 && e.wire == 0));
        assert!(edges
            .iter()
            .any(|e| e.source == 2 && e.target == 3 && e.wire == 1));
    }

    #[test]
    fn test_qv_reference_wires() {
        let circuit = CircuitGenerator::new().quantum_volume_8q();
        let dag = circuit.dag();

        // Every wire carries 8 blocks
        for q in 0..8 {
            assert_eq!(dag.nodes_on_wire(q).len(), 8);
        }
        // 8 wires, 7 op-to-op edges each
        assert_eq!(dag.edges().len(), 56);
    }

    #[test]
    fn test_qasm_roundtrip_generated() {
        let original = CircuitGenerator::with_seed(3).brickwork(4, 3);
        let parsed = Circuit::from_qasm(&original.to_qasm()).unwrap();

        assert_eq!(original.num_qubits(), parsed.num_qubits());
        assert_eq!(original.count_2q(), parsed.count_2q());
        assert_eq!(original.depth(), parsed.depth());
    }
}
