//! Core types for QCUT
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases and small value types shared by the circuit layer and the
//! cut searcher.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed, single register `q`)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Position of an operation in a circuit's gate list
pub type GateIndex = usize;

/// Index of a subcircuit (partition label)
/// Gantree: SubcircuitId // 부분회로 번호
pub type SubcircuitId = usize;

// ============================================================================
// WireCount
// ============================================================================

/// One qubit argument of an operation together with an occurrence ordinal
///
/// `count` is the number of operations of the counted kind that touched
/// `qubit` before this one. What is counted (all operations or two-qubit
/// operations only) depends on the key space the value is used in.
/// Gantree: WireCount // 큐비트 + 순번
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireCount {
    /// Qubit the operation acts on
    pub qubit: QubitId,

    /// Occurrence ordinal on that qubit
    pub count: usize,
}

impl WireCount {
    /// Create a new wire count
    pub fn new(qubit: QubitId, count: usize) -> Self {
        Self { qubit, count }
    }

    /// Check if this is the first counted occurrence on the qubit
    #[inline]
    pub fn is_first(&self) -> bool {
        self.count == 0
    }
}

impl fmt::Display for WireCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]{}", self.qubit, self.count)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_count_display() {
        assert_eq!(WireCount::new(3, 0).to_string(), "q[3]0");
        assert_eq!(WireCount::new(12, 4).to_string(), "q[12]4");
    }

    #[test]
    fn test_wire_count_first() {
        assert!(WireCount::new(0, 0).is_first());
        assert!(!WireCount::new(0, 1).is_first());
    }
}
