//! Gate identity keys
//!
//! Gantree: L3_Search → Keys
//!
//! Gates are identified by the ordinal of each of their qubit arguments on
//! that qubit's wire. Two ordinal spaces exist and are kept apart by type:
//!
//! * [`VertexKey`] counts only two-qubit gates (the interaction graph space)
//! * [`DepthKey`] counts every operation (the full circuit space)

use qcut_core::{QubitId, WireCount};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// VertexKey
// ============================================================================

/// Two-qubit-only ordinal key of an interaction-graph vertex
/// Gantree: VertexKey // 2큐빗 순번 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexKey(pub [WireCount; 2]);

impl VertexKey {
    /// Key from the two qubit arguments, in argument order
    pub fn new(first: WireCount, second: WireCount) -> Self {
        Self([first, second])
    }

    /// Qubit arguments
    pub fn args(&self) -> &[WireCount; 2] {
        &self.0
    }

    /// Number of arguments that are their qubit's first two-qubit gate
    pub fn weight(&self) -> usize {
        self.0.iter().filter(|arg| arg.is_first()).count()
    }

    /// Wires on which `dest` directly follows `self`
    ///
    /// Returns `(wire, dest ordinal)` for every argument pair on the same
    /// qubit whose destination ordinal is one past the source ordinal, in
    /// source-then-destination argument order.
    /// Gantree: successor_wires(dest) -> Vec<(QubitId, usize)> // 절단 와이어
    pub fn successor_wires(&self, dest: &VertexKey) -> Vec<(QubitId, usize)> {
        let mut wires = Vec::new();
        for source in &self.0 {
            for target in &dest.0 {
                if source.qubit == target.qubit && target.count == source.count + 1 {
                    wires.push((source.qubit, target.count));
                }
            }
        }
        wires
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

// ============================================================================
// DepthKey
// ============================================================================

/// All-operation ordinal key of a circuit operation
/// Gantree: DepthKey // 전체 순번 키
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthKey(pub Vec<WireCount>);

impl DepthKey {
    /// Qubit arguments
    pub fn args(&self) -> &[WireCount] {
        &self.0
    }

    /// Number of qubit arguments
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Smallest ordinal gap over the qubits both keys touch
    ///
    /// `None` when the keys share no qubit.
    pub fn distance(&self, other: &DepthKey) -> Option<usize> {
        self.0
            .iter()
            .flat_map(|a| {
                other
                    .0
                    .iter()
                    .filter(move |b| b.qubit == a.qubit)
                    .map(move |b| a.count.abs_diff(b.count))
            })
            .min()
    }
}

impl fmt::Display for DepthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|arg| arg.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

// ============================================================================
// Ordinal Counter
// ============================================================================

/// Per-qubit occurrence counters used to stamp keys in circuit order
#[derive(Debug, Clone)]
pub(crate) struct OrdinalCounter {
    counts: Vec<usize>,
}

impl OrdinalCounter {
    pub(crate) fn new(num_qubits: usize) -> Self {
        Self {
            counts: vec![0; num_qubits],
        }
    }

    /// Read the current ordinal of every argument, then advance each qubit
    pub(crate) fn stamp(&mut self, qubits: &[QubitId]) -> Vec<WireCount> {
        let args = qubits
            .iter()
            .map(|&q| WireCount::new(q, self.counts[q]))
            .collect();
        for &q in qubits {
            self.counts[q] += 1;
        }
        args
    }
}

// ============================================================================
// Tests
// ============================================================================
