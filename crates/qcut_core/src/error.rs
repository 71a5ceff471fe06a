//! Error types for QCUT
//!
//! Gantree: L0_Foundation → Errors
//!
//! Error handling for circuits, the interaction graph, the solver seam and
//! the result interpreter.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QCUT
/// Gantree: QcutError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcutError {
    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Empty circuit
    #[error("Circuit is empty")]
    EmptyCircuit,

    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Invalid gate parameter
    #[error("Invalid gate parameter: {0}")]
    InvalidGateParameter(String),

    /// Invalid QASM format
    #[error("Invalid QASM: {0}")]
    InvalidQasm(String),

    // ========================================================================
    // Structural Errors (malformed graph or circuit, never recovered)
    // ========================================================================
    /// Interaction graph edges do not cover the vertex range exactly
    /// Gantree: MalformedGraph(String) // 그래프 불변식
    #[error("Malformed interaction graph: {0}")]
    MalformedGraph(String),

    /// A graph vertex does not have exactly two qubit arguments
    #[error("Vertex {vertex} has {arity} qubit arguments, expected 2")]
    InvalidVertexArity { vertex: usize, arity: usize },

    /// Operation could not be attributed to exactly one subcircuit
    /// Gantree: UnattributedGate{{gate}} // 귀속 실패
    #[error("Gate {gate} ({name}) cannot be attributed to a single subcircuit")]
    UnattributedGate { gate: usize, name: String },

    /// Partition vertex counts do not add up to the vertex count
    #[error("Partitions hold {assigned} vertices but the graph has {expected}")]
    PartitionSumMismatch { assigned: usize, expected: usize },

    /// A cut edge shares no consecutive wire between its endpoints
    #[error("Cannot locate cut between {source_gate} and {dest_gate}")]
    UnresolvedCut { source_gate: String, dest_gate: String },

    // ========================================================================
    // Solver Errors
    // ========================================================================
    /// Solver-internal fault
    /// Gantree: SolverError(String) // 솔버
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Model refers to unknown variables or has inconsistent bounds
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid search configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for QCUT operations
/// Gantree: QcutResult<T> // type alias
pub type QcutResult<T> = Result<T, QcutError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QcutError {
    fn from(err: serde_json::Error) -> Self {
        QcutError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QcutError {
    /// Check if error is recoverable at the search driver level
    ///
    /// A solver fault only disqualifies the current subcircuit count.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QcutError::SolverError(_))
    }

    /// Check if error signals a malformed graph or circuit
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            QcutError::MalformedGraph(_)
                | QcutError::InvalidVertexArity { .. }
                | QcutError::UnattributedGate { .. }
                | QcutError::PartitionSumMismatch { .. }
                | QcutError::UnresolvedCut { .. }
        )
    }

    /// Check if error is a circuit error
    pub fn is_circuit_error(&self) -> bool {
        matches!(
            self,
            QcutError::EmptyCircuit
                | QcutError::GateQubitMismatch { .. }
                | QcutError::InvalidGateParameter(_)
                | QcutError::InvalidQasm(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
