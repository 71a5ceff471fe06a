//! Cut search configuration
//!
//! Gantree: L3_Search → CutConfig
//!
//! Budgets and candidate subcircuit counts for one search.

use qcut_core::search::{DEFAULT_MAX_CUTS, DEFAULT_NUM_SUBCIRCUITS, DEFAULT_TIME_LIMIT_SECS};
use qcut_core::QcutResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cut search configuration
/// Gantree: CutConfig // 탐색 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutConfig {
    /// Maximum input qubits of one subcircuit
    pub max_subcircuit_qubit: usize,

    /// Maximum number of cuts
    pub max_cuts: usize,

    /// Candidate subcircuit counts, tried in this order
    pub num_subcircuits: Vec<usize>,

    /// Wall-clock limit per solver call (seconds)
    pub time_limit_secs: u64,
}

impl CutConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Configuration for a qubit budget with default cut limits
    pub fn new(max_subcircuit_qubit: usize) -> Self {
        Self {
            max_subcircuit_qubit,
            ..Self::default()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the per-subcircuit qubit budget
    pub fn with_max_subcircuit_qubit(mut self, max_subcircuit_qubit: usize) -> Self {
        self.max_subcircuit_qubit = max_subcircuit_qubit;
        self
    }

    /// Set the cut limit
    pub fn with_max_cuts(mut self, max_cuts: usize) -> Self {
        self.max_cuts = max_cuts;
        self
    }

    /// Set the candidate subcircuit counts
    pub fn with_num_subcircuits(mut self, num_subcircuits: Vec<usize>) -> Self {
        self.num_subcircuits = num_subcircuits;
        self
    }

    /// Set the solver time limit in seconds
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Solver time limit
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    // ========================================================================
    // Feasibility
    // ========================================================================

    /// Whether `k` subcircuits can cover `num_qubits` at all
    ///
    /// `k` subcircuits chained by cuts hold at most `k·maxQ − (k−1)`
    /// distinct qubits; `k` may not exceed the qubit count or `max_cuts + 1`.
    /// Gantree: is_candidate(k, nq) -> bool // 후보 판정
    pub fn is_candidate(&self, num_subcircuit: usize, num_qubits: usize) -> bool {
        let capacity = (num_subcircuit * self.max_subcircuit_qubit + 1).saturating_sub(num_subcircuit);
        capacity >= num_qubits
            && num_subcircuit <= num_qubits
            && num_subcircuit <= self.max_cuts + 1
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_subcircuit_qubit == 0 {
            return Err("max_subcircuit_qubit must be > 0".to_string());
        }

        if self.num_subcircuits.is_empty() {
            return Err("num_subcircuits must not be empty".to_string());
        }

        if let Some(&k) = self.num_subcircuits.iter().find(|&&k| k == 0) {
            return Err(format!("subcircuit counts must be > 0, got {}", k));
        }

        if self.time_limit_secs == 0 {
            return Err("time_limit_secs must be > 0".to_string());
        }

        Ok(())
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize to JSON
    pub fn to_json(&self) -> QcutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> QcutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            max_subcircuit_qubit: 8,
            max_cuts: DEFAULT_MAX_CUTS,
            num_subcircuits: DEFAULT_NUM_SUBCIRCUITS.to_vec(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

impl fmt::Display for CutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CutConfig(maxQ={}, max_cuts={}, k={:?}, limit={}s)",
            self.max_subcircuit_qubit, self.max_cuts, self.num_subcircuits, self.time_limit_secs
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
