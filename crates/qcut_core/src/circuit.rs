//! Quantum circuit structure for QCUT
//!
//! Gantree: L1_Circuit → Circuit
//!
//! The gate list of a [`Circuit`] is its topological order. Subcircuits
//! produced by the cut searcher are plain circuits over local qubits.

use crate::dag::CircuitDag;
use crate::error::{QcutError, QcutResult};
use crate::gate::Gate;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    num_qubits: usize,

    /// Gate sequence in topological order
    gates: Vec<Gate>,

    /// Optional circuit name
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create from a vector of gates
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> QcutResult<Self> {
        let circuit = Self {
            num_qubits,
            gates,
            name: None,
        };
        circuit.validate_gates()?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> QcutResult<()> {
        Self::check_gate(&gate, self.num_qubits)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Build the per-wire dependency view of this circuit
    pub fn dag(&self) -> CircuitDag {
        CircuitDag::from_circuit(self)
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Calculate circuit depth (longest path, barriers excluded)
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in self.gates.iter().filter(|g| !g.is_barrier()) {
            let qubits = gate.qubits();
            let max_depth = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0);

            for &q in &qubits {
                if q < self.num_qubits {
                    qubit_depths[q] = max_depth + 1;
                }
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Get total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of operations, barriers excluded
    /// Gantree: size(&self) -> usize // 연산 수
    pub fn size(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_barrier()).count()
    }

    /// Count single-qubit gates
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_single_qubit()).count()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Get two-qubit gate pairs in circuit order
    pub fn two_qubit_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.gates
            .iter()
            .filter(|g| g.is_two_qubit())
            .map(|g| {
                let qs = g.qubits();
                (qs[0], qs[1])
            })
            .collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_gate(gate: &Gate, num_qubits: usize) -> QcutResult<()> {
        let qubits = gate.qubits();
        for &qubit in &qubits {
            if qubit >= num_qubits {
                return Err(QcutError::GateQubitMismatch { qubit, num_qubits });
            }
        }
        let mut seen = HashSet::new();
        if let Some(&qubit) = qubits.iter().find(|&&q| !seen.insert(q)) {
            return Err(QcutError::InvalidGateParameter(format!(
                "{} acts twice on qubit {}",
                gate.name(),
                qubit
            )));
        }
        Ok(())
    }

    /// Validate all gates in the circuit
    fn validate_gates(&self) -> QcutResult<()> {
        for gate in &self.gates {
            Self::check_gate(gate, self.num_qubits)?;
        }
        Ok(())
    }

    // ========================================================================
    // QASM Conversion
    // ========================================================================

    /// Convert to OpenQASM 2.0 string
    /// Gantree: to_qasm(&self) -> String // QASM2 출력
    pub fn to_qasm(&self) -> String {
        let mut lines = vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            String::new(),
            format!("qreg q[{}];", self.num_qubits),
            format!("creg c[{}];", self.num_qubits),
            String::new(),
        ];

        for gate in &self.gates {
            lines.push(gate.to_qasm());
        }

        lines.join("\n")
    }

    /// Parse from OpenQASM 2.0 string (single register, basic gate set)
    /// Gantree: from_qasm(s) -> Result<Self> // QASM2 파싱
    pub fn from_qasm(qasm: &str) -> QcutResult<Self> {
        let mut num_qubits = 0;
        let mut gates = Vec::new();

        for line in qasm.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if line.starts_with("qreg") {
                if let Some(n) = parse_register_size(line) {
                    num_qubits = n;
                }
                continue;
            }

            if line.starts_with("OPENQASM")
                || line.starts_with("include")
                || line.starts_with("creg")
            {
                continue;
            }

            match parse_gate_line(line)? {
                Some(gate) => gates.push(gate),
                None => {
                    return Err(QcutError::InvalidQasm(format!(
                        "Unsupported statement: {}",
                        line
                    )))
                }
            }
        }

        if num_qubits == 0 {
            return Err(QcutError::InvalidQasm("No qreg declaration found".into()));
        }

        Circuit::from_gates(num_qubits, gates)
    }
}

// ============================================================================
// QASM Parsing Helpers
// ============================================================================

fn parse_register_size(line: &str) -> Option<usize> {
    // "qreg q[N];" -> N
    let start = line.find('[')?;
    let end = line.find(']')?;
    line[start + 1..end].parse().ok()
}

fn parse_gate_line(line: &str) -> QcutResult<Option<Gate>> {
    let line = line.trim().trim_end_matches(';');

    let (name, params, qubits_str) = if let Some(paren_pos) = line.find('(') {
        let end_paren = line
            .find(')')
            .ok_or_else(|| QcutError::InvalidQasm(format!("Missing closing paren: {}", line)))?;
        let params: Vec<&str> = line[paren_pos + 1..end_paren]
            .split(',')
            .map(|s| s.trim())
            .collect();
        (&line[..paren_pos], params, line[end_paren + 1..].trim())
    } else {
        let mut parts = line.splitn(2, ' ');
        let name = parts.next().unwrap_or_default();
        match parts.next() {
            Some(rest) => (name, Vec::new(), rest.trim()),
            None => return Ok(None),
        }
    };

    // Measurement targets are dropped: "measure q[0] -> c[0]"
    let qubits_str = qubits_str.split("->").next().unwrap_or_default();
    let qubits = parse_qubits(qubits_str)?;
    let angle = |i: usize| -> QcutResult<f64> {
        params
            .get(i)
            .and_then(|p| p.parse::<f64>().ok())
            .ok_or_else(|| QcutError::InvalidQasm(format!("Bad parameter in: {}", line)))
    };
    let q = |i: usize| -> QcutResult<QubitId> {
        qubits
            .get(i)
            .copied()
            .ok_or_else(|| QcutError::InvalidQasm(format!("Missing qubit in: {}", line)))
    };

    let gate = match name.trim().to_lowercase().as_str() {
        "h" => Gate::H(q(0)?),
        "x" => Gate::X(q(0)?),
        "y" => Gate::Y(q(0)?),
        "z" => Gate::Z(q(0)?),
        "s" => Gate::S(q(0)?),
        "sdg" => Gate::Sdg(q(0)?),
        "t" => Gate::T(q(0)?),
        "tdg" => Gate::Tdg(q(0)?),
        "sx" => Gate::Sx(q(0)?),
        "id" => Gate::Id(q(0)?),
        "rx" => Gate::Rx(q(0)?, angle(0)?),
        "ry" => Gate::Ry(q(0)?, angle(0)?),
        "rz" => Gate::Rz(q(0)?, angle(0)?),
        "p" => Gate::P(q(0)?, angle(0)?),
        "u" | "u3" => Gate::U(q(0)?, angle(0)?, angle(1)?, angle(2)?),
        "cx" | "cnot" => Gate::Cnot(q(0)?, q(1)?),
        "cz" => Gate::Cz(q(0)?, q(1)?),
        "cy" => Gate::Cy(q(0)?, q(1)?),
        "swap" => Gate::Swap(q(0)?, q(1)?),
        "iswap" => Gate::ISwap(q(0)?, q(1)?),
        "ecr" => Gate::Ecr(q(0)?, q(1)?),
        "crx" => Gate::Crx(q(0)?, q(1)?, angle(0)?),
        "cry" => Gate::Cry(q(0)?, q(1)?, angle(0)?),
        "crz" => Gate::Crz(q(0)?, q(1)?, angle(0)?),
        "su4" => {
            let seed = params
                .first()
                .and_then(|p| p.parse::<u64>().ok())
                .ok_or_else(|| QcutError::InvalidQasm(format!("Bad su4 label: {}", line)))?;
            Gate::Su4(q(0)?, q(1)?, seed)
        }
        "measure" => Gate::Measure(q(0)?),
        "reset" => Gate::Reset(q(0)?),
        "barrier" => Gate::Barrier(qubits),
        _ => return Ok(None),
    };

    Ok(Some(gate))
}

fn parse_qubits(s: &str) -> QcutResult<Vec<QubitId>> {
    let mut qubits = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        // "q[N]" -> N
        let (Some(start), Some(end)) = (part.find('['), part.find(']')) else {
            continue;
        };
        let qubit = part[start + 1..end]
            .parse()
            .map_err(|_| QcutError::InvalidQasm(format!("Bad qubit reference: {}", part)))?;
        qubits.push(qubit);
    }

    Ok(qubits)
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} gates)",
            self.num_qubits,
            self.gates.len()
        )?;
        for gate in &self.gates {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
