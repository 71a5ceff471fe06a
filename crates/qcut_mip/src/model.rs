//! Integer programming model
//!
//! Gantree: L2_Mip → Model
//!
//! Solver-independent description of an integer program: bounded
//! binary/integer variables, linear constraints and a linear objective.
//! Models are built once and handed to any [`crate::MipSolver`].

use qcut_core::{QcutError, QcutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

// ============================================================================
// Variables
// ============================================================================

/// Handle to a model variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var(usize);

impl Var {
    /// Position of the variable in the model
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Variable domain type
/// Gantree: VarType // 변수 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    /// 0/1 variable
    Binary,
    /// Integer variable within its bounds
    Integer,
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarInfo {
    /// Optional name (used by [`Model::var_by_name`])
    pub name: Option<String>,
    /// Domain type
    pub vtype: VarType,
    /// Lower bound
    pub lb: f64,
    /// Upper bound
    pub ub: f64,
}

// ============================================================================
// Linear Expressions
// ============================================================================

/// Linear expression `Σ coef·var + constant`
/// Gantree: LinExpr // 선형식
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinExpr {
    terms: Vec<(Var, f64)>,
    constant: f64,
}

impl LinExpr {
    /// Empty expression (zero)
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant expression
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// Single term `coef·var`
    pub fn term(var: Var, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    /// Sum of expressions
    /// Gantree: sum(iter) -> LinExpr // quicksum
    pub fn sum<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LinExpr>,
    {
        let mut expr = LinExpr::new();
        for item in items {
            expr += item.into();
        }
        expr
    }

    /// Add `coef·var` in place
    pub fn add_term(&mut self, var: Var, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Raw terms (may repeat a variable)
    pub fn terms(&self) -> &[(Var, f64)] {
        &self.terms
    }

    /// Constant part
    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    /// Terms with repeated variables merged and zero coefficients dropped
    pub fn compacted(&self) -> Vec<(Var, f64)> {
        let mut merged: Vec<(Var, f64)> = Vec::with_capacity(self.terms.len());
        let mut position: HashMap<Var, usize> = HashMap::new();
        for &(var, coef) in &self.terms {
            match position.get(&var) {
                Some(&i) => merged[i].1 += coef,
                None => {
                    position.insert(var, merged.len());
                    merged.push((var, coef));
                }
            }
        }
        merged.retain(|&(_, coef)| coef != 0.0);
        merged
    }

    /// Evaluate against a full assignment
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    fn scaled(mut self, factor: f64) -> Self {
        for term in &mut self.terms {
            term.1 *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl From<Var> for LinExpr {
    fn from(var: Var) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl From<f64> for LinExpr {
    fn from(value: f64) -> Self {
        LinExpr::constant(value)
    }
}

impl<T: Into<LinExpr>> AddAssign<T> for LinExpr {
    fn add_assign(&mut self, rhs: T) {
        let rhs = rhs.into();
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: T) -> LinExpr {
        self += rhs;
        self
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: T) -> LinExpr {
        self += rhs.into().scaled(-1.0);
        self
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> LinExpr {
        self.scaled(-1.0)
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;

    fn mul(self, rhs: f64) -> LinExpr {
        self.scaled(rhs)
    }
}

impl Div<f64> for LinExpr {
    type Output = LinExpr;

    fn div(self, rhs: f64) -> LinExpr {
        self.scaled(1.0 / rhs)
    }
}

impl<T: Into<LinExpr>> Add<T> for Var {
    type Output = LinExpr;

    fn add(self, rhs: T) -> LinExpr {
        LinExpr::from(self) + rhs
    }
}

impl<T: Into<LinExpr>> Sub<T> for Var {
    type Output = LinExpr;

    fn sub(self, rhs: T) -> LinExpr {
        LinExpr::from(self) - rhs
    }
}

impl Mul<f64> for Var {
    type Output = LinExpr;

    fn mul(self, rhs: f64) -> LinExpr {
        LinExpr::term(self, rhs)
    }
}

impl Mul<Var> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: Var) -> LinExpr {
        LinExpr::term(rhs, self)
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Constraint sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// `lhs ≤ rhs`
    Le,
    /// `lhs ≥ rhs`
    Ge,
    /// `lhs = rhs`
    Eq,
}

/// Linear constraint stored as `expr (sense) 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// `lhs - rhs`
    pub expr: LinExpr,
    /// Comparison against zero
    pub sense: Sense,
}

impl Constraint {
    /// Check the constraint against an assignment
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => lhs <= tol,
            Sense::Ge => lhs >= -tol,
            Sense::Eq => lhs.abs() <= tol,
        }
    }
}

/// Objective direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjSense {
    /// Minimize the objective
    #[default]
    Minimize,
    /// Maximize the objective
    Maximize,
}

// ============================================================================
// Model
// ============================================================================

/// Integer program
/// Gantree: Model // MIP 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    vars: Vec<VarInfo>,
    constraints: Vec<Constraint>,
    objective: LinExpr,
    obj_sense: ObjSense,
    names: HashMap<String, Var>,
}

impl Model {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// Add an anonymous variable
    /// Gantree: add_var(vtype, lb, ub) -> Var // 변수 추가
    pub fn add_var(&mut self, vtype: VarType, lb: f64, ub: f64) -> Var {
        self.vars.push(VarInfo {
            name: None,
            vtype,
            lb,
            ub,
        });
        Var(self.vars.len() - 1)
    }

    /// Add a named variable (the last declaration wins on name reuse)
    pub fn add_named_var(&mut self, name: impl Into<String>, vtype: VarType, lb: f64, ub: f64) -> Var {
        let name = name.into();
        let var = self.add_var(vtype, lb, ub);
        self.vars[var.0].name = Some(name.clone());
        self.names.insert(name, var);
        var
    }

    /// Add an anonymous binary variable
    pub fn add_binary(&mut self) -> Var {
        self.add_var(VarType::Binary, 0.0, 1.0)
    }

    /// Look up a variable by name
    pub fn var_by_name(&self, name: &str) -> Option<Var> {
        self.names.get(name).copied()
    }

    /// Variable declaration
    pub fn var_info(&self, var: Var) -> Option<&VarInfo> {
        self.vars.get(var.0)
    }

    /// All variable declarations in creation order
    pub fn vars(&self) -> &[VarInfo] {
        &self.vars
    }

    /// Number of variables
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    // ========================================================================
    // Constraints
    // ========================================================================

    /// Add `lhs (sense) rhs`
    /// Gantree: add_constr(lhs, sense, rhs) // 제약 추가
    pub fn add_constr(&mut self, lhs: impl Into<LinExpr>, sense: Sense, rhs: impl Into<LinExpr>) {
        self.constraints.push(Constraint {
            expr: lhs.into() - rhs.into(),
            sense,
        });
    }

    /// Add `lhs ≤ rhs`
    pub fn add_le(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.add_constr(lhs, Sense::Le, rhs);
    }

    /// Add `lhs ≥ rhs`
    pub fn add_ge(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.add_constr(lhs, Sense::Ge, rhs);
    }

    /// Add `lhs = rhs`
    pub fn add_eq(&mut self, lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) {
        self.add_constr(lhs, Sense::Eq, rhs);
    }

    /// Add a binary `z = x·y` for binaries `x`, `y`
    ///
    /// Linearized as `z ≤ x`, `z ≤ y`, `z ≥ x + y − 1`.
    /// Gantree: add_and(x, y) -> Var // 곱 선형화
    pub fn add_and(&mut self, x: Var, y: Var) -> Var {
        let z = self.add_binary();
        self.add_le(z, x);
        self.add_le(z, y);
        self.add_ge(z, x + y - 1.0);
        z
    }

    /// All constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints
    pub fn num_constrs(&self) -> usize {
        self.constraints.len()
    }

    // ========================================================================
    // Objective
    // ========================================================================

    /// Set the objective
    pub fn set_objective(&mut self, expr: impl Into<LinExpr>, sense: ObjSense) {
        self.objective = expr.into();
        self.obj_sense = sense;
    }

    /// Objective expression
    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    /// Objective direction
    pub fn obj_sense(&self) -> ObjSense {
        self.obj_sense
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check bounds and variable references
    pub fn validate(&self) -> QcutResult<()> {
        for (i, info) in self.vars.iter().enumerate() {
            if !info.lb.is_finite() || !info.ub.is_finite() {
                return Err(QcutError::InvalidModel(format!(
                    "variable {} has an unbounded domain",
                    i
                )));
            }
            if info.lb > info.ub {
                return Err(QcutError::InvalidModel(format!(
                    "variable {} has lb {} > ub {}",
                    i, info.lb, info.ub
                )));
            }
        }

        let n = self.vars.len();
        let exprs = self
            .constraints
            .iter()
            .map(|c| &c.expr)
            .chain(std::iter::once(&self.objective));
        for expr in exprs {
            if let Some(&(var, _)) = expr.terms().iter().find(|(v, _)| v.0 >= n) {
                return Err(QcutError::InvalidModel(format!(
                    "unknown variable {}",
                    var.0
                )));
            }
        }
        Ok(())
    }

    /// Check a full assignment against bounds, integrality and constraints
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        if values.len() != self.vars.len() {
            return false;
        }
        let in_domain = self.vars.iter().zip(values).all(|(info, &x)| {
            x >= info.lb - tol && x <= info.ub + tol && (x - x.round()).abs() <= tol
        });
        in_domain && self.constraints.iter().all(|c| c.is_satisfied(values, tol))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model '{}' ({} vars, {} constraints)",
            self.name,
            self.vars.len(),
            self.constraints.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_arithmetic() {
        let mut model = Model::new("t");
        let x = model.add_binary();
        let y = model.add_binary();

        let expr = LinExpr::constant(2.0) - x - y;
        assert_eq!(expr.evaluate(&[1.0, 0.0]), 1.0);

        let expr = (x + y) / 2.0;
        assert_eq!(expr.evaluate(&[1.0, 1.0]), 1.0);

        let expr = 3.0 * x - y * 2.0;
        assert_eq!(expr.evaluate(&[1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_compacted_merges_terms() {
        let mut model = Model::new("t");
        let x = model.add_binary();
        let y = model.add_binary();

        let expr = x + y - x + x * 2.0;
        let terms = expr.compacted();
        assert_eq!(terms, vec![(x, 2.0), (y, 1.0)]);

        let cancel = (x - x).compacted();
        assert!(cancel.is_empty());
    }

    #[test]
    fn test_sum() {
        let mut model = Model::new("t");
        let vars: Vec<Var> = (0..4).map(|_| model.add_binary()).collect();
        let total = LinExpr::sum(vars.iter().copied());
        assert_eq!(total.evaluate(&[1.0, 1.0, 0.0, 1.0]), 3.0);
    }

    #[test]
    fn test_named_lookup() {
        let mut model = Model::new("t");
        let cuts = model.add_named_var("num_cuts", VarType::Integer, 0.0, 4.1);
        assert_eq!(model.var_by_name("num_cuts"), Some(cuts));
        assert!(model.var_by_name("missing").is_none());
    }

    #[test]
    fn test_and_linearization() {
        let mut model = Model::new("t");
        let x = model.add_binary();
        let y = model.add_binary();
        let z = model.add_and(x, y);

        assert_eq!(z.index(), 2);
        assert!(model.is_feasible(&[1.0, 1.0, 1.0], 1e-9));
        assert!(model.is_feasible(&[1.0, 0.0, 0.0], 1e-9));
        assert!(!model.is_feasible(&[1.0, 1.0, 0.0], 1e-9));
        assert!(!model.is_feasible(&[0.0, 1.0, 1.0], 1e-9));
    }

    #[test]
    fn test_validate() {
        let mut model = Model::new("t");
        model.add_var(VarType::Integer, 3.0, 1.0);
        assert!(model.validate().is_err());

        let mut model = Model::new("t");
        model.add_var(VarType::Integer, 0.0, f64::INFINITY);
        assert!(model.validate().is_err());

        let mut model = Model::new("t");
        let x = model.add_binary();
        model.add_le(x, 1.0);
        assert!(model.validate().is_ok());
    }
}
