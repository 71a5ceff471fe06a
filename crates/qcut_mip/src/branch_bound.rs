//! Branch-and-bound integer solver
//!
//! Gantree: L2_Mip → BranchAndBound
//!
//! Depth-first branch and bound over integer domains. Every node tightens
//! variable bounds by activity-based propagation of the linear rows; the
//! objective bound of a node is the minimum activity of the objective over
//! the propagated domains.

use crate::model::{Model, ObjSense, Sense, VarType};
use crate::solver::{MipSolver, SolveParams, SolveStatus, Solution};
use qcut_core::solver::{FEASIBILITY_TOL, INTEGRALITY_TOL, TIME_CHECK_INTERVAL};
use qcut_core::QcutResult;
use std::collections::VecDeque;
use std::time::Instant;

// ============================================================================
// Compiled Model
// ============================================================================

/// `lo ≤ Σ a·x ≤ hi`
#[derive(Debug, Clone)]
struct Row {
    terms: Vec<(usize, f64)>,
    lo: f64,
    hi: f64,
}

/// Integer bounds of every variable at a node
#[derive(Debug, Clone, PartialEq)]
struct Domain {
    lo: Vec<i64>,
    hi: Vec<i64>,
}

impl Domain {
    fn is_consistent(&self) -> bool {
        self.lo.iter().zip(&self.hi).all(|(l, h)| l <= h)
    }

    fn first_free(&self) -> Option<usize> {
        (0..self.lo.len()).find(|&j| self.lo[j] < self.hi[j])
    }
}

/// Row-oriented form of a model, objective in minimization sense
#[derive(Debug)]
struct Compiled {
    rows: Vec<Row>,
    var_rows: Vec<Vec<usize>>,
    objective: Vec<(usize, f64)>,
    obj_constant: f64,
    obj_sign: f64,
    binary: Vec<bool>,
}

impl Compiled {
    fn new(model: &Model) -> QcutResult<(Self, Domain)> {
        model.validate()?;

        let n = model.num_vars();
        let mut lo = Vec::with_capacity(n);
        let mut hi = Vec::with_capacity(n);
        let mut binary = Vec::with_capacity(n);
        for info in model.vars() {
            let mut l = (info.lb - INTEGRALITY_TOL).ceil();
            let mut h = (info.ub + INTEGRALITY_TOL).floor();
            if info.vtype == VarType::Binary {
                l = l.max(0.0);
                h = h.min(1.0);
            }
            lo.push(l as i64);
            hi.push(h as i64);
            binary.push(info.vtype == VarType::Binary);
        }

        let mut rows = Vec::with_capacity(model.num_constrs());
        let mut var_rows = vec![Vec::new(); n];
        for constr in model.constraints() {
            let terms: Vec<(usize, f64)> = constr
                .expr
                .compacted()
                .into_iter()
                .map(|(var, coef)| (var.index(), coef))
                .collect();
            let rhs = -constr.expr.constant_value();
            let (row_lo, row_hi) = match constr.sense {
                Sense::Le => (f64::NEG_INFINITY, rhs),
                Sense::Ge => (rhs, f64::INFINITY),
                Sense::Eq => (rhs, rhs),
            };
            for &(j, _) in &terms {
                var_rows[j].push(rows.len());
            }
            rows.push(Row {
                terms,
                lo: row_lo,
                hi: row_hi,
            });
        }

        let obj_sign = match model.obj_sense() {
            ObjSense::Minimize => 1.0,
            ObjSense::Maximize => -1.0,
        };
        let objective = model
            .objective()
            .compacted()
            .into_iter()
            .map(|(var, coef)| (var.index(), obj_sign * coef))
            .collect();

        let compiled = Self {
            rows,
            var_rows,
            objective,
            obj_constant: obj_sign * model.objective().constant_value(),
            obj_sign,
            binary,
        };
        Ok((compiled, Domain { lo, hi }))
    }

    /// Minimum objective over a domain
    fn objective_bound(&self, dom: &Domain) -> f64 {
        self.obj_constant
            + self
                .objective
                .iter()
                .map(|&(j, c)| {
                    if c > 0.0 {
                        c * dom.lo[j] as f64
                    } else {
                        c * dom.hi[j] as f64
                    }
                })
                .sum::<f64>()
    }

    /// Tighten bounds until no seeded row changes anything
    ///
    /// Returns `false` when some row cannot be satisfied.
    /// Gantree: propagate(dom, rows) -> bool // 경계 전파
    fn propagate(&self, dom: &mut Domain, seeds: impl IntoIterator<Item = usize>) -> bool {
        let mut queue = VecDeque::new();
        let mut queued = vec![false; self.rows.len()];
        for r in seeds {
            if !queued[r] {
                queued[r] = true;
                queue.push_back(r);
            }
        }

        while let Some(r) = queue.pop_front() {
            queued[r] = false;
            let row = &self.rows[r];

            let (min_act, max_act) = row.terms.iter().fold((0.0, 0.0), |(min, max), &(j, a)| {
                let (l, h) = (dom.lo[j] as f64, dom.hi[j] as f64);
                if a > 0.0 {
                    (min + a * l, max + a * h)
                } else {
                    (min + a * h, max + a * l)
                }
            });
            if min_act > row.hi + FEASIBILITY_TOL || max_act < row.lo - FEASIBILITY_TOL {
                return false;
            }

            for &(j, a) in &row.terms {
                let (l, h) = (dom.lo[j] as f64, dom.hi[j] as f64);
                let (min_j, max_j) = if a > 0.0 { (a * l, a * h) } else { (a * h, a * l) };
                let mut new_lo = dom.lo[j];
                let mut new_hi = dom.hi[j];

                if row.hi.is_finite() {
                    // a·x ≤ hi − (min activity of the rest)
                    let limit = (row.hi - (min_act - min_j)) / a;
                    if a > 0.0 {
                        new_hi = new_hi.min((limit + INTEGRALITY_TOL).floor() as i64);
                    } else {
                        new_lo = new_lo.max((limit - INTEGRALITY_TOL).ceil() as i64);
                    }
                }
                if row.lo.is_finite() {
                    // a·x ≥ lo − (max activity of the rest)
                    let limit = (row.lo - (max_act - max_j)) / a;
                    if a > 0.0 {
                        new_lo = new_lo.max((limit - INTEGRALITY_TOL).ceil() as i64);
                    } else {
                        new_hi = new_hi.min((limit + INTEGRALITY_TOL).floor() as i64);
                    }
                }

                if new_lo > new_hi {
                    return false;
                }
                if new_lo != dom.lo[j] || new_hi != dom.hi[j] {
                    dom.lo[j] = new_lo;
                    dom.hi[j] = new_hi;
                    for &other in &self.var_rows[j] {
                        if !queued[other] {
                            queued[other] = true;
                            queue.push_back(other);
                        }
                    }
                    // Activities of this row are stale; it was re-queued above
                    break;
                }
            }
        }
        true
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Depth-first branch-and-bound solver
/// Gantree: BranchAndBound // 분기 한정
///
/// Branches on the lowest-index free variable. Binaries try 1 first,
/// general integers try the lower half first.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    /// Stop after this many nodes
    node_limit: Option<u64>,
}

impl BranchAndBound {
    /// Create a solver without a node limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `limit` nodes (reported as [`SolveStatus::TimeLimit`])
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    fn search(&self, model: &Compiled, root: Domain, params: &SolveParams, start: Instant) -> Solution {
        let cutoff = params.cutoff.map(|v| model.obj_sign * v);
        let mut incumbent: Option<(f64, Vec<i64>)> = None;
        let mut stack = vec![root];
        let mut node_count = 0u64;
        let mut interrupted = false;
        let mut hit_cutoff = false;

        while let Some(dom) = stack.pop() {
            node_count += 1;
            let over_nodes = self.node_limit.map_or(false, |limit| node_count > limit);
            let over_time =
                node_count % TIME_CHECK_INTERVAL == 0 && start.elapsed() >= params.time_limit;
            if over_nodes || over_time {
                stack.push(dom);
                interrupted = true;
                break;
            }

            let bound = model.objective_bound(&dom);
            if let Some((best, _)) = &incumbent {
                if bound >= best - FEASIBILITY_TOL {
                    continue;
                }
            }
            if let Some(limit) = cutoff {
                if bound >= limit - FEASIBILITY_TOL {
                    hit_cutoff = true;
                    continue;
                }
            }

            let Some(j) = dom.first_free() else {
                log::debug!("incumbent {} at node {}", model.obj_sign * bound, node_count);
                incumbent = Some((bound, dom.lo));
                continue;
            };

            let mid = dom.lo[j] + (dom.hi[j] - dom.lo[j]) / 2;
            let mut down = dom.clone();
            down.hi[j] = mid;
            let mut up = dom;
            up.lo[j] = mid + 1;

            // Last pushed is explored first
            let children = if model.binary[j] { [down, up] } else { [up, down] };
            for mut child in children {
                if model.propagate(&mut child, model.var_rows[j].iter().copied()) {
                    stack.push(child);
                }
            }
        }

        let runtime = start.elapsed().as_secs_f64();
        let status = if interrupted {
            SolveStatus::TimeLimit
        } else if incumbent.is_some() {
            SolveStatus::Optimal
        } else if hit_cutoff {
            SolveStatus::Cutoff
        } else {
            SolveStatus::Infeasible
        };

        let Some((best, values)) = incumbent else {
            return Solution::empty(status, runtime, node_count);
        };
        let mip_gap = if interrupted {
            let open = stack
                .iter()
                .map(|d| model.objective_bound(d))
                .fold(best, f64::min);
            relative_gap(best, open)
        } else {
            0.0
        };

        Solution {
            status,
            objective: Some(model.obj_sign * best),
            values: values.into_iter().map(|v| v as f64).collect(),
            runtime,
            node_count,
            mip_gap,
        }
    }
}

/// `|best − bound| / |best|`
fn relative_gap(best: f64, bound: f64) -> f64 {
    let diff = (best - bound).abs();
    if diff <= FEASIBILITY_TOL {
        0.0
    } else if best.abs() <= FEASIBILITY_TOL {
        f64::INFINITY
    } else {
        diff / best.abs()
    }
}

impl MipSolver for BranchAndBound {
    fn name(&self) -> &str {
        "branch_and_bound"
    }

    fn solve(&self, model: &Model, params: &SolveParams) -> QcutResult<Solution> {
        let start = Instant::now();
        let (compiled, mut root) = Compiled::new(model)?;
        log::debug!(
            "{}: {} vars, {} rows, limit {:?}",
            model.name(),
            model.num_vars(),
            compiled.rows.len(),
            params.time_limit
        );

        let all_rows = 0..compiled.rows.len();
        if !root.is_consistent() || !compiled.propagate(&mut root, all_rows) {
            log::debug!("{}: infeasible at root", model.name());
            return Ok(Solution::empty(
                SolveStatus::Infeasible,
                start.elapsed().as_secs_f64(),
                0,
            ));
        }

        let solution = self.search(&compiled, root, params, start);
        log::debug!("{}: {}", model.name(), solution);
        Ok(solution)
    }
}

// ============================================================================
// Tests
// ============================================================================
