//! Reconstruction cost estimate
//!
//! Gantree: L3_Search → CostEstimator
//!
//! Ranking signal for candidate cuts. Subcircuits are folded in from the
//! fewest effective qubits upward; every fold pays the size of the running
//! Kronecker product, and every cut multiplies the total by four.

/// Estimate the classical reconstruction cost
///
/// `rho`, `o` and `d` hold one entry per subcircuit. Effective qubits are
/// `d - o`; subcircuits are ordered by effective qubits, ties by index.
///
/// Costs past the `f64` range saturate at `f64::MAX`, so a finite estimate
/// always beats the searcher's initial infinite bound.
/// Gantree: cost_estimate(rho, o, d) -> f64 // 재구성 비용
pub fn cost_estimate(rho: &[usize], o: &[usize], d: &[usize]) -> f64 {
    let num_cuts: usize = rho.iter().sum();

    let mut order: Vec<(usize, usize)> = d
        .iter()
        .zip(o)
        .map(|(&d, &o)| d.saturating_sub(o))
        .enumerate()
        .map(|(index, effective)| (effective, index))
        .collect();
    order.sort_unstable();

    let mut accumulated = 1.0;
    let mut cost = 0.0;
    for (position, &(effective, _)) in order.iter().enumerate() {
        accumulated = saturate(accumulated * pow(2.0, effective));
        if position > 0 {
            cost = saturate(cost + accumulated);
        }
    }

    if cost == 0.0 {
        return 0.0;
    }
    saturate(cost * pow(4.0, num_cuts))
}

fn pow(base: f64, exponent: usize) -> f64 {
    base.powi(i32::try_from(exponent).unwrap_or(i32::MAX))
}

fn saturate(value: f64) -> f64 {
    value.min(f64::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_subcircuits_one_cut() {
        // effective = [2, 3] -> 4 * 8 = 32, one cut -> x4
        assert_relative_eq!(cost_estimate(&[0, 1], &[1, 0], &[3, 3]), 128.0);
    }

    #[test]
    fn test_no_cuts() {
        assert_relative_eq!(cost_estimate(&[0, 0], &[0, 0], &[2, 2]), 16.0);
    }

    #[test]
    fn test_single_subcircuit_is_free() {
        assert_relative_eq!(cost_estimate(&[0], &[0], &[5]), 0.0);
    }

    #[test]
    fn test_order_invariance() {
        let a = cost_estimate(&[1, 0, 1], &[0, 2, 0], &[3, 4, 2]);
        let b = cost_estimate(&[1, 1, 0], &[0, 0, 2], &[2, 3, 4]);
        assert_relative_eq!(a, b);
    }

    #[test]
    fn test_folds_cheapest_first() {
        // effective = [1, 2, 3]: 2*4 + 2*4*8 = 72
        assert_relative_eq!(cost_estimate(&[0, 0, 0], &[0, 0, 0], &[3, 1, 2]), 72.0);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let wide = cost_estimate(&[0, 0], &[0, 0], &[2000, 2000]);
        assert!(wide.is_finite());
        assert_eq!(wide, f64::MAX);

        let many_cuts = cost_estimate(&[600, 0], &[0, 600], &[620, 620]);
        assert_eq!(many_cuts, f64::MAX);
        assert!(many_cuts < f64::INFINITY);

        assert_relative_eq!(cost_estimate(&[0], &[0], &[2000]), 0.0);
    }

    #[test]
    fn test_monotone_in_rho() {
        let base = cost_estimate(&[1, 0], &[0, 1], &[3, 3]);
        let more = cost_estimate(&[1, 1], &[0, 1], &[3, 3]);
        assert_relative_eq!(more, base * 4.0);
        assert!(more > base);
    }
}
