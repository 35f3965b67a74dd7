//! Finite difference Jacobian for derivative-free root finding.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Forward-difference Jacobian of `f` at `x`.
///
/// Column j is `(f(x + h·e_j) - f(x)) / h` with `h = epsilon·max(|x_j|, 1)`.
/// Non-finite entries (from penalty plateaus or overflow) are zeroed so the
/// caller sees a singular matrix instead of NaNs.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let h = epsilon * x[j].abs().max(1.0);
        let mut x_perturbed = x.clone();
        x_perturbed[j] += h;

        let f_perturbed = f(&x_perturbed)?;
        for i in 0..m {
            let d = (f_perturbed[i] - f_x[i]) / h;
            jac[(i, j)] = if d.is_finite() { d } else { 0.0 };
        }
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacobian_linear() {
        // f(x) = 2*x, J = 2
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, 2.0 * x[0]))
        };

        let x = DVector::from_element(1, 3.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn jacobian_two_by_two() {
        // f = (x·y, x + y²), J = [[y, x], [1, 2y]]
        let f = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0] * v[1], v[0] + v[1] * v[1]]))
        };

        let x = DVector::from_vec(vec![2.0, 3.0]);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 3.0).abs() < 1e-5);
        assert!((jac[(0, 1)] - 2.0).abs() < 1e-5);
        assert!((jac[(1, 0)] - 1.0).abs() < 1e-5);
        assert!((jac[(1, 1)] - 6.0).abs() < 1e-5);
    }

    #[test]
    fn non_finite_differences_are_zeroed() {
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            let v = if x[0] > 1.0 { f64::INFINITY } else { x[0] };
            Ok(DVector::from_element(1, v))
        };

        let x = DVector::from_element(1, 1.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();
        assert_eq!(jac[(0, 0)], 0.0);
    }
}
