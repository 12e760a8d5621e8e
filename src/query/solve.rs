//! Inversion of the cell shape map
//!
//! The shape map sends reference coordinates to world space; classification
//! needs its inverse at each claimed point. A damped-free Newton iteration
//! starting from the reference origin converges in a handful of steps for
//! the mildly distorted cells grids are made of. The linear solve uses a
//! column-pivoted QR factorization so that cells whose Jacobian is rank
//! deficient in world space (surface and line cells embedded in 3D) still
//! invert within their manifold.

use crate::evaluator::AttributeEvaluator;
use crate::reference_cell;
use crate::types::{RealScalar, ReferenceCellType};

/// Newton iterations before the inversion gives up
pub(crate) const MAX_NEWTON_ITERATIONS: usize = 20;

fn idx(row: usize, col: usize) -> usize {
    row * 3 + col
}

// Minimum-norm solution of the 3x3 system `a x = b` with `a` in row-major
// order, via Householder QR with column pivoting. Components in the null
// space of a rank-deficient `a` are set to zero.
pub(crate) fn qr_solve3<T: RealScalar>(a: &[T; 9], b: &[T; 3]) -> [T; 3] {
    let zero = T::from(0.0).unwrap();
    let two = T::from(2.0).unwrap();
    let mut r = *a;
    let mut rhs = *b;
    let mut permutation = [0, 1, 2];

    let scale = a.iter().fold(zero, |m, v| m.max(num::Float::abs(*v)));
    let rank_tol = scale * T::epsilon() * T::from(8.0).unwrap();

    for k in 0..3 {
        // Pivot the remaining column of largest trailing norm to position k
        let trailing = |col: usize, r: &[T; 9]| {
            (k..3).fold(zero, |s, i| s + r[idx(i, col)] * r[idx(i, col)])
        };
        let mut pivot = k;
        for col in k + 1..3 {
            if trailing(col, &r) > trailing(pivot, &r) {
                pivot = col;
            }
        }
        if pivot != k {
            for row in 0..3 {
                r.swap(idx(row, k), idx(row, pivot));
            }
            permutation.swap(k, pivot);
        }

        let column_norm = num::Float::sqrt(trailing(k, &r));
        if column_norm <= rank_tol {
            // The trailing block is numerically zero, the factorization is done
            break;
        }

        // Householder reflection zeroing column k below the diagonal
        let alpha = if r[idx(k, k)] > zero {
            -column_norm
        } else {
            column_norm
        };
        let mut v = [zero; 3];
        for i in k..3 {
            v[i] = r[idx(i, k)];
        }
        v[k] -= alpha;
        let v_norm2 = (k..3).fold(zero, |s, i| s + v[i] * v[i]);
        if v_norm2 > zero {
            for col in k..3 {
                let proj = (k..3).fold(zero, |s, i| s + v[i] * r[idx(i, col)]);
                for i in k..3 {
                    r[idx(i, col)] -= two * proj * v[i] / v_norm2;
                }
            }
            let proj = (k..3).fold(zero, |s, i| s + v[i] * rhs[i]);
            for i in k..3 {
                rhs[i] -= two * proj * v[i] / v_norm2;
            }
        }
        r[idx(k, k)] = alpha;
        for i in k + 1..3 {
            r[idx(i, k)] = zero;
        }
    }

    let mut y = [zero; 3];
    for k in (0..3).rev() {
        if num::Float::abs(r[idx(k, k)]) > rank_tol {
            let mut sum = rhs[k];
            for col in k + 1..3 {
                sum -= r[idx(k, col)] * y[col];
            }
            y[k] = sum / r[idx(k, k)];
        }
    }

    let mut x = [zero; 3];
    for k in 0..3 {
        x[permutation[k]] = y[k];
    }
    x
}

/// Find reference coordinates mapping to `target` under the shape map
///
/// Returns `None` when the iteration fails to converge or converges to a
/// point outside the reference cell.
pub(crate) fn invert_shape_map<T, E>(
    evaluator: &E,
    cell_type: ReferenceCellType,
    cell_index: usize,
    target: &[T; 3],
) -> Option<[T; 3]>
where
    T: RealScalar,
    E: AttributeEvaluator<T = T>,
{
    let zero = T::from(0.0).unwrap();
    let residual_tol = T::from(1e-7).unwrap();
    let domain_tol = T::from(1e-6).unwrap();

    let mut rst = [zero; 3];
    let mut position = [zero; 3];
    let mut jacobian = [zero; 9];
    let mut converged = false;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        evaluator.evaluate(cell_index, &rst, &mut position);
        let residual = [
            position[0] - target[0],
            position[1] - target[1],
            position[2] - target[2],
        ];
        let residual_norm =
            num::Float::sqrt(
                residual[0] * residual[0] + residual[1] * residual[1] + residual[2] * residual[2],
            );
        if residual_norm < residual_tol {
            converged = true;
            break;
        }
        evaluator.evaluate_derivative(cell_index, &rst, &mut jacobian);
        let step = qr_solve3(&jacobian, &residual);
        if step.iter().any(|s| !s.is_finite()) {
            return None;
        }
        for d in 0..3 {
            rst[d] -= step[d];
        }
    }
    if converged && reference_cell::is_inside(cell_type, &rst, domain_tol) {
        Some(rst)
    } else {
        None
    }
}
