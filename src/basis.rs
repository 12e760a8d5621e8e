//! Basis function tabulation
//!
//! Analytic values and parametric gradients for the basis sets the evaluator
//! dispatches over. The closed-form basis counts cover every function space
//! the layout resolver accepts; tabulation itself is implemented for the
//! constant, linear and complete quadratic nodal sets.

use crate::reference_cell;
use crate::types::{FunctionSpace, IntegrationScheme, RealScalar, ReferenceCellType};

/// Quadratic node orderings: 1D node indices per basis function, where index
/// 0 is the `-1` end, 1 the `+1` end and 2 the midpoint. Corners come first,
/// then edge midpoints in side order, then face centres, then the centre.
const QUAD9_NODES: [[usize; 2]; 9] = [
    [0, 0],
    [1, 0],
    [1, 1],
    [0, 1],
    [2, 0],
    [1, 2],
    [2, 1],
    [0, 2],
    [2, 2],
];

const HEX27_NODES: [[usize; 3]; 27] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
    [2, 0, 0],
    [1, 2, 0],
    [2, 1, 0],
    [0, 2, 0],
    [2, 0, 1],
    [1, 2, 1],
    [2, 1, 1],
    [0, 2, 1],
    [0, 0, 2],
    [1, 0, 2],
    [0, 1, 2],
    [1, 1, 2],
    [0, 2, 2],
    [1, 2, 2],
    [2, 0, 2],
    [2, 1, 2],
    [2, 2, 0],
    [2, 2, 1],
    [2, 2, 2],
];

/// The number of basis functions of a basis, or `None` when the combination
/// cannot be sized
pub fn basis_count(
    cell: ReferenceCellType,
    space: FunctionSpace,
    scheme: IntegrationScheme,
    order: usize,
) -> Option<usize> {
    match space {
        FunctionSpace::Constant => Some(1),
        FunctionSpace::HGrad => {
            if order == 0 {
                return Some(1);
            }
            match cell {
                ReferenceCellType::Vertex => Some(1),
                ReferenceCellType::Edge => Some(order + 1),
                ReferenceCellType::Triangle => Some((order + 1) * (order + 2) / 2),
                ReferenceCellType::Quadrilateral => match scheme {
                    IntegrationScheme::Complete => Some((order + 1) * (order + 1)),
                    IntegrationScheme::Incomplete => Some(4 + 4 * (order - 1)),
                },
                ReferenceCellType::Tetrahedron => {
                    Some((order + 1) * (order + 2) * (order + 3) / 6)
                }
                ReferenceCellType::Hexahedron => match scheme {
                    IntegrationScheme::Complete => Some((order + 1).pow(3)),
                    IntegrationScheme::Incomplete => Some(8 + 12 * (order - 1)),
                },
                ReferenceCellType::Wedge => match scheme {
                    IntegrationScheme::Complete => Some((order + 1) * (order + 1) * (order + 2) / 2),
                    IntegrationScheme::Incomplete => None,
                },
                ReferenceCellType::Pyramid => match order {
                    1 => Some(5),
                    _ => None,
                },
            }
        }
        // lowest-order face and edge elements; higher orders are not sized
        FunctionSpace::HDiv => {
            if order == 1 && reference_cell::dim(cell) >= 2 {
                Some(reference_cell::facet_sides(cell).len())
            } else {
                None
            }
        }
        FunctionSpace::HCurl => {
            if order == 1 && reference_cell::dim(cell) >= 2 {
                Some(reference_cell::side_count_of_dimension(cell, 1))
            } else {
                None
            }
        }
    }
}

/// The number of values each basis function takes at a point
pub fn basis_value_size(space: FunctionSpace) -> usize {
    match space {
        FunctionSpace::HGrad | FunctionSpace::Constant => 1,
        FunctionSpace::HDiv | FunctionSpace::HCurl => 3,
    }
}

/// Can [`tabulate`] and [`tabulate_gradient`] handle this combination?
pub fn is_implemented(
    cell: ReferenceCellType,
    space: FunctionSpace,
    scheme: IntegrationScheme,
    order: usize,
) -> bool {
    match space {
        FunctionSpace::Constant => true,
        FunctionSpace::HGrad => match order {
            0 | 1 => true,
            2 => {
                scheme == IntegrationScheme::Complete
                    && matches!(
                        cell,
                        ReferenceCellType::Edge
                            | ReferenceCellType::Triangle
                            | ReferenceCellType::Quadrilateral
                            | ReferenceCellType::Tetrahedron
                            | ReferenceCellType::Hexahedron
                    )
            }
            _ => false,
        },
        FunctionSpace::HDiv | FunctionSpace::HCurl => false,
    }
}

/// Linear Lagrange factor on `[-1, 1]`: value and derivative
fn lag1<T: RealScalar>(node: usize, x: T) -> (T, T) {
    let half = T::from(0.5).unwrap();
    match node {
        0 => ((T::one() - x) * half, -half),
        _ => ((T::one() + x) * half, half),
    }
}

/// Quadratic Lagrange factor on `[-1, 1]` with nodes `-1`, `+1`, `0`
fn lag2<T: RealScalar>(node: usize, x: T) -> (T, T) {
    let half = T::from(0.5).unwrap();
    let two = T::from(2.0).unwrap();
    match node {
        0 => (x * (x - T::one()) * half, x - half),
        1 => (x * (x + T::one()) * half, x + half),
        _ => (T::one() - x * x, -two * x),
    }
}

/// Tabulate the basis values at a parametric coordinate
///
/// `values` must hold [`basis_count`] entries times [`basis_value_size`].
/// Panics for combinations [`is_implemented`] rejects.
pub fn tabulate<T: RealScalar>(
    cell: ReferenceCellType,
    space: FunctionSpace,
    scheme: IntegrationScheme,
    order: usize,
    rst: &[T; 3],
    values: &mut [T],
) {
    let mut grads: [T; 0] = [];
    tabulate_impl(cell, space, scheme, order, rst, values, &mut grads, false);
}

/// Tabulate the parametric gradients of the basis at a coordinate
///
/// `grads` must hold [`basis_count`] times 3 entries, laid out with the three
/// parametric derivatives of each basis function contiguous.
pub fn tabulate_gradient<T: RealScalar>(
    cell: ReferenceCellType,
    space: FunctionSpace,
    scheme: IntegrationScheme,
    order: usize,
    rst: &[T; 3],
    grads: &mut [T],
) {
    let mut values = vec![T::zero(); grads.len() / 3];
    tabulate_impl(cell, space, scheme, order, rst, &mut values, grads, true);
}

#[allow(clippy::too_many_arguments)]
fn tabulate_impl<T: RealScalar>(
    cell: ReferenceCellType,
    space: FunctionSpace,
    scheme: IntegrationScheme,
    order: usize,
    rst: &[T; 3],
    values: &mut [T],
    grads: &mut [T],
    with_grads: bool,
) {
    let zero = T::zero();
    let one = T::one();
    let [r, s, t] = *rst;

    if !is_implemented(cell, space, scheme, order) {
        panic!("no tabulation for {space} order {order} on {cell}");
    }

    if space == FunctionSpace::Constant || order == 0 {
        values[0] = one;
        if with_grads {
            grads[..3].fill(zero);
        }
        return;
    }

    // writes one nodal value and its gradient
    let set = |i: usize, v: T, g: [T; 3], values: &mut [T], grads: &mut [T]| {
        values[i] = v;
        if with_grads {
            grads[3 * i..3 * i + 3].copy_from_slice(&g);
        }
    };

    match (cell, order) {
        (ReferenceCellType::Vertex, _) => {
            set(0, one, [zero; 3], values, grads);
        }
        (ReferenceCellType::Edge, 1) => {
            for (i, node) in [0, 1].iter().enumerate() {
                let (v, d) = lag1(*node, r);
                set(i, v, [d, zero, zero], values, grads);
            }
        }
        (ReferenceCellType::Edge, 2) => {
            for node in 0..3 {
                let (v, d) = lag2(node, r);
                set(node, v, [d, zero, zero], values, grads);
            }
        }
        (ReferenceCellType::Triangle, 1) => {
            set(0, one - r - s, [-one, -one, zero], values, grads);
            set(1, r, [one, zero, zero], values, grads);
            set(2, s, [zero, one, zero], values, grads);
        }
        (ReferenceCellType::Triangle, 2) => {
            let two = T::from(2.0).unwrap();
            let four = T::from(4.0).unwrap();
            let l = one - r - s;
            set(
                0,
                l * (two * l - one),
                [one - four * l, one - four * l, zero],
                values,
                grads,
            );
            set(1, r * (two * r - one), [four * r - one, zero, zero], values, grads);
            set(2, s * (two * s - one), [zero, four * s - one, zero], values, grads);
            set(3, four * l * r, [four * (l - r), -four * r, zero], values, grads);
            set(4, four * r * s, [four * s, four * r, zero], values, grads);
            set(5, four * l * s, [-four * s, four * (l - s), zero], values, grads);
        }
        (ReferenceCellType::Quadrilateral, 1) => {
            for (i, node) in QUAD9_NODES.iter().take(4).enumerate() {
                let (vr, dr) = lag1(node[0], r);
                let (vs, ds) = lag1(node[1], s);
                set(i, vr * vs, [dr * vs, vr * ds, zero], values, grads);
            }
        }
        (ReferenceCellType::Quadrilateral, 2) => {
            for (i, node) in QUAD9_NODES.iter().enumerate() {
                let (vr, dr) = lag2(node[0], r);
                let (vs, ds) = lag2(node[1], s);
                set(i, vr * vs, [dr * vs, vr * ds, zero], values, grads);
            }
        }
        (ReferenceCellType::Tetrahedron, 1) => {
            set(0, one - r - s - t, [-one, -one, -one], values, grads);
            set(1, r, [one, zero, zero], values, grads);
            set(2, s, [zero, one, zero], values, grads);
            set(3, t, [zero, zero, one], values, grads);
        }
        (ReferenceCellType::Tetrahedron, 2) => {
            let two = T::from(2.0).unwrap();
            let four = T::from(4.0).unwrap();
            let l = one - r - s - t;
            set(
                0,
                l * (two * l - one),
                [one - four * l, one - four * l, one - four * l],
                values,
                grads,
            );
            set(1, r * (two * r - one), [four * r - one, zero, zero], values, grads);
            set(2, s * (two * s - one), [zero, four * s - one, zero], values, grads);
            set(3, t * (two * t - one), [zero, zero, four * t - one], values, grads);
            set(4, four * l * r, [four * (l - r), -four * r, -four * r], values, grads);
            set(5, four * r * s, [four * s, four * r, zero], values, grads);
            set(6, four * l * s, [-four * s, four * (l - s), -four * s], values, grads);
            set(7, four * l * t, [-four * t, -four * t, four * (l - t)], values, grads);
            set(8, four * r * t, [four * t, zero, four * r], values, grads);
            set(9, four * s * t, [zero, four * t, four * s], values, grads);
        }
        (ReferenceCellType::Hexahedron, 1) => {
            for (i, node) in HEX27_NODES.iter().take(8).enumerate() {
                let (vr, dr) = lag1(node[0], r);
                let (vs, ds) = lag1(node[1], s);
                let (vt, dt) = lag1(node[2], t);
                set(
                    i,
                    vr * vs * vt,
                    [dr * vs * vt, vr * ds * vt, vr * vs * dt],
                    values,
                    grads,
                );
            }
        }
        (ReferenceCellType::Hexahedron, 2) => {
            for (i, node) in HEX27_NODES.iter().enumerate() {
                let (vr, dr) = lag2(node[0], r);
                let (vs, ds) = lag2(node[1], s);
                let (vt, dt) = lag2(node[2], t);
                set(
                    i,
                    vr * vs * vt,
                    [dr * vs * vt, vr * ds * vt, vr * vs * dt],
                    values,
                    grads,
                );
            }
        }
        (ReferenceCellType::Wedge, 1) => {
            let l = one - r - s;
            for i in 0..6 {
                let (vt, dt) = lag1(i / 3, t);
                let (plane, dr, ds) = match i % 3 {
                    0 => (l, -one, -one),
                    1 => (r, one, zero),
                    _ => (s, zero, one),
                };
                set(
                    i,
                    plane * vt,
                    [dr * vt, ds * vt, plane * dt],
                    values,
                    grads,
                );
            }
        }
        (ReferenceCellType::Pyramid, 1) => {
            let eighth = T::from(0.125).unwrap();
            let half = T::from(0.5).unwrap();
            let mt = one - t;
            for (i, node) in QUAD9_NODES.iter().take(4).enumerate() {
                let sr = if node[0] == 0 { -one } else { one };
                let ss = if node[1] == 0 { -one } else { one };
                let fr = one + sr * r;
                let fs = one + ss * s;
                set(
                    i,
                    fr * fs * mt * eighth,
                    [
                        sr * fs * mt * eighth,
                        fr * ss * mt * eighth,
                        -fr * fs * eighth,
                    ],
                    values,
                    grads,
                );
            }
            set(4, (one + t) * half, [zero, zero, half], values, grads);
        }
        _ => {
            panic!("no tabulation for {space} order {order} on {cell}");
        }
    }
}
