//! Reference cell definitions
//!
//! Corner parameters and side tables for the supported cell shapes. Sides are
//! listed in order of strictly decreasing dimension (faces, then edges, then
//! vertices) and each side's corners are wound so that the cross product of
//! two of its edges points out of the cell.

use crate::types::{RealScalar, ReferenceCellType};
use std::ops::Range;

/// The parametric dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Vertex => 0,
        ReferenceCellType::Edge => 1,
        ReferenceCellType::Triangle => 2,
        ReferenceCellType::Quadrilateral => 2,
        ReferenceCellType::Tetrahedron => 3,
        ReferenceCellType::Hexahedron => 3,
        ReferenceCellType::Wedge => 3,
        ReferenceCellType::Pyramid => 3,
    }
}

/// The number of corners of the cell
pub fn corner_count(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Vertex => 1,
        ReferenceCellType::Edge => 2,
        ReferenceCellType::Triangle => 3,
        ReferenceCellType::Quadrilateral => 4,
        ReferenceCellType::Tetrahedron => 4,
        ReferenceCellType::Hexahedron => 8,
        ReferenceCellType::Wedge => 6,
        ReferenceCellType::Pyramid => 5,
    }
}

/// The parametric coordinates of the cell's corners
///
/// Coordinates are always 3-tuples; components beyond the cell's dimension
/// are zero. Tensor-product shapes (and the wedge axis and the pyramid) use
/// the `[-1, 1]` convention, simplices use `[0, 1]`.
pub fn corners<T: RealScalar>(cell: ReferenceCellType) -> Vec<[T; 3]> {
    let zero = T::zero();
    let one = T::one();
    let mone = -one;
    match cell {
        ReferenceCellType::Vertex => vec![[zero, zero, zero]],
        ReferenceCellType::Edge => vec![[mone, zero, zero], [one, zero, zero]],
        ReferenceCellType::Triangle => vec![
            [zero, zero, zero],
            [one, zero, zero],
            [zero, one, zero],
        ],
        ReferenceCellType::Quadrilateral => vec![
            [mone, mone, zero],
            [one, mone, zero],
            [one, one, zero],
            [mone, one, zero],
        ],
        ReferenceCellType::Tetrahedron => vec![
            [zero, zero, zero],
            [one, zero, zero],
            [zero, one, zero],
            [zero, zero, one],
        ],
        ReferenceCellType::Hexahedron => vec![
            [mone, mone, mone],
            [one, mone, mone],
            [one, one, mone],
            [mone, one, mone],
            [mone, mone, one],
            [one, mone, one],
            [one, one, one],
            [mone, one, one],
        ],
        ReferenceCellType::Wedge => vec![
            [zero, zero, mone],
            [one, zero, mone],
            [zero, one, mone],
            [zero, zero, one],
            [one, zero, one],
            [zero, one, one],
        ],
        ReferenceCellType::Pyramid => vec![
            [mone, mone, mone],
            [one, mone, mone],
            [one, one, mone],
            [mone, one, mone],
            [zero, zero, one],
        ],
    }
}

/// The parametric coordinates of one corner
///
/// Returns the zero tuple for an out-of-range corner index.
pub fn corner_parameter<T: RealScalar>(cell: ReferenceCellType, corner: usize) -> [T; 3] {
    let c = corners::<T>(cell);
    if corner < c.len() {
        c[corner]
    } else {
        [T::zero(); 3]
    }
}

/// The corners of every proper side of the cell
///
/// Sides are ordered by decreasing dimension. For shapes with two kinds of
/// facet (wedge, pyramid) the quadrilateral facets come first.
pub fn side_connectivities(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Vertex => vec![],
        ReferenceCellType::Edge => vec![vec![0], vec![1]],
        ReferenceCellType::Triangle => vec![
            vec![0, 1],
            vec![1, 2],
            vec![2, 0],
            vec![0],
            vec![1],
            vec![2],
        ],
        ReferenceCellType::Quadrilateral => vec![
            vec![0, 1],
            vec![1, 2],
            vec![2, 3],
            vec![3, 0],
            vec![0],
            vec![1],
            vec![2],
            vec![3],
        ],
        ReferenceCellType::Tetrahedron => vec![
            vec![0, 1, 3],
            vec![1, 2, 3],
            vec![2, 0, 3],
            vec![0, 2, 1],
            vec![0, 1],
            vec![1, 2],
            vec![2, 0],
            vec![0, 3],
            vec![1, 3],
            vec![2, 3],
            vec![0],
            vec![1],
            vec![2],
            vec![3],
        ],
        ReferenceCellType::Hexahedron => vec![
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
            vec![0, 1, 5, 4],
            vec![3, 7, 6, 2],
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1],
            vec![1, 2],
            vec![3, 2],
            vec![0, 3],
            vec![4, 5],
            vec![5, 6],
            vec![7, 6],
            vec![4, 7],
            vec![0, 4],
            vec![1, 5],
            vec![3, 7],
            vec![2, 6],
            vec![0],
            vec![1],
            vec![2],
            vec![3],
            vec![4],
            vec![5],
            vec![6],
            vec![7],
        ],
        ReferenceCellType::Wedge => vec![
            vec![0, 1, 4, 3],
            vec![1, 2, 5, 4],
            vec![2, 0, 3, 5],
            vec![0, 2, 1],
            vec![3, 4, 5],
            vec![0, 1],
            vec![1, 2],
            vec![2, 0],
            vec![3, 4],
            vec![4, 5],
            vec![5, 3],
            vec![0, 3],
            vec![1, 4],
            vec![2, 5],
            vec![0],
            vec![1],
            vec![2],
            vec![3],
            vec![4],
            vec![5],
        ],
        ReferenceCellType::Pyramid => vec![
            vec![0, 3, 2, 1],
            vec![0, 1, 4],
            vec![1, 2, 4],
            vec![2, 3, 4],
            vec![3, 0, 4],
            vec![0, 1],
            vec![1, 2],
            vec![2, 3],
            vec![3, 0],
            vec![0, 4],
            vec![1, 4],
            vec![2, 4],
            vec![3, 4],
            vec![0],
            vec![1],
            vec![2],
            vec![3],
            vec![4],
        ],
    }
}

/// The side groups of the cell: shape and half-open range into the side list
pub fn side_types(cell: ReferenceCellType) -> Vec<(ReferenceCellType, Range<usize>)> {
    match cell {
        ReferenceCellType::Vertex => vec![],
        ReferenceCellType::Edge => vec![(ReferenceCellType::Vertex, 0..2)],
        ReferenceCellType::Triangle => vec![
            (ReferenceCellType::Edge, 0..3),
            (ReferenceCellType::Vertex, 3..6),
        ],
        ReferenceCellType::Quadrilateral => vec![
            (ReferenceCellType::Edge, 0..4),
            (ReferenceCellType::Vertex, 4..8),
        ],
        ReferenceCellType::Tetrahedron => vec![
            (ReferenceCellType::Triangle, 0..4),
            (ReferenceCellType::Edge, 4..10),
            (ReferenceCellType::Vertex, 10..14),
        ],
        ReferenceCellType::Hexahedron => vec![
            (ReferenceCellType::Quadrilateral, 0..6),
            (ReferenceCellType::Edge, 6..18),
            (ReferenceCellType::Vertex, 18..26),
        ],
        ReferenceCellType::Wedge => vec![
            (ReferenceCellType::Quadrilateral, 0..3),
            (ReferenceCellType::Triangle, 3..5),
            (ReferenceCellType::Edge, 5..14),
            (ReferenceCellType::Vertex, 14..20),
        ],
        ReferenceCellType::Pyramid => vec![
            (ReferenceCellType::Quadrilateral, 0..1),
            (ReferenceCellType::Triangle, 1..5),
            (ReferenceCellType::Edge, 5..13),
            (ReferenceCellType::Vertex, 13..18),
        ],
    }
}

/// The number of proper sides of the cell
pub fn side_count(cell: ReferenceCellType) -> usize {
    side_types(cell).last().map_or(0, |(_, r)| r.end)
}

/// The number of side groups of the cell
pub fn side_type_count(cell: ReferenceCellType) -> usize {
    side_types(cell).len()
}

/// The half-open range of side indices belonging to one side group
///
/// A negative group index selects the union of all proper sides.
pub fn side_range(cell: ReferenceCellType, side_type: isize) -> Range<usize> {
    if side_type < 0 {
        return 0..side_count(cell);
    }
    let types = side_types(cell);
    if (side_type as usize) < types.len() {
        types[side_type as usize].1.clone()
    } else {
        let n = side_count(cell);
        n..n
    }
}

/// The corners of one side, empty for an out-of-range side index
pub fn side_connectivity(cell: ReferenceCellType, side: usize) -> Vec<usize> {
    let mut sides = side_connectivities(cell);
    if side < sides.len() {
        sides.swap_remove(side)
    } else {
        vec![]
    }
}

/// The shape of one side
pub fn side_shape(cell: ReferenceCellType, side: usize) -> Option<ReferenceCellType> {
    side_types(cell)
        .iter()
        .find(|(_, r)| r.contains(&side))
        .map(|(s, _)| *s)
}

/// The number of sides of the given dimension
pub fn side_count_of_dimension(cell: ReferenceCellType, d: usize) -> usize {
    side_types(cell)
        .iter()
        .filter(|(s, _)| dim(*s) == d)
        .map(|(_, r)| r.len())
        .sum()
}

/// The side indices of the cell's facets (sides of dimension one below the
/// cell's own)
pub fn facet_sides(cell: ReferenceCellType) -> Vec<usize> {
    if dim(cell) == 0 {
        return vec![];
    }
    let d = dim(cell) - 1;
    side_types(cell)
        .iter()
        .filter(|(s, _)| dim(*s) == d)
        .flat_map(|(_, r)| r.clone())
        .collect()
}

/// Is a parametric coordinate inside the cell's reference domain?
///
/// The pyramid's reference domain is the full cube: its collapsed-corner
/// basis maps the cube onto the pyramid, so parametric coordinates of points
/// inside the solid stay inside the cube.
pub fn is_inside<T: RealScalar>(cell: ReferenceCellType, rst: &[T; 3], tol: T) -> bool {
    let zero = T::zero();
    let one = T::one();
    let in_unit = |a: T| a >= zero - tol && a <= one + tol;
    let in_sym = |a: T| a >= -one - tol && a <= one + tol;
    match cell {
        ReferenceCellType::Vertex => rst.iter().all(|&a| num::Float::abs(a) <= tol),
        ReferenceCellType::Edge => in_sym(rst[0]),
        ReferenceCellType::Triangle => {
            in_unit(rst[0]) && in_unit(rst[1]) && rst[0] + rst[1] <= one + tol
        }
        ReferenceCellType::Quadrilateral => in_sym(rst[0]) && in_sym(rst[1]),
        ReferenceCellType::Tetrahedron => {
            in_unit(rst[0])
                && in_unit(rst[1])
                && in_unit(rst[2])
                && rst[0] + rst[1] + rst[2] <= one + tol
        }
        ReferenceCellType::Hexahedron => in_sym(rst[0]) && in_sym(rst[1]) && in_sym(rst[2]),
        ReferenceCellType::Wedge => {
            in_unit(rst[0]) && in_unit(rst[1]) && rst[0] + rst[1] <= one + tol && in_sym(rst[2])
        }
        ReferenceCellType::Pyramid => in_sym(rst[0]) && in_sym(rst[1]) && in_sym(rst[2]),
    }
}
