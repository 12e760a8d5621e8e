//! Builders of simple example grids

use crate::grid::{CellGrid, CellGridBuilder};
use crate::types::{RealScalar, ReferenceCellType};

/// Create a grid of the unit cube split into `n[0]` by `n[1]` by `n[2]`
/// hexahedra
pub fn unit_cube_hexahedra<T: RealScalar>(n: [usize; 3]) -> CellGrid<T> {
    assert!(n.iter().all(|d| *d > 0));
    let mut b = CellGridBuilder::new(3);
    for k in 0..=n[2] {
        for j in 0..=n[1] {
            for i in 0..=n[0] {
                b.add_point(&[
                    T::from(i).unwrap() / T::from(n[0]).unwrap(),
                    T::from(j).unwrap() / T::from(n[1]).unwrap(),
                    T::from(k).unwrap() / T::from(n[2]).unwrap(),
                ]);
            }
        }
    }
    let point = |i: usize, j: usize, k: usize| i + (n[0] + 1) * (j + (n[1] + 1) * k);
    for k in 0..n[2] {
        for j in 0..n[1] {
            for i in 0..n[0] {
                b.add_cell(
                    ReferenceCellType::Hexahedron,
                    &[
                        point(i, j, k),
                        point(i + 1, j, k),
                        point(i + 1, j + 1, k),
                        point(i, j + 1, k),
                        point(i, j, k + 1),
                        point(i + 1, j, k + 1),
                        point(i + 1, j + 1, k + 1),
                        point(i, j + 1, k + 1),
                    ],
                );
            }
        }
    }
    b.create_grid().unwrap()
}

/// Create a grid of the unit square split into `2 * n[0] * n[1]` triangles
///
/// The points carry a zero third coordinate, so the cells are surface cells
/// in 3D space.
pub fn unit_square_triangles<T: RealScalar>(n: [usize; 2]) -> CellGrid<T> {
    assert!(n.iter().all(|d| *d > 0));
    let mut b = CellGridBuilder::new(2);
    for j in 0..=n[1] {
        for i in 0..=n[0] {
            b.add_point(&[
                T::from(i).unwrap() / T::from(n[0]).unwrap(),
                T::from(j).unwrap() / T::from(n[1]).unwrap(),
            ]);
        }
    }
    let point = |i: usize, j: usize| i + (n[0] + 1) * j;
    for j in 0..n[1] {
        for i in 0..n[0] {
            b.add_cell(
                ReferenceCellType::Triangle,
                &[point(i, j), point(i + 1, j), point(i + 1, j + 1)],
            );
            b.add_cell(
                ReferenceCellType::Triangle,
                &[point(i, j), point(i + 1, j + 1), point(i, j + 1)],
            );
        }
    }
    b.create_grid().unwrap()
}
