//! Point-in-cell classification
//!
//! Each cell claims the input points inside it. A bounding sphere test via
//! the point locator prunes the candidates, then the candidates are tested
//! against the half spaces of the cell's facets in world space. A point on a
//! shared facet is claimed by every adjacent cell.

use crate::locator::PointLocator;
use crate::reference_cell;
use crate::types::{Array2D, RealScalar, ReferenceCellType};
use rlst::{RandomAccessByRef, Shape};

fn sub<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> [T; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> [T; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm<T: RealScalar>(a: &[T; 3]) -> T {
    num::Float::sqrt(dot(a, a))
}

// Signed distance of `point` from the plane through `base` with (unscaled)
// normal `normal`, positive on the side the normal points to. None when the
// facet is degenerate.
fn signed_distance<T: RealScalar>(point: &[T; 3], base: &[T; 3], normal: &[T; 3]) -> Option<T> {
    let length = norm(normal);
    if length <= T::epsilon() {
        return None;
    }
    Some(dot(normal, &sub(point, base)) / length)
}

// Outward plane of a quadrilateral facet whose corners need not be exactly
// coplanar. The first cyclic corner triple whose plane leaves the fourth
// corner on or behind it wins; a warped facet where no triple does falls
// back to the last triple.
fn quad_facet_plane<T: RealScalar>(q: &[[T; 3]; 4]) -> ([T; 3], [T; 3]) {
    let zero = T::from(0.0).unwrap();
    for t in 0..3 {
        let base = q[t];
        let normal = cross(&sub(&q[(t + 1) % 4], &base), &sub(&q[(t + 2) % 4], &base));
        match signed_distance(&q[(t + 3) % 4], &base, &normal) {
            Some(d) if d > zero => continue,
            _ => return (base, normal),
        }
    }
    (q[3], cross(&sub(&q[0], &q[3]), &sub(&q[1], &q[3])))
}

// Does the cell with the given world-space corners contain `point`?
//
// Facets of 2D cells are oriented with the cell's own plane normal; the
// distance out of that plane is deliberately not tested, matching the
// bounding-sphere-limited behaviour of the surface case.
fn contains<T: RealScalar>(
    cell_type: ReferenceCellType,
    corners: &[[T; 3]],
    point: &[T; 3],
    tol: T,
) -> bool {
    let inside = |base: &[T; 3], normal: &[T; 3]| match signed_distance(point, base, normal) {
        Some(d) => d <= tol,
        None => true,
    };
    match reference_cell::dim(cell_type) {
        // The bounding sphere has zero radius, so the candidate coincides
        // with the vertex already
        0 => true,
        1 => {
            let axis = sub(&corners[1], &corners[0]);
            let reversed = [-axis[0], -axis[1], -axis[2]];
            inside(&corners[0], &reversed) && inside(&corners[1], &axis)
        }
        2 => {
            let plane_normal = cross(
                &sub(&corners[1], &corners[0]),
                &sub(&corners[2], &corners[0]),
            );
            for side in reference_cell::facet_sides(cell_type) {
                let edge = reference_cell::side_connectivity(cell_type, side);
                let direction = sub(&corners[edge[1]], &corners[edge[0]]);
                if !inside(&corners[edge[0]], &cross(&direction, &plane_normal)) {
                    return false;
                }
            }
            true
        }
        _ => {
            for side in reference_cell::facet_sides(cell_type) {
                let facet = reference_cell::side_connectivity(cell_type, side);
                let (base, normal) = match facet.len() {
                    3 => (
                        corners[facet[0]],
                        cross(
                            &sub(&corners[facet[1]], &corners[facet[0]]),
                            &sub(&corners[facet[2]], &corners[facet[0]]),
                        ),
                    ),
                    _ => quad_facet_plane(&[
                        corners[facet[0]],
                        corners[facet[1]],
                        corners[facet[2]],
                        corners[facet[3]],
                    ]),
                };
                if !inside(&base, &normal) {
                    return false;
                }
            }
            true
        }
    }
}

/// Claim input points for every cell of one type
///
/// Returns (cell, point) pairs ordered by cell, then by ascending point
/// index within a cell.
pub(crate) fn classify_points<T: RealScalar>(
    cell_type: ReferenceCellType,
    connectivity: &Array2D<usize>,
    coordinates: &Array2D<T>,
    locator: &PointLocator<T>,
) -> Vec<(usize, usize)> {
    let zero = T::from(0.0).unwrap();
    let ncorners = reference_cell::corner_count(cell_type);
    let inv_corners = T::from(1.0).unwrap() / T::from(ncorners).unwrap();

    let mut pairs = vec![];
    let mut corners = vec![[zero; 3]; ncorners];
    for cell in 0..connectivity.shape()[0] {
        let mut centroid = [zero; 3];
        for (i, corner) in corners.iter_mut().enumerate() {
            let p = *connectivity.get([cell, i]).unwrap();
            for d in 0..3 {
                corner[d] = *coordinates.get([p, d]).unwrap();
                centroid[d] += corner[d] * inv_corners;
            }
        }
        let radius = corners
            .iter()
            .map(|c| norm(&sub(c, &centroid)))
            .fold(zero, |m, d| m.max(d));
        let tol = radius * num::Float::sqrt(T::epsilon());

        for point in locator.find_points_within_radius(radius, &centroid) {
            if contains(cell_type, &corners, &locator.point(point), tol) {
                pairs.push((cell, point));
            }
        }
    }
    pairs
}
