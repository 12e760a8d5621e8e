//! Spatial search over the query points
//!
//! Classification tests every cell against only the input points near it. A
//! [`PointLocator`] bins the input points into a uniform grid over their
//! bounding box so that a radius query touches a handful of bins instead of
//! the whole point set.

use crate::types::RealScalar;

/// A uniform-bin locator over a fixed set of points
pub struct PointLocator<T: RealScalar> {
    points: Vec<T>,
    bounds_min: [T; 3],
    bin_width: [T; 3],
    divisions: [usize; 3],
    bins: Vec<Vec<usize>>,
}

impl<T: RealScalar> PointLocator<T> {
    /// Bin a flat slice with three coordinates per point
    pub fn new(points: &[T]) -> Self {
        assert_eq!(points.len() % 3, 0);
        let npoints = points.len() / 3;
        let zero = T::from(0.0).unwrap();
        let one = T::from(1.0).unwrap();

        let mut bounds_min = [zero; 3];
        let mut bounds_max = [zero; 3];
        if npoints > 0 {
            for d in 0..3 {
                bounds_min[d] = points[d];
                bounds_max[d] = points[d];
            }
            for p in 1..npoints {
                for d in 0..3 {
                    let x = points[p * 3 + d];
                    bounds_min[d] = bounds_min[d].min(x);
                    bounds_max[d] = bounds_max[d].max(x);
                }
            }
        }

        // Roughly four points per bin on average
        let per_axis = ((npoints as f64 / 4.0).cbrt().ceil() as usize).max(1);
        let divisions = [per_axis; 3];

        let mut bin_width = [one; 3];
        for d in 0..3 {
            let extent = bounds_max[d] - bounds_min[d];
            bin_width[d] = if extent > zero {
                extent / T::from(divisions[d]).unwrap()
            } else {
                // Degenerate extent, every point lands in bin 0 of this axis
                one
            };
        }

        let mut locator = Self {
            points: points.to_vec(),
            bounds_min,
            bin_width,
            divisions,
            bins: vec![vec![]; divisions[0] * divisions[1] * divisions[2]],
        };
        for p in 0..npoints {
            let ijk = locator.bin_of(&locator.point(p));
            let b = locator.bin_index(ijk);
            locator.bins[b].push(p);
        }
        locator
    }

    /// The number of points held
    pub fn point_count(&self) -> usize {
        self.points.len() / 3
    }

    /// The coordinates of one point
    pub fn point(&self, index: usize) -> [T; 3] {
        [
            self.points[index * 3],
            self.points[index * 3 + 1],
            self.points[index * 3 + 2],
        ]
    }

    fn bin_index(&self, ijk: [usize; 3]) -> usize {
        (ijk[2] * self.divisions[1] + ijk[1]) * self.divisions[0] + ijk[0]
    }

    fn bin_of(&self, point: &[T; 3]) -> [usize; 3] {
        let mut ijk = [0; 3];
        for d in 0..3 {
            let offset = (point[d] - self.bounds_min[d]) / self.bin_width[d];
            let i = if offset > T::from(0.0).unwrap() {
                offset.floor().to_usize().unwrap_or(0)
            } else {
                0
            };
            ijk[d] = i.min(self.divisions[d] - 1);
        }
        ijk
    }

    /// Indices of all points within `radius` of `centre`, ascending
    ///
    /// Points exactly at distance `radius` are included.
    pub fn find_points_within_radius(&self, radius: T, centre: &[T; 3]) -> Vec<usize> {
        if self.points.is_empty() || radius < T::from(0.0).unwrap() {
            return vec![];
        }
        let lo = self.bin_of(&[centre[0] - radius, centre[1] - radius, centre[2] - radius]);
        let hi = self.bin_of(&[centre[0] + radius, centre[1] + radius, centre[2] + radius]);
        let r2 = radius * radius;

        let mut found = vec![];
        for k in lo[2]..=hi[2] {
            for j in lo[1]..=hi[1] {
                for i in lo[0]..=hi[0] {
                    for p in &self.bins[self.bin_index([i, j, k])] {
                        let x = self.point(*p);
                        let mut d2 = T::from(0.0).unwrap();
                        for d in 0..3 {
                            let diff = x[d] - centre[d];
                            d2 += diff * diff;
                        }
                        if d2 <= r2 {
                            found.push(*p);
                        }
                    }
                }
            }
        }
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn brute_force(points: &[f64], radius: f64, centre: &[f64; 3]) -> Vec<usize> {
        (0..points.len() / 3)
            .filter(|p| {
                let d2 = (0..3)
                    .map(|d| (points[p * 3 + d] - centre[d]).powi(2))
                    .sum::<f64>();
                d2 <= radius * radius
            })
            .collect()
    }

    #[test]
    fn test_radius_query_matches_brute_force() {
        // Deterministic scattered points in the unit cube
        let mut points = vec![];
        let mut x = 0.5_f64;
        for _ in 0..300 {
            x = (x * 997.0 + 0.123).fract();
            points.push(x);
        }
        let locator = PointLocator::new(&points);
        assert_eq!(locator.point_count(), 100);

        for (radius, centre) in [
            (0.25, [0.5, 0.5, 0.5]),
            (0.1, [0.0, 0.0, 0.0]),
            (2.0, [0.5, 0.5, 0.5]),
            (0.0, [0.5, 0.5, 0.5]),
        ] {
            assert_eq!(
                locator.find_points_within_radius(radius, &centre),
                brute_force(&points, radius, &centre)
            );
        }
    }

    #[test]
    fn test_boundary_point_is_included() {
        let points = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let locator = PointLocator::new(&points);
        assert_eq!(
            locator.find_points_within_radius(1.0, &[0.0, 0.0, 0.0]),
            vec![0, 1]
        );
        assert_eq!(
            locator.find_points_within_radius(0.5, &[0.0, 0.0, 0.0]),
            vec![0]
        );
    }

    #[test]
    fn test_degenerate_extents() {
        // Collinear points exercise zero-extent axes
        let points = [0.0, 2.0, 3.0, 1.0, 2.0, 3.0, 2.0, 2.0, 3.0];
        let locator = PointLocator::new(&points);
        assert_eq!(
            locator.find_points_within_radius(1.5, &[1.0, 2.0, 3.0]),
            vec![0, 1, 2]
        );

        let empty = PointLocator::<f64>::new(&[]);
        assert!(empty
            .find_points_within_radius(10.0, &[0.0, 0.0, 0.0])
            .is_empty());
    }
}
