//! Cell grids
//!
//! A cell grid is an unstructured collection of cells of mixed reference
//! types over a shared point set, together with the attributes defined on
//! it. The geometry itself is an attribute: building a grid synthesizes a
//! shared trilinear "shape" attribute whose value array is the coordinate
//! array and whose connectivity arrays are the per-type corner lists.

use crate::attribute::{CellAttribute, CellTypeInfo, RoleArray, CONNECTIVITY_ROLE, VALUES_ROLE};
use crate::error::{AttributeError, QueryError};
use crate::evaluator::InterpolatedAttribute;
use crate::reference_cell;
use crate::types::{Array2D, RealScalar, ReferenceCellType};
use rlst::{rlst_dynamic_array2, RandomAccessMut, Shape};
use std::collections::HashMap;
use std::rc::Rc;

/// Name of the synthesized geometry attribute
pub const SHAPE_ATTRIBUTE: &str = "shape";

/// An unstructured grid of mixed-type cells with attributes
pub struct CellGrid<T: RealScalar> {
    coordinates: Rc<Array2D<T>>,
    cell_types: Vec<ReferenceCellType>,
    connectivity: HashMap<ReferenceCellType, Rc<Array2D<usize>>>,
    attributes: Vec<CellAttribute<T>>,
}

impl<T: RealScalar> CellGrid<T> {
    /// The grid's points as a `[point count, 3]` array
    pub fn coordinates(&self) -> &Array2D<T> {
        &self.coordinates
    }

    /// The number of points in the grid
    pub fn point_count(&self) -> usize {
        self.coordinates.shape()[0]
    }

    /// The cell types present, in insertion order
    pub fn cell_types(&self) -> &[ReferenceCellType] {
        &self.cell_types
    }

    /// The number of cells of one type
    pub fn cell_count(&self, cell_type: ReferenceCellType) -> usize {
        self.connectivity
            .get(&cell_type)
            .map_or(0, |c| c.shape()[0])
    }

    /// The corner connectivity of one cell type as a
    /// `[cell count, corner count]` array
    pub fn connectivity(&self, cell_type: ReferenceCellType) -> Option<&Array2D<usize>> {
        self.connectivity.get(&cell_type).map(|c| c.as_ref())
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&CellAttribute<T>> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// All attributes, the shape attribute first
    pub fn attributes(&self) -> &[CellAttribute<T>] {
        &self.attributes
    }

    /// The synthesized geometry attribute
    pub fn shape_attribute(&self) -> &CellAttribute<T> {
        &self.attributes[0]
    }

    /// An evaluator of the geometry map for one cell type
    pub fn shape_evaluator(
        &self,
        cell_type: ReferenceCellType,
    ) -> Result<InterpolatedAttribute<'_, T>, AttributeError> {
        InterpolatedAttribute::new(cell_type, self.shape_attribute())
    }

    /// Attach an attribute
    ///
    /// Fails if the attribute carries data for a cell type the grid does
    /// not hold.
    pub fn add_attribute(&mut self, attribute: CellAttribute<T>) -> Result<(), QueryError> {
        for cell_type in attribute.cell_types() {
            if !self.connectivity.contains_key(&cell_type) {
                return Err(QueryError::UnknownCellType {
                    name: attribute.name().to_string(),
                    cell_type,
                });
            }
        }
        self.attributes.push(attribute);
        Ok(())
    }
}

/// Incremental construction of a [`CellGrid`]
pub struct CellGridBuilder<T: RealScalar> {
    gdim: usize,
    points: Vec<T>,
    cells: Vec<(ReferenceCellType, Vec<usize>)>,
}

impl<T: RealScalar> CellGridBuilder<T> {
    /// Start a builder for points with `gdim` coordinates each
    ///
    /// `gdim` must be between 1 and 3; points are zero padded to three
    /// components in the grid.
    pub fn new(gdim: usize) -> Self {
        assert!(
            (1..=3).contains(&gdim),
            "geometric dimension must be 1, 2 or 3"
        );
        Self {
            gdim,
            points: vec![],
            cells: vec![],
        }
    }

    /// Add one point, returning its index
    pub fn add_point(&mut self, coordinates: &[T]) -> usize {
        assert_eq!(coordinates.len(), self.gdim);
        self.points.extend_from_slice(coordinates);
        self.points.len() / self.gdim - 1
    }

    /// Add points from a flat slice with `gdim` entries per point
    pub fn add_points(&mut self, coordinates: &[T]) {
        assert_eq!(coordinates.len() % self.gdim, 0);
        self.points.extend_from_slice(coordinates);
    }

    /// Add one cell from its corner point indices
    pub fn add_cell(&mut self, cell_type: ReferenceCellType, corners: &[usize]) {
        self.cells.push((cell_type, corners.to_vec()));
    }

    /// Validate the definition and build the grid
    pub fn create_grid(self) -> Result<CellGrid<T>, QueryError> {
        let point_count = self.points.len() / self.gdim;
        let zero = T::from(0.0).unwrap();

        // Group cells by type, keeping the first-seen order of types
        let mut cell_types = vec![];
        let mut grouped: HashMap<ReferenceCellType, Vec<&[usize]>> = HashMap::new();
        for (cell_type, corners) in &self.cells {
            let expected = reference_cell::corner_count(*cell_type);
            if corners.len() != expected {
                return Err(QueryError::InvalidCornerCount {
                    cell_type: *cell_type,
                    expected,
                    found: corners.len(),
                });
            }
            for entry in corners {
                if *entry >= point_count {
                    return Err(QueryError::InvalidConnectivity {
                        entry: *entry,
                        point_count,
                    });
                }
            }
            grouped
                .entry(*cell_type)
                .or_insert_with(|| {
                    cell_types.push(*cell_type);
                    vec![]
                })
                .push(corners);
        }

        let mut coordinates = rlst_dynamic_array2!(T, [point_count, 3]);
        for p in 0..point_count {
            for d in 0..3 {
                *coordinates.get_mut([p, d]).unwrap() = if d < self.gdim {
                    self.points[p * self.gdim + d]
                } else {
                    zero
                };
            }
        }
        let coordinates = Rc::new(coordinates);

        let mut connectivity = HashMap::new();
        let mut shape = CellAttribute::new(SHAPE_ATTRIBUTE, "cg hgrad c1", 3);
        for cell_type in &cell_types {
            let cells = &grouped[cell_type];
            let ncorners = reference_cell::corner_count(*cell_type);
            let mut conn = rlst_dynamic_array2!(usize, [cells.len(), ncorners]);
            for (c, corners) in cells.iter().enumerate() {
                for (i, entry) in corners.iter().enumerate() {
                    *conn.get_mut([c, i]).unwrap() = *entry;
                }
            }
            let conn = Rc::new(conn);
            connectivity.insert(*cell_type, conn.clone());

            let mut info = CellTypeInfo::new();
            info.set_array(VALUES_ROLE, RoleArray::Real(coordinates.clone()));
            info.set_array(CONNECTIVITY_ROLE, RoleArray::Index(conn));
            shape.set_cell_type_info(*cell_type, info);
        }

        Ok(CellGrid {
            coordinates,
            cell_types,
            connectivity,
            attributes: vec![shape],
        })
    }
}
