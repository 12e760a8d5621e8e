//! Cell attributes
//!
//! A cell attribute is a named function over a grid's cells, backed by one
//! set of role-indexed arrays per cell type. The arrays are reference
//! counted so that several attributes (and the grid itself) can share
//! storage, the way the shape attribute shares the grid's coordinates.

pub mod layout;

use crate::types::{Array2D, RealScalar, ReferenceCellType};
use std::collections::HashMap;
use std::rc::Rc;

/// Role name of the degree-of-freedom value array
pub const VALUES_ROLE: &str = "values";
/// Role name of the cell-to-degree-of-freedom connectivity array
pub const CONNECTIVITY_ROLE: &str = "connectivity";

/// An array attached to an attribute under a role name
#[derive(Clone)]
pub enum RoleArray<T: RealScalar> {
    /// Real-valued data, one row per degree of freedom or per cell
    Real(Rc<Array2D<T>>),
    /// Index data, one row per cell
    Index(Rc<Array2D<usize>>),
}

impl<T: RealScalar> RoleArray<T> {
    /// The real-valued array, if this is one
    pub fn as_real(&self) -> Option<&Array2D<T>> {
        match self {
            RoleArray::Real(a) => Some(a),
            RoleArray::Index(_) => None,
        }
    }

    /// The index-valued array, if this is one
    pub fn as_index(&self) -> Option<&Array2D<usize>> {
        match self {
            RoleArray::Real(_) => None,
            RoleArray::Index(a) => Some(a),
        }
    }
}

/// The per-cell-type data of an attribute
#[derive(Clone, Default)]
pub struct CellTypeInfo<T: RealScalar> {
    arrays_by_role: HashMap<String, RoleArray<T>>,
}

impl<T: RealScalar> CellTypeInfo<T> {
    /// Create an empty info record
    pub fn new() -> Self {
        Self {
            arrays_by_role: HashMap::new(),
        }
    }

    /// Attach an array under a role name, replacing any previous holder
    pub fn set_array(&mut self, role: &str, array: RoleArray<T>) {
        self.arrays_by_role.insert(role.to_string(), array);
    }

    /// Look up an array by role
    pub fn array(&self, role: &str) -> Option<&RoleArray<T>> {
        self.arrays_by_role.get(role)
    }

    /// The degree-of-freedom value array
    pub fn values(&self) -> Option<&Array2D<T>> {
        self.array(VALUES_ROLE).and_then(|a| a.as_real())
    }

    /// The cell-to-degree-of-freedom connectivity array
    pub fn connectivity(&self) -> Option<&Array2D<usize>> {
        self.array(CONNECTIVITY_ROLE).and_then(|a| a.as_index())
    }
}

/// A named function over a grid's cells
pub struct CellAttribute<T: RealScalar> {
    name: String,
    attribute_type: String,
    components: usize,
    info: HashMap<ReferenceCellType, CellTypeInfo<T>>,
}

impl<T: RealScalar> CellAttribute<T> {
    /// Create an attribute with no per-cell-type data yet
    ///
    /// The type string has the form `"{mode} {space} {scheme}{order}"`, for
    /// example `"dg hgrad c1"` or `"cg constant c0"`; it is parsed when a
    /// layout is resolved, not here.
    pub fn new(name: &str, attribute_type: &str, components: usize) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: attribute_type.to_string(),
            components,
            info: HashMap::new(),
        }
    }

    /// The attribute's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's type string
    pub fn attribute_type(&self) -> &str {
        &self.attribute_type
    }

    /// The number of components of each interpolated value
    pub fn number_of_components(&self) -> usize {
        self.components
    }

    /// Attach the data for one cell type
    pub fn set_cell_type_info(&mut self, cell_type: ReferenceCellType, info: CellTypeInfo<T>) {
        self.info.insert(cell_type, info);
    }

    /// The data for one cell type
    pub fn cell_type_info(&self, cell_type: ReferenceCellType) -> Option<&CellTypeInfo<T>> {
        self.info.get(&cell_type)
    }

    /// The cell types this attribute holds data for, in a stable order
    pub fn cell_types(&self) -> Vec<ReferenceCellType> {
        let mut types = self.info.keys().copied().collect::<Vec<_>>();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rlst::{rlst_dynamic_array2, RandomAccessMut};

    #[test]
    fn test_roles() {
        let mut values = rlst_dynamic_array2!(f64, [2, 1]);
        *values.get_mut([0, 0]).unwrap() = 7.0;
        *values.get_mut([1, 0]).unwrap() = -3.0;

        let mut info = CellTypeInfo::new();
        info.set_array(VALUES_ROLE, RoleArray::Real(Rc::new(values)));
        assert!(info.values().is_some());
        assert!(info.connectivity().is_none());
        assert!(info.array(VALUES_ROLE).unwrap().as_index().is_none());

        let mut attribute = CellAttribute::<f64>::new("pressure", "dg constant c0", 1);
        attribute.set_cell_type_info(ReferenceCellType::Hexahedron, info);
        assert_eq!(attribute.name(), "pressure");
        assert_eq!(attribute.number_of_components(), 1);
        assert_eq!(
            attribute.cell_types(),
            vec![ReferenceCellType::Hexahedron]
        );
        assert!(attribute
            .cell_type_info(ReferenceCellType::Tetrahedron)
            .is_none());
    }
}
