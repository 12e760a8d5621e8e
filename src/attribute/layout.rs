//! Attribute layout resolution
//!
//! An attribute's type string and role arrays together determine how its
//! per-cell degrees of freedom are stored and which basis interpolates
//! them. Resolution parses the type string, sizes the basis for one cell
//! type, and derives the degree-of-freedom size from the value array.

use crate::attribute::{CellAttribute, CONNECTIVITY_ROLE, VALUES_ROLE};
use crate::basis;
use crate::error::AttributeError;
use crate::types::{Continuity, FunctionSpace, IntegrationScheme, RealScalar, ReferenceCellType};
use rlst::Shape;

/// How an attribute's degrees of freedom are laid out for one cell type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Polynomial order of the basis
    pub order: usize,
    /// Function space spanned by the basis
    pub function_space: FunctionSpace,
    /// Complete or serendipity polynomial set
    pub scheme: IntegrationScheme,
    /// Whether degrees of freedom are shared between cells
    pub continuity: Continuity,
    /// Number of basis functions per cell
    pub basis_count: usize,
    /// Number of components each basis function produces
    pub basis_value_size: usize,
    /// Number of attribute components attached to each degree of freedom
    pub dof_size: usize,
    /// Canonical basis name, e.g. `"HGradC1"`
    pub basis_name: String,
}

impl AttributeLayout {
    /// Are degrees of freedom on shared sub-entities shared between cells?
    pub fn shared_dofs(&self) -> bool {
        self.continuity == Continuity::Continuous
    }
}

fn parse_type_string(type_string: &str) -> Result<(Continuity, FunctionSpace, IntegrationScheme, usize), AttributeError> {
    let malformed = || AttributeError::MalformedTypeString(type_string.to_string());
    let tokens = type_string.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != 3 {
        return Err(malformed());
    }
    let continuity = match tokens[0].to_lowercase().as_str() {
        "dg" | "discontinuous" => Continuity::Discontinuous,
        _ => Continuity::Continuous,
    };
    let function_space = match tokens[1].to_lowercase().as_str() {
        "hgrad" | "lagrange" => FunctionSpace::HGrad,
        "hdiv" => FunctionSpace::HDiv,
        "hcurl" => FunctionSpace::HCurl,
        "constant" => FunctionSpace::Constant,
        _ => return Err(malformed()),
    };
    let mut chars = tokens[2].chars();
    let scheme = match chars.next().map(|c| c.to_ascii_lowercase()) {
        Some('c') => IntegrationScheme::Complete,
        Some('i') => IntegrationScheme::Incomplete,
        _ => return Err(malformed()),
    };
    let order = chars.as_str().parse::<usize>().map_err(|_| malformed())?;
    Ok((continuity, function_space, scheme, order))
}

/// Resolve the layout of an attribute for one cell type
///
/// Fails if the type string is malformed, the basis family does not exist on
/// this cell type at this order, the value array is missing, or the derived
/// sizes contradict the attribute's declared component count. A failed
/// resolution is never a usable layout.
pub fn resolve<T: RealScalar>(
    cell_type: ReferenceCellType,
    attribute: &CellAttribute<T>,
) -> Result<AttributeLayout, AttributeError> {
    let (continuity, function_space, scheme, order) =
        parse_type_string(attribute.attribute_type())?;
    let basis_name = format!("{function_space}{scheme}{order}");
    let basis_count = basis::basis_count(cell_type, function_space, scheme, order).ok_or(
        AttributeError::UnsupportedBasis {
            basis_name: basis_name.clone(),
            cell_type,
        },
    )?;
    let basis_value_size = basis::basis_value_size(function_space);

    let missing = |role: &str| AttributeError::MissingRole {
        name: attribute.name().to_string(),
        role: role.to_string(),
        cell_type,
    };
    let info = attribute
        .cell_type_info(cell_type)
        .ok_or_else(|| missing(VALUES_ROLE))?;
    let values = match info.array(VALUES_ROLE) {
        None => return Err(missing(VALUES_ROLE)),
        Some(array) => array.as_real().ok_or_else(|| AttributeError::WrongRoleKind {
            name: attribute.name().to_string(),
            role: VALUES_ROLE.to_string(),
        })?,
    };
    let columns = values.shape()[1];

    // Shared degrees of freedom live one per value-array row, gathered
    // through the connectivity; private ones are packed along a cell's row.
    let per_row = continuity == Continuity::Continuous || function_space == FunctionSpace::Constant;
    let dof_size = if per_row { columns } else { columns / basis_count };
    let mismatch = || AttributeError::ComponentMismatch {
        name: attribute.name().to_string(),
        declared: attribute.number_of_components(),
        resolved: dof_size * basis_value_size,
        dof_size,
        value_size: basis_value_size,
        cell_type,
    };
    if !per_row && columns % basis_count != 0 {
        return Err(mismatch());
    }
    if dof_size * basis_value_size != attribute.number_of_components() {
        return Err(mismatch());
    }
    if continuity == Continuity::Continuous && function_space != FunctionSpace::Constant {
        match info.array(CONNECTIVITY_ROLE) {
            None => return Err(missing(CONNECTIVITY_ROLE)),
            Some(array) => {
                array
                    .as_index()
                    .ok_or_else(|| AttributeError::WrongRoleKind {
                        name: attribute.name().to_string(),
                        role: CONNECTIVITY_ROLE.to_string(),
                    })?;
            }
        }
    }

    Ok(AttributeLayout {
        order,
        function_space,
        scheme,
        continuity,
        basis_count,
        basis_value_size,
        dof_size,
        basis_name,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attribute::{CellTypeInfo, RoleArray};
    use rlst::rlst_dynamic_array2;
    use std::rc::Rc;

    fn attribute_with_values(
        attribute_type: &str,
        components: usize,
        cell_type: ReferenceCellType,
        rows: usize,
        columns: usize,
        connectivity: Option<(usize, usize)>,
    ) -> CellAttribute<f64> {
        let mut info = CellTypeInfo::new();
        info.set_array(
            VALUES_ROLE,
            RoleArray::Real(Rc::new(rlst_dynamic_array2!(f64, [rows, columns]))),
        );
        if let Some((cells, corners)) = connectivity {
            info.set_array(
                CONNECTIVITY_ROLE,
                RoleArray::Index(Rc::new(rlst_dynamic_array2!(usize, [cells, corners]))),
            );
        }
        let mut attribute = CellAttribute::new("speed", attribute_type, components);
        attribute.set_cell_type_info(cell_type, info);
        attribute
    }

    #[test]
    fn test_parse_shared_linear() {
        let attribute = attribute_with_values(
            "cg hgrad c1",
            2,
            ReferenceCellType::Hexahedron,
            12,
            2,
            Some((1, 8)),
        );
        let layout = resolve(ReferenceCellType::Hexahedron, &attribute).unwrap();
        assert_eq!(layout.order, 1);
        assert_eq!(layout.function_space, FunctionSpace::HGrad);
        assert_eq!(layout.scheme, IntegrationScheme::Complete);
        assert_eq!(layout.continuity, Continuity::Continuous);
        assert!(layout.shared_dofs());
        assert_eq!(layout.basis_count, 8);
        assert_eq!(layout.basis_value_size, 1);
        assert_eq!(layout.dof_size, 2);
        assert_eq!(layout.basis_name, "HGradC1");
    }

    #[test]
    fn test_parse_discontinuous_quadratic() {
        // 10 basis functions on a tetrahedron at order 2, one scalar each
        let attribute = attribute_with_values(
            "DG HGrad C2",
            1,
            ReferenceCellType::Tetrahedron,
            4,
            10,
            None,
        );
        let layout = resolve(ReferenceCellType::Tetrahedron, &attribute).unwrap();
        assert_eq!(layout.continuity, Continuity::Discontinuous);
        assert!(!layout.shared_dofs());
        assert_eq!(layout.basis_count, 10);
        assert_eq!(layout.dof_size, 1);
        assert_eq!(layout.basis_name, "HGradC2");
    }

    #[test]
    fn test_parse_constant() {
        let attribute =
            attribute_with_values("dg constant c0", 3, ReferenceCellType::Triangle, 6, 3, None);
        let layout = resolve(ReferenceCellType::Triangle, &attribute).unwrap();
        assert_eq!(layout.function_space, FunctionSpace::Constant);
        assert_eq!(layout.basis_count, 1);
        assert_eq!(layout.dof_size, 3);
    }

    #[test]
    fn test_malformed_type_strings() {
        for bad in ["", "dg hgrad", "dg hgrad c1 extra", "dg sobolev c1", "dg hgrad x1", "dg hgrad c"] {
            let attribute =
                attribute_with_values(bad, 1, ReferenceCellType::Triangle, 3, 1, None);
            assert!(matches!(
                resolve(ReferenceCellType::Triangle, &attribute),
                Err(AttributeError::MalformedTypeString(_))
            ));
        }
    }

    #[test]
    fn test_component_mismatch() {
        // 8 columns over 8 hexahedron basis functions is one scalar per
        // degree of freedom, not the two components declared
        let attribute = attribute_with_values(
            "dg hgrad c1",
            2,
            ReferenceCellType::Hexahedron,
            1,
            8,
            None,
        );
        assert!(matches!(
            resolve(ReferenceCellType::Hexahedron, &attribute),
            Err(AttributeError::ComponentMismatch { declared: 2, resolved: 1, .. })
        ));
    }

    #[test]
    fn test_missing_roles() {
        let attribute = CellAttribute::<f64>::new("speed", "cg hgrad c1", 1);
        assert!(matches!(
            resolve(ReferenceCellType::Triangle, &attribute),
            Err(AttributeError::MissingRole { .. })
        ));

        // Shared layouts additionally need a connectivity array
        let attribute =
            attribute_with_values("cg hgrad c1", 1, ReferenceCellType::Triangle, 5, 1, None);
        assert!(matches!(
            resolve(ReferenceCellType::Triangle, &attribute),
            Err(AttributeError::MissingRole { .. })
        ));
    }

    #[test]
    fn test_unsupported_order() {
        let attribute =
            attribute_with_values("dg hgrad c2", 1, ReferenceCellType::Pyramid, 1, 14, None);
        assert!(matches!(
            resolve(ReferenceCellType::Pyramid, &attribute),
            Err(AttributeError::UnsupportedBasis { .. })
        ));
    }
}
