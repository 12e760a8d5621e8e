//! Error types

use crate::types::ReferenceCellType;
use thiserror::Error;

/// Failure to resolve an attribute's layout or basis evaluator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// The attribute type string does not have the form
    /// `"{mode} {space} {scheme}{order}"`
    #[error("malformed attribute type string {0:?}")]
    MalformedTypeString(String),
    /// A role array required for resolution is missing
    #[error("attribute {name:?} has no {role:?} array for cell type {cell_type}")]
    MissingRole {
        /// Attribute name
        name: String,
        /// Role of the missing array
        role: String,
        /// Cell type for which the array was requested
        cell_type: ReferenceCellType,
    },
    /// A role array holds the wrong kind of data for its role
    #[error("attribute {name:?} stores the wrong array kind for role {role:?}")]
    WrongRoleKind {
        /// Attribute name
        name: String,
        /// Role of the offending array
        role: String,
    },
    /// The resolved layout contradicts the attribute's declared component count
    #[error(
        "attribute {name:?} declares {declared} components but its {cell_type} layout \
         provides {resolved} (degree-of-freedom size {dof_size} * basis value size {value_size})"
    )]
    ComponentMismatch {
        /// Attribute name
        name: String,
        /// Declared component count
        declared: usize,
        /// Component count implied by the layout
        resolved: usize,
        /// Degree-of-freedom size of the layout
        dof_size: usize,
        /// Basis value size of the layout
        value_size: usize,
        /// Cell type for which resolution was attempted
        cell_type: ReferenceCellType,
    },
    /// The (cell type, function space, order) combination has no basis
    #[error("no {basis_name} basis is available for cell type {cell_type}")]
    UnsupportedBasis {
        /// Name of the requested basis
        basis_name: String,
        /// Cell type for which the basis was requested
        cell_type: ReferenceCellType,
    },
}

/// Failure to configure or run a point query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The flat input point slice is not a whole number of 3-component points
    #[error("input point data of length {0} is not divisible by 3")]
    InvalidPointData(usize),
    /// The requested attribute does not exist on the grid
    #[error("grid has no attribute named {0:?}")]
    MissingAttribute(String),
    /// An interpolating query was started without naming an attribute
    #[error("interpolation requested but no attribute was named")]
    AttributeNotSpecified,
    /// An interpolation-only query was started without prior classification
    #[error("interpolation-only query requires a prior classification output")]
    MissingPriorClassification,
    /// An attribute references a cell type the grid does not hold
    #[error("attribute {name:?} references cell type {cell_type} not present in the grid")]
    UnknownCellType {
        /// Attribute name
        name: String,
        /// The unknown cell type
        cell_type: ReferenceCellType,
    },
    /// A connectivity entry indexes a point that does not exist
    #[error("connectivity entry {entry} is out of range for {point_count} points")]
    InvalidConnectivity {
        /// The offending point index
        entry: usize,
        /// Number of points in the grid
        point_count: usize,
    },
    /// A cell definition has the wrong number of corners for its type
    #[error("a {cell_type} cell requires {expected} corners but {found} were supplied")]
    InvalidCornerCount {
        /// Cell type being defined
        cell_type: ReferenceCellType,
        /// Expected corner count
        expected: usize,
        /// Supplied corner count
        found: usize,
    },
    /// Resolving the grid's shape attribute failed
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
