//! Types specific to cellgrid

use rlst::{Array, BaseArray, LinAlg, RlstScalar, VectorContainer};

/// A real scalar usable as coordinate and attribute value type
pub trait RealScalar: num::Float + LinAlg + RlstScalar<Real = Self> {}

impl<T: num::Float + LinAlg + RlstScalar<Real = T>> RealScalar for T {}

/// A dense two-dimensional array
pub type Array2D<T> = Array<T, BaseArray<T, VectorContainer<T>, 2>, 2>;

/// The shape of a reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ReferenceCellType {
    /// A single point
    Vertex = 0,
    /// A line segment
    Edge = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron
    Tetrahedron = 4,
    /// A hexahedron
    Hexahedron = 5,
    /// A wedge (triangular prism)
    Wedge = 6,
    /// A pyramid with quadrilateral base
    Pyramid = 7,
}

impl std::fmt::Display for ReferenceCellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Whether degrees of freedom are shared between neighbouring cells
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Continuity {
    /// Degrees of freedom on shared sub-entities are shared between cells
    Continuous = 0,
    /// Each cell owns a private copy of its degrees of freedom
    Discontinuous = 1,
}

/// The function space that an attribute's basis functions span
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum FunctionSpace {
    /// Scalar nodal (Lagrange) functions
    HGrad = 0,
    /// Vector-valued functions with continuous normal components
    HDiv = 1,
    /// Vector-valued functions with continuous tangential components
    HCurl = 2,
    /// A single constant function per cell
    Constant = 3,
}

impl std::fmt::Display for FunctionSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionSpace::HGrad => write!(f, "HGrad"),
            FunctionSpace::HDiv => write!(f, "HDiv"),
            FunctionSpace::HCurl => write!(f, "HCurl"),
            FunctionSpace::Constant => write!(f, "Constant"),
        }
    }
}

/// Whether an attribute's basis is the complete polynomial set of its order
/// or the smaller (serendipity) set without interior functions
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum IntegrationScheme {
    /// The full polynomial set
    Complete = 0,
    /// The serendipity set
    Incomplete = 1,
}

impl std::fmt::Display for IntegrationScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationScheme::Complete => write!(f, "C"),
            IntegrationScheme::Incomplete => write!(f, "I"),
        }
    }
}
