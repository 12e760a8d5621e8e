//! Cellgrid
//!
//! Classification of world-space points against the cells of a
//! mixed-cell-type grid, inversion of each cell's shape map to recover
//! parametric coordinates, and interpolation of cell attributes at those
//! coordinates.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod attribute;
pub mod basis;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod locator;
pub mod query;
pub mod reference_cell;
pub mod shapes;
pub mod types;

pub use grid::{CellGrid, CellGridBuilder};
pub use query::{CellGridPointQuery, QueryOutput, QueryPhase};
