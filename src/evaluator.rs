//! Attribute evaluators
//!
//! An evaluator maps a (cell, reference coordinate) pair to an attribute
//! value. [`InterpolatedAttribute`] is the evaluator for basis-interpolated
//! attributes; anything else that can produce values at reference
//! coordinates (analytic fields in tests, for instance) can implement
//! [`AttributeEvaluator`] directly and still drive the shape-map inversion.

use crate::attribute::layout::{self, AttributeLayout};
use crate::attribute::{CellAttribute, CONNECTIVITY_ROLE};
use crate::basis;
use crate::error::AttributeError;
use crate::types::{Array2D, Continuity, FunctionSpace, RealScalar, ReferenceCellType};
use rlst::RandomAccessByRef;

/// Evaluation of an attribute at reference coordinates inside a cell
pub trait AttributeEvaluator {
    /// Scalar type of coordinates and values
    type T: RealScalar;

    /// The number of components of each value
    fn value_size(&self) -> usize;

    /// Evaluate at reference coordinates `rst` of cell `cell_index`
    ///
    /// `value` must hold [`Self::value_size`] entries.
    fn evaluate(&self, cell_index: usize, rst: &[Self::T; 3], value: &mut [Self::T]);

    /// Does [`Self::evaluate_derivative`] use exact derivatives?
    fn has_analytic_derivative(&self) -> bool {
        false
    }

    /// Step used by the finite-difference derivative fallback
    fn derivative_step(&self) -> Self::T {
        <Self::T as num::NumCast>::from(1e-3).unwrap()
    }

    /// Evaluate the derivative with respect to the reference coordinates
    ///
    /// `jacobian` must hold `3 * value_size()` entries and is filled with
    /// `d value[c] / d rst[d]` at position `c * 3 + d`. The default is a
    /// forward difference with step [`Self::derivative_step`].
    fn evaluate_derivative(&self, cell_index: usize, rst: &[Self::T; 3], jacobian: &mut [Self::T]) {
        let h = self.derivative_step();
        let n = self.value_size();
        let mut base = vec![<Self::T as num::NumCast>::from(0.0).unwrap(); n];
        let mut shifted = vec![<Self::T as num::NumCast>::from(0.0).unwrap(); n];
        self.evaluate(cell_index, rst, &mut base);
        for d in 0..3 {
            let mut moved = *rst;
            moved[d] = moved[d] + h;
            self.evaluate(cell_index, &moved, &mut shifted);
            for c in 0..n {
                jacobian[c * 3 + d] = (shifted[c] - base[c]) / h;
            }
        }
    }
}

/// Basis interpolation of a [`CellAttribute`] over one cell type
///
/// Construction resolves the attribute's layout for the cell type and fails
/// with the reason if no interpolant exists, so a constructed evaluator can
/// always evaluate.
pub struct InterpolatedAttribute<'a, T: RealScalar> {
    cell_type: ReferenceCellType,
    layout: AttributeLayout,
    values: &'a Array2D<T>,
    connectivity: Option<&'a Array2D<usize>>,
}

impl<'a, T: RealScalar> InterpolatedAttribute<'a, T> {
    /// Resolve an interpolant for `attribute` on cells of type `cell_type`
    pub fn new(
        cell_type: ReferenceCellType,
        attribute: &'a CellAttribute<T>,
    ) -> Result<Self, AttributeError> {
        let layout = layout::resolve(cell_type, attribute)?;
        if !basis::is_implemented(cell_type, layout.function_space, layout.scheme, layout.order) {
            return Err(AttributeError::UnsupportedBasis {
                basis_name: layout.basis_name.clone(),
                cell_type,
            });
        }
        // resolve() has already checked the role arrays
        let info = attribute.cell_type_info(cell_type).unwrap();
        let values = info.values().unwrap();
        let connectivity = if layout.continuity == Continuity::Continuous
            && layout.function_space != FunctionSpace::Constant
        {
            Some(info.connectivity().ok_or_else(|| AttributeError::MissingRole {
                name: attribute.name().to_string(),
                role: CONNECTIVITY_ROLE.to_string(),
                cell_type,
            })?)
        } else {
            None
        };
        Ok(Self {
            cell_type,
            layout,
            values,
            connectivity,
        })
    }

    /// The resolved layout
    pub fn layout(&self) -> &AttributeLayout {
        &self.layout
    }

    /// The cell type this evaluator interpolates on
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    // Storage location of the dof_size components of basis function `b` on
    // cell `cell_index`: a row of the value array and a first column.
    fn dof_location(&self, cell_index: usize, b: usize) -> (usize, usize) {
        match self.connectivity {
            Some(connectivity) => (*connectivity.get([cell_index, b]).unwrap(), 0),
            None => {
                if self.layout.function_space == FunctionSpace::Constant {
                    (cell_index, 0)
                } else {
                    (cell_index, b * self.layout.dof_size)
                }
            }
        }
    }
}

impl<T: RealScalar> AttributeEvaluator for InterpolatedAttribute<'_, T> {
    type T = T;

    fn value_size(&self) -> usize {
        self.layout.dof_size * self.layout.basis_value_size
    }

    fn has_analytic_derivative(&self) -> bool {
        true
    }

    fn evaluate(&self, cell_index: usize, rst: &[T; 3], value: &mut [T]) {
        let zero = T::from(0.0).unwrap();
        let mut basis_values = vec![zero; self.layout.basis_count];
        basis::tabulate(
            self.cell_type,
            self.layout.function_space,
            self.layout.scheme,
            self.layout.order,
            rst,
            &mut basis_values,
        );
        value.fill(zero);
        for (b, phi) in basis_values.iter().enumerate() {
            let (row, col) = self.dof_location(cell_index, b);
            for c in 0..self.layout.dof_size {
                value[c] += *phi * *self.values.get([row, col + c]).unwrap();
            }
        }
    }

    fn evaluate_derivative(&self, cell_index: usize, rst: &[T; 3], jacobian: &mut [T]) {
        let zero = T::from(0.0).unwrap();
        let mut basis_grads = vec![zero; 3 * self.layout.basis_count];
        basis::tabulate_gradient(
            self.cell_type,
            self.layout.function_space,
            self.layout.scheme,
            self.layout.order,
            rst,
            &mut basis_grads,
        );
        jacobian.fill(zero);
        for b in 0..self.layout.basis_count {
            let (row, col) = self.dof_location(cell_index, b);
            for c in 0..self.layout.dof_size {
                let dof = *self.values.get([row, col + c]).unwrap();
                for d in 0..3 {
                    jacobian[c * 3 + d] += basis_grads[b * 3 + d] * dof;
                }
            }
        }
    }
}
