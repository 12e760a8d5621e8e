//! Point queries against a cell grid
//!
//! A [`CellGridPointQuery`] takes a flat list of world-space points and
//! answers which cell each point lies in, where in that cell's reference
//! domain it sits, and optionally what value a named attribute takes there.
//! The output is grouped by cell type, with a trailing group for points no
//! cell claimed, so the three phases can be run separately and an earlier
//! classification reused.

mod classify;
mod solve;

use crate::error::QueryError;
use crate::evaluator::{AttributeEvaluator, InterpolatedAttribute};
use crate::grid::CellGrid;
use crate::locator::PointLocator;
use crate::types::{RealScalar, ReferenceCellType};
use itertools::izip;

/// How much of the query pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Classify points into cells and solve for reference coordinates
    Classify,
    /// Classification followed by attribute interpolation
    ClassifyAndInterpolate,
    /// Interpolate using a prior classification's output
    InterpolateOnly,
}

/// One run of records in a [`QueryOutput`], all of the same cell type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    /// Cell type of the group's records, `None` for the unclaimed points
    pub cell_type: Option<ReferenceCellType>,
    /// First record of the group
    pub offset: usize,
    /// Number of records in the group
    pub count: usize,
}

/// The records produced by a point query
///
/// Each record pairs one input point with one cell that claimed it; a point
/// on a boundary shared by several cells produces several records, and a
/// point no cell claimed produces one record in the trailing unclaimed
/// group with cell index -1 and NaN reference coordinates. There is at
/// least one record per input point.
#[derive(Debug, Clone)]
pub struct QueryOutput<T: RealScalar> {
    /// Consecutive runs of records, one per cell type plus the unclaimed run
    pub groups: Vec<OutputGroup>,
    /// Input point index of each record
    pub point_ids: Vec<usize>,
    /// Claiming cell of each record, -1 for unclaimed points
    pub cell_indices: Vec<i64>,
    /// Reference coordinates of each record, three per record, NaN when the
    /// shape-map inversion failed
    pub point_parameters: Vec<T>,
    /// Interpolated attribute values, `value_size` per record; empty until
    /// an interpolating phase has run
    pub values: Vec<T>,
}

impl<T: RealScalar> QueryOutput<T> {
    /// The number of records
    pub fn record_count(&self) -> usize {
        self.point_ids.len()
    }

    /// The reference coordinates of one record
    pub fn parameter(&self, record: usize) -> [T; 3] {
        [
            self.point_parameters[record * 3],
            self.point_parameters[record * 3 + 1],
            self.point_parameters[record * 3 + 2],
        ]
    }
}

/// A configurable point query against a [`CellGrid`]
pub struct CellGridPointQuery<'g, T: RealScalar> {
    grid: &'g CellGrid<T>,
    input_points: Vec<T>,
    attribute_name: Option<String>,
    phase: QueryPhase,
    prior: Option<QueryOutput<T>>,
}

impl<'g, T: RealScalar> CellGridPointQuery<'g, T> {
    /// Start a classification query for a flat slice of 3D points
    pub fn new(grid: &'g CellGrid<T>, input_points: &[T]) -> Result<Self, QueryError> {
        if input_points.len() % 3 != 0 {
            return Err(QueryError::InvalidPointData(input_points.len()));
        }
        Ok(Self {
            grid,
            input_points: input_points.to_vec(),
            attribute_name: None,
            phase: QueryPhase::Classify,
            prior: None,
        })
    }

    /// Name the attribute to interpolate
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attribute_name = Some(name.to_string());
        if self.phase == QueryPhase::Classify {
            self.phase = QueryPhase::ClassifyAndInterpolate;
        }
        self
    }

    /// Choose which phases to run
    pub fn with_phase(mut self, phase: QueryPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Supply the output of an earlier classification of the same points
    pub fn with_prior_classification(mut self, prior: QueryOutput<T>) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Run the configured phases
    pub fn run(mut self) -> Result<QueryOutput<T>, QueryError> {
        match self.phase {
            QueryPhase::Classify => self.classify(),
            QueryPhase::ClassifyAndInterpolate => {
                let mut output = self.classify()?;
                self.interpolate(&mut output)?;
                Ok(output)
            }
            QueryPhase::InterpolateOnly => {
                let mut output = self
                    .prior
                    .take()
                    .ok_or(QueryError::MissingPriorClassification)?;
                self.interpolate(&mut output)?;
                Ok(output)
            }
        }
    }

    fn classify(&self) -> Result<QueryOutput<T>, QueryError> {
        let npoints = self.input_points.len() / 3;
        let locator = PointLocator::new(&self.input_points);

        let mut per_type = vec![];
        let mut claimed = vec![false; npoints];
        for cell_type in self.grid.cell_types() {
            // create_grid() stores a connectivity per listed cell type
            let connectivity = self.grid.connectivity(*cell_type).unwrap();
            let pairs = classify::classify_points(
                *cell_type,
                connectivity,
                self.grid.coordinates(),
                &locator,
            );
            for (_, point) in &pairs {
                claimed[*point] = true;
            }
            per_type.push((*cell_type, pairs));
        }
        let unclaimed = (0..npoints).filter(|p| !claimed[*p]).collect::<Vec<_>>();

        let mut groups = vec![];
        let mut offset = 0;
        for (cell_type, pairs) in &per_type {
            groups.push(OutputGroup {
                cell_type: Some(*cell_type),
                offset,
                count: pairs.len(),
            });
            offset += pairs.len();
        }
        if !unclaimed.is_empty() {
            groups.push(OutputGroup {
                cell_type: None,
                offset,
                count: unclaimed.len(),
            });
            offset += unclaimed.len();
        }

        let records = offset;
        let mut point_ids = vec![0; records];
        let mut cell_indices = vec![-1_i64; records];
        let mut point_parameters = vec![T::nan(); records * 3];

        for (group, (cell_type, pairs)) in izip!(&groups, &per_type) {
            let evaluator = self.grid.shape_evaluator(*cell_type)?;
            for (record, (cell, point)) in izip!(group.offset.., pairs) {
                point_ids[record] = *point;
                cell_indices[record] = *cell as i64;
                let target = locator.point(*point);
                if let Some(rst) = solve::invert_shape_map(&evaluator, *cell_type, *cell, &target)
                {
                    point_parameters[record * 3..record * 3 + 3].copy_from_slice(&rst);
                }
            }
        }
        for (record, point) in izip!((records - unclaimed.len()).., &unclaimed) {
            point_ids[record] = *point;
        }

        Ok(QueryOutput {
            groups,
            point_ids,
            cell_indices,
            point_parameters,
            values: vec![],
        })
    }

    fn interpolate(&self, output: &mut QueryOutput<T>) -> Result<(), QueryError> {
        let name = self
            .attribute_name
            .as_deref()
            .ok_or(QueryError::AttributeNotSpecified)?;
        let attribute = self
            .grid
            .attribute(name)
            .ok_or_else(|| QueryError::MissingAttribute(name.to_string()))?;
        let value_size = attribute.number_of_components();
        let mut values = vec![T::nan(); output.record_count() * value_size];

        for group in &output.groups {
            let Some(cell_type) = group.cell_type else {
                continue;
            };
            let evaluator = match InterpolatedAttribute::new(cell_type, attribute) {
                Ok(evaluator) => evaluator,
                Err(reason) => {
                    // Other cell types may still interpolate fine
                    log::warn!(
                        "skipping interpolation of {name:?} on {cell_type} cells: {reason}"
                    );
                    continue;
                }
            };
            for record in group.offset..group.offset + group.count {
                let cell = output.cell_indices[record];
                let rst = output.parameter(record);
                if cell < 0 || rst.iter().any(|r| !r.is_finite()) {
                    continue;
                }
                evaluator.evaluate(
                    cell as usize,
                    &rst,
                    &mut values[record * value_size..(record + 1) * value_size],
                );
            }
        }
        output.values = values;
        Ok(())
    }
}
