//! End-to-end point query tests

use approx::assert_relative_eq;
use cellgrid::attribute::{CellAttribute, CellTypeInfo, RoleArray, CONNECTIVITY_ROLE, VALUES_ROLE};
use cellgrid::error::QueryError;
use cellgrid::evaluator::AttributeEvaluator;
use cellgrid::shapes::unit_cube_hexahedra;
use cellgrid::types::ReferenceCellType;
use cellgrid::{CellGrid, CellGridBuilder, CellGridPointQuery, QueryOutput, QueryPhase};
use rlst::{rlst_dynamic_array2, RandomAccessMut};
use std::rc::Rc;

fn constant_attribute(
    name: &str,
    cell_type: ReferenceCellType,
    cell_values: &[f64],
) -> CellAttribute<f64> {
    let mut values = rlst_dynamic_array2!(f64, [cell_values.len(), 1]);
    for (c, v) in cell_values.iter().enumerate() {
        *values.get_mut([c, 0]).unwrap() = *v;
    }
    let mut info = CellTypeInfo::new();
    info.set_array(VALUES_ROLE, RoleArray::Real(Rc::new(values)));
    let mut attribute = CellAttribute::new(name, "dg constant c0", 1);
    attribute.set_cell_type_info(cell_type, info);
    attribute
}

fn two_hexahedra() -> CellGrid<f64> {
    // Two unit hexahedra sharing the x = 1 face
    let mut b = CellGridBuilder::new(3);
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..3 {
                b.add_point(&[i as f64, j as f64, k as f64]);
            }
        }
    }
    let p = |i: usize, j: usize, k: usize| i + 3 * (j + 2 * k);
    for i in 0..2 {
        b.add_cell(
            ReferenceCellType::Hexahedron,
            &[
                p(i, 0, 0),
                p(i + 1, 0, 0),
                p(i + 1, 1, 0),
                p(i, 1, 0),
                p(i, 0, 1),
                p(i + 1, 0, 1),
                p(i + 1, 1, 1),
                p(i, 1, 1),
            ],
        );
    }
    b.create_grid().unwrap()
}

fn record_of_point(output: &QueryOutput<f64>, point: usize) -> usize {
    output
        .point_ids
        .iter()
        .position(|p| *p == point)
        .expect("every input point has a record")
}

#[test]
fn test_lattice_cell_centres_classify_to_their_cells() {
    let grid = unit_cube_hexahedra::<f64>([2, 2, 2]);
    let mut points = vec![];
    let mut expected_cells = vec![];
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                points.extend_from_slice(&[
                    0.25 + 0.5 * i as f64,
                    0.25 + 0.5 * j as f64,
                    0.25 + 0.5 * k as f64,
                ]);
                expected_cells.push((i + 2 * (j + 2 * k)) as i64);
            }
        }
    }
    let output = CellGridPointQuery::new(&grid, &points).unwrap().run().unwrap();

    assert_eq!(output.record_count(), 8);
    assert_eq!(output.groups.len(), 1);
    assert_eq!(
        output.groups[0].cell_type,
        Some(ReferenceCellType::Hexahedron)
    );
    for point in 0..8 {
        let record = record_of_point(&output, point);
        assert_eq!(output.cell_indices[record], expected_cells[point]);
        // A cell centre sits at the centre of the reference hexahedron
        for p in output.parameter(record) {
            assert_relative_eq!(p, 0.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_round_trip_parameters_on_distorted_hexahedron() {
    let mut b = CellGridBuilder::new(3);
    b.add_points(&[
        0.0, 0.0, 0.0, //
        1.1, 0.1, -0.1, //
        1.2, 1.0, 0.1, //
        -0.1, 0.9, 0.0, //
        0.1, -0.1, 1.0, //
        1.0, 0.0, 1.2, //
        1.1, 1.1, 1.0, //
        0.0, 1.0, 0.9,
    ]);
    b.add_cell(ReferenceCellType::Hexahedron, &[0, 1, 2, 3, 4, 5, 6, 7]);
    let grid = b.create_grid().unwrap();

    let rst = [0.3, -0.2, 0.5];
    let mut target = [0.0; 3];
    grid.shape_evaluator(ReferenceCellType::Hexahedron)
        .unwrap()
        .evaluate(0, &rst, &mut target);

    let output = CellGridPointQuery::new(&grid, &target).unwrap().run().unwrap();
    assert_eq!(output.cell_indices, vec![0]);
    let found = output.parameter(0);
    for d in 0..3 {
        assert_relative_eq!(found[d], rst[d], epsilon = 1e-6);
    }
}

#[test]
fn test_constant_attribute_interpolation() {
    let mut grid = two_hexahedra();
    grid.add_attribute(constant_attribute(
        "pressure",
        ReferenceCellType::Hexahedron,
        &[7.0, -2.0],
    ))
    .unwrap();

    let points = [0.5, 0.5, 0.5, 1.5, 0.5, 0.5];
    let output = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("pressure")
        .run()
        .unwrap();

    let first = record_of_point(&output, 0);
    let second = record_of_point(&output, 1);
    assert_relative_eq!(output.values[first], 7.0);
    assert_relative_eq!(output.values[second], -2.0);
}

#[test]
fn test_shared_face_point_produces_one_record_per_cell() {
    let mut grid = two_hexahedra();
    grid.add_attribute(constant_attribute(
        "pressure",
        ReferenceCellType::Hexahedron,
        &[7.0, -2.0],
    ))
    .unwrap();

    // On the shared face
    let points = [1.0, 0.5, 0.5];
    let output = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("pressure")
        .run()
        .unwrap();

    assert_eq!(output.record_count(), 2);
    assert_eq!(output.point_ids, vec![0, 0]);
    assert_eq!(output.cell_indices, vec![0, 1]);
    // Each record interpolates in its own claiming cell
    assert_relative_eq!(output.values[0], 7.0);
    assert_relative_eq!(output.values[1], -2.0);
    // The face is r = 1 in the left cell and r = -1 in the right cell
    assert_relative_eq!(output.parameter(0)[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(output.parameter(1)[0], -1.0, epsilon = 1e-6);
}

fn hexahedron_and_tetrahedron() -> CellGrid<f64> {
    let mut b = CellGridBuilder::new(3);
    b.add_points(&[
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, //
        5.0, 0.0, 0.0, 6.0, 0.0, 0.0, 5.0, 1.0, 0.0, 5.0, 0.0, 1.0,
    ]);
    b.add_cell(ReferenceCellType::Hexahedron, &[0, 1, 2, 3, 4, 5, 6, 7]);
    b.add_cell(ReferenceCellType::Tetrahedron, &[8, 9, 10, 11]);
    b.create_grid().unwrap()
}

#[test]
fn test_groups_tile_the_output_in_cell_type_order() {
    let grid = hexahedron_and_tetrahedron();
    // One point per cell and one point nowhere
    let points = [0.5, 0.5, 0.5, 5.25, 0.25, 0.25, 3.0, 3.0, 3.0];
    let output = CellGridPointQuery::new(&grid, &points).unwrap().run().unwrap();

    assert_eq!(output.groups.len(), 3);
    assert_eq!(
        output.groups[0].cell_type,
        Some(ReferenceCellType::Hexahedron)
    );
    assert_eq!(
        output.groups[1].cell_type,
        Some(ReferenceCellType::Tetrahedron)
    );
    assert_eq!(output.groups[2].cell_type, None);
    let mut expected_offset = 0;
    for group in &output.groups {
        assert_eq!(group.offset, expected_offset);
        expected_offset += group.count;
    }
    assert_eq!(expected_offset, output.record_count());

    // The unclaimed point keeps a sentinel record
    let record = record_of_point(&output, 2);
    assert_eq!(output.cell_indices[record], -1);
    assert!(output.parameter(record).iter().all(|p| p.is_nan()));

    // The tetrahedron point inverts to its barycentric-style coordinates
    let record = record_of_point(&output, 1);
    for p in output.parameter(record) {
        assert_relative_eq!(p, 0.25, epsilon = 1e-6);
    }
}

#[test]
fn test_unresolvable_cell_type_leaves_nan_values() {
    let mut grid = hexahedron_and_tetrahedron();
    // The attribute only carries data for the hexahedra
    grid.add_attribute(constant_attribute(
        "pressure",
        ReferenceCellType::Hexahedron,
        &[7.0],
    ))
    .unwrap();

    let points = [0.5, 0.5, 0.5, 5.25, 0.25, 0.25];
    let output = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("pressure")
        .run()
        .unwrap();

    let hex_record = record_of_point(&output, 0);
    let tet_record = record_of_point(&output, 1);
    assert_relative_eq!(output.values[hex_record], 7.0);
    // The tetrahedron group is classified but not interpolated
    assert!(output.values[tet_record].is_nan());
    assert!(output.cell_indices[tet_record] >= 0);
    assert!(output.parameter(tet_record).iter().all(|p| p.is_finite()));
}

#[test]
fn test_shared_linear_attribute_reproduces_coordinate() {
    let mut grid = two_hexahedra();
    // One degree of freedom per grid point, equal to the point's x coordinate
    let mut values = rlst_dynamic_array2!(f64, [12, 1]);
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..3 {
                *values.get_mut([i + 3 * (j + 2 * k), 0]).unwrap() = i as f64;
            }
        }
    }
    let p = |i: usize, j: usize, k: usize| i + 3 * (j + 2 * k);
    let mut connectivity = rlst_dynamic_array2!(usize, [2, 8]);
    for i in 0..2 {
        for (corner, point) in [
            p(i, 0, 0),
            p(i + 1, 0, 0),
            p(i + 1, 1, 0),
            p(i, 1, 0),
            p(i, 0, 1),
            p(i + 1, 0, 1),
            p(i + 1, 1, 1),
            p(i, 1, 1),
        ]
        .into_iter()
        .enumerate()
        {
            *connectivity.get_mut([i, corner]).unwrap() = point;
        }
    }
    let mut info = CellTypeInfo::new();
    info.set_array(VALUES_ROLE, RoleArray::Real(Rc::new(values)));
    info.set_array(CONNECTIVITY_ROLE, RoleArray::Index(Rc::new(connectivity)));
    let mut attribute = CellAttribute::new("x", "cg hgrad c1", 1);
    attribute.set_cell_type_info(ReferenceCellType::Hexahedron, info);
    grid.add_attribute(attribute).unwrap();

    let points = [0.25, 0.5, 0.75, 1.75, 0.25, 0.5];
    let output = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("x")
        .run()
        .unwrap();
    for point in 0..2 {
        let record = record_of_point(&output, point);
        assert_relative_eq!(output.values[record], points[point * 3], epsilon = 1e-6);
    }
}

#[test]
fn test_interpolate_only_reuses_a_prior_classification() {
    let mut grid = two_hexahedra();
    grid.add_attribute(constant_attribute(
        "pressure",
        ReferenceCellType::Hexahedron,
        &[7.0, -2.0],
    ))
    .unwrap();
    let points = [0.5, 0.5, 0.5, 1.5, 0.5, 0.5, 9.0, 9.0, 9.0];

    let prior = CellGridPointQuery::new(&grid, &points).unwrap().run().unwrap();
    assert!(prior.values.is_empty());

    let reused = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("pressure")
        .with_phase(QueryPhase::InterpolateOnly)
        .with_prior_classification(prior.clone())
        .run()
        .unwrap();
    let combined = CellGridPointQuery::new(&grid, &points)
        .unwrap()
        .with_attribute("pressure")
        .run()
        .unwrap();

    assert_eq!(reused.point_ids, combined.point_ids);
    assert_eq!(reused.cell_indices, combined.cell_indices);
    assert_eq!(reused.groups, combined.groups);
    for (a, b) in reused.values.iter().zip(&combined.values) {
        assert!((a == b) || (a.is_nan() && b.is_nan()));
    }
    // Classification itself is untouched by the reuse
    assert_eq!(prior.point_ids, reused.point_ids);
}

#[test]
fn test_configuration_errors() {
    let grid = two_hexahedra();

    assert!(matches!(
        CellGridPointQuery::new(&grid, &[0.0, 0.0]),
        Err(QueryError::InvalidPointData(2))
    ));

    let result = CellGridPointQuery::new(&grid, &[0.5, 0.5, 0.5])
        .unwrap()
        .with_phase(QueryPhase::InterpolateOnly)
        .with_attribute("pressure")
        .run();
    assert!(matches!(result, Err(QueryError::MissingPriorClassification)));

    let result = CellGridPointQuery::new(&grid, &[0.5, 0.5, 0.5])
        .unwrap()
        .with_attribute("does not exist")
        .run();
    assert!(matches!(result, Err(QueryError::MissingAttribute(_))));

    let result = CellGridPointQuery::new(&grid, &[0.5, 0.5, 0.5])
        .unwrap()
        .with_phase(QueryPhase::ClassifyAndInterpolate)
        .run();
    assert!(matches!(result, Err(QueryError::AttributeNotSpecified)));
}
