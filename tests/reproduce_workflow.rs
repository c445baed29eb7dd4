use std::fs;
use std::sync::Arc;

use cube_forge::io::charges;
use cube_forge::{
    Atom, Cube, CubeReadOptions, Element, FieldConfig, GridMetadata, IoError, Molecule,
    error_field, reproduce_field, reproduce_field_with,
};
use ndarray::Array3;
use tempfile::TempDir;

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

fn water() -> Arc<Molecule> {
    Arc::new(Molecule::from_atoms(vec![
        Atom::new(1, Element::O, 0.0, [0.0, 0.0, 0.2217]),
        Atom::new(2, Element::H, 0.0, [0.0, 1.4309, -0.8867]),
        Atom::new(3, Element::H, 0.0, [0.0, -1.4309, -0.8867]),
    ]))
}

/// A potential-like reference cube that keeps every voxel off the nuclei.
fn reference_cube() -> Cube {
    let grid = Arc::new(GridMetadata::new([-3.1, -3.1, -3.1], [0.8, 0.8, 0.8], [8, 8, 8]).unwrap());
    let values = Array3::from_shape_fn((8, 8, 8), |(i, j, k)| {
        0.01 * (i as f64 - 3.5) - 0.002 * (j * k) as f64
    });
    Cube::new(grid, water(), values).unwrap()
}

#[test]
fn charge_list_reproduces_and_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("water_esp.cube");
    let charges_path = dir.path().join("water_chelpg.txt");
    let output_path = dir.path().join("water_rep.cube");

    reference_cube().save(&reference_path).unwrap();
    fs::write(&charges_path, "-0.80\n0.40\n0.40\n").unwrap();

    let reference = Cube::load(&reference_path, &CubeReadOptions::header_only()).unwrap();
    assert_eq!(reference.shape(), [8, 8, 8]);
    assert!(reference.values().iter().all(|&v| v == 0.0));

    let set = charges::load(&charges_path, reference.molecule()).unwrap();
    assert_eq!(set.provenance.method, Some(charges::ChargeMethod::Esp));
    assert_eq!(set.provenance.sampling, Some(charges::SamplingScheme::ChelpG));

    let molecule = Arc::new(set.molecule);
    let reproduced = reproduce_field(&reference, &molecule).unwrap();
    reproduced.save(&output_path).unwrap();

    let reloaded = Cube::load(&output_path, &CubeReadOptions::default()).unwrap();
    assert_eq!(reloaded.field_type(), "reproduced potential");
    assert_eq!(reloaded.grid(), reproduced.grid());
    for (&a, &b) in reloaded.values().iter().zip(reproduced.values().iter()) {
        assert_close(a, b, 1e-5);
    }

    for (atom, expected) in reloaded.molecule().atoms.iter().zip([-0.8, 0.4, 0.4]) {
        assert_close(atom.charge, expected, 1e-6);
    }
}

#[test]
fn error_field_matches_reproduced_minus_reference() {
    let reference = reference_cube();
    let molecule = Arc::new(water().with_charges(&[-0.8, 0.4, 0.4]).unwrap());

    let reproduced = reproduce_field(&reference, &molecule).unwrap();
    let error = error_field(&reference, &molecule).unwrap();

    assert_eq!(error.field_type(), "potential error");
    for ((&e, &r), &v) in error
        .values()
        .iter()
        .zip(reproduced.values().iter())
        .zip(reference.values().iter())
    {
        assert_eq!(e, r - v);
    }
}

#[test]
fn chunk_size_does_not_change_the_reconstruction() {
    let reference = reference_cube();
    let molecule = Arc::new(water().with_charges(&[-0.8, 0.4, 0.4]).unwrap());

    let whole = reproduce_field(&reference, &molecule).unwrap();
    let config = FieldConfig {
        chunk_size: 7,
        ..FieldConfig::default()
    };
    let chunked = reproduce_field_with(&reference, &molecule, &config).unwrap();

    assert_eq!(whole.values(), chunked.values());
}

#[test]
fn saving_over_an_existing_cube_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.cube");
    let cube = reference_cube();

    cube.save(&path).unwrap();
    let err = cube.abs().save(&path).unwrap_err();
    assert!(matches!(err, IoError::AlreadyExists(p) if p == path));
}
