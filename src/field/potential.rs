//! Point-charge reconstruction of electrostatic potential fields.

use super::config::FieldConfig;
use super::cube::Cube;
use super::distance::{Sites, reduce_distances};
use super::error::Error;
use crate::model::molecule::Molecule;
use log::info;
use std::sync::Arc;

pub const REPRODUCED_FIELD_TYPE: &str = "reproduced potential";
pub const ERROR_FIELD_TYPE: &str = "potential error";

/// Evaluates `V(x) = Σ qᵢ / |x − pᵢ|` over every voxel of `template`, in
/// atomic units.
///
/// The result shares the template's grid but carries `molecule`, whose atoms
/// must all have positions. A voxel that coincides with a charged atom is
/// infinite.
pub fn reproduce_field(template: &Cube, molecule: &Arc<Molecule>) -> Result<Cube, Error> {
    reproduce_field_with(template, molecule, &FieldConfig::default())
}

pub fn reproduce_field_with(
    template: &Cube,
    molecule: &Arc<Molecule>,
    config: &FieldConfig,
) -> Result<Cube, Error> {
    config.validate()?;
    let sites = Sites::from_atoms(&molecule.atoms)?;
    info!(
        "Reconstructing potential from {} point charges on a {:?} grid",
        sites.len(),
        template.shape()
    );

    let values = reduce_distances(template, &sites, config, 0.0, |row| {
        row.iter()
            .zip(&sites.charges)
            .map(|(&d, &q)| q / d)
            .sum::<f64>()
    });

    Ok(Cube::new(Arc::clone(template.shared_grid()), Arc::clone(molecule), values)?
        .with_field_type(REPRODUCED_FIELD_TYPE))
}

/// Signed per-voxel discrepancy `reproduce_field(reference) − reference`.
pub fn error_field(reference: &Cube, molecule: &Arc<Molecule>) -> Result<Cube, Error> {
    error_field_with(reference, molecule, &FieldConfig::default())
}

pub fn error_field_with(
    reference: &Cube,
    molecule: &Arc<Molecule>,
    config: &FieldConfig,
) -> Result<Cube, Error> {
    let reproduced = reproduce_field_with(reference, molecule, config)?;
    Ok(reproduced.try_sub(reference)?.with_field_type(ERROR_FIELD_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::cube::tests::grid;
    use crate::model::atom::Atom;
    use crate::model::types::Element;
    use ndarray::Array3;

    fn unit_charge_at_origin() -> Arc<Molecule> {
        Arc::new(Molecule::from_atoms(vec![Atom::new(
            1,
            Element::NA,
            1.0,
            [0.0, 0.0, 0.0],
        )]))
    }

    fn axis_template() -> Cube {
        Cube::placeholder(grid([0.0; 3], [1.0; 3], [3, 1, 1]), Arc::new(Molecule::new()))
    }

    #[test]
    fn single_charge_follows_coulomb_law() {
        let out = reproduce_field(&axis_template(), &unit_charge_at_origin()).unwrap();
        assert_eq!(out.values()[[1, 0, 0]], 1.0);
        assert_eq!(out.values()[[2, 0, 0]], 0.5);
        assert_eq!(out.field_type(), REPRODUCED_FIELD_TYPE);
    }

    #[test]
    fn coincident_voxel_is_infinite() {
        let out = reproduce_field(&axis_template(), &unit_charge_at_origin()).unwrap();
        assert_eq!(out.values()[[0, 0, 0]], f64::INFINITY);
    }

    #[test]
    fn charges_superpose() {
        let molecule = Arc::new(Molecule::from_atoms(vec![
            Atom::new(1, Element::O, -0.8, [0.0, 0.0, 0.0]),
            Atom::new(2, Element::H, 0.4, [4.0, 0.0, 0.0]),
        ]));
        let template = Cube::placeholder(grid([2.0, 0.0, 0.0], [1.0; 3], [1, 1, 1]), molecule.clone());
        let out = reproduce_field(&template, &molecule).unwrap();
        assert!((out.values()[[0, 0, 0]] - (-0.4 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn result_shares_template_grid_and_carries_molecule() {
        let template = axis_template();
        let molecule = unit_charge_at_origin();
        let out = reproduce_field(&template, &molecule).unwrap();
        assert!(Arc::ptr_eq(out.shared_grid(), template.shared_grid()));
        assert!(Arc::ptr_eq(out.shared_molecule(), &molecule));
    }

    #[test]
    fn missing_position_is_reported() {
        let molecule = Arc::new(Molecule::from_atoms(vec![Atom::without_position(3, Element::C, 0.1)]));
        let err = reproduce_field(&axis_template(), &molecule).unwrap_err();
        assert!(matches!(err, Error::MissingGeometry { label: 3 }));
    }

    #[test]
    fn error_field_is_reproduction_minus_reference() {
        let molecule = unit_charge_at_origin();
        let reference = Cube::new(
            grid([0.0; 3], [1.0; 3], [3, 1, 1]),
            molecule.clone(),
            Array3::from_shape_vec((3, 1, 1), vec![2.0, 0.75, -1.0]).unwrap(),
        )
        .unwrap();

        let reproduced = reproduce_field(&reference, &molecule).unwrap();
        let error = error_field(&reference, &molecule).unwrap();
        assert_eq!(error.field_type(), ERROR_FIELD_TYPE);
        assert_eq!(error.values(), &(reproduced.values() - reference.values()));
        assert_eq!(error.values()[[0, 0, 0]], f64::INFINITY);
        assert_eq!(error.values()[[1, 0, 0]], 0.25);
        assert_eq!(error.values()[[2, 0, 0]], 1.5);
    }

    #[test]
    fn chunking_does_not_change_reconstruction() {
        let molecule = Arc::new(Molecule::from_atoms(vec![
            Atom::new(1, Element::O, -0.8, [0.3, 0.1, 0.2]),
            Atom::new(2, Element::H, 0.4, [1.1, 0.9, -0.4]),
            Atom::new(3, Element::H, 0.4, [-0.7, 0.6, 0.5]),
        ]));
        let template = Cube::placeholder(grid([-2.0; 3], [0.5; 3], [6, 5, 4]), molecule.clone());
        let reference = reproduce_field(&template, &molecule).unwrap();
        let config = FieldConfig {
            chunk_size: 7,
            ..FieldConfig::default()
        };
        let chunked = reproduce_field_with(&template, &molecule, &config).unwrap();
        assert_eq!(chunked.values(), reference.values());
    }
}
