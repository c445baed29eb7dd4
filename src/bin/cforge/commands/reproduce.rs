use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cube_forge::io::charges::ChargeProvenance;
use cube_forge::{CubeReadOptions, Molecule, error_field_with, reproduce_field_with};

use crate::cli::ReproduceArgs;
use crate::config::{build_field_config, describe_field_config};
use crate::display::{Context as DisplayContext, Progress, print_field_summary};
use crate::io::{load_ac_charges, load_charges, load_cube};

use super::write_output;

pub fn run_reproduce(args: ReproduceArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_field_config(&args.engine)?;

    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading reference cube");
    let options = if args.error {
        CubeReadOptions::default()
    } else {
        CubeReadOptions::header_only()
    };
    let reference = load_cube(&args.reference, &options)?;
    progress.done(
        Some(&reference),
        &[if args.error {
            "Values loaded for comparison".to_string()
        } else {
            "Header only".to_string()
        }],
    );

    progress.begin("Assembling point charges");
    let (molecule, substeps) = resolve_molecule(
        reference.molecule(),
        args.charges.as_deref(),
        args.ac.as_deref(),
    )?;
    progress.done(None, &substeps);

    let description = if args.error {
        "Computing potential error"
    } else {
        "Reconstructing potential"
    };
    progress.begin(description);
    let molecule = Arc::new(molecule);
    let result = if args.error {
        error_field_with(&reference, &molecule, &config)
    } else {
        reproduce_field_with(&reference, &molecule, &config)
    }
    .context("Point-charge reconstruction failed")?;
    progress.done(
        Some(&result),
        &[
            format!("{} point charges", molecule.atom_count()),
            describe_field_config(&config),
        ],
    );

    write_output(&mut progress, &result, &args.output)?;

    if ctx.interactive {
        let title = if args.error {
            "Error Statistics"
        } else {
            "Reconstructed Potential"
        };
        print_field_summary(title, &result.summary());
    } else if args.error {
        let summary = result.summary();
        log::info!(
            "Potential error: rms {:e}, min {:e}, max {:e} over {} finite voxels",
            summary.rms,
            summary.min,
            summary.max,
            summary.finite
        );
    }
    progress.finish();

    Ok(())
}

/// Puts charges from `--charges` (or `--ac`) on the cube header atoms. The
/// header positions are kept whatever the charge source.
fn resolve_molecule(
    header: &Molecule,
    charges: Option<&Path>,
    ac: Option<&Path>,
) -> Result<(Molecule, Vec<String>)> {
    let (path, set) = match (charges, ac) {
        (Some(path), _) => (path, load_charges(path, header)?),
        (None, Some(path)) => (path, load_ac_charges(path, header)?),
        (None, None) => bail!("No charges given; pass --charges FILE or --ac FILE"),
    };

    let molecule = set.molecule;
    let substeps = vec![
        format!("Geometry: cube header ({} atoms)", molecule.atom_count()),
        format!("Charges: {}", path.display()),
        describe_provenance(&set.provenance),
        format!("Total charge: {:+.4}", molecule.total_atomic_charge()),
    ];
    Ok((molecule, substeps))
}

fn describe_provenance(provenance: &ChargeProvenance) -> String {
    let mut text = match (provenance.method, provenance.sampling) {
        (Some(method), Some(sampling)) => format!("Method: {} ({})", method, sampling),
        (Some(method), None) => format!("Method: {}", method),
        (None, _) => "Method: unknown".to_string(),
    };

    let flags: Vec<&str> = [
        (provenance.restrained, "restrained"),
        (provenance.averaged, "averaged"),
        (provenance.equivalenced, "equivalenced"),
        (provenance.compromised, "compromise"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();

    if !flags.is_empty() {
        text.push_str(&format!(", {}", flags.join(", ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_forge::io::charges::{ChargeMethod, SamplingScheme};
    use cube_forge::{Atom, Cube, Element, GridMetadata, reproduce_field};
    use ndarray::Array3;
    use std::fs;
    use tempfile::TempDir;

    const HYDROGEN_AC: &str = "\
CHARGE      1.00 ( 1 )
ATOM      1  H1  MOL     1       1.000   0.000   0.000  1.000000        h
";

    /// Header-only template: one hydrogen at x = 3 and voxels at x = 0 and 1.
    fn hydrogen_template(dir: &Path) -> Cube {
        let grid = Arc::new(GridMetadata::new([0.0; 3], [1.0; 3], [2, 1, 1]).unwrap());
        let molecule = Arc::new(Molecule::from_atoms(vec![Atom::new(
            1,
            Element::H,
            0.0,
            [3.0, 0.0, 0.0],
        )]));
        let path = dir.join("h.cube");
        Cube::new(grid, molecule, Array3::zeros((2, 1, 1)))
            .unwrap()
            .save(&path)
            .unwrap();
        load_cube(&path, &CubeReadOptions::header_only()).unwrap()
    }

    #[test]
    fn ac_charges_keep_the_cube_header_geometry() {
        let dir = TempDir::new().unwrap();
        let template = hydrogen_template(dir.path());
        let ac = dir.path().join("h.ac");
        let list = dir.path().join("h.txt");
        fs::write(&ac, HYDROGEN_AC).unwrap();
        fs::write(&list, "1.0\n").unwrap();

        let (via_charges, _) = resolve_molecule(template.molecule(), Some(ac.as_path()), None).unwrap();
        let (via_ac_flag, _) = resolve_molecule(template.molecule(), None, Some(ac.as_path())).unwrap();
        let (via_list, substeps) = resolve_molecule(template.molecule(), Some(list.as_path()), None).unwrap();

        assert_eq!(via_charges.atoms[0].position, Some([3.0, 0.0, 0.0]));
        assert_eq!(via_charges, via_list);
        assert_eq!(via_ac_flag, via_list);
        assert_eq!(substeps[0], "Geometry: cube header (1 atoms)");

        let from_ac = reproduce_field(&template, &Arc::new(via_charges)).unwrap();
        let from_list = reproduce_field(&template, &Arc::new(via_list)).unwrap();
        assert_eq!(from_ac.values(), from_list.values());
        assert!((from_ac.values()[[1, 0, 0]] - 0.5).abs() < 1e-12);
        assert!(from_ac.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ac_with_a_different_atom_count_is_rejected() {
        let dir = TempDir::new().unwrap();
        let template = hydrogen_template(dir.path());
        let ac = dir.path().join("h2.ac");
        let two_atoms = format!(
            "{HYDROGEN_AC}ATOM      2  H2  MOL     1       1.740   0.000   0.000  0.000000        h\n"
        );
        fs::write(&ac, two_atoms).unwrap();

        let err = resolve_molecule(template.molecule(), None, Some(ac.as_path())).unwrap_err();
        assert!(err.to_string().contains("has 2 atoms"), "{err}");
    }

    #[test]
    fn missing_charge_source_is_an_error() {
        let molecule = Molecule::from_atoms(Vec::new());
        assert!(resolve_molecule(&molecule, None, None).is_err());
    }

    #[test]
    fn provenance_without_a_method_is_unknown() {
        assert_eq!(
            describe_provenance(&ChargeProvenance::default()),
            "Method: unknown"
        );
    }

    #[test]
    fn provenance_lists_sampling_and_flags() {
        let provenance = ChargeProvenance {
            method: Some(ChargeMethod::Esp),
            sampling: Some(SamplingScheme::ChelpG),
            restrained: true,
            equivalenced: true,
            ..ChargeProvenance::default()
        };
        let text = describe_provenance(&provenance);
        assert!(text.starts_with(&format!(
            "Method: {} ({})",
            ChargeMethod::Esp,
            SamplingScheme::ChelpG
        )));
        assert!(text.ends_with(", restrained, equivalenced"));
    }
}
