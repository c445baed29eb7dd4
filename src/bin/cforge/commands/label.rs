use anyhow::{Context, Result};
use cube_forge::{AtomSelector, Cube, CubeReadOptions};

use crate::cli::{LabelArgs, MaskArgs};
use crate::config::{build_field_config, describe_field_config};
use crate::display::{Context as DisplayContext, Progress, print_field_summary};
use crate::io::load_cube;

use super::write_output;

const LABEL_FIELD_TYPE: &str = "closest atom label";
const DISTANCE_FIELD_TYPE: &str = "distance to closest atom";
const MASK_FIELD_TYPE: &str = "potential masked by closest atom";

pub fn run_label(args: LabelArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_field_config(&args.engine)?;

    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading cube");
    let cube = load_cube(&args.input, &CubeReadOptions::header_only())?;
    progress.done(Some(&cube), &["Header only".to_string()]);

    let description = if args.distance {
        "Measuring distance to closest atom"
    } else {
        "Labelling voxels by closest atom"
    };
    progress.begin(description);
    let result = if args.distance {
        let distances = cube
            .distance_to_closest_atom_with(&args.atoms, &config)
            .context("Distance computation failed")?;
        Cube::assign_new_values_to(&cube, distances)?.with_field_type(DISTANCE_FIELD_TYPE)
    } else {
        let labels = cube
            .closest_atom_with(&args.atoms, &config)
            .context("Closest-atom labelling failed")?;
        Cube::assign_new_values_to(&cube, labels.mapv(|label| label as f64))?
            .with_field_type(LABEL_FIELD_TYPE)
    };
    progress.done(
        Some(&result),
        &[
            format!("Candidates: {}", describe_selection(&args.atoms)),
            describe_field_config(&config),
        ],
    );

    write_output(&mut progress, &result, &args.output)?;

    if ctx.interactive && args.distance {
        print_field_summary("Distance Statistics", &result.summary());
    }
    progress.finish();

    Ok(())
}

pub fn run_mask(args: MaskArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_field_config(&args.engine)?;

    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading cube");
    let cube = load_cube(&args.input, &CubeReadOptions::default())?;
    progress.done(Some(&cube), &[]);

    progress.begin("Masking voxels by closest atom");
    let masked = cube
        .value_by_atom_with(&args.keep, &args.among, &config)
        .context("Masking by closest atom failed")?;
    let result = Cube::assign_new_values_to(&cube, masked)?.with_field_type(MASK_FIELD_TYPE);
    let summary = result.summary();
    progress.done(
        None,
        &[
            format!("Kept: {}", describe_selection(&args.keep)),
            format!("Among: {}", describe_selection(&args.among)),
            format!("{} of {} voxels kept", summary.finite, summary.total),
        ],
    );

    write_output(&mut progress, &result, &args.output)?;

    if ctx.interactive {
        print_field_summary("Masked Field Statistics", &summary);
    }
    progress.finish();

    Ok(())
}

fn describe_selection(selectors: &[AtomSelector]) -> String {
    if selectors.is_empty() {
        return "all atoms".to_string();
    }
    selectors
        .iter()
        .map(|selector| match selector {
            AtomSelector::Label(label) => format!("#{}", label),
            AtomSelector::Element(element) => element.symbol().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_forge::Element;

    #[test]
    fn empty_selection_reads_as_all_atoms() {
        assert_eq!(describe_selection(&[]), "all atoms");
    }

    #[test]
    fn selection_lists_labels_and_elements() {
        let selectors = [AtomSelector::Label(3), AtomSelector::Element(Element::O)];
        assert_eq!(describe_selection(&selectors), "#3, O");
    }
}
