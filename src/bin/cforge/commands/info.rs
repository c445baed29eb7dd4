use std::io::{self, Write};

use anyhow::Result;
use cube_forge::{Cube, CubeReadOptions};

use crate::cli::InfoArgs;
use crate::display::{
    Context as DisplayContext, Progress, print_cube_info, print_element_distribution,
    print_field_summary,
};
use crate::io::load_cube;

pub fn run_info(args: InfoArgs, ctx: DisplayContext) -> Result<()> {
    let options = if args.header_only {
        CubeReadOptions::header_only()
    } else {
        CubeReadOptions::default()
    };

    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading cube");
    let cube = load_cube(&args.input, &options)?;
    progress.done(Some(&cube), &[]);

    if ctx.interactive {
        print_cube_info(&cube);
        print_element_distribution(cube.molecule());
        if !args.header_only {
            print_field_summary("Field Statistics", &cube.summary());
        }
        progress.finish();
    } else {
        write_plain_report(&mut io::stdout().lock(), &cube, !args.header_only)?;
    }

    Ok(())
}

/// Line-oriented report for pipelines, one `key: value` per line.
fn write_plain_report(out: &mut impl Write, cube: &Cube, with_values: bool) -> Result<()> {
    let grid = cube.grid();
    let [nx, ny, nz] = grid.n_voxels();
    let origin = grid.origin();
    let steps = grid.steps();

    writeln!(out, "field_type: {}", cube.field_type())?;
    writeln!(out, "voxels: {} {} {}", nx, ny, nz)?;
    writeln!(out, "origin: {} {} {}", origin[0], origin[1], origin[2])?;
    writeln!(out, "steps: {} {} {}", steps[0], steps[1], steps[2])?;
    writeln!(out, "atoms: {}", cube.molecule().atom_count())?;

    for atom in &cube.molecule().atoms {
        let [x, y, z] = atom.position.unwrap_or([f64::NAN; 3]);
        writeln!(
            out,
            "atom {}: {} {:.6} {:.6} {:.6} {:.6}",
            atom.label, atom.element, atom.charge, x, y, z
        )?;
    }

    if with_values {
        let summary = cube.summary();
        writeln!(out, "min: {:e}", summary.min)?;
        writeln!(out, "max: {:e}", summary.max)?;
        writeln!(out, "mean: {:e}", summary.mean)?;
        writeln!(out, "rms: {:e}", summary.rms)?;
        writeln!(out, "finite: {}/{}", summary.finite, summary.total)?;
    }

    Ok(())
}
