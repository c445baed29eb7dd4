use std::path::Path;

use anyhow::{Context, Result};
use cube_forge::{BinaryOp, Cube, CubeReadOptions};

use crate::cli::{AbsArgs, ArithArgs};
use crate::config::{build_field_config, describe_field_config};
use crate::display::{Context as DisplayContext, Progress, print_field_summary};
use crate::io::load_cube;

use super::write_output;

enum RightOperand {
    Scalar(f64),
    Cube(Box<Cube>),
}

pub fn run_arith(args: ArithArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_field_config(&args.engine)?;
    let options = CubeReadOptions::default();

    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading operands");
    let left = load_cube(&args.left, &options)?;
    let right = match args.right.trim().parse::<f64>() {
        Ok(value) => RightOperand::Scalar(value),
        Err(_) => RightOperand::Cube(Box::new(load_cube(Path::new(&args.right), &options)?)),
    };
    progress.done(
        Some(&left),
        &[
            format!("Left: {}", args.left.display()),
            match &right {
                RightOperand::Scalar(value) => format!("Right: scalar {}", value),
                RightOperand::Cube(_) => format!("Right: {}", args.right),
            },
        ],
    );

    progress.begin("Combining fields");
    let result = match &right {
        RightOperand::Scalar(value) => left.apply(args.op, *value, config.division),
        RightOperand::Cube(cube) => left.apply(args.op, cube.as_ref(), config.division),
    }
    .with_context(|| format!("Cannot evaluate {} {} {}", args.left.display(), args.op, args.right))?;

    let mut substeps = vec![format!("Operator: {}", args.op)];
    if args.op == BinaryOp::Div {
        substeps.push(describe_field_config(&config));
    }
    progress.done(Some(&result), &substeps);

    write_output(&mut progress, &result, &args.output)?;

    if ctx.interactive {
        print_field_summary("Result Statistics", &result.summary());
    }
    progress.finish();

    Ok(())
}

pub fn run_abs(args: AbsArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive);

    progress.begin("Reading cube");
    let cube = load_cube(&args.input, &CubeReadOptions::default())?;
    progress.done(Some(&cube), &[args.input.display().to_string()]);

    progress.begin("Taking absolute values");
    let result = cube.abs();
    progress.done(None, &[]);

    write_output(&mut progress, &result, &args.output)?;

    if ctx.interactive {
        print_field_summary("Result Statistics", &result.summary());
    }
    progress.finish();

    Ok(())
}

