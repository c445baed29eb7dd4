mod arith;
mod info;
mod label;
mod reproduce;

use std::path::Path;

use anyhow::Result;
use cube_forge::Cube;

use crate::cli::Command;
use crate::display::{Context, Progress};
use crate::io::save_cube;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Info(args) => info::run_info(args, ctx),
        Command::Arith(args) => arith::run_arith(args, ctx),
        Command::Abs(args) => arith::run_abs(args, ctx),
        Command::Label(args) => label::run_label(args, ctx),
        Command::Mask(args) => label::run_mask(args, ctx),
        Command::Reproduce(args) => reproduce::run_reproduce(args, ctx),
    }
}

fn write_output(progress: &mut Progress, cube: &Cube, path: &Path) -> Result<()> {
    progress.begin("Writing output");
    save_cube(cube, path)?;
    progress.done(None, &[format!("Cube: {}", path.display())]);
    Ok(())
}
