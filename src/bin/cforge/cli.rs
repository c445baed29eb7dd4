use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cube_forge::{AtomSelector, BinaryOp};

#[derive(Parser)]
#[command(
    name = "cforge",
    about = "Gaussian cube field analysis and point-charge potential reconstruction",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize a cube file: grid, atoms and value statistics
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Combine a cube with another cube or a scalar
    #[command(visible_alias = "a")]
    Arith(ArithArgs),

    /// Take the absolute value of every voxel
    Abs(AbsArgs),

    /// Label voxels by their closest atom, or by the distance to it
    #[command(visible_alias = "l")]
    Label(LabelArgs),

    /// Keep only the voxels closest to selected atoms
    Mask(MaskArgs),

    /// Rebuild the potential from point charges on a reference grid
    #[command(visible_alias = "r")]
    Reproduce(ReproduceArgs),
}

/// Options shared by all commands.
#[derive(Args)]
pub struct GlobalOptions {
    /// Suppress banner, progress and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug details (parse and engine milestones)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Engine settings shared by the commands that compute fields.
#[derive(Args)]
#[command(next_help_heading = "Engine Options")]
pub struct EngineOptions {
    /// TOML file with engine settings (chunk_size, division)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Voxels evaluated per block by the distance and potential engines
    #[arg(long = "chunk-size", value_name = "N")]
    pub chunk_size: Option<usize>,

    /// Make division multiply, as older charge-analysis tools did
    #[arg(long = "legacy-division")]
    pub legacy_division: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Cube file to inspect
    #[arg(value_name = "CUBE")]
    pub input: PathBuf,

    /// Read the header only and skip value statistics
    #[arg(long = "header-only")]
    pub header_only: bool,
}

#[derive(Args)]
pub struct ArithArgs {
    /// Left-hand cube
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Operator: + - * / ^ or add, sub, mul, div, pow
    #[arg(value_name = "OP", allow_hyphen_values = true)]
    pub op: BinaryOp,

    /// Right-hand cube file or a number
    #[arg(value_name = "RIGHT", allow_hyphen_values = true)]
    pub right: String,

    /// Output cube file (must not exist)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineOptions,
}

#[derive(Args)]
pub struct AbsArgs {
    /// Input cube
    #[arg(value_name = "CUBE")]
    pub input: PathBuf,

    /// Output cube file (must not exist)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct LabelArgs {
    /// Cube whose grid and atoms are used
    #[arg(value_name = "CUBE")]
    pub input: PathBuf,

    /// Candidate atoms by label or element symbol, repeatable (all atoms if omitted)
    #[arg(long = "atom", value_name = "SEL", action = clap::ArgAction::Append)]
    pub atoms: Vec<AtomSelector>,

    /// Write the distance to the closest atom instead of its label
    #[arg(long)]
    pub distance: bool,

    /// Output cube file (must not exist)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineOptions,
}

#[derive(Args)]
pub struct MaskArgs {
    /// Cube whose values are masked
    #[arg(value_name = "CUBE")]
    pub input: PathBuf,

    /// Atoms whose regions are kept, by label or element symbol, repeatable
    #[arg(long = "keep", value_name = "SEL", required = true, action = clap::ArgAction::Append)]
    pub keep: Vec<AtomSelector>,

    /// Atoms competing for voxels, repeatable (all atoms if omitted)
    #[arg(long = "among", value_name = "SEL", action = clap::ArgAction::Append)]
    pub among: Vec<AtomSelector>,

    /// Output cube file (must not exist)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineOptions,
}

#[derive(Args)]
pub struct ReproduceArgs {
    /// Reference cube supplying the grid (and the potential for --error)
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Charge source: charge list (.txt), Gaussian log (.log) or AnteChamber file (.ac)
    #[arg(short, long, value_name = "FILE", required_unless_present = "ac")]
    pub charges: Option<PathBuf>,

    /// AnteChamber file to take charges from, whatever its extension.
    /// Its coordinates are ignored; positions always come from the cube header.
    #[arg(long, value_name = "FILE", conflicts_with = "charges")]
    pub ac: Option<PathBuf>,

    /// Write reproduced minus reference instead of the reproduced potential
    #[arg(long)]
    pub error: bool,

    /// Output cube file (must not exist)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}
