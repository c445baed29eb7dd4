use std::io::{self, Write};
use std::time::{Duration, Instant};

use cube_forge::Cube;
use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(80);

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

/// Step reporter for one command.
///
/// On a terminal each step runs under a spinner and leaves a ✓ line with its
/// time. Otherwise steps go to the log. Steps that produce or read a cube
/// report its grid and atom counts.
pub struct Progress {
    spinner: Option<ProgressBar>,
    interactive: bool,
    started: Instant,
    step_started: Instant,
    task: &'static str,
    steps: usize,
    largest_grid: usize,
}

impl Progress {
    pub fn new(interactive: bool) -> Self {
        let now = Instant::now();
        Self {
            spinner: None,
            interactive,
            started: now,
            step_started: now,
            task: "",
            steps: 0,
            largest_grid: 0,
        }
    }

    pub fn begin(&mut self, task: &'static str) {
        self.clear_spinner();
        self.task = task;
        self.step_started = Instant::now();

        if self.interactive {
            let bar = ProgressBar::new_spinner().with_style(spinner_style());
            bar.enable_steady_tick(TICK);
            bar.set_message(format!("{task}..."));
            self.spinner = Some(bar);
        } else {
            log::debug!("{task}...");
        }
    }

    /// Ends the current step. `cube` is the grid the step read or built.
    pub fn done(&mut self, cube: Option<&Cube>, notes: &[String]) {
        self.clear_spinner();
        self.steps += 1;

        let mut lines = Vec::with_capacity(notes.len() + 1);
        if let Some(cube) = cube {
            self.largest_grid = self.largest_grid.max(cube.grid().voxel_count());
            lines.push(describe_cube(cube));
        }
        lines.extend(notes.iter().cloned());

        if self.interactive {
            let _ = write_step(
                &mut io::stderr().lock(),
                self.task,
                self.step_started.elapsed(),
                &lines,
            );
        } else if lines.is_empty() {
            log::info!("{}", self.task);
        } else {
            log::info!("{}: {}", self.task, lines.join("; "));
        }
    }

    pub fn finish(mut self) {
        self.clear_spinner();
        let elapsed = self.started.elapsed();
        if self.interactive {
            let _ = write_footer(&mut io::stderr().lock(), elapsed, self.steps, self.largest_grid);
        } else {
            log::debug!("{} steps in {:.2}s", self.steps, elapsed.as_secs_f64());
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}

/// One-line grid summary: shape, voxel total, atoms and field type.
fn describe_cube(cube: &Cube) -> String {
    let grid = cube.grid();
    let [nx, ny, nz] = grid.n_voxels();
    format!(
        "{nx}×{ny}×{nz} grid ({} voxels), {} atoms, {}",
        grid.voxel_count(),
        cube.molecule().atom_count(),
        cube.field_type()
    )
}

fn write_step(
    out: &mut impl Write,
    task: &str,
    elapsed: Duration,
    lines: &[String],
) -> io::Result<()> {
    writeln!(
        out,
        "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
        task,
        elapsed.as_secs_f64()
    )?;
    for line in lines {
        writeln!(out, "      \x1b[2m·\x1b[0m {line}")?;
    }
    Ok(())
}

fn write_footer(
    out: &mut impl Write,
    elapsed: Duration,
    steps: usize,
    largest_grid: usize,
) -> io::Result<()> {
    let noun = if steps == 1 { "step" } else { "steps" };
    let label = if largest_grid > 0 {
        format!("{steps} {noun}, {largest_grid} voxels")
    } else {
        format!("{steps} {noun}")
    };
    writeln!(out)?;
    writeln!(
        out,
        "  \x1b[32m✓\x1b[0m {:<32} {:>18}",
        label,
        format!("{:.2}s", elapsed.as_secs_f64())
    )?;
    writeln!(out)
}
