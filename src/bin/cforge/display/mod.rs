mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_cube_info, print_element_distribution, print_field_summary};

use crate::cli::GlobalOptions;

/// Terminal mode of one `cforge` run, fixed before any command starts.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Spinners, tables and the banner go to stderr.
    pub interactive: bool,
    quiet: bool,
    verbose: bool,
}

impl Context {
    pub fn from_options(options: &GlobalOptions) -> Self {
        Self::new(crate::io::stderr_is_tty(), options.quiet, options.verbose)
    }

    fn new(stderr_is_tty: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            interactive: stderr_is_tty && !quiet,
            quiet,
            verbose,
        }
    }

    /// Default `env_logger` filter; `RUST_LOG` overrides it.
    ///
    /// Interactive runs stop at warnings since steps are already on screen.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else if self.interactive {
            "warn"
        } else {
            "info"
        }
    }
}
