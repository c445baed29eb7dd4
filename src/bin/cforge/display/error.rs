use std::io::{self, ErrorKind, Write};

use anyhow::Error;
use cube_forge::io::Format;
use cube_forge::{FieldError, IoError};

use crate::util::text::wrap;

/// Inner width of the panel, between the two `║` borders.
const INNER: usize = 62;

pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = write_panel(&mut stderr, err);
}

fn write_panel(out: &mut impl Write, err: &Error) -> io::Result<()> {
    writeln!(out)?;
    border(out, '╔', '═', '╗')?;
    row(out, 2, "✗ Error")?;

    let mut causes = err.chain();
    if let Some(top) = causes.next() {
        border(out, '╟', '─', '╢')?;
        wrapped(out, 2, "", &top.to_string())?;
    }
    for cause in causes {
        border(out, '╟', '─', '╢')?;
        row(out, 2, "Caused by:")?;
        wrapped(out, 4, "", &cause.to_string())?;
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        border(out, '╟', '─', '╢')?;
        row(out, 2, "Hints:")?;
        for hint in &hints {
            wrapped(out, 4, "• ", hint)?;
        }
    }

    border(out, '╚', '═', '╝')?;
    writeln!(out)
}

fn border(out: &mut impl Write, left: char, fill: char, right: char) -> io::Result<()> {
    let line: String = std::iter::repeat_n(fill, INNER).collect();
    writeln!(out, "   {left}{line}{right}")
}

fn row(out: &mut impl Write, indent: usize, text: &str) -> io::Result<()> {
    let width = INNER - indent - 1;
    writeln!(out, "   ║{:indent$}{:<width$} ║", "", text)
}

/// Wraps `text` under `bullet`; continuation lines are indented past it.
fn wrapped(out: &mut impl Write, indent: usize, bullet: &str, text: &str) -> io::Result<()> {
    let hang = bullet.chars().count();
    let lines = wrap(text, INNER - indent - hang - 1);
    for (i, line) in lines.iter().enumerate() {
        let lead = if i == 0 { bullet.to_string() } else { " ".repeat(hang) };
        row(out, indent, &format!("{lead}{line}"))?;
    }
    Ok(())
}

/// Hints for the first cause in the chain this tool knows how to explain.
fn hints_for(err: &Error) -> Vec<String> {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<IoError>() {
            return io_hints(io_err);
        }
        if let Some(field_err) = cause.downcast_ref::<FieldError>() {
            return field_hints(field_err);
        }
        if let Some(os_err) = cause.downcast_ref::<io::Error>() {
            return file_hints(os_err.kind());
        }
    }

    let text = err.to_string();
    if text.contains("charge format") || text.contains("No charges given") {
        return vec!["Pass charges as a .txt list, a Gaussian .log or an .ac file".into()];
    }
    Vec::new()
}

fn io_hints(err: &IoError) -> Vec<String> {
    match err {
        IoError::Io { source } => file_hints(source.kind()),
        IoError::Parse { format, line, .. } => {
            let mut hints = vec![format!("Look near line {line} of the {format} file")];
            hints.extend(format_hints(*format).iter().map(|h| h.to_string()));
            hints
        }
        IoError::UnrecognizedExtension(path) => vec![
            format!("No charge reader matches '{}'", path.display()),
            "Charge lists end in .txt, Gaussian logs in .log".into(),
        ],
        IoError::AlreadyExists(path) => vec![
            format!("'{}' is already there and cube files are never overwritten", path.display()),
            "Pick another -o path or move the old file away".into(),
        ],
        IoError::Field(field_err) => field_hints(field_err),
    }
}

fn file_hints(kind: ErrorKind) -> Vec<String> {
    let hints: &[&str] = match kind {
        ErrorKind::NotFound => &["The file does not exist; check the path"],
        ErrorKind::PermissionDenied => &["The file or its directory is not accessible"],
        ErrorKind::InvalidData => &["The file is not UTF-8 text; cube files are ASCII"],
        ErrorKind::UnexpectedEof => &["The file ends early; it may still be being written"],
        _ => &["Check the path, its permissions and the free disk space"],
    };
    hints.iter().map(|h| h.to_string()).collect()
}

fn format_hints(format: Format) -> &'static [&'static str] {
    match format {
        Format::Cube => &[
            "Cube: two comment lines, origin line, three axis lines, one line per atom",
            "Axis rows must be diagonal and the value block must hold nx·ny·nz numbers",
        ],
        Format::Ac => &["AC: a CHARGE record, then ATOM records with the charge in column 9"],
        Format::ChargeList => &["Charge list: one charge per atom, in the cube's atom order"],
        Format::GaussianLog => &[
            "Gaussian log: run with pop=MK, pop=CHELPG or pop=CHELP",
            "The log needs an 'ESP charges:' block ending in a Sum line",
        ],
    }
}

fn field_hints(err: &FieldError) -> Vec<String> {
    match err {
        FieldError::ShapeMismatch { expected, found } => vec![
            format!("Grids differ: {expected:?} voxels against {found:?}"),
            "Both cubes must come from the same grid specification".into(),
        ],
        FieldError::InvalidCondition { .. } | FieldError::UnsupportedOperand { .. } => {
            vec!["An array operand does not cover the whole grid".into()]
        }
        FieldError::MissingGeometry { label } => vec![format!(
            "Atom {label} has no coordinates; positions come from the cube header"
        )],
        FieldError::Selection(_) => vec![
            "Select atoms by 1-based label (3) or element symbol (O)".into(),
            "`cforge info <CUBE>` lists the header atoms".into(),
        ],
        FieldError::Config(_) => vec![
            "--config expects TOML with chunk_size and division keys".into(),
            "division is \"elementwise\" or \"legacy-multiply\"".into(),
        ],
        FieldError::InvalidConfig(_) => vec!["chunk_size must be a positive number of voxels".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    fn render(err: &Error) -> String {
        let mut buf = Vec::new();
        write_panel(&mut buf, err).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn panel_rows_share_one_width() {
        let err = Error::new(IoError::parse(Format::Cube, 6, "x axis step lies along y"))
            .context("Failed to read cube file: a_rather_long_directory_name/and/a/long/file_name.cube");
        let text = render(&err);

        let widths: Vec<usize> = text
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{text}");
        assert!(text.contains("Caused by:"));
        assert!(text.contains("Look near line 6 of the"));
    }

    #[test]
    fn existing_output_gets_an_overwrite_hint() {
        let err = Error::new(IoError::AlreadyExists(PathBuf::from("out.cube")));
        let hints = hints_for(&err);
        assert!(hints[0].contains("'out.cube'"));
        assert_eq!(hints.len(), 2);
    }

    #[test]
    fn bare_os_errors_are_explained() {
        let err: Error = Err::<(), _>(io::Error::from(ErrorKind::NotFound))
            .context("Failed to open AnteChamber file: h.ac")
            .unwrap_err();
        assert_eq!(hints_for(&err), vec!["The file does not exist; check the path"]);
    }

    #[test]
    fn untyped_errors_without_a_known_message_have_no_hints() {
        assert!(hints_for(&anyhow::anyhow!("something else")).is_empty());
    }
}
