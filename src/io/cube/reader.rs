use super::writer::{FIELD_TYPE_PREFIX, GENERATOR_LINE};
use crate::field::cube::DEFAULT_FIELD_TYPE;
use crate::field::{Cube, GridMetadata};
use crate::io::{Format, error::Error, util};
use crate::model::{atom::Atom, molecule::Molecule, types::Element};
use log::{debug, warn};
use ndarray::Array3;
use std::io::BufRead;
use std::sync::Arc;

/// Upper bound on what a header count may reserve before the body is read.
const MAX_PREALLOCATION: usize = 1 << 20;

/// How [`read`] builds a [`Cube`].
#[derive(Debug, Clone, Default)]
pub struct CubeReadOptions {
    /// Stop after the header and use a zero-filled value array of the
    /// declared shape.
    pub header_only: bool,

    /// Field-type label for the cube. When unset it is recovered from the
    /// comment line this crate writes, falling back to `"potential"`.
    pub field_type: Option<String>,

    /// Molecule to attach instead of the one described by the header atoms.
    pub base_molecule: Option<Arc<Molecule>>,
}

impl CubeReadOptions {
    pub fn header_only() -> Self {
        Self {
            header_only: true,
            ..Self::default()
        }
    }
}

struct Lines<R> {
    inner: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn next(&mut self) -> Result<Option<String>, Error> {
        match self.inner.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn require(&mut self, what: &str) -> Result<String, Error> {
        self.next()?.ok_or_else(|| {
            Error::parse(
                Format::Cube,
                self.line_no + 1,
                format!("unexpected end of file while reading {what}"),
            )
        })
    }
}

pub fn read<R: BufRead>(reader: R, options: &CubeReadOptions) -> Result<Cube, Error> {
    let mut lines = Lines {
        inner: reader.lines(),
        line_no: 0,
    };

    let title = lines.require("the first comment line")?;
    let comment = lines.require("the second comment line")?;
    let field_type = resolve_field_type(&title, &comment, options);

    let line = lines.require("the atom count and origin")?;
    let ln = lines.line_no;
    let mut tokens = line.split_whitespace();
    let n_atoms: i64 = util::parse_token(Format::Cube, ln, tokens.next(), "atom count")?;
    if n_atoms < 0 {
        return Err(Error::parse(
            Format::Cube,
            ln,
            format!("negative atom count {n_atoms} (orbital cubes are not supported)"),
        ));
    }
    let origin = util::parse_vec3(Format::Cube, ln, &mut tokens, "origin")?;
    if let Some(n_values) = tokens.next() {
        if n_values != "1" {
            warn!("Cube declares {n_values} values per voxel; only a single value is supported");
        }
    }

    let mut counts = [0i64; 3];
    let mut rows = [[0.0; 3]; 3];
    for axis in 0..3 {
        let line = lines.require("the axis lines")?;
        let ln = lines.line_no;
        let mut tokens = line.split_whitespace();
        counts[axis] = util::parse_token(Format::Cube, ln, tokens.next(), "voxel count")?;
        rows[axis] = util::parse_vec3(Format::Cube, ln, &mut tokens, "axis vector")?;
    }
    let grid = GridMetadata::from_header(origin, rows, counts)
        .map_err(|e| Error::parse(Format::Cube, lines.line_no, e.to_string()))?;
    let grid = Arc::new(grid);

    let n_atoms = n_atoms as usize;
    let mut atoms = Vec::with_capacity(n_atoms.min(MAX_PREALLOCATION));
    for index in 0..n_atoms {
        let line = lines.require("the atom lines")?;
        atoms.push(parse_atom_line(&line, lines.line_no, index + 1)?);
    }

    let molecule = match &options.base_molecule {
        Some(base) => {
            if base.atom_count() != atoms.len() {
                warn!(
                    "Base molecule has {} atoms but the cube header lists {}",
                    base.atom_count(),
                    atoms.len()
                );
            }
            Arc::clone(base)
        }
        None => Arc::new(Molecule::from_atoms(atoms)),
    };

    debug!(
        "Parsed cube header: {:?} voxels, {} atoms, field type '{}'",
        grid.n_voxels(),
        molecule.atom_count(),
        field_type
    );

    if options.header_only {
        return Ok(Cube::placeholder(grid, molecule).with_field_type(field_type));
    }

    let values = read_values(&mut lines, &grid)?;
    Ok(Cube::new(grid, molecule, values)?.with_field_type(field_type))
}

fn resolve_field_type(title: &str, comment: &str, options: &CubeReadOptions) -> String {
    if let Some(field_type) = &options.field_type {
        return field_type.clone();
    }
    let recovered = comment
        .trim()
        .strip_prefix(FIELD_TYPE_PREFIX.trim_start())
        .and_then(|rest| rest.strip_suffix('.'))
        .map(str::trim)
        .filter(|rest| !rest.is_empty());
    match recovered {
        Some(field_type) => field_type.to_string(),
        None => {
            if title.trim() == GENERATOR_LINE.trim() {
                warn!("Could not recover the field type from '{}'", comment.trim());
            }
            DEFAULT_FIELD_TYPE.to_string()
        }
    }
}

fn parse_atom_line(line: &str, ln: usize, label: usize) -> Result<Atom, Error> {
    let mut tokens = line.split_whitespace();
    let number: i64 = util::parse_token(Format::Cube, ln, tokens.next(), "atomic number")?;
    let element = u8::try_from(number)
        .ok()
        .and_then(Element::from_atomic_number)
        .ok_or_else(|| Error::parse(Format::Cube, ln, format!("unknown atomic number {number}")))?;
    let encoded: f64 = util::parse_token(Format::Cube, ln, tokens.next(), "atom charge")?;
    let position = util::parse_vec3(Format::Cube, ln, &mut tokens, "atom position")?;
    let charge = util::int_if_close(encoded - number as f64);
    Ok(Atom::new(label, element, charge, position))
}

fn read_values<R: BufRead>(lines: &mut Lines<R>, grid: &GridMetadata) -> Result<Array3<f64>, Error> {
    let expected = grid.voxel_count();
    let mut values = Vec::with_capacity(expected.min(MAX_PREALLOCATION));

    while let Some(line) = lines.next()? {
        for token in line.split_whitespace() {
            if values.len() == expected {
                return Err(Error::parse(
                    Format::Cube,
                    lines.line_no,
                    format!("more values than the {expected} voxels declared in the header"),
                ));
            }
            let value = token.parse::<f64>().map_err(|_| {
                Error::parse(Format::Cube, lines.line_no, format!("invalid field value '{token}'"))
            })?;
            values.push(value);
        }
    }

    if values.len() != expected {
        return Err(Error::parse(
            Format::Cube,
            lines.line_no,
            format!(
                "value block ended after {} of {expected} voxels",
                values.len()
            ),
        ));
    }

    Array3::from_shape_vec(grid.shape(), values)
        .map_err(|e| Error::parse(Format::Cube, lines.line_no, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const WATER: &str = "\
 Gaussian cube
 Electrostatic potential from Total SCF Density
    3   -1.000000   -2.000000    0.500000    1
    2    0.500000    0.000000    0.000000
    3    0.000000    0.250000    0.000000
    2    0.000000    0.000000    1.000000
    8   7.200000    0.000000    0.000000    0.220000
    1   0.600000    0.000000    1.430000   -0.880000
    1   1.000000    0.000000   -1.430000   -0.880000
 1.00000E-01 2.00000E-01
 3.00000E-01 4.00000E-01
 5.00000E-01 6.00000E-01
 -1.00000E+00 -2.00000E+00
 -3.00000E+00 -4.00000E+00
 -5.00000E+00 -6.00000E+00
";

    #[test]
    fn reads_header_atoms_and_values() {
        let cube = read(Cursor::new(WATER), &CubeReadOptions::default()).unwrap();
        assert_eq!(cube.shape(), [2, 3, 2]);
        assert_eq!(cube.grid().origin(), [-1.0, -2.0, 0.5]);
        assert_eq!(cube.grid().steps(), [0.5, 0.25, 1.0]);
        assert_eq!(cube.field_type(), "potential");

        let molecule = cube.molecule();
        assert_eq!(molecule.atom_count(), 3);
        assert_eq!(molecule.atoms[0].element, Element::O);
        assert!((molecule.atoms[0].charge + 0.8).abs() < 1e-12);
        assert!((molecule.atoms[1].charge + 0.4).abs() < 1e-12);
        assert_eq!(molecule.atoms[2].charge, 0.0);
        assert_eq!(molecule.atoms[2].label, 3);
        assert_eq!(molecule.atoms[1].position, Some([0.0, 1.43, -0.88]));

        assert_eq!(cube.values()[[0, 0, 1]], 0.2);
        assert_eq!(cube.values()[[0, 1, 0]], 0.3);
        assert_eq!(cube.values()[[1, 0, 0]], -1.0);
        assert_eq!(cube.values()[[1, 2, 1]], -6.0);
    }

    #[test]
    fn header_only_skips_the_value_block() {
        let header: String = WATER.lines().take(9).map(|l| format!("{l}\n")).collect();
        let cube = read(Cursor::new(header), &CubeReadOptions::header_only()).unwrap();
        assert_eq!(cube.values().dim(), (2, 3, 2));
        assert!(cube.values().iter().all(|&v| v == 0.0));
        assert_eq!(cube.molecule().atom_count(), 3);
    }

    #[test]
    fn base_molecule_replaces_header_atoms() {
        let base = Arc::new(Molecule::from_atoms(vec![Atom::without_position(
            1,
            Element::C,
            0.0,
        )]));
        let options = CubeReadOptions {
            base_molecule: Some(Arc::clone(&base)),
            field_type: Some("density".into()),
            ..CubeReadOptions::default()
        };
        let cube = read(Cursor::new(WATER), &options).unwrap();
        assert!(Arc::ptr_eq(cube.shared_molecule(), &base));
        assert_eq!(cube.field_type(), "density");
    }

    #[test]
    fn truncated_value_block_is_rejected() {
        let truncated: String = WATER.lines().take(13).map(|l| format!("{l}\n")).collect();
        let err = read(Cursor::new(truncated), &CubeReadOptions::default()).unwrap_err();
        match err {
            Error::Parse { format, details, .. } => {
                assert_eq!(format, Format::Cube);
                assert!(details.contains("8 of 12"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn surplus_values_are_rejected() {
        let text = format!("{WATER} 7.00000E+00\n");
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 16, .. }));
    }

    #[test]
    fn skewed_axes_are_a_format_error() {
        let text = WATER.replace(
            "    3    0.000000    0.250000    0.000000",
            "    3    0.100000    0.250000    0.000000",
        );
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 6, .. }));
    }

    #[test]
    fn negative_atom_count_is_a_format_error() {
        let text = WATER.replacen("    3   -1.000000", "   -3   -1.000000", 1);
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn overflowing_voxel_counts_are_a_format_error() {
        let text = " t\n c\n 0 0.0 0.0 0.0\n 10000000 1.0 0.0 0.0\n 10000000 0.0 1.0 0.0\n 10000000 0.0 0.0 1.0\n 1.0 2.0\n";
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        match err {
            Error::Parse { format, line, details } => {
                assert_eq!(format, Format::Cube);
                assert_eq!(line, 6);
                assert!(details.contains("exceeds the limit"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn large_grid_with_short_body_reports_missing_values() {
        let text = " t\n c\n 0 0.0 0.0 0.0\n 1000 1.0 0.0 0.0\n 1000 0.0 1.0 0.0\n 1000 0.0 0.0 1.0\n 1.0 2.0\n";
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        match err {
            Error::Parse { details, .. } => {
                assert!(details.contains("2 of 1000000000"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn huge_atom_count_with_missing_atom_lines_is_a_format_error() {
        let text = WATER.replacen("    3   -1.000000", " 4000000000000   -1.000000", 1);
        let header: String = text.lines().take(9).map(|l| format!("{l}\n")).collect();
        let err = read(Cursor::new(header), &CubeReadOptions::header_only()).unwrap_err();
        match err {
            Error::Parse { line, details, .. } => {
                assert_eq!(line, 10);
                assert!(details.contains("atom lines"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_value_reports_its_line() {
        let text = WATER.replace(" 5.00000E-01 6.00000E-01", " 5.00000E-01 abc");
        let err = read(Cursor::new(text), &CubeReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 12, .. }));
    }

    #[test]
    fn missing_header_lines_are_reported() {
        let err = read(Cursor::new(" title\n comment\n"), &CubeReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn field_type_is_recovered_from_generated_comment() {
        let text = WATER.replace(
            " Electrostatic potential from Total SCF Density",
            " Cube file for field of type potential error.",
        );
        let cube = read(Cursor::new(text), &CubeReadOptions::default()).unwrap();
        assert_eq!(cube.field_type(), "potential error");
    }
}
