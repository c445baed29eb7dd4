use crate::io::{Format, error::Error, util};
use crate::model::molecule::Molecule;
use std::io::BufRead;

/// Reads a whitespace-separated list of charges, one per atom of `base` in
/// atom order, and returns a copy of `base` carrying them.
///
/// The net charge of the result is the sum of the list.
pub fn read<R: BufRead>(reader: R, base: &Molecule) -> Result<Molecule, Error> {
    let mut charges = Vec::with_capacity(base.atom_count());
    let mut last_line = 1;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        last_line = i + 1;
        for token in line.split_whitespace() {
            let charge: f64 = util::parse_token(Format::ChargeList, last_line, Some(token), "charge")?;
            charges.push(util::int_if_close(charge));
        }
    }

    let mut molecule = base.with_charges(&charges).ok_or_else(|| {
        Error::parse(
            Format::ChargeList,
            last_line,
            format!(
                "found {} charges for a molecule of {} atoms; the list may describe a different molecule",
                charges.len(),
                base.atom_count()
            ),
        )
    })?;
    molecule.charge = util::int_if_close(molecule.charge);
    Ok(molecule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{atom::Atom, types::Element};
    use std::io::Cursor;

    fn hydroxide() -> Molecule {
        Molecule::from_atoms(vec![
            Atom::new(1, Element::O, 0.0, [0.0, 0.0, 0.0]),
            Atom::new(2, Element::H, 0.0, [0.97, 0.0, 0.0]),
        ])
    }

    #[test]
    fn charges_replace_base_charges_in_order() {
        let mol = read(Cursor::new("-1.3333\n  0.3333\n"), &hydroxide()).unwrap();
        assert_eq!(mol.atoms[0].charge, -1.3333);
        assert_eq!(mol.atoms[1].charge, 0.3333);
        assert_eq!(mol.atoms[1].position, Some([0.97, 0.0, 0.0]));
        assert_eq!(mol.charge, -1.0);
    }

    #[test]
    fn charges_may_share_a_line() {
        let mol = read(Cursor::new("-0.99999 0.0"), &hydroxide()).unwrap();
        assert_eq!(mol.atoms[0].charge, -1.0);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = read(Cursor::new("-1.0 0.5 0.5\n"), &hydroxide()).unwrap_err();
        match err {
            Error::Parse { format, details, .. } => {
                assert_eq!(format, Format::ChargeList);
                assert!(details.contains("3 charges"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_token_is_rejected() {
        let err = read(Cursor::new("-1.0\nabc\n"), &hydroxide()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }
}
