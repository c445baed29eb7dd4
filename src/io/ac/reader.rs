use crate::io::{Format, error::Error, util};
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
    types::{BondOrder, Element},
};
use log::debug;
use std::io::BufRead;

/// Reads an AnteChamber `.ac` file.
///
/// The leading `CHARGE` record gives the molecule's net charge. `ATOM`
/// records supply labels, elements (from the atom name), positions and
/// charges; `BOND` records refer to atoms by their 1-based position in the
/// file. Any other record is ignored.
pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let mut net_charge = None;
    let mut atoms = Vec::new();
    let mut bond_lines = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let ln = i + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("CHARGE") => {
                let charge: f64 =
                    util::parse_token(Format::Ac, ln, tokens.next(), "net charge")?;
                net_charge = Some(util::int_if_close(charge));
            }
            Some("ATOM") => atoms.push(parse_atom(&line, ln)?),
            Some("BOND") => bond_lines.push((ln, line)),
            _ => {}
        }
    }

    let net_charge = net_charge
        .ok_or_else(|| Error::parse(Format::Ac, 1, "missing CHARGE record"))?;

    let mut bonds = Vec::with_capacity(bond_lines.len());
    for (ln, line) in &bond_lines {
        bonds.push(parse_bond(line, *ln, atoms.len())?);
    }

    debug!(
        "Parsed AC molecule: {} atoms, {} bonds, net charge {}",
        atoms.len(),
        bonds.len(),
        net_charge
    );

    Ok(Molecule {
        atoms,
        bonds,
        name: None,
        charge: net_charge,
    })
}

fn parse_atom(line: &str, ln: usize) -> Result<Atom, Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 9 {
        return Err(Error::parse(
            Format::Ac,
            ln,
            "ATOM record must hold label, name, residue, position and charge",
        ));
    }

    let label: usize = util::parse_token(Format::Ac, ln, Some(tokens[1]), "atom label")?;
    let name = tokens[2];
    let element = util::leading_symbol(name)
        .and_then(|symbol| symbol.parse::<Element>().ok())
        .ok_or_else(|| {
            Error::parse(
                Format::Ac,
                ln,
                format!("cannot infer an element from atom name '{name}'"),
            )
        })?;
    let position = util::parse_vec3(Format::Ac, ln, &mut tokens[5..8].iter().copied(), "position")?;
    let charge: f64 = util::parse_token(Format::Ac, ln, Some(tokens[8]), "atom charge")?;

    Ok(Atom::new(label, element, util::int_if_close(charge), position))
}

fn parse_bond(line: &str, ln: usize, atom_count: usize) -> Result<Bond, Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(Error::parse(
            Format::Ac,
            ln,
            "BOND record must hold two atom indices and a bond type",
        ));
    }

    let a1: usize = util::parse_token(Format::Ac, ln, Some(tokens[2]), "first atom index")?;
    let a2: usize = util::parse_token(Format::Ac, ln, Some(tokens[3]), "second atom index")?;
    let code: u8 = util::parse_token(Format::Ac, ln, Some(tokens[4]), "bond type")?;

    if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
        return Err(Error::parse(
            Format::Ac,
            ln,
            "bond references atom outside declared range",
        ));
    }
    let order = BondOrder::from_antechamber(code)
        .ok_or_else(|| Error::parse(Format::Ac, ln, format!("unsupported bond type {code}")))?;

    Ok(Bond::new(a1 - 1, a2 - 1, order))
}
