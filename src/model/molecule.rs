use super::atom::Atom;
use super::types::{BondOrder, Element};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }
}

/// Picks atoms out of a [`Molecule`], either by label or by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomSelector {
    Label(usize),
    Element(Element),
}

impl FromStr for AtomSelector {
    type Err = SelectError;

    /// Integers select by label, anything else is read as an element symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(label) = s.parse::<usize>() {
            return Ok(AtomSelector::Label(label));
        }
        Element::from_str(s)
            .map(AtomSelector::Element)
            .map_err(|_| SelectError::InvalidSelector(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no atom with label {0} in this molecule")]
    UnknownLabel(usize),

    #[error("atom selection matched no atoms")]
    Empty,

    #[error("'{0}' is neither an atom label nor an element symbol")]
    InvalidSelector(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub name: Option<String>,
    pub charge: f64,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        let charge = atoms.iter().map(|a| a.charge).sum();
        Self {
            atoms,
            charge,
            ..Self::default()
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn atom(&self, label: usize) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.label == label)
    }

    /// Returns the atoms matching any of `selectors`, in molecule order and
    /// without duplicates. An empty selector list selects every atom.
    pub fn select(&self, selectors: &[AtomSelector]) -> Result<Vec<&Atom>, SelectError> {
        if selectors.is_empty() {
            return Ok(self.atoms.iter().collect());
        }

        for selector in selectors {
            if let AtomSelector::Label(label) = selector {
                if self.atom(*label).is_none() {
                    return Err(SelectError::UnknownLabel(*label));
                }
            }
        }

        let selected: Vec<&Atom> = self
            .atoms
            .iter()
            .filter(|atom| {
                selectors.iter().any(|s| match s {
                    AtomSelector::Label(label) => atom.label == *label,
                    AtomSelector::Element(element) => atom.element == *element,
                })
            })
            .collect();

        if selected.is_empty() {
            return Err(SelectError::Empty);
        }
        Ok(selected)
    }

    /// Copies this molecule with per-atom charges replaced, in atom order.
    ///
    /// Returns `None` if `charges` does not hold exactly one value per atom.
    /// The net charge becomes the sum of the new charges.
    pub fn with_charges(&self, charges: &[f64]) -> Option<Self> {
        if charges.len() != self.atoms.len() {
            return None;
        }
        let mut copy = self.clone();
        for (atom, &q) in copy.atoms.iter_mut().zip(charges) {
            atom.charge = q;
        }
        copy.charge = charges.iter().sum();
        Some(copy)
    }

    pub fn total_atomic_charge(&self) -> f64 {
        self.atoms.iter().map(|a| a.charge).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        let mut mol = Molecule::from_atoms(vec![
            Atom::new(1, Element::O, -0.8, [0.0, 0.0, 0.0]),
            Atom::new(2, Element::H, 0.4, [0.96, 0.0, 0.0]),
            Atom::new(3, Element::H, 0.4, [-0.24, 0.93, 0.0]),
        ]);
        mol.bonds.push(Bond::new(1, 0, BondOrder::Single));
        mol.bonds.push(Bond::new(0, 2, BondOrder::Single));
        mol
    }

    #[test]
    fn bond_new_orders_indices() {
        let b = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((b.i, b.j), (2, 5));
    }

    #[test]
    fn empty_selection_list_selects_all_atoms() {
        let mol = water();
        let atoms = mol.select(&[]).unwrap();
        assert_eq!(atoms.len(), 3);
    }

    #[test]
    fn select_by_element_and_label_keeps_molecule_order() {
        let mol = water();
        let atoms = mol
            .select(&[AtomSelector::Label(3), AtomSelector::Element(Element::O)])
            .unwrap();
        let labels: Vec<_> = atoms.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec![1, 3]);
    }

    #[test]
    fn select_deduplicates_overlapping_selectors() {
        let mol = water();
        let atoms = mol
            .select(&[AtomSelector::Element(Element::H), AtomSelector::Label(2)])
            .unwrap();
        assert_eq!(atoms.len(), 2);
    }

    #[test]
    fn select_unknown_label_fails() {
        let mol = water();
        let err = mol.select(&[AtomSelector::Label(9)]).unwrap_err();
        assert_eq!(err, SelectError::UnknownLabel(9));
    }

    #[test]
    fn select_absent_element_is_empty() {
        let mol = water();
        let err = mol.select(&[AtomSelector::Element(Element::C)]).unwrap_err();
        assert_eq!(err, SelectError::Empty);
    }

    #[test]
    fn selector_from_str() {
        assert_eq!("12".parse::<AtomSelector>().unwrap(), AtomSelector::Label(12));
        assert_eq!(
            "Cl".parse::<AtomSelector>().unwrap(),
            AtomSelector::Element(Element::CL)
        );
        assert!("Xx".parse::<AtomSelector>().is_err());
    }

    #[test]
    fn with_charges_replaces_and_sums() {
        let mol = water();
        let charged = mol.with_charges(&[-1.0, 0.25, 0.25]).unwrap();
        assert_eq!(charged.atoms[0].charge, -1.0);
        assert!((charged.charge + 0.5).abs() < 1e-12);
        assert!(mol.with_charges(&[0.0]).is_none());
    }
}
