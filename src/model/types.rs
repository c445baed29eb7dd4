use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

const MAX_ATOMIC_NUMBER: u8 = 118;

#[rustfmt::skip]
const SYMBOLS: [&str; MAX_ATOMIC_NUMBER as usize] = [
    "H",                                                                                                  "He",
    "Li", "Be",                                                                "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg",                                                                "Al", "Si", "P",  "S",  "Cl", "Ar",
    "K",  "Ca", "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y",  "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I",  "Xe",
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
                "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
                "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

static SYMBOL_INDEX: OnceLock<HashMap<&'static str, Element>> = OnceLock::new();

fn symbol_index() -> &'static HashMap<&'static str, Element> {
    SYMBOL_INDEX.get_or_init(|| {
        SYMBOLS
            .iter()
            .enumerate()
            .map(|(i, &symbol)| (symbol, Element(i as u8 + 1)))
            .collect()
    })
}

/// A chemical element, H through Og, stored as its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const H: Element = Element(1);
    pub const HE: Element = Element(2);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const NA: Element = Element(11);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const BR: Element = Element(35);
    pub const I: Element = Element(53);

    /// Looks up an element by atomic number (1–118).
    pub fn from_atomic_number(number: u8) -> Option<Self> {
        (1..=MAX_ATOMIC_NUMBER)
            .contains(&number)
            .then_some(Element(number))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.0 as usize - 1]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        symbol_index()
            .get(s)
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Maps an AnteChamber bond type code to a bond order.
    ///
    /// Codes 7–10 (aromatic single/double, delocalized, aromatic) all collapse to
    /// [`BondOrder::Aromatic`].
    pub fn from_antechamber(code: u8) -> Option<Self> {
        match code {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            7..=10 => Some(BondOrder::Aromatic),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::CL);
        assert_eq!(Element::from_str("Fe").unwrap().atomic_number(), 26);
        assert_eq!(Element::from_str("Og").unwrap().atomic_number(), 118);
    }

    #[test]
    fn element_from_str_invalid_case() {
        let err = Element::from_str("h").unwrap_err();
        assert_eq!(err.to_string(), "invalid or unsupported element symbol: 'h'");
    }

    #[test]
    fn atomic_number_table_is_consistent_with_symbols() {
        for number in 1..=MAX_ATOMIC_NUMBER {
            let element = Element::from_atomic_number(number).unwrap();
            assert_eq!(element.atomic_number(), number);
            assert_eq!(Element::from_str(element.symbol()).unwrap(), element);
        }
    }

    #[test]
    fn atomic_number_out_of_range() {
        assert!(Element::from_atomic_number(0).is_none());
        assert!(Element::from_atomic_number(119).is_none());
    }

    #[test]
    fn element_symbol_display() {
        assert_eq!(Element::NA.symbol(), "Na");
        assert_eq!(Element::NA.to_string(), "Na");
        assert_eq!(Element::from_atomic_number(74).unwrap().symbol(), "W");
    }

    #[test]
    fn bondorder_from_antechamber_codes() {
        assert_eq!(BondOrder::from_antechamber(1), Some(BondOrder::Single));
        assert_eq!(BondOrder::from_antechamber(2), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_antechamber(3), Some(BondOrder::Triple));
        assert_eq!(BondOrder::from_antechamber(7), Some(BondOrder::Aromatic));
        assert_eq!(BondOrder::from_antechamber(10), Some(BondOrder::Aromatic));
        assert_eq!(BondOrder::from_antechamber(0), None);
        assert_eq!(BondOrder::from_antechamber(5), None);
    }
}
