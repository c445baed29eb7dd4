//! Per-atom charge sources and where they came from.
//!
//! Charges are always read against a *base molecule* that supplies the atom
//! order, elements and positions; a reader only replaces the charges.

pub mod gaussian;
pub mod list;

use super::error::Error;
use crate::model::molecule::Molecule;
use log::info;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Population analysis a set of charges was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeMethod {
    Nbo,
    Mulliken,
    Esp,
}

impl fmt::Display for ChargeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeMethod::Nbo => write!(f, "NBO"),
            ChargeMethod::Mulliken => write!(f, "Mulliken"),
            ChargeMethod::Esp => write!(f, "ESP"),
        }
    }
}

/// Point-selection scheme of an ESP fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingScheme {
    MkUff,
    ChelpG,
    Mk,
    Chelp,
}

impl fmt::Display for SamplingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingScheme::MkUff => write!(f, "MK-UFF"),
            SamplingScheme::ChelpG => write!(f, "CHelpG"),
            SamplingScheme::Mk => write!(f, "MK"),
            SamplingScheme::Chelp => write!(f, "CHelp"),
        }
    }
}

// Checked in order; the first matching identifier wins, so the longer
// schemes must precede their prefixes.
const SAMPLING_IDENTIFIERS: [(SamplingScheme, &[&str]); 4] = [
    (
        SamplingScheme::MkUff,
        &["(full, mkuff)", "mkuff", "mk-uff", "mk_uff"],
    ),
    (SamplingScheme::ChelpG, &["(full, chelpg)", "chelpg"]),
    (SamplingScheme::Mk, &["(full, mk)", "mk", "merz", "kollman"]),
    (SamplingScheme::Chelp, &["(full, chelp)", "chelp"]),
];

const METHOD_IDENTIFIERS: [(ChargeMethod, &[&str]); 2] = [
    (ChargeMethod::Nbo, &["nbo", "natural"]),
    (ChargeMethod::Mulliken, &["mulliken", "mülliken"]),
];

const ESP_IDENTIFIERS: [&str; 3] = ["esp", "potential", "electrostatic"];

impl SamplingScheme {
    /// The first scheme with an identifier contained in `text` (lowercased).
    pub fn find_in(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        SAMPLING_IDENTIFIERS
            .iter()
            .find(|(_, ids)| ids.iter().any(|id| text.contains(id)))
            .map(|(scheme, _)| *scheme)
    }
}

/// What a charge file's name says about how its charges were fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChargeProvenance {
    pub method: Option<ChargeMethod>,
    pub sampling: Option<SamplingScheme>,
    pub restrained: bool,
    pub averaged: bool,
    pub equivalenced: bool,
    pub compromised: bool,
}

impl ChargeProvenance {
    /// Guesses the provenance from a file name such as
    /// `ethanol_chelpg_resp.txt`. Only the stem is inspected.
    pub fn guess(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let restrained = stem.contains("resp") || stem.contains("restrain");
        let sampling = SamplingScheme::find_in(&stem);
        let method = METHOD_IDENTIFIERS
            .iter()
            .find(|(_, ids)| ids.iter().any(|id| stem.contains(id)))
            .map(|(method, _)| *method)
            .or_else(|| {
                (ESP_IDENTIFIERS.iter().any(|id| stem.contains(id)) || sampling.is_some())
                    .then_some(ChargeMethod::Esp)
            });

        Self {
            method,
            sampling,
            restrained,
            averaged: stem.contains("average"),
            equivalenced: stem.contains("equivalence") || restrained,
            compromised: stem.contains("compromise"),
        }
    }
}

/// A molecule carrying charges read from a charge file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeSet {
    pub molecule: Molecule,
    pub provenance: ChargeProvenance,
}

/// Reads charges for `base` from `path`, picking the reader by extension:
/// `.txt` for a plain list, `.log` for a Gaussian log.
pub fn load(path: impl AsRef<Path>, base: &Molecule) -> Result<ChargeSet, Error> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let set = match extension.as_deref() {
        Some("txt") => {
            let reader = BufReader::new(File::open(path)?);
            ChargeSet {
                molecule: list::read(reader, base)?,
                provenance: ChargeProvenance::guess(path),
            }
        }
        Some("log") => {
            let reader = BufReader::new(File::open(path)?);
            let esp = gaussian::read(reader, base)?;
            ChargeSet {
                molecule: esp.molecule,
                provenance: ChargeProvenance {
                    method: Some(ChargeMethod::Esp),
                    sampling: Some(esp.sampling),
                    ..ChargeProvenance::default()
                },
            }
        }
        _ => return Err(Error::UnrecognizedExtension(path.to_path_buf())),
    };

    info!(
        "Loaded {} charges from {} (method: {}, sampling: {})",
        set.molecule.atom_count(),
        path.display(),
        set.provenance
            .method
            .map_or_else(|| "unknown".to_string(), |m| m.to_string()),
        set.provenance
            .sampling
            .map_or_else(|| "n/a".to_string(), |s| s.to_string()),
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{atom::Atom, types::Element};

    #[test]
    fn guesses_esp_with_sampling_and_flags() {
        let p = ChargeProvenance::guess(Path::new("/data/ethanol_CHelpG_RESP_average.txt"));
        assert_eq!(p.method, Some(ChargeMethod::Esp));
        assert_eq!(p.sampling, Some(SamplingScheme::ChelpG));
        assert!(p.restrained && p.equivalenced && p.averaged);
        assert!(!p.compromised);
    }

    #[test]
    fn mk_uff_wins_over_plain_mk() {
        let p = ChargeProvenance::guess(Path::new("water_mk-uff.txt"));
        assert_eq!(p.sampling, Some(SamplingScheme::MkUff));
        assert_eq!(SamplingScheme::find_in("pop=(full,mk)"), Some(SamplingScheme::Mk));
    }

    #[test]
    fn named_methods_take_precedence_over_esp() {
        assert_eq!(
            ChargeProvenance::guess(Path::new("benzene_nbo.txt")).method,
            Some(ChargeMethod::Nbo)
        );
        assert_eq!(
            ChargeProvenance::guess(Path::new("benzene_Mulliken.txt")).method,
            Some(ChargeMethod::Mulliken)
        );
    }

    #[test]
    fn unknown_names_guess_nothing() {
        let p = ChargeProvenance::guess(Path::new("charges.txt"));
        assert_eq!(p, ChargeProvenance::default());
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let base = Molecule::from_atoms(vec![
            Atom::new(1, Element::O, 0.0, [0.0; 3]),
            Atom::new(2, Element::H, 0.0, [1.0, 0.0, 0.0]),
        ]);

        let list = dir.path().join("water_compromise.txt");
        std::fs::write(&list, "-0.5 0.5\n").unwrap();
        let set = load(&list, &base).unwrap();
        assert_eq!(set.molecule.atoms[1].charge, 0.5);
        assert!(set.provenance.compromised);

        let other = dir.path().join("water.chg");
        std::fs::write(&other, "-0.5 0.5\n").unwrap();
        assert!(matches!(
            load(&other, &base).unwrap_err(),
            Error::UnrecognizedExtension(_)
        ));
    }
}
