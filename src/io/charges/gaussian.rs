use super::SamplingScheme;
use crate::io::{Format, error::Error, util};
use crate::model::molecule::Molecule;
use log::debug;
use std::io::BufRead;

const ESP_MARKER: &str = "ESP charges:";
const SUM_MARKER: &str = "Sum of ESP charges";

/// ESP-fitted charges read from a Gaussian log.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianEsp {
    pub molecule: Molecule,
    pub sampling: SamplingScheme,
}

/// Reads the ` ESP charges:` block of a Gaussian log onto a copy of `base`.
///
/// The sampling scheme comes from the `pop=` keyword of the route section.
/// The block must list exactly one charge per atom of `base` before its
/// `Sum of ESP charges` line, which gives the net charge.
pub fn read<R: BufRead>(reader: R, base: &Molecule) -> Result<GaussianEsp, Error> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    let marker = lines
        .iter()
        .position(|l| l.trim() == ESP_MARKER)
        .ok_or_else(|| {
            Error::parse(
                Format::GaussianLog,
                lines.len(),
                "cannot find an ESP charges block in this log",
            )
        })?;

    let sampling = lines[..marker]
        .iter()
        .flat_map(|l| l.split_whitespace())
        .filter(|token| token.to_lowercase().contains("pop="))
        .find_map(SamplingScheme::find_in)
        .ok_or_else(|| {
            Error::parse(
                Format::GaussianLog,
                marker + 1,
                "cannot find the sampling scheme (pop= keyword) in the route section",
            )
        })?;

    // The marker is followed by a column-header line.
    let start = marker + 2;
    let mut charges = Vec::with_capacity(base.atom_count());
    let mut total = None;
    for (offset, line) in lines.iter().enumerate().skip(start) {
        let ln = offset + 1;
        if line.contains(SUM_MARKER) {
            let value: f64 =
                util::parse_token(Format::GaussianLog, ln, line.split_whitespace().last(), "charge sum")?;
            total = Some((ln, util::int_if_close(value)));
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() >= 3 {
            let charge: f64 =
                util::parse_token(Format::GaussianLog, ln, tokens.last().copied(), "atomic charge")?;
            charges.push(util::int_if_close(charge));
        }
    }

    let (sum_line, total) = total.ok_or_else(|| {
        Error::parse(
            Format::GaussianLog,
            lines.len(),
            "ESP charges block is not terminated by a charge sum",
        )
    })?;

    let mut molecule = base.with_charges(&charges).ok_or_else(|| {
        Error::parse(
            Format::GaussianLog,
            sum_line,
            format!(
                "ESP block lists {} charges but the molecule has {} atoms",
                charges.len(),
                base.atom_count()
            ),
        )
    })?;
    molecule.charge = total;

    debug!(
        "Read {} ESP charges ({sampling} sampling), net charge {total}",
        charges.len()
    );
    Ok(GaussianEsp { molecule, sampling })
}
