use super::{Format, error::Error};
use std::str::FromStr;

/// Values within this distance of an integer are snapped to it.
pub const INTEGER_TOLERANCE: f64 = 1e-4;

/// Snaps `value` to the nearest integer when it is within
/// [`INTEGER_TOLERANCE`], so charges printed as `-1.000000` come back whole.
pub fn int_if_close(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < INTEGER_TOLERANCE {
        rounded
    } else {
        value
    }
}

/// Parses one whitespace token, naming `what` in the error.
pub fn parse_token<T: FromStr>(
    format: Format,
    line: usize,
    token: Option<&str>,
    what: &str,
) -> Result<T, Error> {
    let token = token.ok_or_else(|| Error::parse(format, line, format!("missing {what}")))?;
    token
        .parse::<T>()
        .map_err(|_| Error::parse(format, line, format!("invalid {what} '{token}'")))
}

pub fn parse_vec3<'a>(
    format: Format,
    line: usize,
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<[f64; 3], Error> {
    let mut out = [0.0; 3];
    for (d, slot) in out.iter_mut().enumerate() {
        *slot = parse_token(format, line, tokens.next(), &format!("{what} component {}", d + 1))?;
    }
    Ok(out)
}

/// Fixed-point with six decimals and a leading space in place of a `+`.
pub fn fmt_fixed6(value: f64) -> String {
    if value.is_sign_negative() && !value.is_nan() {
        format!("{value:.6}")
    } else {
        format!(" {value:.6}")
    }
}

/// Scientific notation with five decimals, a leading space in place of a `+`
/// and a signed exponent of at least two digits (` 1.23450E-05`).
pub fn fmt_sci5(value: f64) -> String {
    let sign = if value.is_sign_negative() && !value.is_nan() {
        "-"
    } else {
        " "
    };
    if value.is_nan() {
        return format!("{sign}NAN");
    }
    if value.is_infinite() {
        return format!("{sign}INF");
    }

    let raw = format!("{:.5E}", value.abs());
    match raw.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let exp_sign = if exponent < 0 { '-' } else { '+' };
            format!("{sign}{mantissa}E{exp_sign}{:02}", exponent.abs())
        }
        None => format!("{sign}{raw}"),
    }
}

/// The first element-like run in an atom name: an uppercase letter and an
/// optional lowercase one (`"Cl12"` → `"Cl"`, `"CA"` → `"C"`).
pub fn leading_symbol(name: &str) -> Option<&str> {
    let start = name.find(|c: char| c.is_ascii_uppercase())?;
    let rest = &name[start + 1..];
    let len = match rest.chars().next() {
        Some(c) if c.is_ascii_lowercase() => 2,
        _ => 1,
    };
    Some(&name[start..start + len])
}
