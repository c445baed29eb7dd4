use std::path::Path;

use cube_forge::io::Format;

pub fn cube_input(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "cub" | "cube" => Some(Format::Cube),
        _ => None,
    }
}

pub fn charge_input(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "ac" => Some(Format::Ac),
        "txt" => Some(Format::ChargeList),
        "log" => Some(Format::GaussianLog),
        _ => None,
    }
}
