use std::collections::BTreeMap;
use std::io::{self, Write};

use cube_forge::{Cube, FieldSummary, Molecule};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_cube_info(cube: &Cube) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let grid = cube.grid();
    let [nx, ny, nz] = grid.n_voxels();
    let origin = grid.origin();
    let steps = grid.steps();

    let mut rows = vec![
        ("Field Type", cube.field_type().to_string()),
        ("Voxels", format!("{} × {} × {}", nx, ny, nz)),
        ("Total Voxels", format!("{}", grid.voxel_count())),
        (
            "Origin (bohr)",
            format!("{:.3} {:.3} {:.3}", origin[0], origin[1], origin[2]),
        ),
        (
            "Step (bohr)",
            format!("{:.4} {:.4} {:.4}", steps[0], steps[1], steps[2]),
        ),
        ("Atoms", format!("{}", cube.molecule().atom_count())),
    ];

    if let Some(source) = cube.source() {
        rows.insert(0, ("Source", source.display().to_string()));
    }

    print_kv_table(&mut out, "Grid Summary", &rows);
}

pub fn print_element_distribution(molecule: &Molecule) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut counts: BTreeMap<u8, (&'static str, usize)> = BTreeMap::new();
    for atom in &molecule.atoms {
        let entry = counts
            .entry(atom.element.atomic_number())
            .or_insert((atom.element.symbol(), 0));
        entry.1 += 1;
    }

    let total = molecule.atom_count();
    if total == 0 {
        return;
    }

    let mut sorted: Vec<_> = counts
        .into_values()
        .map(|(symbol, count)| (symbol.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    print_distribution_table(&mut out, "Element Distribution", &sorted, total);
}

pub fn print_field_summary(title: &str, summary: &FieldSummary) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Minimum", format_value(summary.min)),
        ("Maximum", format_value(summary.max)),
        ("Mean", format_value(summary.mean)),
        ("RMS", format_value(summary.rms)),
    ];

    let undefined = summary.total - summary.finite;
    if undefined > 0 {
        let pct = undefined as f64 / summary.total as f64 * 100.0;
        rows.push((
            "Undefined",
            format!("{} ({:.1}%) {}", undefined, pct, make_bar(pct, 10)),
        ));
    }

    print_kv_table(&mut out, title, &rows);
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.6e}", value)
    } else {
        "n/a".to_string()
    }
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let name_line = "─".repeat(name_w + 2);
    let count_line = "─".repeat(count_w + 2);
    let dist_line = "─".repeat(dist_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{INDENT}┌{name_line}┬{count_line}┬{dist_line}┐");
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Element", "Count", "Distribution",
    );
    let _ = writeln!(out, "{INDENT}├{name_line}┼{count_line}┼{dist_line}┤");

    for (name, count) in data.iter().take(15) {
        let pct = (*count as f64 / total as f64) * 100.0;
        let dist_cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell,
        );
    }

    if data.len() > 15 {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            "...",
            "...",
            format!("({} more elements)", data.len() - 15),
        );
    }

    let _ = writeln!(out, "{INDENT}└{name_line}┴{count_line}┴{dist_line}┘");
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(out, "{INDENT}├{k_line}┼{v_line}┤");

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
