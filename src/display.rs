use std::fmt::Write;

use crate::season::Season;
use crate::stat::{FieldValue, Stat};

/// Render a season as a plain-text table: one row per game, one column per
/// field (raw and derived). Numbers are printed with `precision` decimals.
pub fn render_table(season: &Season, precision: usize) -> String {
    let cells: Vec<Vec<(String, bool)>> = season
        .iter()
        .map(|game| {
            Stat::ALL
                .iter()
                .map(|&stat| match game.get(stat) {
                    FieldValue::Number(n) => (format!("{n:.precision$}"), true),
                    FieldValue::Text(s) => (s, false),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = Stat::ALL
        .iter()
        .enumerate()
        .map(|(column, stat)| {
            cells
                .iter()
                .map(|row| row[column].0.len())
                .chain(std::iter::once(stat.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = Stat::ALL
        .iter()
        .zip(&widths)
        .map(|(stat, &width)| format!("{: ^width$}", stat.header()))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | ").trim_end());
    let rule: Vec<String> = widths.iter().map(|&width| "-".repeat(width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, numeric), &width)| {
                if *numeric {
                    format!("{text: >width$}")
                } else {
                    format!("{text: <width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }
    let _ = write!(out, "({} games)", season.len());
    out
}
