//! Win/loss density grid.
//!
//! Games are bucketed by the rounded value of one or two stats. Each bucket
//! counts wins and losses; rendering marks which side dominates.

use std::fmt::Write;

use crate::constants::MAX_PLOT_SPAN;
use crate::error::{Result, StatError};
use crate::season::Season;
use crate::stat::Stat;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub wins: usize,
    pub losses: usize,
}

impl Cell {
    pub fn total(&self) -> usize {
        self.wins + self.losses
    }

    fn glyph(&self) -> char {
        match (self.wins, self.losses) {
            (0, 0) => '.',
            (w, l) if w > l => 'W',
            (w, l) if l > w => 'L',
            _ => '=',
        }
    }
}

#[derive(Clone, Debug)]
pub struct DensityGrid {
    pub x_stat: Stat,
    pub y_stat: Option<Stat>,
    pub x_min: i64,
    pub y_min: i64,
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl DensityGrid {
    /// Bucket every game by `x` (and `y`, when given). Returns `None` for an
    /// empty season.
    pub fn build(season: &Season, x: Stat, y: Option<Stat>) -> Result<Option<Self>> {
        if season.is_empty() {
            return Ok(None);
        }

        let mut points = Vec::with_capacity(season.len());
        for game in season {
            let bx = bucket(x, game.number(x)?)?;
            let by = match y {
                Some(y) => bucket(y, game.number(y)?)?,
                None => 0,
            };
            points.push((bx, by, game.number(Stat::Win)? > 0.5));
        }

        let (x_min, width) = span(x, points.iter().map(|p| p.0))?;
        let (y_min, height) = match y {
            Some(y) => span(y, points.iter().map(|p| p.1))?,
            None => (0, 1),
        };

        let mut grid = DensityGrid {
            x_stat: x,
            y_stat: y,
            x_min,
            y_min,
            width,
            height,
            cells: vec![Cell::default(); width * height],
        };
        for (bx, by, won) in points {
            let index = grid.index(bx, by).ok_or_else(|| {
                StatError::InvalidArgument(format!("value {bx},{by} fell outside the plot"))
            })?;
            let cell = &mut grid.cells[index];
            if won {
                cell.wins += 1;
            } else {
                cell.losses += 1;
            }
        }
        Ok(Some(grid))
    }

    /// The bucket holding rounded values (`x`, `y`); `y` is ignored for a 1-D grid.
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        let y = if self.y_stat.is_some() { y } else { self.y_min };
        self.index(x, y).map(|index| self.cells[index])
    }

    pub fn busiest(&self) -> usize {
        self.cells.iter().map(Cell::total).max().unwrap_or(0)
    }

    /// Text rendering with the highest `y` bucket on top.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.y_stat {
            Some(y) => {
                let _ = writeln!(out, "{} vs. {}", y, self.x_stat);
            }
            None => {
                let _ = writeln!(out, "{}", self.x_stat);
            }
        }

        let y_max = self.y_min + self.height as i64 - 1;
        let label_width = self.y_min.to_string().len().max(y_max.to_string().len());
        for row in (0..self.height).rev() {
            let label = if self.y_stat.is_some() {
                (self.y_min + row as i64).to_string()
            } else {
                String::new()
            };
            let line: String = self.cells[row * self.width..(row + 1) * self.width]
                .iter()
                .map(Cell::glyph)
                .collect();
            let _ = writeln!(out, "{label: >label_width$} |{line}");
        }

        let x_max = self.x_min + self.width as i64 - 1;
        let _ = writeln!(out, "{: >label_width$} +{}", "", "-".repeat(self.width));
        let _ = writeln!(
            out,
            "{: >label_width$}  {} .. {}",
            "", self.x_min, x_max
        );
        let _ = write!(out, "W = mostly wins, L = mostly losses, = = even, . = no games");
        out
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let column = usize::try_from(x.checked_sub(self.x_min)?).ok().filter(|&c| c < self.width)?;
        let row = usize::try_from(y.checked_sub(self.y_min)?).ok().filter(|&r| r < self.height)?;
        Some(row * self.width + column)
    }
}

fn bucket(stat: Stat, value: f64) -> Result<i64> {
    if !value.is_finite() {
        return Err(StatError::InvalidArgument(format!(
            "cannot plot non-finite {stat} value {value}"
        )));
    }
    Ok(value.round() as i64)
}

fn span(stat: Stat, buckets: impl Iterator<Item = i64> + Clone) -> Result<(i64, usize)> {
    let min = buckets.clone().min().unwrap_or(0);
    let max = buckets.max().unwrap_or(0);
    let distance = max.abs_diff(min);
    if distance >= MAX_PLOT_SPAN as u64 {
        return Err(StatError::InvalidArgument(format!(
            "{stat} spans {} buckets, more than the {MAX_PLOT_SPAN} that can be plotted",
            distance.saturating_add(1)
        )));
    }
    Ok((min, distance as usize + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::game;

    fn season() -> Season {
        let mut season = Season::from_games(vec![
            game("UTA", "HOU", "2023-01-01", "W", 112.0),
            game("UTA", "DEN", "2023-01-03", "L", 98.0),
            game("UTA", "LAL", "2023-01-05", "W", 112.4),
            game("UTA", "PHX", "2023-01-09", "L", 100.0),
        ]);
        season
            .edit_stat("UTA PHX 2023-01-09", Stat::Ast, "30")
            .unwrap();
        season
    }

    #[test]
    fn test_one_dimensional() {
        let grid = DensityGrid::build(&season(), Stat::Pts, None).unwrap().unwrap();

        assert_eq!(grid.x_min, 98);
        assert_eq!(grid.width, 15);
        assert_eq!(grid.height, 1);
        assert_eq!(grid.cell(112, 0), Some(Cell { wins: 2, losses: 0 }));
        assert_eq!(grid.cell(98, 0), Some(Cell { wins: 0, losses: 1 }));
        assert_eq!(grid.cell(105, 0), Some(Cell::default()));
        assert_eq!(grid.cell(200, 0), None);
        assert_eq!(grid.busiest(), 2);
    }

    #[test]
    fn test_two_dimensional() {
        let grid = DensityGrid::build(&season(), Stat::Pts, Some(Stat::Ast)).unwrap().unwrap();

        assert_eq!(grid.y_min, 25);
        assert_eq!(grid.height, 6);
        assert_eq!(grid.cell(100, 30), Some(Cell { wins: 0, losses: 1 }));
        assert_eq!(grid.cell(112, 25), Some(Cell { wins: 2, losses: 0 }));

        let text = grid.render();
        assert!(text.starts_with("ast vs. pts"));
        let top = text.lines().nth(1).unwrap();
        assert!(top.starts_with("30 |"));
        assert_eq!(top.chars().filter(|c| *c == 'L').count(), 1);
    }

    #[test]
    fn test_empty_season() {
        assert!(DensityGrid::build(&Season::new(), Stat::Pts, None).unwrap().is_none());
    }

    #[test]
    fn test_text_stat_rejected() {
        let err = DensityGrid::build(&season(), Stat::Team, None).unwrap_err();
        assert!(matches!(err, StatError::InvalidArgument(_)));
    }
}
