//! Tab-delimited season files.
//!
//! Each row is one game: team, opponent, date, outcome (`W`/`L`), then the
//! twenty numeric box-score columns in file order. There is no header row.
//! Derived fields are never written; they are recomputed on load.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{info, warn};

use crate::error::Result;
use crate::game::Game;

/// Read every game in the file at `path`.
pub fn read_games<P: AsRef<Path>>(path: P) -> Result<Vec<Game>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let games = read_games_from(file)?;
    info!(path = %path.display(), games = games.len(), "loaded season file");
    Ok(games)
}

/// Read every game from a tab-delimited source. The first malformed row
/// aborts the read and reports its line number.
pub fn read_games_from<R: Read>(source: R) -> Result<Vec<Game>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut games = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map_or(index as u64 + 1, |position| position.line());
        let fields: Vec<&str> = record.iter().collect();
        match Game::from_fields(&fields) {
            Ok(game) => games.push(game),
            Err(e) => {
                warn!(line, error = %e, "rejected game row");
                return Err(e.at_line(line));
            }
        }
    }
    Ok(games)
}

/// Write the raw fields of `games` to `path`, replacing the file.
pub fn write_games<P: AsRef<Path>>(path: P, games: &[Game]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_games_to(file, games)?;
    info!(path = %path.display(), games = games.len(), "saved season file");
    Ok(())
}

pub fn write_games_to<W: Write>(sink: W, games: &[Game]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);
    for game in games {
        writer.write_record(game.raw_fields())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatError;
    use crate::game::tests::row;

    fn tsv(rows: &[Vec<String>]) -> String {
        rows.iter().map(|r| r.join("\t") + "\n").collect()
    }

    #[test]
    fn test_read_in_file_order() {
        let data = tsv(&[
            row("UTA", "HOU", "2023-01-01", "W", 112.0, 8.0),
            row("UTA", "DEN", "2023-01-03", "L", 98.0, -2.0),
        ]);
        let games = read_games_from(data.as_bytes()).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].opponent, "HOU");
        assert_eq!(games[1].opponent, "DEN");
    }

    #[test]
    fn test_bad_row_reports_line() {
        let mut bad = row("UTA", "DEN", "2023-01-03", "L", 98.0, -2.0);
        bad[6] = "x".to_string();
        let data = tsv(&[row("UTA", "HOU", "2023-01-01", "W", 112.0, 8.0), bad]);

        let err = read_games_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StatError::Row { line: 2, .. }));
        assert!(err.is_parse());
    }

    #[test]
    fn test_short_row_rejected() {
        let data = "UTA\tHOU\t2023-01-01\tW\t240\t100\n";
        let err = read_games_from(data.as_bytes()).unwrap_err();
        match err {
            StatError::Row { line, source } => {
                assert_eq!(line, 1);
                assert!(matches!(*source, StatError::FieldCount { found: 6, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_then_read() {
        let rows = [
            row("UTA", "HOU", "2023-01-01", "W", 112.0, 8.0),
            row("UTA", "DEN", "2023-01-03", "L", 98.5, -2.0),
        ];
        let games: Vec<Game> = rows.iter().map(|r| Game::from_fields(r).unwrap()).collect();

        let mut buffer = Vec::new();
        write_games_to(&mut buffer, &games).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text, tsv(&rows));

        assert_eq!(read_games_from(buffer.as_slice()).unwrap(), games);
    }
}
