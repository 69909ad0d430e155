use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use statrs::statistics::{Data, Median, Statistics};
use tracing::debug;

use crate::error::{Result, StatError};
use crate::game::Game;
use crate::stat::{Comparison, Stat, StatKey};
use crate::tsv;

/// One stage of a multi-filter: keep games whose `stat` is strictly
/// greater/lower than `threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Predicate {
    pub stat: Stat,
    pub threshold: f64,
    pub comparison: Comparison,
}

impl Predicate {
    pub fn new(stat: Stat, threshold: f64, comparison: Comparison) -> Self {
        Predicate {
            stat,
            threshold,
            comparison,
        }
    }
}

/// Most frequent value of a field and how many games carry it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeResult {
    pub value: String,
    pub count: usize,
}

impl fmt::Display for ModeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.count)
    }
}

/// An ordered collection of games.
///
/// Insertion order is meaningful: it is the display order and the base order
/// for sorting. Queries return new seasons holding their own copies of the
/// matching games, so editing a result never reaches back into its source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Season {
    games: Vec<Game>,
}

impl Season {
    pub fn new() -> Self {
        Season { games: Vec::new() }
    }

    /// Take ownership of already-built games.
    pub fn from_games(games: Vec<Game>) -> Self {
        Season { games }
    }

    /// Build every game from raw rows; the first bad row aborts the whole build.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        let games = rows
            .iter()
            .map(|row| Game::from_fields(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Season { games })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Game> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games whose `stat` is strictly greater/lower than `threshold`.
    pub fn filter(&self, stat: Stat, threshold: f64, comparison: Comparison) -> Result<Season> {
        require_numeric(stat)?;
        let games: Vec<Game> = self
            .games
            .iter()
            .filter(|game| game.number(stat).is_ok_and(|v| comparison.holds(v, threshold)))
            .cloned()
            .collect();
        debug!(
            stat = %stat,
            threshold,
            comparison = %comparison,
            kept = games.len(),
            of = self.games.len(),
            "filter"
        );
        Ok(Season { games })
    }

    /// Apply each predicate in turn; the result satisfies all of them.
    pub fn multi_filter(&self, predicates: &[Predicate]) -> Result<Season> {
        for predicate in predicates {
            require_numeric(predicate.stat)?;
        }
        let mut output = self.clone();
        for predicate in predicates {
            if output.is_empty() {
                break;
            }
            output = output.filter(predicate.stat, predicate.threshold, predicate.comparison)?;
        }
        Ok(output)
    }

    /// Games whose rendered `key` contains `needle` (case-sensitive substring).
    pub fn find(&self, key: StatKey, needle: &str) -> Season {
        let games: Vec<Game> = self
            .games
            .iter()
            .filter(|game| render_key(game, key).contains(needle))
            .cloned()
            .collect();
        debug!(needle, found = games.len(), "find");
        Season { games }
    }

    /// Stable sort by `stat`; ties keep their current relative order.
    pub fn sort(&self, stat: Stat, descending: bool) -> Season {
        let mut games = self.games.clone();
        if descending {
            games.sort_by(|a, b| b.get(stat).compare(&a.get(stat)));
        } else {
            games.sort_by(|a, b| a.get(stat).compare(&b.get(stat)));
        }
        Season { games }
    }

    /// Arithmetic mean of `stat`, or `None` for an empty season.
    pub fn average(&self, stat: Stat) -> Result<Option<f64>> {
        let values = self.values(stat)?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().mean()))
    }

    /// Median of `stat`, or `None` for an empty season.
    pub fn median(&self, stat: Stat) -> Result<Option<f64>> {
        let values = self.values(stat)?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Data::new(values).median()))
    }

    /// Sample standard deviation of `stat`, or `None` with fewer than two games.
    pub fn std_dev(&self, stat: Stat) -> Result<Option<f64>> {
        let values = self.values(stat)?;
        if values.len() < 2 {
            return Ok(None);
        }
        Ok(Some(values.std_dev()))
    }

    /// Share of games won, or `None` for an empty season.
    pub fn win_percentage(&self) -> Option<f64> {
        if self.games.is_empty() {
            return None;
        }
        let wins = self.games.iter().filter(|game| game.is_win()).count();
        Some(wins as f64 / self.games.len() as f64)
    }

    /// Most frequent rendered value of `key`. Ties go to the value seen first.
    pub fn mode(&self, key: StatKey) -> Option<ModeResult> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for game in &self.games {
            let value = render_key(game, key);
            let count = counts.entry(value.clone()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        let mut best: Option<ModeResult> = None;
        for value in order {
            let count = counts[&value];
            if best.as_ref().map_or(true, |b| count > b.count) {
                best = Some(ModeResult { value, count });
            }
        }
        best
    }

    /// Append a game; returns the season for chaining.
    pub fn add_game(&mut self, game: Game) -> &mut Self {
        self.games.push(game);
        self
    }

    /// Remove every game whose identity key equals `id`. Missing ids are not an error.
    pub fn delete_game(&mut self, id: &str) -> &mut Self {
        let before = self.games.len();
        self.games.retain(|game| game.id() != id);
        debug!(id, removed = before - self.games.len(), "delete_game");
        self
    }

    /// Set `stat` to `value` on every game whose identity key equals `id`.
    ///
    /// See [`Game::set`] for coercion and derived-field handling. Every match
    /// is edited on a copy first; if any edit fails the season is unchanged.
    pub fn edit_stat(&mut self, id: &str, stat: Stat, value: &str) -> Result<&mut Self> {
        let mut edits = Vec::new();
        for (index, game) in self.games.iter().enumerate() {
            if game.id() == id {
                let mut edited = game.clone();
                edited.set(stat, value)?;
                edits.push((index, edited));
            }
        }
        debug!(id, stat = %stat, value, edited = edits.len(), "edit_stat");
        for (index, game) in edits {
            self.games[index] = game;
        }
        Ok(self)
    }

    /// Append every game in a tab-delimited file, in file order.
    ///
    /// The file is parsed completely before anything is appended, so a bad row
    /// leaves the season unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let games = tsv::read_games(path)?;
        self.games.extend(games);
        Ok(self)
    }

    /// Write the raw fields of every game to a tab-delimited file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        tsv::write_games(path, &self.games)
    }

    pub fn reset(&mut self) {
        self.games.clear();
    }

    fn values(&self, stat: Stat) -> Result<Vec<f64>> {
        self.games.iter().map(|game| game.number(stat)).collect()
    }
}

fn require_numeric(stat: Stat) -> Result<()> {
    if stat.is_numeric() {
        Ok(())
    } else {
        Err(StatError::InvalidArgument(format!(
            "{} is not a numeric field",
            stat
        )))
    }
}

fn render_key(game: &Game, key: StatKey) -> String {
    match key {
        StatKey::Id => game.id(),
        StatKey::Field(stat) => game.get(stat).to_string(),
    }
}

impl FromIterator<Game> for Season {
    fn from_iter<I: IntoIterator<Item = Game>>(iter: I) -> Self {
        Season {
            games: iter.into_iter().collect(),
        }
    }
}

impl Extend<Game> for Season {
    fn extend<I: IntoIterator<Item = Game>>(&mut self, iter: I) {
        self.games.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Season {
    type Item = &'a Game;
    type IntoIter = std::slice::Iter<'a, Game>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}

/// One game per line, every field separated by ", ".
impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for game in &self.games {
            writeln!(f, "{}", game)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::{game, row};

    fn two_games() -> (Game, Game) {
        (
            game("UTA", "DEN", "2023-01-05", "W", 100.0),
            game("HOU", "DAL", "2023-01-05", "L", 90.0),
        )
    }

    fn sample() -> Season {
        Season::from_games(vec![
            game("UTA", "HOU", "2023-01-01", "W", 112.0),
            game("UTA", "DEN", "2023-01-03", "L", 98.0),
            game("UTA", "LAL", "2023-01-05", "W", 120.0),
            game("UTA", "HOU", "2023-01-07", "L", 102.0),
            game("UTA", "PHX", "2023-01-09", "W", 98.0),
        ])
    }

    #[test]
    fn test_two_game_scenario() {
        let (a, b) = two_games();
        let season = Season::from_games(vec![a.clone(), b]);

        assert_eq!(season.win_percentage(), Some(0.5));
        assert_eq!(season.average(Stat::Pts).unwrap(), Some(95.0));

        let filtered = season.filter(Stat::Pts, 95.0, Comparison::Greater).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.games()[0], a);
    }

    #[test]
    fn test_edit_stat_only_touches_matching_game() {
        let (a, b) = two_games();
        let mut season = Season::from_games(vec![a.clone(), b.clone()]);

        season.edit_stat(&a.id(), Stat::Fgm, "10000.0").unwrap();

        assert_eq!(season.games()[0].fgm, 10000.0);
        assert_eq!(season.games()[1], b);
        // field goal percentage is a stored column and is not recomputed
        let high_fgp = season.filter(Stat::Fgp, 47.0, Comparison::Greater).unwrap();
        assert_eq!(high_fgp.len(), 2);
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            row("UTA", "HOU", "2023-01-01", "W", 112.0, 8.0),
            row("UTA", "DEN", "2023-01-03", "L", 98.0, -2.0),
        ];
        let season = Season::from_rows(&rows).unwrap();
        assert_eq!(season.len(), 2);
        assert_eq!(season.games()[1].opts, 100.0);

        let mut bad = rows.clone();
        bad[1][5] = "ninety".to_string();
        assert!(matches!(Season::from_rows(&bad), Err(StatError::Parse { .. })));
    }

    #[test]
    fn test_filter_lower_and_empty_result() {
        let season = sample();
        let low = season.filter(Stat::Pts, 100.0, Comparison::Lower).unwrap();
        assert_eq!(low.len(), 2);

        let none = season.filter(Stat::Pts, 500.0, Comparison::Greater).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_filter_rejects_text_field() {
        let err = sample().filter(Stat::Team, 1.0, Comparison::Greater).unwrap_err();
        assert!(matches!(err, StatError::InvalidArgument(_)));
    }

    #[test]
    fn test_filter_result_is_independent() {
        let season = sample();
        let mut wins = season.filter(Stat::Win, 0.5, Comparison::Greater).unwrap();
        let id = wins.games()[0].id();
        wins.edit_stat(&id, Stat::Pts, "1").unwrap();

        assert_eq!(season.games()[0].pts, 112.0);
        assert_eq!(wins.games()[0].pts, 1.0);
    }

    #[test]
    fn test_multi_filter() {
        let season = sample();
        let predicates = [
            Predicate::new(Stat::Pts, 99.0, Comparison::Greater),
            Predicate::new(Stat::Win, 0.5, Comparison::Lower),
        ];
        let result = season.multi_filter(&predicates).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.games()[0].id(), "UTA HOU 2023-01-07");

        assert_eq!(season.multi_filter(&[]).unwrap(), season);
    }

    #[test]
    fn test_multi_filter_validates_every_stage() {
        let predicates = [
            Predicate::new(Stat::Pts, 1000.0, Comparison::Greater),
            Predicate::new(Stat::Date, 0.0, Comparison::Greater),
        ];
        assert!(sample().multi_filter(&predicates).is_err());
    }

    #[test]
    fn test_find_is_substring_match() {
        let season = sample();
        let found = season.find(StatKey::Field(Stat::Pts), "2");
        // 112.0, 120.0, 102.0
        assert_eq!(found.len(), 3);

        let houston = season.find(StatKey::Field(Stat::Opponent), "HOU");
        assert_eq!(houston.len(), 2);
        assert!(season.find(StatKey::Field(Stat::Opponent), "hou").is_empty());

        let by_id = season.find(StatKey::Id, "LAL 2023");
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn test_sort_is_stable() {
        let season = sample();
        let desc = season.sort(Stat::Pts, true);
        let ids: Vec<String> = desc.iter().map(Game::id).collect();
        assert_eq!(
            ids,
            vec![
                "UTA LAL 2023-01-05",
                "UTA HOU 2023-01-01",
                "UTA HOU 2023-01-07",
                "UTA DEN 2023-01-03",
                "UTA PHX 2023-01-09",
            ]
        );

        let asc = season.sort(Stat::Pts, false);
        assert_eq!(asc.games()[0].id(), "UTA DEN 2023-01-03");
        assert_eq!(asc.games()[1].id(), "UTA PHX 2023-01-09");
        assert_eq!(asc.games()[4].id(), "UTA LAL 2023-01-05");
    }

    #[test]
    fn test_sort_by_text() {
        let sorted = sample().sort(Stat::Opponent, false);
        let opponents: Vec<&str> = sorted.iter().map(|g| g.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["DEN", "HOU", "HOU", "LAL", "PHX"]);
    }

    #[test]
    fn test_empty_season_aggregates() {
        let season = Season::new();
        assert_eq!(season.average(Stat::Pts).unwrap(), None);
        assert_eq!(season.median(Stat::Pts).unwrap(), None);
        assert_eq!(season.std_dev(Stat::Pts).unwrap(), None);
        assert_eq!(season.win_percentage(), None);
        assert_eq!(season.mode(StatKey::Field(Stat::Pts)), None);
    }

    #[test]
    fn test_median_and_std_dev() {
        let season = sample();
        assert_eq!(season.median(Stat::Pts).unwrap(), Some(102.0));

        let sd = season.std_dev(Stat::Pts).unwrap().unwrap();
        let values = [112.0, 98.0, 120.0, 102.0, 98.0];
        let mean = values.iter().sum::<f64>() / 5.0;
        let expected = (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 4.0).sqrt();
        assert!((sd - expected).abs() < 1e-9);
    }

    #[test]
    fn test_mode() {
        let season = sample();
        let mode = season.mode(StatKey::Field(Stat::Pts)).unwrap();
        assert_eq!(mode.to_string(), "98.0: 2");

        let opp = season.mode(StatKey::Field(Stat::Opponent)).unwrap();
        assert_eq!(opp.to_string(), "HOU: 2");
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        let season = sample();
        let mode = season.mode(StatKey::Id).unwrap();
        assert_eq!(mode.to_string(), "UTA HOU 2023-01-01: 1");

        let outcome = season.mode(StatKey::Field(Stat::Outcome)).unwrap();
        assert_eq!(outcome, ModeResult { value: "W".to_string(), count: 3 });
    }

    #[test]
    fn test_add_and_delete_chain() {
        let mut season = sample();
        let before = season.clone();
        let extra = game("UTA", "BOS", "2023-01-11", "W", 130.0);
        let id = extra.id();

        season.add_game(extra).delete_game(&id);
        assert_eq!(season, before);
    }

    #[test]
    fn test_delete_removes_all_duplicates() {
        let mut season = sample();
        season
            .add_game(game("UTA", "HOU", "2023-01-01", "L", 80.0))
            .delete_game("UTA HOU 2023-01-01")
            .delete_game("NOT A GAME");

        assert_eq!(season.len(), 4);
        assert!(season.find(StatKey::Id, "UTA HOU 2023-01-01").is_empty());
    }

    #[test]
    fn test_edit_stat_affects_duplicates() {
        let mut season = sample();
        season.add_game(game("UTA", "HOU", "2023-01-01", "L", 80.0));

        season.edit_stat("UTA HOU 2023-01-01", Stat::Ast, "30").unwrap();
        let edited: Vec<f64> = season
            .find(StatKey::Id, "UTA HOU 2023-01-01")
            .iter()
            .map(|g| g.ast)
            .collect();
        assert_eq!(edited, vec![30.0, 30.0]);
    }

    #[test]
    fn test_edit_stat_duplicates_all_or_nothing() {
        let mut season = sample();
        let mut no_free_throws = game("UTA", "HOU", "2023-01-01", "L", 80.0);
        no_free_throws.set(Stat::Fta, "0").unwrap();
        season.add_game(no_free_throws);
        let before = season.clone();

        // the second match has no attempts left once fga is zeroed
        let err = season.edit_stat("UTA HOU 2023-01-01", Stat::Fga, "0").unwrap_err();
        assert!(matches!(err, StatError::Division { .. }));
        assert_eq!(season, before);
        assert_eq!(season.games()[0].fga, 85.0);
    }

    #[test]
    fn test_edit_stat_bad_value() {
        let mut season = sample();
        let err = season.edit_stat("UTA HOU 2023-01-01", Stat::Ast, "lots").unwrap_err();
        assert!(matches!(err, StatError::Parse { .. }));
        assert_eq!(season, sample());

        season.edit_stat("UTA HOU 2023-01-01", Stat::Team, "SLC").unwrap();
        assert_eq!(season.games()[0].team, "SLC");
    }

    #[test]
    fn test_reset() {
        let mut season = sample();
        season.reset();
        assert!(season.is_empty());
    }

    #[test]
    fn test_display_one_line_per_game() {
        let text = sample().to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().all(|line| line.starts_with("UTA, ")));
    }
}
