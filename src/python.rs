//! Python bindings, built with the `python` feature.
//!
//! Stat names are plain strings on the Python side; unknown names raise
//! `KeyError`, file problems `IOError`, everything else `ValueError`.

use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::constants::NO_GAMES;
use crate::display::render_table;
use crate::error::StatError;
use crate::game::Game;
use crate::plot::DensityGrid;
use crate::season::{Predicate, Season};
use crate::stat::{parse_descending, FieldValue, Stat, StatKey};

impl From<StatError> for PyErr {
    fn from(err: StatError) -> PyErr {
        match err {
            StatError::UnknownField(_) => PyKeyError::new_err(err.to_string()),
            StatError::Io(_) => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Sort direction as Python passes it: a bool or the strings "true"/"false".
#[derive(FromPyObject)]
enum Descending {
    Flag(bool),
    Text(String),
}

impl Descending {
    fn resolve(self) -> PyResult<bool> {
        match self {
            Descending::Flag(flag) => Ok(flag),
            Descending::Text(text) => Ok(parse_descending(&text)?),
        }
    }
}

#[pyclass(name = "Game")]
#[derive(Clone)]
pub struct PyGame {
    inner: Game,
}

#[pymethods]
impl PyGame {
    /// Build a game from a stored row of 24 strings.
    #[new]
    fn new(fields: Vec<String>) -> PyResult<Self> {
        Ok(PyGame {
            inner: Game::from_fields(&fields)?,
        })
    }

    fn id(&self) -> String {
        self.inner.id()
    }

    /// Any field by name; numbers come back as float, identity fields as str.
    fn get(&self, py: Python<'_>, stat: &str) -> PyResult<PyObject> {
        let stat: Stat = stat.parse()?;
        Ok(match self.inner.get(stat) {
            FieldValue::Number(n) => n.into_py(py),
            FieldValue::Text(s) => s.into_py(py),
        })
    }

    fn raw_fields(&self) -> Vec<String> {
        self.inner.raw_fields()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Game({:?})", self.inner.id())
    }
}

#[pyclass(name = "Season")]
#[derive(Clone, Default)]
pub struct PySeason {
    inner: Season,
}

impl From<Season> for PySeason {
    fn from(inner: Season) -> Self {
        PySeason { inner }
    }
}

#[pymethods]
impl PySeason {
    #[new]
    #[pyo3(signature = (games = None))]
    fn new(games: Option<Vec<PyGame>>) -> Self {
        let games = games
            .unwrap_or_default()
            .into_iter()
            .map(|game| game.inner)
            .collect();
        Season::from_games(games).into()
    }

    #[staticmethod]
    fn from_rows(rows: Vec<Vec<String>>) -> PyResult<Self> {
        Ok(Season::from_rows(&rows)?.into())
    }

    #[pyo3(signature = (stat, threshold, comparison = "greater"))]
    fn filter(&self, stat: &str, threshold: f64, comparison: &str) -> PyResult<Self> {
        Ok(self
            .inner
            .filter(stat.parse()?, threshold, comparison.parse()?)?
            .into())
    }

    fn multi_filter(&self, filters: Vec<(String, f64, String)>) -> PyResult<Self> {
        let predicates = filters
            .iter()
            .map(|(stat, threshold, comparison)| -> PyResult<Predicate> {
                Ok(Predicate::new(stat.parse()?, *threshold, comparison.parse()?))
            })
            .collect::<PyResult<Vec<_>>>()?;
        Ok(self.inner.multi_filter(&predicates)?.into())
    }

    fn find(&self, stat: &str, value: &str) -> PyResult<Self> {
        let key: StatKey = stat.parse()?;
        Ok(self.inner.find(key, value).into())
    }

    #[pyo3(signature = (stat, descending = None))]
    fn sort(&self, stat: &str, descending: Option<Descending>) -> PyResult<Self> {
        let descending = match descending {
            Some(flag) => flag.resolve()?,
            None => true,
        };
        Ok(self.inner.sort(stat.parse()?, descending).into())
    }

    /// Mean of a stat, or None for an empty season.
    fn average(&self, stat: &str) -> PyResult<Option<f64>> {
        Ok(self.inner.average(stat.parse()?)?)
    }

    fn median(&self, stat: &str) -> PyResult<Option<f64>> {
        Ok(self.inner.median(stat.parse()?)?)
    }

    fn std_dev(&self, stat: &str) -> PyResult<Option<f64>> {
        Ok(self.inner.std_dev(stat.parse()?)?)
    }

    fn win_percentage(&self) -> Option<f64> {
        self.inner.win_percentage()
    }

    /// "value: count", or None for an empty season.
    fn mode(&self, stat: &str) -> PyResult<Option<String>> {
        let key: StatKey = stat.parse()?;
        Ok(self.inner.mode(key).map(|mode| mode.to_string()))
    }

    fn add_game(mut slf: PyRefMut<'_, Self>, game: PyGame) -> PyRefMut<'_, Self> {
        slf.inner.add_game(game.inner);
        slf
    }

    fn delete_game(mut slf: PyRefMut<'_, Self>, id: &str) -> PyRefMut<'_, Self> {
        slf.inner.delete_game(id);
        slf
    }

    fn edit_stat<'py>(
        mut slf: PyRefMut<'py, Self>,
        id: &str,
        stat: &str,
        value: &str,
    ) -> PyResult<PyRefMut<'py, Self>> {
        slf.inner.edit_stat(id, stat.parse()?, value)?;
        Ok(slf)
    }

    fn load(mut slf: PyRefMut<'_, Self>, path: &str) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.load(path)?;
        Ok(slf)
    }

    fn save(&self, path: &str) -> PyResult<()> {
        Ok(self.inner.save(path)?)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn games(&self) -> Vec<PyGame> {
        self.inner
            .iter()
            .map(|game| PyGame { inner: game.clone() })
            .collect()
    }

    #[pyo3(signature = (precision = 1))]
    fn table(&self, precision: usize) -> String {
        render_table(&self.inner, precision)
    }

    #[pyo3(signature = (stat1, stat2 = None))]
    fn plot(&self, stat1: &str, stat2: Option<&str>) -> PyResult<String> {
        let y = stat2.map(str::parse::<Stat>).transpose()?;
        let grid = DensityGrid::build(&self.inner, stat1.parse()?, y)?;
        Ok(grid.map_or_else(|| NO_GAMES.to_string(), |grid| grid.render()))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Season({} games)", self.inner.len())
    }
}

#[pymodule]
fn boxscore(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGame>()?;
    m.add_class::<PySeason>()?;
    m.add("NO_GAMES", NO_GAMES)?;
    Ok(())
}
