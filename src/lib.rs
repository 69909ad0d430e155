//! Boxscore - season box-score tracking and exploration.
//!
//! Games are loaded from tab-delimited files into a [`Season`], which can be
//! filtered, sorted, searched, aggregated and edited by stat name. Python
//! bindings are available with the `python` feature.

pub mod command;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod game;
pub mod plot;
pub mod season;
pub mod stat;
pub mod tsv;

#[cfg(feature = "python")]
mod python;

pub use config::Config;
pub use constants::{FTA_WEIGHT, ID_SEPARATOR, NO_GAMES, ROW_FIELD_COUNT};
pub use error::{Result, StatError};
pub use game::{Game, Outcome};
pub use season::{ModeResult, Predicate, Season};
pub use stat::{Comparison, FieldValue, Stat, StatKey};
