use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatError};

/// Every field of a game that can be selected by name at run time.
///
/// Variants are listed in table order: the four identity fields, the twenty
/// raw box-score columns in file order, then the derived fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    Team,
    Opponent,
    Date,
    Outcome,
    Min,
    Pts,
    Fgm,
    Fga,
    Fgp,
    Tpm,
    Tpa,
    Tpp,
    Ftm,
    Fta,
    Ftp,
    Oreb,
    Dreb,
    Reb,
    Ast,
    Stl,
    Blk,
    Tov,
    Pf,
    Pm,
    Opts,
    AdvScore,
    Win,
}

impl Stat {
    pub const ALL: [Stat; 27] = [
        Stat::Team,
        Stat::Opponent,
        Stat::Date,
        Stat::Outcome,
        Stat::Min,
        Stat::Pts,
        Stat::Fgm,
        Stat::Fga,
        Stat::Fgp,
        Stat::Tpm,
        Stat::Tpa,
        Stat::Tpp,
        Stat::Ftm,
        Stat::Fta,
        Stat::Ftp,
        Stat::Oreb,
        Stat::Dreb,
        Stat::Reb,
        Stat::Ast,
        Stat::Stl,
        Stat::Blk,
        Stat::Tov,
        Stat::Pf,
        Stat::Pm,
        Stat::Opts,
        Stat::AdvScore,
        Stat::Win,
    ];

    /// The twenty numeric columns of a stored row, in file order.
    pub const RAW_NUMERIC: [Stat; 20] = [
        Stat::Min,
        Stat::Pts,
        Stat::Fgm,
        Stat::Fga,
        Stat::Fgp,
        Stat::Tpm,
        Stat::Tpa,
        Stat::Tpp,
        Stat::Ftm,
        Stat::Fta,
        Stat::Ftp,
        Stat::Oreb,
        Stat::Dreb,
        Stat::Reb,
        Stat::Ast,
        Stat::Stl,
        Stat::Blk,
        Stat::Tov,
        Stat::Pf,
        Stat::Pm,
    ];

    /// Canonical name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Stat::Team => "team",
            Stat::Opponent => "opponent",
            Stat::Date => "date",
            Stat::Outcome => "outcome",
            Stat::Min => "min",
            Stat::Pts => "pts",
            Stat::Fgm => "fgm",
            Stat::Fga => "fga",
            Stat::Fgp => "fgp",
            Stat::Tpm => "tpm",
            Stat::Tpa => "tpa",
            Stat::Tpp => "tpp",
            Stat::Ftm => "ftm",
            Stat::Fta => "fta",
            Stat::Ftp => "ftp",
            Stat::Oreb => "oreb",
            Stat::Dreb => "dreb",
            Stat::Reb => "reb",
            Stat::Ast => "ast",
            Stat::Stl => "stl",
            Stat::Blk => "blk",
            Stat::Tov => "tov",
            Stat::Pf => "pf",
            Stat::Pm => "pm",
            Stat::Opts => "opts",
            Stat::AdvScore => "advscore",
            Stat::Win => "win",
        }
    }

    /// Column heading as printed in box scores.
    pub fn header(self) -> &'static str {
        match self {
            Stat::Outcome => "w/l",
            Stat::Fgp => "fg%",
            Stat::Tpm => "3pm",
            Stat::Tpa => "3pa",
            Stat::Tpp => "3p%",
            Stat::Ftp => "ft%",
            Stat::Pm => "+/-",
            other => other.name(),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Stat::Team | Stat::Opponent | Stat::Date | Stat::Outcome)
    }

    /// Fields computed from other fields when a game is built.
    pub fn is_derived(self) -> bool {
        matches!(self, Stat::Opts | Stat::AdvScore | Stat::Win)
    }
}

impl FromStr for Stat {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(stat) = Stat::ALL
            .iter()
            .find(|stat| stat.name() == lower || stat.header() == lower)
        {
            return Ok(*stat);
        }
        match lower.as_str() {
            "minutes" => Ok(Stat::Min),
            "points" => Ok(Stat::Pts),
            "plus_minus" => Ok(Stat::Pm),
            "other_points" => Ok(Stat::Opts),
            "advanced_score" => Ok(Stat::AdvScore),
            _ => Err(StatError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a season operation keys on: a single field, or the identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatKey {
    Id,
    Field(Stat),
}

impl FromStr for StatKey {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("id") {
            Ok(StatKey::Id)
        } else {
            s.parse().map(StatKey::Field)
        }
    }
}

impl From<Stat> for StatKey {
    fn from(stat: Stat) -> Self {
        StatKey::Field(stat)
    }
}

/// A field value read off a game.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Total order used for sorting; numbers sort before text.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Render a number the way box-score files store it: integral values keep
/// one decimal place ("100.0"), everything else uses the shortest form.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Parse a user- or file-supplied value for a numeric field.
pub fn coerce_number(field: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| StatError::Parse {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Direction of a threshold filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Lower,
}

impl Comparison {
    /// Strict comparison of `value` against `threshold`.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::Lower => value < threshold,
        }
    }
}

impl FromStr for Comparison {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "greater" => Ok(Comparison::Greater),
            "lower" => Ok(Comparison::Lower),
            _ => Err(StatError::InvalidArgument(format!(
                "comparison must be \"greater\" or \"lower\", got {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Greater => f.write_str("greater"),
            Comparison::Lower => f.write_str("lower"),
        }
    }
}

/// Parse the textual sort direction flag ("true"/"false", any case).
pub fn parse_descending(flag: &str) -> Result<bool> {
    match flag.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(StatError::InvalidArgument(format!(
            "{:?} is not true or false",
            flag
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stat_parses_from_its_name_and_header() {
        for stat in Stat::ALL {
            assert_eq!(stat.name().parse::<Stat>().unwrap(), stat);
            assert_eq!(stat.header().parse::<Stat>().unwrap(), stat);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("FG%".parse::<Stat>().unwrap(), Stat::Fgp);
        assert_eq!("+/-".parse::<Stat>().unwrap(), Stat::Pm);
        assert_eq!("advanced_score".parse::<Stat>().unwrap(), Stat::AdvScore);
        assert_eq!("other_points".parse::<Stat>().unwrap(), Stat::Opts);
    }

    #[test]
    fn test_unknown_stat() {
        let err = "dunks".parse::<Stat>().unwrap_err();
        assert!(matches!(err, StatError::UnknownField(ref name) if name == "dunks"));
    }

    #[test]
    fn test_stat_key() {
        assert_eq!("id".parse::<StatKey>().unwrap(), StatKey::Id);
        assert_eq!("pts".parse::<StatKey>().unwrap(), StatKey::Field(Stat::Pts));
        assert!("nope".parse::<StatKey>().is_err());
    }

    #[test]
    fn test_raw_numeric_matches_table_order() {
        assert_eq!(&Stat::ALL[4..24], &Stat::RAW_NUMERIC[..]);
        assert!(Stat::RAW_NUMERIC.iter().all(|s| s.is_numeric() && !s.is_derived()));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100.0");
        assert_eq!(format_number(-7.0), "-7.0");
        assert_eq!(format_number(0.456), "0.456");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("pts", " 12 ").unwrap(), 12.0);
        let err = coerce_number("pts", "twelve").unwrap_err();
        assert!(matches!(err, StatError::Parse { ref field, .. } if field == "pts"));
    }

    #[test]
    fn test_comparison() {
        assert_eq!("Greater".parse::<Comparison>().unwrap(), Comparison::Greater);
        assert_eq!("lower".parse::<Comparison>().unwrap(), Comparison::Lower);
        assert!(matches!(
            "equal".parse::<Comparison>(),
            Err(StatError::InvalidArgument(_))
        ));
        assert!(Comparison::Greater.holds(2.0, 1.0));
        assert!(!Comparison::Greater.holds(1.0, 1.0));
        assert!(!Comparison::Lower.holds(1.0, 1.0));
    }

    #[test]
    fn test_parse_descending() {
        assert!(parse_descending("TRUE").unwrap());
        assert!(!parse_descending("False").unwrap());
        assert!(matches!(
            parse_descending("yes"),
            Err(StatError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_field_value_ordering() {
        let a = FieldValue::Number(1.0);
        let b = FieldValue::Number(2.0);
        assert_eq!(a.compare(&b), Ordering::Less);
        let x = FieldValue::Text("HOU".to_string());
        let y = FieldValue::Text("UTA".to_string());
        assert_eq!(y.compare(&x), Ordering::Greater);
    }
}
