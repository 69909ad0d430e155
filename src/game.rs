use std::fmt;
use std::str::FromStr;

use crate::constants::{
    FTA_WEIGHT, IDENTITY_FIELD_COUNT, ID_SEPARATOR, LOSS_CODE, ROW_FIELD_COUNT, WIN_CODE,
};
use crate::error::{Result, StatError};
use crate::stat::{coerce_number, FieldValue, Stat};

/// Result of a game from the tracked team's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Win => WIN_CODE,
            Outcome::Loss => LOSS_CODE,
        }
    }
}

impl FromStr for Outcome {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            WIN_CODE => Ok(Outcome::Win),
            LOSS_CODE => Ok(Outcome::Loss),
            _ => Err(StatError::InvalidOutcome(s.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One team's box score for a single game.
///
/// The derived fields (`opts`, `advscore`, `win`) are computed when the game
/// is built and again whenever a raw field is edited through [`Game::set`].
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub team: String,
    pub opponent: String,
    pub date: String,
    pub outcome: Outcome,

    pub min: f64,
    pub pts: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fgp: f64,
    pub tpm: f64,
    pub tpa: f64,
    pub tpp: f64,
    pub ftm: f64,
    pub fta: f64,
    pub ftp: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub pm: f64,

    /// Opponent's points (points minus plus/minus)
    pub opts: f64,

    /// pts * (pts + reb + ast) / (2 * (fga + 0.44 * fta))
    pub advscore: f64,

    /// 1.0 for a win, 0.0 for a loss
    pub win: f64,
}

impl Game {
    /// Build a game from one stored row: team, opponent, date, outcome,
    /// then the twenty numeric columns in file order.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != ROW_FIELD_COUNT {
            return Err(StatError::FieldCount {
                expected: ROW_FIELD_COUNT,
                found: fields.len(),
            });
        }

        let mut numbers = [0.0; ROW_FIELD_COUNT - IDENTITY_FIELD_COUNT];
        for (slot, (stat, raw)) in numbers
            .iter_mut()
            .zip(Stat::RAW_NUMERIC.iter().zip(&fields[IDENTITY_FIELD_COUNT..]))
        {
            *slot = coerce_number(stat.name(), raw.as_ref())?;
        }
        let [
            min, pts, fgm, fga, fgp, tpm, tpa, tpp, ftm, fta, ftp, oreb, dreb, reb, ast,
            stl, blk, tov, pf, pm,
        ] = numbers;

        let mut game = Game {
            team: fields[0].as_ref().to_string(),
            opponent: fields[1].as_ref().to_string(),
            date: fields[2].as_ref().to_string(),
            outcome: fields[3].as_ref().parse()?,
            min,
            pts,
            fgm,
            fga,
            fgp,
            tpm,
            tpa,
            tpp,
            ftm,
            fta,
            ftp,
            oreb,
            dreb,
            reb,
            ast,
            stl,
            blk,
            tov,
            pf,
            pm,
            opts: 0.0,
            advscore: 0.0,
            win: 0.0,
        };
        game.recompute_derived()?;
        Ok(game)
    }

    /// Identity key: team, opponent and date joined by a space.
    pub fn id(&self) -> String {
        [self.team.as_str(), self.opponent.as_str(), self.date.as_str()].join(ID_SEPARATOR)
    }

    /// Read any field by name.
    pub fn get(&self, stat: Stat) -> FieldValue {
        match stat {
            Stat::Team => FieldValue::Text(self.team.clone()),
            Stat::Opponent => FieldValue::Text(self.opponent.clone()),
            Stat::Date => FieldValue::Text(self.date.clone()),
            Stat::Outcome => FieldValue::Text(self.outcome.code().to_string()),
            numeric => match self.numeric(numeric) {
                Some(value) => FieldValue::Number(*value),
                None => unreachable!("{numeric} has no numeric slot"),
            },
        }
    }

    /// Read a numeric field, rejecting the identity fields.
    pub fn number(&self, stat: Stat) -> Result<f64> {
        self.numeric(stat).copied().ok_or_else(|| {
            StatError::InvalidArgument(format!("{} is not a numeric field", stat))
        })
    }

    /// Overwrite one field from its textual form.
    ///
    /// Numeric fields are coerced to `f64`. Editing a raw stat or the outcome
    /// recomputes the derived fields; if that fails the game is left as it was.
    /// Editing a derived field stores the value as-is until the next raw edit.
    pub fn set(&mut self, stat: Stat, value: &str) -> Result<()> {
        match stat {
            Stat::Team => self.team = value.to_string(),
            Stat::Opponent => self.opponent = value.to_string(),
            Stat::Date => self.date = value.to_string(),
            Stat::Outcome => {
                let mut edited = self.clone();
                edited.outcome = value.parse()?;
                edited.recompute_derived()?;
                *self = edited;
            }
            derived if derived.is_derived() => {
                let number = coerce_number(derived.name(), value)?;
                if let Some(slot) = self.numeric_mut(derived) {
                    *slot = number;
                }
            }
            raw => {
                let number = coerce_number(raw.name(), value)?;
                let mut edited = self.clone();
                if let Some(slot) = edited.numeric_mut(raw) {
                    *slot = number;
                }
                edited.recompute_derived()?;
                *self = edited;
            }
        }
        Ok(())
    }

    /// Recompute `opts`, `advscore` and `win` from the raw fields.
    pub fn recompute_derived(&mut self) -> Result<()> {
        let denominator = 2.0 * (self.fga + FTA_WEIGHT * self.fta);
        if denominator == 0.0 {
            return Err(StatError::Division { id: self.id() });
        }
        self.opts = self.pts - self.pm;
        self.advscore = self.pts * (self.pts + self.reb + self.ast) / denominator;
        self.win = match self.outcome {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
        };
        Ok(())
    }

    /// The stored row for this game; derived fields are not included.
    pub fn raw_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.team.clone(),
            self.opponent.clone(),
            self.date.clone(),
            self.outcome.code().to_string(),
        ];
        fields.extend(Stat::RAW_NUMERIC.iter().map(|&stat| self.get(stat).to_string()));
        fields
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    fn numeric(&self, stat: Stat) -> Option<&f64> {
        Some(match stat {
            Stat::Min => &self.min,
            Stat::Pts => &self.pts,
            Stat::Fgm => &self.fgm,
            Stat::Fga => &self.fga,
            Stat::Fgp => &self.fgp,
            Stat::Tpm => &self.tpm,
            Stat::Tpa => &self.tpa,
            Stat::Tpp => &self.tpp,
            Stat::Ftm => &self.ftm,
            Stat::Fta => &self.fta,
            Stat::Ftp => &self.ftp,
            Stat::Oreb => &self.oreb,
            Stat::Dreb => &self.dreb,
            Stat::Reb => &self.reb,
            Stat::Ast => &self.ast,
            Stat::Stl => &self.stl,
            Stat::Blk => &self.blk,
            Stat::Tov => &self.tov,
            Stat::Pf => &self.pf,
            Stat::Pm => &self.pm,
            Stat::Opts => &self.opts,
            Stat::AdvScore => &self.advscore,
            Stat::Win => &self.win,
            Stat::Team | Stat::Opponent | Stat::Date | Stat::Outcome => return None,
        })
    }

    fn numeric_mut(&mut self, stat: Stat) -> Option<&mut f64> {
        Some(match stat {
            Stat::Min => &mut self.min,
            Stat::Pts => &mut self.pts,
            Stat::Fgm => &mut self.fgm,
            Stat::Fga => &mut self.fga,
            Stat::Fgp => &mut self.fgp,
            Stat::Tpm => &mut self.tpm,
            Stat::Tpa => &mut self.tpa,
            Stat::Tpp => &mut self.tpp,
            Stat::Ftm => &mut self.ftm,
            Stat::Fta => &mut self.fta,
            Stat::Ftp => &mut self.ftp,
            Stat::Oreb => &mut self.oreb,
            Stat::Dreb => &mut self.dreb,
            Stat::Reb => &mut self.reb,
            Stat::Ast => &mut self.ast,
            Stat::Stl => &mut self.stl,
            Stat::Blk => &mut self.blk,
            Stat::Tov => &mut self.tov,
            Stat::Pf => &mut self.pf,
            Stat::Pm => &mut self.pm,
            Stat::Opts => &mut self.opts,
            Stat::AdvScore => &mut self.advscore,
            Stat::Win => &mut self.win,
            Stat::Team | Stat::Opponent | Stat::Date | Stat::Outcome => return None,
        })
    }
}

/// All fields, raw then derived, separated by ", ".
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stat) in Stat::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.get(*stat))?;
        }
        Ok(())
    }
}
