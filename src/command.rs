//! Interactive command surface.
//!
//! A line is split on whitespace into a command name and its arguments. The
//! name is looked up in [`COMMANDS`]; the argument count is checked against
//! the entry before it runs. Errors are returned to the caller, which reports
//! them and keeps the session alive.

use std::fmt::Write;

use tracing::debug;

use crate::config::Config;
use crate::constants::NO_GAMES;
use crate::display::render_table;
use crate::error::{Result, StatError};
use crate::game::Game;
use crate::plot::DensityGrid;
use crate::season::{Predicate, Season};
use crate::stat::{coerce_number, format_number, parse_descending, Comparison, Stat, StatKey};

/// What the session should do after a command.
#[derive(Debug)]
pub enum Reply {
    /// Replace the live season with this one
    Replace(Season),
    /// Print this text
    Print(String),
    /// Nothing to show (the season may have been changed in place)
    Silent,
    /// End the session
    Quit,
}

type Handler = fn(&mut Season, &[&str], &Config) -> Result<Reply>;

pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub min_args: usize,
    /// `None` for commands taking any number of trailing arguments
    pub max_args: Option<usize>,
    run: Handler,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    fn check_arity(&self, found: usize) -> Result<()> {
        let fits = found >= self.min_args && self.max_args.map_or(true, |max| found <= max);
        if fits {
            return Ok(());
        }
        let expected = match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        };
        Err(StatError::Argument {
            command: self.name.to_string(),
            expected,
            found,
        })
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "filter",
        aliases: &[],
        usage: "filter <stat> <threshold> [greater|lower]",
        summary: "keep games strictly above (default) or below a threshold",
        min_args: 2,
        max_args: Some(3),
        run: filter,
    },
    CommandSpec {
        name: "multi_filter",
        aliases: &[],
        usage: "multi_filter <stat> <threshold> <greater|lower> [...]",
        summary: "apply several filters in sequence",
        min_args: 3,
        max_args: None,
        run: multi_filter,
    },
    CommandSpec {
        name: "find",
        aliases: &[],
        usage: "find <stat|id> <text>",
        summary: "keep games whose field contains the text",
        min_args: 2,
        max_args: None,
        run: find,
    },
    CommandSpec {
        name: "sort",
        aliases: &[],
        usage: "sort <stat> [true|false]",
        summary: "order games by a field, descending unless false",
        min_args: 1,
        max_args: Some(2),
        run: sort,
    },
    CommandSpec {
        name: "average",
        aliases: &["avg"],
        usage: "average <stat>",
        summary: "mean of a numeric field",
        min_args: 1,
        max_args: Some(1),
        run: average,
    },
    CommandSpec {
        name: "median",
        aliases: &[],
        usage: "median <stat>",
        summary: "median of a numeric field",
        min_args: 1,
        max_args: Some(1),
        run: median,
    },
    CommandSpec {
        name: "stddev",
        aliases: &["std_dev"],
        usage: "stddev <stat>",
        summary: "sample standard deviation of a numeric field",
        min_args: 1,
        max_args: Some(1),
        run: std_dev,
    },
    CommandSpec {
        name: "winPercentage",
        aliases: &["win_percentage"],
        usage: "winPercentage",
        summary: "share of games won",
        min_args: 0,
        max_args: Some(0),
        run: win_percentage,
    },
    CommandSpec {
        name: "mode",
        aliases: &[],
        usage: "mode <stat|id>",
        summary: "most frequent value and its count",
        min_args: 1,
        max_args: Some(1),
        run: mode,
    },
    CommandSpec {
        name: "len",
        aliases: &[],
        usage: "len",
        summary: "number of games",
        min_args: 0,
        max_args: Some(0),
        run: len,
    },
    CommandSpec {
        name: "add_game",
        aliases: &[],
        usage: "add_game <team> <opponent> <date> <W|L> <20 stats>",
        summary: "append a game",
        min_args: 24,
        max_args: Some(24),
        run: add_game,
    },
    CommandSpec {
        name: "delete_game",
        aliases: &[],
        usage: "delete_game <team> <opponent> <date>",
        summary: "remove every game with this identity",
        min_args: 1,
        max_args: None,
        run: delete_game,
    },
    CommandSpec {
        name: "edit_stat",
        aliases: &[],
        usage: "edit_stat <team> <opponent> <date> <stat> <value>",
        summary: "set a field on every game with this identity",
        min_args: 5,
        max_args: Some(5),
        run: edit_stat,
    },
    CommandSpec {
        name: "load",
        aliases: &[],
        usage: "load <path>",
        summary: "append games from a tab-delimited file",
        min_args: 1,
        max_args: Some(1),
        run: load,
    },
    CommandSpec {
        name: "save",
        aliases: &[],
        usage: "save <path>",
        summary: "write raw fields to a tab-delimited file",
        min_args: 1,
        max_args: Some(1),
        run: save,
    },
    CommandSpec {
        name: "reset",
        aliases: &[],
        usage: "reset",
        summary: "remove every game",
        min_args: 0,
        max_args: Some(0),
        run: reset,
    },
    CommandSpec {
        name: "out",
        aliases: &[],
        usage: "out",
        summary: "print every game on one line",
        min_args: 0,
        max_args: Some(0),
        run: out,
    },
    CommandSpec {
        name: "show",
        aliases: &[],
        usage: "show",
        summary: "print the season as a table",
        min_args: 0,
        max_args: Some(0),
        run: show,
    },
    CommandSpec {
        name: "plot",
        aliases: &[],
        usage: "plot <stat> [stat]",
        summary: "win/loss density by one or two stats",
        min_args: 1,
        max_args: Some(2),
        run: plot,
    },
    CommandSpec {
        name: "help",
        aliases: &["?"],
        usage: "help [command]",
        summary: "list commands",
        min_args: 0,
        max_args: Some(1),
        run: help,
    },
    CommandSpec {
        name: "quit",
        aliases: &["exit"],
        usage: "quit",
        summary: "end the session",
        min_args: 0,
        max_args: Some(0),
        run: quit,
    },
];

pub fn lookup(name: &str) -> Result<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.matches(name))
        .ok_or_else(|| StatError::CommandNotFound(name.to_string()))
}

/// Parse and run one line against `season`.
///
/// Commands that edit in place change `season` directly; commands that
/// produce a new collection return it in [`Reply::Replace`].
pub fn dispatch(season: &mut Season, line: &str, config: &Config) -> Result<Reply> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Reply::Silent);
    };
    let args: Vec<&str> = words.collect();
    let spec = lookup(name)?;
    spec.check_arity(args.len())?;
    debug!(command = spec.name, args = args.len(), "dispatch");
    (spec.run)(season, &args, config)
}

fn print_number(value: Option<f64>) -> Reply {
    Reply::Print(value.map_or_else(|| NO_GAMES.to_string(), format_number))
}

fn filter(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let stat: Stat = args[0].parse()?;
    let threshold = coerce_number("threshold", args[1])?;
    let comparison = match args.get(2) {
        Some(text) => text.parse()?,
        None => Comparison::Greater,
    };
    season.filter(stat, threshold, comparison).map(Reply::Replace)
}

fn multi_filter(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    if args.len() % 3 != 0 {
        return Err(StatError::Argument {
            command: "multi_filter".to_string(),
            expected: "a multiple of 3".to_string(),
            found: args.len(),
        });
    }
    let predicates = args
        .chunks(3)
        .map(|chunk| -> Result<Predicate> {
            Ok(Predicate::new(
                chunk[0].parse()?,
                coerce_number("threshold", chunk[1])?,
                chunk[2].parse()?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    season.multi_filter(&predicates).map(Reply::Replace)
}

fn find(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let key: StatKey = args[0].parse()?;
    Ok(Reply::Replace(season.find(key, &args[1..].join(" "))))
}

fn sort(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let stat: Stat = args[0].parse()?;
    let descending = match args.get(1) {
        Some(flag) => parse_descending(flag)?,
        None => true,
    };
    Ok(Reply::Replace(season.sort(stat, descending)))
}

fn average(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.average(args[0].parse()?).map(print_number)
}

fn median(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.median(args[0].parse()?).map(print_number)
}

fn std_dev(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.std_dev(args[0].parse()?).map(print_number)
}

fn win_percentage(season: &mut Season, _: &[&str], _: &Config) -> Result<Reply> {
    Ok(print_number(season.win_percentage()))
}

fn mode(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let key: StatKey = args[0].parse()?;
    Ok(Reply::Print(
        season
            .mode(key)
            .map_or_else(|| NO_GAMES.to_string(), |mode| mode.to_string()),
    ))
}

fn len(season: &mut Season, _: &[&str], _: &Config) -> Result<Reply> {
    Ok(Reply::Print(season.len().to_string()))
}

fn add_game(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.add_game(Game::from_fields(args)?);
    Ok(Reply::Silent)
}

fn delete_game(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.delete_game(&args.join(" "));
    Ok(Reply::Silent)
}

fn edit_stat(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let id = args[..3].join(" ");
    let stat: Stat = args[3].parse()?;
    season.edit_stat(&id, stat, args[4])?;
    Ok(Reply::Silent)
}

fn load(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.load(args[0])?;
    Ok(Reply::Silent)
}

fn save(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    season.save(args[0])?;
    Ok(Reply::Silent)
}

fn reset(season: &mut Season, _: &[&str], _: &Config) -> Result<Reply> {
    season.reset();
    Ok(Reply::Silent)
}

fn out(season: &mut Season, _: &[&str], _: &Config) -> Result<Reply> {
    Ok(Reply::Print(season.to_string().trim_end().to_string()))
}

fn show(season: &mut Season, _: &[&str], config: &Config) -> Result<Reply> {
    Ok(Reply::Print(render_table(season, config.display.precision)))
}

fn plot(season: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    let x: Stat = args[0].parse()?;
    let y = args.get(1).map(|name| name.parse::<Stat>()).transpose()?;
    let grid = DensityGrid::build(season, x, y)?;
    Ok(Reply::Print(
        grid.map_or_else(|| NO_GAMES.to_string(), |grid| grid.render()),
    ))
}

fn help(_: &mut Season, args: &[&str], _: &Config) -> Result<Reply> {
    if let Some(name) = args.first() {
        let spec = lookup(name)?;
        return Ok(Reply::Print(format!("{}\n  {}", spec.usage, spec.summary)));
    }
    let width = COMMANDS.iter().map(|spec| spec.usage.len()).max().unwrap_or(0);
    let mut text = String::new();
    for spec in COMMANDS {
        let _ = writeln!(text, "{: <width$}  {}", spec.usage, spec.summary);
    }
    let stats: Vec<&str> = Stat::ALL.iter().map(|stat| stat.name()).collect();
    let _ = write!(text, "stats: {}", stats.join(" "));
    Ok(Reply::Print(text))
}

fn quit(_: &mut Season, _: &[&str], _: &Config) -> Result<Reply> {
    Ok(Reply::Quit)
}
