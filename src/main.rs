//! Boxscore CLI
//!
//! Loads a season file, optionally prints the table and a win/loss plot, then
//! reads commands from stdin until `quit` or end of input.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use boxscore::command::{dispatch, Reply};
use boxscore::display::render_table;
use boxscore::plot::DensityGrid;
use boxscore::{Config, Season};

#[derive(Parser)]
#[command(name = "boxscore")]
#[command(about = "Explore a season of basketball box scores", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "boxscore.toml")]
    config: String,

    /// Season file to load (overrides the config)
    #[arg(short, long)]
    season: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Don't print the table after loading
    #[arg(long)]
    no_show: bool,

    /// Don't print the start-up plot
    #[arg(long)]
    no_plot: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Run a single command against the season and exit
    Exec {
        /// Command and its arguments, e.g. `average pts`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        line: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let default = if verbose { "debug" } else { config.log.level.as_str() };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    init_tracing(&config, cli.verbose);

    if let Some(Commands::Init) = cli.command {
        Config::default().save(&cli.config)?;
        println!("Created default config at {}", cli.config);
        return Ok(());
    }

    if let Some(path) = cli.season {
        config.data.season_file = path;
    }
    let season = load_season(&config.data.season_file)?;

    if let Some(Commands::Exec { line }) = cli.command {
        let mut season = season;
        match dispatch(&mut season, &line.join(" "), &config)? {
            Reply::Replace(result) => {
                println!("{}", render_table(&result, config.display.precision))
            }
            Reply::Print(text) => println!("{}", text),
            Reply::Silent | Reply::Quit => {}
        }
        return Ok(());
    }

    if config.display.show_on_start && !cli.no_show {
        println!("{}", render_table(&season, config.display.precision));
    }
    if !cli.no_plot {
        if let Some((x, y)) = config.plot.stats()? {
            if let Some(grid) = DensityGrid::build(&season, x, y)? {
                println!("{}", grid.render());
            }
        }
    }

    Session::new(season, config).repl()
}

/// Load the configured file, or start empty when it does not exist yet.
fn load_season(path: &str) -> Result<Season> {
    let mut season = Season::new();
    if Path::new(path).exists() {
        season
            .load(path)
            .with_context(|| format!("Failed to load season file {}", path))?;
    } else {
        warn!(path, "season file not found, starting with an empty season");
    }
    Ok(season)
}

struct Session {
    season: Season,
    config: Config,
}

impl Session {
    fn new(season: Season, config: Config) -> Self {
        Session { season, config }
    }

    /// Run one line. Returns false when the session should end.
    fn execute(&mut self, line: &str) -> Result<bool> {
        match dispatch(&mut self.season, line, &self.config)? {
            Reply::Replace(season) => {
                info!(games = season.len(), "season replaced");
                self.season = season;
            }
            Reply::Print(text) => println!("{}", text),
            Reply::Silent => {}
            Reply::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn repl(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            match self.execute(line.trim()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!(command = line.trim(), error = %e, "command failed");
                    eprintln!("Error: {:#}", e);
                }
            }
        }
        Ok(())
    }
}
