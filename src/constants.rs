/// Number of identity columns at the start of every row (team, opponent, date, outcome)
pub const IDENTITY_FIELD_COUNT: usize = 4;

/// Number of numeric box-score columns following the identity columns
pub const RAW_STAT_COUNT: usize = 20;

/// Total columns in a stored row
pub const ROW_FIELD_COUNT: usize = IDENTITY_FIELD_COUNT + RAW_STAT_COUNT;

/// Separator between team, opponent and date in a game's identity key
pub const ID_SEPARATOR: &str = " ";

/// Free-throw attempt weight in the shooting-possession estimate
pub const FTA_WEIGHT: f64 = 0.44;

/// Outcome codes as they appear in the data file
pub const WIN_CODE: &str = "W";
pub const LOSS_CODE: &str = "L";

/// Printed in place of an aggregate when the season has no games
pub const NO_GAMES: &str = "NO GAMES EXIST";

/// Widest or tallest density grid, in buckets, that the plot will draw
pub const MAX_PLOT_SPAN: usize = 500;
