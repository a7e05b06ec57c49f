mod duel_setup;
mod highscore_table;
mod host_command;
mod notification;
mod puzzle;
mod roster;
mod score_entry;
mod session_log;
mod timer_state;

pub use duel_setup::{DuelSetup, DUEL_PLAYERS, DUEL_PUZZLES};
pub use highscore_table::{HighscoreTable, RankedRow, MAX_HIGHSCORES};
pub use host_command::HostCommand;
pub use notification::{Notification, NotificationLevel};
pub use puzzle::Puzzle;
pub use roster::{PlayerSlot, Roster, MAX_PLAYERS, MIN_PLAYERS};
pub use score_entry::{ScoreEntry, DEFAULT_PLAYER};
pub use session_log::SessionScoreLog;
pub use timer_state::TimerState;
