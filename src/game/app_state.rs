use std::time::SystemTime;

use log::{debug, info, warn};

use super::remote_sync::{merge_from_remote, push_session};
use super::score_recorder::{RecordOutcome, RecordRequest, ScoreRecorder};
use super::{HighscoreStore, Settings};
use crate::error::{RemoteError, ValidationError};
use crate::events::{Channel, EventEmitter, EventHandler, EventObserver};
use crate::model::{
    DuelSetup, HighscoreTable, HostCommand, Notification, Puzzle, RankedRow, Roster,
    SessionScoreLog, TimerState,
};
use crate::remote::{HttpTable, RemoteTable};

#[derive(Debug)]
pub enum TimerOutcome {
    Started,
    Recorded(RecordOutcome),
}

/// Everything one kiosk session owns. Handlers get `&mut AppState`; nothing
/// lives in globals.
pub struct AppState {
    pub timer: TimerState,
    pub roster: Roster,
    pub duel: DuelSetup,
    selected_puzzle: Option<Puzzle>,
    highscores: HighscoreTable,
    session_log: SessionScoreLog,
    recorder: ScoreRecorder,
    remote: Option<Box<dyn RemoteTable>>,
    notifications: EventEmitter<Notification>,
    observer: EventObserver<Notification>,
}

impl AppState {
    /// A fresh session with an empty table; nothing is read.
    pub fn new(settings: &Settings, remote: Option<Box<dyn RemoteTable>>) -> Self {
        let (notifications, observer) = Channel::new();
        Self {
            timer: TimerState::default(),
            roster: Roster::new(),
            duel: DuelSetup::default(),
            selected_puzzle: None,
            highscores: HighscoreTable::new(),
            session_log: SessionScoreLog::new(),
            recorder: ScoreRecorder::new(HighscoreStore::new(settings.highscore_file.clone())),
            remote,
            notifications,
            observer,
        }
    }

    /// Loads the local file, then replaces it with the sheet's contents when
    /// the sheet can be read.
    pub fn start(settings: &Settings, remote: Option<Box<dyn RemoteTable>>) -> Self {
        let mut state = Self::new(settings, remote);
        state.highscores = state.recorder.store().load();
        state.refresh_from_remote();
        state
    }

    /// Builds the HTTP table from settings, if one is configured.
    pub fn remote_from_settings(settings: &Settings) -> Option<Box<dyn RemoteTable>> {
        let url = settings.remote_url.as_deref()?;
        match HttpTable::new(url, settings.remote_timeout()) {
            Ok(table) => Some(Box::new(table)),
            Err(err) => {
                warn!(target: "app_state", "remote table disabled: {}", err);
                None
            }
        }
    }

    pub fn notifications(&self) -> &EventObserver<Notification> {
        &self.observer
    }

    pub fn highscores(&self) -> &HighscoreTable {
        &self.highscores
    }

    pub fn session_log(&self) -> &SessionScoreLog {
        &self.session_log
    }

    pub fn selected_puzzle(&self) -> Option<Puzzle> {
        self.selected_puzzle
    }

    pub fn select_puzzle(&mut self, puzzle: Option<Puzzle>) {
        self.selected_puzzle = puzzle;
    }

    pub fn refresh_from_remote(&mut self) -> bool {
        let Some(remote) = self.remote.as_ref() else {
            return false;
        };
        match remote.read_all().and_then(|rows| merge_from_remote(&rows)) {
            Ok(table) => {
                info!(target: "app_state", "using {} highscores from the sheet", table.len());
                self.highscores = table;
                true
            }
            Err(err) => {
                warn!(target: "app_state", "falling back to local highscores: {}", err);
                self.notify(Notification::error(
                    "Could not load highscores from the sheet, using local highscores.",
                ));
                false
            }
        }
    }

    /// Start when idle, stop and record when running. Both directions need a
    /// puzzle and a player.
    pub fn toggle_timer(&mut self, now: SystemTime) -> Result<TimerOutcome, ValidationError> {
        let puzzle = self.selected_puzzle.ok_or(ValidationError::MissingPuzzle)?;
        let player = self
            .roster
            .selected()
            .cloned()
            .ok_or(ValidationError::MissingPlayer)?;

        let Some(elapsed) = self.timer.toggle(now) else {
            debug!(target: "timer", "started for {} on {}", player.name, puzzle);
            return Ok(TimerOutcome::Started);
        };

        let request = RecordRequest {
            player: &player.name,
            identifier: &player.identifier,
            puzzle: puzzle.label(),
            elapsed,
            duel_mode: self.duel.enabled,
        };
        let outcome = self
            .recorder
            .record(&mut self.highscores, &mut self.session_log, &request)?;
        if let Err(err) = &outcome.persisted {
            self.notify(Notification::warning(format!(
                "Time recorded but not saved to disk: {}",
                err
            )));
        }
        Ok(TimerOutcome::Recorded(outcome))
    }

    pub fn elapsed_display(&self, now: SystemTime) -> String {
        self.timer.display(now)
    }

    pub fn ranked_rows(&self) -> Vec<RankedRow> {
        self.selected_puzzle
            .map(|p| self.highscores.ranked_rows(p.label()))
            .unwrap_or_default()
    }

    /// Pushes the session log to the sheet. The log is only cleared when the
    /// sheet accepted it.
    pub fn sync_now(&mut self) -> bool {
        if self.session_log.is_empty() {
            self.notify(Notification::info("No new scores in this session to save."));
            return false;
        }

        match self.try_sync() {
            Ok(pushed) => {
                self.session_log.clear();
                self.notify(Notification::success(format!(
                    "{} scores saved online.",
                    pushed
                )));
                true
            }
            Err(err) => {
                warn!(target: "app_state", "sync failed: {}", err);
                self.notify(Notification::error(
                    "Saving scores online failed. Please try again later.",
                ));
                false
            }
        }
    }

    fn try_sync(&mut self) -> Result<usize, RemoteError> {
        let remote = self.remote.as_mut().ok_or(RemoteError::Unconfigured)?;
        let existing = remote.read_all()?;
        push_session(&self.session_log, existing, &mut **remote)
    }

    /// Empties the local table and writes it out. Unsynced session entries
    /// stay queued for the sheet.
    pub fn reset_scores(&mut self) {
        self.highscores.clear();
        match self.recorder.store().save(&self.highscores) {
            Ok(()) => self.notify(Notification::success("Highscores reset.")),
            Err(err) => {
                warn!(target: "app_state", "reset not persisted: {}", err);
                self.notify(Notification::warning(format!(
                    "Highscores reset in memory only: {}",
                    err
                )));
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifications.emit(&notification);
    }

    fn report_timer(&self, result: Result<TimerOutcome, ValidationError>) {
        match result {
            Ok(TimerOutcome::Started) => self.notify(Notification::info("Timer started.")),
            Ok(TimerOutcome::Recorded(outcome)) => {
                let mut message = format!("{}: {}", outcome.entry.player, outcome.entry.time_str());
                if let Some(rank) = outcome.rank(&self.highscores) {
                    message.push_str(&format!(" (rank {})", rank));
                }
                self.notify(Notification::success(message));
            }
            Err(ValidationError::MissingPuzzle) => self.notify(Notification::warning(
                "Please choose a puzzle before starting the timer.",
            )),
            Err(ValidationError::MissingPlayer) => self.notify(Notification::warning(
                "Please choose a player before starting the timer.",
            )),
            Err(err) => self.notify(Notification::warning(err.to_string())),
        }
    }
}

impl EventHandler<HostCommand> for AppState {
    fn handle_event(&mut self, event: &HostCommand) {
        debug!(target: "app_state", "handling {:?}", event);
        match event {
            HostCommand::SetPlayerCount(count) => self.roster.set_player_count(*count),
            HostCommand::SetPlayer(index, name, identifier) => {
                if !self.roster.set_player(*index, name, identifier) {
                    self.notify(Notification::warning(format!(
                        "There is no player slot {}.",
                        index + 1
                    )));
                }
            }
            HostCommand::SelectPlayer(name) => {
                if !self.roster.select(name) {
                    self.notify(Notification::warning(format!("Unknown player '{}'.", name)));
                }
            }
            HostCommand::SelectPuzzle(puzzle) => self.select_puzzle(*puzzle),
            HostCommand::SetDuelMode(enabled) => self.duel.enabled = *enabled,
            HostCommand::ConfigureDuel {
                num_players,
                num_puzzles,
                total_tasks,
            } => {
                self.duel.configure(*num_players, *num_puzzles, *total_tasks);
                let (low, high) = self.duel.estimated_minutes();
                self.notify(Notification::info(format!(
                    "A round with {} tasks takes about {} to {} minutes.",
                    self.duel.total_tasks(),
                    low,
                    high
                )));
            }
            HostCommand::ToggleTimer => {
                let result = self.toggle_timer(SystemTime::now());
                self.report_timer(result);
            }
            HostCommand::SyncNow => {
                self.sync_now();
            }
            HostCommand::ResetScores => self.reset_scores(),
        }
    }
}
