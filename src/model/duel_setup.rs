use std::ops::RangeInclusive;

pub const DUEL_PLAYERS: RangeInclusive<usize> = 2..=6;
pub const DUEL_PUZZLES: RangeInclusive<usize> = 1..=6;

/// Rough minutes per task, used for the round estimate.
const MINUTES_PER_TASK: RangeInclusive<usize> = 4..=6;

/// Parameters of a multi-player round. Only recorded as metadata: entries get
/// a `duel_mode` flag, there are no duel ranking rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelSetup {
    pub enabled: bool,
    num_players: usize,
    num_puzzles: usize,
    total_tasks: usize,
}

impl Default for DuelSetup {
    fn default() -> Self {
        Self {
            enabled: false,
            num_players: 2,
            num_puzzles: 2,
            total_tasks: 2,
        }
    }
}

impl DuelSetup {
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn num_puzzles(&self) -> usize {
        self.num_puzzles
    }

    pub fn total_tasks(&self) -> usize {
        self.total_tasks
    }

    /// Valid task totals: every player gets the same number of tasks, at most
    /// one per puzzle.
    pub fn task_range(&self) -> RangeInclusive<usize> {
        self.num_players..=self.num_players * self.num_puzzles
    }

    pub fn configure(&mut self, num_players: usize, num_puzzles: usize, total_tasks: usize) {
        self.num_players = num_players.clamp(*DUEL_PLAYERS.start(), *DUEL_PLAYERS.end());
        self.num_puzzles = num_puzzles.clamp(*DUEL_PUZZLES.start(), *DUEL_PUZZLES.end());
        self.set_total_tasks(total_tasks);
    }

    /// Clamps into [`Self::task_range`] and rounds down to a multiple of the
    /// player count.
    pub fn set_total_tasks(&mut self, total_tasks: usize) {
        let range = self.task_range();
        let clamped = total_tasks.clamp(*range.start(), *range.end());
        self.total_tasks = clamped - clamped % self.num_players;
    }

    /// Expected round length in minutes, low and high estimate.
    pub fn estimated_minutes(&self) -> (usize, usize) {
        (
            self.total_tasks * MINUTES_PER_TASK.start(),
            self.total_tasks * MINUTES_PER_TASK.end(),
        )
    }
}
