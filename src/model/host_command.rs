use super::Puzzle;

/// Inputs the host forwards to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    SetPlayerCount(usize),
    /// Zero-based slot, name, identifier.
    SetPlayer(usize, String, String),
    SelectPlayer(String),
    SelectPuzzle(Option<Puzzle>),
    SetDuelMode(bool),
    ConfigureDuel {
        num_players: usize,
        num_puzzles: usize,
        total_tasks: usize,
    },
    ToggleTimer,
    SyncNow,
    ResetScores,
}

impl HostCommand {
    /// Parses one console line. Returns `None` for anything unrecognized.
    pub fn parse(line: &str) -> Option<HostCommand> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "" | "toggle" => Some(HostCommand::ToggleTimer),
            "players" => rest.parse().ok().map(HostCommand::SetPlayerCount),
            "player" => {
                let mut parts = rest.split_whitespace();
                // slots are numbered from 1 at the console
                let slot: usize = parts.next()?.parse().ok()?;
                let name = parts.next()?.to_string();
                let identifier = parts.next().unwrap_or_default().to_string();
                Some(HostCommand::SetPlayer(slot.checked_sub(1)?, name, identifier))
            }
            "select" => Some(HostCommand::SelectPlayer(rest.to_string())),
            "puzzle" if rest.is_empty() => Some(HostCommand::SelectPuzzle(None)),
            "puzzle" => Puzzle::parse(rest).map(|p| HostCommand::SelectPuzzle(Some(p))),
            "duel" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                ["on"] => Some(HostCommand::SetDuelMode(true)),
                ["off"] => Some(HostCommand::SetDuelMode(false)),
                ["setup", players, puzzles, tasks] => Some(HostCommand::ConfigureDuel {
                    num_players: players.parse().ok()?,
                    num_puzzles: puzzles.parse().ok()?,
                    total_tasks: tasks.parse().ok()?,
                }),
                _ => None,
            },
            "sync" => Some(HostCommand::SyncNow),
            "reset" => Some(HostCommand::ResetScores),
            _ => None,
        }
    }
}
