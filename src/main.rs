use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, SystemTime};

use log::{debug, info};
use setbox_timer::events::EventHandler;
use setbox_timer::game::{AppState, Settings};
use setbox_timer::model::{HostCommand, Notification, Puzzle};

const HELP: &str = "\
commands:
  players <n>                  number of player slots (1-10)
  player <slot> <name> [id]    register a player
  select <name>                choose who plays next
  puzzle <code|label>          choose the puzzle (empty to clear)
  duel on|off                  flag entries as duel rounds
  duel setup <p> <z> <tasks>   players, puzzles and tasks of a duel round
  toggle | <enter>             start / stop the timer
  time                         show the timer
  watch <secs>                 redraw the running timer for a while
  scores                       show highscores for the selected puzzle
  sync                         push this session's times to the sheet
  reset                        clear local highscores
  quit";

fn init_logging() {
    env_logger::init();
}

fn print_scores(state: &AppState) {
    let Some(puzzle) = state.selected_puzzle() else {
        println!("No puzzle selected. Highscores are kept per puzzle.");
        return;
    };
    let rows = state.ranked_rows();
    if rows.is_empty() {
        println!("No highscores yet for '{}'.", puzzle);
        return;
    }
    println!("{:>4}  {:<20} {:>8}  {}", "Rank", "Player", "Time", "Recorded");
    for row in rows {
        println!(
            "{:>4}  {:<20} {:>8}  {}",
            row.rank, row.player, row.time_str, row.timestamp
        );
    }
}

/// Redraws the timer in place until `secs` pass or the timer is idle.
fn watch(state: &AppState, settings: &Settings, secs: f64) -> io::Result<()> {
    let until = SystemTime::now() + Duration::from_secs_f64(secs.clamp(0.0, 3600.0));
    let mut stdout = io::stdout();
    loop {
        let now = SystemTime::now();
        write!(stdout, "\r{}", state.elapsed_display(now))?;
        stdout.flush()?;
        if !state.timer.is_running() || now >= until {
            break;
        }
        thread::sleep(settings.refresh_interval());
    }
    writeln!(stdout)
}

fn main() -> io::Result<()> {
    init_logging();

    let settings = Settings::load();
    if Settings::is_debug_mode() {
        debug!("settings: {:?}", settings);
    }

    let remote = AppState::remote_from_settings(&settings);
    let mut state = AppState::start(&settings, remote);
    state
        .notifications()
        .subscribe(|n: &Notification| println!("{}", n));

    info!(
        "SET-Box timer ready ({} puzzles, highscores in {})",
        Puzzle::all().len(),
        settings.highscore_file.display()
    );
    println!("SET-Box Timer. Type 'help' for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        let now = SystemTime::now();
        let prompt = if state.timer.is_running() { "running" } else { "idle" };
        write!(stdout, "[{} {}] > ", prompt, state.elapsed_display(now))?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "time" => println!("{}", state.elapsed_display(SystemTime::now())),
            "scores" => print_scores(&state),
            other if other.starts_with("watch") => {
                let secs = other["watch".len()..]
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .unwrap_or(10.0);
                watch(&state, &settings, secs)?;
            }
            other => match HostCommand::parse(other) {
                Some(command) => {
                    state.handle_event(&command);
                    if command == HostCommand::ToggleTimer && !state.timer.is_running() {
                        print_scores(&state);
                    }
                }
                None => println!("Unknown command '{}'. Type 'help'.", other),
            },
        }
    }

    if !state.session_log().is_empty() {
        println!(
            "{} times from this session were not synced to the sheet.",
            state.session_log().len()
        );
    }
    Ok(())
}
