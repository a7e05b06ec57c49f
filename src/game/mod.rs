mod app_state;
mod highscore_store;
pub mod remote_sync;
mod score_recorder;
pub mod settings;

pub use app_state::{AppState, TimerOutcome};
pub use highscore_store::{HighscoreStore, LEGACY_PUZZLE_KEY};
pub use remote_sync::{merge_from_remote, push_session};
pub use score_recorder::{RecordOutcome, RecordRequest, ScoreRecorder};
pub use settings::Settings;
