//! Game state, the reducer and the rules engine around it

pub mod engine;
pub mod logger;
pub mod phase;
pub mod prompt;
pub mod reducer;
pub mod rules;
pub mod setup;
pub mod shuffle;
pub mod simulate;
pub mod snapshot;
pub mod state;
pub mod state_hash;

pub use engine::{replay, Engine, Materialized};
pub use logger::{GameLogger, OutputFormat, OutputMode, VerbosityLevel};
pub use phase::{Phase, TurnState};
pub use prompt::{active_prompt, Prompt};
pub use reducer::{apply_event, Reduction};
pub use setup::GameInitializer;
pub use shuffle::{SeededShuffler, Shuffler};
pub use simulate::{GameEndReason, GameLoop, GameResult};
pub use snapshot::{GameSnapshot, SnapshotError};
pub use state::{CombatNotice, GameState, LogLine};
pub use state_hash::{compute_state_hash, format_hash};
