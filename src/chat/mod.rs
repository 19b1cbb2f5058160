//! Conversation state and the per-turn request loop.

mod history;
mod orchestrator;
mod session;
mod turn;

pub use history::HistoryPolicy;
pub use orchestrator::{ChatSettings, Orchestrator, SubmitOutcome, TurnError};
pub use session::{Session, SessionState, Transcript};
pub use turn::{Turn, TurnKind};
