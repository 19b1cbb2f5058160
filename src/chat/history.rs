//! Selection of transcript turns sent with each request.

use serde::{Deserialize, Serialize};

use crate::ai::Role;

use super::turn::Turn;

/// Rule for choosing which turns go on the wire.
///
/// The stored transcript is never trimmed; a policy only picks the suffix
/// that is resent. Every policy keeps the newest turn and never starts the
/// window with an assistant turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Resend the whole transcript.
    #[default]
    Unbounded,
    /// Resend at most the newest `max_turns` turns.
    SlidingWindow { max_turns: usize },
    /// Resend the newest turns whose combined content fits in `max_chars`.
    CharBudget { max_chars: usize },
}

impl HistoryPolicy {
    /// The suffix of `turns` to send.
    #[must_use]
    pub fn window<'a>(&self, turns: &'a [Turn]) -> &'a [Turn] {
        if turns.is_empty() {
            return turns;
        }

        let keep = match *self {
            Self::Unbounded => turns.len(),
            Self::SlidingWindow { max_turns } => max_turns.clamp(1, turns.len()),
            Self::CharBudget { max_chars } => {
                let mut used = 0usize;
                let fitting = turns
                    .iter()
                    .rev()
                    .take_while(|turn| {
                        used += turn.content.chars().count();
                        used <= max_chars
                    })
                    .count();
                fitting.max(1)
            }
        };

        let mut start = turns.len() - keep;
        // Never open on an assistant turn, unless it is the only one left.
        while start + 1 < turns.len() && turns[start].role == Role::Assistant {
            start += 1;
        }
        &turns[start..]
    }
}
