//! Experiment arm for reply tone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which reply-tone arm a conversation was assigned to.
///
/// Orthogonal to dialogue state: the graph decides *what* to say next, the
/// treatment decides *how* it is phrased. Assigned once when a conversation
/// starts and kept for its whole life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    /// Plain, matter-of-fact support replies.
    #[default]
    Neutral,
    /// Replies that acknowledge the customer's frustration first.
    Empathetic,
}

impl Treatment {
    /// Returns the canonical lowercase name of the arm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Treatment::Neutral => "neutral",
            Treatment::Empathetic => "empathetic",
        }
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
