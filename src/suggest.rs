//! Canned design suggestions delivered after a short artificial delay.

#[cfg(test)]
#[path = "suggest_test.rs"]
mod suggest_test;

use std::time::Duration;

use rand::Rng;

pub const SUGGESTIONS: &[&str] = &[
    "Modern Look: Paint an accent wall 'Hale Navy'. Place the 'Sofa' against it, the 'Modern TV stand' opposite, and a 'Floor Lamp' in the corner.",
    "Cozy Bedroom: Use 'Sea Salt' paint. Place the 'Bed' against the main wall with a 'Night Stand'. Add the 'Wide Dresser' and a 'Rug'.",
];

/// Shortest and longest "thinking" time, in milliseconds.
pub const SUGGESTION_DELAY_MS: (u64, u64) = (4000, 7000);

pub fn pick_suggestion(rng: &mut impl Rng) -> &'static str {
    SUGGESTIONS[rng.random_range(0..SUGGESTIONS.len())]
}

pub fn suggestion_delay(rng: &mut impl Rng) -> Duration {
    let (lo, hi) = SUGGESTION_DELAY_MS;
    Duration::from_millis(rng.random_range(lo..=hi))
}

/// Where the suggestion panel stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuggestionBox {
    #[default]
    Idle,
    /// Waiting until host time `due`; the text is already chosen.
    Pending { due: Duration, text: &'static str },
    Ready(&'static str),
}

impl SuggestionBox {
    /// Start (or restart) a suggestion at host time `now`.
    pub fn request(&mut self, now: Duration, rng: &mut impl Rng) {
        let due = now + suggestion_delay(rng);
        let text = pick_suggestion(rng);
        tracing::debug!(due_ms = due.as_millis(), "suggestion requested");
        *self = Self::Pending { due, text };
    }

    /// Resolve a pending suggestion once `now` reaches its due time.
    /// Returns `true` when the state changed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match *self {
            Self::Pending { due, text } if now >= due => {
                *self = Self::Ready(text);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// The suggestion text, once ready.
    #[must_use]
    pub fn text(&self) -> Option<&'static str> {
        match self {
            Self::Ready(text) => Some(text),
            _ => None,
        }
    }
}
