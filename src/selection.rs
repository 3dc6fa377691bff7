//! Two-step flow for saving a window spot.
//!
//! Saving a window spot first captures the cursor position and offers pattern
//! suggestions; the spot is only written once the user picks one. At most one
//! save can be pending at a time, and starting a new one replaces it.

use crate::error::{Result, SpotError};
use crate::profile::ProfileKey;
use crate::window::Suggestion;

/// A window spot waiting for its pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Profile active when the position was captured
    pub profile: ProfileKey,
    pub suggestions: Vec<Suggestion>,
}

/// The user's answer to the pattern prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// 1-based index into the suggestions; `0` means global
    Number(usize),
    Global,
    /// Free-form pattern; blank text means global
    Custom(String),
}

/// A confirmed save, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSave {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub profile: ProfileKey,
    /// `None` for a global spot
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatternSelection {
    #[default]
    Idle,
    AwaitingPatternChoice(PendingSave),
}

impl PatternSelection {
    /// Start waiting for a choice, discarding any earlier pending save
    pub fn begin(&mut self, pending: PendingSave) {
        if let PatternSelection::AwaitingPatternChoice(previous) = self {
            log::info!("Discarding pending save of {:?}", previous.name);
        }
        *self = PatternSelection::AwaitingPatternChoice(pending);
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        match self {
            PatternSelection::Idle => None,
            PatternSelection::AwaitingPatternChoice(pending) => Some(pending),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Resolve the pending save with `choice`.
    ///
    /// An out-of-range number leaves the save pending so the user can try
    /// again; any other outcome returns to [`PatternSelection::Idle`].
    pub fn confirm(&mut self, choice: Choice) -> Result<ResolvedSave> {
        let pending = self.pending().ok_or(SpotError::NoPendingSelection)?;

        let pattern = match choice {
            Choice::Global | Choice::Number(0) => None,
            Choice::Number(n) => match pending.suggestions.get(n - 1) {
                Some(suggestion) => Some(suggestion.pattern.clone()),
                None => {
                    return Err(SpotError::InvalidChoice {
                        choice: n,
                        available: pending.suggestions.len(),
                    });
                }
            },
            Choice::Custom(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        };

        let PatternSelection::AwaitingPatternChoice(pending) = std::mem::take(self) else {
            return Err(SpotError::NoPendingSelection);
        };
        Ok(ResolvedSave {
            name: pending.name,
            x: pending.x,
            y: pending.y,
            profile: pending.profile,
            pattern,
        })
    }

    /// Abandon the pending save, if any
    pub fn cancel(&mut self) -> Option<PendingSave> {
        match std::mem::take(self) {
            PatternSelection::Idle => None,
            PatternSelection::AwaitingPatternChoice(pending) => Some(pending),
        }
    }
}
