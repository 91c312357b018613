//! Forward-only status workflows.
//!
//! Each workflow is a static transition table. A status change is legal only
//! if the requested status is in the outgoing set of the current one. There
//! are no back-edges, no self-loops and terminal statuses have no outgoing
//! edges, so every entity moves through its lifecycle at most once.
//!
//! ```text
//! Inquiry:         Queued ──► In_process ──► Completed
//!                    │            │
//!                    └────────────┴────────► Discarded
//!
//! Partner request: Queued      ──► contacted | discarded | spam
//!                  contacted   ──► in_progress | discarded | spam
//!                  in_progress ──► onboarded | discarded
//! ```

use std::fmt;

use crate::types::{InquiryStatus, PartnerRequestStatus};

/// A requested status change that the workflow does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    /// Wire name of the current status.
    pub from: String,
    /// Wire name of the requested status.
    pub to: String,
}

/// A status enum governed by a static transition table.
pub trait StatusWorkflow: Copy + Eq + fmt::Display + Sized + 'static {
    /// Status every new entity starts in.
    const INITIAL: Self;

    /// Legal successors of `self`.
    fn successors(self) -> &'static [Self];

    /// Whether `requested` may follow `self`.
    fn can_transition(self, requested: Self) -> bool {
        self.successors().contains(&requested)
    }

    /// Whether no further transition is possible.
    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Check a transition and return the new status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if `requested` is not a successor.
    fn transition(self, requested: Self) -> Result<Self, TransitionError> {
        if self.can_transition(requested) {
            Ok(requested)
        } else {
            Err(TransitionError {
                from: self.to_string(),
                to: requested.to_string(),
            })
        }
    }
}

impl StatusWorkflow for InquiryStatus {
    const INITIAL: Self = Self::Queued;

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Queued => &[Self::InProcess, Self::Discarded],
            Self::InProcess => &[Self::Completed, Self::Discarded],
            Self::Completed | Self::Discarded => &[],
        }
    }
}

impl StatusWorkflow for PartnerRequestStatus {
    const INITIAL: Self = Self::Queued;

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Queued => &[Self::Contacted, Self::Discarded, Self::Spam],
            Self::Contacted => &[Self::InProgress, Self::Discarded, Self::Spam],
            Self::InProgress => &[Self::Onboarded, Self::Discarded],
            Self::Onboarded | Self::Discarded | Self::Spam => &[],
        }
    }
}
