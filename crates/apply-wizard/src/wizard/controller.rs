use serde::{Deserialize, Serialize};

use super::domain::FormState;
use super::validation::{validate_step, ValidationErrors};

/// Ordered wizard screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Identity,
    Skills,
    Review,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 3] {
        [Self::Identity, Self::Skills, Self::Review]
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::Identity => 0,
            Self::Skills => 1,
            Self::Review => 2,
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Identity),
            1 => Some(Self::Skills),
            2 => Some(Self::Review),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Let's Get to Know You",
            Self::Skills => "Tell Us About Your Skills",
            Self::Review => "Final Review",
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Skills),
            Self::Skills => Some(Self::Review),
            Self::Review => None,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Identity | Self::Skills => Self::Identity,
            Self::Review => Self::Skills,
        }
    }
}

/// Result of an `advance` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "step", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Validation failed; the step did not change.
    Blocked,
    /// Moved forward to the contained step.
    Moved(WizardStep),
    /// The final step validated; the caller leaves the wizard for review.
    ReadyForReview,
}

/// Step index plus the messages from the last failed advance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WizardController {
    step: WizardStep,
    errors: ValidationErrors,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validate only the active step. Errors are replaced wholesale on failure
    /// and cleared on success.
    pub fn advance(&mut self, form: &FormState) -> AdvanceOutcome {
        let errors = validate_step(self.step, form);
        if !errors.is_empty() {
            self.errors = errors;
            return AdvanceOutcome::Blocked;
        }

        self.errors.clear();
        match self.step.next() {
            Some(next) => {
                self.step = next;
                AdvanceOutcome::Moved(next)
            }
            None => AdvanceOutcome::ReadyForReview,
        }
    }

    /// Step back without validation, floored at the first step. Stale messages
    /// for the step being left are dropped.
    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.errors.clear();
        self.step
    }

    /// Jump to a step with a precomputed set of messages, used when the final
    /// integrity check fails after the wizard was left.
    pub(crate) fn reopen_at(&mut self, step: WizardStep, errors: ValidationErrors) {
        self.step = step;
        self.errors = errors;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
