//! Errors raised while replaying a proposed completion order

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OrderError {
    #[error("order is not a permutation of 0..{process_count}: {reason}")]
    NotAPermutation {
        process_count: usize,
        reason: String,
    },

    #[error(
        "step {step}: process {process} needs {need} units of resource {resource} but only {work} are free"
    )]
    InsufficientWork {
        step: usize,
        process: usize,
        resource: usize,
        need: u64,
        work: u64,
    },
}

impl UserFacingError for OrderError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAPermutation { .. } => {
                Some("List every process index exactly once, e.g. --order 1,3,4,0,2.")
            }
            Self::InsufficientWork { .. } => {
                Some("Run `banker check` on the snapshot to obtain a valid completion order.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotAPermutation { .. } => "order.not_a_permutation",
            Self::InsufficientWork { .. } => "order.insufficient_work",
        };
        Some(code)
    }
}
