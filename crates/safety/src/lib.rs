#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock-avoidance safety evaluation for banker
//!
//! This crate implements the Banker's Algorithm safety check: given a
//! validated [`Snapshot`](banker_types::Snapshot), find an order in which
//! every process can obtain its remaining need and finish, or report that
//! none exists. Evaluation is a pure function of the snapshot; independent
//! snapshots can be evaluated concurrently with [`evaluate_batch`].

mod batch;
mod evaluator;
mod replay;

pub use batch::{evaluate_batch, evaluate_batch_traced};
pub use evaluator::{evaluate, evaluate_traced, Evaluation, EvaluationTrace, TraceStep};
pub use replay::replay;
