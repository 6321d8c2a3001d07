//! Application layer
//!
//! Orchestrates between the CLI and the domain/infrastructure layers.

pub mod submission_service;

pub use submission_service::{
    submit, submit_with_batch_id, DriverEntry, DriverFailure, FareSelection, SubmissionForm,
    SubmissionOutcome,
};
