//! Session Aggregation
//!
//! Owns the interview session record across its lifecycle:
//! - Start (validated candidate name, score 100, empty log)
//! - Event append while active
//! - Finalization with integrity scoring
//!
//! Finalized sessions feed the text and CSV report exporters.

pub mod csv;
pub mod report;
pub mod score;
pub mod session;

pub use csv::to_csv;
pub use report::{format_duration, report_file_name, EventStats, IntegrityLevel, SessionReport};
pub use score::{integrity_score, penalty};
pub use session::{InterviewSession, SessionAggregator};

use thiserror::Error;

/// Session lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Candidate name must not be empty")]
    EmptyCandidateName,

    #[error("A session is already active")]
    AlreadyActive,

    #[error("No active session")]
    NoActiveSession,
}

/// Report export errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Session {0} has not been finalized")]
    NotFinalized(String),
}
