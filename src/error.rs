use thiserror::Error;

use crate::calendar::offset::OffsetDay;

/// Errors raised by fallible constructors: a value was out of the range the
/// type's invariants require. Unlike the engine itself (which is total, see
/// `GenerationError`), these reject malformed configuration up front.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("semi-monthly day pair invalid: day1={day1} day2={day2} (expect day1 in 1..=15, day2 in 16..=31, 15-day spacing, or day1=15 ∧ day2=31)")]
    InvalidSemiMonthlyDays { day1: u32, day2: u32 },

    #[error("unit period multiple must be positive, got {0}")]
    InvalidMultiple(u32),

    #[error("payment count must be positive")]
    InvalidPaymentCount,

    #[error("asOfDate {as_of_date} precedes startDate {start_date}")]
    AsOfBeforeStart {
        as_of_date: chrono::NaiveDate,
        start_date: chrono::NaiveDate,
    },

    #[error("reschedule day {0} precedes the loan's start date")]
    RescheduleBeforeStart(OffsetDay),
}

/// Errors from the level-payment solver (C6). The engine proper never fails;
/// only plan *generation* can, when no level payment converges.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("level payment solver did not converge after {iterations} iterations")]
    SolverNonConvergence { iterations: u32 },

    #[error("cannot quote a settlement figure while payments are still pending confirmation")]
    AwaitingPaymentConfirmation,

    #[error("settlement mode produced no generated-payment slot to quote")]
    UnableToGenerateQuote,
}
