use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("you must be logged in to book an appointment")]
    Unauthenticated,

    #[error("you are not authorized to modify this record")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("the {time} slot on {date} is no longer available")]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already in use: {0}")]
    EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
