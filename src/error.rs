use thiserror::Error;

/// Failure to open the session. Fatal for the binary.
#[derive(Debug, Error)]
#[error("Unable to connect to database: {0}")]
pub struct ConnectionError(#[from] pub diesel::ConnectionError);

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("{0}")]
    Database(#[from] diesel::result::Error),

    #[error("Malformed row: {0}")]
    Row(#[from] serde_json::Error),

    #[error("Malformed row text: {0}")]
    RowText(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Session already closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("The {0} cannot be empty.")]
    Empty(&'static str),

    #[error("'{0}' is not a whole number.")]
    NotAnInteger(String),

    #[error("The {0} cannot be negative.")]
    Negative(&'static str),

    #[error("'{0}' is not a date, use MM/DD/YYYY or YYYY-MM-DD.")]
    NotADate(String),

    #[error("'{0}' is not a time, use hours:minutes (i.e. 2:00 or 17:00).")]
    NotATime(String),

    #[error("The only valid input for the {field} is {allowed}.")]
    NotAllowed {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("{0}")]
    OutOfRange(String),

    #[error("Gave up after {0} invalid answers")]
    TooManyAttempts(usize),

    #[error("End of input")]
    Eof,

    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),
}
