use thiserror::Error;

/// Jenks natural breaks errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JenksError {
    /// Fewer than two classes requested. A single class is the whole input.
    #[error("number of classes must be at least 2 (got {0})")]
    TooFewClasses(u8),
    /// More classes requested than there are finite values to fill them.
    #[error(
        "number of classes ({nclasses}) must be smaller than the number of finite values ({nvalues})"
    )]
    TooManyClasses { nclasses: usize, nvalues: usize },
    /// Goodness of variance fit requested on zero-variance (or empty) data,
    /// for which the statistic is undefined.
    #[error("goodness of variance fit is undefined for zero-variance input")]
    DegenerateInput,
    /// An internal numeric conversion failed.
    #[error("an error occurred during numeric conversion")]
    Conversion,
}
