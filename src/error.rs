use thiserror::Error;

/// Library error type for gallery model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A rating outside the accepted 0-5 range was supplied, either by a
    /// caller or by a stored snapshot record. Carries the rejected value.
    #[error("invalid rating, rating must be a number in range 0-5")]
    InvalidRating(u8),
}
