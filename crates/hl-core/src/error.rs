use thiserror::Error;

pub type HlResult<T> = Result<T, HlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid parameter {what} = {value}: {reason}")]
    InvalidParameter {
        what: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
