use thiserror::Error;

pub type GnResult<T> = Result<T, GnError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
