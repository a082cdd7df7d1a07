use thiserror::Error;

pub type RramResult<T> = Result<T, RramError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RramError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
