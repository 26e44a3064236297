use thiserror::Error;

/// Errors raised while setting up a computation. Numeric domain problems
/// (for example evaluating at a zero argument) are not errors: they show up
/// as non-finite samples in the result curves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NearfieldError {
    /// A grid could not be built as a strictly increasing, positive sequence.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    /// The maximum order must be at least 1.
    #[error("invalid order {0}: orders start at 1")]
    InvalidOrder(u32),
    /// A physical parameter is out of range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
