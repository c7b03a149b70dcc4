use thiserror::Error;

/// Errors raised by the strict document operations.
///
/// Building a document from loose input never fails; these only come out of
/// the explicitly strict decoders.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("parameters string has {found} fields, expected {expected}")]
    ParameterCount { expected: usize, found: usize },

    #[error("parameter #{index} is not a number: {value:?}")]
    InvalidParameter { index: usize, value: String },
}
