use thiserror::Error;

/// An error from building or running a circuit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CircuitError {
    /// The amplitudes supplied for a qubit do not describe a normalized single-qubit state.
    #[error("invalid qubit state: {0}")]
    InvalidState(String),
    /// The circuit being built is structurally malformed.
    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),
    /// A simulation backend was handed an operation it cannot execute.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// A user supplied parameter was out of range or could not be parsed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CircuitError {
    /// Construct a new state error.
    pub fn state<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidState(msg.into())
    }

    /// Construct a new circuit error.
    pub fn circuit<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidCircuit(msg.into())
    }

    /// Construct a new parameter error.
    pub fn parameter<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidParameter(msg.into())
    }
}

/// A result which may contain a circuit error.
pub type CircuitResult<T> = Result<T, CircuitError>;
