use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or stepping a simulation.
#[derive(Debug, Clone)]
pub enum SimulationError {
    /// Indicates a zero, negative, or non-finite time step.
    InvalidTimeStep,
    /// Indicates a zero, negative, or non-finite particle radius.
    InvalidRadius,
    /// A general error for invalid configuration values.
    InvalidConfig(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidTimeStep => write!(f, "Invalid time step value"),
            SimulationError::InvalidRadius => write!(f, "Invalid radius value"),
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for SimulationError {}
