use thiserror::Error;

use crate::core::{Pid, Ticks};

/// Workload or policy rejected before the simulation loop is entered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("workload contains no processes")]
    EmptyWorkload,
    #[error("time quantum must be positive")]
    ZeroQuantum,
    #[error("process {pid} has a zero burst time")]
    ZeroBurst { pid: Pid },
    #[error("pid {pid} appears more than once in the workload")]
    DuplicatePid { pid: Pid },
    #[error("{name} must lie in [0, 1]")]
    Probability { name: &'static str },
    #[error("generated {name} must be positive")]
    ZeroGeneratedBurst { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invariant violated at t={at}: {reason}")]
    Invariant { at: Ticks, reason: String },
    #[error("pid {0} has no process record")]
    UnknownPid(Pid),
}

impl SimError {
    pub(crate) fn invariant(at: Ticks, reason: impl Into<String>) -> Self {
        Self::Invariant {
            at,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseProcessError {
    #[error("expected `pid:arrival:burst`, got `{0}`")]
    Shape(String),
    #[error("invalid {field} in `{input}`")]
    Field { field: &'static str, input: String },
}
