use std::fmt;

use super::{
    driver::{Sim, SimOutcome},
    process::Process,
};
use crate::{
    core::Ticks,
    error::SimError,
    scheduler::{RoundRobinScheduler, Scheduler, SrtScheduler},
};

/// Which discipline to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    RoundRobin { quantum: Ticks },
    ShortestRemainingTime,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoundRobin { .. } => RoundRobinScheduler::NAME,
            Self::ShortestRemainingTime => SrtScheduler::NAME,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "{} (quantum={quantum})", self.name()),
            Self::ShortestRemainingTime => f.write_str(self.name()),
        }
    }
}

/// Validates `workload` for `policy`, runs it to completion and returns the
/// records in workload order.
pub fn simulate(policy: Policy, workload: Vec<Process>) -> Result<SimOutcome, SimError> {
    match policy {
        Policy::RoundRobin { quantum } => {
            let scheduler = RoundRobinScheduler::new(quantum)?;
            Sim::new(workload, scheduler)?.run()
        }
        Policy::ShortestRemainingTime => Sim::new(workload, SrtScheduler::new())?.run(),
    }
}
