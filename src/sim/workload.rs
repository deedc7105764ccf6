use rand::{Rng, SeedableRng, distr::Bernoulli, rngs::StdRng};

use super::process::Process;
use crate::{core::Ticks, error::ConfigError};

/// Seeded synthetic batch.
///
/// Every tick in `[0, ticks)` draws an arrival with probability `p_arrival`.
/// An arriving process gets `short_burst` with probability `p_short` and
/// `long_burst` otherwise. Pids are assigned densely in arrival order.
///
/// A batch is never empty: when no tick draws an arrival, a single process is
/// placed at tick 0 so the result is always a valid workload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadGenerator {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
}

impl WorkloadGenerator {
    pub fn generate(&self, seed: u64) -> Result<Vec<Process>, ConfigError> {
        let arrives = Bernoulli::new(self.p_arrival)
            .map_err(|_| ConfigError::Probability { name: "p_arrival" })?;
        let short = Bernoulli::new(self.p_short)
            .map_err(|_| ConfigError::Probability { name: "p_short" })?;
        if self.short_burst == 0 {
            return Err(ConfigError::ZeroGeneratedBurst {
                name: "short burst",
            });
        }
        if self.long_burst == 0 {
            return Err(ConfigError::ZeroGeneratedBurst { name: "long burst" });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let burst = |rng: &mut StdRng| {
            if rng.sample(short) {
                self.short_burst
            } else {
                self.long_burst
            }
        };

        let mut processes = Vec::new();
        for t in 0..self.ticks {
            if rng.sample(arrives) {
                let pid = processes.len() as u64;
                processes.push(Process::new(pid, t, burst(&mut rng)));
            }
        }
        if processes.is_empty() {
            processes.push(Process::new(0, 0, burst(&mut rng)));
        }

        Ok(processes)
    }
}
