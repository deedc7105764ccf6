use std::collections::VecDeque;

use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Pid, Scheduler, SimCtx, Ticks};
use crate::error::{ConfigError, SimError};

/// Quantum rotation over a single FIFO ready queue.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: Ticks,
    queue: VecDeque<Pid>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Result<Self, ConfigError> {
        if quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        Ok(Self {
            quantum,
            queue: VecDeque::new(),
        })
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    fn push_back(&mut self, ctx: &SimCtx, pid: Pid) -> Result<(), SimError> {
        if self.queue.contains(&pid) {
            return Err(SimError::invariant(
                ctx.now,
                format!("pid {pid} already in the round robin queue"),
            ));
        }
        self.queue.push_back(pid);
        Ok(())
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    // A batch lines up by arrival time, simultaneous arrivals by ascending pid
    fn admit(&mut self, ctx: &mut SimCtx, arrivals: Vec<Pid>) -> Result<(), SimError> {
        let mut batch = arrivals
            .into_iter()
            .map(|pid| ctx.task(pid).map(|task| (task.arrival_time, pid)))
            .collect::<Result<Vec<_>, _>>()?;
        batch.sort_unstable();
        for (_, pid) in batch {
            self.push_back(ctx, pid)?;
        }
        Ok(())
    }

    fn enqueue(
        &mut self,
        ctx: &mut SimCtx,
        pid: Pid,
        flags: EnqueueFlags,
    ) -> Result<(), SimError> {
        // Whatever arrived during the expired slice goes ahead of the
        // preempted process.
        if flags & ENQ_PREEMPT != 0 {
            let arrivals = ctx.take_arrivals();
            self.admit(ctx, arrivals)?;
        }
        self.push_back(ctx, pid)
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Option<Dispatch>, SimError> {
        let Some(pid) = self.queue.pop_front() else {
            return Ok(None);
        };
        let remaining = ctx.task(pid)?.remaining_time;
        Ok(Some(Dispatch {
            pid,
            slice: remaining.min(self.quantum),
        }))
    }

    // Jump straight to the next arrival
    fn idle(&self, ctx: &SimCtx, next_arrival: Ticks) -> Ticks {
        next_arrival.saturating_sub(ctx.now)
    }

    fn queued(&self) -> Vec<Pid> {
        self.queue.iter().copied().collect()
    }
}
