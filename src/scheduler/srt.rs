use std::cmp;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{Dispatch, EnqueueFlags, Pid, Scheduler, SimCtx, Ticks};
use crate::error::SimError;

/// Selection key: least remaining time first, then earliest insertion.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Remaining {
    pub ticks: Ticks,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop the ordering
impl PartialOrd for Remaining {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Remaining {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        other
            .ticks
            .cmp(&self.ticks)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Shortest-Remaining-Time, re-evaluated every tick.
///
/// Each dispatch is a single tick; the process is pushed back with its new
/// remaining time afterwards, so keys are never mutated while queued.
#[derive(Debug)]
pub struct SrtScheduler {
    ready: KeyedPriorityQueue<Pid, Remaining>,
    next_seq: u64,
}

impl SrtScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }
}

impl Default for SrtScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SrtScheduler {
    const NAME: &'static str = "Shortest Remaining Time";

    fn enqueue(
        &mut self,
        ctx: &mut SimCtx,
        pid: Pid,
        _flags: EnqueueFlags,
    ) -> Result<(), SimError> {
        let key = Remaining {
            ticks: ctx.task(pid)?.remaining_time,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        if self.ready.push(pid, key).is_some() {
            return Err(SimError::invariant(
                ctx.now,
                format!("pid {pid} already in the ready set"),
            ));
        }
        Ok(())
    }

    fn dispatch(&mut self, _ctx: &mut SimCtx) -> Result<Option<Dispatch>, SimError> {
        Ok(self.ready.pop().map(|(pid, _)| Dispatch { pid, slice: 1 }))
    }

    fn idle(&self, _ctx: &SimCtx, _next_arrival: Ticks) -> Ticks {
        1
    }

    fn queued(&self) -> Vec<Pid> {
        let mut ready: Vec<_> = self.ready.iter().map(|(&pid, &key)| (key, pid)).collect();
        ready.sort_by(|a, b| b.0.cmp(&a.0));
        ready.into_iter().map(|(_, pid)| pid).collect()
    }
}
