pub mod round_robin;
pub mod srt;

use crate::core::{
    Ticks,
    state::{Pid, SimCtx},
};
use crate::error::SimError;
pub use round_robin::RoundRobinScheduler;
pub use srt::SrtScheduler;

pub type EnqueueFlags = u64;

// First admission after arrival
pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
// Slice ended with work left; returning to the ready set
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// The scheduler's choice for the next slice of CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub pid: Pid,
    pub slice: Ticks,
}

pub trait Scheduler {
    const NAME: &'static str;

    /// Makes freshly arrived processes eligible, in the order they arrived.
    fn admit(&mut self, ctx: &mut SimCtx, arrivals: Vec<Pid>) -> Result<(), SimError> {
        for pid in arrivals {
            self.enqueue(ctx, pid, ENQ_WAKEUP)?;
        }
        Ok(())
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, flags: EnqueueFlags)
    -> Result<(), SimError>;

    /// Removes the next process from the ready set. `None` leaves the CPU idle.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<Option<Dispatch>, SimError>;

    /// How far to move the clock when nothing is runnable and the earliest
    /// outstanding arrival is at `next_arrival`.
    fn idle(&self, ctx: &SimCtx, next_arrival: Ticks) -> Ticks;

    /// Pids currently in the ready set, head first.
    fn queued(&self) -> Vec<Pid>;
}
