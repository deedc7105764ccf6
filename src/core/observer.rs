use rustc_hash::FxHashSet;

use super::state::{Pid, SimCtx, TaskState, Ticks};
use crate::error::SimError;

/// Cross-checks the task table against the scheduler's ready queue after
/// every step. Any mismatch is an engine defect and aborts the run.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_now: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx, queued: &[Pid]) -> Result<(), SimError> {
        self.step += 1;
        let now = ctx.now;

        if now < self.last_now {
            return Err(SimError::invariant(
                now,
                format!("clock moved backwards from {}", self.last_now),
            ));
        }
        self.last_now = now;

        let mut seen = FxHashSet::default();
        for &pid in queued {
            let task = ctx.task(pid)?;
            if !seen.insert(pid) {
                return Err(SimError::invariant(now, format!("pid {pid} queued twice")));
            }
            if task.state != TaskState::Runnable {
                return Err(SimError::invariant(
                    now,
                    format!("queued pid {pid} is {:?}", task.state),
                ));
            }
        }

        for task in ctx.tasks() {
            let pid = task.pid;
            if task.remaining_time > task.burst_time {
                return Err(SimError::invariant(
                    now,
                    format!("pid {pid} has more remaining time than its burst"),
                ));
            }
            if task.completion_time.is_some() != (task.remaining_time == 0) {
                return Err(SimError::invariant(
                    now,
                    format!("pid {pid} completion does not match remaining time"),
                ));
            }
            match task.state {
                TaskState::Runnable if !seen.contains(&pid) => {
                    return Err(SimError::invariant(
                        now,
                        format!("runnable pid {pid} missing from the ready queue"),
                    ));
                }
                TaskState::Running => {
                    return Err(SimError::invariant(
                        now,
                        format!("pid {pid} still running between steps"),
                    ));
                }
                TaskState::NotArrived if task.start_time.is_some() => {
                    return Err(SimError::invariant(
                        now,
                        format!("pid {pid} ran before admission"),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
