use log::{debug, trace};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{SimCtx, Ticks},
};
use crate::error::SimError;
use crate::scheduler::{Dispatch, ENQ_PREEMPT, Scheduler};

/// Drives one scheduler over one `SimCtx`, a step at a time.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(ctx: SimCtx, scheduler: S) -> Self {
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
        }
    }

    /// One scheduling decision: admit arrivals, then either run a slice or
    /// idle until something can run. Returns the events produced.
    pub fn step(&mut self) -> Result<Vec<SchedEvent>, SimError> {
        let arrivals = self.ctx.take_arrivals();
        if !arrivals.is_empty() {
            self.scheduler.admit(&mut self.ctx, arrivals)?;
        }

        match self.scheduler.dispatch(&mut self.ctx)? {
            Some(dispatch) => self.run_slice(dispatch)?,
            None => self.idle()?,
        }

        self.observer
            .observe(&self.ctx, &self.scheduler.queued())?;
        Ok(self.ctx.drain_events())
    }

    fn run_slice(&mut self, dispatch: Dispatch) -> Result<(), SimError> {
        let Dispatch { pid, slice } = dispatch;
        if slice == 0 {
            return Err(SimError::invariant(
                self.ctx.now,
                format!("{} dispatched pid {pid} with an empty slice", S::NAME),
            ));
        }

        let at = self.ctx.now;
        self.ctx.set_running(pid)?;
        self.ctx.emit(SchedEvent::Dispatch { pid, at, slice });
        trace!("t={at} dispatch pid={pid} slice={slice}");

        let remaining = self.ctx.consume(pid, slice)?;
        if remaining == 0 {
            self.ctx.mark_completed(pid)?;
        } else {
            self.ctx.mark_runnable(pid)?;
            self.scheduler.enqueue(&mut self.ctx, pid, ENQ_PREEMPT)?;
        }
        Ok(())
    }

    fn idle(&mut self) -> Result<(), SimError> {
        if self.ctx.all_completed() {
            return Ok(());
        }

        let from = self.ctx.now;
        let next_arrival = self.ctx.next_arrival().ok_or_else(|| {
            SimError::invariant(from, "unfinished processes but nothing runnable or arriving")
        })?;
        let delta: Ticks = self.scheduler.idle(&self.ctx, next_arrival);
        if delta == 0 {
            return Err(SimError::invariant(from, "idle step did not advance the clock"));
        }

        self.ctx.advance_time(delta)?;
        debug!("t={from} cpu idle until t={}", self.ctx.now);
        self.ctx.emit(SchedEvent::CpuIdle {
            from,
            to: self.ctx.now,
        });
        Ok(())
    }

    pub fn finished(&self) -> bool {
        self.ctx.all_completed()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
