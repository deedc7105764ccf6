use log::info;

use super::process::{Process, ProcessInstance};
use crate::{
    core::{
        SchedEvent,
        driver::SchedCore,
        state::{Pid, SimCtx, Ticks},
    },
    error::{ConfigError, SimError},
    scheduler::Scheduler,
};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    /// Records in the order the workload listed them.
    pub processes: Vec<ProcessInstance>,
    pub trace: Vec<SchedEvent>,
    pub makespan: Ticks,
}

impl SimOutcome {
    /// Ticks the CPU spent with nothing to run.
    pub fn idle_ticks(&self) -> Ticks {
        self.trace
            .iter()
            .map(|event| match event {
                SchedEvent::CpuIdle { from, to } => to - from,
                _ => 0,
            })
            .sum()
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Workload order, used to report results back in the caller's order
    order: Vec<Pid>,
}

impl<S: Scheduler> Sim<S> {
    /// Validates the workload and loads it into a fresh context. Nothing is
    /// simulated until `step` or `run` is called.
    pub fn new(workload: Vec<Process>, scheduler: S) -> Result<Self, ConfigError> {
        if workload.is_empty() {
            return Err(ConfigError::EmptyWorkload);
        }
        let order = workload.iter().map(|p| p.pid).collect();

        // The context orders arrivals itself; equal arrivals keep workload order
        let mut ctx = SimCtx::new(workload.len());
        for p in &workload {
            ctx.create_task(p.pid, p.arrival_time, p.burst_time)?;
        }

        Ok(Self {
            core: SchedCore::new(ctx, scheduler),
            order,
        })
    }

    pub fn step(&mut self) -> Result<Vec<SchedEvent>, SimError> {
        self.core.step()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.finished()
    }

    pub fn run(mut self) -> Result<SimOutcome, SimError> {
        info!(
            "{}: simulating {} processes",
            S::NAME,
            self.core.ctx.task_count()
        );

        // Back-to-back idle steps fold into one span, so the trace grows
        // with dispatches rather than with idle ticks
        let mut trace: Vec<SchedEvent> = Vec::new();
        while !self.all_processes_completed() {
            for event in self.step()? {
                if !trace.last_mut().is_some_and(|last| last.coalesce(&event)) {
                    trace.push(event);
                }
            }
        }

        let makespan = self.core.now();
        info!(
            "{}: finished at t={} after {} steps",
            S::NAME,
            makespan,
            self.core.observer().steps()
        );

        Ok(SimOutcome {
            processes: self.processes()?,
            trace,
            makespan,
        })
    }

    /// Snapshot of every process, in workload order.
    pub fn processes(&self) -> Result<Vec<ProcessInstance>, SimError> {
        self.order
            .iter()
            .map(|&pid| self.core.ctx.task(pid).map(ProcessInstance::from))
            .collect()
    }

    pub fn processes_map<T>(&self, f: impl Fn(&ProcessInstance) -> T) -> Result<Vec<T>, SimError> {
        Ok(self.processes()?.iter().map(f).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{RoundRobinScheduler, SrtScheduler};

    #[test]
    fn empty_workload_is_rejected() {
        assert!(matches!(
            Sim::new(Vec::new(), SrtScheduler::new()),
            Err(ConfigError::EmptyWorkload)
        ));
    }

    #[test]
    fn results_come_back_in_workload_order() {
        let workload = vec![
            Process::new(10, 4, 1),
            Process::new(20, 0, 2),
            Process::new(30, 1, 1),
        ];
        let outcome = Sim::new(workload, SrtScheduler::new())
            .unwrap()
            .run()
            .unwrap();
        let pids: Vec<_> = outcome.processes.iter().map(|p| p.pid()).collect();
        assert_eq!(pids, vec![10, 20, 30]);
    }

    #[test]
    fn step_reports_idle_skip_then_dispatch() {
        let workload = vec![Process::new(0, 5, 2)];
        let mut sim = Sim::new(workload, RoundRobinScheduler::new(4).unwrap()).unwrap();

        let events = sim.step().unwrap();
        assert_eq!(events, vec![SchedEvent::CpuIdle { from: 0, to: 5 }]);

        let events = sim.step().unwrap();
        assert!(events.contains(&SchedEvent::Admitted { pid: 0, at: 5 }));
        assert!(events.contains(&SchedEvent::Dispatch {
            pid: 0,
            at: 5,
            slice: 2
        }));
        assert!(sim.all_processes_completed());
    }

    #[test]
    fn idle_ticks_sum_every_gap() {
        let workload = vec![Process::new(0, 2, 1), Process::new(1, 6, 2)];
        let outcome = Sim::new(workload, SrtScheduler::new())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(outcome.makespan, 8);
        assert_eq!(outcome.idle_ticks(), 5);
        assert!(outcome.trace.contains(&SchedEvent::CpuIdle { from: 3, to: 6 }));
    }

    #[test]
    fn processes_map_projects_each_record() {
        let workload = vec![Process::new(0, 0, 3), Process::new(1, 0, 3)];
        let mut sim = Sim::new(workload, RoundRobinScheduler::new(3).unwrap()).unwrap();
        while !sim.all_processes_completed() {
            sim.step().unwrap();
        }
        let completions = sim.processes_map(|p| p.completion_time).unwrap();
        assert_eq!(completions, vec![Some(3), Some(6)]);
    }
}
