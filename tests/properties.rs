use std::collections::HashMap;

use cpu_sched_sim::{
    Policy, Process, SchedEvent, Sim, simulate,
    scheduler::{Scheduler, SrtScheduler},
};
use proptest::prelude::*;

// Pids are deliberately sparse and the workload is not sorted by arrival.
fn workload() -> impl Strategy<Value = Vec<Process>> {
    prop::collection::vec((0u64..30, 1u64..10), 1..12).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (arrival, burst))| Process::new(i as u64 * 3 + 7, arrival, burst))
            .collect()
    })
}

fn policy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        (1u64..8).prop_map(|quantum| Policy::RoundRobin { quantum }),
        Just(Policy::ShortestRemainingTime),
    ]
}

proptest! {
    #[test]
    fn completed_runs_satisfy_metric_identities(workload in workload(), policy in policy()) {
        let outcome = simulate(policy, workload.clone()).unwrap();
        prop_assert_eq!(outcome.processes.len(), workload.len());

        for p in &outcome.processes {
            let arrival = p.process.arrival_time;
            let burst = p.process.burst_time;
            let start = p.start_time.unwrap();
            let completion = p.completion_time.unwrap();

            prop_assert_eq!(p.remaining_time, 0);
            prop_assert!(start >= arrival);
            prop_assert!(completion >= arrival);
            prop_assert!(completion >= start + burst);
            prop_assert_eq!(p.turnaround_time(), Some(completion - arrival));
            prop_assert!(p.turnaround_time().unwrap() >= burst);
            prop_assert_eq!(p.waiting_time(), Some(completion - arrival - burst));
            prop_assert_eq!(p.response_time(), Some(start - arrival));
        }
    }

    #[test]
    fn executed_ticks_equal_total_burst(workload in workload(), policy in policy()) {
        let total_burst: u64 = workload.iter().map(|p| p.burst_time).sum();
        let outcome = simulate(policy, workload).unwrap();

        let executed: u64 = outcome
            .trace
            .iter()
            .filter_map(|e| match e {
                SchedEvent::Dispatch { slice, .. } => Some(*slice),
                _ => None,
            })
            .sum();
        prop_assert_eq!(executed, total_burst);

        let idle: u64 = outcome
            .trace
            .iter()
            .filter_map(|e| match e {
                SchedEvent::CpuIdle { from, to } => Some(to - from),
                _ => None,
            })
            .sum();
        prop_assert_eq!(executed + idle, outcome.makespan);
    }

    #[test]
    fn reruns_are_identical(workload in workload(), policy in policy()) {
        let first = simulate(policy, workload.clone()).unwrap();
        let second = simulate(policy, workload).unwrap();
        prop_assert_eq!(first.processes, second.processes);
        prop_assert_eq!(first.trace, second.trace);
    }

    #[test]
    fn round_robin_with_large_quantum_is_fcfs(workload in workload()) {
        let max_burst = workload.iter().map(|p| p.burst_time).max().unwrap();
        let outcome = simulate(Policy::RoundRobin { quantum: max_burst }, workload.clone()).unwrap();

        let mut fcfs = workload.clone();
        fcfs.sort_by_key(|p| (p.arrival_time, p.pid));
        let mut now = 0;
        let mut expected = HashMap::new();
        for p in &fcfs {
            now = now.max(p.arrival_time);
            expected.insert(p.pid, (now, now + p.burst_time));
            now += p.burst_time;
        }

        for p in &outcome.processes {
            let (start, completion) = expected[&p.pid()];
            prop_assert_eq!(p.start_time, Some(start));
            prop_assert_eq!(p.completion_time, Some(completion));
            // No preemption: response equals waiting time
            prop_assert_eq!(p.response_time(), p.waiting_time());
        }
    }

    #[test]
    fn srt_always_runs_the_shortest_admitted_process(workload in workload()) {
        let mut sim = Sim::new(workload, SrtScheduler::new()).unwrap();
        let mut last_remaining: HashMap<u64, u64> = HashMap::new();

        while !sim.all_processes_completed() {
            let events = sim.step().unwrap();

            for task in sim.core.ctx.tasks() {
                let previous = last_remaining.insert(task.pid, task.remaining_time);
                prop_assert!(previous.is_none_or(|r| r >= task.remaining_time));
            }

            let Some(pid) = events.iter().find_map(|e| match e {
                SchedEvent::Dispatch { pid, .. } => Some(*pid),
                _ => None,
            }) else {
                prop_assert!(sim.core.scheduler.queued().is_empty());
                continue;
            };

            let ran_with = sim.core.ctx.task(pid).unwrap().remaining_time + 1;
            for other in sim.core.scheduler.queued() {
                if other == pid {
                    continue;
                }
                let waiting = sim.core.ctx.task(other).unwrap().remaining_time;
                prop_assert!(
                    waiting >= ran_with,
                    "pid {} ran with {} while pid {} waited with {}",
                    pid, ran_with, other, waiting
                );
            }
        }
    }
}
