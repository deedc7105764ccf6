//! Per-process tables and averages for finished runs.

use std::fmt;

use average::{Estimate, Mean};

use crate::core::Ticks;
use crate::sim::{Policy, ProcessInstance};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub avg_waiting: f64,
}

/// Read-only view over a completed run, rendered through `Display`.
pub struct Report<'a> {
    policy: Policy,
    processes: &'a [ProcessInstance],
}

impl<'a> Report<'a> {
    pub fn new(policy: Policy, processes: &'a [ProcessInstance]) -> Self {
        Self { policy, processes }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            avg_turnaround: avg(self.processes.iter().filter_map(|p| p.turnaround_time())),
            avg_response: avg(self.processes.iter().filter_map(|p| p.response_time())),
            avg_waiting: avg(self.processes.iter().filter_map(|p| p.waiting_time())),
        }
    }
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    iter.map(|t| t as f64).collect::<Mean>().estimate()
}

fn cell(value: Option<Ticks>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        writeln!(f, "{}", self.policy)?;

        match self.policy {
            Policy::RoundRobin { .. } => {
                writeln!(
                    f,
                    "{:<5}{:<10}{:<10}{:<10}{:<10}",
                    "PID", "Arrival", "Burst", "Response", "Turnaround"
                )?;
                for p in self.processes {
                    writeln!(
                        f,
                        "{:<5}{:<10}{:<10}{:<10}{:<10}",
                        p.pid(),
                        p.process.arrival_time,
                        p.process.burst_time,
                        cell(p.response_time()),
                        cell(p.turnaround_time()),
                    )?;
                }
                writeln!(f)?;
                writeln!(f, "Average Turnaround Time: {:.2} ticks", summary.avg_turnaround)?;
                write!(f, "Average Response Time: {:.2} ticks", summary.avg_response)
            }
            Policy::ShortestRemainingTime => {
                writeln!(
                    f,
                    "{:<5}{:<10}{:<10}{:<10}{:<15}{:<15}{:<10}",
                    "PID", "Arrival", "Burst", "Start", "Completion", "Turnaround", "Waiting"
                )?;
                for p in self.processes {
                    writeln!(
                        f,
                        "{:<5}{:<10}{:<10}{:<10}{:<15}{:<15}{:<10}",
                        p.pid(),
                        p.process.arrival_time,
                        p.process.burst_time,
                        cell(p.start_time),
                        cell(p.completion_time),
                        cell(p.turnaround_time()),
                        cell(p.waiting_time()),
                    )?;
                }
                writeln!(f)?;
                writeln!(f, "Average Turnaround Time: {:.2} ticks", summary.avg_turnaround)?;
                write!(f, "Average Waiting Time: {:.2} ticks", summary.avg_waiting)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Process;

    fn finished(pid: u64, arrival: Ticks, burst: Ticks, start: Ticks, done: Ticks) -> ProcessInstance {
        ProcessInstance {
            process: Process::new(pid, arrival, burst),
            remaining_time: 0,
            start_time: Some(start),
            completion_time: Some(done),
        }
    }

    #[test]
    fn averages_over_all_processes() {
        let processes = [finished(0, 0, 2, 0, 2), finished(1, 1, 2, 2, 4)];
        let summary = Report::new(Policy::ShortestRemainingTime, &processes).summary();
        assert_eq!(summary.avg_turnaround, 2.5);
        assert_eq!(summary.avg_response, 0.5);
        assert_eq!(summary.avg_waiting, 0.5);
    }

    #[test]
    fn round_robin_table_shows_response_column() {
        let processes = [finished(0, 0, 3, 0, 3)];
        let text = Report::new(Policy::RoundRobin { quantum: 2 }, &processes).to_string();
        assert!(text.starts_with("Round Robin (quantum=2)\n"));
        assert!(text.contains("Response"));
        assert!(!text.contains("Waiting"));
        assert!(text.ends_with("Average Response Time: 0.00 ticks"));
    }

    #[test]
    fn srt_table_shows_waiting_column() {
        let processes = [finished(0, 1, 3, 1, 4)];
        let text = Report::new(Policy::ShortestRemainingTime, &processes).to_string();
        assert!(text.contains("Completion"));
        assert!(text.contains("Average Turnaround Time: 3.00 ticks"));
        assert!(text.ends_with("Average Waiting Time: 0.00 ticks"));
    }
}
