use std::str::FromStr;

use crate::core::state::{Pid, Task, Ticks};
use crate::error::ParseProcessError;

/// Static description of one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
}

impl Process {
    pub fn new(pid: Pid, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
        }
    }
}

// `pid:arrival:burst`
impl FromStr for Process {
    type Err = ParseProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        let &[pid, arrival, burst] = fields.as_slice() else {
            return Err(ParseProcessError::Shape(s.to_owned()));
        };

        let parse = |field: &'static str, value: &str| {
            value.trim().parse::<u64>().map_err(|_| ParseProcessError::Field {
                field,
                input: s.to_owned(),
            })
        };

        Ok(Self {
            pid: parse("pid", pid)?,
            arrival_time: parse("arrival time", arrival)?,
            burst_time: parse("burst time", burst)?,
        })
    }
}

/// A process together with what the simulation recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInstance {
    pub process: Process,
    pub remaining_time: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl ProcessInstance {
    pub fn pid(&self) -> Pid {
        self.process.pid
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time?.checked_sub(self.process.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time()?.checked_sub(self.process.burst_time)
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time?.checked_sub(self.process.arrival_time)
    }
}

impl From<&Task> for ProcessInstance {
    fn from(task: &Task) -> Self {
        Self {
            process: Process::new(task.pid, task.arrival_time, task.burst_time),
            remaining_time: task.remaining_time,
            start_time: task.start_time,
            completion_time: task.completion_time,
        }
    }
}
