use log::debug;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use super::event::SchedEvent;
use crate::error::{ConfigError, SimError};

pub type Pid = u64;
pub type Ticks = u64;
new_key_type! {
    pub struct TaskKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    // Created but arrival time not yet reached (or not yet admitted)
    NotArrived,
    Runnable,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub remaining_time: Ticks,
    pub state: TaskState,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

/// Everything a single simulation run owns: the clock, the task table and the
/// arrival backlog. Schedulers get `&mut SimCtx` and keep their ready queues
/// to themselves.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    tasks: SlotMap<TaskKey, Task>,
    pid_to_task: FxHashMap<Pid, TaskKey>,
    // Sorted by arrival time; ties keep creation order
    pending: VecDeque<TaskKey>,
    completed: usize,
    events: Vec<SchedEvent>,
}

impl SimCtx {
    pub fn new(capacity: usize) -> Self {
        Self {
            now: 0,
            tasks: SlotMap::with_capacity_and_key(capacity),
            pid_to_task: FxHashMap::default(),
            pending: VecDeque::with_capacity(capacity),
            completed: 0,
            events: Vec::new(),
        }
    }

    /// Registers a process. Tasks may be created in any order; the arrival
    /// backlog is kept sorted by arrival time.
    pub fn create_task(
        &mut self,
        pid: Pid,
        arrival_time: Ticks,
        burst_time: Ticks,
    ) -> Result<TaskKey, ConfigError> {
        if burst_time == 0 {
            return Err(ConfigError::ZeroBurst { pid });
        }
        if self.pid_to_task.contains_key(&pid) {
            return Err(ConfigError::DuplicatePid { pid });
        }

        let key = self.tasks.insert(Task {
            pid,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            state: TaskState::NotArrived,
            start_time: None,
            completion_time: None,
        });

        // Backlog stays sorted by arrival, ties in creation order
        let pos = self
            .pending
            .partition_point(|&k| self.tasks[k].arrival_time <= arrival_time);
        self.pending.insert(pos, key);
        self.pid_to_task.insert(pid, key);

        Ok(key)
    }

    pub fn advance_time(&mut self, delta: Ticks) -> Result<(), SimError> {
        self.now = self
            .now
            .checked_add(delta)
            .ok_or_else(|| SimError::invariant(self.now, "simulation clock overflowed"))?;
        Ok(())
    }

    pub fn task(&self, pid: Pid) -> Result<&Task, SimError> {
        self.pid_to_task
            .get(&pid)
            .and_then(|&key| self.tasks.get(key))
            .ok_or(SimError::UnknownPid(pid))
    }

    fn task_mut(&mut self, pid: Pid) -> Result<&mut Task, SimError> {
        self.pid_to_task
            .get(&pid)
            .and_then(|&key| self.tasks.get_mut(key))
            .ok_or(SimError::UnknownPid(pid))
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.tasks.len()
    }

    /// Earliest arrival among processes that have not been admitted yet.
    pub fn next_arrival(&self) -> Option<Ticks> {
        self.pending
            .front()
            .map(|&key| self.tasks[key].arrival_time)
    }

    /// Admits every pending process whose arrival time has been reached and
    /// returns their pids in arrival order (creation order within a tick).
    pub fn take_arrivals(&mut self) -> Vec<Pid> {
        let mut arrived = Vec::new();
        while let Some(&key) = self.pending.front() {
            let task = &mut self.tasks[key];
            if task.arrival_time > self.now {
                break;
            }
            self.pending.pop_front();

            task.state = TaskState::Runnable;
            arrived.push(task.pid);
            debug!("t={} admitted pid={}", self.now, task.pid);
            self.events.push(SchedEvent::Admitted {
                pid: task.pid,
                at: self.now,
            });
        }
        arrived
    }

    // Returns the previous state (always Runnable for a well-formed queue)
    pub fn set_running(&mut self, pid: Pid) -> Result<TaskState, SimError> {
        let now = self.now;
        let task = self.task_mut(pid)?;
        let prev_state = task.state;
        if prev_state != TaskState::Runnable {
            return Err(SimError::invariant(
                now,
                format!("pid {pid} dispatched while {prev_state:?}"),
            ));
        }

        task.state = TaskState::Running;
        if task.start_time.is_none() {
            task.start_time = Some(now);
        }
        self.events.push(SchedEvent::TaskStateChange {
            pid,
            from: prev_state,
            to: TaskState::Running,
        });
        Ok(prev_state)
    }

    /// Runs the current task for `slice` ticks, advancing the clock.
    /// Returns the remaining time afterwards.
    pub fn consume(&mut self, pid: Pid, slice: Ticks) -> Result<Ticks, SimError> {
        let now = self.now;
        let task = self.task_mut(pid)?;
        if task.state != TaskState::Running {
            return Err(SimError::invariant(
                now,
                format!("pid {pid} consumed CPU while {:?}", task.state),
            ));
        }
        let remaining = task.remaining_time.checked_sub(slice).ok_or_else(|| {
            SimError::invariant(
                now,
                format!(
                    "slice of {slice} exceeds remaining time {} of pid {pid}",
                    task.remaining_time
                ),
            )
        })?;
        task.remaining_time = remaining;

        self.advance_time(slice)?;
        Ok(remaining)
    }

    pub fn mark_runnable(&mut self, pid: Pid) -> Result<(), SimError> {
        let now = self.now;
        let task = self.task_mut(pid)?;
        if task.state == TaskState::Completed {
            return Err(SimError::invariant(
                now,
                format!("completed pid {pid} cannot be runnable"),
            ));
        }

        let from = task.state;
        task.state = TaskState::Runnable;
        self.events.push(SchedEvent::TaskStateChange {
            pid,
            from,
            to: TaskState::Runnable,
        });
        Ok(())
    }

    pub fn mark_completed(&mut self, pid: Pid) -> Result<(), SimError> {
        let now = self.now;
        let task = self.task_mut(pid)?;
        if task.state != TaskState::Running || task.remaining_time != 0 {
            return Err(SimError::invariant(
                now,
                format!(
                    "pid {pid} completed while {:?} with {} ticks remaining",
                    task.state, task.remaining_time
                ),
            ));
        }
        if task.completion_time.is_some() {
            return Err(SimError::invariant(now, format!("pid {pid} completed twice")));
        }

        task.state = TaskState::Completed;
        task.completion_time = Some(now);
        self.completed += 1;
        debug!("t={now} completed pid={pid}");
        self.events.push(SchedEvent::TaskStateChange {
            pid,
            from: TaskState::Running,
            to: TaskState::Completed,
        });
        Ok(())
    }

    pub fn emit(&mut self, event: SchedEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.events)
    }
}
