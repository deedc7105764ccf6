use crate::core::{Pid, TaskState, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    // Process became eligible for selection
    Admitted {
        pid: Pid,
        at: Ticks,
    },
    TaskStateChange {
        pid: Pid,
        from: TaskState,
        to: TaskState,
    },
    // `pid` held the CPU over [at, at + slice)
    Dispatch {
        pid: Pid,
        at: Ticks,
        slice: Ticks,
    },
    // Nothing runnable; the clock jumped from `from` to `to`
    CpuIdle {
        from: Ticks,
        to: Ticks,
    },
}

impl SchedEvent {
    /// Extends an idle span with the one that immediately follows it.
    /// Returns false, leaving `self` untouched, for any other pair.
    pub fn coalesce(&mut self, next: &SchedEvent) -> bool {
        match (self, next) {
            (SchedEvent::CpuIdle { to, .. }, SchedEvent::CpuIdle { from, to: next_to })
                if *to == *from =>
            {
                *to = *next_to;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_idle_spans_merge() {
        let mut idle = SchedEvent::CpuIdle { from: 0, to: 1 };
        assert!(idle.coalesce(&SchedEvent::CpuIdle { from: 1, to: 2 }));
        assert_eq!(idle, SchedEvent::CpuIdle { from: 0, to: 2 });
    }

    #[test]
    fn other_pairs_are_left_alone() {
        let mut idle = SchedEvent::CpuIdle { from: 0, to: 1 };
        assert!(!idle.coalesce(&SchedEvent::CpuIdle { from: 4, to: 5 }));
        assert!(!idle.coalesce(&SchedEvent::Admitted { pid: 0, at: 1 }));
        assert_eq!(idle, SchedEvent::CpuIdle { from: 0, to: 1 });

        let mut dispatch = SchedEvent::Dispatch { pid: 0, at: 0, slice: 1 };
        assert!(!dispatch.coalesce(&SchedEvent::Dispatch { pid: 0, at: 1, slice: 1 }));
    }
}
