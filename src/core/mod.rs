pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::SchedEvent;
pub use state::{Pid, SimCtx, Task, TaskKey, TaskState, Ticks};
