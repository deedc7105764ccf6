pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;

pub use crate::core::SchedEvent;
pub use error::{ConfigError, SimError};
pub use report::{Report, Summary};
pub use scheduler::Scheduler;
pub use sim::{Policy, Process, ProcessInstance, Sim, SimOutcome, simulate};
