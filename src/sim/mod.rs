pub mod driver;
pub mod policy;
pub mod process;
pub mod workload;

pub use driver::{Sim, SimOutcome};
pub use policy::{Policy, simulate};
pub use process::{Process, ProcessInstance};
pub use workload::WorkloadGenerator;
