use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpu_sched_sim::{Policy, Process, Report, simulate, sim::WorkloadGenerator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Round Robin with a fixed quantum
    Rr,
    /// Preemptive Shortest-Remaining-Time
    Srt,
}

impl PolicyArg {
    fn with_quantum(self, quantum: u64) -> Policy {
        match self {
            Self::Rr => Policy::RoundRobin { quantum },
            Self::Srt => Policy::ShortestRemainingTime,
        }
    }
}

/// Simulate a batch of processes under a preemptive CPU scheduling policy.
#[derive(Debug, Parser)]
#[command(name = "cpu-sched-sim", version)]
struct Args {
    #[arg(long, value_enum, default_value_t = PolicyArg::Rr)]
    policy: PolicyArg,

    /// Round Robin time quantum, in ticks
    #[arg(short, long, default_value_t = 3)]
    quantum: u64,

    /// A process as `pid:arrival:burst`. Repeat for each process; when none
    /// are given a random workload is generated.
    #[arg(short = 'p', long = "process", value_name = "PID:ARRIVAL:BURST")]
    processes: Vec<Process>,

    /// Ticks over which random arrivals are drawn
    #[arg(long, default_value_t = 20)]
    random_ticks: u64,

    #[arg(long, default_value_t = 0.3)]
    p_arrival: f64,

    #[arg(long, default_value_t = 0.3)]
    p_short: f64,

    #[arg(long, default_value_t = 2)]
    short_burst: u64,

    #[arg(long, default_value_t = 6)]
    long_burst: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print every scheduling event before the report
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workload = if args.processes.is_empty() {
        WorkloadGenerator {
            ticks: args.random_ticks,
            p_arrival: args.p_arrival,
            p_short: args.p_short,
            short_burst: args.short_burst,
            long_burst: args.long_burst,
        }
        .generate(args.seed)
        .context("cannot generate a random workload")?
    } else {
        args.processes.clone()
    };

    let policy = args.policy.with_quantum(args.quantum);
    let outcome = simulate(policy, workload).context("simulation aborted")?;

    if args.trace {
        for event in &outcome.trace {
            println!("{event:?}");
        }
        println!("Idle ticks: {}", outcome.idle_ticks());
        println!();
    }

    println!("{}", Report::new(policy, &outcome.processes));
    Ok(())
}
