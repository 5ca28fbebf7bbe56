//! Simulation and benchmark runners.

use std::time::Instant;

use tracing::{info, warn};

use crate::automail::Automail;
use crate::config::SimConfig;
use crate::delivery::DeliveryLog;
use crate::error::SimError;
use crate::generator::MailGenerator;
use crate::pool::SortingPool;
use crate::roster::RobotFactory;
use crate::types::Tick;

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    let usage = unsafe { usage.assume_init() };
    let user = usage.ru_utime.tv_sec as f64 + (usage.ru_utime.tv_usec as f64 / 1_000_000.0);
    let sys = usage.ru_stime.tv_sec as f64 + (usage.ru_stime.tv_usec as f64 / 1_000_000.0);
    Some((user, sys))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

/// Outcome of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub robots: usize,
    pub floors: u32,
    pub total: usize,
    pub delivered: usize,
    pub final_tick: Tick,
    pub score: f64,
}

/// Run until every generated item is delivered.
pub fn run(config: &SimConfig) -> Result<SimulationReport, SimError> {
    config.validate()?;
    let mut generator = MailGenerator::new(config);
    let total = generator.total();
    let mut factory = RobotFactory::new();
    let mut automail = Automail::new(
        SortingPool::new(),
        DeliveryLog::new(),
        &mut factory,
        config.robots,
    );
    info!(
        seed = config.seed,
        robots = config.robots,
        floors = config.floors,
        mail = total,
        "[SIM] start"
    );

    while automail.reporter().delivered_count() < total {
        let now = automail.clock() + 1;
        if now > config.max_ticks {
            warn!(
                tick = automail.clock(),
                unreleased = generator.remaining(),
                pending = automail.pool().pending().len(),
                "[SIM] tick limit reached"
            );
            return Err(SimError::Stalled {
                ticks: automail.clock(),
                delivered: automail.reporter().delivered_count(),
                total,
            });
        }
        for item in generator.arrivals(now) {
            automail.pool_mut().arrive(item)?;
        }
        automail.step()?;
    }

    let report = SimulationReport {
        robots: config.robots,
        floors: config.floors,
        total,
        delivered: automail.reporter().delivered_count(),
        final_tick: automail.clock(),
        score: automail.reporter().score(),
    };
    info!(ticks = report.final_tick, score = report.score, "[SIM] finished");
    Ok(report)
}

/// Print the `key=value` summary the CLI reports.
pub fn print_summary(report: &SimulationReport) {
    println!("SIMULATION SUMMARY");
    println!("robots={}", report.robots);
    println!("floors={}", report.floors);
    println!("mail_total={}", report.total);
    println!("delivered={}", report.delivered);
    println!("final_tick={}", report.final_tick);
    println!("score={:.2}", report.score);
}

/// Sweep robot counts and seeds over `base`, printing one CSV row per run.
pub fn run_bench(base: &SimConfig, robot_sets: &[usize], seeds: &[u64]) -> Result<(), SimError> {
    println!("robots,seed,mail_total,final_tick,score,elapsed_ms,cpu_user_s,cpu_sys_s");
    for &robots in robot_sets {
        for &seed in seeds {
            let config = SimConfig {
                robots,
                seed,
                ..base.clone()
            };
            let cpu_start = cpu_times_seconds();
            let start = Instant::now();
            let report = run(&config)?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            let (cpu_user, cpu_sys) = match (cpu_start, cpu_times_seconds()) {
                (Some((user_start, sys_start)), Some((user_end, sys_end))) => (
                    format!("{:.4}", user_end - user_start),
                    format!("{:.4}", sys_end - sys_start),
                ),
                _ => ("NA".to_string(), "NA".to_string()),
            };
            println!(
                "{},{},{},{},{:.2},{:.2},{},{}",
                robots,
                seed,
                report.total,
                report.final_tick,
                report.score,
                elapsed_ms,
                cpu_user,
                cpu_sys
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_delivers_everything() {
        let report = run(&SimConfig::default()).unwrap();
        assert_eq!(report.delivered, report.total);
        assert!(report.final_tick > 0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let config = SimConfig {
            mail_max_weight: 3000,
            ..SimConfig::default()
        };
        assert_eq!(run(&config).unwrap(), run(&config).unwrap());
    }

    #[test]
    fn tick_limit_stops_a_run() {
        let config = SimConfig {
            max_ticks: 5,
            ..SimConfig::default()
        };
        assert!(matches!(run(&config), Err(SimError::Stalled { ticks: 5, .. })));
    }

    #[test]
    fn invalid_config_is_reported_before_running() {
        let config = SimConfig {
            robots: 0,
            ..SimConfig::default()
        };
        assert!(matches!(run(&config), Err(SimError::Config(_))));
    }

    #[cfg(unix)]
    #[test]
    fn cpu_times_are_available_on_unix() {
        assert!(cpu_times_seconds().is_some());
    }
}
