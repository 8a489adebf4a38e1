use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;

use crate::controller::Controller;
use crate::format::format_duration;
use crate::notify::LogNotifier;
use crate::prefs::JsonFileStore;
use crate::scheduler::TickScheduler;
use crate::time_provider::LocalTimeProvider;
use crate::tracker::TICK_INTERVAL_MS;

const LATE_TOLERANCE: Duration = Duration::from_millis(2);

/// Wall-clock spacing between consecutive pacing steps.
pub struct TickStats {
    total_steps: u64,
    late_steps: u64,
    last_step: Duration,
    target_step: Duration,
    window_size: usize,
    window: VecDeque<Duration>,
    step_histogram: [u64; 5],
}

impl TickStats {
    pub fn new(window_size: usize, target_step: Duration) -> Self {
        Self {
            total_steps: 0,
            late_steps: 0,
            last_step: Duration::ZERO,
            target_step,
            window_size: window_size.max(1),
            window: VecDeque::with_capacity(window_size),
            step_histogram: [0; 5],
        }
    }

    pub fn record_step(&mut self, step: Duration) {
        self.total_steps += 1;
        self.last_step = step;
        if step > self.target_step + LATE_TOLERANCE {
            self.late_steps += 1;
        }

        if self.window.len() == self.window_size {
            let _ = self.window.pop_front();
        }
        self.window.push_back(step);
        self.update_histogram(step);
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn late_steps(&self) -> u64 {
        self.late_steps
    }

    pub fn last_step(&self) -> Duration {
        self.last_step
    }

    /// Mean step over the rolling window, in milliseconds.
    pub fn rolling_mean_ms(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        let total_ms: f64 = self
            .window
            .iter()
            .map(|step| step.as_secs_f64() * 1_000.0)
            .sum();
        total_ms / self.window.len() as f64
    }

    pub fn histogram(&self) -> [u64; 5] {
        self.step_histogram
    }

    fn update_histogram(&mut self, step: Duration) {
        let ms = step.as_secs_f64() * 1_000.0;
        let bucket = if ms <= 9.0 {
            0
        } else if ms <= 11.0 {
            1
        } else if ms <= 15.0 {
            2
        } else if ms <= 30.0 {
            3
        } else {
            4
        };
        self.step_histogram[bucket] += 1;
    }
}

/// Runs a headless stopwatch against the real clock for `seconds` and reports
/// how closely the 10 ms tick accumulation tracks wall time. Runs on a
/// snapshot of the store, so alarms firing meanwhile are not persisted.
pub fn run_diagnostics(store: &JsonFileStore, seconds: u64) -> Result<()> {
    let target = Duration::from_millis(TICK_INTERVAL_MS);
    let mut controller = Controller::new(
        Box::new(LocalTimeProvider),
        Box::new(store.snapshot()),
        Box::new(LogNotifier),
    )?;

    println!("deskclock diagnostics");
    println!("Time source: {}", controller.time_source_label());
    println!("Preferences: {} (read-only)", store.path().display());
    println!(
        "  Theme: {}, format: {}, alarms: {} ({} active)",
        controller.theme(),
        controller.time_format().as_pref_value(),
        controller.registry().len(),
        controller.registry().active_alarms().count()
    );
    println!("  Clock: {} ({})", controller.clock_text(), controller.date_text());

    println!("Running {seconds} second stopwatch pacing benchmark...");
    controller.toggle_stopwatch();
    let mut scheduler = TickScheduler::new();
    let mut stats = TickStats::new(512, target);
    let mut stopwatch_ticks = 0u64;
    let mut clock_ticks = 0u64;
    let mut total_ticks = 0u64;

    let bench_start = Instant::now();
    let bench_end = bench_start + Duration::from_secs(seconds);
    let mut next_step = bench_start + target;
    let mut last_step = bench_start;
    while Instant::now() < bench_end {
        sleep_until(next_step);
        let now = Instant::now();
        stats.record_step(now.duration_since(last_step));
        last_step = now;

        let logical_ms = u64::try_from(now.duration_since(bench_start).as_millis())?;
        let outcome = scheduler.advance_to(logical_ms, &mut controller);
        stopwatch_ticks += outcome.stopwatch_ticks;
        clock_ticks += outcome.clock_ticks;
        total_ticks += outcome.total();
        next_step += target;
    }
    controller.toggle_stopwatch();

    let wall_ms = u64::try_from(bench_start.elapsed().as_millis())?;
    let elapsed_ms = controller.stopwatch().elapsed_ms();
    let drift_ms = i128::from(elapsed_ms) - i128::from(wall_ms);
    info!("diagnostics finished after {wall_ms} ms");

    println!("Tick summary:");
    println!("  Steps: {}", stats.total_steps());
    println!("  Late steps (>{} ms): {}", TICK_INTERVAL_MS + 2, stats.late_steps());
    println!("  Last step: {:.2} ms", stats.last_step().as_secs_f64() * 1_000.0);
    println!("  Rolling mean step: {:.2} ms", stats.rolling_mean_ms());
    println!("  Step histogram buckets (<=9, <=11, <=15, <=30, >30 ms):");
    println!("  {:?}", stats.histogram());
    println!(
        "  Ticks: {total_ticks} (stopwatch {stopwatch_ticks}, clock {clock_ticks}), dropped: {}",
        scheduler.dropped_total()
    );
    println!("Stopwatch elapsed: {}", format_duration(elapsed_ms));
    println!("Stopwatch drift: {drift_ms} ms against {wall_ms} ms wall time");
    Ok(())
}

pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }

    let mut remaining = deadline.saturating_duration_since(now);
    if remaining > Duration::from_millis(1) {
        std::thread::sleep(remaining - Duration::from_micros(250));
    }

    loop {
        let current = Instant::now();
        if current >= deadline {
            break;
        }
        remaining = deadline.saturating_duration_since(current);
        if remaining > Duration::from_micros(50) {
            std::thread::yield_now();
        } else {
            std::hint::spin_loop();
        }
    }
}
