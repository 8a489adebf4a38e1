use crate::tracker::TICK_INTERVAL_MS;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StopwatchState {
    Stopped,
    Running,
}

/// Count-up tracker. Elapsed time grows by the nominal interval per tick, not
/// by measured wall-clock time.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    state: StopwatchState,
    elapsed_ms: u64,
    laps: Vec<u64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self {
            state: StopwatchState::Stopped,
            elapsed_ms: 0,
            laps: Vec::new(),
        }
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Returns `false` when the stopwatch was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = StopwatchState::Running;
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = StopwatchState::Stopped;
        true
    }

    pub fn toggle(&mut self) -> StopwatchState {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.state
    }

    pub fn tick(&mut self) {
        if self.is_running() {
            self.elapsed_ms = self.elapsed_ms.saturating_add(TICK_INTERVAL_MS);
        }
    }

    pub fn lap(&mut self) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        self.laps.push(self.elapsed_ms);
        Some(self.elapsed_ms)
    }

    pub fn reset(&mut self) {
        self.state = StopwatchState::Stopped;
        self.elapsed_ms = 0;
        self.laps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_ticks_accumulate_five_intervals() {
        let mut stopwatch = Stopwatch::new();
        assert!(stopwatch.start());
        for _ in 0..5 {
            stopwatch.tick();
        }
        assert!(stopwatch.stop());
        assert_eq!(stopwatch.elapsed_ms(), 5 * TICK_INTERVAL_MS);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut stopwatch = Stopwatch::new();
        assert!(stopwatch.start());
        stopwatch.tick();
        assert!(!stopwatch.start());
        assert_eq!(stopwatch.elapsed_ms(), TICK_INTERVAL_MS);
        assert_eq!(stopwatch.state(), StopwatchState::Running);
    }

    #[test]
    fn ticks_while_stopped_are_ignored() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.start();
        stopwatch.tick();
        stopwatch.stop();
        stopwatch.tick();
        stopwatch.tick();
        assert_eq!(stopwatch.elapsed_ms(), TICK_INTERVAL_MS);
    }

    #[test]
    fn stop_then_start_resumes_from_elapsed() {
        let mut stopwatch = Stopwatch::new();
        assert_eq!(stopwatch.toggle(), StopwatchState::Running);
        stopwatch.tick();
        stopwatch.tick();
        assert_eq!(stopwatch.toggle(), StopwatchState::Stopped);
        assert_eq!(stopwatch.toggle(), StopwatchState::Running);
        stopwatch.tick();
        assert_eq!(stopwatch.elapsed_ms(), 3 * TICK_INTERVAL_MS);
    }

    #[test]
    fn lap_records_only_while_running() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.start();
        for _ in 0..3 {
            stopwatch.tick();
        }
        assert_eq!(stopwatch.lap(), Some(30));
        stopwatch.tick();
        assert_eq!(stopwatch.lap(), Some(40));
        stopwatch.stop();

        assert_eq!(stopwatch.lap(), None);
        assert_eq!(stopwatch.laps(), &[30, 40]);
    }

    #[test]
    fn reset_clears_everything_from_any_state() {
        let mut running = Stopwatch::new();
        running.start();
        running.tick();
        running.lap();
        running.reset();
        assert_eq!(running.elapsed_ms(), 0);
        assert!(running.laps().is_empty());
        assert!(!running.is_running());

        let mut stopped = Stopwatch::new();
        stopped.reset();
        assert_eq!(stopped.elapsed_ms(), 0);
        assert!(stopped.laps().is_empty());
    }
}
