use crate::tracker::{TICK_INTERVAL_MS, TrackerError, parse_leading_number};

pub const DEFAULT_TIMER_MINUTES: u64 = 5;
pub const DEFAULT_TIMER_SECONDS: u64 = 0;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
    Expired,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerTick {
    Ignored,
    Counting,
    Expired,
}

/// Count-down tracker.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    state: TimerState,
    remaining_ms: u64,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_ms: total_ms(DEFAULT_TIMER_MINUTES, DEFAULT_TIMER_SECONDS),
        }
    }
}

fn total_ms(minutes: u64, seconds: u64) -> u64 {
    minutes
        .saturating_mul(60)
        .saturating_add(seconds)
        .saturating_mul(1_000)
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Replaces the remaining duration. A configured value of zero is
    /// accepted here and rejected by [`CountdownTimer::start`].
    pub fn configure(&mut self, minutes: u64, seconds: u64) -> Result<u64, TrackerError> {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }
        self.remaining_ms = total_ms(minutes, seconds);
        if self.state == TimerState::Expired {
            self.state = TimerState::Idle;
        }
        Ok(self.remaining_ms)
    }

    pub fn configure_from_input(&mut self, minutes: &str, seconds: &str) -> Result<u64, TrackerError> {
        self.configure(parse_leading_number(minutes), parse_leading_number(seconds))
    }

    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }
        if self.remaining_ms == 0 {
            return Err(TrackerError::EmptyDuration);
        }
        self.state = TimerState::Running;
        Ok(())
    }

    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = TimerState::Stopped;
        true
    }

    pub fn tick(&mut self) -> TimerTick {
        if !self.is_running() {
            return TimerTick::Ignored;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_INTERVAL_MS);
        if self.remaining_ms == 0 {
            self.state = TimerState::Expired;
            return TimerTick::Expired;
        }
        TimerTick::Counting
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_ms = total_ms(DEFAULT_TIMER_MINUTES, DEFAULT_TIMER_SECONDS);
    }
}
