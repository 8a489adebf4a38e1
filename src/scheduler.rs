use crate::tracker::TICK_INTERVAL_MS;

pub const CLOCK_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MAX_TICKS_PER_ADVANCE: usize = 4_096;

/// The three independent periodic sources. Declaration order breaks ties
/// between sources due at the same instant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum TickKind {
    Clock,
    Stopwatch,
    Timer,
}

impl TickKind {
    pub const ALL: [TickKind; 3] = [TickKind::Clock, TickKind::Stopwatch, TickKind::Timer];

    pub fn interval_ms(self) -> u64 {
        match self {
            TickKind::Clock => CLOCK_INTERVAL_MS,
            TickKind::Stopwatch | TickKind::Timer => TICK_INTERVAL_MS,
        }
    }

    fn slot(self) -> usize {
        match self {
            TickKind::Clock => 0,
            TickKind::Stopwatch => 1,
            TickKind::Timer => 2,
        }
    }
}

pub trait TickHandler {
    fn on_tick(&mut self, kind: TickKind, now_ms: u64);
    fn is_active(&self, kind: TickKind) -> bool;
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct AdvanceOutcome {
    pub clock_ticks: u64,
    pub stopwatch_ticks: u64,
    pub timer_ticks: u64,
    pub dropped: u64,
}

impl AdvanceOutcome {
    fn record(&mut self, kind: TickKind) {
        match kind {
            TickKind::Clock => self.clock_ticks += 1,
            TickKind::Stopwatch => self.stopwatch_ticks += 1,
            TickKind::Timer => self.timer_ticks += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.clock_ticks + self.stopwatch_ticks + self.timer_ticks
    }
}

/// Fires ticks against logical milliseconds. Sources are armed one interval
/// after they become active and disarmed as soon as they stop.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    now_ms: u64,
    due_ms: [Option<u64>; 3],
    max_ticks_per_advance: usize,
    dropped_total: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::with_max_ticks(DEFAULT_MAX_TICKS_PER_ADVANCE)
    }

    pub fn with_max_ticks(max_ticks_per_advance: usize) -> Self {
        Self {
            now_ms: 0,
            due_ms: [None; 3],
            max_ticks_per_advance: max_ticks_per_advance.max(1),
            dropped_total: 0,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn dropped_total(&self) -> u64 {
        self.dropped_total
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.due_ms.iter().flatten().copied().min()
    }

    pub fn advance_to(&mut self, target_ms: u64, handler: &mut dyn TickHandler) -> AdvanceOutcome {
        let target_ms = target_ms.max(self.now_ms);
        let mut outcome = AdvanceOutcome::default();
        self.sync_sources(handler);

        let mut fired = 0usize;
        while let Some((kind, due)) = self.next_due_before(target_ms) {
            if fired == self.max_ticks_per_advance {
                outcome.dropped += self.drop_backlog(target_ms);
                break;
            }
            self.now_ms = due;
            handler.on_tick(kind, due);
            outcome.record(kind);
            fired += 1;
            self.due_ms[kind.slot()] = Some(due + kind.interval_ms());
            self.sync_sources(handler);
        }

        self.now_ms = target_ms;
        self.dropped_total += outcome.dropped;
        outcome
    }

    fn next_due_before(&self, target_ms: u64) -> Option<(TickKind, u64)> {
        TickKind::ALL
            .iter()
            .filter_map(|kind| self.due_ms[kind.slot()].map(|due| (*kind, due)))
            .filter(|(_, due)| *due <= target_ms)
            .min_by_key(|(kind, due)| (*due, *kind))
    }

    fn sync_sources(&mut self, handler: &dyn TickHandler) {
        for kind in TickKind::ALL {
            let slot = kind.slot();
            match (handler.is_active(kind), self.due_ms[slot]) {
                (true, None) => self.due_ms[slot] = Some(self.now_ms + kind.interval_ms()),
                (false, Some(_)) => self.due_ms[slot] = None,
                _ => {}
            }
        }
    }

    fn drop_backlog(&mut self, target_ms: u64) -> u64 {
        let mut skipped = 0;
        for kind in TickKind::ALL {
            let slot = kind.slot();
            if let Some(due) = self.due_ms[slot]
                && due <= target_ms
            {
                let interval = kind.interval_ms();
                skipped += (target_ms - due) / interval + 1;
                self.due_ms[slot] = Some(target_ms + interval);
            }
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        stopwatch_active: bool,
        timer_active: bool,
        stop_stopwatch_after: Option<u64>,
        log: Vec<(TickKind, u64)>,
    }

    impl TickHandler for Recorder {
        fn on_tick(&mut self, kind: TickKind, now_ms: u64) {
            self.log.push((kind, now_ms));
            if kind == TickKind::Stopwatch
                && let Some(limit) = self.stop_stopwatch_after
                && now_ms >= limit
            {
                self.stopwatch_active = false;
            }
        }

        fn is_active(&self, kind: TickKind) -> bool {
            match kind {
                TickKind::Clock => true,
                TickKind::Stopwatch => self.stopwatch_active,
                TickKind::Timer => self.timer_active,
            }
        }
    }

    #[test]
    fn one_second_with_running_stopwatch() {
        let mut scheduler = TickScheduler::new();
        let mut recorder = Recorder {
            stopwatch_active: true,
            ..Recorder::default()
        };
        let outcome = scheduler.advance_to(1_000, &mut recorder);
        assert_eq!(outcome.clock_ticks, 1);
        assert_eq!(outcome.stopwatch_ticks, 100);
        assert_eq!(outcome.timer_ticks, 0);
        assert_eq!(scheduler.now_ms(), 1_000);
    }

    #[test]
    fn clock_fires_before_other_sources_at_the_same_instant() {
        let mut scheduler = TickScheduler::new();
        let mut recorder = Recorder {
            stopwatch_active: true,
            timer_active: true,
            ..Recorder::default()
        };
        scheduler.advance_to(1_000, &mut recorder);
        let at_one_second: Vec<TickKind> = recorder
            .log
            .iter()
            .filter(|(_, at)| *at == 1_000)
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(
            at_one_second,
            vec![TickKind::Clock, TickKind::Stopwatch, TickKind::Timer]
        );
    }

    #[test]
    fn stopping_a_source_leaves_the_others_running() {
        let mut scheduler = TickScheduler::new();
        let mut recorder = Recorder {
            stopwatch_active: true,
            stop_stopwatch_after: Some(500),
            ..Recorder::default()
        };
        let outcome = scheduler.advance_to(3_000, &mut recorder);
        assert_eq!(outcome.stopwatch_ticks, 50);
        assert_eq!(outcome.clock_ticks, 3);
    }

    #[test]
    fn source_started_later_is_armed_from_current_time() {
        let mut scheduler = TickScheduler::new();
        let mut recorder = Recorder::default();
        scheduler.advance_to(250, &mut recorder);
        recorder.timer_active = true;
        scheduler.advance_to(300, &mut recorder);
        let first_timer = recorder
            .log
            .iter()
            .find(|(kind, _)| *kind == TickKind::Timer)
            .map(|(_, at)| *at);
        assert_eq!(first_timer, Some(260));
    }

    #[test]
    fn backlog_beyond_cap_is_dropped_and_counted() {
        let mut scheduler = TickScheduler::with_max_ticks(10);
        let mut recorder = Recorder {
            stopwatch_active: true,
            ..Recorder::default()
        };
        let outcome = scheduler.advance_to(1_000, &mut recorder);
        assert_eq!(outcome.total(), 10);
        assert!(outcome.dropped > 0);
        assert_eq!(scheduler.dropped_total(), outcome.dropped);
        assert_eq!(scheduler.next_due_ms(), Some(1_010));
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut scheduler = TickScheduler::new();
        let mut recorder = Recorder::default();
        scheduler.advance_to(2_000, &mut recorder);
        let outcome = scheduler.advance_to(1_000, &mut recorder);
        assert_eq!(outcome.total(), 0);
        assert_eq!(scheduler.now_ms(), 2_000);
    }
}
