use anyhow::Result;
use log::{debug, info, warn};

use crate::alarm::model::Alarm;
use crate::alarm::registry::AlarmRegistry;
use crate::format::{
    TimeFormat, format_alarm_time, format_clock, format_countdown, format_date, format_duration,
    format_lap, greeting,
};
use crate::notify::AlarmNotifier;
use crate::prefs::{PreferenceStore, Preferences};
use crate::scheduler::{TickHandler, TickKind};
use crate::time_provider::{Moment, TimeProvider};
use crate::tracker::TrackerError;
use crate::tracker::stopwatch::{Stopwatch, StopwatchState};
use crate::tracker::timer::{
    CountdownTimer, DEFAULT_TIMER_MINUTES, DEFAULT_TIMER_SECONDS, TimerState, TimerTick,
};

pub const ALARM_NOTIFICATION_MS: u64 = 10_000;
pub const TIMER_PULSE_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    Clock,
    Stopwatch,
    Timer,
    Alarm,
}

impl Mode {
    pub fn next(self) -> Self {
        match self {
            Mode::Clock => Mode::Stopwatch,
            Mode::Stopwatch => Mode::Timer,
            Mode::Timer => Mode::Alarm,
            Mode::Alarm => Mode::Clock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Clock => "Clock",
            Mode::Stopwatch => "Stopwatch",
            Mode::Timer => "Timer",
            Mode::Alarm => "Alarm",
        }
    }
}

/// A fired alarm waiting to be dismissed by the user or by timeout.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Notification {
    pub hour: u32,
    pub minute: u32,
    pub expires_at_ms: u64,
}

/// Text of the timer's minute and second entry fields.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TimerFields {
    pub minutes: String,
    pub seconds: String,
}

impl Default for TimerFields {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_TIMER_MINUTES.to_string(),
            seconds: DEFAULT_TIMER_SECONDS.to_string(),
        }
    }
}

/// Application state: display mode, trackers, alarms and the collaborators
/// they report to. Driven by [`TickHandler::on_tick`] and user intents.
pub struct Controller {
    time_provider: Box<dyn TimeProvider>,
    store: Box<dyn PreferenceStore>,
    notifier: Box<dyn AlarmNotifier>,
    mode: Mode,
    time_format: TimeFormat,
    theme: String,
    stopwatch: Stopwatch,
    timer: CountdownTimer,
    timer_fields: TimerFields,
    registry: AlarmRegistry,
    notifications: Vec<Notification>,
    timer_pulse_until: Option<u64>,
    moment: Moment,
    clock_text: String,
    date_text: String,
    greeting: &'static str,
    persist_error: Option<String>,
}

impl Controller {
    pub fn new(
        time_provider: Box<dyn TimeProvider>,
        store: Box<dyn PreferenceStore>,
        notifier: Box<dyn AlarmNotifier>,
    ) -> Result<Self> {
        let preferences = Preferences::load(store.as_ref());
        let moment = time_provider.now()?;
        info!(
            "loaded preferences: theme '{}', {} display, {} alarm(s)",
            preferences.theme,
            preferences.time_format.as_pref_value(),
            preferences.alarms.len()
        );

        let mut controller = Self {
            time_provider,
            store,
            notifier,
            mode: Mode::Clock,
            time_format: preferences.time_format,
            theme: preferences.theme,
            stopwatch: Stopwatch::new(),
            timer: CountdownTimer::new(),
            timer_fields: TimerFields::default(),
            registry: AlarmRegistry::new(preferences.alarms),
            notifications: Vec::new(),
            timer_pulse_until: None,
            moment,
            clock_text: String::new(),
            date_text: String::new(),
            greeting: greeting(moment.hour),
            persist_error: None,
        };
        controller.refresh_display();
        Ok(controller)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn timer_fields_mut(&mut self) -> &mut TimerFields {
        &mut self.timer_fields
    }

    pub fn registry(&self) -> &AlarmRegistry {
        &self.registry
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn greeting(&self) -> &'static str {
        self.greeting
    }

    pub fn time_source_label(&self) -> &'static str {
        self.time_provider.label()
    }

    pub fn stopwatch_text(&self) -> String {
        format_duration(self.stopwatch.elapsed_ms())
    }

    pub fn timer_text(&self) -> String {
        format_countdown(self.timer.remaining_ms())
    }

    pub fn lap_lines(&self) -> Vec<String> {
        self.stopwatch
            .laps()
            .iter()
            .enumerate()
            .map(|(index, lap)| format_lap(index, *lap))
            .collect()
    }

    /// Active alarms with their registry position, formatted for display.
    pub fn active_alarm_rows(&self) -> Vec<(usize, String)> {
        self.registry
            .active_alarms()
            .map(|(index, alarm)| {
                (
                    index,
                    format_alarm_time(alarm.hour, alarm.minute, self.time_format),
                )
            })
            .collect()
    }

    pub fn notification_text(&self, notification: &Notification) -> String {
        format!(
            "Alarm! {}",
            format_alarm_time(notification.hour, notification.minute, self.time_format)
        )
    }

    pub fn timer_pulsing(&self) -> bool {
        self.timer_pulse_until.is_some()
    }

    /// Persistence failures raised during ticks, for the status line.
    pub fn take_persist_error(&mut self) -> Option<String> {
        self.persist_error.take()
    }

    /// Entering the stopwatch or timer view resets that tracker.
    pub fn cycle_mode(&mut self) -> Mode {
        self.mode = self.mode.next();
        match self.mode {
            Mode::Stopwatch => self.stopwatch.reset(),
            Mode::Timer => self.reset_timer(),
            Mode::Clock | Mode::Alarm => {}
        }
        debug!("mode switched to {}", self.mode.label());
        self.mode
    }

    pub fn toggle_format(&mut self) -> Result<TimeFormat> {
        self.time_format = self.time_format.toggled();
        self.refresh_display();
        self.persist()?;
        Ok(self.time_format)
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.theme = theme.to_string();
        self.persist()
    }

    pub fn toggle_stopwatch(&mut self) -> StopwatchState {
        self.stopwatch.toggle()
    }

    pub fn lap_stopwatch(&mut self) -> Option<u64> {
        self.stopwatch.lap()
    }

    pub fn reset_stopwatch(&mut self) {
        self.stopwatch.reset();
    }

    /// Stops a running timer, resumes a stopped one, and otherwise starts a
    /// fresh countdown from the minute and second fields.
    pub fn toggle_timer(&mut self) -> Result<TimerState, TrackerError> {
        match self.timer.state() {
            TimerState::Running => {
                self.timer.stop();
            }
            TimerState::Stopped => self.timer.start()?,
            TimerState::Idle | TimerState::Expired => {
                self.timer
                    .configure_from_input(&self.timer_fields.minutes, &self.timer_fields.seconds)?;
                self.timer.start()?;
                self.timer_pulse_until = None;
            }
        }
        Ok(self.timer.state())
    }

    /// Back to the 5:00 default, entry fields included.
    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.timer_fields = TimerFields::default();
        self.timer_pulse_until = None;
    }

    /// Adds an alarm from an `HH:MM` field and persists the list.
    pub fn set_alarm(&mut self, input: &str) -> Result<usize> {
        let index = self.registry.add_from_input(input)?;
        let alarm = self.registry.alarms()[index];
        info!(
            "alarm set for {}",
            format_alarm_time(alarm.hour, alarm.minute, TimeFormat::Hour24)
        );
        self.persist()?;
        Ok(index)
    }

    /// Display text of the alarm at `index` in the current time format.
    pub fn alarm_label(&self, index: usize) -> Option<String> {
        self.registry
            .alarms()
            .get(index)
            .map(|alarm| format_alarm_time(alarm.hour, alarm.minute, self.time_format))
    }

    pub fn delete_alarm(&mut self, index: usize) -> Result<Option<Alarm>> {
        let Some(removed) = self.registry.remove(index) else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(removed))
    }

    /// Clears a fired alarm's notification; the alarm list is untouched.
    pub fn dismiss_notification(&mut self, index: usize) -> bool {
        if index >= self.notifications.len() {
            return false;
        }
        self.notifications.remove(index);
        self.notifier.silence();
        true
    }

    /// Drops the timer pulse and notifications whose display time is over.
    pub fn housekeep(&mut self, now_ms: u64) {
        if self
            .timer_pulse_until
            .is_some_and(|until| now_ms >= until)
        {
            self.timer_pulse_until = None;
        }
        self.notifications
            .retain(|notification| now_ms < notification.expires_at_ms);
    }

    fn refresh_display(&mut self) {
        self.clock_text = format_clock(&self.moment, self.time_format);
        self.date_text = format_date(&self.moment);
        self.greeting = greeting(self.moment.hour);
    }

    fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.theme.clone(),
            time_format: self.time_format,
            alarms: self.registry.export_alarms(),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let preferences = self.preferences();
        preferences.save(self.store.as_mut())
    }

    fn on_clock_tick(&mut self, now_ms: u64) {
        match self.time_provider.now() {
            Ok(moment) => self.moment = moment,
            Err(err) => {
                warn!("unable to sample wall clock: {err:#}");
                return;
            }
        }
        self.refresh_display();
        if self.registry.is_empty() {
            return;
        }

        let outcome = self.registry.evaluate(&self.moment);
        if outcome.is_empty() {
            return;
        }
        for fired in &outcome.fired {
            let label = format_alarm_time(fired.hour, fired.minute, self.time_format);
            debug!("alarm #{} matched {label}", fired.index);
            self.notifier.alarm_fired(&label);
            self.notifications.push(Notification {
                hour: fired.hour,
                minute: fired.minute,
                expires_at_ms: now_ms + ALARM_NOTIFICATION_MS,
            });
        }
        if let Err(err) = self.persist() {
            warn!("failed to persist fired alarms: {err:#}");
            self.persist_error = Some(format!("Persist failed: {err}"));
        }
    }

    fn on_timer_tick(&mut self, now_ms: u64) {
        if self.timer.tick() == TimerTick::Expired {
            self.timer_pulse_until = Some(now_ms + TIMER_PULSE_MS);
            self.notifier.timer_expired();
        }
    }
}

impl TickHandler for Controller {
    fn on_tick(&mut self, kind: TickKind, now_ms: u64) {
        self.housekeep(now_ms);
        match kind {
            TickKind::Clock => self.on_clock_tick(now_ms),
            TickKind::Stopwatch => self.stopwatch.tick(),
            TickKind::Timer => self.on_timer_tick(now_ms),
        }
    }

    fn is_active(&self, kind: TickKind) -> bool {
        match kind {
            TickKind::Clock => true,
            TickKind::Stopwatch => self.stopwatch.is_running(),
            TickKind::Timer => self.timer.is_running(),
        }
    }
}
