use crate::alarm::model::{Alarm, AlarmInputError, parse_alarm_input};
use crate::time_provider::Moment;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FiredAlarm {
    pub index: usize,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluateOutcome {
    pub fired: Vec<FiredAlarm>,
}

impl EvaluateOutcome {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Ordered alarm list. Sole owner of each alarm's `active` flag.
#[derive(Debug, Clone, Default)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm>,
}

impl AlarmRegistry {
    pub fn new(alarms: Vec<Alarm>) -> Self {
        Self { alarms }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn active_alarms(&self) -> impl Iterator<Item = (usize, &Alarm)> {
        self.alarms
            .iter()
            .enumerate()
            .filter(|(_, alarm)| alarm.active)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Appends an active alarm and returns its position.
    pub fn add(&mut self, hour: u32, minute: u32) -> usize {
        self.alarms.push(Alarm::new(hour, minute));
        self.alarms.len() - 1
    }

    pub fn add_from_input(&mut self, input: &str) -> Result<usize, AlarmInputError> {
        let (hour, minute) = parse_alarm_input(input)?;
        Ok(self.add(hour, minute))
    }

    /// Fires every active alarm set for the moment's hour and minute. A fired
    /// alarm is deactivated, so it cannot fire again until re-added.
    pub fn evaluate(&mut self, moment: &Moment) -> EvaluateOutcome {
        let mut outcome = EvaluateOutcome::default();
        for (index, alarm) in self.alarms.iter_mut().enumerate() {
            if !alarm.active || alarm.hour != moment.hour || alarm.minute != moment.minute {
                continue;
            }
            alarm.active = false;
            outcome.fired.push(FiredAlarm {
                index,
                hour: alarm.hour,
                minute: alarm.minute,
            });
        }
        outcome
    }

    pub fn remove(&mut self, index: usize) -> Option<Alarm> {
        if index >= self.alarms.len() {
            return None;
        }
        Some(self.alarms.remove(index))
    }

    pub fn export_alarms(&self) -> Vec<Alarm> {
        self.alarms.clone()
    }
}
