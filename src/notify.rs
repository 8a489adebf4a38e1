use std::io::{self, Write};

use log::{info, warn};

/// Audible and visual cue sink. Calls are fire-and-forget.
pub trait AlarmNotifier {
    fn alarm_fired(&mut self, label: &str);
    fn timer_expired(&mut self);
    fn silence(&mut self);
}

/// Rings the terminal bell and logs each cue.
pub struct TerminalBellNotifier;

impl TerminalBellNotifier {
    fn ring(&self) {
        let mut stderr = io::stderr();
        if let Err(err) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            warn!("unable to ring terminal bell: {err}");
        }
    }
}

impl AlarmNotifier for TerminalBellNotifier {
    fn alarm_fired(&mut self, label: &str) {
        info!("alarm fired: {label}");
        self.ring();
    }

    fn timer_expired(&mut self) {
        info!("timer expired");
        self.ring();
    }

    fn silence(&mut self) {}
}

/// Logs cues without making a sound.
pub struct LogNotifier;

impl AlarmNotifier for LogNotifier {
    fn alarm_fired(&mut self, label: &str) {
        info!("alarm fired: {label}");
    }

    fn timer_expired(&mut self) {
        info!("timer expired");
    }

    fn silence(&mut self) {}
}
