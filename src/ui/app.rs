use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::egui::{
    self, Align, Key, Layout, RichText, ScrollArea, TextEdit, TopBottomPanel, Ui,
};
use log::{debug, info};

use crate::controller::{Controller, Mode};
use crate::format::TimeFormat;
use crate::scheduler::TickScheduler;
use crate::tracker::TICK_INTERVAL_MS;
use crate::tracker::stopwatch::StopwatchState;
use crate::tracker::timer::TimerState;
use crate::ui::theme::{PALETTES, Palette, apply_palette, palette};

pub fn run_gui(controller: Controller) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Desk Clock")
            .with_inner_size([880.0, 600.0])
            .with_min_inner_size([640.0, 460.0]),
        ..Default::default()
    };

    let app = DeskClockApp::new(controller);

    eframe::run_native(
        "Desk Clock",
        native_options,
        Box::new(move |cc| {
            apply_palette(&cc.egui_ctx, app.palette());
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch Desk Clock GUI: {err}"))?;

    Ok(())
}

struct DeskClockApp {
    controller: Controller,
    scheduler: TickScheduler,
    started: Instant,
    status_message: Option<(String, Instant)>,
    theme_picker_open: bool,
    alarm_input: String,
}

impl DeskClockApp {
    fn new(controller: Controller) -> Self {
        Self {
            controller,
            scheduler: TickScheduler::new(),
            started: Instant::now(),
            status_message: None,
            theme_picker_open: false,
            alarm_input: String::new(),
        }
    }

    fn palette(&self) -> &'static Palette {
        palette(self.controller.theme())
    }

    fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status_message = Some((text.into(), Instant::now() + ttl));
    }

    fn logical_now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn drive_ticks(&mut self) {
        let now_ms = self.logical_now_ms();
        let outcome = self.scheduler.advance_to(now_ms, &mut self.controller);
        if outcome.dropped > 0 {
            debug!(
                "dropped {} tick(s) after a stalled frame ({} total)",
                outcome.dropped,
                self.scheduler.dropped_total()
            );
        }
        self.controller.housekeep(now_ms);
        if let Some(message) = self.controller.take_persist_error() {
            self.set_status(message, Duration::from_secs(4));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (space, format) =
            ctx.input(|input| (input.key_pressed(Key::Space), input.key_pressed(Key::F)));
        if space {
            self.theme_picker_open = !self.theme_picker_open;
        }
        if format {
            self.toggle_format();
        }
    }

    fn toggle_format(&mut self) {
        if let Err(err) = self.controller.toggle_format() {
            self.set_status(format!("Persist failed: {err}"), Duration::from_secs(4));
        }
    }

    fn select_theme(&mut self, ctx: &egui::Context, name: &str) {
        let result = self.controller.set_theme(name);
        apply_palette(ctx, self.palette());
        self.theme_picker_open = false;
        match result {
            Ok(()) => {
                info!("theme switched to {name}");
                self.set_status(format!("Theme: {name}"), Duration::from_secs(2));
            }
            Err(err) => self.set_status(format!("Persist failed: {err}"), Duration::from_secs(4)),
        }
    }

    fn show_header(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(self.controller.clock_text())
                    .size(34.0)
                    .color(palette.highlight)
                    .strong(),
            );
            ui.separator();
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(self.controller.greeting())
                        .size(18.0)
                        .color(palette.accent)
                        .strong(),
                );
                ui.label(
                    RichText::new(self.controller.date_text())
                        .size(16.0)
                        .color(palette.muted),
                );
            });
        });

        ui.horizontal(|ui| {
            if ui
                .button(format!("Mode: {}", self.controller.mode().label()))
                .clicked()
            {
                let mode = self.controller.cycle_mode();
                self.set_status(format!("{} mode", mode.label()), Duration::from_secs(2));
            }
            let format_label = match self.controller.time_format() {
                TimeFormat::Hour12 => "Switch to 24h",
                TimeFormat::Hour24 => "Switch to 12h",
            };
            if ui.button(format_label).clicked() {
                self.toggle_format();
            }
            if ui.button("Theme").clicked() {
                self.theme_picker_open = !self.theme_picker_open;
            }
        });

        if let Some((msg, _)) = &self.status_message {
            ui.label(RichText::new(msg).color(palette.accent).strong());
        }
    }

    fn show_theme_picker(&mut self, ctx: &egui::Context) {
        if !self.theme_picker_open {
            return;
        }
        let mut chosen: Option<&'static str> = None;
        let mut open = self.theme_picker_open;
        egui::Window::new("Theme")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                for option in &PALETTES {
                    let selected = option.name == self.controller.theme();
                    let label = RichText::new(option.name).color(option.accent).strong();
                    if ui.selectable_label(selected, label).clicked() {
                        chosen = Some(option.name);
                    }
                }
            });
        self.theme_picker_open = open;
        if let Some(name) = chosen {
            self.select_theme(ctx, name);
        }
    }

    fn show_controls(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        ui.heading(
            RichText::new(self.controller.mode().label())
                .color(palette.accent)
                .strong(),
        );
        ui.separator();
        match self.controller.mode() {
            Mode::Clock => {
                ui.label(RichText::new("Space: theme picker").color(palette.muted));
                ui.label(RichText::new("F: toggle 12h/24h").color(palette.muted));
            }
            Mode::Stopwatch => self.show_stopwatch_controls(ui),
            Mode::Timer => self.show_timer_controls(ui),
            Mode::Alarm => self.show_alarm_controls(ui),
        }
    }

    fn show_stopwatch_controls(&mut self, ui: &mut Ui) {
        let toggle_label = match self.controller.stopwatch().state() {
            StopwatchState::Running => "Stop",
            StopwatchState::Stopped => "Start",
        };
        ui.horizontal(|ui| {
            if ui.button(toggle_label).clicked() {
                self.controller.toggle_stopwatch();
            }
            if ui.button("Lap").clicked() && self.controller.lap_stopwatch().is_none() {
                self.set_status("Laps are recorded while running.", Duration::from_secs(2));
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_stopwatch();
            }
        });
    }

    fn show_timer_controls(&mut self, ui: &mut Ui) {
        let editable = matches!(
            self.controller.timer().state(),
            TimerState::Idle | TimerState::Expired
        );
        ui.horizontal(|ui| {
            let fields = self.controller.timer_fields_mut();
            ui.label("Minutes");
            ui.add_enabled(
                editable,
                TextEdit::singleline(&mut fields.minutes).desired_width(48.0),
            );
            ui.label("Seconds");
            ui.add_enabled(
                editable,
                TextEdit::singleline(&mut fields.seconds).desired_width(48.0),
            );
        });
        let toggle_label = match self.controller.timer().state() {
            TimerState::Running => "Stop",
            TimerState::Stopped => "Resume",
            TimerState::Idle | TimerState::Expired => "Start",
        };
        ui.horizontal(|ui| {
            if ui.button(toggle_label).clicked()
                && let Err(err) = self.controller.toggle_timer()
            {
                self.set_status(format!("Timer: {err}"), Duration::from_secs(3));
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_timer();
            }
        });
    }

    fn show_alarm_controls(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        ui.horizontal(|ui| {
            ui.label("Time (HH:MM)");
            ui.add(TextEdit::singleline(&mut self.alarm_input).desired_width(70.0));
        });
        if ui
            .add(
                egui::Button::new(RichText::new("Set Alarm").strong())
                    .fill(palette.active)
                    .min_size(egui::vec2(140.0, 26.0)),
            )
            .clicked()
        {
            match self.controller.set_alarm(&self.alarm_input) {
                Ok(index) => {
                    self.alarm_input.clear();
                    let label = self.controller.alarm_label(index).unwrap_or_default();
                    self.set_status(format!("Alarm set for {label}"), Duration::from_secs(2));
                }
                Err(err) => self.set_status(format!("Alarm: {err}"), Duration::from_secs(4)),
            }
        }
    }

    fn show_display(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        match self.controller.mode() {
            Mode::Clock => {
                ui.label(
                    RichText::new(self.controller.clock_text())
                        .size(72.0)
                        .color(palette.highlight)
                        .strong(),
                );
            }
            Mode::Stopwatch => {
                ui.label(
                    RichText::new(self.controller.stopwatch_text())
                        .size(64.0)
                        .monospace()
                        .color(palette.highlight),
                );
                self.show_laps(ui);
            }
            Mode::Timer => {
                let color = if self.controller.timer_pulsing() {
                    palette.warning
                } else {
                    palette.highlight
                };
                ui.label(
                    RichText::new(self.controller.timer_text())
                        .size(72.0)
                        .monospace()
                        .color(color),
                );
                if self.controller.timer().is_expired() {
                    ui.label(RichText::new("Time's up!").color(palette.warning).strong());
                }
            }
            Mode::Alarm => self.show_alarm_list(ui),
        }
    }

    fn show_laps(&self, ui: &mut Ui) {
        let laps = self.controller.lap_lines();
        if laps.is_empty() {
            return;
        }
        ui.separator();
        ScrollArea::vertical().id_salt("laps_scroll").show(ui, |ui| {
            for line in laps.iter().rev() {
                ui.label(RichText::new(line).monospace());
            }
        });
    }

    fn show_alarm_list(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        let rows = self.controller.active_alarm_rows();
        if rows.is_empty() {
            ui.label(RichText::new("No active alarms.").color(palette.muted).strong());
            return;
        }

        let mut remove_index: Option<usize> = None;
        ScrollArea::vertical()
            .id_salt("alarms_scroll")
            .show(ui, |ui| {
                egui::Grid::new("alarms_grid")
                    .striped(true)
                    .num_columns(2)
                    .show(ui, |ui| {
                        for (index, text) in &rows {
                            ui.label(RichText::new(text).size(20.0).monospace());
                            if ui
                                .add(
                                    egui::Button::new(
                                        RichText::new("Delete").color(palette.warning).strong(),
                                    )
                                    .fill(palette.widget),
                                )
                                .clicked()
                            {
                                remove_index = Some(*index);
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some(index) = remove_index {
            match self.controller.delete_alarm(index) {
                Ok(Some(_)) => self.set_status("Alarm deleted.", Duration::from_secs(2)),
                Ok(None) => {}
                Err(err) => {
                    self.set_status(format!("Persist failed: {err}"), Duration::from_secs(4));
                }
            }
        }
    }

    fn show_notifications(&mut self, ui: &mut Ui) {
        let palette = self.palette();
        let lines: Vec<String> = self
            .controller
            .notifications()
            .iter()
            .map(|notification| self.controller.notification_text(notification))
            .collect();
        let mut dismiss: Option<usize> = None;
        for (index, line) in lines.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(RichText::new(line).color(palette.warning).strong());
                if ui.button("Dismiss").clicked() {
                    dismiss = Some(index);
                }
            });
        }
        if let Some(index) = dismiss {
            self.controller.dismiss_notification(index);
        }
    }

    fn next_repaint(&self) -> Duration {
        if self.controller.stopwatch().is_running() || self.controller.timer().is_running() {
            return Duration::from_millis(TICK_INTERVAL_MS);
        }
        let now_ms = self.logical_now_ms();
        let wait_ms = self
            .scheduler
            .next_due_ms()
            .map_or(TICK_INTERVAL_MS, |due| due.saturating_sub(now_ms));
        Duration::from_millis(wait_ms.max(1))
    }
}

impl eframe::App for DeskClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some((_, expires_at)) = &self.status_message
            && Instant::now() >= *expires_at
        {
            self.status_message = None;
        }

        self.handle_shortcuts(ctx);
        self.drive_ticks();

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui));

        if !self.controller.notifications().is_empty() {
            TopBottomPanel::bottom("notifications")
                .resizable(false)
                .show(ctx, |ui| self.show_notifications(ui));
        }

        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .min_width(220.0)
            .default_width(260.0)
            .show(ctx, |ui| self.show_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| self.show_display(ui));
        });

        self.show_theme_picker(ctx);

        ctx.request_repaint_after(self.next_repaint());
    }
}
