use eframe::egui::{self, Color32};

use crate::prefs::DEFAULT_THEME;

/// Named colour scheme applied to the whole window.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub dark: bool,
    pub text: Color32,
    pub panel: Color32,
    pub window: Color32,
    pub widget: Color32,
    pub hovered: Color32,
    pub active: Color32,
    pub accent: Color32,
    pub highlight: Color32,
    pub muted: Color32,
    pub warning: Color32,
}

pub const PALETTES: [Palette; 4] = [
    Palette {
        name: DEFAULT_THEME,
        dark: true,
        text: Color32::from_rgb(226, 234, 246),
        panel: Color32::from_rgb(8, 16, 26),
        window: Color32::from_rgb(12, 20, 32),
        widget: Color32::from_rgb(16, 24, 38),
        hovered: Color32::from_rgb(26, 42, 62),
        active: Color32::from_rgb(34, 60, 88),
        accent: Color32::from_rgb(96, 228, 206),
        highlight: Color32::from_rgb(255, 214, 117),
        muted: Color32::from_rgb(161, 180, 201),
        warning: Color32::from_rgb(255, 124, 124),
    },
    Palette {
        name: "light",
        dark: false,
        text: Color32::from_rgb(28, 34, 44),
        panel: Color32::from_rgb(240, 243, 247),
        window: Color32::from_rgb(250, 251, 253),
        widget: Color32::from_rgb(222, 228, 236),
        hovered: Color32::from_rgb(204, 214, 228),
        active: Color32::from_rgb(180, 196, 218),
        accent: Color32::from_rgb(22, 120, 140),
        highlight: Color32::from_rgb(180, 96, 20),
        muted: Color32::from_rgb(96, 108, 124),
        warning: Color32::from_rgb(196, 40, 40),
    },
    Palette {
        name: "ocean",
        dark: true,
        text: Color32::from_rgb(214, 236, 248),
        panel: Color32::from_rgb(4, 22, 40),
        window: Color32::from_rgb(8, 30, 52),
        widget: Color32::from_rgb(12, 40, 66),
        hovered: Color32::from_rgb(20, 58, 92),
        active: Color32::from_rgb(30, 82, 124),
        accent: Color32::from_rgb(88, 196, 255),
        highlight: Color32::from_rgb(120, 240, 220),
        muted: Color32::from_rgb(140, 176, 204),
        warning: Color32::from_rgb(255, 140, 120),
    },
    Palette {
        name: "sunset",
        dark: true,
        text: Color32::from_rgb(250, 232, 220),
        panel: Color32::from_rgb(34, 14, 24),
        window: Color32::from_rgb(44, 18, 30),
        widget: Color32::from_rgb(58, 24, 38),
        hovered: Color32::from_rgb(84, 34, 50),
        active: Color32::from_rgb(112, 46, 62),
        accent: Color32::from_rgb(255, 156, 98),
        highlight: Color32::from_rgb(255, 206, 120),
        muted: Color32::from_rgb(204, 168, 170),
        warning: Color32::from_rgb(255, 96, 110),
    },
];

/// Unknown names fall back to the default palette.
pub fn palette(name: &str) -> &'static Palette {
    PALETTES
        .iter()
        .find(|palette| palette.name == name)
        .unwrap_or(&PALETTES[0])
}

pub fn apply_palette(ctx: &egui::Context, palette: &Palette) {
    let mut visuals = if palette.dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.override_text_color = Some(palette.text);
    visuals.panel_fill = palette.panel;
    visuals.window_fill = palette.window;
    visuals.widgets.noninteractive.bg_fill = palette.panel;
    visuals.widgets.inactive.bg_fill = palette.widget;
    visuals.widgets.hovered.bg_fill = palette.hovered;
    visuals.widgets.active.bg_fill = palette.active;
    visuals.selection.bg_fill = palette.accent.gamma_multiply(0.6);
    visuals.hyperlink_color = palette.accent;
    ctx.set_visuals(visuals);
}
