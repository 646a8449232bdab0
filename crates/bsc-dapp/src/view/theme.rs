//! Presentation strategies for [`super::DappView`]

use eframe::egui;

use crate::ui;

/// How the page decorates its panels and controls.
pub trait Theme {
    fn name(&self) -> &'static str;

    /// A titled group of controls.
    fn panel(&self, ui: &mut egui::Ui, title: &str, add_contents: &mut dyn FnMut(&mut egui::Ui));

    /// The extension status line at the top of the page.
    fn status(&self, ui: &mut egui::Ui, text: &str);

    fn button(&self, ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response;

    fn value(&self, ui: &mut egui::Ui, label: &str, value: &str);
}

/// Bare markup, close to a plain HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTheme;

impl Theme for PlainTheme {
    fn name(&self) -> &'static str {
        "Plain"
    }

    fn panel(&self, ui: &mut egui::Ui, title: &str, add_contents: &mut dyn FnMut(&mut egui::Ui)) {
        ui.add_space(12.0);
        ui.label(title);
        add_contents(ui);
    }

    fn status(&self, ui: &mut egui::Ui, text: &str) {
        ui.label(text);
    }

    fn button(&self, ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
        ui.add_enabled(enabled, egui::Button::new(text))
    }

    fn value(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.horizontal(|ui| {
            ui.label(format!("{label}:"));
            ui.label(egui::RichText::new(value).monospace().small());
        });
    }
}

/// Cards with accent-colored actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardTheme;

impl Theme for CardTheme {
    fn name(&self) -> &'static str {
        "Cards"
    }

    fn panel(&self, ui: &mut egui::Ui, title: &str, add_contents: &mut dyn FnMut(&mut egui::Ui)) {
        ui.add_space(8.0);
        ui::card(ui, |ui| {
            ui::section_header(ui, title);
            add_contents(ui);
        });
    }

    fn status(&self, ui: &mut egui::Ui, text: &str) {
        ui::card_highlighted(ui, |ui| {
            ui::styled_heading(ui, text);
        });
    }

    fn button(&self, ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
        ui::primary_button_enabled(ui, text, enabled)
    }

    fn value(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("{label}:")).strong());
            ui::copyable_hash(ui, value);
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    Plain,
    #[default]
    Card,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 2] = [ThemeKind::Plain, ThemeKind::Card];

    pub fn theme(self) -> &'static dyn Theme {
        match self {
            Self::Plain => &PlainTheme,
            Self::Card => &CardTheme,
        }
    }
}
