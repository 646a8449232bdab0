//! UI helper components

use alloy::primitives::{utils::format_ether, B256, U256};
use bsc_dapp_core::NetworkLabel;
use eframe::egui;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(240, 185, 11);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
const SUCCESS_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);

/// BscScan page for a transaction on the given network
pub fn explorer_tx_url(network: NetworkLabel, hash: &B256) -> String {
    let base = match network {
        NetworkLabel::Testnet => "https://testnet.bscscan.com",
        NetworkLabel::Mainnet | NetworkLabel::Unconnected => "https://bscscan.com",
    };
    format!("{base}/tx/{hash}")
}

/// Balance in BNB with trailing zeros trimmed
pub fn format_bnb(wei: U256) -> String {
    let raw = format_ether(wei);
    let trimmed = if raw.contains('.') {
        raw.trim_end_matches('0').trim_end_matches('.')
    } else {
        raw.as_str()
    };
    format!("{trimmed} BNB")
}

/// Open URL in a new browser tab
#[cfg(target_arch = "wasm32")]
pub fn open_url_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(%url, error = %e, "failed to open url");
    }
}

/// Copy to clipboard (platform-specific)
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let navigator = window.navigator();
        let clipboard = navigator.clipboard();
        let _ = clipboard.write_text(text);
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(egui::RichText::new(text).strong().size(14.0));
    ui.separator();
}

pub fn address_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0x...")
            .desired_width(400.0)
            .font(egui::TextStyle::Monospace),
    )
}

pub fn number_input(ui: &mut egui::Ui, value: &mut String, hint: &str) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(150.0)
            .font(egui::TextStyle::Monospace),
    )
}

/// Primary button with enabled state
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::BLACK))
        .min_size(egui::vec2(130.0, 30.0))
        .fill(ACCENT);
    ui.add_enabled(enabled, btn)
}

/// Inline error notice; returns true when the user dismissed it.
pub fn dismissible_error(ui: &mut egui::Ui, message: &str) -> bool {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(ERROR_RED));
        ui.small_button("✕").on_hover_text("Dismiss").clicked()
    })
    .inner
}

pub fn success_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("✅").size(16.0));
        ui.label(egui::RichText::new(message).color(SUCCESS_GREEN));
    });
}

/// Display a hash value with copy button
pub fn copyable_hash(ui: &mut egui::Ui, hash: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(hash).monospace());
        if ui
            .small_button("📋")
            .on_hover_text("Copy to clipboard")
            .clicked()
        {
            copy_to_clipboard(hash);
        }
    });
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

/// Render content in a highlighted card (slightly brighter)
pub fn card_highlighted(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    let bg = ui.visuals().faint_bg_color.linear_multiply(1.3);
    egui::Frame::none()
        .fill(bg)
        .stroke(egui::Stroke::new(1.0, ACCENT))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}
