//! BSC dApp: a wallet-extension demo for BNB Smart Chain

mod app;
mod dapp_bridge;
mod state;
mod ui;
mod view;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use eframe::egui;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!(build = env!("GIT_HASH"), "Starting BSC dApp");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("BSC dApp")
            .with_inner_size([760.0, 720.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "BSC dApp",
        native_options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc)))),
    )
}

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "bsc_dapp_canvas";

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast;

    tracing_wasm::set_as_global_default();
    tracing::info!(build = env!("GIT_HASH"), "Starting BSC dApp");

    let Some(canvas) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CANVAS_ID))
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    else {
        tracing::error!(canvas = CANVAS_ID, "canvas element not found");
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(app::App::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            tracing::error!(error = ?e, "failed to start web app");
        }
    });
}
