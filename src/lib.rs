//! Live double-pendulum visualization
//!
//! Polls a simulation server for bob positions and renders:
//! - the pendulum on a zoomable canvas with fading trails
//! - rolling charts of bob acceleration and link angular velocity
//!
//! The platform-agnostic pipeline lives in [`core`]. The browser front end
//! is behind the `wasm` feature, the headless client behind `cli`.

pub mod core;
pub mod time;

#[cfg(feature = "cli")]
pub mod remote_native;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod app;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod remote_wasm;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod theme;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use tracing::info;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::PendulumApp;
    use crate::core::VisConfig;

    /// Server base URL from `window.__pendulum_server`; empty means same origin.
    fn resolve_config() -> VisConfig {
        let server = js_sys::eval("window.__pendulum_server")
            .ok()
            .and_then(|v| v.as_string());
        match server {
            Some(url) => VisConfig::default().with_server_url(url),
            None => VisConfig::default(),
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let config = resolve_config();
        info!(server = %config.server_url, "Starting pendulum visualization");

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(move |cc| Ok(Box::new(PendulumApp::new(cc, config)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }
}
