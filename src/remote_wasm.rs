//! Browser HTTP client for the simulation server
//!
//! Snapshot polling on a `setInterval` timer plus fire-and-forget control
//! commands, both through `window.fetch`.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response};

use crate::core::control::{CommandGate, ControlCommand};
use crate::core::error::{ClientError, Result};
use crate::core::snapshot::parse_snapshot;
use crate::core::{PendulumState, VisConfig};

fn js_err(e: JsValue) -> ClientError {
    ClientError::Network(format!("{e:?}"))
}

/// Issue one request and return the response body as text.
async fn fetch_text(url: &str, method: &str, body: Option<&str>) -> Result<String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_cache(RequestCache::NoCache);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
    }

    let window = web_sys::window().ok_or_else(|| ClientError::Network("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| ClientError::Network("fetch did not return a Response".into()))?;

    if !resp.ok() {
        return Err(ClientError::Status(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| ClientError::Network("response body is not text".into()))
}

/// Polls `GET /coords` on a fixed interval.
///
/// Each tick starts a fresh request without waiting for the previous one;
/// whichever response lands last wins.
pub struct Sampler {
    #[allow(dead_code)]
    interval_id: i32,
}

impl Sampler {
    pub fn start(config: &VisConfig, state: Rc<RefCell<PendulumState>>) -> std::result::Result<Self, JsValue> {
        let url = config.endpoint(crate::core::config::COORDS_PATH);
        let period_ms = config.timer_period_ms();
        info!(url = %url, period_ms, "Starting sampler");

        let on_tick = Closure::wrap(Box::new(move || {
            let url = url.clone();
            let state = state.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match fetch_text(&url, "GET", None).await {
                    Ok(body) => parse_snapshot(&body),
                    Err(e) => Err(e),
                };
                if let Err(e) = &result {
                    trace!(error = %e, "Poll failed");
                }
                state.borrow_mut().accept_poll(result);
            });
        }) as Box<dyn FnMut()>);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            on_tick.as_ref().unchecked_ref(),
            period_ms,
        )?;
        on_tick.forget();

        Ok(Self { interval_id })
    }
}

/// Send a control command in the background.
///
/// The caller has already claimed `gate`; it is released when the request
/// settles. Failures are logged only.
pub fn send_command(config: &VisConfig, command: ControlCommand, gate: Rc<RefCell<CommandGate>>) {
    let url = config.endpoint(command.path());
    wasm_bindgen_futures::spawn_local(async move {
        let name = command.name();
        let result = match command.body() {
            Ok(body) => fetch_text(&url, "POST", body.as_deref()).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => debug!(command = name, response = %body, "Control command done"),
            Err(ClientError::Status(code)) => warn!(command = name, code, "Control command rejected"),
            Err(e) => error!(command = name, error = %e, "Control command failed"),
        }
        gate.borrow_mut().finish();
    });
}
