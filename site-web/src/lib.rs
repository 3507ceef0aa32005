//! Browser entry point: wires the live document, `window.fetch` and the JS
//! clock into the page bootstrap.

mod bridge;
mod dom;

use bridge::{JsClock, WebFetch};
use dom::WebDom;
use site_core::{bootstrap, SiteConfig, SiteContext};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Window};

/// Id of an optional `<script type="application/json">` holding config overrides.
const CONFIG_ELEMENT_ID: &str = "site-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document not available"))?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || spawn_local(boot(window)));
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        spawn_local(boot(window));
    }
    Ok(())
}

async fn boot(window: Window) {
    let Some(document) = window.document() else {
        log::error!("document disappeared before bootstrap");
        return;
    };

    let config = load_config(&document);
    let host = window.location().hostname().unwrap_or_default();
    let ctx = SiteContext::new(config, &host);
    log::info!("enhancing page for host '{host}' (base '{}')", ctx.base.as_str());

    let dom = WebDom::new(window.clone(), document);
    let fetch = WebFetch::new(window);
    if let Err(e) = bootstrap::run(&dom, &fetch, &JsClock, &ctx).await {
        log::error!("page bootstrap aborted: {e}");
    }
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };

    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            SiteConfig::default()
        }
    }
}
