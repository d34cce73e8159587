//! Browser entry point: wires the nightsky behaviors into the page.
//!
//! Each behavior starts independently; one failing to wire up is logged and
//! leaves the others running.

#[cfg(target_arch = "wasm32")]
mod contact;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod http;
#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod navigation;
#[cfg(target_arch = "wasm32")]
mod projects;
#[cfg(target_arch = "wasm32")]
mod starfield;

use nightsky_core::config::StarfieldConfig;
use nightsky_protocol::Background;
use wasm_bindgen::prelude::*;

/// Render a still starfield as an SVG document, e.g. for a poster image.
/// The same seed always yields the same picture.
#[wasm_bindgen]
pub fn render_starfield_svg(width: f64, height: f64, seed: u32) -> Result<String, JsError> {
    nightsky_core::svg::starfield_still_svg(
        &StarfieldConfig::default(),
        Background::Transparent,
        width,
        height,
        u64::from(seed),
    )
    .map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    logger::init();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let target = window.clone();
        let on_ready = Closure::once_into_js(move || wire_page(&window, &document));
        target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        wire_page(&window, &document);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn wire_page(window: &web_sys::Window, document: &web_sys::Document) {
    let config = dom::load_config(document);
    logger::set_level(&config.log_level);

    if let Err(e) = starfield::start(window, document, &config.starfield) {
        log::error!("starfield disabled: {e:#}");
    }
    match contact::start(window, document, &config.contact) {
        Ok(true) => log::debug!("contact form wired"),
        Ok(false) => {}
        Err(e) => log::error!("contact form disabled: {e:#}"),
    }
    match projects::start(window, document, &config.repos) {
        Ok(true) => log::debug!("project list loading"),
        Ok(false) => {}
        Err(e) => log::error!("project list disabled: {e:#}"),
    }
    match navigation::start(window, document, &config.navigation) {
        Ok(count) => log::debug!("smooth scrolling on {count} links"),
        Err(e) => log::error!("smooth scrolling disabled: {e:#}"),
    }
}
