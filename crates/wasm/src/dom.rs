//! Small DOM helpers shared by the behaviors.

use nightsky_core::SiteConfig;
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

/// Inline `<script type="application/json">` holding the page config.
const CONFIG_ELEMENT_ID: &str = "nightsky-config";

pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}", describe(&e))
}

/// Best-effort human-readable text for a thrown JS value.
pub fn describe(e: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(error) = e.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Read the page config. A missing element means defaults; a broken one is
/// logged and also yields defaults.
pub fn load_config(document: &Document) -> SiteConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return SiteConfig::default();
    };
    let text = element.text_content().unwrap_or_default();
    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::error!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            SiteConfig::default()
        }
    }
}

/// Computed value of a CSS custom property on the root element.
pub fn css_variable(window: &Window, document: &Document, name: &str) -> Option<String> {
    let root = document.document_element()?;
    let style = window.get_computed_style(&root).ok()??;
    style.get_property_value(name).ok()
}

pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

/// Viewport size in CSS pixels.
pub fn viewport_size(window: &Window) -> anyhow::Result<(f64, f64)> {
    let width = window.inner_width().map_err(js_err)?.as_f64();
    let height = window.inner_height().map_err(js_err)?.as_f64();
    match (width, height) {
        (Some(w), Some(h)) if w.is_finite() && h.is_finite() => Ok((w, h)),
        _ => anyhow::bail!("viewport size is not a finite number"),
    }
}
